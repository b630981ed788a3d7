//! Clip engine: captures curves from a [`MemoryScene`], writes a
//! `pose.json` + keyframe payload pair and replays it back.

use anyhow::{anyhow, bail, Context, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{ExportOptions, Metadata, TransferClass, TransferObject};
use crate::formats::{self, ClipHeader, FileType, HEADER_FILE_NAME};
use crate::limits::MAX_FRAMES;
use crate::models::clip::short_name;
use crate::models::{Clip, Curve, LoadRequest, ReplayOption, TimeRange};
use crate::scene::MemoryScene;

pub type SharedScene = Rc<RefCell<MemoryScene>>;

/// Factory bound to one scene
#[derive(Debug, Clone)]
pub struct ClipTransferClass {
    scene: SharedScene,
}

impl ClipTransferClass {
    pub fn new(scene: SharedScene) -> Self {
        Self { scene }
    }
}

impl TransferClass for ClipTransferClass {
    type Object = ClipTransfer;

    fn from_objects(&self, objects: &[String]) -> Result<ClipTransfer> {
        let scene = self.scene.borrow();
        let mut clip = Clip::new();
        let mut driven = Clip::new();
        let mut header = ClipHeader::default();

        for object in objects {
            let attrs = scene
                .attributes(object)
                .ok_or_else(|| anyhow!("Object does not exist: {}", object))?;

            let mut inventory = Vec::with_capacity(attrs.len());
            for (attr, attribute) in attrs {
                if attribute.driver.is_some() {
                    if let Some(curve) = scene.driver_curve(object, attr) {
                        driven.insert(object.as_str(), attr.as_str(), curve.clone());
                        inventory.push(attr.clone());
                    }
                } else if !attribute.curve.is_empty() {
                    clip.insert(object.as_str(), attr.as_str(), attribute.curve.clone());
                    inventory.push(attr.clone());
                }
            }
            header.objects.insert(object.clone(), inventory);
        }

        let captured = union(clip.frame_range(), driven.frame_range());
        header.start_frame = captured.map(|r| r.start);
        header.end_frame = captured.map(|r| r.end);

        Ok(ClipTransfer {
            scene: Rc::clone(&self.scene),
            header,
            clip,
            driven,
            paths: Vec::new(),
        })
    }

    fn from_path(&self, path: &Path) -> Result<ClipTransfer> {
        let header_path = path.join(HEADER_FILE_NAME);
        let header = formats::parse_header(&header_path)?;

        let payload_path = path.join(header.file_type.payload_file_name());
        let clip = match header.file_type {
            FileType::Json => formats::parse_clip_json(&payload_path)?,
            FileType::Csv => formats::parse_clip_csv(&payload_path)?,
        };

        Ok(ClipTransfer {
            scene: Rc::clone(&self.scene),
            header,
            clip,
            driven: Clip::new(),
            paths: vec![header_path, payload_path],
        })
    }
}

/// Captured or stored animation clip
#[derive(Debug, Clone)]
pub struct ClipTransfer {
    scene: SharedScene,
    header: ClipHeader,
    clip: Clip,
    /// Driver curves of connected attributes, keyed by the driven plug
    driven: Clip,
    paths: Vec<PathBuf>,
}

fn union(a: Option<TimeRange>, b: Option<TimeRange>) -> Option<TimeRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(TimeRange::new(a.start.min(b.start), a.end.max(b.end))),
        (a, b) => a.or(b),
    }
}

/// Sample `curve` once per frame across `range`
fn bake(curve: &Curve, range: TimeRange) -> Result<Curve> {
    if range.frame_count() > MAX_FRAMES {
        bail!("Too many frames to bake: {} (max: {})", range.frame_count(), MAX_FRAMES);
    }
    let mut baked = Curve::new();
    for frame in range.start..=range.end {
        if let Some(value) = curve.evaluate(frame) {
            baked.set_key(frame, value);
        }
    }
    Ok(baked)
}

impl ClipTransfer {
    pub fn header(&self) -> &ClipHeader {
        &self.header
    }

    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    pub fn metadata(&self) -> &Metadata {
        &self.header.metadata
    }

    /// Scene nodes that receive the keys of `source`
    fn bind_targets(&self, source: &str, request: &LoadRequest, scene: &MemoryScene) -> Vec<String> {
        let short = short_name(source);

        let candidates: Vec<String> = if !request.objects.is_empty() {
            request
                .objects
                .iter()
                .filter(|object| short_name(object) == short)
                .cloned()
                .collect()
        } else if !request.namespaces.is_empty() {
            request
                .namespaces
                .iter()
                .map(|ns| {
                    if ns.is_empty() {
                        short.to_string()
                    } else {
                        format!("{}:{}", ns, short)
                    }
                })
                .collect()
        } else {
            vec![source.to_string()]
        };

        candidates
            .into_iter()
            .filter(|name| scene.has_node(name))
            .collect()
    }
}

impl TransferObject for ClipTransfer {
    fn update_metadata(&mut self, metadata: &Metadata) {
        for (key, value) in metadata {
            self.header.metadata.insert(key.clone(), value.clone());
        }
    }

    fn save(&mut self, path: &Path, options: &ExportOptions) -> Result<()> {
        let file_type = FileType::parse(&options.file_type)
            .ok_or_else(|| anyhow!("Unsupported file type: {}", options.file_type))?;

        let captured = union(self.clip.frame_range(), self.driven.frame_range());
        let start = options.time.0.or(captured.map(|r| r.start));
        let end = options.time.1.or(captured.map(|r| r.end));
        let window = start.zip(end).map(|(s, e)| TimeRange::new(s, e));

        let mut out = Clip::new();
        for (node, attr, curve) in self.clip.curves() {
            let curve = match window {
                Some(range) => curve.slice(range, 0),
                None => curve.clone(),
            };
            out.insert(node, attr, curve);
        }

        if options.bake_connected {
            for (node, attr, curve) in self.driven.curves() {
                if let Some(range) = window.or_else(|| curve.frame_range()) {
                    out.insert(node, attr, bake(curve, range)?);
                }
            }
        } else if !self.driven.is_empty() {
            log::debug!("Skipping connected curves; bake is off");
        }

        std::fs::create_dir_all(path)
            .with_context(|| format!("Unable to create: {}", path.display()))?;

        self.header.file_type = file_type;
        self.header.start_frame = start;
        self.header.end_frame = end;

        let header_path = path.join(HEADER_FILE_NAME);
        let payload_path = path.join(file_type.payload_file_name());
        formats::write_header(&self.header, &header_path)?;
        match file_type {
            FileType::Json => formats::write_clip_json(&out, &payload_path)?,
            FileType::Csv => formats::write_clip_csv(&out, &payload_path)?,
        }

        self.clip = out;
        self.driven = Clip::new();
        self.paths = vec![header_path, payload_path];
        Ok(())
    }

    fn load(&self, request: &LoadRequest) -> Result<()> {
        let option = ReplayOption::from_identifier(&request.option)
            .ok_or_else(|| anyhow!("Unsupported paste option: {}", request.option))?;

        let source = request.source_time;
        let (delta, destination) = request
            .delta()
            .zip(request.destination())
            .ok_or_else(|| {
                anyhow!(
                    "Frame range out of bounds: [{}, {}] moved to start frame {:?}",
                    source.start,
                    source.end,
                    request.start_frame
                )
            })?;
        let insert_shift = i32::try_from(destination.frame_count()).ok();

        let mut scene = self.scene.borrow_mut();

        for (node, attrs) in self.clip.nodes() {
            let targets = self.bind_targets(node, request, &scene);
            if targets.is_empty() {
                log::warn!("No matching destination for {}", node);
                continue;
            }

            for target in &targets {
                for (attr, curve) in attrs {
                    let pasted = curve.slice(source, delta);
                    let Some(attribute) = scene.attribute_mut(target, attr) else {
                        continue;
                    };

                    match option {
                        ReplayOption::ReplaceCompletely => attribute.curve = pasted,
                        ReplayOption::Replace => {
                            attribute.curve.remove_range(destination);
                            attribute.curve.merge(&pasted);
                        }
                        ReplayOption::Insert => {
                            let shifted = insert_shift
                                .is_some_and(|shift| attribute.curve.shift_from(destination.start, shift));
                            if !shifted {
                                bail!(
                                    "Frame range out of bounds: cannot insert {} frames on {}.{}",
                                    destination.frame_count(),
                                    target,
                                    attr
                                );
                            }
                            attribute.curve.merge(&pasted);
                        }
                        ReplayOption::Merge => attribute.curve.merge(&pasted),
                    }

                    if !request.connect {
                        attribute.driver = None;
                    }
                }
            }
        }

        if request.current_time {
            scene.set_current_time(destination.start);
        }

        Ok(())
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }

    fn start_frame(&self) -> Option<i32> {
        self.header.start_frame
    }

    fn end_frame(&self) -> Option<i32> {
        self.header.end_frame
    }
}
