//! The anim item: option schema, replay resolution and staged save.
//!
//! Saving snapshots the named objects through the [`TransferClass`],
//! serializes into a private staging directory and hands the finished file
//! list to [`BaseItem::save`], which promotes it into place. Loading
//! normalizes the replay option, resolves the source window against the
//! bundle's recorded range and forwards a [`LoadRequest`] to the stored
//! [`TransferObject`].
//!
//! ```no_run
//! # use std::{cell::RefCell, rc::Rc};
//! # use studio_anim::{AnimItem, LibraryItem, LoadOptions, SaveOptions};
//! # use studio_anim::scene::MemoryScene;
//! # use studio_anim::transfer::ClipTransferClass;
//! # fn main() -> studio_anim::AnimResult<()> {
//! let scene = Rc::new(RefCell::new(MemoryScene::new()));
//! let mut item = AnimItem::new(
//!     LibraryItem::new("/AnimLibrary/Characters/Malcolm/malcolm.anim"),
//!     ClipTransferClass::new(scene),
//! );
//!
//! let objects = vec!["pCube1".to_string()];
//! item.save(&objects, SaveOptions::default().with_frame_range(0, 200))?;
//! item.load(&objects, &[], &LoadOptions::new("replaceCompletely"))?;
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::json;

use crate::bundle;
use crate::error::{AnimItemError, AnimResult};
use crate::item::BaseItem;
use crate::models::info::insert_clamped;
use crate::models::replay::{normalize_option, resolve_source_time, REPLACE_ALL_LABEL};
use crate::models::{
    InfoField, LoadOptions, LoadRequest, OptionDescriptor, OptionKind, ReplayOption,
};
use crate::transfer::{ExportOptions, Metadata, TransferClass, TransferObject};

/// Parameters of [`AnimItem::save`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    /// Destination bundle; `.anim` is appended when missing. `None` saves
    /// over the item's own path.
    pub path: Option<PathBuf>,
    /// Extra files or directories to bundle (e.g. the preview sequence)
    pub contents: Vec<PathBuf>,
    pub icon_path: Option<PathBuf>,
    /// Engine payload type, empty for the engine default
    pub file_type: String,
    pub start_frame: Option<i32>,
    pub end_frame: Option<i32>,
    pub bake_connected: bool,
    pub metadata: Option<Metadata>,
}

impl SaveOptions {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_frame_range(mut self, start: i32, end: i32) -> Self {
        self.start_frame = Some(start);
        self.end_frame = Some(end);
        self
    }

    pub fn with_icon(mut self, icon_path: impl Into<PathBuf>) -> Self {
        self.icon_path = Some(icon_path.into());
        self
    }
}

pub struct AnimItem<B: BaseItem, C: TransferClass> {
    base: B,
    transfer_class: C,
    /// 已提交 bundle 的缓存，保存后清空
    transfer: RefCell<Option<Rc<C::Object>>>,
}

impl<B: BaseItem, C: TransferClass> AnimItem<B, C> {
    pub fn new(base: B, transfer_class: C) -> Self {
        Self {
            base,
            transfer_class,
            transfer: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        self.base.path()
    }

    /// The transfer object stored in this item's bundle
    pub fn transfer_object(&self) -> AnimResult<Rc<C::Object>> {
        if let Some(object) = self.transfer.borrow().as_ref() {
            return Ok(Rc::clone(object));
        }

        let path = self.path();
        let object = self
            .transfer_class
            .from_path(path)
            .map_err(|e| AnimItemError::InvalidBundle(format!("{}: {:#}", path.display(), e)))?;
        let object = Rc::new(object);
        *self.transfer.borrow_mut() = Some(Rc::clone(&object));
        Ok(object)
    }

    /// Return the start frame for the animation
    pub fn start_frame(&self) -> AnimResult<Option<i32>> {
        Ok(self.transfer_object()?.start_frame())
    }

    /// Return the end frame for the animation
    pub fn end_frame(&self) -> AnimResult<Option<i32>> {
        Ok(self.transfer_object()?.end_frame())
    }

    /// Image sequence location for the animation preview
    pub fn image_sequence_path(&self) -> PathBuf {
        bundle::image_sequence_path(self.path())
    }

    /// Base info with the recorded frame range inserted after the third row
    pub fn info(&self) -> AnimResult<Vec<InfoField>> {
        let mut info = self.base.info();
        let object = self.transfer_object()?;

        insert_clamped(&mut info, 3, InfoField::new("Start frame", frame_label(object.start_frame())));
        insert_clamped(&mut info, 4, InfoField::new("End frame", frame_label(object.end_frame())));

        Ok(info)
    }

    /// Option schema for the options panel
    pub fn load_options(&self) -> AnimResult<Vec<OptionDescriptor>> {
        let object = self.transfer_object()?;
        let start = object.start_frame().unwrap_or(0);
        let end = object.end_frame().unwrap_or(0);

        Ok(vec![
            OptionDescriptor::new("connect", OptionKind::Bool, false),
            OptionDescriptor::new("currentTime", OptionKind::Bool, true),
            OptionDescriptor::new("source", OptionKind::Range, json!([start, end]))
                .with_persistent(false),
            OptionDescriptor::new("option", OptionKind::Enum, REPLACE_ALL_LABEL)
                .with_items(ReplayOption::ALL.iter().map(|opt| opt.label())),
        ])
    }

    /// Build the request [`load`](Self::load) forwards to the replay engine
    pub fn resolve_load(
        &self,
        objects: &[String],
        namespaces: &[String],
        options: &LoadOptions,
    ) -> AnimResult<LoadRequest> {
        let option = options.option.as_deref().ok_or(AnimItemError::MissingOption)?;
        let option = normalize_option(option);

        let object = self.transfer_object()?;
        let source_time =
            resolve_source_time(options.source, object.start_frame(), object.end_frame());

        Ok(LoadRequest {
            objects: objects.to_vec(),
            namespaces: namespaces.to_vec(),
            option,
            connect: options.connect,
            current_time: options.current_time,
            start_frame: options.start_frame,
            source_time,
        })
    }

    /// Replay the bundle onto `objects`
    pub fn load(
        &self,
        objects: &[String],
        namespaces: &[String],
        options: &LoadOptions,
    ) -> AnimResult<()> {
        log::info!("Loading: {}", self.path().display());

        let request = self.resolve_load(objects, namespaces, options)?;
        self.transfer_object()?.load(&request)?;

        log::info!("Loaded: {}", self.path().display());
        Ok(())
    }

    /// Capture `objects` and commit them as a bundle
    pub fn save(&mut self, objects: &[String], options: SaveOptions) -> AnimResult<()> {
        let SaveOptions {
            path,
            mut contents,
            icon_path,
            file_type,
            start_frame,
            end_frame,
            bake_connected,
            metadata,
        } = options;

        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => bundle::with_bundle_extension(&p),
            _ => self.path().to_path_buf(),
        };

        // 每次保存使用全新的暂存目录
        let staging = tempfile::Builder::new().prefix("transfer").tempdir()?;
        let temp_path = staging.path().join(bundle::TRANSFER_NAME);
        log::debug!("Staging {} in {}", path.display(), temp_path.display());

        let mut anim = self.transfer_class.from_objects(objects)?;
        if let Some(metadata) = &metadata {
            anim.update_metadata(metadata);
        }
        anim.save(
            &temp_path,
            &ExportOptions {
                file_type,
                time: (start_frame, end_frame),
                bake_connected,
            },
        )?;

        if let Some(icon_path) = icon_path {
            contents.push(icon_path);
        }
        contents.extend(anim.paths());
        log::debug!("Bundle contents: {:?}", contents);

        self.base.save(&path, &contents)?;
        self.transfer.replace(None);
        Ok(())
    }
}

fn frame_label(frame: Option<i32>) -> String {
    match frame {
        Some(frame) => itoa::Buffer::new().format(frame).to_string(),
        None => "None".to_string(),
    }
}
