//! Create-form state for new anim items, minus the widgets

use std::fs;
use std::path::{Path, PathBuf};

use crate::anim_item::{AnimItem, SaveOptions};
use crate::error::{AnimItemError, AnimResult};
use crate::formats::FileType;
use crate::item::BaseItem;
use crate::models::TimeRange;
use crate::settings::{AnimSettings, BY_FRAME_RANGE};
use crate::transfer::{Metadata, TransferClass};

/// Duration above which a "by frame" of 1 is worth questioning
pub const LONG_CAPTURE_FRAMES: i32 = 100;

/// Frame range shown before the scene range is known
const DEFAULT_FRAME_RANGE: (i32, i32) = (1, 100);

#[derive(Debug, Clone, PartialEq)]
pub struct AnimCreateForm {
    start_frame: Option<i32>,
    end_frame: Option<i32>,
    by_frame: u32,
    file_type: FileType,
    bake_connected: bool,
    icon_path: Option<PathBuf>,
    sequence_path: Option<PathBuf>,
}

/// Parse a frame field the way the line edits accept it ("12", " 12.7 ")
pub fn parse_frame(text: &str) -> Option<i32> {
    let value: f64 = text.trim().parse().ok()?;
    value.is_finite().then_some(value as i32)
}

impl AnimCreateForm {
    pub fn new(settings: &AnimSettings) -> Self {
        let mut form = Self {
            start_frame: Some(DEFAULT_FRAME_RANGE.0),
            end_frame: Some(DEFAULT_FRAME_RANGE.1),
            by_frame: 1,
            file_type: settings.file_type,
            bake_connected: false,
            icon_path: None,
            sequence_path: None,
        };
        form.set_by_frame(settings.by_frame);
        form
    }

    pub fn start_frame(&self) -> Option<i32> {
        self.start_frame
    }

    pub fn end_frame(&self) -> Option<i32> {
        self.end_frame
    }

    pub fn set_start_frame(&mut self, frame: Option<i32>) {
        self.start_frame = frame;
    }

    pub fn set_end_frame(&mut self, frame: Option<i32>) {
        self.end_frame = frame;
    }

    /// Set both ends; a single frame widens to one frame long
    pub fn set_frame_range(&mut self, start: i32, mut end: i32) {
        if start == end {
            end = end.saturating_add(1);
        }
        self.start_frame = Some(start);
        self.end_frame = Some(end);
    }

    pub fn duration(&self) -> Option<i32> {
        self.end_frame?.checked_sub(self.start_frame?)
    }

    pub fn validate_frame_range(&self) -> AnimResult<TimeRange> {
        match (self.start_frame, self.end_frame) {
            (Some(start), Some(end)) => Ok(TimeRange::new(start, end)),
            _ => Err(AnimItemError::MissingFrameRange),
        }
    }

    /// Range to capture the preview from: the timeline selection, or the
    /// form's own range when nothing is selected
    pub fn capture_range(&self, selected: TimeRange) -> AnimResult<TimeRange> {
        if selected.start == selected.end {
            self.validate_frame_range()
        } else {
            Ok(selected)
        }
    }

    pub fn by_frame(&self) -> u32 {
        self.by_frame
    }

    pub fn set_by_frame(&mut self, by_frame: u32) {
        self.by_frame = by_frame.clamp(*BY_FRAME_RANGE.start(), *BY_FRAME_RANGE.end());
    }

    /// Long captures at every frame are slow
    pub fn suggest_by_frame(&self) -> bool {
        self.duration().is_some_and(|d| d > LONG_CAPTURE_FRAMES) && self.by_frame == 1
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn set_file_type(&mut self, file_type: FileType) {
        self.file_type = file_type;
    }

    pub fn bake_connected(&self) -> bool {
        self.bake_connected
    }

    pub fn set_bake_connected(&mut self, bake: bool) {
        self.bake_connected = bake;
    }

    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    pub fn set_icon_path(&mut self, path: impl Into<PathBuf>) {
        self.icon_path = Some(path.into());
    }

    /// First frame of the captured preview sequence
    pub fn sequence_path(&self) -> Option<&Path> {
        self.sequence_path.as_deref()
    }

    pub fn set_sequence_path(&mut self, path: impl Into<PathBuf>) {
        self.sequence_path = Some(path.into());
    }

    /// A preview was captured: its first frame becomes the icon
    pub fn thumbnail_captured(&mut self, playblast_path: &Path, thumbnail_path: &Path) -> AnimResult<()> {
        fs::copy(playblast_path, thumbnail_path)?;
        self.set_icon_path(thumbnail_path);
        self.set_sequence_path(playblast_path);
        Ok(())
    }

    /// Values worth remembering for the next form
    pub fn settings(&self) -> AnimSettings {
        AnimSettings {
            by_frame: self.by_frame,
            file_type: self.file_type,
        }
    }

    pub fn save_options(&self, path: &Path, metadata: Option<Metadata>) -> SaveOptions {
        let contents = self
            .sequence_path
            .as_deref()
            .and_then(Path::parent)
            .map(|dir| vec![dir.to_path_buf()])
            .unwrap_or_default();

        SaveOptions {
            path: Some(path.to_path_buf()),
            contents,
            icon_path: self.icon_path.clone(),
            file_type: self.file_type.as_str().to_string(),
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            bake_connected: self.bake_connected,
            metadata,
        }
    }

    pub fn save<B: BaseItem, C: TransferClass>(
        &self,
        item: &mut AnimItem<B, C>,
        objects: &[String],
        path: &Path,
        metadata: Option<Metadata>,
    ) -> AnimResult<()> {
        item.save(objects, self.save_options(path, metadata))
    }
}

impl Default for AnimCreateForm {
    fn default() -> Self {
        Self::new(&AnimSettings::default())
    }
}
