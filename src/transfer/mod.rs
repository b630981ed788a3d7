//! Seams to the curve capture / replay engine.
//!
//! [`TransferClass`] snapshots scene nodes or reopens a committed bundle;
//! the resulting [`TransferObject`] serializes itself and replays onto the
//! scene. The anim item only ever talks to these two traits.

pub mod clip;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::models::LoadRequest;

pub use clip::{ClipTransfer, ClipTransferClass};

/// Free-form metadata stored alongside the payload
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Serialization parameters for [`TransferObject::save`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Engine-specific payload type; empty selects the engine default
    pub file_type: String,
    /// Export window; `None` ends keep whatever was captured
    pub time: (Option<i32>, Option<i32>),
    /// Flatten driven attributes into plain curves
    pub bake_connected: bool,
}

pub trait TransferObject {
    fn update_metadata(&mut self, metadata: &Metadata);

    /// Serialize to `path`, recording every written file for [`paths`](Self::paths)
    fn save(&mut self, path: &Path, options: &ExportOptions) -> Result<()>;

    /// Replay onto the scene
    fn load(&self, request: &LoadRequest) -> Result<()>;

    /// Files written by the last `save`, or read when opened from disk
    fn paths(&self) -> Vec<PathBuf>;

    fn start_frame(&self) -> Option<i32>;

    fn end_frame(&self) -> Option<i32>;
}

pub trait TransferClass {
    type Object: TransferObject;

    /// Snapshot the current animation of `objects`
    fn from_objects(&self, objects: &[String]) -> Result<Self::Object>;

    /// Open the payload stored in a committed bundle
    fn from_path(&self, path: &Path) -> Result<Self::Object>;
}
