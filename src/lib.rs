pub mod anim_item;
pub mod bundle;
pub mod create;
pub mod error;
pub mod formats;
pub mod item;
pub mod models;
pub mod scene;
pub mod settings;
pub mod transfer;

/// Shared constants for resource limits
pub mod limits {
    /// Maximum number of frames sampled or parsed for one clip
    pub const MAX_FRAMES: usize = 100_000;
}

// Re-export commonly used types
pub use anim_item::{AnimItem, SaveOptions};
pub use create::AnimCreateForm;
pub use error::{AnimItemError, AnimResult};
pub use formats::FileType;
pub use item::{BaseItem, LibraryItem};
pub use models::{LoadOptions, LoadRequest, ReplayOption, TimeRange};
pub use settings::AnimSettings;
pub use transfer::{ExportOptions, Metadata, TransferClass, TransferObject};
