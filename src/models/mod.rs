pub mod clip;
pub mod info;
pub mod keyframe;
pub mod options;
pub mod replay;
pub mod time_range;

pub use clip::Clip;
pub use info::InfoField;
pub use keyframe::{Curve, Keyframe};
pub use options::{OptionDescriptor, OptionKind};
pub use replay::{LoadOptions, LoadRequest, ReplayOption};
pub use time_range::TimeRange;
