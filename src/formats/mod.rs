pub mod clip_csv;
pub mod clip_json;
pub mod header;
pub mod image_sequence;

use serde::{Deserialize, Serialize};

pub use clip_csv::{parse_clip_csv, write_clip_csv};
pub use clip_json::{parse_clip_json, write_clip_json};
pub use header::{parse_header, write_header, ClipHeader, HEADER_FILE_NAME};
pub use image_sequence::ImageSequence;

/// Payload type written by the clip engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Json,
    Csv,
}

impl FileType {
    pub const ALL: [FileType; 2] = [FileType::Json, FileType::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Json => "json",
            FileType::Csv => "csv",
        }
    }

    /// Strict parse; an empty string selects the default
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "json" => Some(FileType::Json),
            "csv" => Some(FileType::Csv),
            _ => None,
        }
    }

    /// Lenient parse for stored settings
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Keyframe payload file name inside a bundle
    pub fn payload_file_name(&self) -> &'static str {
        match self {
            FileType::Json => "animation.json",
            FileType::Csv => "animation.csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_parse() {
        assert_eq!(FileType::parse(""), Some(FileType::Json));
        assert_eq!(FileType::parse("CSV"), Some(FileType::Csv));
        assert_eq!(FileType::parse("mayaAscii"), None);
        assert_eq!(FileType::from_str("mayaAscii"), FileType::Json);
        for ft in FileType::ALL {
            assert_eq!(FileType::parse(ft.as_str()), Some(ft));
        }
    }
}
