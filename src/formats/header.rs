//! `pose.json`: payload header with metadata, frame range and inventory

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::FileType;
use crate::transfer::Metadata;

/// Header schema version
pub const HEADER_VERSION: u32 = 1;

pub const HEADER_FILE_NAME: &str = "pose.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipHeader {
    pub version: u32,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub start_frame: Option<i32>,
    #[serde(default)]
    pub end_frame: Option<i32>,
    #[serde(default)]
    pub file_type: FileType,
    /// 节点 -> 属性列表
    #[serde(default)]
    pub objects: BTreeMap<String, Vec<String>>,
}

impl Default for ClipHeader {
    fn default() -> Self {
        Self {
            version: HEADER_VERSION,
            metadata: Metadata::new(),
            start_frame: None,
            end_frame: None,
            file_type: FileType::default(),
            objects: BTreeMap::new(),
        }
    }
}

pub fn parse_header(path: &Path) -> Result<ClipHeader> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read: {}", path.display()))?;
    let header: ClipHeader = serde_json::from_str(&content)
        .with_context(|| format!("Invalid pose header: {}", path.display()))?;

    if header.version > HEADER_VERSION {
        bail!(
            "Unsupported pose header version {} (expected <= {})",
            header.version,
            HEADER_VERSION
        );
    }

    Ok(header)
}

pub fn write_header(header: &ClipHeader, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(header)?;
    std::fs::write(path, content)
        .with_context(|| format!("Unable to create: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(HEADER_FILE_NAME);

        let mut header = ClipHeader {
            start_frame: Some(0),
            end_frame: Some(200),
            file_type: FileType::Csv,
            ..ClipHeader::default()
        };
        header.metadata.insert("comment".into(), "walk cycle".into());
        header.objects.insert("pCube1".into(), vec!["translateX".into()]);

        write_header(&header, &path).unwrap();
        assert_eq!(parse_header(&path).unwrap(), header);
    }

    #[test]
    fn test_newer_version_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(HEADER_FILE_NAME);
        std::fs::write(&path, r#"{"version": 99}"#).unwrap();

        let err = parse_header(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported pose header version 99"));
    }
}
