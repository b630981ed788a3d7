//! JSON keyframe payload: `{node: {attr: [{frame, value}, ...]}}`

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Clip;

pub fn parse_clip_json(path: &Path) -> Result<Clip> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read: {}", path.display()))?;
    let clip: Clip = serde_json::from_str(&content)
        .with_context(|| format!("Invalid animation payload: {}", path.display()))?;
    Ok(clip)
}

pub fn write_clip_json(clip: &Clip, path: &Path) -> Result<()> {
    let content = serde_json::to_string(clip)?;
    std::fs::write(path, content)
        .with_context(|| format!("Unable to create: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Curve, Keyframe};

    #[test]
    fn test_payload_layout() {
        let mut clip = Clip::new();
        clip.insert("pCube1", "translateX", Curve::from_keys([Keyframe::new(0, 1.5)]));

        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"pCube1": {"translateX": [{"frame": 0, "value": 1.5}]}})
        );
    }

    #[test]
    fn test_unsorted_keys_are_normalized_on_read() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("animation.json");
        std::fs::write(
            &path,
            r#"{"pCube1": {"ty": [{"frame": 10, "value": 1.0}, {"frame": 0, "value": 0.0}]}}"#,
        )
        .unwrap();

        let clip = parse_clip_json(&path).unwrap();
        let frames: Vec<i32> = clip
            .curve("pCube1", "ty")
            .unwrap()
            .keys()
            .iter()
            .map(|k| k.frame)
            .collect();
        assert_eq!(frames, vec![0, 10]);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("animation.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(parse_clip_json(&path).is_err());
        assert!(parse_clip_json(&temp.path().join("missing.json")).is_err());
    }
}
