//! On-disk layout of `.anim` bundles.
//!
//! A bundle is a directory containing:
//! - the payload files written by the transfer engine
//! - an optional icon (e.g. `thumbnail.png`)
//! - an optional `sequence/` directory of numbered preview frames

use std::path::{Path, PathBuf};

/// Bundle file extension (without the dot)
pub const BUNDLE_EXTENSION: &str = "anim";

/// Preview image sequence subdirectory
pub const SEQUENCE_DIR: &str = "sequence";

/// Name the engine serializes into inside the staging directory
pub const TRANSFER_NAME: &str = "transfer.anim";

/// Menu entry the item registers under
pub const MENU_NAME: &str = "Animation";

/// Append `.anim` unless the path already carries it
pub fn with_bundle_extension(path: &Path) -> PathBuf {
    if has_bundle_extension(path) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(BUNDLE_EXTENSION);
    PathBuf::from(name)
}

pub fn has_bundle_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == BUNDLE_EXTENSION)
}

/// Check if a path is a committed anim bundle
pub fn is_anim_bundle(path: &Path) -> bool {
    has_bundle_extension(path) && path.is_dir()
}

/// Get the preview sequence path for a bundle
pub fn image_sequence_path(bundle_path: &Path) -> PathBuf {
    bundle_path.join(SEQUENCE_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_not_duplicated() {
        assert_eq!(
            with_bundle_extension(Path::new("/lib/char/walk")),
            PathBuf::from("/lib/char/walk.anim")
        );
        assert_eq!(
            with_bundle_extension(Path::new("/lib/char/walk.anim")),
            PathBuf::from("/lib/char/walk.anim")
        );
        // 其他扩展名保留
        assert_eq!(
            with_bundle_extension(Path::new("/lib/char/walk.v2")),
            PathBuf::from("/lib/char/walk.v2.anim")
        );
    }

    #[test]
    fn test_sequence_path() {
        assert_eq!(
            image_sequence_path(Path::new("/lib/walk.anim")),
            PathBuf::from("/lib/walk.anim/sequence")
        );
    }

    #[test]
    fn test_is_anim_bundle() {
        let temp = tempfile::tempdir().unwrap();
        let bundle = temp.path().join("walk.anim");
        assert!(!is_anim_bundle(&bundle));

        std::fs::create_dir(&bundle).unwrap();
        assert!(is_anim_bundle(&bundle));

        let plain = temp.path().join("walk");
        std::fs::create_dir(&plain).unwrap();
        assert!(!is_anim_bundle(&plain));
    }
}
