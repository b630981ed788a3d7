//! Library item capability and the filesystem commit primitive

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::InfoField;

/// What an item type needs from the library: its path, a commit primitive
/// and the generic info rows.
pub trait BaseItem {
    fn path(&self) -> &Path;

    /// Promote `contents` (files or directories) into a bundle at `path`.
    ///
    /// Either the complete bundle appears at `path` or the permanent
    /// location is left as it was.
    fn save(&mut self, path: &Path, contents: &[PathBuf]) -> Result<()>;

    fn info(&self) -> Vec<InfoField>;
}

/// Bundle directory on the local filesystem
#[derive(Debug, Clone, Default)]
pub struct LibraryItem {
    path: PathBuf,
}

impl LibraryItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BaseItem for LibraryItem {
    fn path(&self) -> &Path {
        &self.path
    }

    fn save(&mut self, path: &Path, contents: &[PathBuf]) -> Result<()> {
        commit(path, contents)?;
        self.path = path.to_path_buf();
        Ok(())
    }

    fn info(&self) -> Vec<InfoField> {
        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = self
            .path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let kind = self
            .path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let count = fs::read_dir(&self.path).map_or(0, |entries| entries.flatten().count());

        let mut buf = itoa::Buffer::new();
        vec![
            InfoField::new("Name", name),
            InfoField::new("Path", folder),
            InfoField::new("Type", kind),
            InfoField::new("Contents", buf.format(count)),
        ]
    }
}

/// Copy `contents` into a staging directory next to `path`, then rename it
/// into place. An existing bundle is moved aside first and put back when
/// the final rename fails.
pub fn commit(path: &Path, contents: &[PathBuf]) -> Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid item path: {}", path.display()))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    for content in contents {
        if !content.exists() {
            bail!("Missing bundle content: {}", content.display());
        }
    }

    fs::create_dir_all(parent)
        .with_context(|| format!("Unable to create: {}", parent.display()))?;

    // 同一目录下暂存，保证 rename 不跨文件系统
    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)
        .with_context(|| format!("Unable to stage in: {}", parent.display()))?;

    for content in contents {
        let file_name = content
            .file_name()
            .ok_or_else(|| anyhow!("Invalid content path: {}", content.display()))?;
        copy_recursively(content, &staging.path().join(file_name))?;
    }

    let previous = if path.exists() {
        let backup = tempfile::Builder::new()
            .prefix(".previous-")
            .tempdir_in(parent)?;
        let moved = backup.path().join(name);
        fs::rename(path, &moved)
            .with_context(|| format!("Unable to move aside: {}", path.display()))?;
        Some((backup, moved))
    } else {
        None
    };

    if let Err(err) = fs::rename(staging.path(), path) {
        if let Some((_, moved)) = &previous {
            if let Err(restore_err) = fs::rename(moved, path) {
                log::error!("Unable to restore {}: {}", path.display(), restore_err);
            }
        }
        return Err(err).with_context(|| format!("Unable to commit: {}", path.display()));
    }

    log::debug!("Committed {} item(s) to {}", contents.len(), path.display());

    // staging 已被移走；backup 在此处删除旧版本
    Ok(())
}

fn copy_recursively(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)
            .with_context(|| format!("Unable to create: {}", dst.display()))?;
        for entry in fs::read_dir(src)
            .with_context(|| format!("Unable to read: {}", src.display()))?
        {
            let entry = entry?;
            copy_recursively(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)
            .with_context(|| format!("Unable to copy {} to {}", src.display(), dst.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_commit_files_and_directories() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("sequence")).unwrap();
        fs::write(src.join("pose.json"), "{}").unwrap();
        fs::write(src.join("sequence/frame.0001.png"), "png").unwrap();

        let dest = temp.path().join("lib/walk.anim");
        commit(&dest, &[src.join("pose.json"), src.join("sequence")]).unwrap();

        assert_eq!(listing(&dest), vec!["pose.json", "sequence"]);
        assert_eq!(listing(&dest.join("sequence")), vec!["frame.0001.png"]);
        // 没有残留的暂存目录
        assert_eq!(listing(&temp.path().join("lib")), vec!["walk.anim"]);
    }

    #[test]
    fn test_commit_replaces_existing_bundle() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("walk.anim");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.json"), "old").unwrap();

        let fresh = temp.path().join("pose.json");
        fs::write(&fresh, "new").unwrap();
        commit(&dest, &[fresh]).unwrap();

        assert_eq!(listing(&dest), vec!["pose.json"]);
        assert_eq!(fs::read_to_string(dest.join("pose.json")).unwrap(), "new");
    }

    #[test]
    fn test_missing_content_leaves_bundle_untouched() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("walk.anim");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("pose.json"), "old").unwrap();

        let err = commit(&dest, &[temp.path().join("nope.json")]).unwrap_err();
        assert!(err.to_string().contains("Missing bundle content"));

        assert_eq!(listing(&dest), vec!["pose.json"]);
        assert_eq!(fs::read_to_string(dest.join("pose.json")).unwrap(), "old");
    }

    #[test]
    fn test_library_item_info() {
        let temp = tempdir().unwrap();
        let icon = temp.path().join("thumbnail.png");
        fs::write(&icon, "png").unwrap();

        let mut item = LibraryItem::new(temp.path().join("unused.anim"));
        let dest = temp.path().join("walk.anim");
        item.save(&dest, &[icon]).unwrap();

        assert_eq!(item.path(), dest.as_path());
        let info = item.info();
        assert_eq!(info[0], InfoField::new("Name", "walk"));
        assert_eq!(info[2], InfoField::new("Type", "anim"));
        assert_eq!(info[3], InfoField::new("Contents", "1"));
    }
}
