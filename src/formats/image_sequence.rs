// src/formats/image_sequence.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static RE_FRAME_NUM: OnceLock<regex::Regex> = OnceLock::new();

/// 预览序列帧：按文件名末尾数字排序的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSequence {
    dir: PathBuf,
    frames: Vec<(u32, PathBuf)>,
}

/// 提取文件名末尾的数字，例如 "thumbnail.0005" -> 5
fn frame_number(path: &Path) -> Option<u32> {
    let re = RE_FRAME_NUM.get_or_init(|| regex::Regex::new(r"(\d+)$").unwrap());
    let stem = path.file_stem()?.to_str()?;
    re.captures(stem)?.get(1)?.as_str().parse().ok()
}

impl ImageSequence {
    /// Scan `dir` for numbered frames. Files without a trailing number are ignored.
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Unable to read sequence: {}", dir.display()))?;

        let mut frames: Vec<(u32, PathBuf)> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| frame_number(&path).map(|num| (num, path)))
            .collect();
        frames.sort();

        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().map(|(_, path)| path.as_path())
    }

    pub fn first_frame(&self) -> Option<&Path> {
        self.frames.first().map(|(_, path)| path.as_path())
    }

    /// 核心算法：无视前缀，按文件名中的数字查找
    pub fn find_by_index(&self, target_index: u32) -> Option<&Path> {
        self.frames
            .binary_search_by_key(&target_index, |(num, _)| *num)
            .ok()
            .map(|idx| self.frames[idx].1.as_path())
    }

    /// Pixel size of the first frame
    pub fn dimensions(&self) -> Result<Option<(u32, u32)>> {
        match self.first_frame() {
            Some(path) => {
                let size = image::image_dimensions(path)
                    .with_context(|| format!("Unable to read image: {}", path.display()))?;
                Ok(Some(size))
            }
            None => Ok(None),
        }
    }
}
