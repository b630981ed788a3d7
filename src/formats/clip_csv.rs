//! CSV keyframe payload
//!
//! Layout:
//! - First row: `Frame`, then one `node.attr` column per curve
//! - Data rows: frame number, then the key value or an empty cell when the
//!   curve has no key on that frame

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

use crate::limits::MAX_FRAMES;
use crate::models::{Clip, Curve};

const FRAME_COLUMN: &str = "Frame";

pub fn parse_clip_csv(path: &Path) -> Result<Clip> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Unable to open: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| "Failed to parse CSV header")?
        .clone();

    if headers.get(0) != Some(FRAME_COLUMN) {
        bail!("Invalid animation CSV: first column must be '{}'", FRAME_COLUMN);
    }

    // 列 -> (节点, 属性)
    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    for name in headers.iter().skip(1) {
        match name.split_once('.') {
            Some((node, attr)) if !node.is_empty() && !attr.is_empty() => {
                columns.push((node.to_string(), attr.to_string(), Curve::new()));
            }
            _ => bail!("Invalid animation CSV column: '{}'", name),
        }
    }

    for (row_idx, record) in reader.records().enumerate() {
        if row_idx >= MAX_FRAMES {
            bail!("Too many frames in animation CSV (max: {})", MAX_FRAMES);
        }
        let record = record.with_context(|| "Failed to parse CSV")?;

        let frame_str = record.get(0).unwrap_or("").trim();
        let frame: i32 = frame_str
            .parse()
            .with_context(|| format!("Invalid frame number: '{}'", frame_str))?;

        for (col_idx, (_, _, curve)) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx + 1).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell
                .parse()
                .with_context(|| format!("Invalid key value at frame {}: '{}'", frame, cell))?;
            curve.set_key(frame, value);
        }
    }

    let mut clip = Clip::new();
    for (node, attr, curve) in columns {
        clip.insert(node, attr, curve);
    }
    Ok(clip)
}

pub fn write_clip_csv(clip: &Clip, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create: {}", path.display()))?;

    let curves: Vec<(&str, &str, &Curve)> = clip.curves().collect();

    let mut header = Vec::with_capacity(curves.len() + 1);
    header.push(FRAME_COLUMN.to_string());
    header.extend(curves.iter().map(|(node, attr, _)| format!("{}.{}", node, attr)));
    writer.write_record(&header)?;

    let frames: BTreeSet<i32> = curves
        .iter()
        .flat_map(|(_, _, curve)| curve.keys().iter().map(|k| k.frame))
        .collect();

    // 每条曲线一个游标，按帧顺序推进
    let mut cursors = vec![0usize; curves.len()];
    let mut frame_buf = itoa::Buffer::new();
    for frame in frames {
        let mut row = Vec::with_capacity(curves.len() + 1);
        row.push(frame_buf.format(frame).to_string());

        for (idx, (_, _, curve)) in curves.iter().enumerate() {
            let keys = curve.keys();
            match keys.get(cursors[idx]) {
                Some(key) if key.frame == frame => {
                    row.push(key.value.to_string());
                    cursors[idx] += 1;
                }
                _ => row.push(String::new()),
            }
        }
        writer.write_record(&row)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(())
}
