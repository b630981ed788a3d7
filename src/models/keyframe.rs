use serde::{Deserialize, Serialize};
use super::time_range::TimeRange;

/// 关键帧：某一帧上的属性值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// 帧编号
    pub frame: i32,
    /// 属性值
    pub value: f64,
}

impl Keyframe {
    pub fn new(frame: i32, value: f64) -> Self {
        Self { frame, value }
    }
}

/// 动画曲线：按帧号排序的关键帧集合
///
/// At most one key per frame; setting a key on an occupied frame overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut curve = Self::new();
        for key in keys {
            curve.set_key(key.frame, key.value);
        }
        curve
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn set_key(&mut self, frame: i32, value: f64) {
        match self.keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(idx) => self.keys[idx].value = value,
            Err(idx) => self.keys.insert(idx, Keyframe::new(frame, value)),
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Remove every key inside `range` (both ends included)
    pub fn remove_range(&mut self, range: TimeRange) {
        self.keys.retain(|k| !range.contains(k.frame));
    }

    /// Move every key at or after `from` by `delta` frames.
    ///
    /// Returns `false` and leaves the curve untouched if a key would leave
    /// the `i32` frame range.
    #[must_use]
    pub fn shift_from(&mut self, from: i32, delta: i32) -> bool {
        let shifted: Option<Vec<Keyframe>> = self
            .keys
            .iter()
            .map(|k| {
                if k.frame >= from {
                    Some(Keyframe::new(k.frame.checked_add(delta)?, k.value))
                } else {
                    Some(*k)
                }
            })
            .collect();

        let Some(mut keys) = shifted else {
            return false;
        };
        // 负偏移可能打乱顺序
        keys.sort_by_key(|k| k.frame);
        keys.dedup_by_key(|k| k.frame);
        self.keys = keys;
        true
    }

    /// Keys inside `range`, moved by `delta`. Keys that would leave the
    /// `i32` frame range are dropped.
    pub fn slice(&self, range: TimeRange, delta: i32) -> Curve {
        Curve {
            keys: self
                .keys
                .iter()
                .filter(|k| range.contains(k.frame))
                .filter_map(|k| Some(Keyframe::new(k.frame.checked_add(delta)?, k.value)))
                .collect(),
        }
    }

    /// Overlay `other` on this curve, replacing keys on shared frames
    pub fn merge(&mut self, other: &Curve) {
        for key in &other.keys {
            self.set_key(key.frame, key.value);
        }
    }

    /// 根据帧号插值计算属性值
    /// 如果帧号在关键帧之间，进行线性插值
    pub fn evaluate(&self, frame: i32) -> Option<f64> {
        if self.keys.is_empty() {
            return None;
        }

        let idx = match self.keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(idx) => return Some(self.keys[idx].value),
            Err(idx) => idx,
        };

        // 线性插值
        match (idx.checked_sub(1).map(|i| &self.keys[i]), self.keys.get(idx)) {
            (Some(prev), Some(next)) => {
                let t = (f64::from(frame) - f64::from(prev.frame))
                    / (f64::from(next.frame) - f64::from(prev.frame));
                Some(lerp(prev.value, next.value, t))
            }
            (Some(prev), None) => Some(prev.value), // 超出范围，使用最后一帧
            (None, Some(next)) => Some(next.value), // 超出范围，使用第一帧
            (None, None) => None,
        }
    }

    /// 获取帧范围
    pub fn frame_range(&self) -> Option<TimeRange> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        Some(TimeRange::new(first.frame, last.frame))
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

/// 线性插值函数
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
