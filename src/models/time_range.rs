use serde::{Deserialize, Serialize};

/// 帧范围 (start, end)
///
/// Serialized as a two element array `[start, end]`. `start <= end` is
/// expected but left to the curve engine to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct TimeRange {
    pub start: i32,
    pub end: i32,
}

impl TimeRange {
    /// `[0, 0]` as stored by older option state, meaning "use the bundle's range"
    pub const UNSET: TimeRange = TimeRange { start: 0, end: 0 };

    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// Collapse the legacy sentinel into `None`
    pub fn explicit(range: Option<TimeRange>) -> Option<TimeRange> {
        range.filter(|r| !r.is_unset())
    }

    /// 帧数差
    #[inline]
    pub fn duration(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }

    /// Number of whole frames covered, both ends included
    #[inline]
    pub fn frame_count(&self) -> usize {
        usize::try_from(self.duration().max(0)).unwrap_or(usize::MAX).saturating_add(1)
    }

    #[inline]
    pub fn contains(&self, frame: i32) -> bool {
        frame >= self.start && frame <= self.end
    }

    /// Move both ends by `delta`; `None` when either end leaves the `i32` range
    pub fn checked_offset(&self, delta: i32) -> Option<Self> {
        Some(Self::new(self.start.checked_add(delta)?, self.end.checked_add(delta)?))
    }
}

impl From<[i32; 2]> for TimeRange {
    fn from([start, end]: [i32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<TimeRange> for [i32; 2] {
    fn from(range: TimeRange) -> Self {
        [range.start, range.end]
    }
}

impl From<(i32, i32)> for TimeRange {
    fn from((start, end): (i32, i32)) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_unset() {
        assert!(TimeRange::new(0, 0).is_unset());
        assert!(!TimeRange::new(0, 1).is_unset());
        assert_eq!(TimeRange::explicit(Some(TimeRange::UNSET)), None);
        assert_eq!(
            TimeRange::explicit(Some(TimeRange::new(50, 100))),
            Some(TimeRange::new(50, 100))
        );
        assert_eq!(TimeRange::explicit(None), None);
    }

    #[test]
    fn test_serde_array_form() {
        let range = TimeRange::new(-5, 12);
        assert_eq!(serde_json::to_string(&range).unwrap(), "[-5,12]");

        let parsed: TimeRange = serde_json::from_str("[1,24]").unwrap();
        assert_eq!(parsed, TimeRange::new(1, 24));
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(TimeRange::new(0, 200).frame_count(), 201);
        assert_eq!(TimeRange::new(10, 10).frame_count(), 1);
        assert_eq!(TimeRange::new(10, 5).frame_count(), 1);
        assert!(TimeRange::new(0, 200).contains(200));
        assert!(!TimeRange::new(0, 200).contains(201));
        assert_eq!(TimeRange::new(i32::MIN, i32::MAX).frame_count(), 1 << 32);
    }

    #[test]
    fn test_checked_offset() {
        assert_eq!(TimeRange::new(0, 200).checked_offset(-10), Some(TimeRange::new(-10, 190)));
        assert_eq!(
            TimeRange::new(0, 100).checked_offset(i32::MAX - 100),
            Some(TimeRange::new(i32::MAX - 100, i32::MAX))
        );
        assert_eq!(TimeRange::new(0, 200).checked_offset(i32::MAX - 100), None);
        assert_eq!(TimeRange::new(-5, 0).checked_offset(i32::MIN), None);
    }
}
