use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::keyframe::Curve;
use super::time_range::TimeRange;

/// 属性名 -> 曲线
pub type AttributeCurves = BTreeMap<String, Curve>;

/// 动画片段：节点 -> 属性 -> 曲线
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clip {
    nodes: BTreeMap<String, AttributeCurves>,
}

impl Clip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: impl Into<String>, attr: impl Into<String>, curve: Curve) {
        self.nodes
            .entry(node.into())
            .or_default()
            .insert(attr.into(), curve);
    }

    pub fn curve(&self, node: &str, attr: &str) -> Option<&Curve> {
        self.nodes.get(node)?.get(attr)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &AttributeCurves)> {
        self.nodes.iter().map(|(name, attrs)| (name.as_str(), attrs))
    }

    /// Every (node, attribute, curve) triple in name order
    pub fn curves(&self) -> impl Iterator<Item = (&str, &str, &Curve)> {
        self.nodes.iter().flat_map(|(node, attrs)| {
            attrs
                .iter()
                .map(move |(attr, curve)| (node.as_str(), attr.as_str(), curve))
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 所有曲线的并集帧范围
    pub fn frame_range(&self) -> Option<TimeRange> {
        self.curves()
            .filter_map(|(_, _, curve)| curve.frame_range())
            .reduce(|a, b| TimeRange::new(a.start.min(b.start), a.end.max(b.end)))
    }
}

/// Strip any `ns:` prefixes from a node name
pub fn short_name(node: &str) -> &str {
    node.rsplit(':').next().unwrap_or(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::keyframe::Keyframe;

    #[test]
    fn test_frame_range_spans_all_curves() {
        let mut clip = Clip::new();
        clip.insert("pCube1", "translateX", Curve::from_keys([Keyframe::new(5, 0.0), Keyframe::new(40, 1.0)]));
        clip.insert("pCube1", "rotateY", Curve::from_keys([Keyframe::new(-2, 0.0)]));
        clip.insert("pSphere1", "scaleZ", Curve::new());

        assert_eq!(clip.frame_range(), Some(TimeRange::new(-2, 40)));
        assert_eq!(clip.curves().count(), 3);
        assert_eq!(Clip::new().frame_range(), None);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("pCube1"), "pCube1");
        assert_eq!(short_name("char:pCube1"), "pCube1");
        assert_eq!(short_name("a:b:pCube1"), "pCube1");
    }
}
