//! In-memory scene the clip engine captures from and replays onto

use std::collections::BTreeMap;

use crate::models::Curve;

/// 动画属性：关键帧曲线，可选地由其他属性驱动
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub curve: Curve,
    /// Driving plug as `node.attr`
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeMap<String, BTreeMap<String, Attribute>>,
    current_time: i32,
}

/// Split a `node.attr` plug at the first dot
pub fn split_plug(plug: &str) -> Option<(&str, &str)> {
    plug.split_once('.')
        .filter(|(node, attr)| !node.is_empty() && !attr.is_empty())
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>) {
        self.nodes.entry(name.into()).or_default();
    }

    #[inline]
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn attributes(&self, node: &str) -> Option<&BTreeMap<String, Attribute>> {
        self.nodes.get(node)
    }

    pub fn attribute(&self, node: &str, attr: &str) -> Option<&Attribute> {
        self.nodes.get(node)?.get(attr)
    }

    /// Attribute on an existing node, created when missing
    pub fn attribute_mut(&mut self, node: &str, attr: &str) -> Option<&mut Attribute> {
        Some(self.nodes.get_mut(node)?.entry(attr.to_string()).or_default())
    }

    pub fn curve(&self, node: &str, attr: &str) -> Option<&Curve> {
        self.attribute(node, attr).map(|a| &a.curve)
    }

    /// Key `node.attr`, creating the node when needed
    pub fn set_key(&mut self, node: &str, attr: &str, frame: i32, value: f64) {
        self.add_node(node);
        if let Some(attribute) = self.attribute_mut(node, attr) {
            attribute.curve.set_key(frame, value);
        }
    }

    /// Drive `node.attr` from `driver` (`node.attr`)
    pub fn connect(&mut self, node: &str, attr: &str, driver: impl Into<String>) {
        self.add_node(node);
        if let Some(attribute) = self.attribute_mut(node, attr) {
            attribute.driver = Some(driver.into());
        }
    }

    /// Curve of the plug driving `node.attr`, if any
    pub fn driver_curve(&self, node: &str, attr: &str) -> Option<&Curve> {
        let driver = self.attribute(node, attr)?.driver.as_deref()?;
        let (driver_node, driver_attr) = split_plug(driver)?;
        self.curve(driver_node, driver_attr)
    }

    #[inline]
    pub fn current_time(&self) -> i32 {
        self.current_time
    }

    pub fn set_current_time(&mut self, frame: i32) {
        self.current_time = frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_lookup() {
        let mut scene = MemoryScene::new();
        scene.set_key("ctrl", "tx", 0, 1.0);
        scene.connect("pCube1", "tx", "ctrl.tx");

        assert_eq!(scene.driver_curve("pCube1", "tx"), scene.curve("ctrl", "tx"));
        assert_eq!(scene.driver_curve("ctrl", "tx"), None);

        scene.connect("pCube2", "tx", "bogus");
        assert_eq!(scene.driver_curve("pCube2", "tx"), None);
    }

    #[test]
    fn test_attribute_mut_requires_node() {
        let mut scene = MemoryScene::new();
        assert!(scene.attribute_mut("missing", "tx").is_none());

        scene.add_node("pCube1");
        assert!(scene.attribute_mut("pCube1", "tx").is_some());
        assert!(scene.attribute("pCube1", "tx").unwrap().curve.is_empty());
    }
}
