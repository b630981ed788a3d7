//! Declarative load-option schema consumed by the options panel

use serde::Serialize;
use serde_json::Value;

/// Control kind of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Bool,
    Range,
    Enum,
}

/// One option descriptor: `{name, type, default, [items], [persistent]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub default: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// `None` leaves persistence to the panel (persisted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
}

impl OptionDescriptor {
    pub fn new(name: impl Into<String>, kind: OptionKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: default.into(),
            items: Vec::new(),
            persistent: None,
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistent.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_json_shape() {
        let enum_opt = OptionDescriptor::new("option", OptionKind::Enum, "replace all")
            .with_items(["replace", "replace all"]);
        assert_eq!(
            serde_json::to_value(&enum_opt).unwrap(),
            json!({"name": "option", "type": "enum", "default": "replace all", "items": ["replace", "replace all"]})
        );

        let range_opt = OptionDescriptor::new("source", OptionKind::Range, json!([0, 10]))
            .with_persistent(false);
        assert_eq!(
            serde_json::to_value(&range_opt).unwrap(),
            json!({"name": "source", "type": "range", "default": [0, 10], "persistent": false})
        );
        assert!(!range_opt.is_persistent());
    }
}
