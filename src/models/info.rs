use serde::{Deserialize, Serialize};

/// 信息栏中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoField {
    pub name: String,
    pub value: String,
}

impl InfoField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Insert `field` at `index`, appending when the list is shorter
pub fn insert_clamped(info: &mut Vec<InfoField>, index: usize, field: InfoField) {
    let index = index.min(info.len());
    info.insert(index, field);
}
