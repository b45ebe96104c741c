use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an item. Numeric ids come from the sample datasets;
/// string ids are accepted from data files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(u64),
    Text(String),
}

impl ItemId {
    /// Numeric when the token parses as `u64`, text otherwise.
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        match trimmed.parse::<u64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,

    /// Named text fields (`name`, `location`, ...). The owning list decides
    /// which of them are searchable.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub flags: BTreeMap<String, bool>,

    /// Display-only attributes passed through to the renderer.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl Item {
    pub fn new(id: u64) -> Self {
        Self::with_id(ItemId::Num(id))
    }

    pub fn with_id(id: ItemId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
            category: None,
            flags: BTreeMap::new(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.flags.insert(name.to_string(), value);
        self
    }

    pub fn with_detail(mut self, name: &str, value: impl ToString) -> Self {
        self.details.insert(name.to_string(), value.to_string());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn detail(&self, name: &str) -> Option<&str> {
        self.details.get(name).map(String::as_str)
    }

    /// Absent flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        let next = !self.flag(name);
        self.flags.insert(name.to_string(), next);
        next
    }

    /// Values of `selector` in selector order, skipping fields the item lacks.
    pub fn searchable<'a>(&'a self, selector: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        selector.iter().filter_map(|name| self.field(name))
    }

    /// First of `name`, `title`, `destination`, `task`, else the id.
    pub fn label(&self) -> String {
        ["name", "title", "destination", "task"]
            .iter()
            .find_map(|key| self.field(key))
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}
