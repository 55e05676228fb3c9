//! Implementation-side input types.
//!
//! These represent rendered DOM elements with their computed styles, as
//! extracted from a live page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::core::BoundingRect;

/// A snapshot of the rendered implementation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationTree {
    pub url: Option<String>,
    pub title: Option<String>,
    pub extracted_at: Option<String>,
    #[serde(default, alias = "nodes")]
    pub elements: Option<Vec<ImplementationNode>>,
}

/// A single rendered element.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationNode {
    #[serde(default)]
    pub selector: String,
    #[serde(alias = "tag")]
    pub tag_name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub text: Option<String>,
    /// HTML attributes (alt, aria-*, href, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    /// Inline or author styles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, Value>,
    /// Browser computed styles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub computed_styles: BTreeMap<String, Value>,
    pub bounding_rect: Option<BoundingRect>,
}

impl ImplementationNode {
    /// Lower-cased tag name, falling back to the `type` field.
    pub fn tag(&self) -> Option<String> {
        self.tag_name
            .as_deref()
            .or(self.node_type.as_deref())
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
    }

    /// Trimmed text content, `None` when blank.
    pub fn visible_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// String value of an attribute; numbers and booleans are stringified.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match self.attributes.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Looks up a style by camelCase or kebab-case key, `styles` first.
    pub fn style(&self, camel: &str) -> Option<&Value> {
        let kebab = camel_to_kebab(camel);
        [&self.styles, &self.computed_styles]
            .into_iter()
            .find_map(|map| {
                map.get(camel)
                    .or_else(|| map.get(&kebab))
                    .filter(|v| !is_blank(v))
            })
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
