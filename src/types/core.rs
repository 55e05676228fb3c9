//! Core value types shared by design and implementation inputs.
//!
//! - [`StyleValue`] - A raw style value (number or CSS string)
//! - [`Dimensions`] - Reported node size
//! - [`BoundingRect`] - Rendered element geometry

use serde::{Deserialize, Serialize};
use std::fmt;

/// A style value as it appears in source data.
///
/// Design tools mostly emit plain numbers, browsers emit CSS strings such as
/// `"16px"` or `"1.5rem"`. Both are kept verbatim until normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Returns `None` for empty strings so they behave like missing values.
    pub fn non_empty(&self) -> Option<&StyleValue> {
        match self {
            StyleValue::Text(s) if s.trim().is_empty() => None,
            other => Some(other),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s.as_str()),
            StyleValue::Number(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

/// Width/height reported by the design tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Rendered geometry of an implementation element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}
