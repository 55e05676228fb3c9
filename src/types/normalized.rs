//! Canonical attribute record produced by the normalizer.
//!
//! Every field is optional. `None` means "not specified" and is never
//! conflated with an explicit zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAttributes {
    pub colors: ColorSet,
    pub typography: TypographyStyle,
    pub spacing: Spacing,
    pub radius: Radius,
    pub layout: Layout,
    pub border: Option<Border>,
    pub shadows: Option<ShadowSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColorSet {
    pub text: Option<String>,
    pub background: Option<String>,
    pub border: Option<String>,
}

/// Typography style properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TypographyStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Sides {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Sides {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// Named sides in CSS order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("Top", self.top),
            ("Right", self.right),
            ("Bottom", self.bottom),
            ("Left", self.left),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub padding: Sides,
    pub margin: Sides,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Radius {
    pub uniform: Option<f64>,
    pub top_left: Option<f64>,
    pub top_right: Option<f64>,
    pub bottom_right: Option<f64>,
    pub bottom_left: Option<f64>,
}

impl Radius {
    /// Per-corner radii, each falling back to the uniform value.
    pub fn corners(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("TopLeft", self.top_left.or(self.uniform)),
            ("TopRight", self.top_right.or(self.uniform)),
            ("BottomRight", self.bottom_right.or(self.uniform)),
            ("BottomLeft", self.bottom_left.or(self.uniform)),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub width: Option<f64>,
    pub style: Option<String>,
    pub color: Option<String>,
    /// Source text when a shorthand could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unparsed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub blur: Option<f64>,
    pub spread: Option<f64>,
    pub color: Option<String>,
    pub inset: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ShadowSet {
    Parsed(Vec<Shadow>),
    Unparsable(String),
}
