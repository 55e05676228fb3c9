//! Design-side input types.
//!
//! These mirror the shape of node trees exported from design tools. Current
//! exports nest style data under `properties.<category>`; older exports use
//! flat fields (`cornerRadius`, `fills`, `paddingLeft`, ...) which are kept as
//! fallbacks and resolved by the normalizer.

use serde::{Deserialize, Serialize};

use super::core::{Dimensions, StyleValue};

/// A design specification tree as handed to the comparison engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignTree {
    pub file_key: Option<String>,
    pub file_name: Option<String>,
    pub page_id: Option<String>,
    pub node_id: Option<String>,
    pub extracted_at: Option<String>,
    #[serde(default, alias = "nodes")]
    pub components: Option<Vec<DesignNode>>,
}

/// One node of the design tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub properties: DesignProperties,
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignProperties {
    pub colors: Option<DesignColors>,
    pub typography: Option<DesignTypography>,
    pub spacing: Option<DesignSpacing>,
    pub layout: Option<DesignLayout>,
    pub radius: Option<DesignRadius>,
    pub shadows: Option<Vec<DesignShadow>>,
    pub border: Option<DesignBorder>,

    // Legacy flat fields
    pub corner_radius: Option<StyleValue>,
    pub rectangle_corner_radii: Option<Vec<f64>>,
    pub padding_top: Option<StyleValue>,
    pub padding_right: Option<StyleValue>,
    pub padding_bottom: Option<StyleValue>,
    pub padding_left: Option<StyleValue>,
    pub item_spacing: Option<StyleValue>,
    pub fills: Option<Vec<DesignPaint>>,
    pub strokes: Option<Vec<DesignPaint>>,
    pub stroke_weight: Option<StyleValue>,
    pub effects: Option<Vec<DesignEffect>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignColors {
    #[serde(alias = "color", alias = "foreground")]
    pub text: Option<String>,
    #[serde(alias = "fill", alias = "backgroundColor")]
    pub background: Option<String>,
    #[serde(alias = "stroke", alias = "borderColor")]
    pub border: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignTypography {
    pub font_family: Option<String>,
    pub font_size: Option<StyleValue>,
    pub font_weight: Option<StyleValue>,
    #[serde(alias = "lineHeightPx")]
    pub line_height: Option<StyleValue>,
    pub letter_spacing: Option<StyleValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignSpacing {
    pub padding: Option<SidesInput>,
    pub margin: Option<SidesInput>,
    #[serde(alias = "itemSpacing")]
    pub gap: Option<StyleValue>,
}

/// Either one value for every side or explicit per-side values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidesInput {
    Uniform(StyleValue),
    Sides(BoxSides),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoxSides {
    pub top: Option<StyleValue>,
    pub right: Option<StyleValue>,
    pub bottom: Option<StyleValue>,
    pub left: Option<StyleValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignLayout {
    pub width: Option<StyleValue>,
    pub height: Option<StyleValue>,
    pub min_width: Option<StyleValue>,
    pub max_width: Option<StyleValue>,
    pub min_height: Option<StyleValue>,
    pub max_height: Option<StyleValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignRadius {
    #[serde(alias = "all")]
    pub uniform: Option<StyleValue>,
    pub top_left: Option<StyleValue>,
    pub top_right: Option<StyleValue>,
    pub bottom_right: Option<StyleValue>,
    pub bottom_left: Option<StyleValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignShadow {
    #[serde(alias = "x")]
    pub offset_x: Option<f64>,
    #[serde(alias = "y")]
    pub offset_y: Option<f64>,
    #[serde(alias = "radius")]
    pub blur: Option<f64>,
    pub spread: Option<f64>,
    pub color: Option<String>,
    #[serde(default)]
    pub inset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignBorder {
    pub width: Option<StyleValue>,
    pub style: Option<String>,
    pub color: Option<String>,
}

/// A legacy fill/stroke paint entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignPaint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    pub color: Option<PaintColor>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
}

/// Paint colors arrive either as CSS strings or as unit-range RGBA channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintColor {
    Css(String),
    Channels {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "default_alpha")]
        a: f64,
    },
}

fn default_alpha() -> f64 {
    1.0
}

impl PaintColor {
    /// Renders the color as a CSS string usable by the color parser.
    pub fn to_css(&self, opacity: Option<f64>) -> String {
        match self {
            PaintColor::Css(s) => s.clone(),
            PaintColor::Channels { r, g, b, a } => {
                let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                let alpha = a * opacity.unwrap_or(1.0);
                if alpha >= 1.0 {
                    format!("#{:02x}{:02x}{:02x}", to_byte(*r), to_byte(*g), to_byte(*b))
                } else {
                    format!(
                        "rgba({}, {}, {}, {})",
                        to_byte(*r),
                        to_byte(*g),
                        to_byte(*b),
                        (alpha * 100.0).round() / 100.0
                    )
                }
            }
        }
    }
}

/// A legacy effect entry (drop/inner shadow, blur).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesignEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    pub visible: Option<bool>,
    pub offset: Option<EffectOffset>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
    pub color: Option<PaintColor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct EffectOffset {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn design_node_accepts_nested_and_legacy_fields() {
        let node: DesignNode = serde_json::from_value(json!({
            "id": "1:2",
            "name": "Primary Button",
            "type": "INSTANCE",
            "properties": {
                "colors": { "fill": "#336699" },
                "typography": { "fontFamily": "Inter", "fontSize": 16, "fontWeight": "Bold" },
                "spacing": { "padding": 8 },
                "cornerRadius": 4
            },
            "dimensions": { "width": 120, "height": 40 }
        }))
        .expect("deserialize design node");

        let colors = node.properties.colors.expect("colors");
        assert_eq!(colors.background.as_deref(), Some("#336699"));
        assert!(matches!(
            node.properties.spacing.and_then(|s| s.padding),
            Some(SidesInput::Uniform(StyleValue::Number(n))) if n == 8.0
        ));
        assert_eq!(node.properties.corner_radius, Some(StyleValue::Number(4.0)));
        assert_eq!(node.dimensions.and_then(|d| d.width), Some(120.0));
    }

    #[test]
    fn tree_accepts_nodes_alias() {
        let tree: DesignTree = serde_json::from_value(json!({
            "fileKey": "abc",
            "nodes": [{ "id": "1", "name": "Card", "type": "FRAME" }]
        }))
        .expect("deserialize tree");
        assert_eq!(tree.components.map(|c| c.len()), Some(1));
    }

    #[test]
    fn paint_channels_render_as_hex() {
        let paint = PaintColor::Channels {
            r: 0.2,
            g: 0.4,
            b: 0.6,
            a: 1.0,
        };
        assert_eq!(paint.to_css(None), "#336699");
        assert_eq!(paint.to_css(Some(0.5)), "rgba(51, 102, 153, 0.5)");
    }
}
