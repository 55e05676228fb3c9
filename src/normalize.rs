//! Canonicalization of design and implementation nodes.
//!
//! Both sides are reduced to [`NormalizedAttributes`]. Missing, null and
//! empty-string values are dropped rather than defaulted, so comparators can
//! tell "not specified" apart from "specified as zero".

use serde_json::Value;

use crate::color::parse_color;
use crate::types::{
    Border, ColorSet, DesignNode, DesignPaint, ImplementationNode, Layout, NormalizedAttributes,
    Radius, Shadow, ShadowSet, Sides, SidesInput, Spacing, StyleValue, TypographyStyle,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub base_font_size: f64,
    /// Resolve `rem`/`em` against `base_font_size`; when off they are dropped.
    pub resolve_relative_units: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            base_font_size: 16.0,
            resolve_relative_units: true,
        }
    }
}

impl NormalizeOptions {
    pub fn with_base_font_size(base_font_size: f64) -> Self {
        Self {
            base_font_size,
            ..Self::default()
        }
    }
}

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];

/// Parse a CSS length (`12`, `12px`, `1.5rem`) into pixels.
pub fn parse_length(raw: &str, options: &NormalizeOptions) -> Option<f64> {
    let s = raw.trim().to_ascii_lowercase();
    match s.as_str() {
        "" | "normal" | "auto" | "none" | "initial" | "inherit" | "unset" => return None,
        _ => {}
    }
    let finite = |v: f64| v.is_finite().then_some(v);
    if let Some(n) = s.strip_suffix("px") {
        return n.trim().parse().ok().and_then(finite);
    }
    if let Some(n) = s.strip_suffix("rem").or_else(|| s.strip_suffix("em")) {
        if !options.resolve_relative_units {
            return None;
        }
        return n
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(finite)
            .map(|v| v * options.base_font_size);
    }
    s.parse().ok().and_then(finite)
}

fn style_length(value: &StyleValue, options: &NormalizeOptions) -> Option<f64> {
    match value.non_empty()? {
        StyleValue::Number(n) => n.is_finite().then_some(*n),
        StyleValue::Text(s) => parse_length(s, options),
    }
}

fn opt_length(value: Option<&StyleValue>, options: &NormalizeOptions) -> Option<f64> {
    value.and_then(|v| style_length(v, options))
}

fn json_length(value: &Value, options: &NormalizeOptions) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_length(s, options),
        _ => None,
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse a 1-4 value CSS box shorthand (`8px 16px`) in top/right/bottom/left order.
pub fn parse_sides(raw: &str, options: &NormalizeOptions) -> Option<Sides> {
    let values: Vec<f64> = raw
        .split_whitespace()
        .map(|t| parse_length(t, options))
        .collect::<Option<Vec<_>>>()?;
    let (top, right, bottom, left) = match values.as_slice() {
        [a] => (*a, *a, *a, *a),
        [a, b] => (*a, *b, *a, *b),
        [a, b, c] => (*a, *b, *c, *b),
        [a, b, c, d] => (*a, *b, *c, *d),
        _ => return None,
    };
    Some(Sides {
        top: Some(top),
        right: Some(right),
        bottom: Some(bottom),
        left: Some(left),
    })
}

/// Split on commas that are not nested in parentheses.
fn split_top_level(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Tokenize on whitespace while keeping `rgb(...)` groups intact.
fn split_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a `border` shorthand such as `1px solid #ccc`.
pub fn parse_border(raw: &str, options: &NormalizeOptions) -> Border {
    let mut border = Border::default();
    if raw.trim().eq_ignore_ascii_case("none") {
        border.width = Some(0.0);
        border.style = Some("none".to_string());
        return border;
    }
    for token in split_tokens(raw) {
        let lower = token.to_ascii_lowercase();
        if BORDER_STYLES.contains(&lower.as_str()) {
            border.style = Some(lower);
        } else if let Some(width) = parse_length(&token, options) {
            border.width = Some(width);
        } else if parse_color(&token).is_some() {
            border.color = Some(token);
        } else {
            border.unparsed = Some(raw.trim().to_string());
            return border;
        }
    }
    border
}

/// Parse a `box-shadow` value. `none` yields an empty list.
pub fn parse_box_shadow(raw: &str, options: &NormalizeOptions) -> ShadowSet {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return ShadowSet::Parsed(Vec::new());
    }
    let mut shadows = Vec::new();
    for part in split_top_level(trimmed) {
        let mut lengths = Vec::new();
        let mut shadow = Shadow::default();
        for token in split_tokens(&part) {
            if token.eq_ignore_ascii_case("inset") {
                shadow.inset = true;
            } else if let Some(len) = parse_length(&token, options) {
                lengths.push(len);
            } else if parse_color(&token).is_some() {
                shadow.color = Some(token);
            } else {
                return ShadowSet::Unparsable(trimmed.to_string());
            }
        }
        if !(2..=4).contains(&lengths.len()) {
            return ShadowSet::Unparsable(trimmed.to_string());
        }
        shadow.offset_x = lengths.first().copied();
        shadow.offset_y = lengths.get(1).copied();
        shadow.blur = Some(lengths.get(2).copied().unwrap_or(0.0));
        shadow.spread = Some(lengths.get(3).copied().unwrap_or(0.0));
        shadows.push(shadow);
    }
    ShadowSet::Parsed(shadows)
}

fn first_visible_paint(paints: Option<&Vec<DesignPaint>>) -> Option<String> {
    paints?
        .iter()
        .filter(|p| p.visible != Some(false))
        .filter(|p| {
            p.paint_type
                .as_deref()
                .map(|t| t.eq_ignore_ascii_case("solid"))
                .unwrap_or(true)
        })
        .find_map(|p| p.color.as_ref().map(|c| c.to_css(p.opacity)))
}

fn sides_from_input(input: &SidesInput, options: &NormalizeOptions) -> Sides {
    match input {
        SidesInput::Uniform(v) => style_length(v, options)
            .map(Sides::uniform)
            .unwrap_or_default(),
        SidesInput::Sides(sides) => Sides {
            top: opt_length(sides.top.as_ref(), options),
            right: opt_length(sides.right.as_ref(), options),
            bottom: opt_length(sides.bottom.as_ref(), options),
            left: opt_length(sides.left.as_ref(), options),
        },
    }
}

/// Canonicalize a design node.
pub fn normalize_design(node: &DesignNode, options: &NormalizeOptions) -> NormalizedAttributes {
    let props = &node.properties;
    let is_text = node.node_type.eq_ignore_ascii_case("text");

    let declared = props.colors.clone().unwrap_or_default();
    let fill = first_visible_paint(props.fills.as_ref());
    let colors = ColorSet {
        text: non_empty(declared.text.as_ref()).or_else(|| if is_text { fill.clone() } else { None }),
        background: non_empty(declared.background.as_ref())
            .or_else(|| if is_text { None } else { fill.clone() }),
        border: non_empty(declared.border.as_ref())
            .or_else(|| first_visible_paint(props.strokes.as_ref())),
    };

    let typography = props
        .typography
        .as_ref()
        .map(|t| TypographyStyle {
            font_family: non_empty(t.font_family.as_ref()),
            font_size: opt_length(t.font_size.as_ref(), options),
            font_weight: t.font_weight.as_ref().and_then(|w| match w.non_empty()? {
                StyleValue::Number(n) => Some(format_number(*n)),
                StyleValue::Text(s) => Some(s.trim().to_string()),
            }),
            line_height: opt_length(t.line_height.as_ref(), options),
            letter_spacing: opt_length(t.letter_spacing.as_ref(), options),
        })
        .unwrap_or_default();

    let declared_spacing = props.spacing.clone().unwrap_or_default();
    let mut padding = declared_spacing
        .padding
        .as_ref()
        .map(|s| sides_from_input(s, options))
        .unwrap_or_default();
    if padding.is_empty() {
        padding = Sides {
            top: opt_length(props.padding_top.as_ref(), options),
            right: opt_length(props.padding_right.as_ref(), options),
            bottom: opt_length(props.padding_bottom.as_ref(), options),
            left: opt_length(props.padding_left.as_ref(), options),
        };
    }
    let spacing = Spacing {
        padding,
        margin: declared_spacing
            .margin
            .as_ref()
            .map(|s| sides_from_input(s, options))
            .unwrap_or_default(),
        gap: opt_length(declared_spacing.gap.as_ref(), options)
            .or_else(|| opt_length(props.item_spacing.as_ref(), options)),
    };

    let mut radius = props
        .radius
        .as_ref()
        .map(|r| Radius {
            uniform: opt_length(r.uniform.as_ref(), options),
            top_left: opt_length(r.top_left.as_ref(), options),
            top_right: opt_length(r.top_right.as_ref(), options),
            bottom_right: opt_length(r.bottom_right.as_ref(), options),
            bottom_left: opt_length(r.bottom_left.as_ref(), options),
        })
        .unwrap_or_default();
    if radius == Radius::default() {
        radius.uniform = opt_length(props.corner_radius.as_ref(), options);
        if let Some([tl, tr, br, bl]) = props
            .rectangle_corner_radii
            .as_deref()
            .and_then(|r| <[f64; 4]>::try_from(r).ok())
        {
            radius.top_left = Some(tl);
            radius.top_right = Some(tr);
            radius.bottom_right = Some(br);
            radius.bottom_left = Some(bl);
        }
    }

    let mut layout = props
        .layout
        .as_ref()
        .map(|l| Layout {
            width: opt_length(l.width.as_ref(), options),
            height: opt_length(l.height.as_ref(), options),
            min_width: opt_length(l.min_width.as_ref(), options),
            max_width: opt_length(l.max_width.as_ref(), options),
            min_height: opt_length(l.min_height.as_ref(), options),
            max_height: opt_length(l.max_height.as_ref(), options),
        })
        .unwrap_or_default();
    if let Some(dims) = node.dimensions {
        layout.width = layout.width.or(dims.width);
        layout.height = layout.height.or(dims.height);
    }

    let border = match &props.border {
        Some(b) => Some(Border {
            width: opt_length(b.width.as_ref(), options),
            style: non_empty(b.style.as_ref()).map(|s| s.to_ascii_lowercase()),
            color: non_empty(b.color.as_ref()),
            unparsed: None,
        }),
        None => {
            let width = opt_length(props.stroke_weight.as_ref(), options);
            let color = first_visible_paint(props.strokes.as_ref());
            (width.is_some() || color.is_some()).then(|| Border {
                width,
                style: Some("solid".to_string()),
                color,
                unparsed: None,
            })
        }
    };
    let colors = ColorSet {
        border: colors
            .border
            .or_else(|| border.as_ref().and_then(|b| b.color.clone())),
        ..colors
    };

    let shadows = if let Some(declared) = &props.shadows {
        Some(ShadowSet::Parsed(
            declared
                .iter()
                .map(|s| Shadow {
                    offset_x: s.offset_x,
                    offset_y: s.offset_y,
                    blur: s.blur,
                    spread: s.spread,
                    color: non_empty(s.color.as_ref()),
                    inset: s.inset,
                })
                .collect(),
        ))
    } else {
        props.effects.as_ref().map(|effects| {
            ShadowSet::Parsed(
                effects
                    .iter()
                    .filter(|e| e.visible != Some(false))
                    .filter_map(|e| {
                        let kind = e.effect_type.to_ascii_uppercase();
                        let inset = match kind.as_str() {
                            "DROP_SHADOW" => false,
                            "INNER_SHADOW" => true,
                            _ => return None,
                        };
                        Some(Shadow {
                            offset_x: e.offset.map(|o| o.x),
                            offset_y: e.offset.map(|o| o.y),
                            blur: e.radius,
                            spread: e.spread.or(Some(0.0)),
                            color: e.color.as_ref().map(|c| c.to_css(None)),
                            inset,
                        })
                    })
                    .collect(),
            )
        })
    };

    NormalizedAttributes {
        colors,
        typography,
        spacing,
        radius,
        layout,
        border,
        shadows,
    }
}

fn side_longhands(
    node: &ImplementationNode,
    prefix: &str,
    options: &NormalizeOptions,
) -> Sides {
    let side = |name: &str| {
        node.style(&format!("{prefix}{name}"))
            .and_then(|v| json_length(v, options))
    };
    let longhands = Sides {
        top: side("Top"),
        right: side("Right"),
        bottom: side("Bottom"),
        left: side("Left"),
    };
    if !longhands.is_empty() {
        return longhands;
    }
    node.style(prefix)
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64().map(Sides::uniform),
            Value::String(s) => parse_sides(s, options),
            _ => None,
        })
        .unwrap_or_default()
}

/// Canonicalize an implementation node.
pub fn normalize_implementation(
    node: &ImplementationNode,
    options: &NormalizeOptions,
) -> NormalizedAttributes {
    let text_style = |key: &str| node.style(key).and_then(json_text);
    let length = |key: &str| node.style(key).and_then(|v| json_length(v, options));

    let shorthand_border = node
        .style("border")
        .and_then(json_text)
        .map(|raw| parse_border(&raw, options));
    let longhand_border = Border {
        width: length("borderWidth").or_else(|| length("borderTopWidth")),
        style: text_style("borderStyle")
            .or_else(|| text_style("borderTopStyle"))
            .map(|s| s.to_ascii_lowercase()),
        color: text_style("borderColor").or_else(|| text_style("borderTopColor")),
        unparsed: None,
    };
    let border = if longhand_border != Border::default() {
        Some(longhand_border)
    } else {
        shorthand_border
    };

    let background = text_style("backgroundColor").or_else(|| {
        text_style("background").filter(|raw| parse_color(raw).is_some())
    });
    let colors = ColorSet {
        text: text_style("color"),
        background,
        border: border.as_ref().and_then(|b| b.color.clone()),
    };

    let font_size = length("fontSize");
    let line_height = node.style("lineHeight").and_then(|v| {
        let unitless = match v {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        };
        let parsed = json_length(v, options)?;
        // Unitless multipliers scale with the font size.
        match font_size {
            Some(size) if unitless && parsed < 4.0 => Some(parsed * size),
            _ => Some(parsed),
        }
    });
    let typography = TypographyStyle {
        font_family: text_style("fontFamily"),
        font_size,
        font_weight: text_style("fontWeight"),
        line_height,
        letter_spacing: length("letterSpacing"),
    };

    let spacing = Spacing {
        padding: side_longhands(node, "padding", options),
        margin: side_longhands(node, "margin", options),
        gap: length("gap").or_else(|| length("columnGap")),
    };

    let mut radius = Radius {
        uniform: None,
        top_left: length("borderTopLeftRadius"),
        top_right: length("borderTopRightRadius"),
        bottom_right: length("borderBottomRightRadius"),
        bottom_left: length("borderBottomLeftRadius"),
    };
    if let Some(raw) = node.style("borderRadius") {
        match raw {
            Value::Number(n) => radius.uniform = n.as_f64(),
            Value::String(s) => {
                let tokens: Vec<&str> = s.split_whitespace().collect();
                if tokens.len() == 1 {
                    radius.uniform = parse_length(tokens[0], options);
                } else if let Some(sides) = parse_sides(s, options) {
                    radius.top_left = radius.top_left.or(sides.top);
                    radius.top_right = radius.top_right.or(sides.right);
                    radius.bottom_right = radius.bottom_right.or(sides.bottom);
                    radius.bottom_left = radius.bottom_left.or(sides.left);
                }
            }
            _ => {}
        }
    }

    let rect = node.bounding_rect.unwrap_or_default();
    let layout = Layout {
        width: length("width").or(rect.width),
        height: length("height").or(rect.height),
        min_width: length("minWidth"),
        max_width: length("maxWidth"),
        min_height: length("minHeight"),
        max_height: length("maxHeight"),
    };

    let shadows = node
        .style("boxShadow")
        .and_then(json_text)
        .map(|raw| parse_box_shadow(&raw, options));

    NormalizedAttributes {
        colors,
        typography,
        spacing,
        radius,
        layout,
        border,
        shadows,
    }
}
