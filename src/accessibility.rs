//! Accessibility checks run on the implementation side of a matched pair.

use crate::color::{contrast_ratio, parse_color};
use crate::similarity::font_weight_value;
use crate::types::{Deviation, ImplementationNode, Match, NormalizedAttributes, PropertyOutcome, Severity};

/// WCAG AA minimum for normal text.
pub const MIN_CONTRAST_NORMAL: f64 = 4.5;
/// WCAG AA minimum for large text.
pub const MIN_CONTRAST_LARGE: f64 = 3.0;

/// Large text is at least 18px, or 14px when bold.
pub fn is_large_text(font_size: f64, font_weight: f64) -> bool {
    font_size >= 18.0 || (font_size >= 14.0 && font_weight >= 700.0)
}

/// Text/background contrast. `None` when either color is missing, unparsable
/// or the background is fully transparent.
pub fn check_contrast(attrs: &NormalizedAttributes) -> Option<PropertyOutcome> {
    let text = parse_color(attrs.colors.text.as_deref()?)?;
    let background = parse_color(attrs.colors.background.as_deref()?)?;
    if background.a == 0.0 {
        return None;
    }

    let size = attrs.typography.font_size.unwrap_or(16.0);
    let weight = attrs
        .typography
        .font_weight
        .as_deref()
        .and_then(font_weight_value)
        .unwrap_or(400.0);
    let minimum = if is_large_text(size, weight) {
        MIN_CONTRAST_LARGE
    } else {
        MIN_CONTRAST_NORMAL
    };

    let ratio = contrast_ratio(&text, &background);
    let rounded = (ratio * 100.0).round() / 100.0;
    let pair = format!("{} on {}", text.to_hex(), background.to_hex());
    if ratio < minimum {
        Some(PropertyOutcome::Deviation(
            Deviation::new(
                "contrast",
                minimum,
                rounded,
                Severity::Medium,
                format!("Contrast ratio {rounded}:1 for {pair} is below the {minimum}:1 minimum"),
            )
            .with_difference(((minimum - ratio) * 100.0).round() / 100.0)
            .flag_accessibility(),
        ))
    } else {
        Some(PropertyOutcome::Match(Match::new(
            "contrast",
            rounded,
            format!("Contrast ratio {rounded}:1 for {pair} meets the {minimum}:1 minimum"),
        )))
    }
}

/// Images need a non-empty `alt` attribute.
pub fn check_alt_text(node: &ImplementationNode) -> Option<PropertyOutcome> {
    if node.tag().as_deref() != Some("img") {
        return None;
    }
    let alt = node
        .attribute("alt")
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    Some(match alt {
        Some(alt) => PropertyOutcome::Match(Match::new("alt", alt, "Image has alternative text")),
        None => PropertyOutcome::Deviation(
            Deviation::new(
                "alt",
                "non-empty alt text",
                node.attribute("alt").unwrap_or_default(),
                Severity::High,
                format!("Image {} is missing alternative text", node.selector),
            )
            .flag_accessibility(),
        ),
    })
}

/// Links and buttons need visible text.
pub fn check_accessible_name(node: &ImplementationNode) -> Option<PropertyOutcome> {
    let tag = node.tag()?;
    if tag != "a" && tag != "button" {
        return None;
    }
    Some(match node.visible_text() {
        Some(text) => PropertyOutcome::Match(Match::new("text", text, format!("<{tag}> has visible text"))),
        None => PropertyOutcome::Deviation(
            Deviation::new(
                "text",
                "visible text",
                "",
                Severity::High,
                format!("<{tag}> {} has no visible text", node.selector),
            )
            .flag_accessibility(),
        ),
    })
}

/// All accessibility checks that apply to `node`.
pub fn evaluate_accessibility(node: &ImplementationNode, attrs: &NormalizedAttributes) -> Vec<PropertyOutcome> {
    [check_contrast(attrs), check_alt_text(node), check_accessible_name(node)]
        .into_iter()
        .flatten()
        .collect()
}
