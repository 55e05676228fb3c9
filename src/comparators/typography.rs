use crate::config::Thresholds;
use crate::similarity::{
    font_weight_value, generic_family, normalize_font_family, normalize_font_weight,
    string_similarity,
};
use crate::severity::{severity_for, SeverityCategory};
use crate::types::{Deviation, Match, PropertyOutcome, Severity, TypographyStyle};

use super::px;

const FONT_WEIGHT: f64 = 0.5;
const SIZE_WEIGHT: f64 = 0.3;
const WEIGHT_WEIGHT: f64 = 0.2;

/// Similarity when two different families share a generic bucket.
const SAME_GENERIC_SIMILARITY: f64 = 0.8;

fn numeric(
    property: &str,
    design: f64,
    implementation: f64,
    tolerance: f64,
    category: SeverityCategory,
) -> PropertyOutcome {
    let diff = (design - implementation).abs();
    if diff > tolerance {
        PropertyOutcome::Deviation(
            Deviation::new(
                property,
                design,
                implementation,
                severity_for(category, diff),
                format!(
                    "{property} differs by {}: design {} vs implementation {}",
                    px(diff),
                    px(design),
                    px(implementation)
                ),
            )
            .with_difference(diff),
        )
    } else {
        PropertyOutcome::Match(Match::new(
            property,
            implementation,
            format!("{property} within {} of design", px(tolerance)),
        ))
    }
}

fn font_family(design: &str, implementation: &str) -> PropertyOutcome {
    let (d, i) = (normalize_font_family(design), normalize_font_family(implementation));
    if d == i {
        PropertyOutcome::Match(Match::new("fontFamily", implementation, "fontFamily matches design"))
    } else {
        PropertyOutcome::Deviation(Deviation::new(
            "fontFamily",
            design,
            implementation,
            Severity::Medium,
            format!("fontFamily differs: design '{d}' vs implementation '{i}'"),
        ))
    }
}

fn font_weight(design: &str, implementation: &str, tolerance: f64) -> PropertyOutcome {
    match (font_weight_value(design), font_weight_value(implementation)) {
        (Some(d), Some(i)) => {
            let diff = (d - i).abs();
            if diff > tolerance {
                PropertyOutcome::Deviation(
                    Deviation::new(
                        "fontWeight",
                        normalize_font_weight(design),
                        normalize_font_weight(implementation),
                        severity_for(SeverityCategory::Default, diff),
                        format!("fontWeight differs: design {d} vs implementation {i}"),
                    )
                    .with_difference(diff),
                )
            } else {
                PropertyOutcome::Match(Match::new(
                    "fontWeight",
                    normalize_font_weight(implementation),
                    "fontWeight matches design",
                ))
            }
        }
        _ if design.trim().eq_ignore_ascii_case(implementation.trim()) => PropertyOutcome::Match(
            Match::new("fontWeight", implementation, "fontWeight matches design"),
        ),
        _ => PropertyOutcome::Deviation(Deviation::new(
            "fontWeight",
            design,
            implementation,
            Severity::Low,
            "Unable to compare fontWeight: unrecognized weight value",
        )),
    }
}

pub fn compare_typography(
    design: &TypographyStyle,
    implementation: &TypographyStyle,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    let mut outcomes = Vec::new();

    if let (Some(d), Some(i)) = (&design.font_family, &implementation.font_family) {
        outcomes.push(font_family(d, i));
    }
    if let (Some(d), Some(i)) = (design.font_size, implementation.font_size) {
        outcomes.push(numeric("fontSize", d, i, thresholds.font_size, SeverityCategory::FontSize));
    }
    if let (Some(d), Some(i)) = (&design.font_weight, &implementation.font_weight) {
        outcomes.push(font_weight(d, i, thresholds.font_weight));
    }
    if let (Some(d), Some(i)) = (design.line_height, implementation.line_height) {
        outcomes.push(numeric("lineHeight", d, i, thresholds.line_height, SeverityCategory::Default));
    }
    if let (Some(d), Some(i)) = (design.letter_spacing, implementation.letter_spacing) {
        outcomes.push(numeric(
            "letterSpacing",
            d,
            i,
            thresholds.letter_spacing,
            SeverityCategory::Spacing,
        ));
    }

    outcomes
}

fn family_similarity(design: &str, implementation: &str) -> f64 {
    let (d, i) = (normalize_font_family(design), normalize_font_family(implementation));
    if d == i {
        return 1.0;
    }
    match (generic_family(design), generic_family(implementation)) {
        (Some(a), Some(b)) if a == b => SAME_GENERIC_SIMILARITY,
        _ => string_similarity(&d, &i),
    }
}

fn ratio_similarity(a: f64, b: f64) -> f64 {
    let max = a.abs().max(b.abs());
    if max == 0.0 {
        1.0
    } else {
        (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
    }
}

/// Fuzzy typography score in `0.0..=1.0`: font 0.5, size 0.3, weight 0.2.
///
/// Components missing on either side contribute nothing.
pub fn typography_similarity(design: &TypographyStyle, implementation: &TypographyStyle) -> f64 {
    let font = match (&design.font_family, &implementation.font_family) {
        (Some(d), Some(i)) => family_similarity(d, i),
        _ => 0.0,
    };
    let size = match (design.font_size, implementation.font_size) {
        (Some(d), Some(i)) => ratio_similarity(d, i),
        _ => 0.0,
    };
    let weight = match (
        design.font_weight.as_deref().and_then(font_weight_value),
        implementation.font_weight.as_deref().and_then(font_weight_value),
    ) {
        (Some(d), Some(i)) => (1.0 - (d - i).abs() / 800.0).clamp(0.0, 1.0),
        _ => 0.0,
    };
    FONT_WEIGHT * font + SIZE_WEIGHT * size + WEIGHT_WEIGHT * weight
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypographyCandidate {
    pub index: usize,
    pub score: f64,
}

/// Candidates ordered by descending similarity; equal scores keep input order.
pub fn rank_typography_candidates<'a>(
    design: &TypographyStyle,
    candidates: impl IntoIterator<Item = (usize, &'a TypographyStyle)>,
) -> Vec<TypographyCandidate> {
    let mut ranked: Vec<TypographyCandidate> = candidates
        .into_iter()
        .map(|(index, style)| TypographyCandidate {
            index,
            score: typography_similarity(design, style),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
