//! Per-category property comparators.
//!
//! Each comparator receives a paired, normalized design/implementation
//! record and emits one [`PropertyOutcome`] per property present on both
//! sides. Properties missing on either side are skipped.

pub mod borders;
pub mod box_model;
pub mod color;
pub mod typography;

use crate::config::Thresholds;
use crate::types::{NormalizedAttributes, PropertyOutcome};

/// Runs every property comparator over a matched pair, in a fixed order.
pub fn compare_properties(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    let mut outcomes = color::compare_colors(design, implementation, thresholds);
    outcomes.extend(typography::compare_typography(
        &design.typography,
        &implementation.typography,
        thresholds,
    ));
    outcomes.extend(box_model::compare_box_model(design, implementation, thresholds));
    outcomes.extend(borders::compare_borders(design, implementation, thresholds));
    outcomes.extend(borders::compare_shadows(design, implementation, thresholds));
    outcomes
}

/// Formats a pixel value the way messages show it (`16px`, `1.5px`).
pub(crate) fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}px")
}
