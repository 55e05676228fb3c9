//! Spacing, dimension and corner-radius comparison.
//!
//! Numeric work is delegated to the report builder; this module only turns
//! its rows into typed outcomes with the right severity table.

use crate::config::Thresholds;
use crate::report_builder::{compare_scope, PropertyComparison, PropertyScope};
use crate::severity::{severity_for, SeverityCategory};
use crate::types::{Deviation, Match, NormalizedAttributes, PropertyOutcome};

use super::px;

fn to_outcome(row: PropertyComparison, category: SeverityCategory, tolerance: f64) -> PropertyOutcome {
    if row.is_mismatch() {
        PropertyOutcome::Deviation(
            Deviation::new(
                row.property.clone(),
                row.figma_value,
                row.web_value,
                severity_for(category, row.diff),
                format!(
                    "{} differs by {}: design {} vs implementation {}",
                    row.property,
                    px(row.diff),
                    px(row.figma_value),
                    px(row.web_value)
                ),
            )
            .with_difference(row.diff),
        )
    } else {
        PropertyOutcome::Match(Match::new(
            row.property.clone(),
            row.web_value,
            format!("{} within {} of design", row.property, px(tolerance)),
        ))
    }
}

pub fn compare_box_model(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    let groups = [
        (PropertyScope::Spacing, thresholds.spacing, SeverityCategory::Spacing),
        (PropertyScope::Dimensions, thresholds.dimension, SeverityCategory::Size),
        (PropertyScope::Radius, thresholds.radius, SeverityCategory::Spacing),
    ];
    groups
        .into_iter()
        .flat_map(|(scope, tolerance, category)| {
            compare_scope(design, implementation, scope, tolerance)
                .into_iter()
                .map(move |row| to_outcome(row, category, tolerance))
        })
        .collect()
}
