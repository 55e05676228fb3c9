//! Table-driven severity classification and regression-risk tagging.

use crate::types::{RegressionRisk, Severity};

/// Category a numeric difference is classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityCategory {
    Color,
    FontSize,
    /// Spacing and corner radius
    Spacing,
    /// Size and layout
    Size,
    Default,
}

impl SeverityCategory {
    /// `(high_at, medium_at)` boundaries, both inclusive.
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            SeverityCategory::Color => (50.0, 20.0),
            SeverityCategory::FontSize => (6.0, 3.0),
            SeverityCategory::Spacing => (10.0, 5.0),
            SeverityCategory::Size | SeverityCategory::Default => (20.0, 10.0),
        }
    }
}

pub fn severity_for(category: SeverityCategory, difference: f64) -> Severity {
    let (high, medium) = category.bounds();
    let difference = difference.abs();
    if difference >= high {
        Severity::High
    } else if difference >= medium {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Property area a deviation belongs to, for regression-risk purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskArea {
    Existence,
    Layout,
    Accessibility,
    Other,
}

/// `existence` is always critical; high severity is major on layout or
/// accessibility and minor elsewhere. Anything else carries no risk tag.
pub fn regression_risk_for(area: RiskArea, severity: Severity) -> Option<RegressionRisk> {
    match (area, severity) {
        (RiskArea::Existence, _) => Some(RegressionRisk::Critical),
        (RiskArea::Layout | RiskArea::Accessibility, Severity::High) => Some(RegressionRisk::Major),
        (_, Severity::High) => Some(RegressionRisk::Minor),
        _ => None,
    }
}

/// Risk area for a deviation's property name.
pub fn risk_area(property: &str, accessibility: bool) -> RiskArea {
    if property == "existence" {
        return RiskArea::Existence;
    }
    if accessibility {
        return RiskArea::Accessibility;
    }
    const LAYOUT: &[&str] = &["width", "height", "minWidth", "maxWidth", "minHeight", "maxHeight"];
    if LAYOUT.contains(&property) {
        RiskArea::Layout
    } else {
        RiskArea::Other
    }
}
