//! Generic tolerance-based numeric comparison of box-model properties.
//!
//! Produces untyped [`PropertyComparison`] rows; the box-model comparator
//! turns them into deviations and matches with severities.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_design, normalize_implementation, NormalizeOptions};
use crate::types::{DesignNode, ImplementationNode, NormalizedAttributes};

/// Property group to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyScope {
    Spacing,
    Dimensions,
    Radius,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub tolerance: f64,
    pub base_font_size: f64,
    /// Resolve `rem`/`em` values; when off only px and plain numbers count.
    pub normalize_input: bool,
    pub scope: PropertyScope,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            base_font_size: 16.0,
            normalize_input: true,
            scope: PropertyScope::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonResultStatus {
    Mismatch,
    Match,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyComparison {
    pub property: String,
    pub status: ComparisonResultStatus,
    pub figma_value: f64,
    pub web_value: f64,
    pub diff: f64,
}

impl PropertyComparison {
    pub fn is_mismatch(&self) -> bool {
        self.status == ComparisonResultStatus::Mismatch
    }
}

fn spacing_pairs(d: &NormalizedAttributes, i: &NormalizedAttributes) -> Vec<(String, Option<f64>, Option<f64>)> {
    let mut pairs = Vec::new();
    for (prefix, ds, is) in [
        ("padding", &d.spacing.padding, &i.spacing.padding),
        ("margin", &d.spacing.margin, &i.spacing.margin),
    ] {
        for ((side, dv), (_, iv)) in ds.entries().into_iter().zip(is.entries()) {
            pairs.push((format!("{prefix}{side}"), dv, iv));
        }
    }
    pairs.push(("gap".to_string(), d.spacing.gap, i.spacing.gap));
    pairs
}

fn dimension_pairs(d: &NormalizedAttributes, i: &NormalizedAttributes) -> Vec<(String, Option<f64>, Option<f64>)> {
    let (dl, il) = (&d.layout, &i.layout);
    [
        ("width", dl.width, il.width),
        ("height", dl.height, il.height),
        ("minWidth", dl.min_width, il.min_width),
        ("maxWidth", dl.max_width, il.max_width),
        ("minHeight", dl.min_height, il.min_height),
        ("maxHeight", dl.max_height, il.max_height),
    ]
    .into_iter()
    .map(|(name, dv, iv)| (name.to_string(), dv, iv))
    .collect()
}

fn radius_pairs(d: &NormalizedAttributes, i: &NormalizedAttributes) -> Vec<(String, Option<f64>, Option<f64>)> {
    d.radius
        .corners()
        .into_iter()
        .zip(i.radius.corners())
        .map(|((corner, dv), (_, iv))| (format!("border{corner}Radius"), dv, iv))
        .collect()
}

/// Compare one already-normalized pair within a scope.
///
/// Properties absent on either side are skipped. A difference strictly
/// greater than `tolerance` is a mismatch.
pub fn compare_scope(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    scope: PropertyScope,
    tolerance: f64,
) -> Vec<PropertyComparison> {
    let pairs = match scope {
        PropertyScope::Spacing => spacing_pairs(design, implementation),
        PropertyScope::Dimensions => dimension_pairs(design, implementation),
        PropertyScope::Radius => radius_pairs(design, implementation),
        PropertyScope::All => {
            let mut all = spacing_pairs(design, implementation);
            all.extend(dimension_pairs(design, implementation));
            all.extend(radius_pairs(design, implementation));
            all
        }
    };

    pairs
        .into_iter()
        .filter_map(|(property, dv, iv)| {
            let (figma_value, web_value) = (dv?, iv?);
            let diff = (figma_value - web_value).abs();
            let status = if diff > tolerance {
                ComparisonResultStatus::Mismatch
            } else {
                ComparisonResultStatus::Match
            };
            Some(PropertyComparison {
                property,
                status,
                figma_value,
                web_value,
                diff,
            })
        })
        .collect()
}

/// Compare index-paired design and implementation nodes.
///
/// Extra nodes on the longer side are ignored.
pub fn build_comparison_report(
    design: &[DesignNode],
    implementation: &[ImplementationNode],
    options: &ReportOptions,
) -> Vec<PropertyComparison> {
    let normalize = NormalizeOptions {
        base_font_size: options.base_font_size,
        resolve_relative_units: options.normalize_input,
    };
    design
        .iter()
        .zip(implementation)
        .flat_map(|(d, i)| {
            compare_scope(
                &normalize_design(d, &normalize),
                &normalize_implementation(i, &normalize),
                options.scope,
                options.tolerance,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nodes() -> (Vec<DesignNode>, Vec<ImplementationNode>) {
        let design = serde_json::from_value(json!([{
            "id": "1",
            "name": "Card",
            "type": "FRAME",
            "properties": {
                "spacing": { "padding": 16, "gap": "1rem" },
                "layout": { "width": 320, "height": 200 },
                "radius": { "uniform": 8 }
            }
        }]))
        .unwrap();
        let implementation = serde_json::from_value(json!([{
            "tagName": "div",
            "computedStyles": {
                "paddingTop": "16px",
                "paddingRight": "17px",
                "paddingBottom": "20px",
                "paddingLeft": "16px",
                "gap": "1rem",
                "width": "321px",
                "height": "260px",
                "borderRadius": "8px"
            }
        }]))
        .unwrap();
        (design, implementation)
    }

    fn find<'a>(rows: &'a [PropertyComparison], name: &str) -> Option<&'a PropertyComparison> {
        rows.iter().find(|r| r.property == name)
    }

    #[test]
    fn spacing_scope_thresholds_each_side() {
        let (design, implementation) = nodes();
        let options = ReportOptions {
            scope: PropertyScope::Spacing,
            ..ReportOptions::default()
        };
        let rows = build_comparison_report(&design, &implementation, &options);

        assert!(!find(&rows, "paddingTop").unwrap().is_mismatch());
        assert!(!find(&rows, "paddingRight").unwrap().is_mismatch());
        let bottom = find(&rows, "paddingBottom").unwrap();
        assert!(bottom.is_mismatch());
        assert_eq!(bottom.diff, 4.0);
        assert_eq!(find(&rows, "gap").unwrap().figma_value, 16.0);
        assert!(find(&rows, "marginTop").is_none(), "absent properties are skipped");
        assert!(find(&rows, "width").is_none(), "out of scope");
    }

    #[test]
    fn tolerance_boundary_is_not_a_mismatch() {
        let (design, implementation) = nodes();
        let options = ReportOptions {
            tolerance: 4.0,
            scope: PropertyScope::Spacing,
            ..ReportOptions::default()
        };
        let rows = build_comparison_report(&design, &implementation, &options);
        assert!(!find(&rows, "paddingBottom").unwrap().is_mismatch());
    }

    #[test]
    fn relative_units_are_dropped_without_normalization() {
        let (design, implementation) = nodes();
        let options = ReportOptions {
            normalize_input: false,
            ..ReportOptions::default()
        };
        let rows = build_comparison_report(&design, &implementation, &options);
        assert!(find(&rows, "gap").is_none());
        assert!(find(&rows, "height").unwrap().is_mismatch());
        assert!(!find(&rows, "borderTopLeftRadius").unwrap().is_mismatch());
    }

    #[test]
    fn unpaired_nodes_are_ignored() {
        let (design, _) = nodes();
        assert!(build_comparison_report(&design, &[], &ReportOptions::default()).is_empty());
    }
}
