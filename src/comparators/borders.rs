use serde_json::Value;

use crate::config::Thresholds;
use crate::severity::{severity_for, SeverityCategory};
use crate::types::{Deviation, Match, NormalizedAttributes, PropertyOutcome, Severity, Shadow, ShadowSet};

use super::color::compare_color;
use super::px;

fn unable(property: &str, design: impl Into<Value>, implementation: impl Into<Value>) -> PropertyOutcome {
    PropertyOutcome::Deviation(Deviation::new(
        property,
        design,
        implementation,
        Severity::Low,
        format!("Unable to compare {property}: value could not be parsed"),
    ))
}

fn length(property: String, design: f64, implementation: f64, tolerance: f64) -> PropertyOutcome {
    let diff = (design - implementation).abs();
    if diff > tolerance {
        let message = format!(
            "{property} differs by {}: design {} vs implementation {}",
            px(diff),
            px(design),
            px(implementation)
        );
        PropertyOutcome::Deviation(
            Deviation::new(
                property,
                design,
                implementation,
                severity_for(SeverityCategory::Spacing, diff),
                message,
            )
            .with_difference(diff),
        )
    } else {
        let message = format!("{property} within {} of design", px(tolerance));
        PropertyOutcome::Match(Match::new(property, implementation, message))
    }
}

/// Border width and style. Border color is covered by the color comparator.
pub fn compare_borders(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    let (Some(d), Some(i)) = (&design.border, &implementation.border) else {
        return Vec::new();
    };
    if d.unparsed.is_some() || i.unparsed.is_some() {
        return vec![unable(
            "border",
            d.unparsed.clone().unwrap_or_default(),
            i.unparsed.clone().unwrap_or_default(),
        )];
    }

    let mut outcomes = Vec::new();
    if let (Some(dw), Some(iw)) = (d.width, i.width) {
        outcomes.push(length("borderWidth".to_string(), dw, iw, thresholds.border_width));
    }
    if let (Some(ds), Some(is)) = (&d.style, &i.style) {
        if ds.eq_ignore_ascii_case(is) {
            outcomes.push(PropertyOutcome::Match(Match::new(
                "borderStyle",
                is.as_str(),
                "borderStyle matches design",
            )));
        } else {
            outcomes.push(PropertyOutcome::Deviation(Deviation::new(
                "borderStyle",
                ds.as_str(),
                is.as_str(),
                Severity::Low,
                format!("borderStyle differs: design {ds} vs implementation {is}"),
            )));
        }
    }
    outcomes
}

fn compare_shadow(index: usize, d: &Shadow, i: &Shadow, thresholds: &Thresholds) -> Vec<PropertyOutcome> {
    let mut outcomes = Vec::new();
    let fields = [
        ("offsetX", d.offset_x, i.offset_x),
        ("offsetY", d.offset_y, i.offset_y),
        ("blur", d.blur, i.blur),
        ("spread", d.spread, i.spread),
    ];
    for (name, dv, iv) in fields {
        if let (Some(dv), Some(iv)) = (dv, iv) {
            outcomes.push(length(format!("boxShadow[{index}].{name}"), dv, iv, thresholds.shadow));
        }
    }
    if let (Some(dc), Some(ic)) = (&d.color, &i.color) {
        outcomes.push(compare_color(
            &format!("boxShadow[{index}].color"),
            dc,
            ic,
            thresholds.color,
        ));
    }
    let property = format!("boxShadow[{index}].inset");
    if d.inset == i.inset {
        outcomes.push(PropertyOutcome::Match(Match::new(
            property,
            i.inset,
            "shadow type matches design",
        )));
    } else {
        outcomes.push(PropertyOutcome::Deviation(Deviation::new(
            property,
            d.inset,
            i.inset,
            Severity::Medium,
            "shadow type differs: inset vs drop shadow",
        )));
    }
    outcomes
}

/// Shadows are compared pairwise in declaration order.
pub fn compare_shadows(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    let (Some(d), Some(i)) = (&design.shadows, &implementation.shadows) else {
        return Vec::new();
    };
    let (d, i) = match (d, i) {
        (ShadowSet::Parsed(d), ShadowSet::Parsed(i)) => (d, i),
        (d, i) => {
            let raw = |set: &ShadowSet| match set {
                ShadowSet::Unparsable(raw) => Value::from(raw.as_str()),
                ShadowSet::Parsed(list) => Value::from(list.len()),
            };
            return vec![unable("boxShadow", raw(d), raw(i))];
        }
    };

    let mut outcomes = Vec::new();
    if d.len() != i.len() {
        outcomes.push(PropertyOutcome::Deviation(
            Deviation::new(
                "boxShadow",
                d.len(),
                i.len(),
                Severity::Medium,
                format!(
                    "shadow count differs: design has {} vs implementation {}",
                    d.len(),
                    i.len()
                ),
            )
            .with_difference((d.len() as f64 - i.len() as f64).abs()),
        ));
    } else if d.is_empty() {
        outcomes.push(PropertyOutcome::Match(Match::new(
            "boxShadow",
            "none",
            "no shadows on either side",
        )));
    }
    for (index, (ds, is)) in d.iter().zip(i).enumerate() {
        outcomes.extend(compare_shadow(index, ds, is, thresholds));
    }
    outcomes
}
