use crate::color::{color_distance, parse_color};
use crate::config::Thresholds;
use crate::severity::{severity_for, SeverityCategory};
use crate::types::{Deviation, Match, NormalizedAttributes, PropertyOutcome, Severity};

/// Compare two CSS colors by approximate Lab distance.
///
/// A distance strictly greater than `threshold` is a deviation. Colors that
/// fail to parse yield a low-severity deviation instead of an error.
pub fn compare_color(property: &str, design: &str, implementation: &str, threshold: f64) -> PropertyOutcome {
    let (Some(d), Some(i)) = (parse_color(design), parse_color(implementation)) else {
        return PropertyOutcome::Deviation(Deviation::new(
            property,
            design,
            implementation,
            Severity::Low,
            format!("Unable to compare {property}: unparsable color value"),
        ));
    };

    let distance = color_distance(&d, &i);
    if distance > threshold {
        let rounded = (distance * 100.0).round() / 100.0;
        PropertyOutcome::Deviation(
            Deviation::new(
                property,
                design,
                implementation,
                severity_for(SeverityCategory::Color, distance),
                format!(
                    "{property} differs: design {design} vs implementation {implementation} (distance {rounded})"
                ),
            )
            .with_difference(rounded),
        )
    } else {
        PropertyOutcome::Match(Match::new(
            property,
            implementation,
            format!("{property} matches design"),
        ))
    }
}

pub fn compare_colors(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    thresholds: &Thresholds,
) -> Vec<PropertyOutcome> {
    [
        ("color", &design.colors.text, &implementation.colors.text),
        ("backgroundColor", &design.colors.background, &implementation.colors.background),
        ("borderColor", &design.colors.border, &implementation.colors.border),
    ]
    .into_iter()
    .filter_map(|(property, d, i)| {
        Some(compare_color(property, d.as_deref()?, i.as_deref()?, thresholds.color))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_severity(outcome: &PropertyOutcome) -> Option<Severity> {
        match outcome {
            PropertyOutcome::Deviation(d) => Some(d.severity),
            PropertyOutcome::Match(_) => None,
        }
    }

    #[test]
    fn identical_hex_is_a_match() {
        let outcome = compare_color("backgroundColor", "#336699", "#336699", 10.0);
        assert!(matches!(outcome, PropertyOutcome::Match(_)));
    }

    #[test]
    fn equivalent_notations_match() {
        let outcome = compare_color("color", "#336699", "rgb(51, 102, 153)", 10.0);
        assert!(matches!(outcome, PropertyOutcome::Match(_)));
    }

    #[test]
    fn black_vs_white_is_high() {
        let outcome = compare_color("color", "#000000", "#FFFFFF", 10.0);
        assert_eq!(outcome_severity(&outcome), Some(Severity::High));
        let PropertyOutcome::Deviation(d) = outcome else {
            unreachable!()
        };
        assert!(d.difference.unwrap() > 50.0);
    }

    #[test]
    fn unparsable_color_is_low_deviation() {
        let outcome = compare_color("color", "var(--brand)", "#000", 10.0);
        assert_eq!(outcome_severity(&outcome), Some(Severity::Low));
    }

    #[test]
    fn absent_colors_are_skipped() {
        let mut design = NormalizedAttributes::default();
        let mut implementation = NormalizedAttributes::default();
        design.colors.background = Some("#336699".into());
        implementation.colors.text = Some("#000".into());
        let outcomes = compare_colors(&design, &implementation, &Thresholds::default());
        assert!(outcomes.is_empty());
    }
}
