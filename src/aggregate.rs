use crate::types::{
    AccessibilityDetail, ComparisonRecord, ComponentFailure, RegressionRisk, Severity, Summary,
};

/// Fold comparison records into run totals.
///
/// Failed components are counted separately and never contribute deviations.
pub fn fold_summary(records: &[ComparisonRecord], failures: &[ComponentFailure]) -> Summary {
    let mut summary = Summary {
        total_components: records.len() + failures.len(),
        failed_components: failures.len(),
        ..Summary::default()
    };

    for record in records {
        summary.total_deviations += record.deviations.len();
        summary.total_matches += record.matches.len();

        let mut impacted = false;
        for deviation in &record.deviations {
            match deviation.severity {
                Severity::High => summary.severity.high += 1,
                Severity::Medium => summary.severity.medium += 1,
                Severity::Low => summary.severity.low += 1,
            }
            match deviation.regression_risk {
                Some(RegressionRisk::Critical) => summary.regression_risk.critical += 1,
                Some(RegressionRisk::Major) => summary.regression_risk.major += 1,
                Some(RegressionRisk::Minor) => summary.regression_risk.minor += 1,
                None => {}
            }
            if deviation.accessibility {
                impacted = true;
                summary.accessibility.issues += 1;
                summary.accessibility.details.push(AccessibilityDetail {
                    component_id: record.component_id.clone(),
                    component_name: record.component_name.clone(),
                    property: deviation.property.clone(),
                    severity: deviation.severity,
                    message: deviation.message.clone(),
                });
            }
        }
        if impacted {
            summary.accessibility.impacted_components += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Deviation, Match, PropertyOutcome};
    use serde_json::Value;

    fn record(id: &str, outcomes: Vec<PropertyOutcome>) -> ComparisonRecord {
        ComparisonRecord::from_outcomes(id, id, "FRAME", outcomes)
    }

    #[test]
    fn counts_severities_risks_and_accessibility() {
        let mut critical = Deviation::new("existence", "Card", Value::Null, Severity::High, "missing");
        critical.regression_risk = Some(RegressionRisk::Critical);
        let records = vec![
            record("a", vec![PropertyOutcome::Deviation(critical)]),
            record(
                "b",
                vec![
                    PropertyOutcome::Deviation(
                        Deviation::new("alt", "text", "", Severity::High, "no alt").flag_accessibility(),
                    ),
                    PropertyOutcome::Deviation(
                        Deviation::new("contrast", 4.5, 3.1, Severity::Medium, "low").flag_accessibility(),
                    ),
                    PropertyOutcome::Match(Match::new("width", 10.0, "ok")),
                ],
            ),
        ];
        let failures = vec![ComponentFailure {
            component_id: "c".into(),
            component_name: "c".into(),
            reason: "panicked".into(),
        }];

        let summary = fold_summary(&records, &failures);
        assert_eq!(summary.total_components, 3);
        assert_eq!(summary.failed_components, 1);
        assert_eq!(summary.total_deviations, 3);
        assert_eq!(summary.total_matches, 1);
        assert_eq!(summary.severity.high, 2);
        assert_eq!(summary.severity.medium, 1);
        assert_eq!(summary.regression_risk.critical, 1);
        assert_eq!(summary.accessibility.issues, 2);
        assert_eq!(summary.accessibility.impacted_components, 1);
        assert_eq!(summary.accessibility.details[0].component_id, "b");
    }

    #[test]
    fn empty_run_is_all_zero() {
        assert_eq!(fold_summary(&[], &[]), Summary::default());
    }
}
