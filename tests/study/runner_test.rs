//! Full study runs over synthetic provinces

use copay_match::{BootstrapConfig, JsonRecordSource, StudyConfig, StudyRunner};

use crate::utils::provincial_population;

fn config() -> StudyConfig {
    StudyConfig {
        bootstrap: BootstrapConfig::new()
            .with_replications(40)
            .with_min_successful(10),
        ..StudyConfig::default()
    }
}

fn population() -> Vec<copay_match::Household> {
    let mut households = provincial_population(1, 0, 10, 100.0);
    households.extend(provincial_population(7, 10, 10, 100.0));
    households
}

#[test]
fn test_study_report_sections() {
    let report = StudyRunner::new(config()).run(&population()).unwrap();

    let national = report.national.as_ref().unwrap();
    assert_eq!(national.n_matched, 20);
    assert!((national.effect.att - 100.0).abs() < 1e-9);
    assert!(national.bootstrap.is_some());

    assert_eq!(report.provincial.len(), 9);
    assert!(report.provincial["Western Cape"].is_some());
    assert!(report.provincial["Gauteng"].is_some());
    assert!(report.provincial["Limpopo"].is_none());

    let pooled = report.sensitivity_exact_province.as_ref().unwrap();
    assert_eq!(pooled.total_matched, 20);
    assert_eq!(pooled.strata_used, 2);
    assert!((pooled.pooled_att - 100.0).abs() < 1e-9);

    let nonzero = report.sensitivity_nonzero.as_ref().unwrap();
    assert_eq!(nonzero.n_matched, 20);
}

#[test]
fn test_nonzero_sensitivity_excludes_zero_spenders() {
    let mut households = population();
    for h in households.iter_mut().filter(|h| h.id == "c0" || h.id == "c1") {
        h.health_expenditure = Some(0.0);
    }
    let mut config = config();
    config.run_bootstrap = false;
    let report = StudyRunner::new(config).run(&households).unwrap();

    assert!(report.national.as_ref().unwrap().bootstrap.is_none());
    assert_eq!(report.sensitivity_nonzero.as_ref().unwrap().n_control_total, 18);
}

#[test]
fn test_run_from_json_source() {
    let json = serde_json::to_string(&population()).unwrap();
    let mut config = config();
    config.run_bootstrap = false;
    let report = StudyRunner::new(config)
        .run_source(&JsonRecordSource::from_json(json))
        .unwrap();
    assert_eq!(report.national.unwrap().n_treated_total, 20);
}
