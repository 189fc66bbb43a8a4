//! JSON mappings of results

use copay_match::{MatchingConfig, Matcher, StudyConfig, StudyRunner};

use crate::utils::{provincial_population, twin_population};

#[test]
fn test_analysis_result_keys() {
    let households = twin_population(10, 100.0);
    let result = Matcher::new(MatchingConfig::builder().caliper(2.0).build())
        .analyse_all(&households)
        .unwrap()
        .unwrap();
    let value = result.to_value().unwrap();
    let object = value.as_object().unwrap();

    for key in [
        "n_treated_total",
        "n_control_total",
        "n_matched",
        "match_rate",
        "unmatched",
        "matched",
        "effect",
        "balance",
        "bootstrap",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert_eq!(value["n_matched"], 10);
    assert_eq!(value["effect"]["att"], 100.0);
    assert!(value["bootstrap"].is_null());
    assert_eq!(value["balance"]["metrics"].as_array().unwrap().len(), 8);
    assert_eq!(value["balance"]["metrics"][0]["covariate"], "log_expenditure");
    assert!(value["matched"]["median_diff"].is_number());
    assert!(value["unmatched"]["mann_whitney"]["p_value"].is_number());
}

#[test]
fn test_study_report_keys() {
    let households = provincial_population(1, 0, 8, 100.0);
    let config = StudyConfig {
        run_bootstrap: false,
        ..StudyConfig::default()
    };
    let value = StudyRunner::new(config).run(&households).unwrap().to_value().unwrap();

    assert!(value["national"].is_object());
    assert!(value["provincial"]["Western Cape"].is_object());
    assert!(value["provincial"]["Free State"].is_null());
    assert!(value["sensitivity_nonzero"].is_object());
    assert_eq!(value["sensitivity_exact_province"]["total_matched"], 8);
}
