//! Tests for covariate extraction and pooled standardization

use copay_match::algorithm::estimation::statistics::{mean, std_dev};
use copay_match::algorithm::matching::{
    Covariate, StandardizationParams, build_covariate_matrix, standardize,
};

use crate::utils::{synthetic_household, twin_population};

#[test]
fn test_covariate_values() {
    let household = synthetic_household("h", true, 3, 10.0);
    let matrix = build_covariate_matrix(&[household], None).unwrap();
    let row = matrix.row(0);
    assert_eq!(row.len(), Covariate::COUNT);
    assert!((row[0] - 18_000f64.ln_1p()).abs() < 1e-12);
    assert!((row[1] - 24_500f64.ln_1p()).abs() < 1e-12);
    assert_eq!(row[2], 4.0);
    assert_eq!(row[3], 31.0);
    assert_eq!(row[4], 2.0);
    assert_eq!(row[5], 4.0);
    // education code "3" falls in the 1-7 bucket
    assert_eq!(row[6], 1.0);
    assert_eq!(row[7], 1.0);
}

#[test]
fn test_subset_rows_follow_index_order() {
    let households = twin_population(5, 100.0);
    let matrix = build_covariate_matrix(&households, Some(&[4, 0])).unwrap();
    assert_eq!(matrix.rows(), 2);
    assert_eq!(matrix.row(0)[3], 29.0);
    assert_eq!(matrix.row(1)[3], 25.0);
}

#[test]
fn test_pooled_parameters_are_shared() {
    let households = twin_population(10, 100.0);
    let pooled = build_covariate_matrix(&households, None).unwrap();
    let (standardized, params) = standardize(&pooled, None).unwrap();

    for col in 0..Covariate::COUNT {
        let values: Vec<f64> = standardized.column(col).collect();
        assert!(mean(&values).abs() < 1e-9);
        assert!((std_dev(&values, 0) - 1.0).abs() < 1e-9);
    }

    // A subset standardized with the pooled parameters keeps pooled scaling
    let treated: Vec<usize> = (0..households.len()).step_by(2).collect();
    let subset = build_covariate_matrix(&households, Some(&treated)).unwrap();
    let (subset_std, reused) = standardize(&subset, Some(&params)).unwrap();
    assert_eq!(reused, params);
    assert_eq!(subset_std.row(0), standardized.row(0));
}

#[test]
fn test_constant_column_keeps_unit_scale() {
    let households: Vec<_> = (0..6)
        .map(|i| {
            let mut h = synthetic_household(&format!("h{i}"), i % 2 == 0, i, 0.0);
            h.settlement_type = Some(2);
            h
        })
        .collect();
    let matrix = build_covariate_matrix(&households, None).unwrap();
    let params = StandardizationParams::fit(&matrix);
    assert_eq!(params.std[7], 1.0);
    let standardized = params.apply(&matrix).unwrap();
    assert!(standardized.column(7).all(|v| v == 0.0));
}
