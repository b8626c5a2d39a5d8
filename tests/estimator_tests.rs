/// Unit tests for the GDP estimator's derivation rules.
/// The multiplier is intentionally non-deterministic, so tests assert bounds,
/// never exact figures.
use country_gdp_api::estimator::{estimate, MULTIPLIER_MAX, MULTIPLIER_MIN};
use country_gdp_api::models::{RawCountry, RawCurrency};
use std::collections::HashMap;

fn currency(code: Option<&str>) -> RawCurrency {
    RawCurrency {
        code: code.map(str::to_string),
        name: None,
        symbol: None,
    }
}

fn country(population: u64, currencies: Option<Vec<RawCurrency>>) -> RawCountry {
    RawCountry {
        name: "Testland".to_string(),
        capital: Some("Test City".to_string()),
        region: Some("Test Region".to_string()),
        population,
        flag: Some("https://flags.example/test.svg".to_string()),
        currencies,
    }
}

fn rate_table(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(code, rate)| (code.to_string(), *rate))
        .collect()
}

#[test]
fn missing_currency_list_falls_back_to_zero_gdp() {
    let result = estimate(&country(1_000_000, None), &rate_table(&[("USD", 1.0)]));

    assert_eq!(result.currency_code, None);
    assert_eq!(result.exchange_rate, None);
    // Explicit zero fallback, never derived from population
    assert_eq!(result.estimated_gdp, Some(0.0));
}

#[test]
fn empty_currency_list_falls_back_to_zero_gdp() {
    let result = estimate(&country(1_000_000, Some(vec![])), &rate_table(&[("USD", 1.0)]));

    assert_eq!(result.currency_code, None);
    assert_eq!(result.exchange_rate, None);
    assert_eq!(result.estimated_gdp, Some(0.0));
}

#[test]
fn first_currency_without_code_counts_as_no_currency() {
    let raw = country(500_000, Some(vec![currency(None)]));
    let result = estimate(&raw, &rate_table(&[("USD", 1.0)]));

    assert_eq!(result.currency_code, None);
    assert_eq!(result.estimated_gdp, Some(0.0));

    let raw = country(500_000, Some(vec![currency(Some(""))]));
    let result = estimate(&raw, &rate_table(&[("USD", 1.0)]));

    assert_eq!(result.currency_code, None);
    assert_eq!(result.estimated_gdp, Some(0.0));
}

#[test]
fn unknown_currency_code_yields_null_rate_and_gdp() {
    let raw = country(42_000_000, Some(vec![currency(Some("XTS"))]));
    let result = estimate(&raw, &rate_table(&[("USD", 1.0), ("EUR", 0.9)]));

    assert_eq!(result.currency_code, Some("XTS".to_string()));
    assert_eq!(result.exchange_rate, None);
    assert_eq!(result.estimated_gdp, None);
}

#[test]
fn resolvable_code_derives_gdp_within_multiplier_bounds() {
    let population = 1_000u64;
    let rate = 2.0;
    let raw = country(population, Some(vec![currency(Some("EUR"))]));
    let result = estimate(&raw, &rate_table(&[("EUR", rate)]));

    assert_eq!(result.currency_code, Some("EUR".to_string()));
    assert_eq!(result.exchange_rate, Some(rate));

    let gdp = result.estimated_gdp.expect("gdp derived for resolvable code");
    assert!(gdp > 0.0);
    assert!(gdp >= population as f64 * MULTIPLIER_MIN / rate);
    assert!(gdp <= population as f64 * MULTIPLIER_MAX / rate);
}

#[test]
fn zero_population_with_resolvable_rate_gives_zero_gdp() {
    let raw = country(0, Some(vec![currency(Some("USD"))]));
    let result = estimate(&raw, &rate_table(&[("USD", 1.0)]));

    assert_eq!(result.exchange_rate, Some(1.0));
    assert_eq!(result.estimated_gdp, Some(0.0));
}

#[test]
fn first_currency_entry_wins() {
    let raw = country(
        10_000,
        Some(vec![currency(Some("EUR")), currency(Some("USD"))]),
    );
    let result = estimate(&raw, &rate_table(&[("EUR", 0.5), ("USD", 1.0)]));

    assert_eq!(result.currency_code, Some("EUR".to_string()));
    assert_eq!(result.exchange_rate, Some(0.5));
}
