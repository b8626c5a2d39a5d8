use crate::models::RawCountry;
use rand::Rng;
use std::collections::HashMap;

pub const MULTIPLIER_MIN: f64 = 1000.0;
pub const MULTIPLIER_MAX: f64 = 2000.0;

/// Derived currency and GDP fields for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpEstimate {
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
}

/// Economic scaling factor absent from the source data. Drawn fresh per
/// record per run; callers must not assume reproducibility.
fn random_multiplier() -> f64 {
    rand::rng().random_range(MULTIPLIER_MIN..MULTIPLIER_MAX)
}

/// Derive `(currency_code, exchange_rate, estimated_gdp)` for one raw
/// country against a rate table.
///
/// Rules:
/// - the first currency entry wins; an entry without a non-empty code counts
///   as no currency at all
/// - no currency: `estimated_gdp` is an explicit 0, `exchange_rate` null
/// - currency missing from the rate table: both rate and GDP null
/// - otherwise GDP = population * multiplier / rate, multiplier uniform in
///   [1000, 2000)
pub fn estimate(raw: &RawCountry, rates: &HashMap<String, f64>) -> GdpEstimate {
    let currency_code = raw
        .currencies
        .as_deref()
        .and_then(|list| list.first())
        .and_then(|c| c.code.clone())
        .filter(|code| !code.is_empty());

    let Some(code) = currency_code else {
        return GdpEstimate {
            currency_code: None,
            exchange_rate: None,
            estimated_gdp: Some(0.0),
        };
    };

    match rates.get(&code).copied() {
        None => GdpEstimate {
            currency_code: Some(code),
            exchange_rate: None,
            estimated_gdp: None,
        },
        Some(rate) => {
            let gdp = (raw.population as f64 * random_multiplier()) / rate;
            GdpEstimate {
                currency_code: Some(code),
                exchange_rate: Some(rate),
                estimated_gdp: Some(gdp),
            }
        }
    }
}
