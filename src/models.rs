use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

// ============ External Payloads (ephemeral) ============

/// One currency descriptor attached to a raw country payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrency {
    /// ISO-4217 code; some source entries carry none.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// A country as delivered by the external country source.
///
/// Only `name` is required; everything else degrades to a sensible default
/// so one sparse entry cannot poison the whole snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Non-negative; absent means 0.
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<RawCurrency>>,
}

/// Envelope of the exchange-rate source. A missing or malformed `rates`
/// member degrades to an empty table rather than failing the fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct RatePayload {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

// ============ Database Models ============

/// A persisted country record, the durable entity of the snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: i64,
    /// Unique identifier for matching across refreshes (case-sensitive).
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    /// Null when the source country has no currency entries.
    pub currency_code: Option<String>,
    /// Null when `currency_code` is null or absent from the rate table.
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: String,
    /// Equal across every record of one refresh batch.
    pub last_refreshed_at: DateTime<Utc>,
}

/// A candidate record built by the refresh pipeline, before persistence.
#[derive(Debug, Clone)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: String,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Name and GDP of one entry in the summary ranking.
#[derive(Debug, Clone, FromRow)]
pub struct GdpRanked {
    pub name: String,
    pub estimated_gdp: f64,
}

// ============ API Shapes ============

/// Result of a completed refresh run.
#[derive(Debug, Serialize)]
pub struct RefreshOutcome {
    pub total_countries: usize,
    /// ISO-8601 timestamp shared by every record of the batch.
    pub last_refreshed_at: String,
    /// Base64 of the SVG summary source; null if rendering failed after commit.
    pub summary_svg_base64: Option<String>,
}

/// Read-only health view of the persisted snapshot.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub total_countries: i64,
    pub last_refreshed_at: Option<String>,
    /// Base64 of the PNG artifact on disk; null if missing or unreadable.
    pub summary_png_base64: Option<String>,
}

/// Optional filters for the country listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    /// `gdp_desc` or `gdp_asc`; anything else keeps store order.
    pub sort: Option<String>,
}
