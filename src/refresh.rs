use crate::config::Config;
use crate::errors::AppError;
use crate::estimator::estimate;
use crate::models::{NewCountry, RefreshOutcome};
use crate::sources::SourceClient;
use crate::storage::CountryStorage;
use crate::summary::SummaryRenderer;
use chrono::{SecondsFormat, Utc};
use sqlx::PgPool;

/// Orchestrates the refresh pipeline: fetch both sources, derive per-record
/// GDP fields, commit the snapshot transactionally, then rebuild the summary
/// artifact.
///
/// Fetch-before-write keeps the store untouched when either upstream is slow
/// or failing; one timestamp is captured for the whole batch so "most recent
/// refresh" is a race-free value.
pub struct RefreshService {
    sources: SourceClient,
    storage: CountryStorage,
    renderer: SummaryRenderer,
}

impl RefreshService {
    pub fn new(config: &Config, pool: PgPool) -> Result<Self, AppError> {
        Ok(Self {
            sources: SourceClient::new(config)?,
            storage: CountryStorage::new(pool.clone()),
            renderer: SummaryRenderer::new(config, pool),
        })
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, AppError> {
        // Both sources must succeed before storage is touched; a failure on
        // either side discards the other's result
        let (countries, rates) =
            tokio::try_join!(self.sources.fetch_countries(), self.sources.fetch_rates())?;

        let now = Utc::now();
        let now_iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let candidates: Vec<NewCountry> = countries
            .iter()
            .map(|raw| {
                let derived = estimate(raw, &rates);
                NewCountry {
                    name: raw.name.clone(),
                    capital: raw.capital.clone(),
                    region: raw.region.clone(),
                    population: raw.population as i64,
                    currency_code: derived.currency_code,
                    exchange_rate: derived.exchange_rate,
                    estimated_gdp: derived.estimated_gdp,
                    flag_url: raw.flag.clone().unwrap_or_default(),
                    last_refreshed_at: now,
                }
            })
            .collect();

        self.storage.replace_snapshot(&candidates).await?;
        tracing::info!("Snapshot committed: {} countries at {}", candidates.len(), now_iso);

        // The commit is durable at this point; a render failure is reported
        // through a null summary field, never by rolling back
        let summary_svg_base64 = match self.renderer.render(&now_iso).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::error!("Summary render failed after commit: {}", e);
                None
            }
        };

        Ok(RefreshOutcome {
            total_countries: candidates.len(),
            last_refreshed_at: now_iso,
            summary_svg_base64,
        })
    }
}
