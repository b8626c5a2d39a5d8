use crate::config::Config;
use crate::errors::AppError;
use crate::models::StatusReport;
use crate::storage::CountryStorage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::SecondsFormat;
use sqlx::PgPool;
use std::path::PathBuf;

/// Read-only health view over the persisted snapshot.
pub struct StatusReporter {
    storage: CountryStorage,
    artifact_path: PathBuf,
}

impl StatusReporter {
    pub fn new(config: &Config, pool: PgPool) -> Self {
        Self {
            storage: CountryStorage::new(pool),
            artifact_path: PathBuf::from(&config.summary_image_path),
        }
    }

    /// Aggregate record count, most recent refresh timestamp, and the last
    /// rendered artifact. The artifact read is best-effort: a missing or
    /// unreadable file yields null, never a failed status call.
    pub async fn status(&self) -> Result<StatusReport, AppError> {
        let total_countries = self.storage.count().await?;
        let last_refreshed_at = self
            .storage
            .latest_refresh()
            .await?
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true));

        let summary_png_base64 = match tokio::fs::read(&self.artifact_path).await {
            Ok(bytes) => Some(STANDARD.encode(bytes)),
            Err(_) => None,
        };

        Ok(StatusReport {
            total_countries,
            last_refreshed_at,
            summary_png_base64,
        })
    }
}
