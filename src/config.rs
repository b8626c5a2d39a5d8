use serde::Deserialize;

const DEFAULT_COUNTRY_API_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
const DEFAULT_EXCHANGE_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub country_api_url: String,
    pub exchange_api_url: String,
    /// Upper bound for each external fetch, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Where the rendered summary PNG is written and served from.
    pub summary_image_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DATABASE_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            country_api_url: {
                let url = std::env::var("COUNTRY_API_URL")
                    .unwrap_or_else(|_| DEFAULT_COUNTRY_API_URL.to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("COUNTRY_API_URL must start with http:// or https://");
                }
                url
            },
            exchange_api_url: {
                let url = std::env::var("EXCHANGE_API_URL")
                    .unwrap_or_else(|_| DEFAULT_EXCHANGE_API_URL.to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("EXCHANGE_API_URL must start with http:// or https://");
                }
                url
            },
            fetch_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_MS must be a positive number"))
                .and_then(|ms: u64| {
                    if ms == 0 {
                        anyhow::bail!("REQUEST_TIMEOUT_MS cannot be zero");
                    }
                    Ok(ms)
                })?,
            summary_image_path: std::env::var("SUMMARY_IMAGE_PATH")
                .unwrap_or_else(|_| "./cache/summary.png".to_string()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Country source URL: {}", config.country_api_url);
        tracing::debug!("Exchange source URL: {}", config.exchange_api_url);
        tracing::debug!("Fetch timeout: {}ms", config.fetch_timeout_ms);
        tracing::debug!("Summary image path: {}", config.summary_image_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
