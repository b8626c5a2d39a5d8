use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_COUNTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS countries (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    capital TEXT,
    region TEXT,
    population BIGINT NOT NULL DEFAULT 0,
    currency_code TEXT,
    exchange_rate DOUBLE PRECISION,
    estimated_gdp DOUBLE PRECISION,
    flag_url TEXT NOT NULL DEFAULT '',
    last_refreshed_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_GDP_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS countries_estimated_gdp_idx
    ON countries (estimated_gdp DESC)
    WHERE estimated_gdp IS NOT NULL
"#;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        // Ensure the schema exists; both statements are idempotent
        sqlx::query(CREATE_COUNTRIES_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_GDP_INDEX).execute(&pool).await?;

        Ok(Self { pool })
    }
}
