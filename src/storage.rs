use crate::errors::AppError;
use crate::models::{Country, GdpRanked, ListQuery, NewCountry};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};

const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// Storage layer for persisted country records.
pub struct CountryStorage {
    pool: PgPool,
}

impl CountryStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commit a full snapshot in one transaction.
    ///
    /// Each candidate is matched by exact name and updated in place, or
    /// inserted on first sight. All candidates commit together or none do;
    /// any per-row failure rolls the whole batch back.
    pub async fn replace_snapshot(&self, candidates: &[NewCountry]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::DatabaseError)?;

        for candidate in candidates {
            // Exact-case match; switching to case-insensitive would silently
            // merge rows that today stay distinct
            let existing: Option<i64> =
                sqlx::query_scalar("SELECT id FROM countries WHERE name = $1")
                    .bind(&candidate.name)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::DatabaseError)?;

            match existing {
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE countries
                        SET capital = $2,
                            region = $3,
                            population = $4,
                            currency_code = $5,
                            exchange_rate = $6,
                            estimated_gdp = $7,
                            flag_url = $8,
                            last_refreshed_at = $9
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .bind(&candidate.capital)
                    .bind(&candidate.region)
                    .bind(candidate.population)
                    .bind(&candidate.currency_code)
                    .bind(candidate.exchange_rate)
                    .bind(candidate.estimated_gdp)
                    .bind(&candidate.flag_url)
                    .bind(candidate.last_refreshed_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::DatabaseError)?;
                }
                None => {
                    sqlx::query(
                        r#"
                        INSERT INTO countries
                            (name, capital, region, population, currency_code,
                             exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                        "#,
                    )
                    .bind(&candidate.name)
                    .bind(&candidate.capital)
                    .bind(&candidate.region)
                    .bind(candidate.population)
                    .bind(&candidate.currency_code)
                    .bind(candidate.exchange_rate)
                    .bind(candidate.estimated_gdp)
                    .bind(&candidate.flag_url)
                    .bind(candidate.last_refreshed_at)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::DatabaseError)?;
                }
            }
        }

        tx.commit().await.map_err(AppError::DatabaseError)?;
        Ok(())
    }

    /// List records with optional region/currency filters and GDP ordering.
    pub async fn list(&self, filter: &ListQuery) -> Result<Vec<Country>, AppError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM countries WHERE 1=1",
            COUNTRY_COLUMNS
        ));

        if let Some(ref region) = filter.region {
            builder.push(" AND region = ").push_bind(region);
        }
        if let Some(ref currency) = filter.currency {
            builder.push(" AND currency_code = ").push_bind(currency);
        }

        match filter.sort.as_deref() {
            Some("gdp_desc") => {
                builder.push(" ORDER BY estimated_gdp DESC NULLS LAST");
            }
            Some("gdp_asc") => {
                builder.push(" ORDER BY estimated_gdp ASC NULLS LAST");
            }
            _ => {
                builder.push(" ORDER BY name ASC");
            }
        }

        let countries = builder
            .build_query_as::<Country>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(countries)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Country>, AppError> {
        let country = sqlx::query_as::<_, Country>(&format!(
            "SELECT {} FROM countries WHERE name = $1",
            COUNTRY_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(country)
    }

    /// Delete a record by exact name. Returns false if no such record exists.
    pub async fn delete_by_name(&self, name: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM countries WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(total)
    }

    /// Most recent refresh timestamp across all records; None on an empty store.
    pub async fn latest_refresh(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let latest: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(last_refreshed_at) FROM countries")
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::DatabaseError)?;

        Ok(latest)
    }

    /// Top records by estimated GDP, excluding rows where it is null.
    /// Ties fall back to store order; the ranking is a display artifact only.
    pub async fn top_by_gdp(&self, limit: i64) -> Result<Vec<GdpRanked>, AppError> {
        let ranked = sqlx::query_as::<_, GdpRanked>(
            r#"
            SELECT name, estimated_gdp
            FROM countries
            WHERE estimated_gdp IS NOT NULL
            ORDER BY estimated_gdp DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(ranked)
    }
}
