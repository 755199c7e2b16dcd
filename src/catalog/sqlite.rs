//! SQLite-backed show catalog.
//!
//! Uses SQLx with SQLite. The core only ever reads from it; the schema lives
//! in `migrations/` so a fresh file can be opened (and filled by other tools).

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use super::{CatalogError, CatalogRecord, ShowCatalog};
use crate::quality::SourceType;

/// Open (creating if needed) a catalog database and run migrations.
///
/// # Arguments
///
/// * `db_url` - SQLite connection URL (e.g., "sqlite:shows.db")
pub async fn open_catalog(db_url: &str) -> Result<SqliteCatalog, CatalogError> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(SqliteCatalog::new(pool))
}

/// Raw row; dates and enums are stored as text.
#[derive(Debug, sqlx::FromRow)]
struct RecordingRow {
    identifier: String,
    date: String,
    title: Option<String>,
    venue: Option<String>,
    source: Option<String>,
    source_type: Option<String>,
    format: Option<String>,
    avg_rating: Option<f64>,
    num_reviews: Option<i64>,
    lineage: Option<String>,
    taper: Option<String>,
}

impl RecordingRow {
    fn into_record(self) -> Option<CatalogRecord> {
        let Ok(date) = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") else {
            tracing::warn!(identifier = %self.identifier, date = %self.date, "Skipping catalog row with bad date");
            return None;
        };

        Some(CatalogRecord {
            identifier: self.identifier,
            date,
            title: self.title,
            venue: self.venue,
            source: self.source,
            source_type: self
                .source_type
                .filter(|s| !s.trim().is_empty())
                .and_then(|s| s.parse::<SourceType>().ok()),
            format: self.format,
            avg_rating: self.avg_rating,
            num_reviews: self.num_reviews.and_then(|n| u32::try_from(n).ok()),
            lineage: self.lineage,
            taper: self.taper,
        })
    }
}

/// Read-only catalog over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ShowCatalog for SqliteCatalog {
    async fn recordings_for_date(&self, date: NaiveDate) -> Result<Vec<CatalogRecord>, CatalogError> {
        let rows: Vec<RecordingRow> = sqlx::query_as(
            "SELECT identifier, date, title, venue, source, source_type, format,
                    avg_rating, num_reviews, lineage, taper
             FROM recordings
             WHERE date = ?
             ORDER BY catalog_order, rowid",
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(RecordingRow::into_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{show_date, temp_catalog};

    async fn insert(catalog: &SqliteCatalog, id: &str, date: &str, source_type: Option<&str>, order: i64) {
        sqlx::query(
            "INSERT INTO recordings (identifier, date, source_type, format, avg_rating, num_reviews, catalog_order)
             VALUES (?, ?, ?, 'Flac', 4.5, 20, ?)",
        )
        .bind(id)
        .bind(date)
        .bind(source_type)
        .bind(order)
        .execute(catalog.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_recordings_for_date() {
        let (catalog, _dir) = temp_catalog().await;
        insert(&catalog, "gd77-05-08.aud", "1977-05-08", Some("audience"), 2).await;
        insert(&catalog, "gd77-05-08.sbd", "1977-05-08", Some("soundboard"), 1).await;
        insert(&catalog, "gd77-05-09.sbd", "1977-05-09", None, 0).await;

        let date = NaiveDate::from_ymd_opt(1977, 5, 8).unwrap();
        let records = catalog.recordings_for_date(date).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "gd77-05-08.sbd");
        assert_eq!(records[0].source_type, Some(SourceType::Soundboard));
        assert_eq!(records[0].num_reviews, Some(20));
        assert_eq!(records[1].source_type, Some(SourceType::Audience));
    }

    #[tokio::test]
    async fn test_empty_date_returns_nothing() {
        let (catalog, _dir) = temp_catalog().await;
        let date = NaiveDate::from_ymd_opt(1995, 7, 9).unwrap();
        assert!(catalog.recordings_for_date(date).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_free_text_source_type_left_unset() {
        let (catalog, _dir) = temp_catalog().await;
        insert(&catalog, "gd77-05-08.sbd", "1977-05-08", Some("SBD"), 0).await;
        let records = catalog.recordings_for_date(show_date()).await.unwrap();
        assert_eq!(records[0].source_type, None);
    }

    #[tokio::test]
    async fn test_negative_review_count_dropped() {
        let (catalog, _dir) = temp_catalog().await;
        sqlx::query("INSERT INTO recordings (identifier, date, num_reviews) VALUES ('x', '1980-01-01', -4)")
            .execute(catalog.pool())
            .await
            .unwrap();
        let date = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
        let records = catalog.recordings_for_date(date).await.unwrap();
        assert_eq!(records[0].num_reviews, None);
        assert_eq!(records[0].source_type, None);
    }
}
