//! Show catalog access.
//!
//! The catalog is a keyed local store of recordings, populated elsewhere.
//! Selection only needs to read the candidates for one performance date, so
//! that is the whole of the [`ShowCatalog`] contract.

mod sqlite;

pub use sqlite::{SqliteCatalog, open_catalog};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::quality::SourceType;

/// A recording as the catalog knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Unique recording identifier
    pub identifier: String,
    /// Performance date
    pub date: NaiveDate,
    pub title: Option<String>,
    pub venue: Option<String>,
    /// Free-text source description ("SBD", "Aud > Cass > DAT", ...)
    pub source: Option<String>,
    /// Explicit source type, when the catalog has one
    pub source_type: Option<SourceType>,
    /// Encoding descriptor
    pub format: Option<String>,
    pub avg_rating: Option<f64>,
    pub num_reviews: Option<u32>,
    pub lineage: Option<String>,
    pub taper: Option<String>,
}

impl CatalogRecord {
    /// A record with only identifier and date set.
    pub fn new(identifier: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            identifier: identifier.into(),
            date,
            title: None,
            venue: None,
            source: None,
            source_type: None,
            format: None,
            avg_rating: None,
            num_reviews: None,
            lineage: None,
            taper: None,
        }
    }
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Read access to the show catalog.
#[async_trait]
pub trait ShowCatalog: Send + Sync {
    /// Every recording of the performance on `date`, in catalog order.
    async fn recordings_for_date(&self, date: NaiveDate) -> Result<Vec<CatalogRecord>, CatalogError>;
}

/// In-memory catalog, used for tests and fixtures.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: RwLock<Vec<CatalogRecord>>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn insert(&self, record: CatalogRecord) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ShowCatalog for MemoryCatalog {
    async fn recordings_for_date(&self, date: NaiveDate) -> Result<Vec<CatalogRecord>, CatalogError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_memory_catalog_filters_by_date() {
        let catalog = MemoryCatalog::new(vec![
            CatalogRecord::new("a", date("1977-05-08")),
            CatalogRecord::new("b", date("1977-05-09")),
            CatalogRecord::new("c", date("1977-05-08")),
        ]);

        let found = catalog.recordings_for_date(date("1977-05-08")).await.unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let none = catalog.recordings_for_date(date("1990-01-01")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_memory_catalog_insert() {
        let catalog = MemoryCatalog::default();
        assert!(catalog.is_empty());
        catalog.insert(CatalogRecord::new("a", date("1972-08-27")));
        assert_eq!(catalog.len(), 1);
    }
}
