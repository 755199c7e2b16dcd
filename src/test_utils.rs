//! Test utilities and fixtures for showpicker tests.
//!
//! Common test helpers, record factories, and database utilities to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use showpicker::test_utils::{temp_catalog, catalog_record};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (catalog, _dir) = temp_catalog().await;
//!     let record = catalog_record("gd77-05-08.sbd", "SBD", "Flac");
//!     // ... test logic
//! }
//! ```

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::catalog::{CatalogRecord, SqliteCatalog, open_catalog};

/// Creates a temporary catalog database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically.
///
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_catalog() -> (SqliteCatalog, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("catalog.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let catalog = open_catalog(&db_url)
        .await
        .expect("Failed to initialize test catalog");

    (catalog, dir)
}

/// The performance date most fixtures use (1977-05-08).
pub fn show_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1977, 5, 8).expect("valid date")
}

/// A catalog record on [`show_date`] with free-text source and format.
///
/// Empty strings leave the field unset. Customize further with struct
/// update syntax or field assignment.
pub fn catalog_record(identifier: &str, source: &str, format: &str) -> CatalogRecord {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    CatalogRecord {
        source: non_empty(source),
        format: non_empty(format),
        ..CatalogRecord::new(identifier, show_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ShowCatalog;

    #[tokio::test]
    async fn test_temp_catalog_creates_schema() {
        let (catalog, dir) = temp_catalog().await;
        assert!(dir.path().join("catalog.db").exists());
        assert!(catalog.recordings_for_date(show_date()).await.unwrap().is_empty());
    }

    #[test]
    fn test_catalog_record_fixture() {
        let record = catalog_record("x", "", "Flac");
        assert_eq!(record.source, None);
        assert_eq!(record.format.as_deref(), Some("Flac"));
        assert_eq!(record.date, show_date());
    }
}
