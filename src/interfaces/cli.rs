// ============================================================
// CLI INTERFACE
// ============================================================
// Argument surface and top-level run wiring

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::application::use_cases::crosswalk_loader::CrosswalkLoader;
use crate::domain::error::Result;
use crate::infrastructure::csv::FormatDetector;
use crate::infrastructure::db::{connect_pool, CrosswalkRepository};

/// Load a TOW/supplier/vendor crosswalk file into a relational table.
#[derive(Parser, Debug)]
#[command(name = "crosswalk-loader", version)]
pub struct Cli {
    /// Path to the source CSV file
    #[arg(long)]
    pub csv: PathBuf,

    /// Database connection string (postgres://... or sqlite://...)
    #[arg(long)]
    pub db: String,

    /// Drop and recreate the crosswalk table before loading
    #[arg(long)]
    pub rebuild: bool,
}

/// Run one load: detect and read the file, connect, normalize, upsert.
/// Returns the number of distinct records processed.
pub async fn run(cli: Cli) -> Result<usize> {
    let table = FormatDetector::detect_and_read(&cli.csv)?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        path = %cli.csv.display(),
        "read input file"
    );

    let pool = connect_pool(&cli.db).await?;
    let loader = CrosswalkLoader::new(CrosswalkRepository::new(pool));

    loader.load(&table, cli.rebuild).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use std::fs;
    use tempfile::TempDir;

    fn sqlite_url(dir: &TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("out.db").display())
    }

    async fn tow_for(db_url: &str, vendor: &str, supplier: &str) -> String {
        let pool = connect_pool(db_url).await.unwrap();
        sqlx::query_scalar("SELECT tow_code FROM crosswalk WHERE vendor_id = $1 AND supplier_id = $2")
            .bind(vendor)
            .bind(supplier)
            .fetch_one(&pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_comma_utf8() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("input.csv");
        fs::write(
            &csv_path,
            "tow_code,supplier_id,vendor_id\nTOW1,s1,v1\nTOW2,S1,V1\n",
        )
        .unwrap();

        let count = run(Cli {
            csv: csv_path,
            db: sqlite_url(&dir),
            rebuild: false,
        })
        .await
        .unwrap();

        // duplicate (V1, S1) key collapses to the later row
        assert_eq!(count, 1);
        assert_eq!(tow_for(&sqlite_url(&dir), "V1", "S1").await, "TOW2");
    }

    #[tokio::test]
    async fn test_end_to_end_semicolon_windows_1252() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("input.csv");
        fs::write(
            &csv_path,
            b"tow;supplier_code\nCAF\xE9;s1\n".as_slice(),
        )
        .unwrap();

        let count = run(Cli {
            csv: csv_path,
            db: sqlite_url(&dir),
            rebuild: false,
        })
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(tow_for(&sqlite_url(&dir), "", "S1").await, "CAF\u{e9}");
    }

    #[tokio::test]
    async fn test_missing_columns_leave_table_uncreated() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("input.csv");
        fs::write(&csv_path, "foo,bar\n1,2\n").unwrap();
        let db_url = sqlite_url(&dir);

        let err = run(Cli {
            csv: csv_path,
            db: db_url.clone(),
            rebuild: false,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));

        let pool = connect_pool(&db_url).await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'crosswalk'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_io_error() {
        let dir = TempDir::new().unwrap();

        let err = run(Cli {
            csv: dir.path().join("does-not-exist.csv"),
            db: sqlite_url(&dir),
            rebuild: false,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::IoError(_)));
    }
}
