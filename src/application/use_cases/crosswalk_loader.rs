// ============================================================
// CROSSWALK LOADER USE CASE
// ============================================================
// Map detected columns onto the crosswalk schema, normalize and
// deduplicate the rows, then upsert the batch

use std::collections::HashMap;

use tracing::info;

use crate::domain::crosswalk::CrosswalkRecord;
use crate::domain::error::{AppError, Result};
use crate::domain::table::RawTable;
use crate::infrastructure::db::crosswalk_repository::CrosswalkRepository;

/// Accepted header spellings per logical column, matched after trimming
/// and lower-casing. The vendor column is optional.
const TOW_ALIASES: &[&str] = &["tow_code", "tow"];
const SUPPLIER_ALIASES: &[&str] = &["supplier_id", "supplier_code"];
const VENDOR_ALIASES: &[&str] = &["vendor_id"];

pub struct CrosswalkLoader {
    repository: CrosswalkRepository,
}

impl CrosswalkLoader {
    pub fn new(repository: CrosswalkRepository) -> Self {
        Self { repository }
    }

    /// Normalize and deduplicate `table`, provision the schema, and
    /// upsert the batch. Returns the number of distinct records
    /// processed.
    pub async fn load(&self, table: &RawTable, rebuild: bool) -> Result<usize> {
        let records = normalize(table)?;
        info!(
            input_rows = table.row_count(),
            records = records.len(),
            "normalized and deduplicated input"
        );

        self.repository.ensure_schema(rebuild).await?;
        self.repository.upsert_all(&records).await?;

        Ok(records.len())
    }
}

/// Resolved column indexes for one input file.
struct ResolvedColumns {
    tow: usize,
    supplier: usize,
    vendor: Option<usize>,
}

/// Turn a raw table into normalized records, keeping only the last
/// record per (vendor_id, supplier_id) key in file order. Runs entirely
/// before any database interaction.
pub fn normalize(table: &RawTable) -> Result<Vec<CrosswalkRecord>> {
    let columns = resolve_columns(table)?;

    let mut index_by_key: HashMap<(String, String), usize> = HashMap::new();
    let mut records: Vec<CrosswalkRecord> = Vec::new();

    for row in &table.rows {
        let vendor = match columns.vendor {
            Some(idx) => row[idx].as_str(),
            None => "",
        };
        let record = CrosswalkRecord::from_cells(&row[columns.tow], &row[columns.supplier], vendor);

        match index_by_key.get(&record.key()).copied() {
            Some(existing) => records[existing] = record,
            None => {
                index_by_key.insert(record.key(), records.len());
                records.push(record);
            }
        }
    }

    Ok(records)
}

/// Case-insensitive, whitespace-trimmed resolution of header names
/// against the alias tables. Duplicate spellings resolve to the last
/// occurrence.
fn resolve_columns(table: &RawTable) -> Result<ResolvedColumns> {
    let lookup: HashMap<String, usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let find = |aliases: &[&str]| aliases.iter().find_map(|alias| lookup.get(*alias).copied());

    match (find(TOW_ALIASES), find(SUPPLIER_ALIASES)) {
        (Some(tow), Some(supplier)) => Ok(ResolvedColumns {
            tow,
            supplier,
            vendor: find(VENDOR_ALIASES),
        }),
        _ => Err(AppError::SchemaError(format!(
            "Input needs a tow_code/tow and a supplier_id/supplier_code column. Found: {:?}",
            table.columns
        ))),
    }
}
