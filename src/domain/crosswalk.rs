// ============================================================
// CROSSWALK DOMAIN TYPES
// ============================================================
// The mapping entity between TOW codes and supplier/vendor identifiers.
// No I/O, no async, no external dependencies

use serde::{Deserialize, Serialize};

/// One crosswalk mapping row.
///
/// `tow_code` is an opaque domain identifier; `supplier_id` and
/// `vendor_id` are case-normalized so key comparisons are stable.
/// A missing vendor column leaves `vendor_id` as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswalkRecord {
    pub tow_code: String,
    pub supplier_id: String,
    pub vendor_id: String,
}

impl CrosswalkRecord {
    /// Build a record from raw cell text, applying the canonical
    /// normalization: trim everything, upper-case the identifiers.
    pub fn from_cells(tow_code: &str, supplier_id: &str, vendor_id: &str) -> Self {
        Self {
            tow_code: tow_code.trim().to_string(),
            supplier_id: supplier_id.trim().to_uppercase(),
            vendor_id: vendor_id.trim().to_uppercase(),
        }
    }

    /// Natural key: (vendor_id, supplier_id). The storage layer enforces
    /// uniqueness on the same pair.
    pub fn key(&self) -> (String, String) {
        (self.vendor_id.clone(), self.supplier_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_trims_and_uppercases() {
        let record = CrosswalkRecord::from_cells("  TOW1 ", " abc ", " v9 ");

        assert_eq!(record.tow_code, "TOW1");
        assert_eq!(record.supplier_id, "ABC");
        assert_eq!(record.vendor_id, "V9");
    }

    #[test]
    fn test_tow_code_case_is_preserved() {
        let record = CrosswalkRecord::from_cells("t-10x", "s1", "v1");

        assert_eq!(record.tow_code, "t-10x");
    }

    #[test]
    fn test_key_is_vendor_then_supplier() {
        let record = CrosswalkRecord::from_cells("TOW1", "s1", "v1");

        assert_eq!(record.key(), ("V1".to_string(), "S1".to_string()));
    }
}
