pub mod crosswalk;
pub mod error;
pub mod table;

pub use crosswalk::CrosswalkRecord;
pub use table::RawTable;
