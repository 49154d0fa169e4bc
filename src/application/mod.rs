pub mod use_cases;

pub use use_cases::crosswalk_loader::CrosswalkLoader;
