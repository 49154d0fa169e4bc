// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection, delimiter detection, and file parsing

mod format_detector;

pub use format_detector::FormatDetector;
