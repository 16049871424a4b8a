pub mod format;
pub mod logger;
pub mod progress;
pub mod serde;

pub use format::{display_name, format_elapsed, indent_lines};
pub use progress::ProgressReporter;
