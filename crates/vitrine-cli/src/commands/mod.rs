pub mod common;
pub mod completions;
pub mod list;
pub mod metrics;
pub mod toggle;
