// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{paper_html, TestCorpus};
#[allow(unused_imports)]
pub use helpers::{assert_valid_report, create_test_services, index_in_memory, test_config};
