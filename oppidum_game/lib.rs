pub mod catalog;
pub mod combat;
pub mod engine;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
