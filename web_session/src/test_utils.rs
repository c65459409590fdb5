//! Test utilities module for shared test initialization
//!
//! Loads `.env_test` (falling back to `.env`) exactly once so that tests which
//! read the process environment see a consistent starting point.

use std::sync::Once;

/// Centralized test initialization for all tests across the crate
///
/// ## Usage
/// ```rust,ignore
/// use crate::test_utils::init_test_environment;
///
/// #[test]
/// fn my_test() {
///     init_test_environment();
///     // ... test code that reads SESSION_* variables
/// }
/// ```
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}
