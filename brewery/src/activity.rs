//! Named scopes for parameterized test cases.
//!
//! [`test_each!`](crate::test_each) runs each case through [`run_activity`], so a failing case
//! reports which value it was run with.

use std::panic::{self, AssertUnwindSafe};

/// Runs `f` inside a span named after the case.
///
/// If `f` panics, the panic is raised again with the case name in front of the original
/// message, so the test harness shows which case failed.
///
/// ```rust
/// let doubled = brewery::activity::run_activity("2", || 2 * 2);
/// assert_eq!(doubled, 4);
/// ```
pub fn run_activity<R>(name: &str, f: impl FnOnce() -> R) -> R {
    let span = tracing::info_span!("activity", case = name);
    let _entered = span.enter();

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => {
            tracing::debug!("case passed");
            result
        }
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else {
                "unknown panic".to_string()
            };
            tracing::error!(%message, "case failed");
            panic!("test case `{}` failed: {}", name, message);
        }
    }
}
