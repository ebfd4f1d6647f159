//! Utility modules

pub mod sync_compat;

/// Check if running in CI environment
///
/// Returns true if either CI or GITHUB_ACTIONS environment variable is set.
/// Used to skip loom models and long stress runs on shared runners.
#[inline]
pub fn is_ci_environment() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
