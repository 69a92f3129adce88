//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

/// Handle fatal errors and exit with appropriate status code
///
/// - `verbose = 0`: the error message only
/// - `verbose >= 1`: the full error chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    let exit_code = if error.chain().any(|cause| {
        cause.downcast_ref::<toml::de::Error>().is_some()
            || cause.downcast_ref::<crate::error::Error>().is_some_and(|e| {
                matches!(e, crate::error::Error::Config(_) | crate::error::Error::Toml(_))
            })
    }) {
        2 // CONFIG_ERROR
    } else {
        1 // GENERAL_ERROR
    };

    std::process::exit(exit_code)
}
