//! Logging facilities for Quickport.
//!
//! Quickport uses the `tracing` crate for all diagnostics. Each subsystem
//! logs under its own target (see [`targets`]) so output can be filtered
//! per subsystem:
//!
//! ```text
//! RUST_LOG=quickport::dialog=debug,quickport::canvas=warn
//! ```
//!
//! Applications that already install a subscriber need nothing from this
//! module. Others can call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::config::ToolboxConfig;

/// Target names for log filtering.
pub mod targets {
    /// Window lifecycle, placement and composition.
    pub const WINDOW: &str = "quickport::window";
    /// Dialog item rendering and event translation.
    pub const DIALOG: &str = "quickport::dialog";
    /// Canvas drawing and presentation.
    pub const CANVAS: &str = "quickport::canvas";
    /// Resource lookups.
    pub const RESOURCES: &str = "quickport::resources";
    /// Diagnostic-key dumps.
    pub const DIAGNOSTICS: &str = "quickport::diagnostics";
    /// Native windowing backend.
    pub const PLATFORM: &str = "quickport::platform";
}

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to the
/// configured filter.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(config: &ToolboxConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_noop() {
        let config = ToolboxConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [
            targets::WINDOW,
            targets::DIALOG,
            targets::CANVAS,
            targets::RESOURCES,
            targets::DIAGNOSTICS,
            targets::PLATFORM,
        ] {
            assert!(target.starts_with("quickport::"));
        }
    }
}
