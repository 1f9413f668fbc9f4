// GPU toggle control panel
//
// Switches an NVIDIA GPU between the host driver and VFIO passthrough by
// installing and restarting a systemd oneshot unit.

// Configuration, status reporting and privileged actions
pub mod core;

// User interface
pub mod ui;

// Utility functions
pub mod utils;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
