// Status reporting: driver binding, installed files, service state
//
// Every read here is side-effect free. Failures degrade to a displayable
// value instead of an error.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::command::{CommandRunner, ExternalCommand};
use crate::core::config::ToggleConfig;

/// Shown when the driver symlink cannot be read
pub const UNKNOWN_DRIVER: &str = "unknown";

/// Which driver family currently owns the NVIDIA card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    /// Bound to vfio-pci, ready to hand to a VM
    Vfio,
    /// Bound to one of the nvidia* drivers
    Nvidia(String),
    /// Anything else, including the unknown sentinel
    Other(String),
}

impl DriverState {
    pub fn from_driver_name(name: &str) -> Self {
        if name == "vfio-pci" {
            DriverState::Vfio
        } else if name.starts_with("nvidia") {
            DriverState::Nvidia(name.to_string())
        } else {
            DriverState::Other(name.to_string())
        }
    }

    /// Line shown in the status panel
    pub fn label(&self) -> String {
        match self {
            DriverState::Vfio => "GPU Mode: VFIO (VM Ready)".to_string(),
            DriverState::Nvidia(_) => "GPU Mode: NVIDIA (Host)".to_string(),
            DriverState::Other(name) => format!("GPU Mode: {}", name),
        }
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriverState::Vfio => write!(f, "vfio-pci"),
            DriverState::Nvidia(name) | DriverState::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One snapshot of everything the panel displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub driver: DriverState,
    pub script_installed: bool,
    pub service_installed: bool,
    pub service_active: bool,
}

impl StatusReport {
    /// Toggling needs both generated files on disk
    pub fn toggle_enabled(&self) -> bool {
        self.script_installed && self.service_installed
    }

    pub fn gpu_mode_label(&self) -> String {
        self.driver.label()
    }

    pub fn script_label(&self) -> String {
        format!("Toggle Script: {}", presence_mark(self.script_installed))
    }

    pub fn service_file_label(&self) -> String {
        format!("Systemd Service: {}", presence_mark(self.service_installed))
    }

    pub fn service_state_label(&self) -> String {
        format!(
            "Service State: {}",
            if self.service_active { "🟢 active" } else { "🟡 inactive" }
        )
    }
}

fn presence_mark(present: bool) -> &'static str {
    if present { "✅" } else { "❌" }
}

/// Name of the driver behind a sysfs `driver` symlink, or the unknown sentinel
pub fn read_driver(link: &Path) -> String {
    match fs::read_link(link) {
        Ok(target) => match target.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => UNKNOWN_DRIVER.to_string(),
        },
        Err(e) => {
            debug!("Cannot read {}: {}", link.display(), e);
            UNKNOWN_DRIVER.to_string()
        }
    }
}

/// Asks systemd whether the unit is active; only exit code 0 counts
pub fn service_active(runner: &dyn CommandRunner, service_name: &str) -> bool {
    let command = ExternalCommand::new("systemctl").args(["is-active", service_name]).quiet();
    match runner.run(&command) {
        Ok(outcome) => outcome.success(),
        Err(e) => {
            warn!("Could not query service state: {}", e);
            false
        }
    }
}

/// Collects a fresh status snapshot
pub fn collect(config: &ToggleConfig, runner: &dyn CommandRunner) -> StatusReport {
    let driver_name = read_driver(&config.driver_link_path());
    let report = StatusReport {
        driver: DriverState::from_driver_name(&driver_name),
        script_installed: config.script_path.exists(),
        service_installed: config.service_path.exists(),
        service_active: service_active(runner, &config.service_name),
    };
    debug!("Status: {:?}", report);
    report
}
