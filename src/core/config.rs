// Configuration for the GPU toggle control panel
//
// All values are fixed at startup. The defaults describe the one machine
// this tool was written for; a JSON file can override any of them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::core::error::ConfigError;

/// Location checked for a config file when none is given explicitly
pub const DEFAULT_CONFIG_PATH: &str = "/etc/gpu-toggle/config.json";

/// PCI addresses the toggle script operates on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PciTopology {
    /// NVIDIA VGA function that gets passed through
    pub nvidia_vga: String,
    /// HDMI audio function on the same card
    pub nvidia_audio: String,
    /// GPU that drives the host display once the NVIDIA card is handed to VFIO
    pub host_gpu: String,
}

impl Default for PciTopology {
    fn default() -> Self {
        Self {
            nvidia_vga: "0000:01:00.0".to_string(),
            nvidia_audio: "0000:01:00.1".to_string(),
            host_gpu: "0000:05:00.0".to_string(),
        }
    }
}

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Where the toggle script is installed
    pub script_path: PathBuf,
    /// Where the systemd unit is installed
    pub service_path: PathBuf,
    /// Unit name passed to systemctl
    pub service_name: String,
    /// sysfs directory holding one entry per PCI device
    pub sysfs_pci_devices: PathBuf,
    pub pci: PciTopology,
    /// Command prefix used to gain root, e.g. ["pkexec"] or ["sudo", "-A"]
    pub privilege_helper: Vec<String>,
    pub refresh_interval_secs: u64,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("/usr/local/bin/toggle-nvidia-vfio.sh"),
            service_path: PathBuf::from("/etc/systemd/system/toggle-nvidia-vfio.service"),
            service_name: "toggle-nvidia-vfio.service".to_string(),
            sysfs_pci_devices: PathBuf::from("/sys/bus/pci/devices"),
            pci: PciTopology::default(),
            privilege_helper: vec!["pkexec".to_string()],
            refresh_interval_secs: 3,
        }
    }
}

fn pci_address_regex() -> &'static Regex {
    static PCI_ADDRESS: OnceLock<Regex> = OnceLock::new();
    PCI_ADDRESS.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{4}:[0-9a-fA-F]{2}:[0-9a-fA-F]{2}\.[0-7]$")
            .expect("PCI address pattern is valid")
    })
}

impl ToggleConfig {
    /// Loads and validates a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the file at `path` if it exists, otherwise returns the defaults.
    /// A broken file is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Checks the invariants every other module relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_absolute("script_path", &self.script_path)?;
        check_absolute("service_path", &self.service_path)?;
        check_absolute("sysfs_pci_devices", &self.sysfs_pci_devices)?;
        check_exec_start_safe(&self.script_path)?;

        check_pci_address("pci.nvidia_vga", &self.pci.nvidia_vga)?;
        check_pci_address("pci.nvidia_audio", &self.pci.nvidia_audio)?;
        check_pci_address("pci.host_gpu", &self.pci.host_gpu)?;

        if !self.service_name.ends_with(".service") || self.service_name.contains('/') {
            return Err(ConfigError::InvalidServiceName(self.service_name.clone()));
        }
        if self.privilege_helper.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPrivilegeHelper);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        Ok(())
    }

    /// Symlink naming the driver currently bound to the NVIDIA VGA function
    pub fn driver_link_path(&self) -> PathBuf {
        self.sysfs_pci_devices.join(&self.pci.nvidia_vga).join("driver")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

fn check_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::RelativePath { field, value: path.display().to_string() })
    }
}

/// The script path lands verbatim in the unit's ExecStart=, where systemd
/// splits on whitespace and expands quotes, escapes, `$` and `%` specifiers
fn check_exec_start_safe(path: &Path) -> Result<(), ConfigError> {
    let value = path.to_string_lossy();
    let unsafe_char = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '%');
    if value.chars().any(unsafe_char) {
        Err(ConfigError::UnitUnsafePath(value.into_owned()))
    } else {
        Ok(())
    }
}

fn check_pci_address(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if pci_address_regex().is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidPciAddress { field, value: value.to_string() })
    }
}
