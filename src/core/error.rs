// Error types for the GPU toggle control panel

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} must be an absolute path, got {value}")]
    RelativePath { field: &'static str, value: String },
    #[error("script_path cannot be used in ExecStart= (whitespace, quotes, '\\', '$' or '%'): {0}")]
    UnitUnsafePath(String),
    #[error("{field} is not a PCI address of the form 0000:01:00.0: {value}")]
    InvalidPciAddress { field: &'static str, value: String },
    #[error("service name must end in .service: {0}")]
    InvalidServiceName(String),
    #[error("privilege helper command is empty")]
    EmptyPrivilegeHelper,
    #[error("refresh interval must be at least one second")]
    InvalidRefreshInterval,
}

/// Failure of an external command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}", describe_code(.code))]
    Failed { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

// The main crate error type
#[derive(Debug, Error)]
pub enum GpuToggleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = GpuToggleError> = std::result::Result<T, E>;
