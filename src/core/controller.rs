// The single controller object the UI talks to

use tracing::info;

use crate::core::actions::{run_setup, run_toggle};
use crate::core::command::{CommandRunner, SystemRunner};
use crate::core::config::ToggleConfig;
use crate::core::error::Result;
use crate::core::status::{self, StatusReport};

/// Owns the configuration and the command runner
pub struct Controller {
    config: ToggleConfig,
    runner: Box<dyn CommandRunner>,
}

impl Controller {
    pub fn new(config: ToggleConfig, runner: Box<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Controller that runs real commands on this host
    pub fn for_host(config: ToggleConfig) -> Self {
        info!("Using privilege helper {:?}", config.privilege_helper);
        Self::new(config, Box::new(SystemRunner))
    }

    pub fn config(&self) -> &ToggleConfig {
        &self.config
    }

    pub fn status(&self) -> StatusReport {
        status::collect(&self.config, self.runner.as_ref())
    }

    pub fn setup(&self) -> Result<()> {
        run_setup(&self.config, self.runner.as_ref())
    }

    pub fn toggle(&self) -> Result<()> {
        run_toggle(&self.config, self.runner.as_ref())
    }
}
