// Privileged actions: installing the artifacts and restarting the toggle unit

use std::path::Path;

use tracing::{error, info};

use crate::core::command::{CommandRunner, ExternalCommand};
use crate::core::config::ToggleConfig;
use crate::core::error::Result;
use crate::core::templates::{render_service_unit, render_toggle_script};
use crate::utils::shell_quote;

/// Heredoc terminator; must not appear as a line in either template
const HEREDOC_DELIMITER: &str = "GPU_TOGGLE_EOF";

/// Builds the shell program that writes both artifacts and reloads systemd.
///
/// The heredocs are quoted so bash performs no expansion, and each template
/// already ends in a newline, so the files receive the rendered text unchanged.
pub fn setup_program(config: &ToggleConfig) -> String {
    let mut program = String::from("set -e\n");
    append_heredoc(&mut program, &config.script_path, &render_toggle_script(config));
    program.push_str(&format!("chmod +x {}\n", shell_quote(&config.script_path.to_string_lossy())));
    append_heredoc(&mut program, &config.service_path, &render_service_unit(config));
    program.push_str("systemctl daemon-reload\n");
    program
}

fn append_heredoc(program: &mut String, target: &Path, body: &str) {
    program.push_str(&format!(
        "cat << '{}' > {}\n",
        HEREDOC_DELIMITER,
        shell_quote(&target.to_string_lossy())
    ));
    program.push_str(body);
    if !body.ends_with('\n') {
        program.push('\n');
    }
    program.push_str(HEREDOC_DELIMITER);
    program.push('\n');
}

/// Command run for Setup / Repair
pub fn setup_command(config: &ToggleConfig) -> ExternalCommand {
    ExternalCommand::new("bash")
        .arg("-c")
        .arg(setup_program(config))
        .elevated(&config.privilege_helper)
}

/// Command run for Toggle GPU
pub fn toggle_command(config: &ToggleConfig) -> ExternalCommand {
    ExternalCommand::new("systemctl")
        .args(["restart", config.service_name.as_str()])
        .elevated(&config.privilege_helper)
}

/// Writes the script and unit through the privilege helper and reloads systemd
pub fn run_setup(config: &ToggleConfig, runner: &dyn CommandRunner) -> Result<()> {
    info!(
        "Installing {} and {}",
        config.script_path.display(),
        config.service_path.display()
    );
    let command = setup_command(config);
    let outcome = runner.run(&command)?;
    if let Err(e) = outcome.check(&command) {
        error!("Setup failed: {}", e);
        return Err(e.into());
    }
    info!("Setup completed");
    Ok(())
}

/// Restarts the toggle unit, which runs the rebind script
pub fn run_toggle(config: &ToggleConfig, runner: &dyn CommandRunner) -> Result<()> {
    info!("Restarting {}", config.service_name);
    let command = toggle_command(config);
    let outcome = runner.run(&command)?;
    if let Err(e) = outcome.check(&command) {
        error!("Toggle failed: {}", e);
        return Err(e.into());
    }
    info!("Toggle completed");
    Ok(())
}
