// External command execution
//
// Everything that spawns a process goes through `CommandRunner`, so the
// status and action code never touches `std::process` directly.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::core::error::CommandError;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Discard stdout instead of inheriting it
    pub quiet: bool,
}

impl ExternalCommand {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self { program: program.into(), args: Vec::new(), quiet: false }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Prefixes this command with a privilege helper such as `pkexec`
    pub fn elevated(self, helper: &[String]) -> Self {
        match helper.split_first() {
            Some((program, helper_args)) => {
                let mut args = helper_args.to_vec();
                args.push(self.program);
                args.extend(self.args);
                Self { program: program.clone(), args, quiet: self.quiet }
            }
            None => self,
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            // Keep multi-line shell programs out of log lines
            match arg.lines().next() {
                Some(first) if arg.contains('\n') => write!(f, " {}...", first)?,
                _ => write!(f, " {}", arg)?,
            }
        }
        Ok(())
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero exit into an error
    pub fn check(self, command: &ExternalCommand) -> Result<(), CommandError> {
        if self.success() {
            Ok(())
        } else {
            Err(CommandError::Failed { program: command.program.clone(), code: self.code })
        }
    }
}

/// Runs external commands and reports how they exited
pub trait CommandRunner {
    /// Runs the command to completion. Spawn failures are errors; a non-zero
    /// exit is a normal outcome.
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutcome, CommandError>;
}

/// Runs commands on the host with `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> Result<CommandOutcome, CommandError> {
        debug!("Executing: {}", command);
        let mut process = Command::new(&command.program);
        process.args(&command.args);
        if command.quiet {
            process.stdout(Stdio::null());
        }

        let status = process.status().map_err(|source| CommandError::Spawn {
            program: command.program.clone(),
            source,
        })?;
        trace!("{} finished with {:?}", command.program, status.code());
        Ok(CommandOutcome { code: status.code() })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_prepends_helper() {
        let helper = vec!["sudo".to_string(), "-A".to_string()];
        let cmd = ExternalCommand::new("systemctl").args(["restart", "x.service"]).elevated(&helper);
        assert_eq!(cmd.program, "sudo");
        assert_eq!(cmd.args, vec!["-A", "systemctl", "restart", "x.service"]);
    }

    #[test]
    fn display_truncates_shell_programs() {
        let cmd = ExternalCommand::new("bash").arg("-c").arg("set -e\necho hi\n");
        assert_eq!(cmd.to_string(), "bash -c set -e...");
    }

    #[test]
    fn non_zero_exit_is_failure() {
        let cmd = ExternalCommand::new("false");
        let outcome = CommandOutcome { code: Some(1) };
        assert!(!outcome.success());
        assert!(matches!(outcome.check(&cmd), Err(CommandError::Failed { code: Some(1), .. })));
        assert!(CommandOutcome { code: None }.check(&cmd).is_err());
        assert!(CommandOutcome { code: Some(0) }.check(&cmd).is_ok());
    }

    #[test]
    fn system_runner_reports_exit_codes() {
        let runner = SystemRunner;
        let ok = runner.run(&ExternalCommand::new("true")).unwrap();
        let fail = runner.run(&ExternalCommand::new("false")).unwrap();
        assert!(ok.success());
        assert_eq!(fail.code, Some(1));
    }

    #[test]
    fn system_runner_reports_missing_programs() {
        let result = SystemRunner.run(&ExternalCommand::new("/nonexistent/gpu-toggle-helper"));
        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }
}
