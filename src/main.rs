use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gpu_toggle::core::config::{ToggleConfig, DEFAULT_CONFIG_PATH};
use gpu_toggle::core::controller::Controller;
use gpu_toggle::core::error::Result;
use gpu_toggle::core::templates::{render_service_unit, render_toggle_script};
use gpu_toggle::ui;
use gpu_toggle::utils::logging::{default_log_file, init_logging, LogTarget};
use tracing::error;

const USAGE: &str = "Usage: gpu-toggle [--config <path>] [--cli | --print-script | --print-unit]

  (no mode)        interactive control panel
  --cli            print the current status and exit
  --print-script   print the generated toggle script
  --print-unit     print the generated systemd unit
  --config <path>  load settings from a JSON file
  --help           show this message";

enum Mode {
    Tui,
    Cli,
    PrintScript,
    PrintUnit,
    Help,
}

struct Options {
    mode: Mode,
    config_path: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut options = Options { mode: Mode::Tui, config_path: None };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--cli" => options.mode = Mode::Cli,
            "--print-script" => options.mode = Mode::PrintScript,
            "--print-unit" => options.mode = Mode::PrintUnit,
            "--help" | "-h" => options.mode = Mode::Help,
            "--config" => match iter.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path)),
                None => return Err("--config needs a path".to_string()),
            },
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn load_config(explicit: Option<&Path>) -> Result<ToggleConfig> {
    match explicit {
        Some(path) => Ok(ToggleConfig::load(path)?),
        None => Ok(ToggleConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))),
    }
}

/// Writes the rendered script or unit for the print modes; other modes write nothing
fn write_artifact<W: Write>(out: &mut W, mode: &Mode, config: &ToggleConfig) -> io::Result<()> {
    match mode {
        Mode::PrintScript => out.write_all(render_toggle_script(config).as_bytes()),
        Mode::PrintUnit => out.write_all(render_service_unit(config).as_bytes()),
        _ => Ok(()),
    }
}

fn run(options: Options) -> Result<()> {
    if let Mode::Help = options.mode {
        println!("{}", USAGE);
        return Ok(());
    }

    let target = match options.mode {
        Mode::Tui => LogTarget::File(default_log_file()),
        _ => LogTarget::Stderr,
    };
    init_logging(target);

    let config = load_config(options.config_path.as_deref())?;
    let mut stdout = io::stdout();

    match options.mode {
        Mode::Help => {}
        Mode::PrintScript | Mode::PrintUnit => write_artifact(&mut stdout, &options.mode, &config)?,
        Mode::Cli => {
            writeln!(stdout, "GPU Toggle Control Panel v{}\n", gpu_toggle::VERSION)?;
            let controller = Controller::for_host(config);
            ui::print_status(&mut stdout, &controller.status())?;
        }
        Mode::Tui => ui::run_tui(Controller::for_host(config))?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpu_toggle::core::error::{ConfigError, GpuToggleError};
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_tui() {
        let options = parse_args(&[]).unwrap();
        assert!(matches!(options.mode, Mode::Tui));
        assert!(options.config_path.is_none());
    }

    #[test]
    fn parses_config_and_mode() {
        let options = parse_args(&args(&["--config", "/tmp/c.json", "--cli"])).unwrap();
        assert!(matches!(options.mode, Mode::Cli));
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn print_modes_write_the_rendered_artifacts() {
        let config = ToggleConfig::default();

        let mut script = Vec::new();
        write_artifact(&mut script, &Mode::PrintScript, &config).unwrap();
        assert_eq!(String::from_utf8(script).unwrap(), render_toggle_script(&config));

        let mut unit = Vec::new();
        write_artifact(&mut unit, &Mode::PrintUnit, &config).unwrap();
        assert_eq!(String::from_utf8(unit).unwrap(), render_service_unit(&config));

        let mut nothing = Vec::new();
        write_artifact(&mut nothing, &Mode::Cli, &config).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn printed_script_follows_the_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pci": {{ "host_gpu": "0000:0b:00.0" }} }}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();

        let mut script = Vec::new();
        write_artifact(&mut script, &Mode::PrintScript, &config).unwrap();
        assert!(String::from_utf8(script).unwrap().contains("0000:0b:00.0"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(GpuToggleError::Config(ConfigError::Read { .. }))
        ));
    }

    #[test]
    fn invalid_explicit_config_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "script_path": "toggle.sh" }}"#).unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(GpuToggleError::Config(ConfigError::RelativePath { field: "script_path", .. }))
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(GpuToggleError::Config(ConfigError::Parse { .. }))
        ));
    }
}
