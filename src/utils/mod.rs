// Utility functions for the GPU toggle control panel

/// Logging setup
pub mod logging {
    use std::env;
    use std::ffi::OsString;
    use std::fs::{self, File, OpenOptions};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use tracing::{info, warn};
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    const LOG_FILE_NAME: &str = "gpu-toggle.log";

    /// Where log output goes
    pub enum LogTarget {
        /// Plain stderr, used by the CLI modes
        Stderr,
        /// Append to a file so the TUI screen stays clean
        File(PathBuf),
    }

    /// Per-user log file for the TUI, under the XDG state directory
    pub fn default_log_file() -> PathBuf {
        log_file_from(env::var_os("XDG_STATE_HOME"), env::var_os("HOME"))
    }

    /// `$XDG_STATE_HOME/gpu-toggle/`, then `~/.local/state/gpu-toggle/`.
    /// Relative or empty values are ignored, as XDG requires.
    pub fn log_file_from(state_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
        let absolute = |value: Option<OsString>| value.map(PathBuf::from).filter(|p| p.is_absolute());

        let state_dir = absolute(state_home)
            .or_else(|| absolute(home).map(|h| h.join(".local").join("state")));
        match state_dir {
            Some(dir) => dir.join("gpu-toggle").join(LOG_FILE_NAME),
            None => env::temp_dir().join(LOG_FILE_NAME),
        }
    }

    /// Resolved writer for a target
    pub struct Sink {
        pub writer: BoxMakeWriter,
        pub ansi: bool,
        /// Why the requested target was replaced by a discarding writer
        pub fallback_reason: Option<String>,
    }

    impl Sink {
        /// Never fails: a log file that cannot be opened turns into a sink
        /// that drops everything, so logging can't keep the panel from starting.
        pub fn open(target: &LogTarget) -> Self {
            match target {
                LogTarget::Stderr => Self {
                    writer: BoxMakeWriter::new(io::stderr),
                    ansi: true,
                    fallback_reason: None,
                },
                LogTarget::File(path) => match open_log_file(path) {
                    Ok(file) => Self {
                        writer: BoxMakeWriter::new(Mutex::new(file)),
                        ansi: false,
                        fallback_reason: None,
                    },
                    Err(e) => Self {
                        writer: BoxMakeWriter::new(io::sink),
                        ansi: false,
                        fallback_reason: Some(format!(
                            "cannot open log file {}: {}; logging disabled",
                            path.display(),
                            e
                        )),
                    },
                },
            }
        }
    }

    fn filter() -> (EnvFilter, Option<&'static str>) {
        let level = if cfg!(debug_assertions) { "trace" } else { "info" };
        match EnvFilter::try_from_default_env() {
            Ok(f) => (f, None),
            Err(_) => (EnvFilter::new(level), Some(level)),
        }
    }

    /// Installs the global subscriber. Honors `RUST_LOG`.
    pub fn init_logging(target: LogTarget) {
        let (filter, defaulted) = filter();
        let sink = Sink::open(&target);

        if let Some(reason) = &sink.fallback_reason {
            eprintln!("Warning: {}", reason);
        }

        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(sink.ansi).with_writer(sink.writer))
            .with(filter)
            .init();

        if let Some(reason) = sink.fallback_reason {
            warn!("{}", reason);
        }
        if let Some(level) = defaulted {
            info!("\"RUST_LOG\" variable not set, defaulting to {level}");
        }
    }

    fn open_log_file(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

}

/// Quotes a string for safe use as a single POSIX shell word
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_paths() {
        assert_eq!(shell_quote("/usr/local/bin/x.sh"), "'/usr/local/bin/x.sh'");
    }

    #[test]
    fn escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn keeps_spaces_inside_one_word() {
        assert_eq!(shell_quote("/opt/my gpu/t.sh"), "'/opt/my gpu/t.sh'");
    }
}
