// User interface for the GPU toggle control panel
//
// The interactive panel is a ratatui TUI; `print_status` is the plain
// one-shot report used by `--cli`.

pub mod colors;
pub mod tui;

use std::io::{self, Write};

use crate::core::controller::Controller;
use crate::core::status::{DriverState, StatusReport};
use colors::{PastelColor, StyledText};

/// Runs the ratatui-based UI
pub fn run_tui(controller: Controller) -> io::Result<()> {
    tui::run_app(controller)
}

/// Writes the status report as colored text
pub fn print_status<W: Write>(out: &mut W, report: &StatusReport) -> io::Result<()> {
    let mode_color = match report.driver {
        DriverState::Vfio => PastelColor::Mint,
        DriverState::Nvidia(_) => PastelColor::SkyBlue,
        DriverState::Other(_) => PastelColor::Peach,
    };

    writeln!(out, "{}", StyledText::bold("System Status", PastelColor::Lavender))?;
    writeln!(out, "  {}", StyledText::new(&report.gpu_mode_label(), mode_color))?;
    writeln!(out, "  {}", report.script_label())?;
    writeln!(out, "  {}", report.service_file_label())?;
    writeln!(out, "  {}", report.service_state_label())?;

    let toggle = if report.toggle_enabled() {
        StyledText::new("Toggle: available", PastelColor::Mint)
    } else {
        StyledText::new("Toggle: unavailable (run setup first)", PastelColor::Gray)
    };
    writeln!(out, "  {}", toggle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_every_status_line() {
        let report = StatusReport {
            driver: DriverState::Vfio,
            script_installed: true,
            service_installed: false,
            service_active: false,
        };
        let mut out = Vec::new();
        print_status(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("GPU Mode: VFIO (VM Ready)"));
        assert!(text.contains("Toggle Script: ✅"));
        assert!(text.contains("Systemd Service: ❌"));
        assert!(text.contains("Service State: 🟡 inactive"));
        assert!(text.contains("Toggle: unavailable"));
    }
}
