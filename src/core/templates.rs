// Generated artifacts: the rebind script and the oneshot unit that runs it
//
// Both texts live under templates/ and are embedded at compile time.
// Placeholders are `@NAME@` tokens substituted from the configuration.

use crate::core::config::ToggleConfig;

const TOGGLE_SCRIPT_TEMPLATE: &str = include_str!("../../templates/toggle-nvidia-vfio.sh.in");
const SERVICE_UNIT_TEMPLATE: &str = include_str!("../../templates/toggle-nvidia-vfio.service.in");

/// Renders the shell script that flips the NVIDIA card between drivers
pub fn render_toggle_script(config: &ToggleConfig) -> String {
    TOGGLE_SCRIPT_TEMPLATE
        .replace("@NVIDIA_VGA@", &config.pci.nvidia_vga)
        .replace("@NVIDIA_AUDIO@", &config.pci.nvidia_audio)
        .replace("@HOST_GPU@", &config.pci.host_gpu)
}

/// Renders the systemd unit whose start runs the toggle script
pub fn render_service_unit(config: &ToggleConfig) -> String {
    SERVICE_UNIT_TEMPLATE.replace("@SCRIPT_PATH@", &config.script_path.to_string_lossy())
}
