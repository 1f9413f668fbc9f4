// Generated artifacts must match the canonical texts exactly

use gpu_toggle::core::config::ToggleConfig;
use gpu_toggle::core::templates::{render_service_unit, render_toggle_script};

const CANONICAL_SCRIPT: &str = r##"
#!/bin/bash
set -e

NVIDIA_VGA="0000:01:00.0"
NVIDIA_AUDIO="0000:01:00.1"
AMD_VGA="0000:05:00.0"

get_driver() {
    basename "$(readlink /sys/bus/pci/devices/$1/driver)" 2>/dev/null || echo "none"
}

CURRENT_DRIVER=$(get_driver "$NVIDIA_VGA")
echo "Current NVIDIA driver: $CURRENT_DRIVER"

if [[ "$CURRENT_DRIVER" == nvidia* ]]; then
    echo "Switching NVIDIA → VFIO"
    systemctl stop display-manager || true

    modprobe -r nvidia_drm nvidia_modeset nvidia_uvm nvidia || true
    modprobe vfio-pci

    for DEV in $NVIDIA_VGA $NVIDIA_AUDIO; do
        [ -e /sys/bus/pci/devices/$DEV/driver ] && \
            echo "$DEV" > /sys/bus/pci/devices/$DEV/driver/unbind
        echo "$DEV" > /sys/bus/pci/drivers/vfio-pci/bind
    done

    modprobe amdgpu
    [ ! -e /sys/bus/pci/devices/$AMD_VGA/driver ] && \
        echo "$AMD_VGA" > /sys/bus/pci/drivers/amdgpu/bind

    systemctl start display-manager

elif [[ "$CURRENT_DRIVER" == "vfio-pci" ]]; then
    echo "Switching VFIO → NVIDIA"
    systemctl stop display-manager || true

    for DEV in $NVIDIA_VGA $NVIDIA_AUDIO; do
        echo "$DEV" > /sys/bus/pci/devices/$DEV/driver/unbind
    done

    modprobe nvidia nvidia_modeset nvidia_uvm nvidia_drm

    for DEV in $NVIDIA_VGA $NVIDIA_AUDIO; do
        echo "$DEV" > /sys/bus/pci/drivers/nvidia/bind || true
    done

    systemctl start display-manager
else
    echo "Unknown state: $CURRENT_DRIVER"
    exit 1
fi

echo "Final NVIDIA driver: $(get_driver "$NVIDIA_VGA")"
"##;

const CANONICAL_UNIT: &str = r##"[Unit]
Description=Toggle NVIDIA GPU between VFIO and Host
After=multi-user.target
Conflicts=display-manager.service

[Service]
Type=oneshot
ExecStart=/usr/local/bin/toggle-nvidia-vfio.sh
StandardOutput=journal
StandardError=journal
RemainAfterExit=yes

[Install]
WantedBy=multi-user.target
"##;

#[test]
fn default_script_matches_canonical_text() {
    assert_eq!(render_toggle_script(&ToggleConfig::default()), CANONICAL_SCRIPT.trim_start_matches('\n'));
}

#[test]
fn default_unit_matches_canonical_text() {
    assert_eq!(render_service_unit(&ToggleConfig::default()), CANONICAL_UNIT);
}

#[test]
fn unit_is_a_remaining_oneshot() {
    let unit = render_service_unit(&ToggleConfig::default());
    assert!(unit.contains("\nType=oneshot\n"));
    assert!(unit.contains("\nRemainAfterExit=yes\n"));
    assert!(unit.contains("\nConflicts=display-manager.service\n"));
}
