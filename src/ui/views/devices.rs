use droidprep::domain::entities::{AttachedDevice, ConnectivityState};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_devices(
    devices: &[AttachedDevice],
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = CommandHeader::new(Icon::Device, "Attached devices").render(supports_color, supports_unicode);

    if devices.is_empty() {
        out.push_str("  No devices attached. Start an emulator or connect a device with USB debugging.\n");
        return out;
    }

    let width = devices.iter().map(|d| d.serial.len()).max().unwrap_or(0);
    for device in devices {
        let (icon, state) = match device.state {
            ConnectivityState::Connected | ConnectivityState::AuthorizedRoot => {
                (Icon::Success, ColoredText::success(device.state.as_str()))
            }
            ConnectivityState::Unauthorized => {
                (Icon::Warning, ColoredText::warning(device.state.as_str()))
            }
            ConnectivityState::Disconnected => (Icon::Error, ColoredText::dim(device.state.as_str())),
        };
        out.push_str(&format!(
            "  {} {:<width$}  {}\n",
            icon.colored(supports_color, supports_unicode),
            device.serial,
            state.render(supports_color),
            width = width
        ));
    }
    out
}

pub fn devices_json(devices: &[AttachedDevice]) -> serde_json::Value {
    serde_json::json!({
        "event": "devices",
        "devices": devices.iter().map(|d| serde_json::json!({
            "serial": d.serial,
            "state": d.state.as_str(),
            "usable": d.is_usable(),
        })).collect::<Vec<_>>(),
    })
}

pub fn render_store_filename(
    source: &str,
    file_name: &str,
    supports_color: bool,
) -> String {
    format!(
        "{}  {}\n",
        ColoredText::info(file_name).bold().render(supports_color),
        ColoredText::dim(source).render(supports_color)
    )
}
