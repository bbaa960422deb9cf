use droidprep::application::{DeployReport, WarningKind};
use droidprep::Architecture;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::ResultSummary;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_cert_header(
    source: &str,
    store_file: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Cert, "Install CA certificate");
    header.add("Certificate", source);
    header.add("Store file", store_file);
    header.render(supports_color, supports_unicode)
}

pub fn render_frida_header(
    source: &str,
    device_count: usize,
    forced_arch: Option<Architecture>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Frida, "Deploy frida-server");
    header.add("Binary", source);
    if let Some(arch) = forced_arch {
        header.add_warning("Arch", format!("{} (forced, device ABI not checked)", arch.as_str()));
    }
    if device_count > 1 {
        header.add("Devices", device_count.to_string());
    }
    header.render(supports_color, supports_unicode)
}

pub fn render_cert_summary(
    report: &DeployReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if report.has_warnings() {
        ResultSummary::partial("Certificate installed with warnings")
    } else {
        ResultSummary::success("Certificate installed")
    };
    summary.add_fact("Device", report.serial.as_str());
    summary.add_fact("Installed", report.remote_path.as_str());
    for warning in &report.warnings {
        summary.add_warning(warning.message.as_str());
    }
    if report.rebooted {
        summary.add_fact("Reboot", "requested");
    } else {
        summary.with_next_step(format!(
            "Reboot the device (`adb -s {} reboot`) so apps pick up the new CA",
            report.serial
        ));
    }
    summary.render(supports_color, supports_unicode)
}

pub fn render_frida_summary(
    report: &DeployReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if report.has_warnings() {
        ResultSummary::partial("frida-server deployed with warnings")
    } else {
        ResultSummary::success("frida-server deployed")
    };
    summary.add_fact("Device", report.serial.as_str());
    if let Some(arch) = report.architecture {
        summary.add_fact("Architecture", arch.as_str());
    }
    summary.add_fact("Path", report.remote_path.as_str());
    if let Some(pids) = &report.running_pids {
        summary.add_fact("PID", pids.as_str());
    }
    if report.restarted {
        summary.add_fact("Restarted", "previous instance stopped");
    }
    for warning in &report.warnings {
        summary.add_warning(warning.message.as_str());
    }
    if report.warnings.iter().any(|w| w.kind == WarningKind::Unverified) {
        summary.with_next_step(format!(
            "adb -s {} shell pidof frida-server",
            report.serial
        ));
    }
    summary.render(supports_color, supports_unicode)
}

/// Outcome of the host-side `frida-ps -D <serial>` check
pub fn render_frida_ps(serial: &str, reachable: bool, supports_color: bool, supports_unicode: bool) -> String {
    let (icon, text) = if reachable {
        (Icon::Success, ColoredText::plain(format!("frida-ps -D {} reached the server", serial)))
    } else {
        (Icon::Warning, ColoredText::warning(format!("frida-ps -D {} could not reach the server", serial)))
    };
    format!(
        "  {} {}\n",
        icon.colored(supports_color, supports_unicode),
        text.render(supports_color)
    )
}

pub fn frida_ps_json(serial: &str, reachable: bool) -> serde_json::Value {
    serde_json::json!({
        "event": "frida_ps",
        "serial": serial,
        "reachable": reachable,
    })
}

/// NDJSON line for a finished run
pub fn report_json(command: &str, report: &DeployReport) -> serde_json::Value {
    serde_json::json!({
        "event": "report",
        "command": command,
        "serial": report.serial,
        "remote_path": report.remote_path,
        "architecture": report.architecture.map(|a| a.as_str()),
        "store_filename": report.store_filename.as_ref().map(|f| f.file_name()),
        "stages": report.stages.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        "warnings": report.warnings.iter().map(|w| serde_json::json!({
            "kind": w.kind.as_str(),
            "step": w.step.as_str(),
            "message": w.message,
        })).collect::<Vec<_>>(),
        "restarted": report.restarted,
        "rebooted": report.rebooted,
        "verified": report.is_verified(),
    })
}
