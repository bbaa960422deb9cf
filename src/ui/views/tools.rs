use droidprep::infrastructure::host::{HostOs, PackageManager, ToolStatus};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_tools(
    os: HostOs,
    tools: &[ToolStatus],
    plan: Option<(PackageManager, &[Vec<String>])>,
    manual_hint: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Tools, "Host tools");
    header.add("OS", os.as_str());
    let mut out = header.render(supports_color, supports_unicode);

    for status in tools {
        let line = match &status.path {
            Some(path) => format!(
                "  {} {:<8} {}\n",
                Icon::Success.colored(supports_color, supports_unicode),
                status.tool.as_str(),
                ColoredText::dim(path.display().to_string()).render(supports_color)
            ),
            None => format!(
                "  {} {:<8} {}\n",
                Icon::Error.colored(supports_color, supports_unicode),
                status.tool.as_str(),
                ColoredText::error(format!("'{}' not found", status.program)).render(supports_color)
            ),
        };
        out.push_str(&line);
    }

    if tools.iter().all(ToolStatus::is_installed) {
        return out;
    }

    match plan {
        Some((manager, commands)) => {
            out.push_str(&format!("\n  Install with {}:\n", manager));
            for command in commands {
                out.push_str(&format!("    {}\n", command.join(" ")));
            }
        }
        None => {
            out.push_str(&format!(
                "\n  {} {}\n",
                Icon::Arrow.colored(supports_color, supports_unicode),
                manual_hint
            ));
        }
    }
    out
}

pub fn tools_json(
    os: HostOs,
    tools: &[ToolStatus],
    plan: Option<(PackageManager, &[Vec<String>])>,
) -> serde_json::Value {
    serde_json::json!({
        "event": "tools",
        "os": os.as_str(),
        "tools": tools.iter().map(|t| serde_json::json!({
            "tool": t.tool.as_str(),
            "program": t.program,
            "path": t.path.as_ref().map(|p| p.display().to_string()),
        })).collect::<Vec<_>>(),
        "package_manager": plan.map(|(m, _)| m.program()),
        "install_commands": plan.map(|(_, c)| c.to_vec()).unwrap_or_default(),
    })
}
