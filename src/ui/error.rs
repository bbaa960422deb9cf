use droidprep::DeployError;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Process exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DeployError>()
        .map(DeployError::exit_code)
        .unwrap_or(1)
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let icon = Icon::Error.colored(supports_color, supports_unicode);
    let mut out = format!(
        "{} {}\n",
        icon,
        ColoredText::error(err.to_string()).bold().render(supports_color)
    );

    for cause in err.chain().skip(1) {
        out.push_str(&format!("  caused by: {}\n", cause));
    }

    if let Some(hint) = err.downcast_ref::<DeployError>().and_then(DeployError::hint) {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            ColoredText::dim(hint).render(supports_color)
        ));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let mut output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
            "exit_code": exit_code(err),
        });
        if let Some(deploy) = err.downcast_ref::<DeployError>() {
            output["step"] = serde_json::json!(deploy.step().as_str());
        }
        let _ = crate::ui::json::emit(output);
        return;
    }

    let caps = crate::ui::terminal::detect_capabilities();
    eprint!(
        "{}",
        format_error(err, caps.supports_color && !caps.is_ci, caps.supports_unicode)
    );
}
