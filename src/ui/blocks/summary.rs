use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

#[derive(Debug, Clone)]
pub struct ResultSummary {
    title: String,
    success: bool,
    facts: Vec<(String, String)>,
    warnings: Vec<String>,
    next_step: Option<String>,
}

impl ResultSummary {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            success: true,
            facts: Vec::new(),
            warnings: Vec::new(),
            next_step: None,
        }
    }

    pub fn partial(title: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(title)
        }
    }

    pub fn add_fact(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.facts.push((label.into(), value.into()));
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn with_next_step(&mut self, hint: impl Into<String>) {
        self.next_step = Some(hint.into());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (icon, title) = if self.success {
            (Icon::Success, ColoredText::success(self.title.as_str()))
        } else {
            (Icon::Warning, ColoredText::warning(self.title.as_str()))
        };

        let mut out = format!(
            "{} {}\n",
            icon.colored(supports_color, supports_unicode),
            title.bold().render(supports_color)
        );

        let width = self.facts.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.facts {
            out.push_str(&format!("  {:<width$}  {}\n", label, value, width = width));
        }

        for warning in &self.warnings {
            out.push_str(&format!(
                "  {} {}\n",
                Icon::Warning.colored(supports_color, supports_unicode),
                warning
            ));
        }

        if let Some(next_step) = &self.next_step {
            out.push_str(&format!(
                "  {} {} {}\n",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim("Next:").render(supports_color),
                next_step
            ));
        }

        out
    }
}
