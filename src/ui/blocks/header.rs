use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Title line plus aligned `label: value` rows, printed before a command runs
#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    rows: Vec<(String, ColoredText)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.rows.push((label.into(), ColoredText::plain(value)));
        self
    }

    /// Row whose value is shown as a warning (e.g. a forced architecture)
    pub fn add_warning(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.rows.push((label.into(), ColoredText::warning(value)));
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::info(self.title.as_str())
            .bold()
            .render(supports_color);
        let mut out = format!(
            "{} {}\n",
            self.icon.colored(supports_color, supports_unicode),
            title
        );

        let width = self.rows.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
        for (label, value) in &self.rows {
            let label = format!("{:<width$}", format!("{}:", label), width = width);
            out.push_str(&format!(
                "  {} {}\n",
                ColoredText::dim(label).render(supports_color),
                value.render(supports_color)
            ));
        }
        out
    }
}
