use std::sync::OnceLock;

use regex::Regex;

/// Facts carried by a `# %%` delimiter line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PercentLine {
    /// Text between the square brackets, if any (`markdown` in `# %% [markdown]`).
    pub tag: Option<String>,
    /// Free text following the marker and tag.
    pub title: Option<String>,
}

impl PercentLine {
    /// True when the tag names a markdown cell (`markdown` or `md`, any case).
    pub fn is_markdown(&self) -> bool {
        self.tag.as_deref().is_some_and(|tag| {
            PercentDelimiter::MARKDOWN_TAGS
                .iter()
                .any(|known| tag.trim().eq_ignore_ascii_case(known))
        })
    }
}

/// The `# %%` delimiter of the percent dialect.
pub struct PercentDelimiter;

impl PercentDelimiter {
    pub const PREFIX: &'static str = "# %%";
    pub const MARKDOWN_TAGS: [&'static str; 2] = ["markdown", "md"];

    /// Cheap check used by format detection.
    pub fn starts(line: &str) -> bool {
        line.trim().starts_with(Self::PREFIX)
    }

    /// Parses a delimiter line into its tag and title.
    ///
    /// Returns `None` when the line is not a delimiter. Every line accepted by
    /// [`PercentDelimiter::starts`] parses.
    pub fn parse(line: &str) -> Option<PercentLine> {
        let trimmed = line.trim();
        if !trimmed.starts_with(Self::PREFIX) {
            return None;
        }
        let caps = pattern().captures(trimmed)?;
        let tag = caps.get(1).map(|m| m.as_str().to_string());
        let title = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Some(PercentLine { tag, title })
    }

    /// Renders the delimiter line for a cell.
    pub fn render(markup: bool, title: Option<&str>) -> String {
        let mut line = Self::PREFIX.to_string();
        if markup {
            line.push_str(" [markdown]");
        }
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            line.push(' ');
            line.push_str(title.trim());
        }
        line
    }
}

fn pattern() -> &'static Regex {
    static PERCENT_REGEX: OnceLock<Regex> = OnceLock::new();
    PERCENT_REGEX.get_or_init(|| {
        Regex::new(r"^# %%[ \t]*(?:\[([^\]]*)\])?[ \t]*(.*)$")
            .expect("Invalid percent delimiter regex")
    })
}
