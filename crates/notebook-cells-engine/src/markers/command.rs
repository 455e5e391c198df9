use std::sync::OnceLock;

use regex::Regex;

/// The `# COMMAND ----------` delimiter separating Databricks cells.
///
/// Any number of dashes is accepted when reading; the canonical form with ten
/// dashes is always written.
pub struct CommandDelimiter;

impl CommandDelimiter {
    pub const CANONICAL: &'static str = "# COMMAND ----------";

    pub fn matches(line: &str) -> bool {
        pattern().is_match(line.trim())
    }
}

fn pattern() -> &'static Regex {
    static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMAND_REGEX
        .get_or_init(|| Regex::new(r"^# COMMAND\s+-+$").expect("Invalid command delimiter regex"))
}
