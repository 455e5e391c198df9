use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::types::Language;

/// The `# MAGIC` prefix that decorates non-Python lines in Databricks sources.
pub struct MagicLine;

impl MagicLine {
    pub const PREFIX: &'static str = "# MAGIC ";
    /// A decorated blank line carries no trailing space.
    pub const BARE: &'static str = "# MAGIC";

    pub fn is_decorated(line: &str) -> bool {
        line.starts_with(Self::PREFIX) || line.trim_end() == Self::BARE
    }

    /// Removes the prefix; the bare form yields an empty line.
    pub fn strip(line: &str) -> &str {
        if let Some(rest) = line.strip_prefix(Self::PREFIX) {
            rest
        } else if line.trim_end() == Self::BARE {
            ""
        } else {
            line
        }
    }

    pub fn decorate(line: &str) -> String {
        if line.is_empty() {
            Self::BARE.to_string()
        } else {
            format!("{}{line}", Self::PREFIX)
        }
    }
}

/// Single-percent line magics that select a cell language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMagic {
    Markdown,
    Sql,
    Shell,
    Pip,
}

/// A recognized line magic plus whatever follows its keyword on that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicMatch<'a> {
    pub magic: LineMagic,
    /// Text after the keyword with leading spaces and tabs removed.
    pub rest: &'a str,
}

impl LineMagic {
    /// Recognizes `%md`, `%sql`, `%sh`, `%bash` and `%pip` at the start of a line.
    ///
    /// The keyword must end at a word boundary, so `%sqlx` or `%shell` do not
    /// match.
    pub fn detect(line: &str) -> Option<MagicMatch<'_>> {
        let line = line.trim_start();
        let caps = keyword_pattern().captures(line)?;
        let keyword = caps.get(1)?;
        let magic = match keyword.as_str() {
            "md" => LineMagic::Markdown,
            "sql" => LineMagic::Sql,
            "sh" | "bash" => LineMagic::Shell,
            "pip" => LineMagic::Pip,
            _ => return None,
        };
        let end = caps.get(0)?.end();
        Some(MagicMatch {
            magic,
            rest: line[end..].trim_start_matches([' ', '\t']),
        })
    }

    /// The keyword written when serializing decorated cells.
    pub fn keyword(self) -> &'static str {
        match self {
            LineMagic::Markdown => "%md",
            LineMagic::Sql => "%sql",
            LineMagic::Shell => "%sh",
            LineMagic::Pip => "%pip",
        }
    }

    pub fn language(self) -> Language {
        match self {
            LineMagic::Markdown => Language::Markdown,
            LineMagic::Sql => Language::Sql,
            LineMagic::Shell | LineMagic::Pip => Language::Shellscript,
        }
    }

    /// Any `%word` at line start, recognized or not. `%%` forms are excluded.
    pub fn is_any(line: &str) -> bool {
        any_pattern().is_match(line.trim_start())
    }
}

/// Double-percent cell magics, which must occupy a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMagic {
    Sql,
    Python,
    Shell,
}

impl CellMagic {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "%%sql" => Some(CellMagic::Sql),
            "%%python" => Some(CellMagic::Python),
            "%%sh" | "%%bash" => Some(CellMagic::Shell),
            _ => None,
        }
    }

    /// The cell magic that selects `language`, if the kernel has one.
    pub fn for_language(language: Language) -> Option<Self> {
        match language {
            Language::Sql => Some(CellMagic::Sql),
            Language::Shellscript => Some(CellMagic::Shell),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CellMagic::Sql => "%%sql",
            CellMagic::Python => "%%python",
            CellMagic::Shell => "%%sh",
        }
    }

    pub fn language(self) -> Language {
        match self {
            CellMagic::Sql => Language::Sql,
            CellMagic::Python => Language::Python,
            CellMagic::Shell => Language::Shellscript,
        }
    }
}

fn keyword_pattern() -> &'static Regex {
    static KEYWORD_REGEX: OnceLock<Regex> = OnceLock::new();
    KEYWORD_REGEX.get_or_init(|| {
        Regex::new(r"^%(md|sql|sh|bash|pip)\b").expect("Invalid magic keyword regex")
    })
}

fn any_pattern() -> &'static Regex {
    static ANY_MAGIC_REGEX: OnceLock<Regex> = OnceLock::new();
    ANY_MAGIC_REGEX.get_or_init(|| Regex::new(r"^%[A-Za-z_]").expect("Invalid line magic regex"))
}
