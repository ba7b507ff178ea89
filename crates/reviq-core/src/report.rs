//! Parsing of the free-text strategy summary.
//!
//! The provider is asked for three lines prefixed `ACTION:`, `TACTIC:` and
//! `YIELD:`, but nothing enforces that. Lines are kept in order; anything
//! without a recognised prefix is a [`StrategyKind::Note`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*-]\s*").expect("valid bullet regex"));
static NUMBERING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]\.\s*").expect("valid numbering regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    Action,
    Tactic,
    Yield,
    Note,
}

impl StrategyKind {
    fn from_prefix(line: &str) -> Self {
        let head = line
            .split_once(':')
            .map(|(head, _)| head.trim().trim_matches('*').to_ascii_uppercase());
        match head.as_deref() {
            Some("ACTION") => Self::Action,
            Some("TACTIC") => Self::Tactic,
            Some("YIELD") => Self::Yield,
            _ => Self::Note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyLine {
    pub kind: StrategyKind,
    /// Line text with list markers removed, prefix kept.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyReport {
    pub raw: String,
    pub lines: Vec<StrategyLine>,
}

impl StrategyReport {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lines = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let line = line.trim();
                let line = BULLET_RE.replace(line, "");
                let text = NUMBERING_RE.replace(&line, "").into_owned();
                StrategyLine {
                    kind: StrategyKind::from_prefix(&text),
                    text,
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            lines,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line of the given kind, if the provider produced one.
    #[must_use]
    pub fn line(&self, kind: StrategyKind) -> Option<&StrategyLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}
