//! Formatter for free-form, markdown-like analysis narratives.
//!
//! Each line is classified by an ordered list of rules, first match wins.
//! Classification and rendering are kept apart so the heuristics can be
//! tested without a terminal.

use colored::{Color, Colorize};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading(String),
    SubHeading(String),
    Bullet { label: Option<String>, text: String },
    Paragraph(String),
    Blank,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Heading,
    SubHeading,
    Bullet,
    Paragraph,
    Blank,
}

const RULES: [Rule; 5] = [Rule::Heading, Rule::SubHeading, Rule::Bullet, Rule::Paragraph, Rule::Blank];

pub struct NarrativeFormatter {
    numbered_heading: Regex,
    use_colors: bool,
}

impl Default for NarrativeFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NarrativeFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            numbered_heading: Regex::new(r"^\*\*\d+\.").expect("Invalid numbered heading regex"),
            use_colors,
        }
    }

    pub fn classify(&self, line: &str) -> LineKind {
        RULES
            .iter()
            .find_map(|rule| self.apply(*rule, line))
            .unwrap_or(LineKind::Blank)
    }

    pub fn classify_all(&self, text: &str) -> Vec<LineKind> {
        text.split('\n').map(|line| self.classify(line)).collect()
    }

    fn apply(&self, rule: Rule, line: &str) -> Option<LineKind> {
        match rule {
            Rule::Heading => line
                .starts_with("##")
                .then(|| LineKind::Heading(line.replacen("##", "", 1).trim().to_string())),
            Rule::SubHeading => self
                .numbered_heading
                .is_match(line)
                .then(|| LineKind::SubHeading(line.replace("**", "").trim().to_string())),
            Rule::Bullet => {
                let trimmed = line.trim();
                if !trimmed.starts_with('*') {
                    return None;
                }
                if line.contains("**") {
                    let mut parts = line.split("**").skip(1);
                    let label = parts.next().unwrap_or_default().trim().to_string();
                    let text = strip_stars(&parts.collect::<String>());
                    Some(LineKind::Bullet { label: Some(label), text })
                } else {
                    Some(LineKind::Bullet { label: None, text: strip_stars(&trimmed[1..]) })
                }
            }
            Rule::Paragraph => (!line.trim().is_empty()).then(|| LineKind::Paragraph(line.replace('*', ""))),
            Rule::Blank => Some(LineKind::Blank),
        }
    }

    fn colorize(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.use_colors, bold) {
            (false, _) => text.to_string(),
            (true, true) => text.color(color).bold().to_string(),
            (true, false) => text.color(color).to_string(),
        }
    }

    pub fn render_line(&self, kind: &LineKind) -> String {
        match kind {
            LineKind::Heading(text) => format!("\n{}\n", self.colorize(text, Color::Blue, true)),
            LineKind::SubHeading(text) => format!("\n{}", self.colorize(text, Color::White, true)),
            LineKind::Bullet { label: Some(label), text } => {
                format!("  • {} {}", self.colorize(label, Color::White, true), text)
            }
            LineKind::Bullet { label: None, text } => format!("  • {}", text),
            LineKind::Paragraph(text) => text.clone(),
            LineKind::Blank => String::new(),
        }
    }

    pub fn render(&self, text: &str) -> String {
        self.classify_all(text)
            .iter()
            .map(|kind| self.render_line(kind))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn strip_stars(text: &str) -> String {
    text.replace('*', "").trim().to_string()
}
