//! Output formatters for rendered match reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeAnalyzerError};
use crate::output::report::{Chip, RenderedReport, ScoreTier, SuggestionBlock};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Text shown in the results panel when there is no analysis to display.
pub const EMPTY_PANEL_MESSAGE: &str = "No analysis available. Your analysis results will appear here.";

/// Trait for formatting rendered reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RenderedReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored score and chips
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter mirroring the on-page report
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            color: #1f2937;
            max-width: 640px;
            margin: 0 auto;
            padding: 20px;
            background: #f8fafc;
        }
        #pdf-report {
            background: white;
            padding: 24px;
            border-radius: 6px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h2 { color: #7e22ce; margin-top: 0; }
        .score-good { color: #16a34a; }
        .score-medium { color: #ca8a04; }
        .score-poor { color: #dc2626; }
        .chips { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 8px; }
        .chip { padding: 4px 12px; border-radius: 9999px; font-size: 0.875rem; }
        .chip-keyword { background: #fee2e2; color: #991b1b; }
        .chip-suggestion { background: #f3e8ff; color: #6b21a8; }
        .success { color: #16a34a; font-weight: 500; font-size: 0.875rem; }
        .generated { color: #6b7280; font-size: 0.75rem; margin-top: 24px; }
    </style>
    {% endif %}
</head>
<body>
    <div id="pdf-report">
        <h2>{{ title }}</h2>
        <p><strong>Total Match Score:</strong> <span class="score-{{ tier }}">{{ score }}</span></p>
        {% if has_summary %}<p>{{ summary }}</p>{% endif %}
        <div>
            <strong>Missing Keywords:</strong>
            <div class="chips">
                {% for chip in keyword_chips %}<span class="chip chip-keyword">{{ chip }}</span>
                {% endfor %}
            </div>
        </div>
        <div>
            <strong>Suggestions:</strong>
            <div class="chips">
                {% if has_success %}<span class="success">{{ success_message }}</span>{% endif %}
                {% for chip in suggestion_chips %}<span class="chip chip-suggestion">{{ chip }}</span>
                {% endfor %}
            </div>
        </div>
        <p class="generated">Generated {{ generated_at }}</p>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    title: String,
    score: String,
    tier: String,
    has_summary: bool,
    summary: String,
    keyword_chips: Vec<String>,
    has_success: bool,
    success_message: String,
    suggestion_chips: Vec<String>,
    generated_at: String,
}

fn chip_labels(chips: &[Chip]) -> Vec<String> {
    chips.iter().map(|chip| chip.label.clone()).collect()
}

fn generated_at(report: &RenderedReport) -> String {
    report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Magenta).bold(), title.color(Color::Magenta).bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn tier_color(tier: ScoreTier) -> Color {
        match tier {
            ScoreTier::Good => Color::Green,
            ScoreTier::Medium => Color::Yellow,
            ScoreTier::Poor => Color::Red,
        }
    }

    fn format_chips(&self, chips: &[Chip], color: Color) -> String {
        chips
            .iter()
            .map(|chip| self.colorize(&format!("( {} )", chip.label), color))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RenderedReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&report.title));
        output.push_str(&format!("Generated: {}\n\n", generated_at(report)));

        let score = if self.use_colors {
            report.score_text().color(Self::tier_color(report.tier)).bold().to_string()
        } else {
            format!("{} [{}]", report.score_text(), report.tier.label().to_uppercase())
        };
        output.push_str(&format!("Total Match Score: {}\n", score));
        if !report.summary.is_empty() {
            output.push_str(&format!("{}\n", self.colorize(&report.summary, Color::Cyan)));
        }

        output.push_str("\nMissing Keywords:\n");
        if report.keyword_chips.is_empty() {
            output.push_str("  (none)\n");
        } else {
            output.push_str(&format!("  {}\n", self.format_chips(&report.keyword_chips, Color::Red)));
        }

        output.push_str("\nSuggestions:\n");
        match &report.suggestions {
            SuggestionBlock::Success(message) => {
                output.push_str(&format!("  {}\n", self.colorize(message, Color::Green)));
            }
            SuggestionBlock::Chips(chips) => {
                output.push_str(&format!("  {}\n", self.format_chips(chips, Color::Magenta)));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RenderedReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_chips(chips: &[Chip]) -> String {
        chips
            .iter()
            .map(|chip| format!("`{}`", chip.label))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RenderedReport) -> Result<String> {
        let mut output = format!("# {}\n\n", report.title);

        if self.include_metadata {
            output.push_str(&format!("**Generated:** {}\n\n", generated_at(report)));
        }

        output.push_str(&format!(
            "**Total Match Score:** {} ({})\n\n",
            report.score_text(),
            report.tier.label()
        ));
        if !report.summary.is_empty() {
            output.push_str(&format!("> {}\n\n", report.summary));
        }

        output.push_str("## Missing Keywords\n\n");
        if report.keyword_chips.is_empty() {
            output.push_str("_None_\n\n");
        } else {
            output.push_str(&format!("{}\n\n", Self::markdown_chips(&report.keyword_chips)));
        }

        output.push_str("## Suggestions\n\n");
        match &report.suggestions {
            SuggestionBlock::Success(message) => output.push_str(&format!("**{}**\n", message)),
            SuggestionBlock::Chips(chips) => output.push_str(&format!("{}\n", Self::markdown_chips(chips))),
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &RenderedReport) -> HtmlTemplate {
        let (has_success, success_message) = match &report.suggestions {
            SuggestionBlock::Success(message) => (true, message.clone()),
            SuggestionBlock::Chips(_) => (false, String::new()),
        };

        HtmlTemplate {
            include_styles: self.include_styles,
            title: report.title.clone(),
            score: report.score_text(),
            tier: report.tier.label().to_string(),
            has_summary: !report.summary.is_empty(),
            summary: report.summary.clone(),
            keyword_chips: chip_labels(&report.keyword_chips),
            has_success,
            success_message,
            suggestion_chips: chip_labels(report.suggestions.chips()),
            generated_at: generated_at(report),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RenderedReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeAnalyzerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool, include_html_styles: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        }
    }

    pub fn generate_report(&self, report: &RenderedReport, format: OutputFormat) -> Result<String> {
        let formatter = self.formatter(format);
        debug_assert_eq!(formatter.supports_format(), format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
