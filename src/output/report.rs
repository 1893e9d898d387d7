//! Report model and renderer for analysis results

use crate::client::AnalysisResult;
use crate::error::Result;
use crate::output::pdf::{PdfExport, PdfExporter};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Region id the rendered report is mounted under.
pub const REPORT_REGION_ID: &str = "pdf-report";

pub const REPORT_TITLE: &str = "Resume Match Report";

/// Suggestion text the backend sends when nothing is missing.
pub const EXCELLENT_MATCH: &str = "Excellent keyword match!";

const SUGGESTION_PREFIX: &str = "Consider including: ";
const SUGGESTION_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Good,
    Medium,
    Poor,
}

impl ScoreTier {
    /// Above 75 is good, above 40 is medium, everything else is poor.
    pub fn classify(score: f64) -> Self {
        if score > 75.0 {
            ScoreTier::Good
        } else if score > 40.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Good => "good",
            ScoreTier::Medium => "medium",
            ScoreTier::Poor => "poor",
        }
    }

    /// Text colour used in the PDF, as 0-1 RGB.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            ScoreTier::Good => (0.086, 0.639, 0.290),
            ScoreTier::Medium => (0.792, 0.541, 0.016),
            ScoreTier::Poor => (0.863, 0.149, 0.149),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    MissingKeyword,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub label: String,
    pub kind: ChipKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SuggestionBlock {
    /// The backend found nothing to add.
    Success(String),
    Chips(Vec<Chip>),
}

impl SuggestionBlock {
    pub fn from_suggestion(suggestion: &str) -> Self {
        if suggestion == EXCELLENT_MATCH {
            return SuggestionBlock::Success(suggestion.to_string());
        }

        let remainder = suggestion.strip_prefix(SUGGESTION_PREFIX).unwrap_or(suggestion);
        let chips = remainder
            .split(SUGGESTION_SEPARATOR)
            .map(|segment| Chip {
                label: segment.to_string(),
                kind: ChipKind::Suggestion,
            })
            .collect();

        SuggestionBlock::Chips(chips)
    }

    pub fn chips(&self) -> &[Chip] {
        match self {
            SuggestionBlock::Success(_) => &[],
            SuggestionBlock::Chips(chips) => chips,
        }
    }
}

/// Everything the report region shows, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReport {
    pub title: String,
    pub score: f64,
    pub tier: ScoreTier,
    pub summary: String,
    pub keyword_chips: Vec<Chip>,
    pub suggestions: SuggestionBlock,
    pub generated_at: DateTime<Utc>,
}

impl RenderedReport {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let keyword_chips = result
            .missing_keywords
            .iter()
            .map(|keyword| Chip {
                label: keyword.clone(),
                kind: ChipKind::MissingKeyword,
            })
            .collect();

        Self {
            title: REPORT_TITLE.to_string(),
            score: result.similarity_score,
            tier: ScoreTier::classify(result.similarity_score),
            summary: result.summary.clone(),
            keyword_chips,
            suggestions: SuggestionBlock::from_suggestion(&result.suggestion),
            generated_at: Utc::now(),
        }
    }

    /// Score as shown in the report, e.g. `80%` or `62.57%`.
    pub fn score_text(&self) -> String {
        format!("{}%", self.score)
    }
}

/// Mounts rendered reports by region id and exports them.
pub struct ReportRenderer {
    regions: HashMap<String, RenderedReport>,
    exporter: PdfExporter,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self {
            regions: HashMap::new(),
            exporter: PdfExporter::default(),
        }
    }

    pub fn with_exporter(exporter: PdfExporter) -> Self {
        Self {
            regions: HashMap::new(),
            exporter,
        }
    }

    /// Render a result and mount it as the report region.
    pub fn render(&mut self, result: &AnalysisResult) -> &RenderedReport {
        let report = RenderedReport::from_result(result);
        debug!(
            "Rendered report: score {} ({}), {} keyword chips, {} suggestion chips",
            report.score,
            report.tier.label(),
            report.keyword_chips.len(),
            report.suggestions.chips().len()
        );
        self.regions.insert(REPORT_REGION_ID.to_string(), report);
        &self.regions[REPORT_REGION_ID]
    }

    /// Remove the report region, leaving the empty-panel state.
    pub fn clear(&mut self) {
        self.regions.remove(REPORT_REGION_ID);
    }

    pub fn region(&self, region_id: &str) -> Option<&RenderedReport> {
        self.regions.get(region_id)
    }

    /// Export a mounted region to `resume_match_report.pdf` in `out_dir`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there is no
    /// result or no region with that id.
    pub fn export_to_pdf(
        &self,
        result: Option<&AnalysisResult>,
        region_id: &str,
        out_dir: &Path,
    ) -> Result<Option<PdfExport>> {
        if result.is_none() {
            debug!("PDF export skipped: no analysis result");
            return Ok(None);
        }
        let Some(report) = self.region(region_id) else {
            debug!("PDF export skipped: region '{}' not found", region_id);
            return Ok(None);
        };

        let export = self.exporter.export(report, out_dir)?;
        info!("Saved {} ({} pages)", export.path.display(), export.page_count);
        Ok(Some(export))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(score: f64, keywords: &[&str], suggestion: &str) -> AnalysisResult {
        AnalysisResult {
            similarity_score: score,
            missing_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            summary: format!("Resume matches {}% with job description.", score),
            suggestion: suggestion.to_string(),
        }
    }

    #[test]
    fn test_score_tier_boundaries() {
        assert_eq!(ScoreTier::classify(80.0), ScoreTier::Good);
        assert_eq!(ScoreTier::classify(75.01), ScoreTier::Good);
        assert_eq!(ScoreTier::classify(75.0), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(41.0), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(40.0), ScoreTier::Poor);
        assert_eq!(ScoreTier::classify(0.0), ScoreTier::Poor);
    }

    #[test]
    fn test_suggestion_chips() {
        let block = SuggestionBlock::from_suggestion("Consider including: Python, SQL, Docker");
        let labels: Vec<_> = block.chips().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Python", "SQL", "Docker"]);
        assert!(block.chips().iter().all(|c| c.kind == ChipKind::Suggestion));
    }

    #[test]
    fn test_excellent_match_is_a_success_message() {
        let block = SuggestionBlock::from_suggestion("Excellent keyword match!");
        assert_eq!(block, SuggestionBlock::Success("Excellent keyword match!".to_string()));
        assert!(block.chips().is_empty());
    }

    #[test]
    fn test_suggestion_without_prefix_is_split_as_is() {
        let block = SuggestionBlock::from_suggestion("terraform, go");
        assert_eq!(block.chips().len(), 2);
        assert_eq!(block.chips()[0].label, "terraform");

    }

    #[test]
    fn test_empty_segments_still_produce_chips() {
        let block = SuggestionBlock::from_suggestion("Consider including: ");
        assert_eq!(block.chips().len(), 1);
        assert_eq!(block.chips()[0].label, "");

        let labels: Vec<_> = SuggestionBlock::from_suggestion("Python, , SQL")
            .chips()
            .iter()
            .map(|c| c.label.clone())
            .collect();
        assert_eq!(labels, ["Python", "", "SQL"]);
    }

    #[test]
    fn test_keyword_chips_keep_order() {
        let report = RenderedReport::from_result(&result_with(55.0, &["AWS", "Kubernetes"], EXCELLENT_MATCH));
        let labels: Vec<_> = report.keyword_chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["AWS", "Kubernetes"]);
        assert_eq!(report.tier, ScoreTier::Medium);
        assert_eq!(report.score_text(), "55%");
    }

    #[test]
    fn test_score_text_keeps_decimals() {
        let report = RenderedReport::from_result(&result_with(62.57, &[], EXCELLENT_MATCH));
        assert_eq!(report.score_text(), "62.57%");
    }

    #[test]
    fn test_render_mounts_region() {
        let mut renderer = ReportRenderer::new();
        assert!(renderer.region(REPORT_REGION_ID).is_none());

        renderer.render(&result_with(90.0, &["rust"], "Consider including: rust"));
        assert_eq!(renderer.region(REPORT_REGION_ID).unwrap().tier, ScoreTier::Good);

        renderer.clear();
        assert!(renderer.region(REPORT_REGION_ID).is_none());
    }

    #[test]
    fn test_export_without_result_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ReportRenderer::new();

        let export = renderer.export_to_pdf(None, REPORT_REGION_ID, dir.path()).unwrap();

        assert!(export.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_with_missing_region_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let result = result_with(70.0, &["sql"], "Consider including: sql");
        let mut renderer = ReportRenderer::new();
        renderer.render(&result);

        let export = renderer.export_to_pdf(Some(&result), "missing-region", dir.path()).unwrap();

        assert!(export.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
