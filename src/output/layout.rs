//! Rasterization of a rendered report into a canvas of positioned draw operations.
//!
//! Geometry is in canvas pixels at the requested device scale; the PDF exporter
//! maps the canvas width onto the page width, so the scale changes resolution,
//! not proportions.

use crate::output::report::{Chip, ChipKind, RenderedReport, SuggestionBlock};

/// CSS width of the report region at 1x.
pub const REGION_WIDTH: f32 = 560.0;

/// Average Helvetica advance width, in em.
const AVERAGE_CHAR_WIDTH_EM: f32 = 0.55;

const PADDING: f32 = 24.0;
const SECTION_GAP: f32 = 16.0;
const TITLE_SIZE: f32 = 20.0;
const TEXT_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 1.4;
const CHIP_PADDING_X: f32 = 12.0;
const CHIP_HEIGHT: f32 = 28.0;
const CHIP_GAP: f32 = 8.0;

pub type Rgb = (f32, f32, f32);

const TEXT_COLOR: Rgb = (0.122, 0.161, 0.216);
const LABEL_COLOR: Rgb = (0.216, 0.255, 0.318);
const TITLE_COLOR: Rgb = (0.494, 0.133, 0.808);
const SUCCESS_COLOR: Rgb = (0.086, 0.639, 0.290);
const KEYWORD_CHIP_COLOR: Rgb = (0.600, 0.106, 0.106);
const SUGGESTION_CHIP_COLOR: Rgb = (0.420, 0.129, 0.659);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the top of the line box.
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb,
        text: String,
    },
    Chip {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        size: f32,
        color: Rgb,
        label: String,
    },
}

impl DrawOp {
    pub fn top(&self) -> f32 {
        match self {
            DrawOp::Text { y, .. } | DrawOp::Chip { y, .. } => *y,
        }
    }

    pub fn bottom(&self) -> f32 {
        match self {
            DrawOp::Text { y, size, .. } => y + size * LINE_HEIGHT,
            DrawOp::Chip { y, height, .. } => y + height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub ops: Vec<DrawOp>,
}

/// Estimated rendered width of `text` at `size`.
pub fn measure_text(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVERAGE_CHAR_WIDTH_EM
}

struct CanvasBuilder {
    scale: f32,
    cursor: f32,
    ops: Vec<DrawOp>,
}

impl CanvasBuilder {
    fn content_width(&self) -> f32 {
        (REGION_WIDTH - 2.0 * PADDING) * self.scale
    }

    fn text(&mut self, text: &str, size: f32, bold: bool, color: Rgb) {
        let size = size * self.scale;
        for line in wrap_text(text, size, self.content_width()) {
            self.ops.push(DrawOp::Text {
                x: PADDING * self.scale,
                y: self.cursor,
                size,
                bold,
                color,
                text: line,
            });
            self.cursor += size * LINE_HEIGHT;
        }
    }

    fn gap(&mut self, gap: f32) {
        self.cursor += gap * self.scale;
    }

    /// Lay chips out left to right, wrapping like a flex row.
    fn chips(&mut self, chips: &[Chip]) {
        if chips.is_empty() {
            return;
        }
        let left = PADDING * self.scale;
        let right = left + self.content_width();
        let size = TEXT_SIZE * self.scale;
        let height = CHIP_HEIGHT * self.scale;
        let mut x = left;

        for chip in chips {
            let width = (measure_text(&chip.label, size) + 2.0 * CHIP_PADDING_X * self.scale)
                .min(self.content_width());
            if x > left && x + width > right {
                x = left;
                self.cursor += height + CHIP_GAP * self.scale;
            }
            let color = match chip.kind {
                ChipKind::MissingKeyword => KEYWORD_CHIP_COLOR,
                ChipKind::Suggestion => SUGGESTION_CHIP_COLOR,
            };
            self.ops.push(DrawOp::Chip {
                x,
                y: self.cursor,
                width,
                height,
                size,
                color,
                label: chip.label.clone(),
            });
            x += width + CHIP_GAP * self.scale;
        }
        self.cursor += height;
    }
}

/// Greedy word wrap against the estimated text width.
fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && measure_text(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Rasterize the report region at `scale` pixels per CSS pixel.
pub fn rasterize(report: &RenderedReport, scale: f32) -> Canvas {
    let mut builder = CanvasBuilder {
        scale,
        cursor: PADDING * scale,
        ops: Vec::new(),
    };

    builder.text(&report.title, TITLE_SIZE, true, TITLE_COLOR);
    builder.gap(SECTION_GAP);

    builder.text(
        &format!("Total Match Score: {}", report.score_text()),
        TEXT_SIZE,
        true,
        report.tier.rgb(),
    );
    if !report.summary.is_empty() {
        builder.text(&report.summary, TEXT_SIZE, false, TEXT_COLOR);
    }
    builder.gap(SECTION_GAP);

    builder.text("Missing Keywords:", TEXT_SIZE, true, LABEL_COLOR);
    builder.gap(CHIP_GAP);
    builder.chips(&report.keyword_chips);
    builder.gap(SECTION_GAP);

    builder.text("Suggestions:", TEXT_SIZE, true, LABEL_COLOR);
    builder.gap(CHIP_GAP);
    match &report.suggestions {
        SuggestionBlock::Success(message) => builder.text(message, TEXT_SIZE, true, SUCCESS_COLOR),
        SuggestionBlock::Chips(chips) => builder.chips(chips),
    }

    let height = builder.cursor + PADDING * scale;
    Canvas {
        width: REGION_WIDTH * scale,
        height,
        scale,
        ops: builder.ops,
    }
}
