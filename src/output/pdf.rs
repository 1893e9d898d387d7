//! Paginated A4 export of a rasterized report

use crate::error::{Result, ResumeAnalyzerError};
use crate::output::layout::{self, Canvas, DrawOp, Rgb};
use crate::output::report::RenderedReport;
use log::debug;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_NAME: &str = "resume_match_report.pdf";

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Device pixel ratio used when rasterizing the report region.
pub const RASTER_SCALE: f32 = 2.0;

const MM_PER_PT: f32 = 25.4 / 72.0;
/// Baseline sits this far below the top of a line box, as a fraction of font size.
const ASCENT: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct PdfExport {
    pub path: PathBuf,
    pub page_count: usize,
    /// Height of the scaled image, before slicing into pages.
    pub content_height_mm: f32,
}

/// Vertical offsets of the image on each page.
///
/// The first page shows the image at 0; every further page shifts it up by
/// one more page height until the remaining height is used up.
pub fn page_offsets(content_height: f32, page_height: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    if page_height <= 0.0 {
        return offsets;
    }

    let mut height_left = content_height - page_height;
    while height_left > 0.0 {
        offsets.push(height_left - content_height);
        height_left -= page_height;
    }
    offsets
}

#[derive(Debug, Clone)]
pub struct PdfExporter {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub scale: f32,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            scale: RASTER_SCALE,
        }
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfExporter {
    /// Rasterize `report` and write it, paginated, to `out_dir/resume_match_report.pdf`.
    pub fn export(&self, report: &RenderedReport, out_dir: &Path) -> Result<PdfExport> {
        let canvas = layout::rasterize(report, self.scale);
        let path = out_dir.join(EXPORT_FILE_NAME);
        std::fs::create_dir_all(out_dir)?;

        let page_count = self.write_canvas(&canvas, &report.title, &path)?;
        Ok(PdfExport {
            path,
            page_count,
            content_height_mm: self.content_height_mm(&canvas),
        })
    }

    /// Millimetres per canvas pixel once the canvas is fitted to the page width.
    fn mm_per_px(&self, canvas: &Canvas) -> f32 {
        self.page_width_mm / canvas.width
    }

    pub fn content_height_mm(&self, canvas: &Canvas) -> f32 {
        canvas.height * self.mm_per_px(canvas)
    }

    fn write_canvas(&self, canvas: &Canvas, title: &str, path: &Path) -> Result<usize> {
        let offsets = page_offsets(self.content_height_mm(canvas), self.page_height_mm);
        debug!(
            "Canvas {}x{} px at {}x, {} page(s)",
            canvas.width,
            canvas.height,
            canvas.scale,
            offsets.len()
        );

        let (doc, first_page, first_layer) = PdfDocument::new(
            title,
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            "Page 1",
        );
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        for (index, offset) in offsets.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(
                    Mm(self.page_width_mm),
                    Mm(self.page_height_mm),
                    format!("Page {}", index + 1),
                );
                doc.get_page(page).get_layer(layer)
            };
            self.draw_slice(&layer, &fonts, canvas, *offset);
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ResumeAnalyzerError::PdfExport(format!("Failed to save {}: {:?}", path.display(), e)))?;
        Ok(offsets.len())
    }

    /// Draw the part of the canvas visible on a page whose image is shifted by `offset` mm.
    fn draw_slice(&self, layer: &PdfLayerReference, fonts: &Fonts, canvas: &Canvas, offset: f32) {
        let k = self.mm_per_px(canvas);
        // Ops straddling a page edge are drawn on both pages and clipped by the media box.
        let visible = |op: &DrawOp| {
            let top = op.top() * k + offset;
            let bottom = op.bottom() * k + offset;
            top < self.page_height_mm && bottom > 0.0
        };

        for op in canvas.ops.iter().filter(|op| visible(*op)) {
            match op {
                DrawOp::Text { x, y, size, bold, color, text } => {
                    let font = if *bold { &fonts.bold } else { &fonts.regular };
                    let size_mm = size * k;
                    let baseline = self.page_height_mm - (y * k + offset + size_mm * ASCENT);
                    layer.set_fill_color(rgb(*color));
                    layer.use_text(text.as_str(), size_mm / MM_PER_PT, Mm(x * k), Mm(baseline), font);
                }
                DrawOp::Chip { x, y, width, height, size, color, label } => {
                    let top = self.page_height_mm - (y * k + offset);
                    let bottom = top - height * k;
                    let left = x * k;
                    let right = left + width * k;

                    layer.set_outline_color(rgb(*color));
                    layer.set_outline_thickness(0.5);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(left), Mm(top)), false),
                            (Point::new(Mm(right), Mm(top)), false),
                            (Point::new(Mm(right), Mm(bottom)), false),
                            (Point::new(Mm(left), Mm(bottom)), false),
                        ],
                        is_closed: true,
                    });

                    let size_mm = size * k;
                    let text_x = left + (width * k - layout::measure_text(label, size_mm)) / 2.0;
                    let baseline = bottom + (height * k - size_mm) / 2.0 + size_mm * (1.0 - ASCENT);
                    layer.set_fill_color(rgb(*color));
                    layer.use_text(label.as_str(), size_mm / MM_PER_PT, Mm(text_x), Mm(baseline), &fonts.regular);
                }
            }
        }
    }
}

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page_when_content_fits() {
        assert_eq!(page_offsets(120.0, 297.0), vec![0.0]);
        assert_eq!(page_offsets(297.0, 297.0), vec![0.0]);
        assert_eq!(page_offsets(0.0, 297.0), vec![0.0]);
    }

    #[test]
    fn test_offsets_step_by_page_height() {
        let offsets = page_offsets(700.0, 297.0);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[1] + 297.0).abs() < 1e-3);
        assert!((offsets[2] + 594.0).abs() < 1e-3);
    }

    #[test]
    fn test_page_count_is_ceiling_of_height_ratio() {
        for height in [1.0_f32, 296.0, 298.0, 594.0, 595.0, 1500.0] {
            let expected = (height / 297.0).ceil() as usize;
            assert_eq!(page_offsets(height, 297.0).len(), expected, "height {}", height);
        }
    }
}
