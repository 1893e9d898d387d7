//! Output module
//! Report rendering, formatting, narrative display, and PDF export

pub mod formatter;
pub mod layout;
pub mod narrative;
pub mod pdf;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator, EMPTY_PANEL_MESSAGE};
pub use narrative::NarrativeFormatter;
pub use pdf::{PdfExport, PdfExporter};
pub use report::{RenderedReport, ReportRenderer, ScoreTier, REPORT_REGION_ID};
