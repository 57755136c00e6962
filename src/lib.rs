//! # cv-forge – themeable CV document generator
//!
//! Structured profile data goes in, a downloadable document comes out. The
//! pipeline stages are:
//!
//! 1. **Profile** – the résumé content record ([`profile`])
//! 2. **Theme** – fixed catalog of five visual themes ([`theme`])
//! 3. **Render** – one pure markup renderer per theme ([`templates`])
//! 4. **Parse / Style / Layout** – the rendered markup back into positioned
//!    boxes ([`markup`], [`style`], [`layout`])
//! 5. **Paginate** – zero-margin A4 pages ([`pagination`], [`page`])
//! 6. **Export** – chrome raster + vector text into a PDF, or the raw
//!    markup as a `.doc`, delivered through a download sink ([`raster`],
//!    [`pdf`], [`export`])
//!
//! ```no_run
//! use cv_forge::{default_profile, Exporter, ExportFormat};
//!
//! let mut exporter = Exporter::to_directory("exports");
//! let receipt = exporter
//!     .export(ExportFormat::PaginatedImage, "modern", &default_profile())
//!     .unwrap();
//! println!("wrote {}", receipt.filename);
//! ```

pub mod export;
pub mod fonts;
pub mod layout;
pub mod markup;
pub mod page;
pub mod pagination;
pub mod pdf;
pub mod profile;
pub mod raster;
pub mod style;
pub mod templates;
pub mod theme;

// Re-exports for convenience
pub use export::{
    compute_document_layout, export_filename, DownloadSink, ExportError, ExportFormat,
    ExportOptions, ExportReceipt, Exporter, FileSink, MemorySink,
};
pub use profile::{customize, default_profile, empty_profile, ProfileData, ProfileOverrides};
pub use raster::{BoxPainter, PageRasterizer, RASTER_SCALE};
pub use templates::render_markup;
pub use theme::{resolve_theme, themes, ThemeConfig, ThemeId};
