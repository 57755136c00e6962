//! Export pipeline – ties together theme resolution, markup rendering,
//! layout, rasterisation, and delivery into a single call.
//!
//! One export attempt either fully succeeds (the sink received exactly one
//! artifact) or fully fails with an [`ExportError`]; no partial file is
//! ever delivered, and the temporary scaffold directory is released on
//! every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fonts::FontManager;
use crate::layout::compute_layout;
use crate::markup;
use crate::page::DocumentLayout;
use crate::pagination::paginate;
use crate::pdf::assemble_pdf;
use crate::profile::ProfileData;
use crate::raster::{BoxPainter, PageRasterizer, RasterError, RASTER_SCALE};
use crate::style::{build_styled_tree, resolve_style};
use crate::templates::{render_markup, PAGE_HEIGHT_PX, PAGE_WIDTH_PX};
use crate::theme::resolve_theme;

// ---------------------------------------------------------------------------
// Formats and errors
// ---------------------------------------------------------------------------

/// The two downloadable artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Paginated PDF: page chrome rasterised at a fixed scale, vector text.
    PaginatedImage,
    /// The rendered markup wrapped as a word-processor-openable `.doc`.
    WordCompatible,
}

impl ExportFormat {
    /// Parse the caller-facing format literal.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paginated-image" => Some(ExportFormat::PaginatedImage),
            "word-compatible" => Some(ExportFormat::WordCompatible),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PaginatedImage => "pdf",
            ExportFormat::WordCompatible => "doc",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::PaginatedImage => "application/pdf",
            ExportFormat::WordCompatible => "application/msword",
        }
    }
}

/// Why an export attempt failed. Renderers and theme lookup are total, so
/// every failure comes from the asynchronous half of the pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("document assembly failed: {0}")]
    Assembly(String),

    #[error("export scaffold error: {0}")]
    Scaffold(#[source] std::io::Error),

    #[error("download delivery failed: {0}")]
    Delivery(#[source] std::io::Error),
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub bytes_written: usize,
    /// Page count for paginated exports; `None` for the word-compatible
    /// stream.
    pub pages: Option<usize>,
}

// ---------------------------------------------------------------------------
// Delivery sinks
// ---------------------------------------------------------------------------

/// Receives the finished artifact – the library counterpart of a triggered
/// browser download.
pub trait DownloadSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Writes artifacts into a directory, creating it if needed.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for FileSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir).map_err(ExportError::Delivery)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes).map_err(ExportError::Delivery)?;
        log::info!("delivered '{}' ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps artifacts in memory – for embedding consumers and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        self.artifacts.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

/// Scoped staging directory for one export attempt, holding the rendered
/// markup and the frozen layout while the rasteriser runs. `Drop`
/// guarantees removal however the export ends.
struct Scaffold {
    dir: tempfile::TempDir,
}

impl Scaffold {
    fn acquire(root: Option<&Path>) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cv-forge-export-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(ExportError::Scaffold)?;
        log::debug!("export scaffold at {}", dir.path().display());
        Ok(Self { dir })
    }

    fn stage(&self, name: &str, contents: &[u8]) -> Result<(), ExportError> {
        fs::write(self.dir.path().join(name), contents).map_err(ExportError::Scaffold)
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Tuning knobs for the export pipeline.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Where scaffold directories are created (host temp dir by default).
    pub scaffold_root: Option<PathBuf>,
    /// Chrome rasterisation scale; ≥ 2.0 for print sharpness.
    pub raster_scale: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scaffold_root: None,
            raster_scale: RASTER_SCALE,
        }
    }
}

/// Orchestrates exports against a sink and a rasteriser.
pub struct Exporter {
    sink: Box<dyn DownloadSink>,
    rasterizer: Box<dyn PageRasterizer>,
    options: ExportOptions,
}

impl Exporter {
    /// Exporter with the default chrome painter delivering to `sink`.
    pub fn new(sink: Box<dyn DownloadSink>) -> Self {
        Self {
            sink,
            rasterizer: Box::new(BoxPainter),
            options: ExportOptions::default(),
        }
    }

    /// Convenience: deliver into a directory on disk.
    pub fn to_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileSink::new(dir)))
    }

    /// Swap the rasteriser (tests inject failing ones here).
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn PageRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one export: resolve the theme (total – unknown ids fall back to
    /// the first registry entry), render, produce the artifact, deliver.
    pub fn export(
        &mut self,
        format: ExportFormat,
        theme_id: &str,
        profile: &ProfileData,
    ) -> Result<ExportReceipt, ExportError> {
        let theme = resolve_theme(theme_id);
        let markup_text = render_markup(profile, theme);
        let filename = export_filename(&profile.name, theme.name, format);

        let (bytes, pages) = match format {
            ExportFormat::WordCompatible => (markup_text.into_bytes(), None),
            ExportFormat::PaginatedImage => {
                // Scaffold lives for the rasterisation only; Drop removes it
                // on success and on every error path alike.
                let scaffold = Scaffold::acquire(self.options.scaffold_root.as_deref())?;
                scaffold.stage("markup.html", markup_text.as_bytes())?;

                let layout = compute_document_layout(
                    &markup_text,
                    &format!("{} - {}", profile.name, theme.name),
                );
                scaffold.stage("layout.json", layout.to_json().as_bytes())?;

                let bytes =
                    assemble_pdf(&layout, self.rasterizer.as_ref(), self.options.raster_scale)?;
                (bytes, Some(layout.pages.len()))
            }
        };

        self.sink.deliver(&filename, &bytes)?;
        Ok(ExportReceipt {
            filename,
            bytes_written: bytes.len(),
            pages,
        })
    }
}

// ---------------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------------

/// Parse + style + layout + paginate a rendered markup document.
pub fn compute_document_layout(markup_text: &str, title: &str) -> DocumentLayout {
    let nodes = markup::parse(markup_text);
    let body = markup::body_children(&nodes);
    // Inherit the document shell's typography (font stack, base colour).
    let base_style = markup::body_element(&nodes).map(|el| resolve_style(el, None));
    let styled = build_styled_tree(&body, base_style.as_ref());

    let fonts = FontManager::default();
    let boxes = compute_layout(&styled, PAGE_WIDTH_PX, &fonts);
    log::debug!("layout: {} top-level box(es)", boxes.len());

    let mut layout = paginate(&boxes, PAGE_WIDTH_PX, PAGE_HEIGHT_PX, &fonts);
    layout.title = title.to_string();
    layout
}

/// Artifact filename: `<Name>_CV_<ThemeName>.<ext>` with whitespace runs
/// replaced by underscores.
pub fn export_filename(name: &str, theme_name: &str, format: ExportFormat) -> String {
    format!(
        "{}_CV_{}.{}",
        underscore(name),
        underscore(theme_name),
        format.extension()
    )
}

fn underscore(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;

    #[test]
    fn format_literals_roundtrip() {
        assert_eq!(
            ExportFormat::parse("paginated-image"),
            Some(ExportFormat::PaginatedImage)
        );
        assert_eq!(
            ExportFormat::parse("word-compatible"),
            Some(ExportFormat::WordCompatible)
        );
        assert_eq!(ExportFormat::parse("docx"), None);
    }

    #[test]
    fn filename_replaces_whitespace_runs() {
        assert_eq!(
            export_filename("Jane Q. Doe", "Modern Sidebar", ExportFormat::PaginatedImage),
            "Jane_Q._Doe_CV_Modern_Sidebar.pdf"
        );
        assert_eq!(
            export_filename("A  B", "Classic Professional", ExportFormat::WordCompatible),
            "A_B_CV_Classic_Professional.doc"
        );
    }

    #[test]
    fn word_export_delivers_the_markup_verbatim() {
        let mut exporter = Exporter::new(Box::new(MemorySink::default()));
        let profile = default_profile();
        let receipt = exporter
            .export(ExportFormat::WordCompatible, "classic", &profile)
            .unwrap();
        assert!(receipt.filename.ends_with(".doc"));
        assert_eq!(receipt.pages, None);
        assert!(receipt.bytes_written > 1000);
    }

    #[test]
    fn unknown_theme_falls_back_rather_than_failing() {
        let mut exporter = Exporter::new(Box::new(MemorySink::default()));
        let receipt = exporter
            .export(
                ExportFormat::WordCompatible,
                "no-such-theme",
                &default_profile(),
            )
            .unwrap();
        // Fallback is the first registry entry: Modern Sidebar.
        assert_eq!(receipt.filename, "Elena_Vasquez_CV_Modern_Sidebar.doc");
    }

    #[test]
    fn document_layout_for_each_theme_produces_pages() {
        let profile = default_profile();
        for theme in crate::theme::themes() {
            let markup_text = render_markup(&profile, theme);
            let layout = compute_document_layout(&markup_text, "t");
            assert!(
                !layout.pages.is_empty(),
                "{:?} produced no pages",
                theme.id
            );
        }
    }
}
