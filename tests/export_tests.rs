//! Integration tests for the cv-forge pipeline.
//!
//! These tests validate:
//! - Renderer determinism and order preservation
//! - Empty-section safety across all five layouts
//! - Theme fallback totality
//! - Filename construction and both export formats end to end
//! - Scaffold cleanup on rasteriser failure

use cv_forge::export::{ExportOptions, MemorySink};
use cv_forge::page::PageLayout;
use cv_forge::profile::{default_profile, empty_profile, ExperienceEntry, SkillGroup};
use cv_forge::raster::{PageRasterizer, RasterError};
use cv_forge::theme::themes;
use cv_forge::{
    compute_document_layout, render_markup, resolve_theme, ExportFormat, Exporter,
};
use image::RgbaImage;
use sha2::{Digest, Sha256};

// =====================================================================
// Helpers
// =====================================================================

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sha256(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "missing PDF header");
}

/// Rasteriser that always fails – exercises the error path without
/// touching the painter.
struct FailingRasterizer;

impl PageRasterizer for FailingRasterizer {
    fn rasterize(
        &self,
        _page: &PageLayout,
        _page_width_px: f32,
        _page_height_px: f32,
        _scale: f32,
    ) -> Result<RgbaImage, RasterError> {
        Err(RasterError("synthetic rasterizer failure".to_string()))
    }
}

// =====================================================================
// Renderer determinism
// =====================================================================

#[test]
fn renderers_are_byte_identical_across_calls() {
    let profile = default_profile();
    for theme in themes() {
        let first = sha256(render_markup(&profile, theme).as_bytes());
        let second = sha256(render_markup(&profile, theme).as_bytes());
        assert_eq!(first, second, "{:?} output drifted", theme.id);
    }
}

// =====================================================================
// Order preservation
// =====================================================================

#[test]
fn skill_order_is_preserved_in_every_renderer() {
    let mut profile = default_profile();
    profile.skills = vec![
        SkillGroup {
            category: "Bravo Group".to_string(),
            items: vec!["zz-bravo-item".to_string()],
        },
        SkillGroup {
            category: "Alpha Group".to_string(),
            items: vec!["zz-alpha-item".to_string()],
        },
        SkillGroup {
            category: "Charlie Group".to_string(),
            items: vec!["zz-charlie-item".to_string()],
        },
    ];

    for theme in themes() {
        let markup = render_markup(&profile, theme);
        let b = markup.find("zz-bravo-item");
        let a = markup.find("zz-alpha-item");
        let c = markup.find("zz-charlie-item");
        let (b, a, c) = (
            b.unwrap_or_else(|| panic!("{:?} dropped bravo", theme.id)),
            a.unwrap_or_else(|| panic!("{:?} dropped alpha", theme.id)),
            c.unwrap_or_else(|| panic!("{:?} dropped charlie", theme.id)),
        );
        assert!(b < a && a < c, "{:?} reordered skills", theme.id);
    }
}

#[test]
fn experience_truncation_takes_a_prefix() {
    let mut profile = default_profile();
    profile.experience = (1..=6)
        .map(|i| ExperienceEntry {
            title: format!("Role-Number-{i}"),
            company: format!("Company {i}"),
            location: "Somewhere".to_string(),
            period: "2020".to_string(),
            description: vec![format!("Did thing {i}")],
        })
        .collect();

    for theme in themes() {
        let markup = render_markup(&profile, theme);
        // Every renderer keeps at least the first three, in order.
        let p1 = markup.find("Role-Number-1").expect("first entry missing");
        let p2 = markup.find("Role-Number-2").expect("second entry missing");
        let p3 = markup.find("Role-Number-3").expect("third entry missing");
        assert!(p1 < p2 && p2 < p3, "{:?} reordered experience", theme.id);
        // And none surfaces entries past its limit while dropping earlier ones.
        assert!(
            !markup.contains("Role-Number-6"),
            "{:?} shows more than five entries",
            theme.id
        );
    }
}

// =====================================================================
// Empty-section safety
// =====================================================================

#[test]
fn empty_profile_renders_everywhere() {
    let profile = empty_profile();
    for theme in themes() {
        let markup = render_markup(&profile, theme);
        assert!(markup.starts_with("<!DOCTYPE html>"), "{:?}", theme.id);
        assert!(markup.ends_with("</html>"), "{:?}", theme.id);
        // No dangling template placeholders.
        assert!(!markup.contains("{name}"), "{:?}", theme.id);
        assert!(!markup.contains("{}"), "{:?}", theme.id);
    }
}

#[test]
fn empty_profile_survives_the_full_layout_pass() {
    let profile = empty_profile();
    for theme in themes() {
        let markup = render_markup(&profile, theme);
        let layout = compute_document_layout(&markup, "empty");
        assert!(!layout.pages.is_empty(), "{:?}", theme.id);
    }
}

#[test]
fn empty_profile_exports_as_pdf() {
    let mut exporter = Exporter::new(Box::new(MemorySink::default()));
    let receipt = exporter
        .export(ExportFormat::PaginatedImage, "minimal", &empty_profile())
        .unwrap();
    assert!(receipt.filename.ends_with(".pdf"));
    assert_eq!(receipt.pages, Some(1));
}

// =====================================================================
// Theme fallback totality
// =====================================================================

#[test]
fn unknown_theme_id_matches_first_entry() {
    let fallback = resolve_theme("not-a-real-id");
    let first = resolve_theme(themes()[0].id.as_str());
    assert_eq!(fallback, first);
}

#[test]
fn fallback_theme_renders_identically() {
    let profile = default_profile();
    let via_fallback = render_markup(&profile, resolve_theme("not-a-real-id"));
    let via_first = render_markup(&profile, &themes()[0]);
    assert_eq!(via_fallback, via_first);
}

// =====================================================================
// Filename construction
// =====================================================================

#[test]
fn filename_from_spaced_name_and_theme() {
    let mut profile = default_profile();
    profile.name = "Jane Q. Doe".to_string();
    let mut exporter = Exporter::new(Box::new(MemorySink::default()));
    let receipt = exporter
        .export(ExportFormat::PaginatedImage, "modern", &profile)
        .unwrap();
    assert_eq!(receipt.filename, "Jane_Q._Doe_CV_Modern_Sidebar.pdf");
}

// =====================================================================
// End-to-end: word-compatible
// =====================================================================

#[test]
fn word_export_wraps_the_classic_markup() {
    let profile = default_profile();
    let out_dir = tempfile::tempdir().unwrap();
    let mut exporter = Exporter::to_directory(out_dir.path());
    let receipt = exporter
        .export(ExportFormat::WordCompatible, "classic", &profile)
        .unwrap();

    assert_eq!(receipt.filename, "Elena_Vasquez_CV_Classic_Professional.doc");
    assert_eq!(receipt.pages, None);

    // Exactly one artifact, whose bytes are the classic renderer's markup.
    let entries: Vec<_> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), 1);
    let delivered = std::fs::read(entries[0].path()).unwrap();
    let expected = render_markup(&profile, resolve_theme("classic"));
    assert_eq!(delivered, expected.as_bytes());
}

// =====================================================================
// End-to-end: paginated image
// =====================================================================

#[test]
fn pdf_export_delivers_one_valid_artifact_per_theme() {
    init_logs();
    let profile = default_profile();
    for theme in themes() {
        let out_dir = tempfile::tempdir().unwrap();
        let mut exporter = Exporter::to_directory(out_dir.path());
        let receipt = exporter
            .export(ExportFormat::PaginatedImage, theme.id.as_str(), &profile)
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(out_dir.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1, "{:?}: expected one artifact", theme.id);

        let bytes = std::fs::read(entries[0].path()).unwrap();
        assert_valid_pdf(&bytes);
        assert_eq!(bytes.len(), receipt.bytes_written);
        assert!(receipt.pages.unwrap_or(0) >= 1);
    }
}

// =====================================================================
// Scaffold cleanup
// =====================================================================

#[test]
fn failed_rasterization_rejects_and_cleans_the_scaffold() {
    init_logs();
    let scaffold_root = tempfile::tempdir().unwrap();
    let mut exporter = Exporter::new(Box::new(MemorySink::default()))
        .with_rasterizer(Box::new(FailingRasterizer))
        .with_options(ExportOptions {
            scaffold_root: Some(scaffold_root.path().to_path_buf()),
            ..ExportOptions::default()
        });

    let result = exporter.export(
        ExportFormat::PaginatedImage,
        "modern",
        &default_profile(),
    );
    let err = result.expect_err("export must fail with the failing rasterizer");
    assert!(
        err.to_string().contains("synthetic rasterizer failure"),
        "unexpected error: {err}"
    );

    // The per-export scaffold directory is gone.
    let leftovers: Vec<_> = std::fs::read_dir(scaffold_root.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(
        leftovers.is_empty(),
        "scaffold leaked: {:?}",
        leftovers.iter().map(|e| e.path()).collect::<Vec<_>>()
    );
}

#[test]
fn successful_export_also_cleans_the_scaffold() {
    let scaffold_root = tempfile::tempdir().unwrap();
    let mut exporter = Exporter::new(Box::new(MemorySink::default())).with_options(
        ExportOptions {
            scaffold_root: Some(scaffold_root.path().to_path_buf()),
            ..ExportOptions::default()
        },
    );

    exporter
        .export(ExportFormat::PaginatedImage, "classic", &default_profile())
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(scaffold_root.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(leftovers.is_empty());
}

// =====================================================================
// Customisation flows through the pipeline
// =====================================================================

#[test]
fn customized_profile_drives_filename_and_content() {
    use cv_forge::customize;
    use cv_forge::ProfileOverrides;

    let base = default_profile();
    let overrides = ProfileOverrides {
        name: Some("Avery Lindqvist".to_string()),
        projects: Some(vec![]),
        ..Default::default()
    };
    let custom = customize(&base, &overrides);

    let mut exporter = Exporter::new(Box::new(MemorySink::default()));
    let receipt = exporter
        .export(ExportFormat::WordCompatible, "minimal", &custom)
        .unwrap();
    assert_eq!(receipt.filename, "Avery_Lindqvist_CV_Minimal_Clean.doc");

    let markup = render_markup(&custom, resolve_theme("minimal"));
    assert!(markup.contains("Avery Lindqvist"));
    assert!(!markup.contains("Ledgerline"), "cleared projects must vanish");
    // The base profile is untouched.
    assert_eq!(base.name, "Elena Vasquez");
}

// =====================================================================
// Layout sanity over real templates
// =====================================================================

#[test]
fn layout_boxes_stay_within_the_page() {
    let profile = default_profile();
    for theme in themes() {
        let markup = render_markup(&profile, theme);
        let layout = compute_document_layout(&markup, "bounds");
        for page in &layout.pages {
            for lbox in &page.boxes {
                assert!(
                    lbox.x >= -0.5 && lbox.x < layout.page_width_px,
                    "{:?}: box x={} outside page",
                    theme.id,
                    lbox.x
                );
                assert!(lbox.width >= 0.0 && lbox.height >= 0.0, "{:?}", theme.id);
            }
        }
    }
}

#[test]
fn sidebar_theme_lays_out_two_columns() {
    let profile = default_profile();
    let markup = render_markup(&profile, resolve_theme("modern"));
    let layout = compute_document_layout(&markup, "cols");

    // Find the sidebar cell: a 220px-wide box with the theme's dark fill.
    let mut found_sidebar = false;
    visit(&layout.pages[0].boxes, &mut |b| {
        if (b.width - 220.0).abs() < 1.0 && b.background_color.is_some() {
            found_sidebar = true;
        }
    });
    assert!(found_sidebar, "no 220px sidebar cell in the modern layout");
}

fn visit(boxes: &[cv_forge::page::LayoutBox], f: &mut dyn FnMut(&cv_forge::page::LayoutBox)) {
    for b in boxes {
        f(b);
        visit(&b.children, f);
    }
}
