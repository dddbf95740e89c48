mod common;

use common::*;
use mdpad::app::config::Config;
use mdpad::cli::{error, handler};
use mdpad::document::DocumentManager;
use mdpad::export::view::MarkdownView;
use mdpad::export::{MarginsType, PageSize};
use pretty_assertions::assert_eq;

fn long_document(paragraphs: usize) -> String {
    let mut doc = String::from("# Long report\n\n");
    for i in 0..paragraphs {
        doc.push_str(&format!(
            "Paragraph {} carries enough words to wrap across the printable width of the page.\n\n",
            i
        ));
    }
    doc
}

#[test]
fn test_editor_text_exports_as_landscape_a4_pdf() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("notes.pdf");

    let mut manager = create_test_manager([Answer::Save(Some(target.clone()))]);
    manager
        .window_mut()
        .set_text("# Notes\n\nSome *emphasis* and `code`.\n\n- one\n- two\n");
    let view = MarkdownView::new(manager.window().text.clone());

    assert_eq!(manager.export_to_pdf(&view).unwrap(), Some(target.clone()));

    let bytes = std::fs::read(&target).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert_eq!(count_occurrences(&bytes, b"/Type /Page "), 1);
    assert_eq!(count_occurrences(&bytes, b"/MediaBox [0 0 842 595]"), 1);
    // Background fill is on by default
    assert!(count_occurrences(&bytes, b"re f") >= 1);
}

#[test]
fn test_long_document_spans_several_pages() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("long.pdf");

    let mut manager = create_test_manager([Answer::Save(Some(target.clone()))]);
    let view = MarkdownView::new(long_document(120));
    manager.export_to_pdf(&view).unwrap();

    let bytes = std::fs::read(&target).unwrap();
    let pages = count_occurrences(&bytes, b"/Type /Page ");
    assert!(pages > 1, "expected several pages, got {}", pages);
    assert_eq!(
        count_occurrences(&bytes, format!("/Count {}", pages).as_bytes()),
        1
    );
}

#[test]
fn test_config_print_options_reach_the_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("portrait.pdf");

    let mut config = Config::default();
    config.export.landscape = false;
    config.export.page_size = PageSize::Letter;
    config.export.margins_type = MarginsType::Minimum;
    config.export.print_background = false;
    config.dialogs.save_prompt_delay_ms = 0;

    let mut manager = DocumentManager::new(
        MemoryWindow::default(),
        ScriptedDialogs::new([Answer::Save(Some(target.clone()))]),
        config.document_settings(),
    );
    manager.export_to_pdf(&MarkdownView::new("plain text")).unwrap();

    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(count_occurrences(&bytes, b"/MediaBox [0 0 612 792]"), 1);
    assert_eq!(count_occurrences(&bytes, b"re f"), 0);
}

#[test]
fn test_config_colors_and_padding_reach_the_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("styled.pdf");

    let mut config = Config::default();
    config.export.background = "#ff0000".to_string();
    config.export.foreground = "#0000ff".to_string();
    config.export.padding = 0.0;

    let mut manager = DocumentManager::new(
        MemoryWindow::default(),
        ScriptedDialogs::new([Answer::Save(Some(target.clone()))]),
        config.document_settings(),
    );
    manager
        .export_to_pdf(&config.export.markdown_view("colourful"))
        .unwrap();

    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(count_occurrences(&bytes, b"1 0 0 rg\n0 0 842 595 re f"), 1);
    assert_eq!(count_occurrences(&bytes, b"0 0 1 rg\n0 0 1 RG"), 1);
}

#[test]
fn test_cli_export_appends_pdf_extension_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_file(dir.path(), "readme.md", "# Readme\n\ntext\n");
    let output = dir.path().join("handout");

    let code =
        handler::handle_export(&input, Some(output), false, None, &Config::default()).unwrap();

    assert_eq!(code, error::SUCCESS);
    let bytes = std::fs::read(dir.path().join("handout.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    // Exporting never touches the source document
    assert_eq!(std::fs::read_to_string(&input).unwrap(), "# Readme\n\ntext\n");
}

#[test]
fn test_cli_export_page_size_and_orientation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_file(dir.path(), "doc.md", "# Doc\n");
    let output = dir.path().join("doc-a5.pdf");

    let code = handler::handle_export(
        &input,
        Some(output.clone()),
        true,
        Some(PageSize::A5),
        &Config::default(),
    )
    .unwrap();

    assert_eq!(code, error::SUCCESS);
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(count_occurrences(&bytes, b"/MediaBox [0 0 420 595]"), 1);
}
