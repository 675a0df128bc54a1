use std::io::Read;

use books::ContentEntry;
use zip::ZipArchive;

use super::*;

fn options() -> EbookOptions {
    EbookOptions::new(
        "Tides & Stones",
        "Mara <Quill>",
        vec![
            ContentEntry::new("Low Water", "The sea *withdrew*."),
            ContentEntry::new("High Water", "And came back."),
            ContentEntry::new("Slack", "Nothing moved."),
        ],
    )
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

// =============================================================================
// helpers
// =============================================================================

#[test]
fn xml_escape_covers_markup_characters() {
    assert_eq!(xml_escape(r#"a & <b> "c" 'd'"#), "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;");
    assert_eq!(xml_escape("plain"), "plain");
}

#[test]
fn markdown_to_xhtml_renders_emphasis_and_self_closing_breaks() {
    let html = markdown_to_xhtml("Hello *world*\n\n---");
    assert!(html.contains("<p>Hello <em>world</em></p>"));
    assert!(html.contains("<hr />"));
}

#[test]
fn markdown_to_xhtml_escapes_raw_html() {
    let html = markdown_to_xhtml("line one<br>line two");
    assert_eq!(html.trim_end(), "<p>line one&lt;br&gt;line two</p>");
}

#[test]
fn markdown_to_xhtml_escapes_html_blocks() {
    let html = markdown_to_xhtml("<div>\n<img src=x>\n</div>\n\nafter");
    assert!(!html.contains("<div>"));
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img src=x&gt;"));
    assert!(html.contains("<p>after</p>"));
}

#[test]
fn cover_media_type_by_extension() {
    assert_eq!(cover_media_type("/a/b.JPG").unwrap(), ("jpg", "image/jpeg"));
    assert_eq!(cover_media_type("c.png").unwrap(), ("png", "image/png"));
    assert!(matches!(cover_media_type("c.bmp"), Err(EpubError::UnsupportedCover(_))));
    assert!(matches!(cover_media_type("noext"), Err(EpubError::UnsupportedCover(_))));
}

// =============================================================================
// new / plan
// =============================================================================

#[test]
fn new_rejects_invalid_options() {
    let bad = EbookOptions::new("", "A", vec![ContentEntry::new("c", "d")]);
    let result = EpubGenerator::new(bad, "/tmp/never.epub");
    assert!(matches!(result, Err(EpubError::InvalidOptions(EbookOptionsError::MissingTitle))));
}

#[test]
fn plan_spine_follows_content_order() {
    let generator = EpubGenerator::new(options(), "/tmp/x.epub").unwrap();
    let plan = generator.plan().unwrap();
    assert_eq!(plan.spine, ["nav", "chapter_001", "chapter_002", "chapter_003"]);
}

#[test]
fn plan_chapter_files_carry_titles_and_bodies() {
    let generator = EpubGenerator::new(options(), "/tmp/x.epub").unwrap();
    let plan = generator.plan().unwrap();
    let first = plan.files.iter().find(|f| f.id == "chapter_001").unwrap();
    let text = String::from_utf8(first.bytes.clone()).unwrap();
    assert_eq!(first.href, "text/chapter_001.xhtml");
    assert!(text.contains("<h1>Low Water</h1>"));
    assert!(text.contains("<em>withdrew</em>"));
    assert!(text.contains(r#"href="../style.css""#));
}

#[test]
fn plan_chapter_with_raw_html_has_no_unclosed_void_tags() {
    let opts = EbookOptions::new("T", "A", vec![ContentEntry::new("One", "line one<br>line two")]);
    let plan = EpubGenerator::new(opts, "/tmp/x.epub").unwrap().plan().unwrap();
    let chapter = plan.files.iter().find(|f| f.id == "chapter_001").unwrap();
    let text = String::from_utf8(chapter.bytes.clone()).unwrap();
    assert!(!text.contains("<br>"), "chapter body: {text}");
    assert!(text.contains("line one&lt;br&gt;line two"));
}

#[test]
fn plan_omits_chapter_titles_when_disabled() {
    let opts = options().with_option("appendChapterTitles", serde_json::json!(false));
    let plan = EpubGenerator::new(opts, "/tmp/x.epub").unwrap().plan().unwrap();
    let first = plan.files.iter().find(|f| f.id == "chapter_001").unwrap();
    assert!(!String::from_utf8_lossy(&first.bytes).contains("<h1>"));
}

#[test]
fn plan_uses_custom_css_and_toc_title() {
    let opts = options()
        .with_toc_title("Contents")
        .with_option("css", serde_json::json!("p { color: red; }"));
    let plan = EpubGenerator::new(opts, "/tmp/x.epub").unwrap().plan().unwrap();
    let css = plan.files.iter().find(|f| f.id == "css").unwrap();
    assert_eq!(css.bytes, b"p { color: red; }");
    let nav = plan.files.iter().find(|f| f.id == "nav").unwrap();
    assert!(String::from_utf8_lossy(&nav.bytes).contains("<h1>Contents</h1>"));
}

#[test]
fn plan_reports_missing_cover_file() {
    let opts = options().with_cover("/definitely/not/here/cover.png");
    let err = EpubGenerator::new(opts, "/tmp/x.epub").unwrap().plan().unwrap_err();
    assert!(matches!(err, EpubError::Cover { .. }));
}

// =============================================================================
// generate
// =============================================================================

#[tokio::test]
async fn generate_writes_mimetype_first_and_uncompressed() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.epub");
    let artifact = EpubGenerator::new(options(), &out).unwrap().generate().await.unwrap();

    assert_eq!(artifact.path, out);
    assert_eq!(artifact.chapter_count, 3);
    assert!(artifact.size > 0);
    assert!(artifact.identifier.starts_with("urn:uuid:"));

    let mut archive = ZipArchive::new(File::open(&out).unwrap()).unwrap();
    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
    let mut mimetype = String::new();
    first.read_to_string(&mut mimetype).unwrap();
    assert_eq!(mimetype, EPUB_MIME_TYPE);
}

#[tokio::test]
async fn generate_writes_escaped_metadata_and_ordered_spine() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/dir/book.epub");
    EpubGenerator::new(options().with_publisher("Clustica"), &out)
        .unwrap()
        .generate()
        .await
        .unwrap();

    let opf = read_entry(&out, "OEBPS/content.opf");
    assert!(opf.contains("<dc:title>Tides &amp; Stones</dc:title>"));
    assert!(opf.contains("<dc:creator>Mara &lt;Quill&gt;</dc:creator>"));
    assert!(opf.contains("<dc:publisher>Clustica</dc:publisher>"));
    assert!(opf.contains("<dc:language>en</dc:language>"));
    let first = opf.find(r#"idref="chapter_001""#).unwrap();
    let second = opf.find(r#"idref="chapter_002""#).unwrap();
    let third = opf.find(r#"idref="chapter_003""#).unwrap();
    assert!(first < second && second < third);

    let container = read_entry(&out, "META-INF/container.xml");
    assert!(container.contains(r#"full-path="OEBPS/content.opf""#));

    let ncx = read_entry(&out, "OEBPS/toc.ncx");
    assert!(ncx.contains(r#"playOrder="3""#));
    assert!(ncx.contains("<text>Slack</text>"));
}

#[tokio::test]
async fn generate_embeds_cover_image() {
    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("cover.png");
    fs::write(&cover, [0x89, b'P', b'N', b'G']).unwrap();
    let out = dir.path().join("book.epub");
    let opts = options().with_cover(cover.to_string_lossy());
    EpubGenerator::new(opts, &out).unwrap().generate().await.unwrap();

    let opf = read_entry(&out, "OEBPS/content.opf");
    assert!(opf.contains(r#"href="images/cover.png" media-type="image/png" properties="cover-image""#));
    assert!(opf.contains(r#"<itemref idref="cover" linear="no"/>"#));
    let mut archive = ZipArchive::new(File::open(&out).unwrap()).unwrap();
    assert_eq!(archive.by_name("OEBPS/images/cover.png").unwrap().size(), 4);
}

#[tokio::test]
async fn generate_fails_with_explicit_error_for_bad_cover() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.epub");
    let opts = options().with_cover(dir.path().join("cover.tiff").to_string_lossy());
    let err = EpubGenerator::new(opts, &out).unwrap().generate().await.unwrap_err();
    assert!(matches!(err, EpubError::UnsupportedCover(_)));
    assert!(!out.exists());
}
