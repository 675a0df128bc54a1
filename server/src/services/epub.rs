//! EPUB 3 generator.
//!
//! ARCHITECTURE
//! ============
//! `EpubGenerator::new` validates options and fixes the output destination.
//! `generate` plans the package (every file with its bytes and manifest
//! entry), then writes the zip container on a blocking thread and returns an
//! explicit `Result`. Planning is pure apart from reading the cover image, so
//! the layout can be checked without touching a zip.
//!
//! Container layout:
//! - `mimetype` (first entry, stored uncompressed)
//! - `META-INF/container.xml`
//! - `OEBPS/content.opf`, `OEBPS/toc.ncx`, `OEBPS/nav.xhtml`, `OEBPS/style.css`
//! - `OEBPS/cover.xhtml` + `OEBPS/images/cover.<ext>` when a cover is set
//! - `OEBPS/text/chapter_NNN.xhtml`, one per content entry, in order
//!
//! Extra options understood: `css` (string, replaces the default stylesheet)
//! and `appendChapterTitles` (bool, default true). Others are ignored.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use books::{EbookOptions, EbookOptionsError};
use pulldown_cmark::{Event, Options, Parser};
use uuid::Uuid;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

pub const EPUB_MIME_TYPE: &str = "application/epub+zip";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_TOC_TITLE: &str = "Table Of Contents";
const OEBPS: &str = "OEBPS";
const DEFAULT_CSS: &str = "body { font-family: serif; line-height: 1.5; margin: 0 5%; }\n\
h1 { text-align: center; margin: 1.5em 0; }\n\
img { max-width: 100%; }\n\
nav ol { list-style: none; padding: 0; }\n";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

// =============================================================================
// ERRORS / RESULT
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EpubError {
    #[error("invalid e-book options: {0}")]
    InvalidOptions(#[from] EbookOptionsError),
    #[error("unsupported cover image type: {0}")]
    UnsupportedCover(String),
    #[error("cannot read cover {path}: {source}")]
    Cover {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("epub I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("epub zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("epub generation task failed: {0}")]
    Join(String),
}

/// A finished EPUB on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubArtifact {
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    pub chapter_count: usize,
    /// `urn:uuid:` identifier written into the package metadata.
    pub identifier: String,
}

// =============================================================================
// PACKAGE PLAN
// =============================================================================

/// One file inside `OEBPS/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackageFile {
    pub id: String,
    /// Path relative to `OEBPS/`.
    pub href: String,
    pub media_type: &'static str,
    pub properties: Option<&'static str>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub(crate) struct PackagePlan {
    pub files: Vec<PackageFile>,
    /// Manifest ids in reading order.
    pub spine: Vec<String>,
}

struct Chapter {
    id: String,
    href: String,
    title: String,
}

// =============================================================================
// GENERATOR
// =============================================================================

pub struct EpubGenerator {
    options: EbookOptions,
    output: PathBuf,
    identifier: String,
}

impl EpubGenerator {
    /// Bind options to an output path.
    ///
    /// # Errors
    ///
    /// Returns [`EpubError::InvalidOptions`] if the required fields are missing.
    pub fn new(options: EbookOptions, output: impl Into<PathBuf>) -> Result<Self, EpubError> {
        options.validate()?;
        Ok(Self { options, output: output.into(), identifier: format!("urn:uuid:{}", Uuid::new_v4()) })
    }

    /// Write the EPUB and report the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the cover cannot be read, the output cannot be
    /// written, or the blocking task panics.
    pub async fn generate(self) -> Result<EpubArtifact, EpubError> {
        tokio::task::spawn_blocking(move || self.write())
            .await
            .map_err(|e| EpubError::Join(e.to_string()))?
    }

    fn write(&self) -> Result<EpubArtifact, EpubError> {
        let plan = self.plan()?;
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut zip = ZipWriter::new(File::create(&self.output)?);
        let stored = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        let deflated = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file("mimetype", stored)?;
        zip.write_all(EPUB_MIME_TYPE.as_bytes())?;
        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;
        zip.start_file(format!("{OEBPS}/content.opf"), deflated)?;
        zip.write_all(self.content_opf(&plan).as_bytes())?;
        for file in &plan.files {
            zip.start_file(format!("{OEBPS}/{}", file.href), deflated)?;
            zip.write_all(&file.bytes)?;
        }
        zip.finish()?;

        let size = fs::metadata(&self.output)?.len();
        let chapter_count = self.options.content.len();
        tracing::info!(path = %self.output.display(), size, chapter_count, "epub written");
        Ok(EpubArtifact { path: self.output.clone(), size, chapter_count, identifier: self.identifier.clone() })
    }

    fn lang(&self) -> &str {
        self.options
            .lang
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_LANG)
    }

    fn toc_title(&self) -> &str {
        self.options
            .toc_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TOC_TITLE)
    }

    /// Every `OEBPS/` file except `content.opf`, plus the spine.
    pub(crate) fn plan(&self) -> Result<PackagePlan, EpubError> {
        let chapters: Vec<Chapter> = self
            .options
            .content
            .iter()
            .enumerate()
            .map(|(i, entry)| Chapter {
                id: format!("chapter_{:03}", i + 1),
                href: format!("text/chapter_{:03}.xhtml", i + 1),
                title: entry.title.clone(),
            })
            .collect();

        let mut files = Vec::with_capacity(chapters.len() + 6);
        let mut spine = Vec::with_capacity(chapters.len() + 2);

        let css = self
            .options
            .extra_str("css")
            .unwrap_or(DEFAULT_CSS)
            .to_owned();
        files.push(PackageFile {
            id: "css".to_owned(),
            href: "style.css".to_owned(),
            media_type: "text/css",
            properties: None,
            bytes: css.into_bytes(),
        });

        if let Some(cover) = self.options.cover.as_deref() {
            let (ext, media_type) = cover_media_type(cover)?;
            let bytes =
                fs::read(cover).map_err(|source| EpubError::Cover { path: cover.to_owned(), source })?;
            let image_href = format!("images/cover.{ext}");
            files.push(PackageFile {
                id: "cover".to_owned(),
                href: "cover.xhtml".to_owned(),
                media_type: "application/xhtml+xml",
                properties: None,
                bytes: self.cover_xhtml(&image_href).into_bytes(),
            });
            files.push(PackageFile {
                id: "cover-image".to_owned(),
                href: image_href,
                media_type,
                properties: Some("cover-image"),
                bytes,
            });
            spine.push("cover".to_owned());
        }

        files.push(PackageFile {
            id: "nav".to_owned(),
            href: "nav.xhtml".to_owned(),
            media_type: "application/xhtml+xml",
            properties: Some("nav"),
            bytes: self.nav_xhtml(&chapters).into_bytes(),
        });
        spine.push("nav".to_owned());

        files.push(PackageFile {
            id: "ncx".to_owned(),
            href: "toc.ncx".to_owned(),
            media_type: "application/x-dtbncx+xml",
            properties: None,
            bytes: self.toc_ncx(&chapters).into_bytes(),
        });

        let append_titles = self.options.extra_bool("appendChapterTitles").unwrap_or(true);
        for (chapter, entry) in chapters.iter().zip(&self.options.content) {
            let body = markdown_to_xhtml(&entry.data);
            files.push(PackageFile {
                id: chapter.id.clone(),
                href: chapter.href.clone(),
                media_type: "application/xhtml+xml",
                properties: None,
                bytes: self
                    .chapter_xhtml(&chapter.title, &body, append_titles)
                    .into_bytes(),
            });
            spine.push(chapter.id.clone());
        }

        Ok(PackagePlan { files, spine })
    }

    fn content_opf(&self, plan: &PackagePlan) -> String {
        let lang = xml_escape(self.lang());
        let mut opf = String::new();
        let _ = writeln!(opf, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            opf,
            r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId" xml:lang="{lang}">"#
        );
        let _ = writeln!(opf, r#"  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">"#);
        let _ = writeln!(opf, r#"    <dc:identifier id="BookId">{}</dc:identifier>"#, self.identifier);
        let _ = writeln!(opf, "    <dc:title>{}</dc:title>", xml_escape(&self.options.title));
        let _ = writeln!(opf, "    <dc:creator>{}</dc:creator>", xml_escape(&self.options.author));
        let _ = writeln!(opf, "    <dc:language>{lang}</dc:language>");
        if let Some(publisher) = &self.options.publisher {
            let _ = writeln!(opf, "    <dc:publisher>{}</dc:publisher>", xml_escape(publisher));
        }
        let _ = writeln!(opf, r#"    <meta property="dcterms:modified">{}</meta>"#, modified_timestamp());
        if plan.files.iter().any(|f| f.id == "cover-image") {
            let _ = writeln!(opf, r#"    <meta name="cover" content="cover-image"/>"#);
        }
        let _ = writeln!(opf, "  </metadata>");

        let _ = writeln!(opf, "  <manifest>");
        for file in &plan.files {
            let properties = file
                .properties
                .map(|p| format!(r#" properties="{p}""#))
                .unwrap_or_default();
            let _ = writeln!(
                opf,
                r#"    <item id="{}" href="{}" media-type="{}"{properties}/>"#,
                file.id, file.href, file.media_type
            );
        }
        let _ = writeln!(opf, "  </manifest>");

        let _ = writeln!(opf, r#"  <spine toc="ncx">"#);
        for idref in &plan.spine {
            let linear = if idref == "cover" { r#" linear="no""# } else { "" };
            let _ = writeln!(opf, r#"    <itemref idref="{idref}"{linear}/>"#);
        }
        let _ = writeln!(opf, "  </spine>");
        let _ = writeln!(opf, "</package>");
        opf
    }

    fn xhtml_document(&self, title: &str, stylesheet: &str, body: &str) -> String {
        let lang = xml_escape(self.lang());
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <meta charset="UTF-8"/>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{stylesheet}"/>
</head>
<body>
{body}
</body>
</html>
"#,
            title = xml_escape(title),
        )
    }

    fn chapter_xhtml(&self, title: &str, body: &str, append_title: bool) -> String {
        let mut content = String::new();
        if append_title {
            let _ = writeln!(content, "<h1>{}</h1>", xml_escape(title));
        }
        content.push_str(body);
        self.xhtml_document(title, "../style.css", &content)
    }

    fn cover_xhtml(&self, image_href: &str) -> String {
        let body = format!(
            r#"<section epub:type="cover"><img src="{image_href}" alt="{}"/></section>"#,
            xml_escape(&self.options.title)
        );
        self.xhtml_document(&self.options.title, "style.css", &body)
    }

    fn nav_xhtml(&self, chapters: &[Chapter]) -> String {
        let toc_title = xml_escape(self.toc_title());
        let mut body = String::new();
        let _ = writeln!(body, r#"<nav epub:type="toc" id="toc">"#);
        let _ = writeln!(body, "  <h1>{toc_title}</h1>");
        let _ = writeln!(body, "  <ol>");
        for chapter in chapters {
            let _ = writeln!(body, r#"    <li><a href="{}">{}</a></li>"#, chapter.href, xml_escape(&chapter.title));
        }
        let _ = writeln!(body, "  </ol>");
        let _ = write!(body, "</nav>");
        self.xhtml_document(self.toc_title(), "style.css", &body)
    }

    fn toc_ncx(&self, chapters: &[Chapter]) -> String {
        let mut ncx = String::new();
        let _ = writeln!(ncx, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(ncx, r#"<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">"#);
        let _ = writeln!(ncx, "  <head>");
        let _ = writeln!(ncx, r#"    <meta name="dtb:uid" content="{}"/>"#, self.identifier);
        let _ = writeln!(ncx, r#"    <meta name="dtb:depth" content="1"/>"#);
        let _ = writeln!(ncx, r#"    <meta name="dtb:totalPageCount" content="0"/>"#);
        let _ = writeln!(ncx, r#"    <meta name="dtb:maxPageNumber" content="0"/>"#);
        let _ = writeln!(ncx, "  </head>");
        let _ = writeln!(ncx, "  <docTitle><text>{}</text></docTitle>", xml_escape(&self.options.title));
        let _ = writeln!(ncx, "  <docAuthor><text>{}</text></docAuthor>", xml_escape(&self.options.author));
        let _ = writeln!(ncx, "  <navMap>");
        for (i, chapter) in chapters.iter().enumerate() {
            let order = i + 1;
            let _ = writeln!(
                ncx,
                r#"    <navPoint id="navpoint-{order}" playOrder="{order}"><navLabel><text>{}</text></navLabel><content src="{}"/></navPoint>"#,
                xml_escape(&chapter.title),
                chapter.href
            );
        }
        let _ = writeln!(ncx, "  </navMap>");
        let _ = writeln!(ncx, "</ncx>");
        ncx
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Escape text for XML element content and attribute values.
pub(crate) fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a chapter body from Markdown. Raw HTML is emitted as escaped text,
/// since it need not be well-formed XML.
pub(crate) fn markdown_to_xhtml(data: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(data, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html = String::with_capacity(data.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// File extension and media type for a cover image path.
pub(crate) fn cover_media_type(path: &str) -> Result<(&'static str, &'static str), EpubError> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(("jpg", "image/jpeg")),
        "png" => Ok(("png", "image/png")),
        "gif" => Ok(("gif", "image/gif")),
        "webp" => Ok(("webp", "image/webp")),
        "svg" => Ok(("svg", "image/svg+xml")),
        _ => Err(EpubError::UnsupportedCover(path.to_owned())),
    }
}

fn modified_timestamp() -> String {
    let now = time::OffsetDateTime::now_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

#[cfg(test)]
#[path = "epub_test.rs"]
mod tests;
