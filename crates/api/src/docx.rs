//! Minimal DOCX reading and writing.
//!
//! Reading pulls plain text out of `word/document.xml`, one line per
//! paragraph. Writing produces the smallest package Word opens cleanly:
//! content types, package rels, document rels, a styles part with
//! Heading1-3, and the document itself.

use std::io::{Cursor, Read, Write};
use std::sync::LazyLock;

use mediaforge_core::markdown::{Paragraph, Run};
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// MIME type of a DOCX file.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCUMENT_PART: &str = "word/document.xml";

/// Self-closing paragraphs (`<w:p/>`, `<w:p w14:paraId=".."/>`).
static EMPTY_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:p\b[^>]*/>").expect("valid regex"));

/// Text runs, run-level tabs, and line breaks inside a paragraph.
static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>(?P<text>[^<]*)</w:t>|(?P<tab><w:tab\s*/>)|(?P<br><w:(?:br|cr)\b[^>]*/>)")
        .expect("valid regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#x(?P<hex>[0-9a-fA-F]+)|#(?P<dec>[0-9]+)|(?P<name>lt|gt|amp|quot|apos));")
        .expect("valid regex")
});

#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("Not a valid DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive has no {DOCUMENT_PART}")]
    MissingDocument,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Extract plain text from DOCX bytes, one line per paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut entry) => {
            entry.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(DocxError::MissingDocument),
        Err(e) => return Err(e.into()),
    }
    Ok(document_text(&xml))
}

fn document_text(xml: &str) -> String {
    let xml = EMPTY_PARAGRAPH_RE.replace_all(xml, "</w:p>");
    let mut parts: Vec<&str> = xml.split("</w:p>").collect();
    // Whatever follows the last paragraph (sectPr, closing tags) has no text.
    parts.pop();

    let lines: Vec<String> = parts.into_iter().map(paragraph_text).collect();
    lines.join("\n").trim_end().to_string()
}

fn paragraph_text(fragment: &str) -> String {
    let mut line = String::new();
    for caps in CONTENT_RE.captures_iter(fragment) {
        if let Some(text) = caps.name("text") {
            line.push_str(&decode_entities(text.as_str()));
        } else if caps.name("tab").is_some() {
            line.push('\t');
        } else if caps.name("br").is_some() {
            line.push('\n');
        }
    }
    line
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let code = if let Some(hex) = caps.name("hex") {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.name("dec") {
                dec.as_str().parse::<u32>().ok()
            } else {
                None
            };
            if let Some(c) = code.and_then(char::from_u32) {
                return c.to_string();
            }
            match caps.name("name").map(|m| m.as_str()) {
                Some("lt") => "<".to_string(),
                Some("gt") => ">".to_string(),
                Some("amp") => "&".to_string(),
                Some("quot") => "\"".to_string(),
                Some("apos") => "'".to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:before="200" w:after="100"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="30"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:before="160" w:after="80"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style></w:styles>"#;

/// Render parsed markdown paragraphs as a DOCX file.
pub fn render_markdown(paragraphs: &[Paragraph]) -> Result<Vec<u8>, DocxError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let document = document_xml(paragraphs);
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/styles.xml", STYLES_XML),
        (DOCUMENT_PART, &document),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn document_xml(paragraphs: &[Paragraph]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str("<w:p>");
        if let Some(style) = paragraph.kind.style_id() {
            body.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#));
        }
        for run in &paragraph.runs {
            body.push_str(&run_xml(run));
        }
        body.push_str("</w:p>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

fn run_xml(run: &Run) -> String {
    let mut props = String::new();
    if run.code {
        props.push_str(r#"<w:rFonts w:ascii="Courier New" w:hAnsi="Courier New"/>"#);
    }
    if run.bold {
        props.push_str("<w:b/>");
    }
    if run.italic {
        props.push_str("<w:i/>");
    }
    let props = if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(
        r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape_xml(&run.text)
    )
}

/// Escape markup and drop characters XML 1.0 cannot carry at all.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mediaforge_core::markdown::parse_markdown;

    use super::*;

    /// Package a raw document.xml body into DOCX bytes.
    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="x"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default()).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_paragraphs_tabs_and_entities() {
        let bytes = docx_with_body(concat!(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>Scene&#160;1</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Tom &amp; Jerry</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t>a &lt;b&gt;</w:t><w:br/><w:t>next</w:t></w:r></w:p>"#,
        ));

        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Scene\u{a0}1\tTom & Jerry\n\na <b>\nnext");
    }

    #[test]
    fn rendered_markdown_reads_back_as_text() {
        let paragraphs = parse_markdown("# Title\n\nSome **bold** and `code` & more");
        let bytes = render_markdown(&paragraphs).unwrap();

        assert_eq!(extract_text(&bytes).unwrap(), "Title\nSome bold and code & more");

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART).unwrap().read_to_string(&mut xml).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(archive.by_name("word/styles.xml").is_ok());
    }

    #[test]
    fn control_characters_are_dropped_from_rendered_xml() {
        assert_eq!(escape_xml("a\u{0}b\u{1b}c\u{ffff}"), "abc");
        assert_eq!(escape_xml("tab\there\r\n"), "tab\there\r\n");

        let paragraphs = parse_markdown("Scene\u{7} one\u{c}");
        let bytes = render_markdown(&paragraphs).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART).unwrap().read_to_string(&mut xml).unwrap();
        assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(xml.contains("Scene one"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(extract_text(b"not a zip"), Err(DocxError::Zip(_)));
    }

    #[test]
    fn archive_without_document_is_rejected() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"hi").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert_matches!(extract_text(&bytes), Err(DocxError::MissingDocument));
    }
}
