// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — the whole input as one WordprocessingML paragraph.

use std::path::Path;

use scriptpress_core::error::Result;
use tracing::{info, instrument};

use super::package::{XML_DECLARATION, build_package, xml_text};

const CONTENT_TYPES: &str = concat!(
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

/// Writes minimal Word documents.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    right_to_left: bool,
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the paragraph and its run as right-to-left.
    pub fn right_to_left(mut self, rtl: bool) -> Self {
        self.right_to_left = rtl;
        self
    }

    /// Build a `.docx` package holding `text` as a single paragraph.
    ///
    /// Hard line breaks in the input become `<w:br/>` inside the paragraph.
    #[instrument(skip(self, text), fields(text_len = text.len(), rtl = self.right_to_left))]
    pub fn create_from_text(&self, text: &str) -> Result<Vec<u8>> {
        let document = self.document_xml(text);
        build_package(&[
            ("[Content_Types].xml", format!("{XML_DECLARATION}{CONTENT_TYPES}")),
            ("_rels/.rels", format!("{XML_DECLARATION}{ROOT_RELS}")),
            ("word/document.xml", document),
        ])
    }

    /// Build the package and write it to `path`.
    pub fn write_text_to_file(&self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_from_text(text)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote DOCX to {}", path.as_ref().display());
        Ok(())
    }

    fn document_xml(&self, text: &str) -> String {
        let (paragraph_props, run_props) = if self.right_to_left {
            ("<w:pPr><w:bidi/><w:jc w:val=\"right\"/></w:pPr>", "<w:rPr><w:rtl/></w:rPr>")
        } else {
            ("", "")
        };

        let mut run = String::new();
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                run.push_str("<w:br/>");
            }
            let line = line.trim_end_matches('\r');
            run.push_str(r#"<w:t xml:space="preserve">"#);
            run.push_str(&xml_text(line));
            run.push_str("</w:t>");
        }

        format!(
            concat!(
                "{decl}",
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body><w:p>{ppr}<w:r>{rpr}{run}</w:r></w:p><w:sectPr/></w:body></w:document>"
            ),
            decl = XML_DECLARATION,
            ppr = paragraph_props,
            rpr = run_props,
            run = run,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn part(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut body = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut body).unwrap();
        body
    }

    #[test]
    fn package_has_the_three_required_parts() {
        let bytes = DocxWriter::new().create_from_text("hello").unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);
    }

    #[test]
    fn text_is_escaped_into_one_paragraph() {
        let bytes = DocxWriter::new().create_from_text("Tom & Jerry <3").unwrap();
        let document = part(bytes, "word/document.xml");
        assert!(document.contains("Tom &amp; Jerry &lt;3"));
        assert_eq!(document.matches("<w:p>").count(), 1);
        assert!(!document.contains("<w:bidi/>"));
    }

    #[test]
    fn line_breaks_become_w_br() {
        let bytes = DocxWriter::new().create_from_text("first\r\nsecond").unwrap();
        let document = part(bytes, "word/document.xml");
        assert!(document.contains(
            r#"<w:t xml:space="preserve">first</w:t><w:br/><w:t xml:space="preserve">second</w:t>"#
        ));
    }

    #[test]
    fn rtl_documents_are_flagged() {
        let bytes = DocxWriter::new()
            .right_to_left(true)
            .create_from_text("שלום")
            .unwrap();
        let document = part(bytes, "word/document.xml");
        assert!(document.contains("<w:bidi/>"));
        assert!(document.contains("<w:rtl/>"));
        assert!(document.contains("שלום"));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.docx");
        DocxWriter::new().write_text_to_file("hi", &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
