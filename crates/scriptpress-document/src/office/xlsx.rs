// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XLSX writer — the whole input in cell A1 of a single sheet.

use std::path::Path;

use scriptpress_core::error::Result;
use tracing::{info, instrument, warn};

use super::package::{XML_DECLARATION, build_package, xml_text};

/// Spreadsheet applications refuse cells longer than this many characters.
pub const MAX_CELL_CHARS: usize = 32_767;

const CONTENT_TYPES: &str = concat!(
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

const WORKBOOK_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"</Relationships>"#
);

/// Writes single-cell workbooks.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sheet_name(&mut self, name: impl Into<String>) {
        self.sheet_name = name.into();
    }

    /// Build an `.xlsx` package with `text` as an inline string in A1.
    ///
    /// Text beyond [`MAX_CELL_CHARS`] characters is cut off.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn create_from_text(&self, text: &str) -> Result<Vec<u8>> {
        let cell = truncate_to_cell(text);

        let workbook = format!(
            concat!(
                "{decl}",
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="{name}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
            ),
            decl = XML_DECLARATION,
            name = xml_text(&self.sheet_name),
        );

        let sheet = format!(
            concat!(
                "{decl}",
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
                r#"<sheetData><row r="1"><c r="A1" t="inlineStr"><is><t xml:space="preserve">{text}</t></is></c></row></sheetData>"#,
                "</worksheet>"
            ),
            decl = XML_DECLARATION,
            text = xml_text(cell),
        );

        build_package(&[
            ("[Content_Types].xml", format!("{XML_DECLARATION}{CONTENT_TYPES}")),
            ("_rels/.rels", format!("{XML_DECLARATION}{ROOT_RELS}")),
            ("xl/workbook.xml", workbook),
            ("xl/_rels/workbook.xml.rels", format!("{XML_DECLARATION}{WORKBOOK_RELS}")),
            ("xl/worksheets/sheet1.xml", sheet),
        ])
    }

    /// Build the workbook and write it to `path`.
    pub fn write_text_to_file(&self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_from_text(text)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote XLSX to {}", path.as_ref().display());
        Ok(())
    }
}

fn truncate_to_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                chars = text.chars().count(),
                limit = MAX_CELL_CHARS,
                "text exceeds the spreadsheet cell limit, truncating"
            );
            &text[..cut]
        }
        None => text,
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
    fn text_lands_in_a1_of_sheet1() {
        let bytes = XlsxWriter::new().create_from_text("Привет, мир").unwrap();
        let sheet = part(bytes.clone(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="A1" t="inlineStr">"#));
        assert!(sheet.contains("Привет, мир"));

        let workbook = part(bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#));
    }

    #[test]
    fn custom_sheet_name_is_escaped() {
        let mut writer = XlsxWriter::new();
        writer.set_sheet_name("Q&A");
        let workbook = part(writer.create_from_text("x").unwrap(), "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Q&amp;A""#));
    }

    #[test]
    fn oversized_text_is_truncated() {
        let text = "я".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(truncate_to_cell(&text).chars().count(), MAX_CELL_CHARS);
        assert_eq!(truncate_to_cell("short"), "short");
    }

    #[test]
    fn empty_text_still_makes_a_workbook() {
        let sheet = part(XlsxWriter::new().create_from_text("").unwrap(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<t xml:space="preserve"></t>"#));
    }
}
