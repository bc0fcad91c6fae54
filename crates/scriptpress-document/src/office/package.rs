// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OPC packaging shared by the DOCX and XLSX writers: a deflated zip of XML
// parts.

use std::io::{Cursor, Write};

use scriptpress_core::error::{Result, ScriptpressError};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Zip `parts` (part name, XML body) into one package, in order.
pub(crate) fn build_package(parts: &[(&str, String)]) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, body) in parts {
        writer
            .start_file(*name, options)
            .map_err(|e| ScriptpressError::Archive(format!("cannot start part {name}: {e}")))?;
        writer.write_all(body.as_bytes())?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ScriptpressError::Archive(format!("cannot finish package: {e}")))?;
    Ok(cursor.into_inner())
}

/// Escape text for an XML text node, dropping characters XML 1.0 forbids.
pub(crate) fn xml_text(text: &str) -> String {
    let allowed: String = text
        .chars()
        .filter(|ch| {
            matches!(ch, '\t' | '\n' | '\r')
                || (*ch >= '\u{20}' && *ch != '\u{FFFE}' && *ch != '\u{FFFF}')
        })
        .collect();
    quick_xml::escape::escape(allowed.as_str()).into_owned()
}
