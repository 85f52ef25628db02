#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Wrap body XML into a minimal word/document.xml with one section.
pub fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{WML_NS}\"><w:body>{body}\
         <w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1800\" w:bottom=\"1440\" w:left=\"1800\" w:header=\"851\" w:footer=\"992\" w:gutter=\"0\"/>\
         </w:sectPr></w:body></w:document>"
    )
}

/// One plain paragraph with a single run.
pub fn para(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
}

/// Assemble a package from named parts. [Content_Types].xml and the root
/// relationships are always included.
pub fn package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    writer.start_file("_rels/.rels", options).unwrap();
    writer.write_all(ROOT_RELS.as_bytes()).unwrap();
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A document whose body is the given paragraphs, one run each.
pub fn simple_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs.iter().map(|t| para(t)).collect();
    package(&[("word/document.xml", &document_xml(&body))])
}

/// Raw text of one part of a produced package.
pub fn part_text(bytes: &[u8], name: &str) -> String {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

pub fn part_names(bytes: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    zip.file_names().map(|s| s.to_string()).collect()
}

/// Concatenated run text of each body paragraph (table cells excluded), in
/// document order.
pub fn body_texts(bytes: &[u8]) -> Vec<String> {
    let src = part_text(bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&src).unwrap();
    let mut texts = Vec::new();
    for node in xml.descendants() {
        if node.tag_name().name() != "p" || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        if node.ancestors().any(|a| a.tag_name().name() == "tc") {
            continue;
        }
        let text: String = node
            .descendants()
            .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
            .filter_map(|n| n.text())
            .collect();
        texts.push(text);
    }
    texts
}

/// All w:t texts of every table-cell paragraph.
pub fn cell_texts(bytes: &[u8]) -> Vec<String> {
    let src = part_text(bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&src).unwrap();
    let mut texts = Vec::new();
    for node in xml.descendants() {
        if node.tag_name().name() != "p" || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        if !node.ancestors().any(|a| a.tag_name().name() == "tc") {
            continue;
        }
        let text: String = node
            .descendants()
            .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
            .filter_map(|n| n.text())
            .collect();
        texts.push(text);
    }
    texts
}
