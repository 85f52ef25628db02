mod common;

use common::{body_texts, cell_texts, document_xml, package, para, part_text, simple_docx};
use gongwen::fix_punctuation_bytes;

#[test]
fn fixes_straight_quotes_and_period() {
    let input = simple_docx(&["他说\"hello\"，这很好."]);
    let (out, summary) = fix_punctuation_bytes(&input).unwrap();
    assert_eq!(body_texts(&out), vec!["他说“hello”，这很好。"]);
    assert_eq!(summary.paragraphs, 1);
    assert_eq!(summary.table_cells, 0);
}

#[test]
fn already_correct_text_survives_byte_for_byte() {
    let input = simple_docx(&["他说“hello”，这很好。", "A clean English sentence."]);
    let original_doc = part_text(&input, "word/document.xml");
    let (out, summary) = fix_punctuation_bytes(&input).unwrap();
    assert_eq!(part_text(&out, "word/document.xml"), original_doc);
    assert_eq!(summary.total(), 0);
}

#[test]
fn idempotent_over_the_package() {
    let input = simple_docx(&[
        "他说:这很好,对吧?",
        "标题(草案)...",
        "引用\"第一条\"与'其他'内容--完",
    ]);
    let (once, _) = fix_punctuation_bytes(&input).unwrap();
    let (twice, summary) = fix_punctuation_bytes(&once).unwrap();
    assert_eq!(
        part_text(&once, "word/document.xml"),
        part_text(&twice, "word/document.xml")
    );
    assert_eq!(summary.total(), 0);
}

#[test]
fn paired_marks_stay_balanced() {
    let input = simple_docx(&["他说\"你好\"然后又说\"再见\"结束"]);
    let (out, _) = fix_punctuation_bytes(&input).unwrap();
    let text = body_texts(&out).concat();
    assert_eq!(text.matches('“').count(), 2);
    assert_eq!(text.matches('”').count(), 2);
    assert_eq!(text.matches('"').count(), 0);
}

#[test]
fn run_boundaries_survive() {
    // the quoted word is split across three runs
    let body = "<w:p>\
        <w:r><w:t>他说\"he</w:t></w:r>\
        <w:r><w:rPr><w:b/></w:rPr><w:t>ll</w:t></w:r>\
        <w:r><w:t>o\"了</w:t></w:r>\
        </w:p>";
    let input = package(&[("word/document.xml", &document_xml(body))]);
    let (out, _) = fix_punctuation_bytes(&input).unwrap();

    assert_eq!(body_texts(&out), vec!["他说“hello”了"]);
    // still three runs, the bold middle untouched
    let doc = part_text(&out, "word/document.xml");
    assert_eq!(doc.matches("<w:r>").count(), 3);
    assert!(doc.contains("<w:b/>"));
    assert!(doc.contains(">ll<"));
}

#[test]
fn table_cells_are_fixed_like_body_text() {
    let body = format!(
        "{}<w:tbl><w:tr><w:tc><w:p><w:r><w:t>单元格内容:测试</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        para("正文内容:测试")
    );
    let input = package(&[("word/document.xml", &document_xml(&body))]);
    let (out, summary) = fix_punctuation_bytes(&input).unwrap();

    assert_eq!(body_texts(&out), vec!["正文内容：测试"]);
    assert_eq!(cell_texts(&out), vec!["单元格内容：测试"]);
    assert_eq!(summary.paragraphs, 1);
    assert_eq!(summary.table_cells, 1);
}

#[test]
fn non_text_structure_is_preserved() {
    let body = format!(
        "{}<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/></w:tblPr>\
         <w:tr><w:tc><w:p><w:r><w:t>表格</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
         <w:p><w:bookmarkStart w:id=\"0\" w:name=\"mark\"/><w:r><w:t>带书签:的段落</w:t></w:r><w:bookmarkEnd w:id=\"0\"/></w:p>",
        para("前言:内容")
    );
    let input = package(&[("word/document.xml", &document_xml(&body))]);
    let (out, _) = fix_punctuation_bytes(&input).unwrap();

    let doc = part_text(&out, "word/document.xml");
    assert!(doc.contains("<w:tblStyle w:val=\"TableGrid\"/>"));
    assert!(doc.contains("<w:bookmarkStart w:id=\"0\" w:name=\"mark\"/>"));
    assert!(doc.contains("带书签：的段落"));
}

#[test]
fn input_bytes_are_never_mutated() {
    let input = simple_docx(&["标点有问题:这里"]);
    let snapshot = input.clone();
    let _ = fix_punctuation_bytes(&input).unwrap();
    assert_eq!(input, snapshot);
}
