mod common;

use common::{WML_NS, body_texts, document_xml, package, para, part_text, simple_docx};
use gongwen::{Preset, apply_preset_bytes, unify_spacing_bytes};

fn official() -> &'static Preset {
    Preset::by_name("official").unwrap()
}

fn academic() -> &'static Preset {
    Preset::by_name("academic").unwrap()
}

/// (eastAsia font, size half-points, bold) of the first run of each paragraph.
fn run_styles(bytes: &[u8]) -> Vec<(String, String, bool)> {
    let src = part_text(bytes, "word/document.xml");
    let xml = roxmltree::Document::parse(&src).unwrap();
    let mut out = Vec::new();
    for p in xml
        .descendants()
        .filter(|n| n.tag_name().name() == "p" && n.tag_name().namespace() == Some(WML_NS))
    {
        let Some(rpr) = p
            .descendants()
            .find(|n| n.tag_name().name() == "rPr" && n.tag_name().namespace() == Some(WML_NS))
        else {
            continue;
        };
        let find = |name: &str| {
            rpr.children()
                .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
        };
        let east_asia = find("rFonts")
            .and_then(|n| n.attribute((WML_NS, "eastAsia")))
            .unwrap_or_default()
            .to_string();
        let size = find("sz")
            .and_then(|n| n.attribute((WML_NS, "val")))
            .unwrap_or_default()
            .to_string();
        let bold = find("b")
            .map(|n| n.attribute((WML_NS, "val")).is_none_or(|v| v != "0"))
            .unwrap_or(false);
        out.push((east_asia, size, bold));
    }
    out
}

#[test]
fn academic_preset_restyles_title_and_body() {
    // a 12pt Arial title and a plain body paragraph
    let body = format!(
        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
         <w:r><w:rPr><w:rFonts w:ascii=\"Arial\"/><w:sz w:val=\"24\"/></w:rPr>\
         <w:t>年度研究报告</w:t></w:r></w:p>{}",
        para("这是报告的正文内容需要足够长一点。")
    );
    let input = package(&[("word/document.xml", &document_xml(&body))]);
    let (out, stats) = apply_preset_bytes(&input, academic()).unwrap();

    assert_eq!(stats.title, 1);
    assert_eq!(stats.body, 1);

    let styles = run_styles(&out);
    // title: 黑体 18pt bold
    assert_eq!(styles[0], ("黑体".to_string(), "36".to_string(), true));
    // body: 宋体 12pt
    assert_eq!(styles[1], ("宋体".to_string(), "24".to_string(), false));

    let doc = part_text(&out, "word/document.xml");
    // body line spacing 1.5x
    assert!(doc.contains("w:line=\"360\" w:lineRule=\"auto\""));
    // margins 2.5cm all around = 1417 twips
    assert_eq!(doc.matches("\"1417\"").count(), 4);
}

#[test]
fn official_preset_margins_and_heading_fonts() {
    let input = simple_docx(&[
        "关于开展年度工作检查的通知",
        "一、总体要求",
        "（一）基本原则",
        "这是一段足够长的正文内容用来检查格式。",
    ]);
    let (out, stats) = apply_preset_bytes(&input, official()).unwrap();

    assert_eq!(stats.title, 1);
    assert_eq!(stats.heading1, 1);
    assert_eq!(stats.heading2, 1);
    assert_eq!(stats.body, 1);

    let styles = run_styles(&out);
    assert_eq!(styles[0].0, "方正小标宋简体");
    assert_eq!(styles[0].1, "44"); // 22pt
    assert_eq!(styles[1].0, "黑体");
    assert_eq!(styles[2].0, "楷体_GB2312");
    assert_eq!(styles[3].0, "仿宋_GB2312");

    let doc = part_text(&out, "word/document.xml");
    assert!(doc.contains("w:top=\"2098\"")); // 3.7cm
    assert!(doc.contains("w:line=\"560\" w:lineRule=\"exact\"")); // 28pt
    assert!(doc.contains("w:firstLine=\"640\"")); // 2 chars of 三号
}

#[test]
fn preset_is_deterministic() {
    let input = simple_docx(&["一、要求", "足够长的正文内容段落在这里写上一句。"]);
    let (a, _) = apply_preset_bytes(&input, official()).unwrap();
    let (b, _) = apply_preset_bytes(&input, official()).unwrap();
    assert_eq!(
        part_text(&a, "word/document.xml"),
        part_text(&b, "word/document.xml")
    );
}

#[test]
fn text_and_structure_survive_formatting() {
    let texts = [
        "关于某项工作的通知",
        "一、第一部分",
        "正文段落的内容保持原样不动。",
    ];
    let input = simple_docx(&texts);
    let (out, _) = apply_preset_bytes(&input, official()).unwrap();
    assert_eq!(body_texts(&out), texts);
    // non-document parts are carried over untouched
    assert_eq!(
        part_text(&out, "[Content_Types].xml"),
        part_text(&input, "[Content_Types].xml")
    );
}

#[test]
fn existing_footer_gets_page_field() {
    let footer = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:ftr xmlns:w=\"{WML_NS}\"><w:p><w:r><w:t>第页</w:t></w:r></w:p></w:ftr>"
    );
    let input = package(&[
        ("word/document.xml", &document_xml(&para("正文"))),
        ("word/footer1.xml", &footer),
    ]);
    let (out, _) = apply_preset_bytes(&input, official()).unwrap();
    let out_footer = part_text(&out, "word/footer1.xml");
    assert!(out_footer.contains("fldCharType=\"begin\""));
    assert!(out_footer.contains(" PAGE "));
    assert!(!out_footer.contains("第页"));
}

#[test]
fn no_footer_part_means_none_is_invented() {
    let input = simple_docx(&["正文"]);
    let (out, _) = apply_preset_bytes(&input, official()).unwrap();
    assert!(
        common::part_names(&out)
            .iter()
            .all(|n| !n.starts_with("word/footer"))
    );
}

#[test]
fn background_shading_is_removed() {
    let src = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{WML_NS}\">\
         <w:background w:color=\"C0C0C0\"/>\
         <w:body><w:p><w:pPr><w:shd w:val=\"clear\" w:fill=\"FFFF00\"/></w:pPr>\
         <w:r><w:t>这是一段足够长的正文内容了啊。</w:t></w:r></w:p>\
         <w:sectPr><w:pgMar w:top=\"1440\" w:right=\"1800\" w:bottom=\"1440\" w:left=\"1800\"/></w:sectPr>\
         </w:body></w:document>"
    );
    let input = package(&[("word/document.xml", &src)]);
    let (out, _) = apply_preset_bytes(&input, official()).unwrap();
    let doc = part_text(&out, "word/document.xml");
    assert!(!doc.contains("w:background"));
    assert!(!doc.contains("w:shd"));
}

#[test]
fn unknown_preset_fails_before_io() {
    assert!(matches!(
        Preset::by_name("corporate"),
        Err(gongwen::Error::UnknownPreset(_))
    ));
}

#[test]
fn spacing_unifier_is_minimal() {
    let body = format!(
        "{}{}",
        para("短标题"),
        "<w:p><w:pPr><w:spacing w:after=\"200\" w:line=\"240\" w:lineRule=\"auto\"/></w:pPr>\
         <w:r><w:rPr><w:i/></w:rPr><w:t>这是一段足够长的正文内容需要统一行距才能符合公文的要求。</w:t></w:r></w:p>"
    );
    let input = package(&[("word/document.xml", &document_xml(&body))]);
    let (out, changed) = unify_spacing_bytes(&input, official()).unwrap();

    assert_eq!(changed, 1);
    let doc = part_text(&out, "word/document.xml");
    // line rewritten, other spacing attributes and run styling untouched
    assert!(doc.contains("w:after=\"200\" w:line=\"560\" w:lineRule=\"exact\""));
    assert!(doc.contains("<w:i/>"));
    assert!(doc.contains(">短标题<"));
}
