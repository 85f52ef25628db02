//! Style formatter: rewrites page geometry and paragraph/run styling to a
//! preset's fixed table of values. Text content is never touched; property
//! containers are rebuilt in place and unknown children carried over.

use crate::detect::{self, ParaRole};
use crate::docx::edit::{EditList, element_tag, escape_attr, inner_range};
use crate::docx::styles::StylesInfo;
use crate::error::Error;
use crate::model::{
    DocModel, LineSpacing, Paragraph, Ppr, SectionGeometry, cm_to_twips, pts_to_twips,
};
use crate::presets::{LineRule, ParaSpec, Preset};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FormatStats {
    pub title: usize,
    pub heading1: usize,
    pub heading2: usize,
    pub heading3: usize,
    pub heading4: usize,
    pub body: usize,
    pub table_cells: usize,
}

impl FormatStats {
    fn bump(&mut self, role: ParaRole) {
        match role {
            ParaRole::Title => self.title += 1,
            ParaRole::Heading1 => self.heading1 += 1,
            ParaRole::Heading2 => self.heading2 += 1,
            ParaRole::Heading3 => self.heading3 += 1,
            ParaRole::Heading4 => self.heading4 += 1,
            ParaRole::Body => self.body += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.title
            + self.heading1
            + self.heading2
            + self.heading3
            + self.heading4
            + self.body
            + self.table_cells
    }
}

/// pPr children the formatter regenerates; everything else is carried over.
const PPR_REPLACED: &[&str] = &["jc", "ind", "spacing", "shd"];
/// rPr children the formatter regenerates or strips.
const RPR_REPLACED: &[&str] = &["rFonts", "b", "bCs", "sz", "szCs", "highlight", "shd"];

fn spacing_xml(line: LineRule) -> String {
    match line {
        LineRule::ExactPt(pt) => format!(
            "<w:spacing w:before=\"0\" w:after=\"0\" w:line=\"{}\" w:lineRule=\"exact\"/>",
            pts_to_twips(pt)
        ),
        LineRule::Multiple(m) => format!(
            "<w:spacing w:before=\"0\" w:after=\"0\" w:line=\"{}\" w:lineRule=\"auto\"/>",
            (m * 240.0).round() as i64
        ),
    }
}

fn ind_xml(ppr: Option<&Ppr>, indent_pt: f32) -> String {
    let mut attrs = String::new();
    if let Some(ppr) = ppr {
        for (name, value) in &ppr.ind_keep_attrs {
            attrs.push_str(&format!(" w:{name}=\"{}\"", escape_attr(value)));
        }
    }
    format!(
        "<w:ind{attrs} w:firstLine=\"{}\"/>",
        pts_to_twips(indent_pt)
    )
}

fn rpr_content(spec: &ParaSpec, kept: &str) -> String {
    let half_points = (spec.size_pt * 2.0).round() as i64;
    let bold = if spec.bold {
        "<w:b/><w:bCs/>"
    } else {
        "<w:b w:val=\"0\"/><w:bCs w:val=\"0\"/>"
    };
    format!(
        "<w:rFonts w:ascii=\"{en}\" w:hAnsi=\"{en}\" w:eastAsia=\"{cn}\"/>{bold}{kept}<w:sz w:val=\"{half_points}\"/><w:szCs w:val=\"{half_points}\"/>",
        en = escape_attr(spec.font_en),
        cn = escape_attr(spec.font_cn),
    )
}

/// Slices of a property container's children, minus the ones being
/// regenerated. rPr/sectPr of a pPr are returned separately so they can stay
/// in trailing position.
fn kept_children(
    src: &str,
    children: &[crate::model::XmlChild],
    replaced: &[&str],
    trailing: &[&str],
) -> (String, String) {
    let mut kept = String::new();
    let mut tail = String::new();
    for child in children {
        if replaced.contains(&child.name.as_str()) {
            continue;
        }
        let slice = &src[child.range.clone()];
        if trailing.contains(&child.name.as_str()) {
            tail.push_str(slice);
        } else {
            kept.push_str(slice);
        }
    }
    (kept, tail)
}

/// Replace or create the paragraph's pPr so that alignment, first-line
/// indent and line spacing match the spec.
fn rewrite_ppr(
    src: &str,
    list: &mut EditList,
    para: &Paragraph,
    spec: &ParaSpec,
    set_alignment: bool,
) {
    let spacing = spacing_xml(spec.line);
    let ind = ind_xml(para.ppr.as_ref(), spec.indent_pt);
    let jc = if set_alignment {
        format!("<w:jc w:val=\"{}\"/>", spec.align.jc_val())
    } else {
        String::new()
    };

    match &para.ppr {
        Some(ppr) => {
            let replaced: Vec<&str> = if set_alignment {
                PPR_REPLACED.to_vec()
            } else {
                PPR_REPLACED
                    .iter()
                    .copied()
                    .filter(|n| *n != "jc")
                    .collect()
            };
            let (kept, tail) =
                kept_children(src, &ppr.children, &replaced, &["rPr", "sectPr"]);
            let tag = element_tag(src, &ppr.node_range);
            let rebuilt = format!("<{tag}>{kept}{spacing}{ind}{jc}{tail}</{tag}>");
            list.replace(ppr.node_range.clone(), rebuilt);
        }
        None => {
            list.insert(
                para.open_tag_end,
                format!("<w:pPr>{spacing}{ind}{jc}</w:pPr>"),
            );
        }
    }
}

fn rewrite_runs(src: &str, list: &mut EditList, para: &Paragraph, spec: &ParaSpec) {
    for run in &para.runs {
        match &run.rpr {
            Some(rpr) => {
                // rStyle must stay first
                let (kept, style) = kept_children(src, &rpr.children, RPR_REPLACED, &["rStyle"]);
                let tag = element_tag(src, &rpr.node_range);
                let rebuilt = format!("<{tag}>{style}{}</{tag}>", rpr_content(spec, &kept));
                list.replace(rpr.node_range.clone(), rebuilt);
            }
            None => {
                list.insert(
                    run.open_tag_end,
                    format!("<w:rPr>{}</w:rPr>", rpr_content(spec, "")),
                );
            }
        }
    }
}

fn rewrite_margins(src: &str, list: &mut EditList, sect: &SectionGeometry, preset: &Preset) {
    let page = &preset.page;
    let (header, footer, gutter) = match &sect.pg_mar {
        Some(m) => (
            m.header.clone().unwrap_or_else(|| "851".into()),
            m.footer.clone().unwrap_or_else(|| "992".into()),
            m.gutter.clone().unwrap_or_else(|| "0".into()),
        ),
        None => ("851".into(), "992".into(), "0".into()),
    };
    let rebuilt = format!(
        "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"{}\"/>",
        cm_to_twips(page.top_cm),
        cm_to_twips(page.right_cm),
        cm_to_twips(page.bottom_cm),
        cm_to_twips(page.left_cm),
        escape_attr(&header),
        escape_attr(&footer),
        escape_attr(&gutter),
    );
    match &sect.pg_mar {
        Some(m) => list.replace(m.node_range.clone(), rebuilt),
        None => list.insert(sect.pg_mar_insert_at, rebuilt),
    }
}

/// Apply a preset to word/document.xml: structural-role styling for body
/// paragraphs, body styling for table cells, background removal, then page
/// margins. Margins go in a second pass over the intermediate result: a
/// mid-document sectPr lives inside a pPr that the first pass rebuilds, so
/// its offsets are only valid after a re-parse.
pub(crate) fn format_document_xml(
    src: &str,
    model: &DocModel,
    styles: &StylesInfo,
    preset: &Preset,
) -> Result<(String, FormatStats), Error> {
    let mut list = EditList::default();
    let mut stats = FormatStats::default();

    if let Some(bg) = &model.background {
        list.delete(bg.clone());
    }

    let cell = cell_spec(preset);
    let mut body_index = 0usize;
    for para in &model.paragraphs {
        if para.in_table {
            if para.text.trim().is_empty() {
                continue;
            }
            // Cells keep their alignment; fonts and spacing follow the body row.
            rewrite_ppr(src, &mut list, para, &cell, false);
            rewrite_runs(src, &mut list, para, &cell);
            stats.table_cells += 1;
            continue;
        }

        let index = body_index;
        body_index += 1;
        let text = para.text.trim();
        if text.is_empty() {
            continue;
        }

        let role = detect::para_role(text, index, para.alignment);
        let spec = preset.spec_for(role);
        rewrite_ppr(src, &mut list, para, spec, true);
        rewrite_runs(src, &mut list, para, spec);
        stats.bump(role);
        log::debug!("[{:>8}] {}", role.label(), preview(text));
    }

    let intermediate = list.apply(src);

    let remodel = crate::docx::parse_document(&intermediate, styles)?;
    let mut margins = EditList::default();
    for sect in &remodel.sections {
        rewrite_margins(&intermediate, &mut margins, sect, preset);
    }

    Ok((margins.apply(&intermediate), stats))
}

/// The body row with the cell-specific overrides: no first-line indent.
fn cell_spec(preset: &Preset) -> ParaSpec {
    ParaSpec {
        indent_pt: 0.0,
        ..preset.body
    }
}

/// Replace a footer part's content with a centered PAGE field.
pub(crate) fn page_number_footer_xml(src: &str) -> Option<String> {
    let xml = roxmltree::Document::parse(src).ok()?;
    let root = xml.root_element();
    let field = "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
                 <w:r><w:fldChar w:fldCharType=\"begin\"/></w:r>\
                 <w:r><w:instrText xml:space=\"preserve\"> PAGE </w:instrText></w:r>\
                 <w:r><w:fldChar w:fldCharType=\"end\"/></w:r></w:p>";
    let range = root.range();
    match inner_range(src, &range) {
        Some(inner) => {
            let mut list = EditList::default();
            list.replace(inner, field.to_string());
            Some(list.apply(src))
        }
        None => {
            // self-closing w:ftr: reopen it
            let open = &src[range.start..range.end];
            let open = open.strip_suffix("/>")?;
            let tag = element_tag(src, &range);
            let mut out = String::from(&src[..range.start]);
            out.push_str(open);
            out.push('>');
            out.push_str(field);
            out.push_str(&format!("</{tag}>"));
            out.push_str(&src[range.end..]);
            Some(out)
        }
    }
}

/// Line-spacing unifier: rewrite only w:spacing on body-like paragraphs
/// (long, no explicit alignment) to the preset's body rule.
pub(crate) fn unify_spacing_xml(
    src: &str,
    model: &DocModel,
    preset: &Preset,
) -> (Option<String>, usize) {
    let target = preset.body.line;
    let mut list = EditList::default();
    let mut changed = 0usize;

    for para in model.body_paragraphs() {
        let text = para.text.trim();
        if text.is_empty() || text.chars().count() < 20 || para.alignment.is_some() {
            continue;
        }
        if para.line_spacing.is_some_and(|ls| matches_rule(ls, target)) {
            continue;
        }

        let spacing = match &para.ppr {
            Some(ppr) => {
                let mut attrs = String::new();
                for (name, value) in &ppr.spacing_keep_attrs {
                    attrs.push_str(&format!(" w:{name}=\"{}\"", escape_attr(value)));
                }
                let (line, rule) = line_attrs(target);
                format!("<w:spacing{attrs} w:line=\"{line}\" w:lineRule=\"{rule}\"/>")
            }
            None => {
                let (line, rule) = line_attrs(target);
                format!("<w:spacing w:line=\"{line}\" w:lineRule=\"{rule}\"/>")
            }
        };

        match &para.ppr {
            Some(ppr) => match &ppr.spacing_range {
                Some(range) => list.replace(range.clone(), spacing),
                None => {
                    // after pStyle, which the schema wants first
                    let at = match ppr.children.first() {
                        Some(first) if first.name == "pStyle" => first.range.end,
                        _ => ppr.open_tag_end,
                    };
                    list.insert(at, spacing);
                }
            },
            None => list.insert(para.open_tag_end, format!("<w:pPr>{spacing}</w:pPr>")),
        }
        changed += 1;
    }

    if list.is_empty() {
        (None, changed)
    } else {
        (Some(list.apply(src)), changed)
    }
}

fn line_attrs(rule: LineRule) -> (i64, &'static str) {
    match rule {
        LineRule::ExactPt(pt) => (pts_to_twips(pt), "exact"),
        LineRule::Multiple(m) => ((m * 240.0).round() as i64, "auto"),
    }
}

fn matches_rule(ls: LineSpacing, rule: LineRule) -> bool {
    match (ls, rule) {
        (LineSpacing::Exact(a), LineRule::ExactPt(b)) => (a - b).abs() < 0.01,
        (LineSpacing::Auto(a), LineRule::Multiple(b)) => (a - b).abs() < 0.01,
        _ => false,
    }
}

fn preview(text: &str) -> String {
    let mut p: String = text.chars().take(35).collect();
    if p.len() < text.len() {
        p.push('…');
    }
    p
}
