use std::collections::HashMap;

use crate::model::{Alignment, LineSpacing, twips_to_pts};

use super::{WML_NS, wml, wml_attr, wml_bool};

pub(crate) struct StyleDefaults {
    pub(crate) font_size: f32,
    pub(crate) font_name: String,
    pub(crate) east_asia: Option<String>,
}

pub(crate) struct ParagraphStyle {
    pub(crate) font_size: Option<f32>,
    pub(crate) font_name: Option<String>,
    pub(crate) east_asia: Option<String>,
    pub(crate) bold: Option<bool>,
    pub(crate) italic: Option<bool>,
    pub(crate) alignment: Option<Alignment>,
    pub(crate) line_spacing: Option<LineSpacing>,
    pub(crate) based_on: Option<String>,
}

pub(crate) struct StylesInfo {
    pub(crate) defaults: StyleDefaults,
    pub(crate) paragraph_styles: HashMap<String, ParagraphStyle>,
}

impl StylesInfo {
    pub(crate) fn paragraph_style(&self, id: Option<&str>) -> Option<&ParagraphStyle> {
        self.paragraph_styles.get(id?)
    }
}

pub(crate) fn parse_alignment(val: &str) -> Alignment {
    match val {
        "center" => Alignment::Center,
        "right" | "end" => Alignment::Right,
        "both" | "distribute" => Alignment::Justify,
        _ => Alignment::Left,
    }
}

/// w:spacing @line/@lineRule → line spacing. Auto values are stored in
/// 240ths of a line, exact/atLeast in twips.
pub(crate) fn parse_line_spacing(spacing: roxmltree::Node) -> Option<LineSpacing> {
    let line = spacing
        .attribute((WML_NS, "line"))
        .and_then(|v| v.parse::<f32>().ok())?;
    Some(match spacing.attribute((WML_NS, "lineRule")) {
        Some("exact") => LineSpacing::Exact(twips_to_pts(line)),
        Some("atLeast") => LineSpacing::AtLeast(twips_to_pts(line)),
        _ => LineSpacing::Auto(line / 240.0),
    })
}

fn rfonts_names(rpr: roxmltree::Node) -> (Option<String>, Option<String>) {
    let Some(rfonts) = wml(rpr, "rFonts") else {
        return (None, None);
    };
    let ascii = rfonts
        .attribute((WML_NS, "ascii"))
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    let east_asia = rfonts
        .attribute((WML_NS, "eastAsia"))
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    (ascii, east_asia)
}

pub(crate) fn parse_styles(xml_content: Option<String>) -> StylesInfo {
    let mut defaults = StyleDefaults {
        font_size: 12.0,
        font_name: String::from("Calibri"),
        east_asia: None,
    };
    let mut paragraph_styles = HashMap::new();

    let Some(xml_content) = xml_content else {
        return StylesInfo {
            defaults,
            paragraph_styles,
        };
    };
    let Ok(xml) = roxmltree::Document::parse(&xml_content) else {
        return StylesInfo {
            defaults,
            paragraph_styles,
        };
    };

    let root = xml.root_element();

    if let Some(rpr) = wml(root, "docDefaults")
        .and_then(|n| wml(n, "rPrDefault"))
        .and_then(|n| wml(n, "rPr"))
    {
        if let Some(sz_val) = wml_attr(rpr, "sz").and_then(|v| v.parse::<f32>().ok()) {
            defaults.font_size = sz_val / 2.0;
        }
        let (ascii, east_asia) = rfonts_names(rpr);
        if let Some(ascii) = ascii {
            defaults.font_name = ascii;
        }
        defaults.east_asia = east_asia;
    }

    for style_node in root.children() {
        if style_node.tag_name().name() != "style"
            || style_node.tag_name().namespace() != Some(WML_NS)
        {
            continue;
        }
        if style_node.attribute((WML_NS, "type")) != Some("paragraph") {
            continue;
        }
        let Some(style_id) = style_node.attribute((WML_NS, "styleId")) else {
            continue;
        };

        let ppr = wml(style_node, "pPr");
        let rpr = wml(style_node, "rPr");

        let font_size = rpr
            .and_then(|n| wml_attr(n, "sz"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0);
        let (font_name, east_asia) = rpr.map(rfonts_names).unwrap_or((None, None));
        let bold = rpr.and_then(|n| wml_bool(n, "b"));
        let italic = rpr.and_then(|n| wml_bool(n, "i"));

        let alignment = ppr.and_then(|ppr| wml_attr(ppr, "jc")).map(parse_alignment);
        let line_spacing = ppr
            .and_then(|ppr| wml(ppr, "spacing"))
            .and_then(parse_line_spacing);

        let based_on = wml(style_node, "basedOn")
            .and_then(|n| n.attribute((WML_NS, "val")))
            .map(|s| s.to_string());

        paragraph_styles.insert(
            style_id.to_string(),
            ParagraphStyle {
                font_size,
                font_name,
                east_asia,
                bold,
                italic,
                alignment,
                line_spacing,
                based_on,
            },
        );
    }

    resolve_based_on(&mut paragraph_styles);

    StylesInfo {
        defaults,
        paragraph_styles,
    }
}

/// Fold each style's basedOn chain into it: closer ancestors override
/// further ones, the style's own values override all.
fn resolve_based_on(styles: &mut HashMap<String, ParagraphStyle>) {
    let ids: Vec<String> = styles.keys().cloned().collect();
    for id in ids {
        let mut chain: Vec<String> = Vec::new();
        let mut current = id.clone();
        loop {
            if chain.contains(&current) {
                break;
            }
            chain.push(current.clone());
            match styles.get(&current).and_then(|s| s.based_on.clone()) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        let mut inh = ParagraphStyle {
            font_size: None,
            font_name: None,
            east_asia: None,
            bold: None,
            italic: None,
            alignment: None,
            line_spacing: None,
            based_on: None,
        };

        for ancestor_id in chain.iter().rev() {
            if let Some(s) = styles.get(ancestor_id) {
                if s.font_size.is_some() {
                    inh.font_size = s.font_size;
                }
                if s.font_name.is_some() {
                    inh.font_name = s.font_name.clone();
                }
                if s.east_asia.is_some() {
                    inh.east_asia = s.east_asia.clone();
                }
                if s.bold.is_some() {
                    inh.bold = s.bold;
                }
                if s.italic.is_some() {
                    inh.italic = s.italic;
                }
                if s.alignment.is_some() {
                    inh.alignment = s.alignment;
                }
                if s.line_spacing.is_some() {
                    inh.line_spacing = s.line_spacing;
                }
            }
        }

        if let Some(s) = styles.get_mut(&id) {
            s.font_size = s.font_size.or(inh.font_size);
            s.font_name = s.font_name.take().or(inh.font_name);
            s.east_asia = s.east_asia.take().or(inh.east_asia);
            s.bold = s.bold.or(inh.bold);
            s.italic = s.italic.or(inh.italic);
            s.alignment = s.alignment.or(inh.alignment);
            s.line_spacing = s.line_spacing.or(inh.line_spacing);
        }
    }
}
