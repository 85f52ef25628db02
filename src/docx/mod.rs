pub(crate) mod edit;
pub(crate) mod styles;
mod write;

use std::io::{Cursor, Read};

use crate::error::Error;
use crate::model::{
    DocModel, PageMargins, Paragraph, Ppr, Rpr, Run, SectionGeometry, TextSpan, XmlChild,
};

use edit::start_tag_end;
use styles::{StylesInfo, parse_alignment, parse_line_spacing};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// OLE2 compound file magic: legacy .doc/.wps documents start with this.
const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub(crate) fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// Parse a WML boolean toggle element (e.g., w:b, w:i).
/// Present with no val or val != "0"/"false" means true.
pub(crate) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

pub(crate) fn twips_attr(node: roxmltree::Node, attr: &str) -> Option<f32> {
    node.attribute((WML_NS, attr))
        .and_then(|v| v.parse::<f32>().ok())
        .map(crate::model::twips_to_pts)
}

struct ZipEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// A DOCX package held fully in memory. Parts are kept as raw bytes in
/// archive order so an output package can reproduce everything it does not
/// deliberately rewrite.
pub(crate) struct Package {
    entries: Vec<ZipEntry>,
}

impl Package {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.starts_with(&OLE2_MAGIC) {
            return Err(Error::LegacyFormat);
        }
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|_| Error::InvalidPackage("file is not a ZIP archive".into()))?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            entries.push(ZipEntry {
                name: entry.name().to_string(),
                data,
                is_dir: entry.is_dir(),
            });
        }
        Ok(Package { entries })
    }

    pub(crate) fn part_text(&self, name: &str) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.name == name)?;
        String::from_utf8(entry.data.clone()).ok()
    }

    pub(crate) fn document_text(&self) -> Result<String, Error> {
        self.part_text("word/document.xml").ok_or_else(|| {
            Error::InvalidPackage("missing word/document.xml (is this a DOCX file?)".into())
        })
    }

    pub(crate) fn styles_text(&self) -> Option<String> {
        self.part_text("word/styles.xml")
    }

    /// Names of footer parts present in the package.
    pub(crate) fn footer_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.name.starts_with("word/footer") && e.name.ends_with(".xml"))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Assemble the output package: every entry in original order, with the
    /// given parts' contents substituted.
    pub(crate) fn write_with(
        &self,
        replaced: &std::collections::HashMap<String, String>,
    ) -> Result<Vec<u8>, Error> {
        write::write_package(&self.entries, replaced)
    }
}

pub(crate) fn parse_styles(pkg: &Package) -> StylesInfo {
    styles::parse_styles(pkg.styles_text())
}

pub(crate) fn parse_document(src: &str, styles: &StylesInfo) -> Result<DocModel, Error> {
    let xml = roxmltree::Document::parse(src)?;
    let root = xml.root_element();
    let body = wml(root, "body")
        .ok_or_else(|| Error::InvalidPackage("missing w:body in word/document.xml".into()))?;
    let background = wml(root, "background").map(|n| n.range());

    let mut paragraphs = Vec::new();
    let mut sections = Vec::new();
    for node in body.descendants() {
        if node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match node.tag_name().name() {
            // Text-box content lives inside drawings; it is neither body nor
            // table text and is left alone.
            "p" if !in_ancestor(node, "txbxContent") => {
                let in_table = in_ancestor(node, "tc");
                paragraphs.push(parse_paragraph(src, node, styles, in_table));
            }
            "sectPr" => sections.push(parse_section(src, node)),
            _ => {}
        }
    }

    Ok(DocModel {
        paragraphs,
        sections,
        background,
    })
}

fn in_ancestor(node: roxmltree::Node, name: &str) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| a.tag_name().name() == name && a.tag_name().namespace() == Some(WML_NS))
}

fn collect_run_nodes<'a>(parent: roxmltree::Node<'a, 'a>, out: &mut Vec<roxmltree::Node<'a, 'a>>) {
    for child in parent.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "r" => out.push(child),
            "hyperlink" | "ins" => collect_run_nodes(child, out),
            "sdt" => {
                if let Some(content) = wml(child, "sdtContent") {
                    collect_run_nodes(content, out);
                }
            }
            _ => {}
        }
    }
}

fn element_children(src: &str, node: roxmltree::Node) -> (usize, Vec<XmlChild>) {
    let open_tag_end = start_tag_end(src, node.range().start);
    let children = node
        .children()
        .filter(|c| c.is_element())
        .map(|c| XmlChild {
            name: c.tag_name().name().to_string(),
            range: c.range(),
        })
        .collect();
    (open_tag_end, children)
}

fn text_content(node: roxmltree::Node) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn parse_paragraph(
    src: &str,
    node: roxmltree::Node,
    styles: &StylesInfo,
    in_table: bool,
) -> Paragraph {
    let ppr_node = wml(node, "pPr");
    let style_id = ppr_node
        .and_then(|p| wml_attr(p, "pStyle"))
        .map(String::from);
    let para_style = styles.paragraph_style(style_id.as_deref());

    let alignment = ppr_node
        .and_then(|p| wml_attr(p, "jc"))
        .map(parse_alignment);
    let ind = ppr_node.and_then(|p| wml(p, "ind"));
    let first_line_indent = ind.and_then(|n| twips_attr(n, "firstLine"));
    let first_line_chars = ind
        .and_then(|n| n.attribute((WML_NS, "firstLineChars")))
        .and_then(|v| v.parse::<f32>().ok())
        .map(|v| v / 100.0);
    let spacing_node = ppr_node.and_then(|p| wml(p, "spacing"));
    let line_spacing = spacing_node.and_then(parse_line_spacing);

    let ppr = ppr_node.map(|p| {
        let (open_tag_end, children) = element_children(src, p);
        Ppr {
            node_range: p.range(),
            open_tag_end,
            children,
            ind_keep_attrs: ind
                .map(|n| {
                    n.attributes()
                        .filter(|a| matches!(a.name(), "left" | "start" | "right" | "end"))
                        .map(|a| (a.name().to_string(), a.value().to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            spacing_keep_attrs: spacing_node
                .map(|n| {
                    n.attributes()
                        .filter(|a| !matches!(a.name(), "line" | "lineRule"))
                        .map(|a| (a.name().to_string(), a.value().to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            spacing_range: spacing_node.map(|n| n.range()),
        }
    });

    let style_size = para_style
        .and_then(|s| s.font_size)
        .unwrap_or(styles.defaults.font_size);
    let style_font = para_style
        .and_then(|s| s.font_name.as_deref())
        .unwrap_or(&styles.defaults.font_name);
    let style_east_asia = para_style
        .and_then(|s| s.east_asia.as_deref())
        .or(styles.defaults.east_asia.as_deref());

    let mut run_nodes = Vec::new();
    collect_run_nodes(node, &mut run_nodes);

    let mut runs = Vec::new();
    for run_node in run_nodes {
        let rpr_node = wml(run_node, "rPr");

        let font_size = rpr_node
            .and_then(|n| wml_attr(n, "sz"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0)
            .unwrap_or(style_size);
        let rfonts = rpr_node.and_then(|n| wml(n, "rFonts"));
        let font_name = rfonts
            .and_then(|n| n.attribute((WML_NS, "ascii")))
            .filter(|v| !v.is_empty())
            .unwrap_or(style_font)
            .to_string();
        let east_asia = rfonts
            .and_then(|n| n.attribute((WML_NS, "eastAsia")))
            .filter(|v| !v.is_empty())
            .or(style_east_asia)
            .map(String::from);
        let rpr = rpr_node.map(|p| {
            let (_, children) = element_children(src, p);
            Rpr {
                node_range: p.range(),
                children,
            }
        });

        let texts = run_node
            .children()
            .filter(|c| c.tag_name().name() == "t" && c.tag_name().namespace() == Some(WML_NS))
            .map(|c| TextSpan {
                elem_range: c.range(),
                text: text_content(c),
            })
            .collect();

        runs.push(Run {
            open_tag_end: start_tag_end(src, run_node.range().start),
            rpr,
            texts,
            font_name,
            east_asia,
            font_size,
        });
    }

    let text: String = runs.iter().map(|r| r.text()).collect();

    Paragraph {
        node_range: node.range(),
        open_tag_end: start_tag_end(src, node.range().start),
        ppr,
        runs,
        text,
        alignment,
        first_line_indent,
        first_line_chars,
        line_spacing,
        style_id,
        in_table,
    }
}

fn parse_section(src: &str, node: roxmltree::Node) -> SectionGeometry {
    let pg_mar = wml(node, "pgMar").map(|n| PageMargins {
        node_range: n.range(),
        header: n.attribute((WML_NS, "header")).map(String::from),
        footer: n.attribute((WML_NS, "footer")).map(String::from),
        gutter: n.attribute((WML_NS, "gutter")).map(String::from),
    });
    let pg_mar_insert_at = wml(node, "pgSz")
        .map(|n| n.range().end)
        .unwrap_or_else(|| start_tag_end(src, node.range().start));
    SectionGeometry {
        pg_mar,
        pg_mar_insert_at,
    }
}
