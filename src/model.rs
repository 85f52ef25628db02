use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub(crate) fn jc_val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineSpacing {
    Auto(f32),    // multiplier (e.g. 1.0 = single, 1.5 = one-and-a-half)
    Exact(f32),   // fixed height in points
    AtLeast(f32), // minimum height in points
}

/// A child element of a property container (w:pPr / w:rPr), by local name
/// and byte range in the part's XML text.
#[derive(Clone, Debug)]
pub struct XmlChild {
    pub name: String,
    pub range: Range<usize>,
}

/// Paragraph properties element, kept as ranges so a rewrite can rebuild it
/// while carrying unknown children over verbatim.
#[derive(Clone, Debug)]
pub struct Ppr {
    pub node_range: Range<usize>,
    pub open_tag_end: usize,
    pub children: Vec<XmlChild>,
    /// Attributes of w:ind preserved across an indent rewrite
    /// (left/start/right/end); firstLine/hanging are replaced.
    pub ind_keep_attrs: Vec<(String, String)>,
    /// Attributes of w:spacing other than line/lineRule, preserved when only
    /// the line spacing is rewritten.
    pub spacing_keep_attrs: Vec<(String, String)>,
    /// Range of the w:spacing child, if present.
    pub spacing_range: Option<Range<usize>>,
}

/// One w:t element: its full byte range and its unescaped text content.
#[derive(Clone, Debug)]
pub struct TextSpan {
    pub elem_range: Range<usize>,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Rpr {
    pub node_range: Range<usize>,
    pub children: Vec<XmlChild>,
}

pub struct Run {
    pub open_tag_end: usize,
    pub rpr: Option<Rpr>,
    pub texts: Vec<TextSpan>,
    /// Effective (style-resolved) attributes, for the analyzer.
    pub font_name: String,
    pub east_asia: Option<String>,
    pub font_size: f32,
}

impl Run {
    pub fn text(&self) -> String {
        self.texts.iter().map(|t| t.text.as_str()).collect()
    }
}

pub struct Paragraph {
    pub node_range: Range<usize>,
    pub open_tag_end: usize,
    pub ppr: Option<Ppr>,
    pub runs: Vec<Run>,
    /// Concatenation of all run text, in reading order.
    pub text: String,
    /// Direct paragraph formatting only; style-inherited values are not
    /// folded in here (the analyzer mirrors what the paragraph itself says).
    pub alignment: Option<Alignment>,
    pub first_line_indent: Option<f32>, // points, from w:firstLine
    pub first_line_chars: Option<f32>,  // character units, from w:firstLineChars
    pub line_spacing: Option<LineSpacing>,
    pub style_id: Option<String>,
    pub in_table: bool,
}

impl Paragraph {
    pub fn has_first_line_indent(&self) -> bool {
        self.first_line_indent.is_some_and(|v| v > 0.0)
            || self.first_line_chars.is_some_and(|v| v > 0.0)
    }
}

#[derive(Clone, Debug)]
pub struct PageMargins {
    pub node_range: Range<usize>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub gutter: Option<String>,
}

/// One w:sectPr (body-level or embedded in a pPr).
pub struct SectionGeometry {
    pub pg_mar: Option<PageMargins>,
    /// Where a w:pgMar would be inserted if the section lacks one
    /// (after w:pgSz, or right after the sectPr open tag).
    pub pg_mar_insert_at: usize,
}

/// Parsed view of word/document.xml. Paragraphs appear in document order;
/// table-cell paragraphs are included and flagged.
pub struct DocModel {
    pub paragraphs: Vec<Paragraph>,
    pub sections: Vec<SectionGeometry>,
    /// w:background under w:document, if any.
    pub background: Option<Range<usize>>,
}

impl DocModel {
    /// Body paragraphs only (the analyzer's view), order preserved.
    pub fn body_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(|p| !p.in_table)
    }
}

pub(crate) fn twips_to_pts(twips: f32) -> f32 {
    twips / 20.0
}

pub(crate) fn pts_to_twips(pts: f32) -> i64 {
    (pts * 20.0).round() as i64
}

pub(crate) fn cm_to_twips(cm: f32) -> i64 {
    (cm * 1440.0 / 2.54).round() as i64
}
