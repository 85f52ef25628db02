use crate::detect::ParaRole;
use crate::error::Error;
use crate::model::Alignment;

/// Line spacing a preset row prescribes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineRule {
    /// Fixed height in points (w:lineRule="exact").
    ExactPt(f32),
    /// Multiple of single spacing (w:lineRule="auto").
    Multiple(f32),
}

/// Page margins in centimetres.
#[derive(Clone, Copy, Debug)]
pub struct PageSetup {
    pub top_cm: f32,
    pub bottom_cm: f32,
    pub left_cm: f32,
    pub right_cm: f32,
}

/// Target formatting for one structural role.
#[derive(Clone, Copy, Debug)]
pub struct ParaSpec {
    /// East Asian font (w:eastAsia).
    pub font_cn: &'static str,
    /// ASCII font.
    pub font_en: &'static str,
    pub size_pt: f32,
    pub bold: bool,
    pub align: Alignment,
    /// First-line indent in points.
    pub indent_pt: f32,
    pub line: LineRule,
}

/// A named, fixed table of page and style values. Presets are data, not
/// code; the formatter only ever reads them.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub display_name: &'static str,
    pub page: PageSetup,
    pub title: ParaSpec,
    pub heading1: ParaSpec,
    pub heading2: ParaSpec,
    pub heading3: ParaSpec,
    pub heading4: ParaSpec,
    pub body: ParaSpec,
}

impl Preset {
    pub fn by_name(name: &str) -> Result<&'static Preset, Error> {
        PRESETS
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::UnknownPreset(name.to_string()))
    }

    pub fn spec_for(&self, role: ParaRole) -> &ParaSpec {
        match role {
            ParaRole::Title => &self.title,
            ParaRole::Heading1 => &self.heading1,
            ParaRole::Heading2 => &self.heading2,
            ParaRole::Heading3 => &self.heading3,
            ParaRole::Heading4 => &self.heading4,
            ParaRole::Body => &self.body,
        }
    }
}

// 字号对照：二号=22pt，三号=16pt，小四=12pt；2字符缩进(三号) = 32pt。
pub static PRESETS: [Preset; 3] = [
    Preset {
        name: "official",
        display_name: "公文格式",
        page: PageSetup {
            top_cm: 3.7,
            bottom_cm: 3.5,
            left_cm: 2.8,
            right_cm: 2.6,
        },
        title: ParaSpec {
            font_cn: "方正小标宋简体",
            font_en: "Times New Roman",
            size_pt: 22.0,
            bold: false,
            align: Alignment::Center,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading1: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 16.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 32.0,
            line: LineRule::ExactPt(28.0),
        },
        heading2: ParaSpec {
            font_cn: "楷体_GB2312",
            font_en: "Times New Roman",
            size_pt: 16.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 32.0,
            line: LineRule::ExactPt(28.0),
        },
        heading3: ParaSpec {
            font_cn: "仿宋_GB2312",
            font_en: "Times New Roman",
            size_pt: 16.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 32.0,
            line: LineRule::ExactPt(28.0),
        },
        heading4: ParaSpec {
            font_cn: "仿宋_GB2312",
            font_en: "Times New Roman",
            size_pt: 16.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 32.0,
            line: LineRule::ExactPt(28.0),
        },
        body: ParaSpec {
            font_cn: "仿宋_GB2312",
            font_en: "Times New Roman",
            size_pt: 16.0,
            bold: false,
            align: Alignment::Justify,
            indent_pt: 32.0,
            line: LineRule::ExactPt(28.0),
        },
    },
    Preset {
        name: "academic",
        display_name: "学术论文格式",
        page: PageSetup {
            top_cm: 2.5,
            bottom_cm: 2.5,
            left_cm: 2.5,
            right_cm: 2.5,
        },
        title: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 18.0,
            bold: true,
            align: Alignment::Center,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading1: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 15.0,
            bold: true,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading2: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: true,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading3: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 12.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading4: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 12.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        body: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 12.0,
            bold: false,
            align: Alignment::Justify,
            indent_pt: 24.0,
            line: LineRule::Multiple(1.5),
        },
    },
    Preset {
        name: "legal",
        display_name: "法律文书格式",
        page: PageSetup {
            top_cm: 3.0,
            bottom_cm: 2.5,
            left_cm: 3.0,
            right_cm: 2.5,
        },
        title: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 22.0,
            bold: true,
            align: Alignment::Center,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading1: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading2: ParaSpec {
            font_cn: "黑体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading3: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        heading4: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: false,
            align: Alignment::Left,
            indent_pt: 0.0,
            line: LineRule::ExactPt(28.0),
        },
        body: ParaSpec {
            font_cn: "宋体",
            font_en: "Times New Roman",
            size_pt: 14.0,
            bold: false,
            align: Alignment::Justify,
            indent_pt: 28.0,
            line: LineRule::Multiple(1.5),
        },
    },
];
