use std::sync::LazyLock;

use regex::Regex;

use crate::model::Alignment;

/// Structural role of a paragraph, inferred from its leading token (and, for
/// titles, position and alignment).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParaRole {
    Title,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Body,
}

impl ParaRole {
    pub fn label(self) -> &'static str {
        match self {
            ParaRole::Title => "title",
            ParaRole::Heading1 => "heading1",
            ParaRole::Heading2 => "heading2",
            ParaRole::Heading3 => "heading3",
            ParaRole::Heading4 => "heading4",
            ParaRole::Body => "body",
        }
    }
}

/// Numbering scheme of a paragraph's leading token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberingClass {
    ChineseComma,    // 一、
    ChineseParen,    // （一）
    ArabicDot,       // 1.
    ArabicComma,     // 1、
    ArabicParen,     // 1) / 1）
    ArabicParenFull, // （1）
}

impl NumberingClass {
    pub fn label(self) -> &'static str {
        match self {
            NumberingClass::ChineseComma => "一、",
            NumberingClass::ChineseParen => "（一）",
            NumberingClass::ArabicDot => "1.",
            NumberingClass::ArabicComma => "1、",
            NumberingClass::ArabicParen => "1）",
            NumberingClass::ArabicParenFull => "（1）",
        }
    }

    pub fn is_arabic(self) -> bool {
        matches!(
            self,
            NumberingClass::ArabicDot
                | NumberingClass::ArabicComma
                | NumberingClass::ArabicParen
                | NumberingClass::ArabicParenFull
        )
    }
}

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

re!(RE_H1, r"^[一二三四五六七八九十]+、");
re!(RE_H2_FULL, r"^（[一二三四五六七八九十]+）");
re!(RE_H2_HALF, r"^\([一二三四五六七八九十]+\)");
re!(RE_H3, r"^\d+\.\s*\S");
re!(RE_H4_FULL, r"^（\d+）");
re!(RE_H4_HALF, r"^\(\d+\)");
re!(
    RE_TITLE_GUANYU,
    r"^关于.{2,30}的(通知|报告|请示|函|意见|决定|公告|通报|批复|汇报|方案|总结)$"
);
re!(
    RE_TITLE_SUFFIX,
    r"^.{2,20}(通知|报告|请示|函|意见|决定|公告|通报|批复|汇报材料|工作汇报|工作方案|工作总结)$"
);

re!(RE_NUM_CN_COMMA, r"^[一二三四五六七八九十]+、");
re!(RE_NUM_CN_PAREN, r"^（[一二三四五六七八九十]+）");
re!(RE_NUM_AR_DOT, r"^\d+\.");
re!(RE_NUM_AR_COMMA, r"^\d+、");
re!(RE_NUM_AR_PAREN, r"^\d+[）)]");
re!(RE_NUM_AR_PAREN_FULL, r"^（\d+）");

// Lines that legitimately carry no first-line indent besides centered titles.
re!(
    RE_NO_INDENT_LINE,
    r"^(附件|联系人|抄送|主送)[：:]"
);

/// Classify a paragraph's leading numbering token, first match wins in the
/// order the scheme table defines.
pub fn numbering_class(text: &str) -> Option<NumberingClass> {
    let text = text.trim();
    if RE_NUM_CN_COMMA.is_match(text) {
        Some(NumberingClass::ChineseComma)
    } else if RE_NUM_CN_PAREN.is_match(text) {
        Some(NumberingClass::ChineseParen)
    } else if RE_NUM_AR_DOT.is_match(text) {
        Some(NumberingClass::ArabicDot)
    } else if RE_NUM_AR_COMMA.is_match(text) {
        Some(NumberingClass::ArabicComma)
    } else if RE_NUM_AR_PAREN.is_match(text) {
        Some(NumberingClass::ArabicParen)
    } else if RE_NUM_AR_PAREN_FULL.is_match(text) {
        Some(NumberingClass::ArabicParenFull)
    } else {
        None
    }
}

/// Structural role used by the formatter to pick a preset row. `index` is
/// the paragraph's position among body paragraphs; titles are only
/// recognized near the top of the document.
pub fn para_role(text: &str, index: usize, alignment: Option<Alignment>) -> ParaRole {
    let text = text.trim();
    let len = text.chars().count();

    if RE_H1.is_match(text) {
        return ParaRole::Heading1;
    }
    if RE_H2_FULL.is_match(text) || RE_H2_HALF.is_match(text) {
        return ParaRole::Heading2;
    }
    if RE_H3.is_match(text) && len < 60 {
        return ParaRole::Heading3;
    }
    if (RE_H4_FULL.is_match(text) || RE_H4_HALF.is_match(text)) && len < 60 {
        return ParaRole::Heading4;
    }

    if index < 3 {
        if RE_TITLE_GUANYU.is_match(text) || RE_TITLE_SUFFIX.is_match(text) {
            return ParaRole::Title;
        }
        if alignment == Some(Alignment::Center) && len < 50 {
            return ParaRole::Title;
        }
    }

    ParaRole::Body
}

/// Paragraphs exempt from the missing-first-line-indent check: centered
/// (titles) or recipient/contact lines.
pub fn is_no_indent_line(text: &str, alignment: Option<Alignment>) -> bool {
    alignment == Some(Alignment::Center) || RE_NO_INDENT_LINE.is_match(text.trim())
}
