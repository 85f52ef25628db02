//! Read-only format diagnostics: linear passes over the paragraph tree
//! collecting findings, no mutation anywhere.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use serde::Serialize;

use crate::detect::{self, NumberingClass};
use crate::model::{DocModel, LineSpacing, Paragraph};
use crate::punct::has_cjk;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    HalfWidthParen,
    HalfWidthQuote,
    HalfWidthColon,
    HalfWidthComma,
    HalfWidthSemicolon,
    HalfWidthQuestion,
    HalfWidthBang,
    BadEllipsis,
    BadDash,
    HalfWidthPeriod,
    InconsistentNumbering,
    MissingFirstLineIndent,
    MixedLineSpacing,
    TooManyFonts,
    TooManySizes,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::HalfWidthParen => "英文括号",
            IssueKind::HalfWidthQuote => "英文引号",
            IssueKind::HalfWidthColon => "英文冒号",
            IssueKind::HalfWidthComma => "英文逗号",
            IssueKind::HalfWidthSemicolon => "英文分号",
            IssueKind::HalfWidthQuestion => "英文问号",
            IssueKind::HalfWidthBang => "英文叹号",
            IssueKind::BadEllipsis => "不规范省略号",
            IssueKind::BadDash => "不规范破折号",
            IssueKind::HalfWidthPeriod => "英文句号",
            IssueKind::InconsistentNumbering => "序号格式不统一",
            IssueKind::MissingFirstLineIndent => "缺少首行缩进",
            IssueKind::MixedLineSpacing => "行距不统一",
            IssueKind::TooManyFonts => "字体种类过多",
            IssueKind::TooManySizes => "字号不统一",
        }
    }
}

/// One diagnostic. `para` is the 1-based body-paragraph index; document-wide
/// findings carry no index.
#[derive(Clone, Debug, Serialize)]
pub struct Finding {
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub para: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Finding {
    fn at(kind: IssueKind, para: usize, fragment: &str) -> Self {
        Finding {
            kind,
            para: Some(para),
            fragment: Some(fragment.to_string()),
            detail: None,
        }
    }

    fn document_wide(kind: IssueKind, detail: String) -> Self {
        Finding {
            kind,
            para: None,
            fragment: None,
            detail: Some(detail),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub punctuation: Vec<Finding>,
    pub numbering: Vec<Finding>,
    pub paragraph: Vec<Finding>,
    pub font: Vec<Finding>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.punctuation.len() + self.numbering.len() + self.paragraph.len() + self.font.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

pub(crate) fn analyze_model(model: &DocModel) -> Report {
    let body: Vec<&Paragraph> = model.body_paragraphs().collect();
    Report {
        punctuation: punctuation_findings(&body),
        numbering: numbering_findings(&body),
        paragraph: paragraph_findings(&body),
        font: font_findings(&body),
    }
}

fn punctuation_findings(body: &[&Paragraph]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, para) in body.iter().enumerate() {
        let text = &para.text;
        if text.trim().is_empty() || !has_cjk(text) {
            continue;
        }
        let n = idx + 1;
        let chars: Vec<char> = text.chars().collect();

        for (i, &c) in chars.iter().enumerate() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let kind = match c {
                '(' | ')' => Some(IssueKind::HalfWidthParen),
                '"' | '\'' => Some(IssueKind::HalfWidthQuote),
                ';' => Some(IssueKind::HalfWidthSemicolon),
                '?' => Some(IssueKind::HalfWidthQuestion),
                '!' => Some(IssueKind::HalfWidthBang),
                ':' => {
                    let prev_ok =
                        prev.is_some_and(|p| !p.is_ascii_digit() && !p.is_whitespace());
                    let next_ok =
                        next.is_some_and(|x| !x.is_ascii_digit() && x != '/' && x != '\\');
                    (prev_ok && next_ok).then_some(IssueKind::HalfWidthColon)
                }
                ',' => {
                    let prev_ok = prev.is_some_and(|p| !p.is_ascii_digit());
                    let next_ok = next.is_some_and(|x| !x.is_ascii_digit());
                    (prev_ok && next_ok).then_some(IssueKind::HalfWidthComma)
                }
                '.' => {
                    // a lone period right after an ideograph; dot runs are
                    // reported as malformed ellipses instead
                    (prev.is_some_and(|p| ('\u{4e00}'..='\u{9fff}').contains(&p))
                        && next != Some('.'))
                    .then_some(IssueKind::HalfWidthPeriod)
                }
                _ => None,
            };
            if let Some(kind) = kind {
                findings.push(Finding::at(kind, n, &c.to_string()));
            }
        }

        let mut dots = 0usize;
        let mut dashes = 0usize;
        for &c in chars.iter().chain(std::iter::once(&'\0')) {
            if c == '.' {
                dots += 1;
            } else {
                if dots >= 2 {
                    findings.push(Finding::at(IssueKind::BadEllipsis, n, &".".repeat(dots)));
                }
                dots = 0;
            }
            if c == '-' {
                dashes += 1;
            } else {
                if dashes >= 2 {
                    findings.push(Finding::at(IssueKind::BadDash, n, &"-".repeat(dashes)));
                }
                dashes = 0;
            }
        }
    }

    findings
}

fn numbering_findings(body: &[&Paragraph]) -> Vec<Finding> {
    let numbered: Vec<(usize, NumberingClass)> = body
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.text.trim().is_empty())
        .filter_map(|(i, p)| detect::numbering_class(&p.text).map(|c| (i + 1, c)))
        .filter(|(_, c)| c.is_arabic())
        .collect();

    let classes: HashSet<NumberingClass> = numbered.iter().map(|&(_, c)| c).collect();
    if classes.len() < 2 {
        return Vec::new();
    }

    // Dominant class: most frequent, earliest first seen on ties.
    let mut counts: Vec<(NumberingClass, usize, usize)> = Vec::new();
    for (pos, &(_, class)) in numbered.iter().enumerate() {
        match counts.iter_mut().find(|(c, _, _)| *c == class) {
            Some((_, count, _)) => *count += 1,
            None => counts.push((class, 1, pos)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    let dominant = counts[0].0;

    numbered
        .iter()
        .filter(|&&(_, class)| class != dominant)
        .map(|&(para, class)| Finding {
            kind: IssueKind::InconsistentNumbering,
            para: Some(para),
            fragment: Some(class.label().to_string()),
            detail: Some(format!(
                "与主导序号风格 {} 不一致",
                dominant.label()
            )),
        })
        .collect()
}

fn paragraph_findings(body: &[&Paragraph]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut spacing_values: HashSet<String> = HashSet::new();

    for (idx, para) in body.iter().enumerate() {
        let text = para.text.trim();
        // short paragraphs are usually headings or labels
        if text.is_empty() || text.chars().count() < 10 {
            continue;
        }
        if detect::is_no_indent_line(text, para.alignment) {
            continue;
        }
        // styled headings carry their indentation in the style
        if para
            .style_id
            .as_deref()
            .is_some_and(|id| id.starts_with("Heading") || id.starts_with("heading"))
        {
            continue;
        }

        if !para.has_first_line_indent() {
            findings.push(Finding {
                kind: IssueKind::MissingFirstLineIndent,
                para: Some(idx + 1),
                fragment: None,
                detail: None,
            });
        }
        if let Some(ls) = para.line_spacing {
            spacing_values.insert(spacing_key(ls));
        }
    }

    if spacing_values.len() > 1 {
        findings.push(Finding::document_wide(
            IssueKind::MixedLineSpacing,
            format!("存在 {} 种不同行距", spacing_values.len()),
        ));
    }

    findings
}

fn spacing_key(ls: LineSpacing) -> String {
    match ls {
        LineSpacing::Auto(m) => format!("{m}x"),
        LineSpacing::Exact(pt) => format!("{pt}pt"),
        LineSpacing::AtLeast(pt) => format!(">={pt}pt"),
    }
}

fn font_findings(body: &[&Paragraph]) -> Vec<Finding> {
    let mut names: HashSet<String> = HashSet::new();
    let mut sizes: HashSet<String> = HashSet::new();

    for para in body {
        if para.text.trim().is_empty() {
            continue;
        }
        for run in &para.runs {
            if run.text().trim().is_empty() {
                continue;
            }
            names.insert(run.font_name.clone());
            if let Some(ea) = &run.east_asia {
                names.insert(ea.clone());
            }
            sizes.insert(format!("{}", run.font_size));
        }
    }

    let mut findings = Vec::new();
    if names.len() > 4 {
        let mut sample: Vec<&String> = names.iter().collect();
        sample.sort();
        sample.truncate(5);
        findings.push(Finding::document_wide(
            IssueKind::TooManyFonts,
            format!(
                "检测到 {} 种字体: {}...",
                names.len(),
                sample
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }
    if sizes.len() > 4 {
        findings.push(Finding::document_wide(
            IssueKind::TooManySizes,
            format!("检测到 {} 种字号", sizes.len()),
        ));
    }
    findings
}

fn para_list(paras: &[usize]) -> String {
    if paras.len() > 5 {
        format!(
            "第{}、{}...{}段",
            paras[0],
            paras[1],
            paras[paras.len() - 1]
        )
    } else {
        let joined = paras
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("第{joined}段")
    }
}

fn render_group(out: &mut String, heading: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    let _ = writeln!(out, "【{heading}】共 {} 处", findings.len());
    // group by kind, keep paragraph lists compact
    let mut by_kind: BTreeMap<&'static str, Vec<&Finding>> = BTreeMap::new();
    for f in findings {
        by_kind.entry(f.kind.label()).or_default().push(f);
    }
    for (label, group) in by_kind {
        let mut paras: Vec<usize> = group.iter().filter_map(|f| f.para).collect();
        paras.sort_unstable();
        paras.dedup();
        if paras.is_empty() {
            let detail = group[0].detail.as_deref().unwrap_or("");
            let _ = writeln!(out, "  - {label}: {detail}");
        } else {
            let _ = writeln!(out, "  - {label}: {}", para_list(&paras));
        }
    }
    out.push('\n');
}

impl Report {
    /// The human-readable grouped report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out, "           格式诊断报告");
        let _ = writeln!(out, "{}", "=".repeat(50));
        out.push('\n');

        render_group(&mut out, "标点问题", &self.punctuation);
        render_group(&mut out, "序号问题", &self.numbering);
        render_group(&mut out, "段落问题", &self.paragraph);
        render_group(&mut out, "字体问题", &self.font);

        let _ = writeln!(out, "{}", "-".repeat(50));
        if self.is_clean() {
            let _ = writeln!(out, "OK 未发现明显格式问题");
        } else {
            let _ = writeln!(out, "共发现 {} 处格式问题", self.total());
            out.push('\n');
            let _ = writeln!(out, "建议：");
            if !self.punctuation.is_empty() {
                let _ = writeln!(out, "  - 运行 gongwen punctuation 修复标点问题");
            }
            if !self.paragraph.is_empty() || !self.font.is_empty() {
                let _ = writeln!(out, "  - 运行 gongwen format 统一段落和字体格式");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::styles::parse_styles;
    use crate::docx::{WML_NS, parse_document};

    fn model_of(paras: &[&str]) -> DocModel {
        let body: String = paras
            .iter()
            .map(|t| format!("<w:p><w:r><w:t>{t}</w:t></w:r></w:p>"))
            .collect();
        let src = format!(
            "<w:document xmlns:w=\"{WML_NS}\"><w:body>{body}</w:body></w:document>"
        );
        parse_document(&src, &parse_styles(None)).unwrap()
    }

    #[test]
    fn punctuation_pass_flags_half_width_marks() {
        let model = model_of(&["这是(测试)内容还有更多", "正常的一段中文内容没有问题。"]);
        let report = analyze_model(&model);
        assert_eq!(report.punctuation.len(), 2); // ( and )
        assert!(report
            .punctuation
            .iter()
            .all(|f| f.kind == IssueKind::HalfWidthParen && f.para == Some(1)));
    }

    #[test]
    fn colon_after_digit_is_ignored() {
        let model = model_of(&["时间是10:30这样正常的时刻"]);
        let report = analyze_model(&model);
        assert!(report.punctuation.is_empty());
    }

    #[test]
    fn latin_only_paragraphs_are_skipped() {
        let model = model_of(&["English only, with (marks) everywhere!"]);
        let report = analyze_model(&model);
        assert!(report.punctuation.is_empty());
    }

    #[test]
    fn ellipsis_and_dash_runs() {
        let model = model_of(&["然后就这样...结束了--完"]);
        let report = analyze_model(&model);
        let kinds: Vec<IssueKind> = report.punctuation.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&IssueKind::BadEllipsis));
        assert!(kinds.contains(&IssueKind::BadDash));
        // the dots of the ellipsis are not double-reported as periods
        assert!(!kinds.contains(&IssueKind::HalfWidthPeriod));
    }

    #[test]
    fn inconsistent_numbering_at_deviating_paragraph() {
        let model = model_of(&["1.第一项要求", "1、第二项要求", "1.第三项要求"]);
        let report = analyze_model(&model);
        assert_eq!(report.numbering.len(), 1);
        assert_eq!(report.numbering[0].para, Some(2));
        assert_eq!(report.numbering[0].kind, IssueKind::InconsistentNumbering);
    }

    #[test]
    fn uniform_numbering_is_clean() {
        let model = model_of(&["1.第一项", "2.第二项", "3.第三项"]);
        let report = analyze_model(&model);
        assert!(report.numbering.is_empty());
    }

    #[test]
    fn missing_indent_flagged_per_paragraph() {
        let model = model_of(&[
            "这是一段足够长的正文内容应当有缩进。",
            "短句",
            "另一段足够长的正文内容同样应当有缩进。",
        ]);
        let report = analyze_model(&model);
        let indents: Vec<&Finding> = report
            .paragraph
            .iter()
            .filter(|f| f.kind == IssueKind::MissingFirstLineIndent)
            .collect();
        assert_eq!(indents.len(), 2);
        assert_eq!(indents[0].para, Some(1));
        assert_eq!(indents[1].para, Some(3));
    }

    #[test]
    fn render_mentions_totals() {
        let model = model_of(&["这是(测试)的内容这里足够长了"]);
        let report = analyze_model(&model);
        let text = report.render();
        assert!(text.contains("格式诊断报告"));
        assert!(text.contains("英文括号"));
        assert!(text.contains("格式问题"));
    }

    #[test]
    fn clean_document_reports_ok() {
        let report = Report::default();
        assert!(report.is_clean());
        assert!(report.render().contains("未发现明显格式问题"));
    }
}
