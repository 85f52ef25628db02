//! Punctuation script normalization.
//!
//! Each mark's target script is decided by the nearest non-punctuation
//! character on either side: a CJK ideograph forces the full-width form, an
//! otherwise Latin/digit context forces the half-width form, and marks with
//! no usable context are left alone. Paired marks (parentheses, quotes)
//! resolve as one unit so the output never mixes scripts within a pair.
//! Ellipsis and dash runs are fixed-token replacements, not per-character.

use std::sync::LazyLock;

use regex::Regex;

use crate::docx::edit::{EditList, element_tag, escape_text};
use crate::model::DocModel;

/// One text replacement, in byte offsets of a paragraph's merged run text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixSummary {
    pub paragraphs: usize,
    pub table_cells: usize,
}

impl FixSummary {
    pub fn total(&self) -> usize {
        self.paragraphs + self.table_cells
    }
}

const LEFT_DOUBLE: char = '\u{201c}'; // “
const RIGHT_DOUBLE: char = '\u{201d}'; // ”
const LEFT_SINGLE: char = '\u{2018}'; // ‘
const RIGHT_SINGLE: char = '\u{2019}'; // ’

/// Every character treated as a double-quote pair member.
const DOUBLE_QUOTES: &[char] = &[
    '"', '\u{201c}', '\u{201d}', '\u{201e}', '\u{201f}', '\u{300c}', '\u{300d}',
];
const SINGLE_QUOTES: &[char] = &['\'', '\u{2018}', '\u{2019}', '\u{201a}', '\u{201b}'];

static RE_DOT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
static RE_JU_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"。{2,}").unwrap());
static RE_DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}|—+").unwrap());

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_western(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

pub(crate) fn has_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Script {
    Chinese,
    Western,
}

/// Nearest classifiable character at or before `i` (exclusive), skipping
/// punctuation, whitespace and symbols.
fn scan_left(chars: &[(usize, char)], i: usize) -> Option<Script> {
    chars[..i].iter().rev().find_map(|&(_, c)| {
        if is_cjk(c) {
            Some(Script::Chinese)
        } else if is_western(c) {
            Some(Script::Western)
        } else {
            None
        }
    })
}

fn scan_right(chars: &[(usize, char)], i: usize) -> Option<Script> {
    chars[i..].iter().find_map(|&(_, c)| {
        if is_cjk(c) {
            Some(Script::Chinese)
        } else if is_western(c) {
            Some(Script::Western)
        } else {
            None
        }
    })
}

/// Adjacency rule for a mark occupying `[i, j)`: CJK on either side wins,
/// then Latin/digit, then no verdict.
fn classify(chars: &[(usize, char)], i: usize, j: usize) -> Option<Script> {
    match (scan_left(chars, i), scan_right(chars, j)) {
        (Some(Script::Chinese), _) | (_, Some(Script::Chinese)) => Some(Script::Chinese),
        (None, None) => None,
        _ => Some(Script::Western),
    }
}

fn to_chinese(c: char) -> Option<char> {
    Some(match c {
        ',' => '，',
        ':' => '：',
        ';' => '；',
        '?' => '？',
        '!' => '！',
        '(' => '（',
        ')' => '）',
        _ => return None,
    })
}

fn to_western(c: char) -> Option<char> {
    Some(match c {
        '，' => ',',
        '：' => ':',
        '；' => ';',
        '？' => '?',
        '！' => '!',
        '（' => '(',
        '）' => ')',
        '。' => '.',
        _ => return None,
    })
}

fn byte_end(chars: &[(usize, char)], ci: usize, text_len: usize) -> usize {
    chars.get(ci + 1).map(|&(b, _)| b).unwrap_or(text_len)
}

/// Compute the normalization edits for one paragraph's merged text.
/// Returned edits are sorted and non-overlapping.
pub(crate) fn compute_edits(text: &str) -> Vec<Edit> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut covered = vec![false; chars.len()];
    let mut edits: Vec<Edit> = Vec::new();

    let char_index_of = |byte: usize| chars.partition_point(|&(b, _)| b < byte);

    let push = |edits: &mut Vec<Edit>, covered: &mut [bool], ci: usize, cj: usize, replacement: String| {
        let start = chars[ci].0;
        let end = byte_end(&chars, cj - 1, text.len());
        if &text[start..end] != replacement {
            edits.push(Edit {
                start,
                end,
                replacement,
            });
        }
        covered[ci..cj].iter_mut().for_each(|c| *c = true);
    };

    // Fixed multi-character tokens first: ellipsis and dash runs are
    // replaced atomically, never mark-by-mark.
    for m in RE_DOT_RUN.find_iter(text) {
        let (ci, cj) = (char_index_of(m.start()), char_index_of(m.end()));
        if classify(&chars, ci, cj) == Some(Script::Chinese) {
            push(&mut edits, &mut covered, ci, cj, "……".into());
        } else {
            covered[ci..cj].iter_mut().for_each(|c| *c = true);
        }
    }
    for m in RE_JU_RUN.find_iter(text) {
        let (ci, cj) = (char_index_of(m.start()), char_index_of(m.end()));
        push(&mut edits, &mut covered, ci, cj, "……".into());
    }
    for m in RE_DASH_RUN.find_iter(text) {
        let (ci, cj) = (char_index_of(m.start()), char_index_of(m.end()));
        // "--" and a lone "—" need Chinese context to become a dash; an
        // em-dash run of 2+ is already Chinese-script and is only collapsed
        // to the standard two-em form.
        let convert = (m.as_str().starts_with('—') && cj - ci >= 2)
            || classify(&chars, ci, cj) == Some(Script::Chinese);
        if convert {
            push(&mut edits, &mut covered, ci, cj, "——".into());
        } else {
            covered[ci..cj].iter_mut().for_each(|c| *c = true);
        }
    }

    // Parenthesis pairs resolve as a unit.
    let mut stack: Vec<usize> = Vec::new();
    let mut paren_pairs: Vec<(usize, usize)> = Vec::new();
    for (ci, &(_, c)) in chars.iter().enumerate() {
        if covered[ci] {
            continue;
        }
        match c {
            '(' | '（' => stack.push(ci),
            ')' | '）' => {
                if let Some(open) = stack.pop() {
                    paren_pairs.push((open, ci));
                }
            }
            _ => {}
        }
    }
    for (open, close) in paren_pairs {
        let inner_cjk = chars[open + 1..close].iter().any(|&(_, c)| is_cjk(c));
        let inner_western = chars[open + 1..close].iter().any(|&(_, c)| is_western(c));
        let script = if inner_cjk
            || scan_left(&chars, open) == Some(Script::Chinese)
            || scan_right(&chars, close + 1) == Some(Script::Chinese)
        {
            Some(Script::Chinese)
        } else if inner_western
            || scan_left(&chars, open).is_some()
            || scan_right(&chars, close + 1).is_some()
        {
            Some(Script::Western)
        } else {
            None
        };
        let (o, c) = match script {
            Some(Script::Chinese) => ('（', '）'),
            Some(Script::Western) => ('(', ')'),
            None => {
                covered[open] = true;
                covered[close] = true;
                continue;
            }
        };
        push(&mut edits, &mut covered, open, open + 1, o.to_string());
        push(&mut edits, &mut covered, close, close + 1, c.to_string());
    }

    // Quote pairing is positional: 1st/3rd/... member opens, 2nd/4th/...
    // closes. Each pair gets one script so the output never mismatches.
    for (set, chinese, western) in [
        (DOUBLE_QUOTES, (LEFT_DOUBLE, RIGHT_DOUBLE), '"'),
        (SINGLE_QUOTES, (LEFT_SINGLE, RIGHT_SINGLE), '\''),
    ] {
        let positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|&(ci, &(_, c))| !covered[ci] && set.contains(&c))
            .map(|(ci, _)| ci)
            .collect();
        for pair in positions.chunks(2) {
            match pair {
                &[open, close] => {
                    let inner_cjk = chars[open + 1..close].iter().any(|&(_, c)| is_cjk(c));
                    let inner_western =
                        chars[open + 1..close].iter().any(|&(_, c)| is_western(c));
                    if inner_cjk
                        || scan_left(&chars, open) == Some(Script::Chinese)
                        || scan_right(&chars, close + 1) == Some(Script::Chinese)
                    {
                        push(&mut edits, &mut covered, open, open + 1, chinese.0.to_string());
                        push(&mut edits, &mut covered, close, close + 1, chinese.1.to_string());
                    } else if inner_western
                        || scan_left(&chars, open).is_some()
                        || scan_right(&chars, close + 1).is_some()
                    {
                        push(&mut edits, &mut covered, open, open + 1, western.to_string());
                        push(&mut edits, &mut covered, close, close + 1, western.to_string());
                    } else {
                        covered[open] = true;
                        covered[close] = true;
                    }
                }
                &[lone] => match classify(&chars, lone, lone + 1) {
                    Some(Script::Chinese) => {
                        push(&mut edits, &mut covered, lone, lone + 1, chinese.0.to_string());
                    }
                    Some(Script::Western) => {
                        push(&mut edits, &mut covered, lone, lone + 1, western.to_string());
                    }
                    None => covered[lone] = true,
                },
                _ => unreachable!(),
            }
        }
    }

    // Single marks by adjacency.
    for ci in 0..chars.len() {
        if covered[ci] {
            continue;
        }
        let (byte, c) = chars[ci];
        let prev = ci.checked_sub(1).map(|i| chars[i].1);
        let next = chars.get(ci + 1).map(|&(_, c)| c);

        match c {
            // Decimal points and digit group separators stay.
            ',' | '.' if prev.is_some_and(|p| p.is_ascii_digit())
                && next.is_some_and(|n| n.is_ascii_digit()) => {}
            '.' => {
                // An English period ends a Chinese clause only when nothing
                // Latin follows it directly (so "中文.com" survives).
                if prev.is_some_and(is_cjk)
                    && next != Some('.')
                    && !next.is_some_and(|n| n.is_ascii_alphanumeric())
                {
                    edits.push(Edit {
                        start: byte,
                        end: byte + 1,
                        replacement: "。".into(),
                    });
                }
            }
            _ => {
                let target = match classify(&chars, ci, ci + 1) {
                    Some(Script::Chinese) => to_chinese(c),
                    Some(Script::Western) => to_western(c),
                    None => None,
                };
                if let Some(t) = target
                    && t != c
                {
                    edits.push(Edit {
                        start: byte,
                        end: byte_end(&chars, ci, text.len()),
                        replacement: t.to_string(),
                    });
                }
            }
        }
    }

    edits.sort_by_key(|e| e.start);
    edits
}

/// Apply edits to the merged text (test and reporting helper).
pub(crate) fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for e in edits {
        out.push_str(&text[pos..e.start]);
        out.push_str(&e.replacement);
        pos = e.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Convenience for callers that fix a standalone string.
pub fn fix_text(text: &str) -> String {
    apply_edits(text, &compute_edits(text))
}

/// Map edits on the merged text back onto the original spans. An edit that
/// starts inside span `k` contributes its replacement to span `k`; any tail
/// it consumes from later spans is dropped there. Concatenating the result
/// always equals `apply_edits(text, edits)`.
pub(crate) fn redistribute(text: &str, spans: &[(usize, usize)], edits: &[Edit]) -> Vec<String> {
    spans
        .iter()
        .map(|&(a, b)| {
            let mut s = String::new();
            let mut pos = a;
            for e in edits {
                if e.end <= a || e.start >= b {
                    continue;
                }
                if e.start >= a {
                    s.push_str(&text[pos..e.start]);
                    s.push_str(&e.replacement);
                }
                pos = e.end.min(b).max(pos);
            }
            s.push_str(&text[pos..b]);
            s
        })
        .collect()
}

/// Build the rewritten word/document.xml, if anything changed.
pub(crate) fn fix_document_xml(src: &str, model: &DocModel) -> (Option<String>, FixSummary) {
    let mut list = EditList::default();
    let mut summary = FixSummary::default();

    for para in &model.paragraphs {
        if para.text.trim().is_empty() {
            continue;
        }
        let edits = compute_edits(&para.text);
        if edits.is_empty() {
            continue;
        }

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut offset = 0;
        for run in &para.runs {
            for t in &run.texts {
                spans.push((offset, offset + t.text.len()));
                offset += t.text.len();
            }
        }
        let new_texts = redistribute(&para.text, &spans, &edits);

        let mut changed = false;
        for (span, new_text) in para
            .runs
            .iter()
            .flat_map(|r| r.texts.iter())
            .zip(new_texts)
        {
            if span.text == new_text {
                continue;
            }
            let tag = element_tag(src, &span.elem_range);
            let replacement = if new_text.is_empty() {
                format!("<{tag}/>")
            } else {
                format!(
                    "<{tag} xml:space=\"preserve\">{}</{tag}>",
                    escape_text(&new_text)
                )
            };
            list.replace(span.elem_range.clone(), replacement);
            changed = true;
        }
        if changed {
            if para.in_table {
                summary.table_cells += 1;
            } else {
                summary.paragraphs += 1;
            }
            log::debug!("punctuation: fixed {:?}", preview(&para.text));
        }
    }

    if list.is_empty() {
        (None, summary)
    } else {
        (Some(list.apply(src)), summary)
    }
}

fn preview(text: &str) -> String {
    let mut p: String = text.chars().take(25).collect();
    if p.len() < text.len() {
        p.push('…');
    }
    p
}
