use std::ops::Range;

/// An ordered set of splice edits over one XML part's text. Ranges refer to
/// byte offsets of the original text (roxmltree node ranges) and must not
/// overlap; insertions are zero-length ranges.
#[derive(Default)]
pub(crate) struct EditList {
    edits: Vec<(Range<usize>, String)>,
}

impl EditList {
    pub(crate) fn replace(&mut self, range: Range<usize>, replacement: String) {
        self.edits.push((range, replacement));
    }

    pub(crate) fn insert(&mut self, at: usize, content: String) {
        self.edits.push((at..at, content));
    }

    pub(crate) fn delete(&mut self, range: Range<usize>) {
        self.edits.push((range, String::new()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Splice all edits into `src`. Applied back-to-front so earlier offsets
    /// stay valid.
    pub(crate) fn apply(mut self, src: &str) -> String {
        self.edits.sort_by_key(|(r, _)| (r.start, r.end));
        debug_assert!(
            self.edits
                .windows(2)
                .all(|w| w[0].0.end <= w[1].0.start),
            "overlapping XML edits"
        );
        let mut out = src.to_string();
        for (range, replacement) in self.edits.into_iter().rev() {
            out.replace_range(range, &replacement);
        }
        out
    }
}

/// Escape text content for an XML text node.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a double-quoted XML attribute.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Byte offset just past the `>` of the start tag beginning at `start`.
/// Quote-aware: `>` inside attribute values does not terminate the tag.
pub(crate) fn start_tag_end(src: &str, start: usize) -> usize {
    let bytes = src.as_bytes();
    debug_assert_eq!(bytes.get(start), Some(&b'<'));
    let mut quote: Option<u8> = None;
    for (off, &b) in bytes[start..].iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (None, b'>') => return start + off + 1,
            _ => {}
        }
    }
    src.len()
}

/// The tag name as written in the source (prefix included), e.g. `w:pPr`.
pub(crate) fn element_tag<'a>(src: &'a str, range: &Range<usize>) -> &'a str {
    let slice = &src[range.start + 1..range.end];
    let end = slice
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(slice.len());
    &slice[..end]
}

/// Byte range of an element's inner content, or `None` for a self-closing
/// element.
pub(crate) fn inner_range(src: &str, range: &Range<usize>) -> Option<Range<usize>> {
    let open_end = start_tag_end(src, range.start);
    if open_end >= range.end {
        return None; // <w:x/>
    }
    let tag = element_tag(src, range);
    let close_len = tag.len() + 3; // </tag>
    Some(open_end..range.end - close_len)
}
