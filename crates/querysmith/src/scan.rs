//! Quote- and parenthesis-aware cursor over raw SQL text.
//!
//! Every search in this crate goes through [`Scanner`], which tracks three
//! independent pieces of state while advancing:
//!
//! - the quote character of the string literal it is inside (`'` or `"`),
//! - whether it is inside a backtick-quoted identifier,
//! - the parenthesis depth relative to where the scan started.
//!
//! Only bytes seen with all three at "top level" are reported. All delimiters
//! the scanner reacts to are ASCII, so byte offsets it returns are always valid
//! `str` slice boundaries.

/// Cursor yielding the offsets of top-level bytes.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    quote: Option<u8>,
    backtick: bool,
    depth: u32,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Start scanning `text` at byte offset `start` (at top level).
    pub(crate) fn new(text: &'a str, start: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: start.min(text.len()),
            quote: None,
            backtick: false,
            depth: 0,
            done: false,
        }
    }

    /// Advance to the next top-level byte and return its offset.
    ///
    /// An opening `(` at top level is reported before the scanner descends into
    /// the group. A `)` that would take the depth below zero ends the scan: it
    /// closes the group the scan started in.
    pub(crate) fn next_top_level(&mut self) -> Option<usize> {
        while !self.done && self.pos < self.bytes.len() {
            let i = self.pos;
            let b = self.bytes[i];
            self.pos += 1;

            if let Some(q) = self.quote {
                if b == b'\\' {
                    self.pos += 1;
                } else if b == q {
                    self.quote = None;
                }
                continue;
            }
            if self.backtick {
                if b == b'`' {
                    self.backtick = false;
                }
                continue;
            }

            match b {
                b'\'' | b'"' => self.quote = Some(b),
                b'`' => self.backtick = true,
                b'(' => {
                    self.depth += 1;
                    if self.depth == 1 {
                        return Some(i);
                    }
                }
                b')' => {
                    if self.depth == 0 {
                        self.done = true;
                        return None;
                    }
                    self.depth -= 1;
                }
                _ if self.depth == 0 => return Some(i),
                _ => {}
            }
        }
        None
    }
}

impl Iterator for Scanner<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.next_top_level()
    }
}

/// Bytes that may appear inside an unquoted MySQL identifier.
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Match `keyword` (case-insensitive, words separated by any whitespace) at
/// `at`, returning the end offset of the match.
///
/// Both ends must sit on a word boundary, so `FROM` never matches `FROMAGE`
/// and `SET` never matches `OFFSET`.
pub(crate) fn keyword_at(text: &str, at: usize, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if at > 0 {
        let prev = bytes[at - 1];
        if is_ident_byte(prev) || matches!(prev, b'.' | b':' | b'@' | b'`') {
            return None;
        }
    }

    let mut pos = at;
    for (n, word) in keyword.split_whitespace().enumerate() {
        if n > 0 {
            let ws_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos == ws_start {
                return None;
            }
        }
        let end = pos + word.len();
        if end > bytes.len() || !bytes[pos..end].eq_ignore_ascii_case(word.as_bytes()) {
            return None;
        }
        pos = end;
    }

    if pos < bytes.len() && is_ident_byte(bytes[pos]) {
        return None;
    }
    Some(pos)
}

/// Find the next top-level occurrence of `keyword` at or after `from`.
pub(crate) fn find_keyword(text: &str, from: usize, keyword: &str) -> Option<(usize, usize)> {
    find_any_keyword(text, from, &[keyword]).map(|(start, end, _)| (start, end))
}

/// Find the earliest top-level occurrence of any of `keywords`.
///
/// When several keywords match at the same offset the first one listed wins,
/// so longer forms (`LEFT OUTER JOIN`) should be listed before their prefixes.
/// Returns `(start, end, index into keywords)`.
pub(crate) fn find_any_keyword(
    text: &str,
    from: usize,
    keywords: &[&str],
) -> Option<(usize, usize, usize)> {
    let bytes = text.as_bytes();
    Scanner::new(text, from)
        .filter(|&i| bytes[i].is_ascii_alphabetic() || bytes[i] == b'_')
        .find_map(|i| {
            keywords
                .iter()
                .enumerate()
                .find_map(|(k, kw)| keyword_at(text, i, kw).map(|end| (i, end, k)))
        })
}

/// Find the next top-level occurrence of the byte `ch` at or after `from`.
pub(crate) fn find_char(text: &str, from: usize, ch: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    Scanner::new(text, from).find(|&i| bytes[i] == ch)
}

/// Given the offset of a `(`, return the offset of its matching `)`.
pub(crate) fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut scanner = Scanner::new(text, open + 1);
    while scanner.next_top_level().is_some() {}
    // The scan ends either at end of text or right after the closing paren.
    if scanner.done {
        Some(scanner.pos - 1)
    } else {
        None
    }
}

/// Split `text` on top-level `sep` bytes, trimming each item and dropping
/// empty ones. `SUM(a, b)` and `'a,b'` are never split.
pub(crate) fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut start = 0;
    for i in Scanner::new(text, 0).filter(|&i| bytes[i] == sep) {
        items.push(text[start..i].trim());
        start = i + 1;
    }
    items.push(text[start..].trim());
    items.retain(|s| !s.is_empty());
    items
}

/// Whether `text` (after leading whitespace) starts with the keyword.
pub(crate) fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let trimmed = text.trim_start();
    let offset = text.len() - trimmed.len();
    keyword_at(text, offset, keyword).is_some()
}
