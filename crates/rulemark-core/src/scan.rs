//! Low-level scanning helpers shared by the built-in matchers.
//!
//! Matchers are hand-coded anchored scanners over bytes, using `memchr`
//! for the hot newline/delimiter hops. The helpers here encode the few
//! shapes nearly every block rule needs: end-of-line runs, blank-line
//! terminators, and the line-start test against the previous capture.

use memchr::memchr;

/// Length of the current line in `s`, excluding the newline.
#[inline]
pub(crate) fn line_len(s: &str) -> usize {
    memchr(b'\n', s.as_bytes()).unwrap_or(s.len())
}

/// Whether a line body is whitespace-only.
#[inline]
pub(crate) fn is_blank_line(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Match `\n( *\n)*` at byte `j`: one newline, greedily extended through
/// any following whitespace-only lines. Returns the end offset.
pub(crate) fn line_end_run(s: &str, j: usize) -> Option<usize> {
    let b = s.as_bytes();
    if b.get(j) != Some(&b'\n') {
        return None;
    }
    let mut end = j + 1;
    loop {
        let mut k = end;
        while b.get(k) == Some(&b' ') {
            k += 1;
        }
        if b.get(k) == Some(&b'\n') {
            end = k + 1;
        } else {
            return Some(end);
        }
    }
}

/// Match `\n( *\n)+` at byte `j`: a blank-line terminator (at least two
/// newlines with only spaces between). Returns the end offset.
pub(crate) fn blank_run(s: &str, j: usize) -> Option<usize> {
    let end = line_end_run(s, j)?;
    if end > j + 1 {
        Some(end)
    } else {
        None
    }
}

/// Line-start test against the previous top-level capture: true at the
/// start of a run, or when the previous capture ended with a newline
/// followed only by spaces.
pub(crate) fn at_line_start(prev: Option<&str>) -> bool {
    match prev {
        None => true,
        Some(p) => {
            let tail = match p.rfind('\n') {
                Some(i) => &p[i + 1..],
                None => p,
            };
            tail.bytes().all(|b| b == b' ')
        }
    }
}

/// Whether the source ends with a blank line (`\n` preceded by a
/// whitespace-only line), which selects block mode for the implicit entry
/// point.
pub(crate) fn ends_with_blank_line(s: &str) -> bool {
    let Some(body) = s.strip_suffix('\n') else {
        return false;
    };
    if body.is_empty() {
        return false;
    }
    let tail = match body.rfind('\n') {
        Some(i) => &body[i + 1..],
        None => return false,
    };
    tail.bytes().all(|b| b == b' ')
}

/// Byte length of the UTF-8 character starting at `i`.
#[inline]
pub(crate) fn char_len_at(s: &str, i: usize) -> usize {
    s[i..].chars().next().map_or(1, char::len_utf8)
}

/// ASCII word byte, the `\w` class: letters, digits, underscore.
#[inline]
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Strip backslash escapes from a URL target: `\X` becomes `X` for any
/// non-alphanumeric, non-whitespace `X`.
pub(crate) fn unescape_url(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    let mut chars = target.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if !next.is_alphanumeric() && !next.is_whitespace() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Split a table row on `|` characters that are not backslash-escaped.
pub(crate) fn split_unescaped_pipes(row: &str) -> Vec<&str> {
    let b = row.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'|' => {
                cells.push(&row[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    cells.push(&row[start.min(row.len())..]);
    cells
}
