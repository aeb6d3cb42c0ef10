//! Block-level rules.
//!
//! Every matcher is an anchored scanner over the remaining source. Block
//! rules only run in block mode; the ones whose legality depends on sitting
//! at a line start (`list`, `def`) additionally consult the previous
//! capture.

use memchr::memchr;

use crate::ast::{Alignment, Node};
use crate::engine::Parser;
use crate::error::ParseError;
use crate::rule::{Capture, ModeSet, Output, Rule};
use crate::rules::order;
use crate::scan;
use crate::state::{normalize_label, Mode, RefTable, State};

/// ATX heading: `^ *#{1,6}` plus the rest of the line. Seven or more `#`
/// clamp to level 6, the excess becoming content. Trailing `#` runs and
/// spaces are stripped.
pub struct Heading;

impl Rule for Heading {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn order(&self) -> u16 {
        order::HEADING
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let hashes = i;
        while b.get(i) == Some(&b'#') && i - hashes < 6 {
            i += 1;
        }
        let level = i - hashes;
        if level == 0 {
            return None;
        }
        let line_end = i + scan::line_len(&src[i..]);
        let body = src[i..line_end]
            .trim_end_matches(' ')
            .trim_end_matches('#');
        if body.is_empty() {
            return None;
        }
        let end = scan::line_end_run(src, line_end)?;
        Some(Capture::new(
            &src[..end],
            vec![Some("#".repeat(level)), Some(body.to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let level = capture.group_or_empty(1).len() as u8;
        let body = capture.group_or_empty(2).trim();
        let content = parser.recurse(body, state, Mode::SimpleInline)?;
        Ok(Node::Heading { level, content }.into())
    }
}

/// Setext heading: a body line underlined with three or more `=` (level 1)
/// or `-` (level 2). Two or fewer underline characters never qualify.
pub struct LHeading;

impl Rule for LHeading {
    fn name(&self) -> &'static str {
        "lheading"
    }

    fn order(&self) -> u16 {
        order::LHEADING
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let body_len = scan::line_len(src);
        if body_len == 0 || b.get(body_len) != Some(&b'\n') {
            return None;
        }
        let mut i = body_len + 1;
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let mark = i;
        let mut last = 0u8;
        while let Some(&c) = b.get(i) {
            if c == b'=' || c == b'-' {
                last = c;
                i += 1;
            } else {
                break;
            }
        }
        if i - mark < 3 {
            return None;
        }
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let end = scan::line_end_run(src, i)?;
        let level = if last == b'=' { "1" } else { "2" };
        Some(Capture::new(
            &src[..end],
            vec![Some(src[..body_len].to_string()), Some(level.to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let level = if capture.group_or_empty(2) == "1" { 1 } else { 2 };
        let content = parser.recurse(capture.group_or_empty(1), state, Mode::SimpleInline)?;
        Ok(Node::Heading { level, content }.into())
    }
}

/// Horizontal rule: three or more `-`, `*`, or `_` separated by optional
/// spaces, alone on a line.
pub struct Hr;

impl Rule for Hr {
    fn name(&self) -> &'static str {
        "hr"
    }

    fn order(&self) -> u16 {
        order::HR
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        let mut count = 0;
        loop {
            let mut j = i;
            while b.get(j) == Some(&b' ') {
                j += 1;
            }
            match b.get(j) {
                Some(&c) if c == b'-' || c == b'*' || c == b'_' => {
                    i = j + 1;
                    count += 1;
                }
                _ => break,
            }
        }
        if count < 3 {
            return None;
        }
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let end = scan::line_end_run(src, i)?;
        Some(Capture::span(&src[..end]))
    }

    fn parse(&self, _: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::Hr.into())
    }
}

/// Indented code block: contiguous lines prefixed with four spaces
/// (interior blank lines allowed), terminated by a blank line. The indent
/// is stripped; `lang` is always absent.
pub struct CodeBlock;

impl Rule for CodeBlock {
    fn name(&self) -> &'static str {
        "codeBlock"
    }

    fn order(&self) -> u16 {
        order::CODE_BLOCK
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let mut i = 0;
        // (end of match, end of last content line); only positions where a
        // blank run (or the end of input) follows are valid stops
        let mut best: Option<(usize, usize)> = None;
        loop {
            if !src[i..].starts_with("    ") {
                break;
            }
            let ll = scan::line_len(&src[i..]);
            if ll <= 4 {
                break;
            }
            let content_end = i + ll;
            match scan::line_end_run(src, content_end) {
                None => {
                    best = Some((content_end, content_end));
                    break;
                }
                Some(e) => {
                    if e > content_end + 1 {
                        best = Some((e, content_end));
                    }
                    i = e;
                }
            }
        }
        let (end, content_end) = best?;
        Some(Capture::new(
            &src[..end],
            vec![Some(src[..content_end].to_string())],
        ))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        let content = capture
            .group_or_empty(1)
            .split('\n')
            .map(|line| line.strip_prefix("    ").unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Node::CodeBlock {
            lang: None,
            content,
        }
        .into())
    }
}

/// Fenced code block: a backtick or tilde fence of three or more
/// characters, an optional language token, verbatim content, and a closing
/// fence of the same characters.
pub struct Fence;

impl Rule for Fence {
    fn name(&self) -> &'static str {
        "fence"
    }

    fn order(&self) -> u16 {
        order::FENCE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let fence_char = match b.get(i).copied() {
            Some(c @ (b'`' | b'~')) => c,
            _ => return None,
        };
        let fence_start = i;
        while b.get(i) == Some(&fence_char) {
            i += 1;
        }
        let n = i - fence_start;
        if n < 3 {
            return None;
        }
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let lang_start = i;
        while let Some(&c) = b.get(i) {
            if c == b'\n' || c == b' ' {
                break;
            }
            i += 1;
        }
        let lang = (i > lang_start).then(|| src[lang_start..i].to_string());
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        if b.get(i) != Some(&b'\n') {
            return None;
        }
        let content_start = i + 1;
        let fence = src[fence_start..fence_start + n].to_string();

        let mut search = content_start;
        loop {
            let found = src[search..].find(&fence)? + search;
            let mut j = found + n;
            while b.get(j) == Some(&b' ') {
                j += 1;
            }
            if let Some(end) = scan::line_end_run(src, j) {
                // a newline immediately before the closer belongs to the
                // fence, unless it is the only content
                let mut ce = found;
                if ce > content_start + 1 && b[ce - 1] == b'\n' {
                    ce -= 1;
                }
                if ce > content_start {
                    return Some(Capture::new(
                        &src[..end],
                        vec![lang, Some(src[content_start..ce].to_string())],
                    ));
                }
            }
            search = found + 1;
        }
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::CodeBlock {
            lang: capture.group_owned(1),
            content: capture.group_or_empty(2).to_string(),
        }
        .into())
    }
}

/// Block quote: a run of `>`-prefixed lines (plus lazy continuation lines
/// and blank-separated `>` groups). The `^ *> ?` prefix is stripped from
/// each line and the body re-parsed in block mode.
pub struct BlockQuote;

impl Rule for BlockQuote {
    fn name(&self) -> &'static str {
        "blockQuote"
    }

    fn order(&self) -> u16 {
        order::BLOCK_QUOTE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        loop {
            let mut j = i;
            while b.get(j) == Some(&b' ') {
                j += 1;
            }
            if b.get(j) != Some(&b'>') {
                break;
            }
            let ll = scan::line_len(&src[j..]);
            if ll < 2 {
                break;
            }
            i = j + ll;
            // lazy continuation: any following non-empty lines
            while b.get(i) == Some(&b'\n') {
                let ls = i + 1;
                let next = scan::line_len(&src[ls..]);
                if next == 0 {
                    break;
                }
                i = ls + next;
            }
            while b.get(i) == Some(&b'\n') {
                i += 1;
            }
        }
        if i == 0 {
            None
        } else {
            Some(Capture::span(&src[..i]))
        }
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let mut inner = String::with_capacity(capture.len());
        for line in capture.whole().split_inclusive('\n') {
            let t = line.trim_start_matches(' ');
            if let Some(rest) = t.strip_prefix('>') {
                inner.push_str(rest.strip_prefix(' ').unwrap_or(rest));
            } else {
                inner.push_str(line);
            }
        }
        let content = parser.recurse(&inner, state, Mode::Block)?;
        Ok(Node::BlockQuote { content }.into())
    }
}

/// End of the bullet token starting at `start`: `*`, `-`, `+`, or digits
/// followed by `.`.
fn bullet_end(b: &[u8], start: usize) -> Option<usize> {
    match b.get(start).copied() {
        Some(b'*' | b'+' | b'-') => Some(start + 1),
        Some(c) if c.is_ascii_digit() => {
            let mut i = start;
            while b.get(i).is_some_and(|d| d.is_ascii_digit()) {
                i += 1;
            }
            (b.get(i) == Some(&b'.')).then_some(i + 1)
        }
        _ => None,
    }
}

/// Whether a line starting at `pos` opens a list item at exactly `indent`:
/// the indent string, a bullet token, and a space.
fn item_bullet_at(src: &str, pos: usize, indent: &str) -> bool {
    if !src[pos..].starts_with(indent) {
        return false;
    }
    let b = src.as_bytes();
    bullet_end(b, pos + indent.len()).is_some_and(|e| b.get(e) == Some(&b' '))
}

/// Strip the ` *\n+` run from the end of an item body, if present.
fn strip_item_end(content: &str) -> Option<&str> {
    let no_newlines = content.trim_end_matches('\n');
    if no_newlines.len() == content.len() {
        return None;
    }
    Some(no_newlines.trim_end_matches(' '))
}

/// List: a run of bullet items. The block extends to the first double
/// newline that opens neither an indented continuation nor another bullet
/// at the list's indent. Tight items parse inline with a trailing newline;
/// loose items parse in block mode, wrapped in paragraphs.
pub struct List;

impl List {
    fn split_items(source: &str) -> Vec<&str> {
        let b = source.as_bytes();
        let mut items = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            let mut j = pos;
            while b.get(j) == Some(&b' ') {
                j += 1;
            }
            let Some(be) = bullet_end(b, j) else { break };
            if b.get(be) != Some(&b' ') {
                break;
            }
            let indent = &source[pos..j];
            let mut i = pos + scan::line_len(&source[pos..]);
            // continuation lines, until another bullet at this indent
            while b.get(i) == Some(&b'\n') {
                let ls = i + 1;
                if item_bullet_at(source, ls, indent) {
                    break;
                }
                i = ls + scan::line_len(&source[ls..]);
            }
            if b.get(i) == Some(&b'\n') {
                i += 1;
            }
            items.push(&source[pos..i]);
            pos = i;
        }
        items
    }

    /// De-indent an item and drop its bullet prefix: every line loses up
    /// to `width` leading spaces, the first line loses the whole prefix.
    fn item_content(item: &str, width: usize) -> String {
        let mut content = String::with_capacity(item.len());
        for (n, line) in item.split_inclusive('\n').enumerate() {
            if n == 0 {
                content.push_str(&line[width.min(line.len())..]);
            } else {
                let mut s = 0;
                while s < width && line.as_bytes().get(s) == Some(&b' ') {
                    s += 1;
                }
                content.push_str(&line[s..]);
            }
        }
        content
    }
}

impl Rule for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn order(&self) -> u16 {
        order::LIST
    }

    fn modes(&self) -> ModeSet {
        // matches in inline modes too when nested inside a list item
        ModeSet::ALL
    }

    fn try_match(&self, src: &str, state: &State, prev: Option<&str>) -> Option<Capture> {
        if !(state.in_list || state.mode == Mode::Block) {
            return None;
        }
        if !scan::at_line_start(prev) {
            return None;
        }
        let b = src.as_bytes();
        let mut i = 0;
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        let indent = &src[..i];
        let be = bullet_end(b, i)?;
        if b.get(be) != Some(&b' ') {
            return None;
        }
        let bullet = &src[i..be];
        if be + 1 >= src.len() {
            return None;
        }

        // extent: first `\n{2,}` followed by neither an indented line nor a
        // bullet at this indent; otherwise the whole remaining source
        let mut end = src.len();
        let mut k = be + 1;
        while k < src.len() {
            if b[k] != b'\n' {
                k += 1;
                continue;
            }
            let mut r = k;
            while b.get(r) == Some(&b'\n') {
                r += 1;
            }
            if r - k >= 2
                && b.get(r) != Some(&b' ')
                && !item_bullet_at(src, r.min(src.len()), indent)
            {
                end = r;
                break;
            }
            k = r;
        }

        Some(Capture::new(
            &src[..end],
            vec![Some(indent.to_string()), Some(bullet.to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let bullet = capture.group_or_empty(2);
        let ordered = bullet.len() > 1;
        let start = if ordered {
            bullet[..bullet.len() - 1].parse::<u32>().ok()
        } else {
            None
        };

        // normalize the trailing blank run to a single newline
        let whole = capture.whole();
        let trimmed = whole.trim_end_matches('\n');
        let source = if whole.len() - trimmed.len() >= 2 {
            let mut s = String::with_capacity(trimmed.len() + 1);
            s.push_str(trimmed);
            s.push('\n');
            s
        } else {
            whole.to_string()
        };

        let raw_items = Self::split_items(&source);
        let count = raw_items.len();
        let mut items: Vec<Vec<Node>> = Vec::with_capacity(count);
        let mut last_was_paragraph = false;

        for (idx, item) in raw_items.into_iter().enumerate() {
            let ib = item.as_bytes();
            let mut p = 0;
            while ib.get(p) == Some(&b' ') {
                p += 1;
            }
            let pe = bullet_end(ib, p).unwrap_or(p);
            let mut width = pe;
            while ib.get(width) == Some(&b' ') {
                width += 1;
            }
            let content = Self::item_content(item, width);

            // an item is loose when its body holds a blank line, or when it
            // closes a list whose previous item was loose
            let loose = content.contains("\n\n") || (idx + 1 == count && last_was_paragraph);
            last_was_paragraph = loose;

            let (adjusted, mode) = match strip_item_end(&content) {
                Some(body) if loose => (format!("{body}\n\n"), Mode::Block),
                Some(body) => (format!("{body}\n"), Mode::Inline),
                None => (
                    content.clone(),
                    if loose { Mode::Block } else { Mode::Inline },
                ),
            };

            let saved = state.in_list;
            state.in_list = true;
            let parsed = parser.recurse(&adjusted, state, mode);
            state.in_list = saved;
            items.push(parsed?);
        }

        Ok(Node::List {
            ordered,
            start,
            items,
        }
        .into())
    }
}

/// Anchored def matcher, shared with the collection pre-pass.
fn match_def(src: &str) -> Option<Capture> {
    let b = src.as_bytes();
    let mut i = 0;
    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    if b.get(i) != Some(&b'[') {
        return None;
    }
    let label_start = i + 1;
    let close = memchr(b']', &b[label_start..])? + label_start;
    if close == label_start {
        return None;
    }
    let label = &src[label_start..close];
    i = close + 1;
    if b.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    if b.get(i) == Some(&b'<') {
        i += 1;
    }
    let target_start = i;
    while let Some(&c) = b.get(i) {
        if c == b' ' || c == b'\n' || c == b'\t' || c == b'>' {
            break;
        }
        i += 1;
    }
    let target = &src[target_start..i];
    if b.get(i) == Some(&b'>') {
        i += 1;
    }

    // optional title after at least one space: "..." or (...), closer is
    // the last quote or paren on the line
    let mut title: Option<&str> = None;
    let mut j = i;
    while b.get(j) == Some(&b' ') {
        j += 1;
    }
    if j > i && matches!(b.get(j), Some(&b'"') | Some(&b'(')) {
        let line_end = j + scan::line_len(&src[j..]);
        let tail = src[j + 1..line_end].trim_end_matches(' ');
        if tail.len() > 1 && matches!(tail.as_bytes()[tail.len() - 1], b'"' | b')') {
            title = Some(&tail[..tail.len() - 1]);
            i = j + 1 + tail.len();
        }
    }

    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    let end = scan::line_end_run(src, i)?;
    Some(Capture::new(
        &src[..end],
        vec![
            Some(label.to_string()),
            Some(scan::unescape_url(target)),
            title.map(String::from),
        ],
    ))
}

/// Walk the source block-start to block-start, registering every
/// definition before the main parse begins. This is what makes the final
/// definition win retroactively for earlier reference links.
pub(crate) fn collect_defs(source: &str, refs: &mut RefTable) {
    let mut pos = 0;
    let mut at_block_start = true;
    while pos < source.len() {
        let rest = &source[pos..];
        if at_block_start {
            if let Some(cap) = match_def(rest) {
                refs.insert(
                    cap.group_or_empty(1),
                    cap.group_or_empty(2).to_string(),
                    cap.group_owned(3),
                );
                pos += cap.len();
                continue;
            }
        }
        let ll = scan::line_len(rest);
        at_block_start = scan::is_blank_line(&rest[..ll]);
        pos += ll + usize::from(ll < rest.len());
    }
}

/// Link-reference definition: `[label]: target ( "title" | (title) )?` on
/// one line. Registers the normalized label and emits a `Def` node; a
/// malformed candidate simply fails the matcher and falls back to
/// paragraph text.
pub struct Def;

impl Rule for Def {
    fn name(&self) -> &'static str {
        "def"
    }

    fn order(&self) -> u16 {
        order::DEF
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, prev: Option<&str>) -> Option<Capture> {
        if !scan::at_line_start(prev) {
            return None;
        }
        match_def(src)
    }

    fn parse(
        &self,
        capture: &Capture,
        _: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let label = capture.group_or_empty(1);
        let target = capture.group_or_empty(2).to_string();
        let title = capture.group_owned(3);
        // the collection pass already holds the document-final entry for
        // this label; registering again here would let an earlier def
        // shadow it mid-parse. Only labels the pre-pass never saw (defs
        // nested inside quote or list bodies) are added.
        if state.refs.get(label).is_none() {
            state.refs.insert(label, target.clone(), title.clone());
        }
        Ok(Node::Def {
            def: normalize_label(label),
            target,
            title,
        }
        .into())
    }
}

fn match_piped_table(src: &str) -> Option<Capture> {
    let b = src.as_bytes();
    let mut i = 0;
    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    if b.get(i) != Some(&b'|') {
        return None;
    }
    let header_len = scan::line_len(&src[i..]);
    if header_len < 2 {
        return None;
    }
    let header = &src[i..i + header_len];
    i += header_len;
    if b.get(i) != Some(&b'\n') {
        return None;
    }
    i += 1;

    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    if b.get(i) != Some(&b'|') {
        return None;
    }
    i += 1;
    let align_start = i;
    let mut k = i;
    while b.get(k) == Some(&b' ') {
        k += 1;
    }
    let dashes = k;
    while matches!(b.get(k), Some(&b'-') | Some(&b':')) {
        k += 1;
    }
    if k == dashes {
        return None;
    }
    while matches!(b.get(k), Some(&b'-') | Some(&b':') | Some(&b'|') | Some(&b' ')) {
        k += 1;
    }
    let align = &src[align_start..k];
    if b.get(k) != Some(&b'\n') {
        return None;
    }
    i = k + 1;

    let body_start = i;
    loop {
        let mut j = i;
        while b.get(j) == Some(&b' ') {
            j += 1;
        }
        if b.get(j) != Some(&b'|') {
            break;
        }
        let ll = scan::line_len(&src[j..]);
        i = j + ll;
        if b.get(i) == Some(&b'\n') {
            i += 1;
        } else {
            break;
        }
    }
    let body = &src[body_start..i];
    while b.get(i) == Some(&b'\n') {
        i += 1;
    }

    Some(Capture::new(
        &src[..i],
        vec![
            Some(header.to_string()),
            Some(align.to_string()),
            Some(body.to_string()),
        ],
    ))
}

fn match_unpiped_table(src: &str) -> Option<Capture> {
    let b = src.as_bytes();
    let mut i = 0;
    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    let header_len = scan::line_len(&src[i..]);
    let header = &src[i..i + header_len];
    if header.is_empty() || !header.contains('|') {
        return None;
    }
    i += header_len;
    if b.get(i) != Some(&b'\n') {
        return None;
    }
    i += 1;

    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    let align_start = i;
    let mut k = i;
    while matches!(b.get(k), Some(&b'-') | Some(&b':')) {
        k += 1;
    }
    if k == align_start {
        return None;
    }
    while b.get(k) == Some(&b' ') {
        k += 1;
    }
    if b.get(k) != Some(&b'|') {
        return None;
    }
    while matches!(b.get(k), Some(&b'-') | Some(&b':') | Some(&b'|') | Some(&b' ')) {
        k += 1;
    }
    let align = &src[align_start..k];
    if b.get(k) != Some(&b'\n') {
        return None;
    }
    i = k + 1;

    let body_start = i;
    loop {
        let ll = scan::line_len(&src[i..]);
        if ll == 0 || !src[i..i + ll].contains('|') {
            break;
        }
        i += ll;
        if b.get(i) == Some(&b'\n') {
            i += 1;
        } else {
            break;
        }
    }
    let body = &src[body_start..i];
    while b.get(i) == Some(&b'\n') {
        i += 1;
    }

    Some(Capture::new(
        &src[..i],
        vec![
            Some(header.to_string()),
            Some(align.to_string()),
            Some(body.to_string()),
        ],
    ))
}

fn alignment_of(cell: &str) -> Option<Alignment> {
    let t = cell.trim();
    let dashes = t.trim_start_matches(':').trim_end_matches(':');
    if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
        return None;
    }
    match (t.starts_with(':'), t.ends_with(':')) {
        (true, true) => Some(Alignment::Center),
        (true, false) => Some(Alignment::Left),
        (false, true) => Some(Alignment::Right),
        (false, false) => None,
    }
}

/// Split a table row into trimmed cell texts, dropping one outer pipe on
/// each side when present; interior escaped pipes stay in their cell.
fn split_row(row: &str) -> Vec<String> {
    let mut r = row.trim();
    if let Some(stripped) = r.strip_prefix('|') {
        r = stripped;
    }
    if r.ends_with('|') && !r.ends_with("\\|") {
        r = &r[..r.len() - 1];
    }
    scan::split_unescaped_pipes(r)
        .into_iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Table: header line, alignment line, zero or more body lines, with or
/// without outer pipes. Carries a quality so the alignment line outranks
/// the paragraph rule.
pub struct Table;

impl Rule for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn order(&self) -> u16 {
        order::TABLE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        match_piped_table(src).or_else(|| match_unpiped_table(src))
    }

    fn quality(&self, capture: &Capture) -> Option<f64> {
        Some(capture.len() as f64 + 2.0)
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let header_cells = split_row(capture.group_or_empty(1));
        let mut header = Vec::with_capacity(header_cells.len());
        for cell in &header_cells {
            header.push(parser.recurse(cell, state, Mode::SimpleInline)?);
        }

        let mut align: Vec<Option<Alignment>> = split_row(capture.group_or_empty(2))
            .iter()
            .map(|cell| alignment_of(cell))
            .collect();
        align.resize(header.len(), None);

        let body = capture.group_or_empty(3).trim();
        let mut cells = Vec::new();
        for row in body.split('\n').filter(|row| !row.trim().is_empty()) {
            let mut parsed_row = Vec::new();
            for cell in split_row(row) {
                parsed_row.push(parser.recurse(&cell, state, Mode::SimpleInline)?);
            }
            cells.push(parsed_row);
        }

        Ok(Node::Table {
            header,
            align,
            cells,
        }
        .into())
    }
}

/// Blank-line separator; consumes the run and emits nothing.
pub struct Newline;

impl Rule for Newline {
    fn name(&self) -> &'static str {
        "newline"
    }

    fn order(&self) -> u16 {
        order::NEWLINE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let end = scan::line_end_run(src, 0)?;
        Some(Capture::span(&src[..end]))
    }

    fn parse(&self, _: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Output::Nodes(Vec::new()))
    }
}

/// Paragraph: one or more non-blank lines terminated by a blank line.
/// Start-of-block markers occurring mid-line never break it; the body is
/// parsed in inline mode.
pub struct Paragraph;

impl Rule for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn order(&self) -> u16 {
        order::PARAGRAPH
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        while i < src.len() {
            if b[i] == b'\n' {
                if i == 0 {
                    return None;
                }
                if let Some(end) = scan::blank_run(src, i) {
                    return Some(Capture::new(&src[..end], vec![Some(src[..i].to_string())]));
                }
            }
            i += 1;
        }
        None
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = parser.recurse(capture.group_or_empty(1), state, Mode::Inline)?;
        Ok(Node::Paragraph { content }.into())
    }
}
