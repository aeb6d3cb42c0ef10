//! Inline-level rules.
//!
//! The emphasis family uses hand-coded non-greedy delimiter scanners with
//! match-length qualities, which is what makes `***x***` resolve to
//! strong around em. The `text` rule is the catch-all that keeps the
//! grammar total.

use memchr::memchr;

use crate::ast::Node;
use crate::engine::Parser;
use crate::error::ParseError;
use crate::rule::{Capture, ModeSet, Output, Rule};
use crate::rules::order;
use crate::scan;
use crate::state::{Mode, State};

/// `\X` for punctuation `X`; each escape becomes its own text node.
pub struct Escape;

impl Rule for Escape {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn order(&self) -> u16 {
        order::ESCAPE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        if !src.starts_with('\\') {
            return None;
        }
        let c = src[1..].chars().next()?;
        if c.is_ascii_alphanumeric() || c.is_whitespace() {
            return None;
        }
        let len = 1 + c.len_utf8();
        Some(Capture::new(&src[..len], vec![Some(c.to_string())]))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::text(capture.group_or_empty(1)).into())
    }
}

/// Scan the inside of `<...>` up to `>`, rejecting whitespace.
fn angle_content(src: &str) -> Option<&str> {
    let inner_end = memchr(b'>', src.as_bytes())?;
    let inner = &src[1..inner_end];
    if inner.is_empty() || inner.bytes().any(|b| b == b' ' || b == b'\n' || b == b'\t') {
        return None;
    }
    Some(inner)
}

/// `<scheme://...>`: a link whose display text is the raw URL.
pub struct AutoLink;

impl Rule for AutoLink {
    fn name(&self) -> &'static str {
        "autolink"
    }

    fn order(&self) -> u16 {
        order::AUTOLINK
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        if !src.starts_with('<') {
            return None;
        }
        let inner = angle_content(src)?;
        // scheme, a colon, and a slash
        let colon = inner.find(':')?;
        if colon == 0 || !inner[colon + 1..].starts_with('/') || colon + 2 >= inner.len() {
            return None;
        }
        Some(Capture::new(
            &src[..inner.len() + 2],
            vec![Some(inner.to_string())],
        ))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        let url = capture.group_or_empty(1);
        Ok(Node::Link {
            content: vec![Node::text(url)],
            target: scan::unescape_url(url),
            title: None,
        }
        .into())
    }
}

/// `<addr@host>` or `<mailto:...>`: the target gains a `mailto:` prefix
/// when it does not already carry one.
pub struct Mailto;

impl Rule for Mailto {
    fn name(&self) -> &'static str {
        "mailto"
    }

    fn order(&self) -> u16 {
        order::MAILTO
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        if !src.starts_with('<') {
            return None;
        }
        let inner = angle_content(src)?;
        let at = inner.find('@')?;
        if at == 0 || at + 1 >= inner.len() {
            return None;
        }
        Some(Capture::new(
            &src[..inner.len() + 2],
            vec![Some(inner.to_string())],
        ))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        let address = capture.group_or_empty(1);
        let target = if address.starts_with("mailto:") {
            address.to_string()
        } else {
            format!("mailto:{address}")
        };
        Ok(Node::Link {
            content: vec![Node::text(address)],
            target: scan::unescape_url(&target),
            title: None,
        }
        .into())
    }
}

/// Bare `http(s)://...` inside text; trailing punctuation stays outside.
pub struct Url;

impl Rule for Url {
    fn name(&self) -> &'static str {
        "url"
    }

    fn order(&self) -> u16 {
        order::URL
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let scheme_len = if src.starts_with("https://") {
            8
        } else if src.starts_with("http://") {
            7
        } else {
            return None;
        };
        let b = src.as_bytes();
        let mut j = scheme_len;
        while let Some(&c) = b.get(j) {
            if c == b'<' || src[j..].chars().next().is_some_and(char::is_whitespace) {
                break;
            }
            j += scan::char_len_at(src, j);
        }
        let is_trailing = |c: u8| matches!(c, b'.' | b',' | b':' | b';' | b'"' | b'\'' | b')' | b']');
        while j - scheme_len >= 2 && is_trailing(b[j - 1]) {
            j -= 1;
        }
        if j - scheme_len < 2 || is_trailing(b[j - 1]) {
            return None;
        }
        Some(Capture::new(&src[..j], vec![Some(src[..j].to_string())]))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        let url = capture.group_or_empty(1);
        Ok(Node::Link {
            content: vec![Node::text(url)],
            target: url.to_string(),
            title: None,
        }
        .into())
    }
}

/// Scan bracketed link text starting at the `[` at position 0; returns the
/// index of the matching `]`. Handles one-or-more nesting levels and
/// backslash escapes.
fn link_text_end(src: &str) -> Option<usize> {
    let b = src.as_bytes();
    let mut depth = 0usize;
    let mut i = 1;
    while i < src.len() {
        match b[i] {
            b'\\' => i += 1 + scan::char_len_at(src, (i + 1).min(src.len())),
            b'[' => {
                depth += 1;
                i += 1;
            }
            b']' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
                i += 1;
            }
            _ => i += scan::char_len_at(src, i),
        }
    }
    None
}

/// Parse the `(target "title")` tail starting at the `(`; returns
/// (consumed length, target, title).
fn link_target(src: &str) -> Option<(usize, String, Option<String>)> {
    let b = src.as_bytes();
    debug_assert_eq!(b.first(), Some(&b'('));
    let mut i = 1;
    while src[i..].starts_with(|c: char| c.is_whitespace()) {
        i += scan::char_len_at(src, i);
    }
    if b.get(i) == Some(&b'<') {
        i += 1;
    }
    let target_start = i;
    let mut depth = 0usize;
    while i < src.len() {
        let c = b[i];
        if c == b'\\' {
            i += 1 + scan::char_len_at(src, (i + 1).min(src.len()));
            continue;
        }
        if src[i..].starts_with(|ch: char| ch.is_whitespace()) {
            break;
        }
        match c {
            b'(' => depth += 1,
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += scan::char_len_at(src, i);
    }
    let mut i = i.min(src.len());
    let mut target = &src[target_start..i];
    if let Some(stripped) = target.strip_suffix('>') {
        target = stripped;
    }

    while src[i..].starts_with(|c: char| c.is_whitespace()) {
        i += scan::char_len_at(src, i);
    }

    let mut title: Option<String> = None;
    if matches!(b.get(i), Some(&b'"') | Some(&b'\'')) {
        let open = i;
        let mut k = open + 1;
        while k < src.len() {
            if b[k] == b'"' || b[k] == b'\'' {
                // the closer must lead, after spaces, to the closing paren
                let mut m = k + 1;
                while src[m..].starts_with(|c: char| c.is_whitespace()) {
                    m += scan::char_len_at(src, m);
                }
                if src.as_bytes().get(m) == Some(&b')') {
                    title = Some(src[open + 1..k].to_string());
                    i = m;
                    break;
                }
            }
            k += scan::char_len_at(src, k);
        }
        if title.is_none() {
            return None;
        }
    }

    if b.get(i) != Some(&b')') {
        return None;
    }
    Some((i + 1, target.to_string(), title))
}

/// `[text](target "title")`; the display text parses in simple-inline
/// mode.
pub struct Link;

impl Rule for Link {
    fn name(&self) -> &'static str {
        "link"
    }

    fn order(&self) -> u16 {
        order::LINK
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        if !src.starts_with('[') {
            return None;
        }
        let close = link_text_end(src)?;
        if !src[close + 1..].starts_with('(') {
            return None;
        }
        let (tail_len, target, title) = link_target(&src[close + 1..])?;
        Some(Capture::new(
            &src[..close + 1 + tail_len],
            vec![Some(src[1..close].to_string()), Some(target), title],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = parser.recurse(capture.group_or_empty(1), state, Mode::SimpleInline)?;
        Ok(Node::Link {
            content,
            target: scan::unescape_url(capture.group_or_empty(2)),
            title: capture.group_owned(3),
        }
        .into())
    }
}

/// `![alt](target "title")`; `alt` is the raw bracketed text.
pub struct Image;

impl Rule for Image {
    fn name(&self) -> &'static str {
        "image"
    }

    fn order(&self) -> u16 {
        order::IMAGE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let rest = src.strip_prefix('!')?;
        if !rest.starts_with('[') {
            return None;
        }
        let close = link_text_end(rest)?;
        if !rest[close + 1..].starts_with('(') {
            return None;
        }
        let (tail_len, target, title) = link_target(&rest[close + 1..])?;
        Some(Capture::new(
            &src[..1 + close + 1 + tail_len],
            vec![Some(rest[1..close].to_string()), Some(target), title],
        ))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::Image {
            alt: capture.group_or_empty(1).to_string(),
            target: scan::unescape_url(capture.group_or_empty(2)),
            title: capture.group_owned(3),
        }
        .into())
    }
}

/// Match `[text][label]` (or `[text][]`) starting at the `[`; returns
/// (consumed length, text, label).
fn match_ref(src: &str) -> Option<(usize, &str, &str)> {
    if !src.starts_with('[') {
        return None;
    }
    let close = link_text_end(src)?;
    let b = src.as_bytes();
    let mut i = close + 1;
    while b.get(i) == Some(&b' ') {
        i += 1;
    }
    if b.get(i) != Some(&b'[') {
        return None;
    }
    let label_start = i + 1;
    let label_end = memchr(b']', &b[label_start..])? + label_start;
    Some((
        label_end + 1,
        &src[1..close],
        &src[label_start..label_end],
    ))
}

/// The literal pieces an unresolved reference degrades to: each bracket
/// and each non-empty part becomes its own text node.
fn literal_ref_nodes(text: &str, label: &str) -> Vec<Node> {
    let mut nodes = vec![Node::text("[")];
    if !text.is_empty() {
        nodes.push(Node::text(text));
    }
    nodes.push(Node::text("]"));
    nodes.push(Node::text("["));
    if !label.is_empty() {
        nodes.push(Node::text(label));
    }
    nodes.push(Node::text("]"));
    nodes
}

/// `[text][label]` / `[text][]`, resolved against the completed ref
/// table; unresolved references fall back to their literal characters.
pub struct RefLink;

impl Rule for RefLink {
    fn name(&self) -> &'static str {
        "reflink"
    }

    fn order(&self) -> u16 {
        order::REFLINK
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let (len, text, label) = match_ref(src)?;
        Some(Capture::new(
            &src[..len],
            vec![Some(text.to_string()), Some(label.to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let text = capture.group_or_empty(1);
        let label = capture.group_or_empty(2);
        let key = if label.is_empty() { text } else { label };
        match state.refs.get(key).cloned() {
            Some(def) => {
                let content = parser.recurse(text, state, Mode::SimpleInline)?;
                Ok(Node::Link {
                    content,
                    target: def.target,
                    title: def.title,
                }
                .into())
            }
            None => Ok(Output::Nodes(literal_ref_nodes(text, label))),
        }
    }
}

/// `![alt][label]`, the image analogue of [`RefLink`].
pub struct RefImage;

impl Rule for RefImage {
    fn name(&self) -> &'static str {
        "refimage"
    }

    fn order(&self) -> u16 {
        order::REFIMAGE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let rest = src.strip_prefix('!')?;
        let (len, text, label) = match_ref(rest)?;
        Some(Capture::new(
            &src[..1 + len],
            vec![Some(text.to_string()), Some(label.to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        _: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let alt = capture.group_or_empty(1);
        let label = capture.group_or_empty(2);
        let key = if label.is_empty() { alt } else { label };
        match state.refs.get(key) {
            Some(def) => Ok(Node::Image {
                alt: alt.to_string(),
                target: def.target.clone(),
                title: def.title.clone(),
            }
            .into()),
            None => {
                let mut nodes = vec![Node::text("!")];
                nodes.extend(literal_ref_nodes(alt, label));
                Ok(Output::Nodes(nodes))
            }
        }
    }
}

/// Shared emphasis body parse.
fn emphasis_body(
    inner: &str,
    parser: &Parser,
    state: &mut State,
) -> Result<Vec<Node>, ParseError> {
    parser.recurse(inner, state, Mode::SimpleInline)
}

/// `*em*` / `_em_`. The underscore form requires word boundaries around
/// the delimiters; the star form forbids whitespace against them.
pub struct Em;

impl Em {
    /// `_...._` with a word boundary after the closer; content units are
    /// `__` pairs, escapes, or any character except `\` and `_`.
    fn match_underscore(src: &str) -> Option<usize> {
        let b = src.as_bytes();
        if b.first() != Some(&b'_') {
            return None;
        }
        let mut i = 1;
        let mut units = 0usize;
        while i < src.len() {
            if src[i..].starts_with("__") {
                i += 2;
                units += 1;
            } else if b[i] == b'\\' {
                i += 1 + scan::char_len_at(src, (i + 1).min(src.len()));
                units += 1;
            } else if b[i] == b'_' {
                if units == 0 {
                    return None;
                }
                let boundary = match b.get(i + 1) {
                    None => true,
                    Some(&c) => !scan::is_word_byte(c),
                };
                return boundary.then_some(i + 1);
            } else {
                i += scan::char_len_at(src, i);
                units += 1;
            }
        }
        None
    }

    /// `*....*` where the content may hold `**` pairs, escapes, non-space
    /// non-star characters, or spaces not followed by `*`; the closer is a
    /// lone star.
    fn match_star(src: &str) -> Option<usize> {
        let b = src.as_bytes();
        if b.first() != Some(&b'*') {
            return None;
        }
        if src[1..].chars().next().map_or(true, char::is_whitespace) {
            return None;
        }
        let mut i = 1;
        let mut units = 0usize;
        loop {
            if i >= src.len() {
                return None;
            }
            if units > 0 && b[i] == b'*' && b.get(i + 1) != Some(&b'*') {
                return Some(i + 1);
            }
            if src[i..].starts_with("**") {
                i += 2;
            } else if b[i] == b'\\' {
                i += 1 + scan::char_len_at(src, (i + 1).min(src.len()));
            } else if b[i] == b'*' {
                return None;
            } else if src[i..].starts_with(|c: char| c.is_whitespace()) {
                if b.get(i + 1) == Some(&b'*') {
                    return None;
                }
                i += scan::char_len_at(src, i);
            } else {
                i += scan::char_len_at(src, i);
            }
            units += 1;
        }
    }
}

impl Rule for Em {
    fn name(&self) -> &'static str {
        "em"
    }

    fn order(&self) -> u16 {
        order::EM
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let len = Self::match_underscore(src).or_else(|| Self::match_star(src))?;
        Some(Capture::new(
            &src[..len],
            vec![Some(src[1..len - 1].to_string())],
        ))
    }

    fn quality(&self, capture: &Capture) -> Option<f64> {
        Some(capture.len() as f64 + 0.2)
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = emphasis_body(capture.group_or_empty(1), parser, state)?;
        Ok(Node::Em { content }.into())
    }
}

/// Non-greedy scan for a two-character closer (`**`, `__`, `~~`) that is
/// not followed by its own delimiter character. Returns the end of the
/// whole span.
fn closed_pair_span(src: &str, delim: u8) -> Option<usize> {
    let b = src.as_bytes();
    if b.first() != Some(&delim) || b.get(1) != Some(&delim) {
        return None;
    }
    let mut i = 2;
    let mut units = 0usize;
    while i < src.len() {
        if units > 0 && b[i] == delim && b.get(i + 1) == Some(&delim) && b.get(i + 2) != Some(&delim)
        {
            return Some(i + 2);
        }
        if b[i] == b'\\' {
            i += 1 + scan::char_len_at(src, (i + 1).min(src.len()));
        } else {
            i += scan::char_len_at(src, i);
        }
        units += 1;
    }
    None
}

/// `**strong**`; the longest-match quality lets it win the `***x***`
/// contest against em.
pub struct Strong;

impl Rule for Strong {
    fn name(&self) -> &'static str {
        "strong"
    }

    fn order(&self) -> u16 {
        order::STRONG
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let len = closed_pair_span(src, b'*')?;
        Some(Capture::new(
            &src[..len],
            vec![Some(src[2..len - 2].to_string())],
        ))
    }

    fn quality(&self, capture: &Capture) -> Option<f64> {
        Some(capture.len() as f64 + 0.4)
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = emphasis_body(capture.group_or_empty(1), parser, state)?;
        Ok(Node::Strong { content }.into())
    }
}

/// `__underline__`.
pub struct U;

impl Rule for U {
    fn name(&self) -> &'static str {
        "u"
    }

    fn order(&self) -> u16 {
        order::U
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let len = closed_pair_span(src, b'_')?;
        Some(Capture::new(
            &src[..len],
            vec![Some(src[2..len - 2].to_string())],
        ))
    }

    fn quality(&self, capture: &Capture) -> Option<f64> {
        Some(capture.len() as f64 + 0.3)
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = emphasis_body(capture.group_or_empty(1), parser, state)?;
        Ok(Node::U { content }.into())
    }
}

/// `~~strikethrough~~`; `~~~~~` degrades to del around a single tilde.
pub struct Del;

impl Rule for Del {
    fn name(&self) -> &'static str {
        "del"
    }

    fn order(&self) -> u16 {
        order::DEL
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let len = closed_pair_span(src, b'~')?;
        Some(Capture::new(
            &src[..len],
            vec![Some(src[2..len - 2].to_string())],
        ))
    }

    fn parse(
        &self,
        capture: &Capture,
        parser: &Parser,
        state: &mut State,
    ) -> Result<Output, ParseError> {
        let content = emphasis_body(capture.group_or_empty(1), parser, state)?;
        Ok(Node::Del { content }.into())
    }
}

/// Backtick-delimited literal span; the closing run must have the same
/// length as the opener.
pub struct InlineCode;

impl Rule for InlineCode {
    fn name(&self) -> &'static str {
        "inlineCode"
    }

    fn order(&self) -> u16 {
        order::INLINE_CODE
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ANY_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        if b.first() != Some(&b'`') {
            return None;
        }
        let mut n = 0;
        while b.get(n) == Some(&b'`') {
            n += 1;
        }
        let mut p = n + 1;
        while p < src.len() {
            if b[p] != b'`' || b[p - 1] == b'`' {
                p += 1;
                continue;
            }
            let mut run = 0;
            while b.get(p + run) == Some(&b'`') {
                run += 1;
            }
            if run == n {
                let raw = &src[n..p];
                let content = match raw.trim() {
                    "" => raw,
                    trimmed => trimmed,
                };
                return Some(Capture::new(
                    &src[..p + n],
                    vec![Some(content.to_string())],
                ));
            }
            p += run;
        }
        None
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::InlineCode {
            content: capture.group_or_empty(1).to_string(),
        }
        .into())
    }
}

/// Two or more trailing spaces before a newline, inside or outside a
/// paragraph. Not available in simple-inline mode.
pub struct Br;

impl Rule for Br {
    fn name(&self) -> &'static str {
        "br"
    }

    fn order(&self) -> u16 {
        order::BR
    }

    fn modes(&self) -> ModeSet {
        ModeSet::BLOCK_AND_INLINE
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        let b = src.as_bytes();
        let mut i = 0;
        while b.get(i) == Some(&b' ') {
            i += 1;
        }
        if i < 2 || b.get(i) != Some(&b'\n') {
            return None;
        }
        Some(Capture::span(&src[..i + 1]))
    }

    fn parse(&self, _: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::Br.into())
    }
}

/// Catch-all: the longest prefix that starts no other inline rule. Stops
/// before punctuation, blank lines, break sequences, and `word:` URL-ish
/// starts; characters at U+00C0 and above never stop the scan.
pub struct Text;

impl Text {
    fn stops_at(src: &str, i: usize) -> bool {
        let b = src.as_bytes();
        let Some(c) = src[i..].chars().next() else {
            return true;
        };
        // punctuation and symbols below the Latin-1 letters
        if !c.is_alphanumeric() && !c.is_whitespace() && (c as u32) < 0xC0 {
            return true;
        }
        if (0x80..0xC0).contains(&(c as u32)) {
            return true;
        }
        // a blank line
        if src[i..].starts_with('\n') && matches!(b.get(i + 1), Some(&b'\n')) {
            return true;
        }
        // a hard-break sequence
        if c == b' ' as char {
            let mut j = i;
            while b.get(j) == Some(&b' ') {
                j += 1;
            }
            if j - i >= 2 && b.get(j) == Some(&b'\n') {
                return true;
            }
        }
        // a word:nonspace sequence (a bare URL about to start)
        if scan::is_word_byte(b[i]) {
            let mut j = i;
            while b.get(j).copied().is_some_and(scan::is_word_byte) {
                j += 1;
            }
            if b.get(j) == Some(&b':')
                && src[j + 1..]
                    .chars()
                    .next()
                    .is_some_and(|n| !n.is_whitespace())
            {
                return true;
            }
        }
        false
    }
}

impl Rule for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn order(&self) -> u16 {
        order::TEXT
    }

    fn modes(&self) -> ModeSet {
        ModeSet::ALL
    }

    fn try_match(&self, src: &str, _state: &State, _prev: Option<&str>) -> Option<Capture> {
        if src.is_empty() {
            return None;
        }
        let mut i = scan::char_len_at(src, 0);
        while i < src.len() && !Self::stops_at(src, i) {
            i += scan::char_len_at(src, i);
        }
        Some(Capture::span(&src[..i]))
    }

    fn parse(&self, capture: &Capture, _: &Parser, _: &mut State) -> Result<Output, ParseError> {
        Ok(Node::text(capture.whole()).into())
    }
}
