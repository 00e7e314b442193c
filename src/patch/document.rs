//! Span-tracking scanner for block-style YAML
//!
//! Builds a flat list of mapping entries, each with its key path and the byte
//! span of its value token. Only what is needed to rewrite a single scalar is
//! understood; everything else is recorded as an opaque non-scalar value.

use std::fmt;
use std::ops::Range;

use super::path::FieldPath;
use super::scalar::{render, ScalarStyle};

/// One step of a key path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    /// Sequence entry; never addressable by a dotted path
    Item,
}

/// Shape of the value following a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar(ScalarStyle),
    /// Nothing after the colon: null, or the parent of a nested block
    Empty,
    /// `{...}` or `[...]`
    Flow,
    /// `|` or `>`
    BlockScalar,
    /// `*anchor`
    Alias,
}

/// A mapping entry found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: Vec<Segment>,
    /// Column of the key
    pub indent: usize,
    /// Byte span of the value token; empty for [ValueKind::Empty]
    pub span: Range<usize>,
    pub kind: ValueKind,
    /// A nested block follows an empty value
    pub has_children: bool,
    /// The value continues on following lines
    pub multiline: bool,
}

/// Why a dotted path did not resolve to one scalar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    Missing,
    Ambiguous(usize),
    NotScalar(&'static str),
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateError::Missing => write!(f, "no such key"),
            LocateError::Ambiguous(count) => write!(f, "key appears {} times", count),
            LocateError::NotScalar(what) => write!(f, "value is {}, not a scalar", what),
        }
    }
}

struct Frame {
    indent: usize,
    segment: Segment,
    entry: Option<usize>,
}

/// A scanned YAML document
#[derive(Debug)]
pub struct Document<'a> {
    text: &'a str,
    entries: Vec<Entry>,
}

impl<'a> Document<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut entries: Vec<Entry> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        // Indent of the key owning an open block scalar
        let mut block_owner: Option<usize> = None;
        // Indent of the key owning the last inline value, which may continue
        let mut open_value: Option<(usize, Option<usize>)> = None;
        let mut offset = 0;

        for raw in text.split_inclusive('\n') {
            let line_start = offset;
            offset += raw.len();

            let line = raw.trim_end_matches('\n').trim_end_matches('\r');
            let mut content = line.trim_start_matches(' ');
            let mut indent = line.len() - content.len();
            let blank = content.trim().is_empty();

            if let Some(owner) = block_owner {
                if blank || indent > owner {
                    continue;
                }
                block_owner = None;
            }
            if blank || content.starts_with('#') {
                continue;
            }
            if let Some((owner, entry)) = open_value {
                if indent > owner {
                    if let Some(index) = entry {
                        entries[index].multiline = true;
                    }
                    continue;
                }
                open_value = None;
            }
            if indent == 0 && (is_marker(content, "---") || is_marker(content, "...")) {
                stack.clear();
                continue;
            }

            if is_dash(content) {
                while stack.last().map_or(false, |f| {
                    f.indent > indent || (f.indent == indent && f.segment == Segment::Item)
                }) {
                    stack.pop();
                }
                mark_parent(&stack, &mut entries);
                stack.push(Frame {
                    indent,
                    segment: Segment::Item,
                    entry: None,
                });

                let rest = &content[1..];
                let trimmed = rest.trim_start_matches(' ');
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                let dash_indent = indent;
                indent += 1 + rest.len() - trimmed.len();
                content = trimmed;
                if is_dash(content) {
                    open_value = Some((dash_indent, None));
                    continue;
                }
            }

            let column = line_start + indent;
            let (key, after_colon) = match parse_key(content) {
                Some(found) => found,
                None => {
                    open_value = Some((indent, None));
                    continue;
                }
            };

            while stack.last().map_or(false, |f| f.indent >= indent) {
                stack.pop();
            }
            mark_parent(&stack, &mut entries);

            let (span, kind, complete) = scan_value(content, after_colon);
            let mut path: Vec<Segment> = stack.iter().map(|f| f.segment.clone()).collect();
            path.push(Segment::Key(key.clone()));

            let index = entries.len();
            entries.push(Entry {
                path,
                indent,
                span: column + span.start..column + span.end,
                kind,
                has_children: false,
                multiline: !complete,
            });

            match kind {
                ValueKind::Empty => stack.push(Frame {
                    indent,
                    segment: Segment::Key(key),
                    entry: Some(index),
                }),
                ValueKind::BlockScalar => block_owner = Some(indent),
                _ => open_value = Some((indent, Some(index))),
            }
        }

        Document { text, entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Find the single scalar entry addressed by `field`
    pub fn locate(&self, field: &FieldPath) -> Result<&Entry, LocateError> {
        let matches: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| path_matches(&entry.path, field))
            .collect();

        let entry = match matches.as_slice() {
            [] => return Err(LocateError::Missing),
            [entry] => *entry,
            many => return Err(LocateError::Ambiguous(many.len())),
        };

        if entry.multiline {
            return Err(LocateError::NotScalar("spread over several lines"));
        }
        match entry.kind {
            ValueKind::Scalar(_) => Ok(entry),
            ValueKind::Empty if entry.has_children => Err(LocateError::NotScalar("a nested block")),
            ValueKind::Empty => Ok(entry),
            ValueKind::Flow => Err(LocateError::NotScalar("a flow collection")),
            ValueKind::BlockScalar => Err(LocateError::NotScalar("a block scalar")),
            ValueKind::Alias => Err(LocateError::NotScalar("an alias")),
        }
    }

    /// Current text of the addressed scalar's token, quotes included
    pub fn raw_value(&self, field: &FieldPath) -> Result<&'a str, LocateError> {
        let entry = self.locate(field)?;
        Ok(&self.text[entry.span.clone()])
    }

    /// The document text with only the addressed value replaced
    pub fn replace(&self, field: &FieldPath, value: &str) -> Result<String, LocateError> {
        let entry = self.locate(field)?;
        let rendered = match entry.kind {
            ValueKind::Scalar(style) => render(value, style),
            _ => format!(" {}", render(value, ScalarStyle::Plain)),
        };

        let mut out = String::with_capacity(self.text.len() + rendered.len());
        out.push_str(&self.text[..entry.span.start]);
        out.push_str(&rendered);
        out.push_str(&self.text[entry.span.end..]);
        Ok(out)
    }
}

fn path_matches(path: &[Segment], field: &FieldPath) -> bool {
    path.len() == field.segments().len()
        && path.iter().zip(field.segments()).all(|(segment, wanted)| {
            matches!(segment, Segment::Key(key) if key == wanted)
        })
}

fn mark_parent(stack: &[Frame], entries: &mut [Entry]) {
    if let Some(Frame {
        entry: Some(index), ..
    }) = stack.last()
    {
        entries[*index].has_children = true;
    }
}

fn is_dash(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

fn is_marker(content: &str, marker: &str) -> bool {
    content.starts_with(marker)
        && content[marker.len()..]
            .chars()
            .next()
            .map_or(true, |c| c == ' ' || c == '\t')
}

fn is_boundary(content: &str, at: usize) -> bool {
    content
        .as_bytes()
        .get(at)
        .map_or(true, |b| *b == b' ' || *b == b'\t')
}

/// Parse `key:` at the start of `content`, returning the key and the offset
/// just past the colon
fn parse_key(content: &str) -> Option<(String, usize)> {
    let bytes = content.as_bytes();
    let (key, key_end) = match *bytes.first()? {
        b'"' => {
            let end = closing_double(content, 0)?;
            (unescape_double(&content[1..end]), end + 1)
        }
        b'\'' => {
            let end = closing_single(content, 0)?;
            (content[1..end].replace("''", "'"), end + 1)
        }
        b'?' | b'[' | b'{' | b'&' | b'*' | b'!' | b'|' | b'>' | b'%' | b'@' | b'`' => {
            return None
        }
        _ => {
            let colon = plain_key_colon(content)?;
            return Some((content[..colon].trim_end().to_string(), colon + 1));
        }
    };

    let rest = &content[key_end..];
    let colon = key_end + (rest.len() - rest.trim_start_matches(' ').len());
    if bytes.get(colon) == Some(&b':') && is_boundary(content, colon + 1) {
        Some((key, colon + 1))
    } else {
        None
    }
}

fn plain_key_colon(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        match *b {
            b'#' if i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') => return None,
            b':' if i > 0 && is_boundary(content, i + 1) => return Some(i),
            _ => {}
        }
    }
    None
}

fn closing_double(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn closing_single(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn unescape_double(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn token_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| *b == b' ' || *b == b'\t')
        .map_or(bytes.len(), |n| start + n)
}

fn skip_blanks(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    pos
}

/// Scan the value after a key's colon.
///
/// Returns the value span relative to `content`, its kind, and whether the
/// value is complete on this line.
fn scan_value(content: &str, after_colon: usize) -> (Range<usize>, ValueKind, bool) {
    let bytes = content.as_bytes();
    let mut insert_at = after_colon;
    let mut pos = skip_blanks(bytes, after_colon);

    // Anchors and tags stay in front of the value
    while pos < bytes.len() && (bytes[pos] == b'&' || bytes[pos] == b'!') {
        insert_at = token_end(bytes, pos);
        pos = skip_blanks(bytes, insert_at);
    }

    if pos >= bytes.len() || bytes[pos] == b'#' {
        return (insert_at..insert_at, ValueKind::Empty, true);
    }

    match bytes[pos] {
        b'*' => (pos..token_end(bytes, pos), ValueKind::Alias, true),
        b'|' | b'>' => (pos..bytes.len(), ValueKind::BlockScalar, true),
        b'{' | b'[' => (pos..bytes.len(), ValueKind::Flow, true),
        b'"' => match closing_double(content, pos) {
            Some(end) => (
                pos..end + 1,
                ValueKind::Scalar(ScalarStyle::DoubleQuoted),
                true,
            ),
            None => (
                pos..bytes.len(),
                ValueKind::Scalar(ScalarStyle::DoubleQuoted),
                false,
            ),
        },
        b'\'' => match closing_single(content, pos) {
            Some(end) => (
                pos..end + 1,
                ValueKind::Scalar(ScalarStyle::SingleQuoted),
                true,
            ),
            None => (
                pos..bytes.len(),
                ValueKind::Scalar(ScalarStyle::SingleQuoted),
                false,
            ),
        },
        _ => {
            let mut end = bytes.len();
            for i in pos + 1..bytes.len() {
                if bytes[i] == b'#' && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
                    end = i;
                    break;
                }
            }
            let value = content[pos..end].trim_end();
            (
                pos..pos + value.len(),
                ValueKind::Scalar(ScalarStyle::Plain),
                true,
            )
        }
    }
}
