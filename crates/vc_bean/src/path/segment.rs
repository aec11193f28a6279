use alloc::boxed::Box;
use alloc::string::String;
use core::cell::OnceCell;
use core::fmt;
use core::ops::Deref;

use super::PathExpression;

/// A single `.`-separated token of a [`PathExpression`].
pub struct PathSegment {
    text: Box<str>,
    name_len: usize,
    indexed: bool,
    index: Option<usize>,
    root_path: OnceCell<Box<str>>,
    leaf_path: OnceCell<Box<str>>,
}

impl PathSegment {
    pub(super) fn parse(token: &str) -> Self {
        let (name_len, indexed, index) = match token.find('[') {
            None => (token.len(), false, None),
            Some(open) => (open, true, parse_index(&token[open + 1..])),
        };

        Self {
            text: token.into(),
            name_len,
            indexed,
            index,
            root_path: OnceCell::new(),
            leaf_path: OnceCell::new(),
        }
    }

    /// The full token, including any index suffix.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The property name, without the index suffix.
    #[inline]
    pub fn name(&self) -> &str {
        &self.text[..self.name_len]
    }

    /// Whether the token contains `[`.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// The parsed index.
    ///
    /// `None` for segments that are not indexed and for indexed segments
    /// whose index is not a well-formed `[digits]` suffix.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

// `[`..`]` must close the token and hold only ASCII digits.
fn parse_index(rest: &str) -> Option<usize> {
    let digits = rest.strip_suffix(']')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathSegment")
            .field("name", &self.name())
            .field("index", &self.index)
            .field("indexed", &self.indexed)
            .finish()
    }
}

/// A [`PathSegment`] together with its position in the expression.
///
/// This is how a segment reaches its parent and child.
#[derive(Clone, Copy)]
pub struct SegmentRef<'a> {
    expr: &'a PathExpression,
    position: usize,
}

impl<'a> SegmentRef<'a> {
    #[inline]
    pub(super) fn new(expr: &'a PathExpression, position: usize) -> Self {
        Self { expr, position }
    }

    /// Zero-based position of this segment in the expression.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn segment(&self) -> &'a PathSegment {
        &self.expr.segments()[self.position]
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.position == 0
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.position + 1 == self.expr.len()
    }

    pub fn parent(&self) -> Option<SegmentRef<'a>> {
        self.position
            .checked_sub(1)
            .map(|position| SegmentRef::new(self.expr, position))
    }

    pub fn child(&self) -> Option<SegmentRef<'a>> {
        (!self.is_leaf()).then(|| SegmentRef::new(self.expr, self.position + 1))
    }

    /// This segment and all of its ancestors, dot-joined.
    pub fn to_root_path(&self) -> &'a str {
        self.segment()
            .root_path
            .get_or_init(|| join(&self.expr.segments()[..=self.position]))
    }

    /// This segment and all of its descendants, dot-joined.
    pub fn to_leaf_path(&self) -> &'a str {
        self.segment()
            .leaf_path
            .get_or_init(|| join(&self.expr.segments()[self.position..]))
    }
}

fn join(segments: &[PathSegment]) -> Box<str> {
    let mut text = String::new();
    for segment in segments {
        if !text.is_empty() {
            text.push('.');
        }
        text.push_str(segment.text());
    }
    text.into_boxed_str()
}

impl<'a> Deref for SegmentRef<'a> {
    type Target = PathSegment;

    #[inline]
    fn deref(&self) -> &PathSegment {
        self.segment()
    }
}

impl fmt::Debug for SegmentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentRef")
            .field("position", &self.position)
            .field("segment", self.segment())
            .finish()
    }
}

impl fmt::Display for SegmentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_root_path())
    }
}
