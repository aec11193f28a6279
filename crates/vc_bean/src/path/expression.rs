use alloc::boxed::Box;
use core::fmt;
use core::str::FromStr;

use super::{PathSegment, SegmentRef};
use crate::{BeanError, Result};

/// A parsed dotted property path.
///
/// Segments are stored in order and linked by position, see [`SegmentRef`].
/// An expression always has at least one segment.
pub struct PathExpression {
    text: Box<str>,
    segments: Box<[PathSegment]>,
}

impl PathExpression {
    /// Parses `text` into segments.
    ///
    /// Fails with [`BeanError::MalformedPath`] only when no segment remains
    /// after skipping empty tokens. Index problems are detected later, at the
    /// point where the segment is resolved.
    pub fn parse(text: &str) -> Result<Self> {
        let segments: Box<[PathSegment]> = text
            .split('.')
            .filter(|token| !token.is_empty())
            .map(PathSegment::parse)
            .collect();

        if segments.is_empty() {
            return Err(BeanError::MalformedPath);
        }

        Ok(Self {
            text: text.into(),
            segments,
        })
    }

    /// The text this expression was parsed from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of segments, never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub(crate) fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn root(&self) -> SegmentRef<'_> {
        SegmentRef::new(self, 0)
    }

    #[inline]
    pub fn leaf(&self) -> SegmentRef<'_> {
        SegmentRef::new(self, self.segments.len() - 1)
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<SegmentRef<'_>> {
        (position < self.segments.len()).then(|| SegmentRef::new(self, position))
    }

    /// Iterates segments from root to leaf.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = SegmentRef<'_>> {
        (0..self.segments.len()).map(|position| SegmentRef::new(self, position))
    }

    /// Whether this expression has more than one segment.
    #[inline]
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl FromStr for PathExpression {
    type Err = BeanError;

    #[inline]
    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl fmt::Debug for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathExpression").field(&self.text).finish()
    }
}

/// Displays the normalized form, with empty tokens dropped.
impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.leaf().to_root_path())
    }
}
