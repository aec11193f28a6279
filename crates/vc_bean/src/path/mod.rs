//! Dotted property paths.
//!
//! A path names a property of a bean and, optionally, properties of the
//! beans nested inside it. Segments are separated by `.`; a segment may
//! carry an index into an array or list property.
//!
//! - `name`: a top-level property.
//! - `child.value`: the `value` property of the bean stored in `child`.
//! - `items[2].flag`: the `flag` property of the third bean in `items`.
//!
//! Parsing is lenient: empty tokens produced by leading, trailing or doubled
//! dots are skipped, and a segment with a malformed index is still marked
//! as indexed, so the problem is reported as [`BeanError::InvalidIndex`]
//! when the segment is actually used.
//!
//! ```
//! use vc_bean::path::PathExpression;
//!
//! let path = PathExpression::parse("items[2].flag").unwrap();
//! assert_eq!(path.len(), 2);
//!
//! let root = path.root();
//! assert_eq!(root.name(), "items");
//! assert_eq!(root.index(), Some(2));
//! assert_eq!(root.to_leaf_path(), "items[2].flag");
//! assert_eq!(path.leaf().to_root_path(), "items[2].flag");
//! ```
//!
//! [`BeanError::InvalidIndex`]: crate::BeanError::InvalidIndex

mod expression;
mod segment;

pub use expression::PathExpression;
pub use segment::{PathSegment, SegmentRef};
