//! Per-thread recursion limit for bean graphs.
//!
//! Beans may reference each other, including cyclically. Every recursive walk
//! over a graph (construction, copying, flattening, equality) holds a
//! [`NestingGuard`] for each level it descends, and fails with
//! [`BeanError::ExcessiveNesting`] once the limit is reached instead of
//! overflowing the stack.
//!
//! The limit is thread-local and defaults to [`DEFAULT_MAX_NESTING_DEPTH`].
//!
//! ```
//! use vc_bean::nesting::{self, NestingGuard};
//!
//! nesting::set_max_depth(1);
//! let outer = NestingGuard::enter().unwrap();
//! assert!(NestingGuard::enter().is_err());
//! drop(outer);
//! nesting::set_max_depth(nesting::DEFAULT_MAX_NESTING_DEPTH);
//! ```

use core::cell::Cell;
use core::marker::PhantomData;

use crate::{BeanError, Result};

/// Nesting limit used until [`set_max_depth`] is called on a thread.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 10;

std::thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_NESTING_DEPTH) };
}

/// Returns the nesting limit of the current thread.
#[inline]
pub fn max_depth() -> usize {
    MAX_DEPTH.with(Cell::get)
}

/// Sets the nesting limit of the current thread.
///
/// Guards that are already held are not affected.
#[inline]
pub fn set_max_depth(limit: usize) {
    MAX_DEPTH.with(|cell| cell.set(limit));
}

/// Number of guards currently held on this thread.
#[inline]
pub fn current_depth() -> usize {
    DEPTH.with(Cell::get)
}

/// One level of recursion, released on drop.
#[must_use = "the nesting level is released as soon as the guard is dropped"]
pub struct NestingGuard {
    // Guards are bound to the thread-local counter they incremented.
    _not_send: PhantomData<*const ()>,
}

impl NestingGuard {
    /// Enters one level, failing if the limit would be exceeded.
    pub fn enter() -> Result<Self> {
        let limit = max_depth();
        DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > limit {
                return Err(BeanError::ExcessiveNesting { limit });
            }
            depth.set(next);
            Ok(Self {
                _not_send: PhantomData,
            })
        })
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_NESTING_DEPTH, NestingGuard, current_depth, max_depth};
    use crate::BeanError;

    #[test]
    fn guards_track_depth() {
        assert_eq!(max_depth(), DEFAULT_MAX_NESTING_DEPTH);
        let before = current_depth();
        {
            let _a = NestingGuard::enter().unwrap();
            let _b = NestingGuard::enter().unwrap();
            assert_eq!(current_depth(), before + 2);
        }
        assert_eq!(current_depth(), before);
    }

    #[test]
    fn limit_is_enforced() {
        let mut guards = alloc::vec::Vec::new();
        for _ in 0..DEFAULT_MAX_NESTING_DEPTH {
            guards.push(NestingGuard::enter().unwrap());
        }
        assert!(matches!(
            NestingGuard::enter(),
            Err(BeanError::ExcessiveNesting { limit: DEFAULT_MAX_NESTING_DEPTH })
        ));
        guards.pop();
        assert!(NestingGuard::enter().is_ok());
    }
}
