//! Fixed-seed hashing for the maps kept inside a bean.
//!
//! Bean maps are tiny and short-lived, so we use `foldhash` with a constant
//! seed: iteration order is stable between runs, which keeps `Debug` output
//! and test expectations deterministic.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x_B5AD_4ECE_DA1C_E2A9);

/// A zero-sized [`BuildHasher`] that always starts from the same seed.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

pub(crate) type HashSet<K> = hashbrown::HashSet<K, FixedHashState>;
