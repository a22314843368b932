//! Hashing for pipeline identities and instance keys.
//!
//! FNV-1a, so keys are stable across runs and platforms. Not
//! cryptographically secure.

/// A 64-bit hash value, as stored in sort keys and instance keys.
pub type Hash = u64;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Incremental FNV-1a hasher.
///
/// Producers feed it whatever identifies a pipeline (shader ids, blend
/// state, vertex layout) to get a pipeline hash, or whatever identifies a
/// batchable instance group (pipeline plus mesh and material) to get an
/// instance key.
///
/// ```
/// use strata_core::Hasher;
///
/// let mut h = Hasher::new();
/// h.u32(7);
/// h.string("pbr");
/// let a = h.get();
///
/// let mut h = Hasher::new();
/// h.u32(7);
/// h.string("pbr");
/// assert_eq!(a, h.get());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hasher {
    state: u64,
}

impl Hasher {
    /// A hasher at the FNV offset basis.
    pub fn new() -> Self {
        Self { state: FNV_OFFSET }
    }

    /// Continue hashing from a previously computed value.
    pub fn with_seed(seed: Hash) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn byte(&mut self, byte: u8) {
        self.state = (self.state ^ byte as u64).wrapping_mul(FNV_PRIME);
    }

    /// Feed raw bytes.
    pub fn bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.byte(b);
        }
    }

    /// Feed a u32 (as 4 LE bytes).
    pub fn u32(&mut self, v: u32) {
        self.bytes(&v.to_le_bytes());
    }

    /// Feed a u64 (as 8 LE bytes).
    pub fn u64(&mut self, v: u64) {
        self.bytes(&v.to_le_bytes());
    }

    /// Feed an f32 by bit pattern, so `0.0` and `-0.0` hash differently.
    pub fn f32(&mut self, v: f32) {
        self.u32(v.to_bits());
    }

    /// Feed a string, length-prefixed so `"ab" + "c"` differs from `"a" + "bc"`.
    pub fn string(&mut self, s: &str) {
        self.u64(s.len() as u64);
        self.bytes(s.as_bytes());
    }

    /// The hash of everything fed so far.
    pub fn get(&self) -> Hash {
        self.state
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_is_fnv_offset() {
        assert_eq!(Hasher::new().get(), FNV_OFFSET);
    }

    #[test]
    fn known_fnv1a_vector() {
        // FNV-1a 64 of "a".
        let mut h = Hasher::new();
        h.bytes(b"a");
        assert_eq!(h.get(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn order_matters() {
        let mut a = Hasher::new();
        a.u32(1);
        a.u32(2);
        let mut b = Hasher::new();
        b.u32(2);
        b.u32(1);
        assert_ne!(a.get(), b.get());
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut a = Hasher::new();
        a.string("ab");
        a.string("c");
        let mut b = Hasher::new();
        b.string("a");
        b.string("bc");
        assert_ne!(a.get(), b.get());
    }

    #[test]
    fn seed_continues_hash() {
        let mut full = Hasher::new();
        full.u32(1);
        full.u32(2);

        let mut first = Hasher::new();
        first.u32(1);
        let mut resumed = Hasher::with_seed(first.get());
        resumed.u32(2);

        assert_eq!(full.get(), resumed.get());
    }

    #[test]
    fn signed_zero_hashes_differently() {
        let mut a = Hasher::new();
        a.f32(0.0);
        let mut b = Hasher::new();
        b.f32(-0.0);
        assert_ne!(a.get(), b.get());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn split_point_does_not_matter(
                data in proptest::collection::vec(any::<u8>(), 0..64),
                split in any::<prop::sample::Index>(),
            ) {
                let mut whole = Hasher::new();
                whole.bytes(&data);

                let (head, tail) = data.split_at(split.index(data.len() + 1));
                let mut parts = Hasher::new();
                parts.bytes(head);
                let mut resumed = Hasher::with_seed(parts.get());
                resumed.bytes(tail);

                prop_assert_eq!(whole.get(), resumed.get());
            }
        }
    }
}
