//! Structural hashing for immutable value types.
//!
//! Every value type computes its hash once at construction from the bit patterns
//! of its fields and stores it. Equality checks compare the stored hash first, so
//! unequal values are usually rejected without touching the fields.
//!
//! The hasher is FNV-1a over 64-bit words. It is `const` so that the `EMPTY`,
//! `DEFAULT` and `FULL` constants carry their hash from compile time.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Canonical bit pattern of `value`: `-0.0` and `0.0` hash and compare the same.
#[inline]
pub const fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Structural equality on doubles, consistent with [`canonical_bits`].
///
/// Unlike `==`, this is reflexive for NaN, which keeps `Eq` honest.
#[inline]
pub const fn same(a: f64, b: f64) -> bool {
    canonical_bits(a) == canonical_bits(b)
}

/// Incremental structural hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralHash(u64);

impl StructuralHash {
    /// Start a new hash.
    pub const fn new() -> Self {
        Self(FNV_OFFSET)
    }

    /// Mix in a raw 64-bit word.
    pub const fn word(self, word: u64) -> Self {
        let mut state = self.0;
        let mut i = 0;
        while i < 8 {
            state ^= (word >> (i * 8)) & 0xff;
            state = state.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(state)
    }

    /// Mix in a double by its canonical bit pattern.
    pub const fn f64(self, value: f64) -> Self {
        self.word(canonical_bits(value))
    }

    /// Mix in a flag.
    pub const fn bool(self, flag: bool) -> Self {
        self.word(flag as u64)
    }

    /// Finish and return the hash value.
    pub const fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StructuralHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_zero_is_canonical() {
        let a = StructuralHash::new().f64(0.0).finish();
        let b = StructuralHash::new().f64(-0.0).finish();
        assert_eq!(a, b);
        assert!(same(0.0, -0.0));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert!(same(f64::NAN, f64::NAN));
    }

    #[test]
    fn test_order_matters() {
        let a = StructuralHash::new().f64(1.0).f64(2.0).finish();
        let b = StructuralHash::new().f64(2.0).f64(1.0).finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_flags_change_hash() {
        let a = StructuralHash::new().f64(1.0).bool(false).finish();
        let b = StructuralHash::new().f64(1.0).bool(true).finish();
        assert_ne!(a, b);
    }
}
