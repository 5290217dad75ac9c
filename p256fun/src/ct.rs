//! Constant-time selection.
//!
//! Every conditional in the point arithmetic is expressed through the
//! functions here (or through [`ConditionallySelectable`] impls that bottom out
//! in [`select_limbs`]) so that all of them share the same masking code. Flags
//! are always [`Choice`] values; a `bool` never reaches a selection site.
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Expands a [`Choice`] to a limb mask: all ones when set, zero otherwise.
#[inline(always)]
pub fn mask(choice: Choice) -> u64 {
    0u64.wrapping_sub(choice.unwrap_u8() as u64)
}

/// Returns `b` when `choice` is set and `a` otherwise.
#[inline]
pub fn select_limbs(a: &[u64; 4], b: &[u64; 4], choice: Choice) -> [u64; 4] {
    let m = mask(choice);
    [
        a[0] ^ (m & (a[0] ^ b[0])),
        a[1] ^ (m & (a[1] ^ b[1])),
        a[2] ^ (m & (a[2] ^ b[2])),
        a[3] ^ (m & (a[3] ^ b[3])),
    ]
}

/// Returns `Choice(1)` when every limb of `a` is zero.
#[inline]
pub fn limbs_are_zero(a: &[u64; 4]) -> Choice {
    (a[0] | a[1] | a[2] | a[3]).ct_eq(&0)
}

/// Returns `Choice(1)` when `value` is non-zero.
#[inline]
pub fn is_nonzero(value: u32) -> Choice {
    !value.ct_eq(&0)
}

/// Returns `Choice(1)` when `a == b`.
#[inline]
pub fn index_eq(a: u32, b: u32) -> Choice {
    a.ct_eq(&b)
}

/// Reads `table[index]` by touching every entry.
///
/// The memory access pattern does not depend on `index`. When `index` is out of
/// range the result is `T::default()`.
pub fn lookup<T: ConditionallySelectable + Default>(table: &[T], index: u32) -> T {
    let mut out = T::default();
    for (i, entry) in table.iter().enumerate() {
        out.conditional_assign(entry, index_eq(i as u32, index));
    }
    out
}
