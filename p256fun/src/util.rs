//! Limb helpers shared by the field and inversion code.

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow.
///
/// Only the top bit of `borrow` is read. The returned borrow is either zero or all ones.
#[inline(always)]
pub const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a + (b * c) + carry`, returning the result along with the new carry.
#[inline(always)]
pub const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Subtracts `rhs` from `lhs` across four limbs, returning the difference and the final borrow.
#[inline(always)]
pub const fn sub4(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], u64) {
    let (d0, borrow) = sbb(lhs[0], rhs[0], 0);
    let (d1, borrow) = sbb(lhs[1], rhs[1], borrow);
    let (d2, borrow) = sbb(lhs[2], rhs[2], borrow);
    let (d3, borrow) = sbb(lhs[3], rhs[3], borrow);
    ([d0, d1, d2, d3], borrow)
}

/// Adds `rhs` to `lhs` across four limbs, returning the sum and the final carry.
#[inline(always)]
pub const fn add4(lhs: &[u64; 4], rhs: &[u64; 4]) -> ([u64; 4], u64) {
    let (s0, carry) = adc(lhs[0], rhs[0], 0);
    let (s1, carry) = adc(lhs[1], rhs[1], carry);
    let (s2, carry) = adc(lhs[2], rhs[2], carry);
    let (s3, carry) = adc(lhs[3], rhs[3], carry);
    ([s0, s1, s2, s3], carry)
}
