//! Modular inversion.
//!
//! The constant-time paths are Fermat inversions: a fixed addition chain for
//! the field prime and a windowed exponentiation (see [`Fe::pow`](crate::field::Fe::pow)) for the
//! group order. [`binary_gcd_inverse`] is variable time and only meant for
//! checking those against something independent.
use crate::{
    params::FieldElement,
    util::{add4, sub4},
};

/// Computes `a^(P-2)` in the base field.
///
/// `P - 2 = 2²⁵⁶ - 2²²⁴ + 2¹⁹² + 2⁹⁶ - 3`. The chain builds `xₖ = a^(2ᵏ-1)`
/// for the run lengths that appear in that exponent and stitches them together.
pub fn invert_field(a: &FieldElement) -> FieldElement {
    let x1 = *a;
    let x2 = x1.square() * x1;
    let x3 = x2.square() * x1;
    let x6 = x3.pow2k(3) * x3;
    let x12 = x6.pow2k(6) * x6;
    let x15 = x12.pow2k(3) * x3;
    let x30 = x15.pow2k(15) * x15;
    let x32 = x30.pow2k(2) * x2;

    let mut t = x32.pow2k(32) * x1;
    t = t.pow2k(128) * x32;
    t = t.pow2k(32) * x32;
    t = t.pow2k(30) * x30;
    t.pow2k(2) * x1
}

/// Returns `a⁻¹ mod m` for an odd modulus `m` and `a` in `[1, m)`.
///
/// Zero maps to zero. **Runs in variable time.**
pub fn binary_gcd_inverse(a: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    const ONE: [u64; 4] = [1, 0, 0, 0];
    if *a == [0; 4] {
        return [0; 4];
    }

    let mut u = *a;
    let mut v = *m;
    let mut x1 = ONE;
    let mut x2 = [0u64; 4];

    while u != ONE && v != ONE {
        while u[0] & 1 == 0 {
            u = shr1(&u, 0);
            x1 = half_mod(&x1, m);
        }
        while v[0] & 1 == 0 {
            v = shr1(&v, 0);
            x2 = half_mod(&x2, m);
        }
        let (diff, borrow) = sub4(&u, &v);
        if borrow == 0 {
            u = diff;
            x1 = sub_mod(&x1, &x2, m);
        } else {
            v = sub4(&v, &u).0;
            x2 = sub_mod(&x2, &x1, m);
        }
    }

    if u == ONE { x1 } else { x2 }
}

fn shr1(a: &[u64; 4], top: u64) -> [u64; 4] {
    [
        (a[0] >> 1) | (a[1] << 63),
        (a[1] >> 1) | (a[2] << 63),
        (a[2] >> 1) | (a[3] << 63),
        (a[3] >> 1) | (top << 63),
    ]
}

fn half_mod(a: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    if a[0] & 1 == 0 {
        shr1(a, 0)
    } else {
        let (sum, carry) = add4(a, m);
        shr1(&sum, carry)
    }
}

fn sub_mod(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    let (diff, borrow) = sub4(a, b);
    if borrow == 0 { diff } else { add4(&diff, m).0 }
}
