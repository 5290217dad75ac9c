//! Constant-time scalar multiplication.
//!
//! Scalars are recoded into signed (Booth) windows: a `W`-bit window becomes a
//! digit in `-2^(W-1)..=2^(W-1)`, so tables only need the positive multiples
//! and negative digits are handled by the `sign` flag of
//! [`JacobianPoint::add_mixed`]. Every window is processed, the table scan
//! touches every entry, and the "accumulator still empty" state is carried in
//! a [`Choice`]. Nothing here branches on the scalar.
use crate::{affine::AffinePoint, ct, jacobian::JacobianPoint, params::Scalar, table::LocalTable};
use subtle::{Choice, ConditionallySelectable};

#[cfg(feature = "alloc")]
use crate::table::{BASE_WINDOW_BITS, BASE_WINDOWS, GeneratorTable};

const VAR_WINDOW_BITS: usize = 5;
const VAR_WINDOWS: usize = 52;

/// Recodes the `W + 1` bits of a window (the window plus the top bit of the
/// window below it) into a digit magnitude and sign.
///
/// Returns `(|d|, d < 0)` with `|d| <= 2^(W-1)`.
pub fn booth_digit<const W: usize>(bits: u64) -> (u32, Choice) {
    let bits = bits & ((1 << (W + 1)) - 1);
    let sign = (bits >> W) & 1;
    let flipped = ((1 << (W + 1)) - 1) - bits;
    let mask = 0u64.wrapping_sub(sign);
    let d = (flipped & mask) | (bits & !mask);
    let magnitude = (d >> 1) + (d & 1);
    (magnitude as u32, Choice::from(sign as u8))
}

/// Reads the `W + 1` bits of window `index`, starting at bit `W·index - 1`.
///
/// Bit `-1` and bits past the top read as zero. The position is public so
/// plain indexing is fine.
fn window_bits<const W: usize>(limbs: &[u64; 4], index: usize) -> u64 {
    let width_mask = (1u64 << (W + 1)) - 1;
    if index == 0 {
        return (limbs[0] << 1) & width_mask;
    }
    let start = W * index - 1;
    let (word, shift) = (start / 64, start % 64);
    let mut bits = limbs[word] >> shift;
    if shift != 0 && word + 1 < 4 {
        bits |= limbs[word + 1] << (64 - shift);
    }
    bits & width_mask
}

/// Computes `k·G` from a prebuilt table.
///
/// One mixed addition per 7-bit window and no doublings, since the table
/// already carries each window's weight.
#[cfg(feature = "alloc")]
pub fn mul_base(table: &GeneratorTable, k: &Scalar) -> JacobianPoint {
    let limbs = k.to_canonical();
    let mut acc = JacobianPoint::IDENTITY;
    let mut populated = Choice::from(0);

    for window in 0..BASE_WINDOWS {
        let bits = window_bits::<BASE_WINDOW_BITS>(&limbs, window);
        let (digit, sign) = booth_digit::<BASE_WINDOW_BITS>(bits);
        let entry = table.select(window, digit);
        let nonzero = ct::is_nonzero(digit);
        acc = acc.add_mixed(&entry, sign, nonzero, populated);
        populated |= nonzero;
    }

    JacobianPoint::conditional_select(&JacobianPoint::IDENTITY, &acc, populated)
}

/// Computes `k·p` for an arbitrary point on the curve.
///
/// Builds a [`LocalTable`] for `p`, then walks 5-bit windows from the top:
/// five doublings and one mixed addition each.
pub fn mul(p: &AffinePoint, k: &Scalar) -> JacobianPoint {
    let table = LocalTable::new(p);
    let limbs = k.to_canonical();
    let mut acc = JacobianPoint::IDENTITY;
    let mut populated = Choice::from(0);

    for window in (0..VAR_WINDOWS).rev() {
        for _ in 0..VAR_WINDOW_BITS {
            acc = acc.double();
        }
        let bits = window_bits::<VAR_WINDOW_BITS>(&limbs, window);
        let (digit, sign) = booth_digit::<VAR_WINDOW_BITS>(bits);
        let entry = table.select(digit);
        let nonzero = ct::is_nonzero(digit);
        acc = acc.add_mixed(&entry, sign, nonzero, populated);
        populated |= nonzero;
    }

    JacobianPoint::conditional_select(&JacobianPoint::IDENTITY, &acc, populated)
}

/// Computes `k1·G + k2·p`.
#[cfg(feature = "alloc")]
pub fn double_mul(
    table: &GeneratorTable,
    k1: &Scalar,
    p: &AffinePoint,
    k2: &Scalar,
) -> JacobianPoint {
    mul_base(table, k1).add(&mul(p, k2))
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    lazy_static::lazy_static! {
        static ref TABLE: GeneratorTable = GeneratorTable::new();
    }

    fn recombine<const W: usize>(k: &Scalar, windows: usize) -> Scalar {
        let limbs = k.to_canonical();
        let mut weight = Scalar::ONE;
        let mut sum = Scalar::ZERO;
        for window in 0..windows {
            let (digit, sign) = booth_digit::<W>(window_bits::<W>(&limbs, window));
            let mut term = Scalar::from_u64(digit as u64) * weight;
            if bool::from(sign) {
                term = -term;
            }
            sum += term;
            for _ in 0..W {
                weight = weight.double();
            }
        }
        sum
    }

    #[test]
    fn booth_digits_small_width() {
        // (bits, magnitude, negative) for W = 3
        let expected = [
            (0b0000, 0, false),
            (0b0001, 1, false),
            (0b0010, 1, false),
            (0b0011, 2, false),
            (0b0111, 4, false),
            (0b1000, 4, true),
            (0b1011, 2, true),
            (0b1110, 1, true),
            (0b1111, 0, true),
        ];
        for (bits, magnitude, negative) in expected {
            let (m, s) = booth_digit::<3>(bits);
            assert_eq!(m, magnitude, "bits {:04b}", bits);
            assert_eq!(bool::from(s), negative, "bits {:04b}", bits);
        }
    }

    #[test]
    fn window_reads_cross_limbs() {
        let limbs = [1u64 << 63, 1, 0, 1 << 63];
        // window 9 of width 7 starts at bit 62 and spans bits 62..70
        assert_eq!(window_bits::<7>(&limbs, 9), 0b110);
        assert_eq!(window_bits::<5>(&limbs, 0), 0);
        assert_eq!(window_bits::<5>(&[1, 0, 0, 0], 0), 0b10);
        // window 51 of width 5 starts at bit 254
        assert_eq!(window_bits::<5>(&limbs, 51), 0b10);
    }

    #[test]
    fn edge_scalars() {
        let g = AffinePoint::GENERATOR;
        assert!(bool::from(mul_base(&TABLE, &Scalar::ZERO).is_identity()));
        assert!(bool::from(mul(&g, &Scalar::ZERO).is_identity()));
        assert!(bool::from(mul_base(&TABLE, &Scalar::ONE).eq_affine(&g)));
        assert!(bool::from(mul(&g, &Scalar::ONE).eq_affine(&g)));
        let minus_one = -Scalar::ONE;
        assert!(bool::from(mul_base(&TABLE, &minus_one).eq_affine(&-g)));
        assert!(bool::from(mul(&g, &minus_one).eq_affine(&-g)));
    }

    #[test]
    fn scalar_with_every_window_at_extremes() {
        // all ones below 2²⁵⁵ and 2²⁵⁵ exactly exercise the top Booth carry
        let all_ones = Scalar::from_uint_reduced([u64::MAX, u64::MAX, u64::MAX, u64::MAX >> 1]);
        let top_bit = Scalar::from_uint_reduced([0, 0, 0, 1 << 63]);
        for k in [all_ones, top_bit] {
            let expected = mul(&AffinePoint::GENERATOR, &k);
            assert_eq!(mul_base(&TABLE, &k), expected);
        }
    }

    proptest! {
        #[test]
        fn recoding_recombines(k in any::<Scalar>()) {
            prop_assert_eq!(recombine::<7>(&k, BASE_WINDOWS), k);
            prop_assert_eq!(recombine::<5>(&k, VAR_WINDOWS), k);
        }

        #[test]
        fn base_and_variable_agree(k in any::<Scalar>()) {
            let expected = mul(&AffinePoint::GENERATOR, &k);
            prop_assert_eq!(mul_base(&TABLE, &k), expected);
        }

        #[test]
        fn mul_is_linear(a in any::<Scalar>(), b in any::<Scalar>(), p in any::<AffinePoint>()) {
            let lhs = mul(&p, &(a + b));
            let rhs = mul(&p, &a).add(&mul(&p, &b));
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn double_mul_splits(a in any::<Scalar>(), b in any::<Scalar>(), c in any::<Scalar>()) {
            prop_assume!(!bool::from(c.is_zero()));
            let p = mul_base(&TABLE, &c).to_affine().unwrap();
            let combined = double_mul(&TABLE, &a, &p, &b);
            prop_assert_eq!(combined, mul_base(&TABLE, &(a + b * c)));
        }
    }
}
