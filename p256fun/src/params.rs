//! NIST P-256 domain parameters.
use crate::{
    field::{Fe, Modulus},
    inverse,
};

/// The prime `P = 2²⁵⁶ - 2²²⁴ + 2¹⁹² + 2⁹⁶ - 1` that coordinates live under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldModulus;

impl Modulus for FieldModulus {
    const MODULUS: [u64; 4] = [
        0xffffffffffffffff,
        0x00000000ffffffff,
        0x0000000000000000,
        0xffffffff00000001,
    ];
    const MODULUS_MINUS_TWO: [u64; 4] = [
        0xfffffffffffffffd,
        0x00000000ffffffff,
        0x0000000000000000,
        0xffffffff00000001,
    ];
    const R: [u64; 4] = [
        0x0000000000000001,
        0xffffffff00000000,
        0xffffffffffffffff,
        0x00000000fffffffe,
    ];
    const R2: [u64; 4] = [
        0x0000000000000003,
        0xfffffffbffffffff,
        0xfffffffffffffffe,
        0x00000004fffffffd,
    ];
    const N0: u64 = 1;

    fn invert(a: &Fe<Self>) -> Fe<Self> {
        inverse::invert_field(a)
    }
}

/// The prime order `N` of the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderModulus;

impl Modulus for OrderModulus {
    const MODULUS: [u64; 4] = [
        0xf3b9cac2fc632551,
        0xbce6faada7179e84,
        0xffffffffffffffff,
        0xffffffff00000000,
    ];
    const MODULUS_MINUS_TWO: [u64; 4] = [
        0xf3b9cac2fc63254f,
        0xbce6faada7179e84,
        0xffffffffffffffff,
        0xffffffff00000000,
    ];
    const R: [u64; 4] = [
        0x0c46353d039cdaaf,
        0x4319055258e8617b,
        0x0000000000000000,
        0x00000000ffffffff,
    ];
    const R2: [u64; 4] = [
        0x83244c95be79eea2,
        0x4699799c49bd6fa6,
        0x2845b2392b6bec59,
        0x66e12d94f3d95620,
    ];
    const N0: u64 = 0xccd1c8aaee00bc4f;
}

/// An element of the base field (a coordinate).
pub type FieldElement = Fe<FieldModulus>;

/// An integer modulo the group order.
pub type Scalar = Fe<OrderModulus>;

/// The curve coefficient `b` of `y² = x³ - 3x + b`, in Montgomery form.
pub const CURVE_B: FieldElement = Fe::from_montgomery_unchecked([
    0xd89cdf6229c4bddf,
    0xacf005cd78843090,
    0xe5a220abf7212ed6,
    0xdc30061d04874834,
]);

/// Affine x-coordinate of the generator, in Montgomery form.
pub(crate) const GENERATOR_X: FieldElement = Fe::from_montgomery_unchecked([
    0x79e730d418a9143c,
    0x75ba95fc5fedb601,
    0x79fb732b77622510,
    0x18905f76a53755c6,
]);

/// Affine y-coordinate of the generator, in Montgomery form.
pub(crate) const GENERATOR_Y: FieldElement = Fe::from_montgomery_unchecked([
    0xddf25357ce95560a,
    0x8b4ab8e4ba19e45c,
    0xd2e88688dd21f325,
    0x8571ff1825885d85,
]);

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn montgomery_constants_match_canonical_values() {
        assert_eq!(
            GENERATOR_X.to_bytes(),
            hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296")
        );
        assert_eq!(
            GENERATOR_Y.to_bytes(),
            hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5")
        );
        assert_eq!(
            CURVE_B.to_bytes(),
            hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b")
        );
    }

    #[test]
    fn n0_is_negated_inverse() {
        assert_eq!(
            FieldModulus::MODULUS[0].wrapping_mul(FieldModulus::N0),
            u64::MAX
        );
        assert_eq!(
            OrderModulus::MODULUS[0].wrapping_mul(OrderModulus::N0),
            u64::MAX
        );
    }

    #[test]
    fn r2_is_r_squared() {
        let r = FieldElement::from_canonical(FieldModulus::R).unwrap();
        assert_eq!(r.to_montgomery(), FieldModulus::R2);
        let r = Scalar::from_canonical(OrderModulus::R).unwrap();
        assert_eq!(r.to_montgomery(), OrderModulus::R2);
    }
}
