//! Slow, variable-time reference arithmetic for P-256.
//!
//! Everything here is computed with [`BigUint`] straight from the textbook
//! definitions. It exists to check `p256fun` in tests and must never be linked
//! into anything that handles secrets.
use lazy_static::lazy_static;
pub use num_bigint::BigUint;
use num_traits::{One, Zero};

lazy_static! {
    /// The field prime `P`.
    pub static ref P: BigUint = from_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    /// The group order `N`.
    pub static ref N: BigUint = from_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
    /// The curve coefficient `b`.
    pub static ref B: BigUint = from_hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
    /// Generator x-coordinate.
    pub static ref GX: BigUint = from_hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
    /// Generator y-coordinate.
    pub static ref GY: BigUint = from_hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");
    /// The Montgomery radix `2²⁵⁶`.
    pub static ref R: BigUint = BigUint::one() << 256;
}

/// Parses a big-endian hex string.
///
/// # Panics
///
/// On anything that is not hex.
pub fn from_hex(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("valid hex")
}

/// Converts little-endian limbs into an integer.
pub fn from_limbs(limbs: &[u64; 4]) -> BigUint {
    let digits = limbs
        .iter()
        .flat_map(|limb| [*limb as u32, (*limb >> 32) as u32])
        .collect::<Vec<_>>();
    BigUint::new(digits)
}

/// Converts an integer below 2²⁵⁶ into little-endian limbs.
///
/// # Panics
///
/// If `value` does not fit in 256 bits.
pub fn to_limbs(value: &BigUint) -> [u64; 4] {
    let digits = value.to_u64_digits();
    assert!(digits.len() <= 4, "value wider than 256 bits");
    let mut limbs = [0u64; 4];
    limbs[..digits.len()].copy_from_slice(&digits);
    limbs
}

/// `a⁻¹ mod m`, or `None` for zero.
pub fn inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if (a % m).is_zero() {
        return None;
    }
    a.modinv(m)
}

/// `a·R mod m`.
pub fn to_montgomery(a: &BigUint, m: &BigUint) -> BigUint {
    (a * &*R) % m
}

/// `a·R⁻¹ mod m`.
pub fn from_montgomery(a: &BigUint, m: &BigUint) -> BigUint {
    let r_inv = inverse(&R, m).expect("R is invertible");
    (a * r_inv) % m
}

/// `a·b·R⁻¹ mod m`, the value a Montgomery multiplier must produce.
pub fn mont_mul(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    from_montgomery(&((a * b) % m), m)
}

fn sub(a: &BigUint, b: &BigUint) -> BigUint {
    ((a + &*P) - (b % &*P)) % &*P
}

fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) % &*P
}

fn half(a: &BigUint) -> BigUint {
    if a.bit(0) { (a + &*P) >> 1 } else { a >> 1 }
}

/// A Jacobian point over plain integers mod `P`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jacobian {
    /// X
    pub x: BigUint,
    /// Y
    pub y: BigUint,
    /// Z
    pub z: BigUint,
}

impl Jacobian {
    /// `2·self` with the `a = -3` formula, step for step.
    pub fn double(&self) -> Jacobian {
        let three = BigUint::from(3u32);
        let t1 = mul(&self.z, &self.z);
        let t2 = sub(&self.x, &t1);
        let t1 = (&self.x + &t1) % &*P;
        let t2 = mul(&mul(&t2, &t1), &three);
        let y3 = (&self.y << 1) % &*P;
        let z3 = mul(&y3, &self.z);
        let y3 = mul(&y3, &y3);
        let t3 = mul(&y3, &self.x);
        let y3 = half(&mul(&y3, &y3));
        let x3 = mul(&t2, &t2);
        let t1 = (&t3 << 1) % &*P;
        let x3 = sub(&x3, &t1);
        let t1 = mul(&sub(&t3, &x3), &t2);
        let y3 = sub(&t1, &y3);
        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Mixed addition with the `sign`, `sel`, `zero` flags, step for step.
    pub fn add_mixed(
        &self,
        x2: &BigUint,
        y2: &BigUint,
        sign: bool,
        sel: bool,
        zero: bool,
    ) -> Jacobian {
        let y2 = if sign { sub(&BigUint::zero(), y2) } else { y2.clone() };
        if !sel {
            return self.clone();
        }
        if !zero {
            return Jacobian {
                x: x2.clone(),
                y: y2,
                z: BigUint::one(),
            };
        }
        let (x1, y1, z1) = (&self.x, &self.y, &self.z);
        let t1 = mul(z1, z1);
        let t2 = mul(&t1, z1);
        let t1 = sub(&mul(&t1, x2), x1);
        let t2 = sub(&mul(&t2, &y2), y1);
        let z3 = mul(z1, &t1);
        let t3 = mul(&t1, &t1);
        let t4 = mul(&t3, &t1);
        let t3 = mul(&t3, x1);
        let t1 = (&t3 << 1) % &*P;
        let x3 = sub(&sub(&mul(&t2, &t2), &t1), &t4);
        let t3 = mul(&sub(&t3, &x3), &t2);
        let t4 = mul(&t4, y1);
        Jacobian {
            x: x3,
            y: sub(&t3, &t4),
            z: z3,
        }
    }

    /// The affine form, or `None` for `Z = 0`.
    pub fn to_affine(&self) -> Option<(BigUint, BigUint)> {
        let zinv = inverse(&self.z, &P)?;
        let zinv2 = mul(&zinv, &zinv);
        Some((mul(&self.x, &zinv2), mul(&mul(&self.y, &zinv2), &zinv)))
    }
}

/// Adds two affine points (`None` is the identity) with the chord-and-tangent rule.
pub fn affine_add(
    p: &Option<(BigUint, BigUint)>,
    q: &Option<(BigUint, BigUint)>,
) -> Option<(BigUint, BigUint)> {
    let ((x1, y1), (x2, y2)) = match (p, q) {
        (None, _) => return q.clone(),
        (_, None) => return p.clone(),
        (Some(p), Some(q)) => (p, q),
    };
    let lambda = if x1 == x2 {
        if (y1 + y2) % &*P == BigUint::zero() {
            return None;
        }
        // (3x² - 3) / 2y
        let num = sub(&mul(&BigUint::from(3u32), &mul(x1, x1)), &BigUint::from(3u32));
        mul(&num, &inverse(&((y1 << 1) % &*P), &P)?)
    } else {
        mul(&sub(y2, y1), &inverse(&sub(x2, x1), &P)?)
    };
    let x3 = sub(&sub(&mul(&lambda, &lambda), x1), x2);
    let y3 = sub(&mul(&lambda, &sub(x1, &x3)), y1);
    Some((x3, y3))
}

/// `k·(x, y)` by affine double-and-add.
pub fn affine_mul(k: &BigUint, x: &BigUint, y: &BigUint) -> Option<(BigUint, BigUint)> {
    let base = Some((x.clone(), y.clone()));
    let mut acc = None;
    for i in (0..k.bits()).rev() {
        acc = affine_add(&acc, &acc);
        if k.bit(i) {
            acc = affine_add(&acc, &base);
        }
    }
    acc
}

/// Is `(x, y)` on the curve?
pub fn is_on_curve(x: &BigUint, y: &BigUint) -> bool {
    let rhs = sub(&(mul(&mul(x, x), x) + &*B), &mul(&BigUint::from(3u32), x));
    mul(y, y) == rhs
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generator_order() {
        assert!(is_on_curve(&GX, &GY));
        assert_eq!(affine_mul(&N, &GX, &GY), None);
        let minus_one = &*N - 1u32;
        let neg_g = affine_mul(&minus_one, &GX, &GY).unwrap();
        assert_eq!(neg_g, (GX.clone(), sub(&BigUint::zero(), &GY)));
    }

    #[test]
    fn limbs_roundtrip() {
        let limbs = [1, 0, u64::MAX, 7];
        assert_eq!(to_limbs(&from_limbs(&limbs)), limbs);
        assert_eq!(to_limbs(&BigUint::zero()), [0; 4]);
    }

    #[test]
    fn jacobian_double_matches_affine() {
        let g = Jacobian {
            x: GX.clone(),
            y: GY.clone(),
            z: BigUint::one(),
        };
        let two_g = affine_mul(&BigUint::from(2u32), &GX, &GY);
        assert_eq!(g.double().to_affine(), two_g);
        let three_g = g.double().add_mixed(&GX, &GY, false, true, true);
        assert_eq!(three_g.to_affine(), affine_mul(&BigUint::from(3u32), &GX, &GY));
    }
}
