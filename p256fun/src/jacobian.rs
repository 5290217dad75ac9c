//! Jacobian points and the two hot-loop point operations.
//!
//! A [`JacobianPoint`] `(X, Y, Z)` stands for the affine point `(X/Z², Y/Z³)`.
//! `Z = 0` is the identity. [`JacobianPoint::double`] and
//! [`JacobianPoint::add_mixed`] are the incomplete formulas used inside scalar
//! multiplication and carry preconditions documented on each.
use crate::{affine::AffinePoint, params::FieldElement};
use core::ops::Neg;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A point in Jacobian coordinates, all three in Montgomery form.
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl JacobianPoint {
    /// The point at infinity, `(1, 1, 0)`.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// The generator with `Z = 1`.
    pub const GENERATOR: Self = Self::from_affine(&AffinePoint::GENERATOR);

    /// Wraps raw coordinates.
    pub const fn new_unchecked(x: FieldElement, y: FieldElement, z: FieldElement) -> Self {
        Self { x, y, z }
    }

    /// Lifts an affine point by setting `Z = 1`.
    pub const fn from_affine(p: &AffinePoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
        }
    }

    /// The `X` coordinate.
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    /// The `Y` coordinate.
    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    /// The `Z` coordinate.
    pub fn z(&self) -> &FieldElement {
        &self.z
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns `2·self` using the `a = -3` doubling formula (4M + 4S).
    ///
    /// The identity maps to a point with `Z = 0`, so doubling it is harmless,
    /// but callers are not supposed to rely on that.
    pub fn double(&self) -> Self {
        let (x1, y1, z1) = (&self.x, &self.y, &self.z);

        let mut t1 = z1.square();
        let mut t2 = x1 - &t1;
        t1 = x1 + &t1;
        t2 = t2 * t1;
        t2 = t2.triple();

        let mut y3 = y1.double();
        let z3 = y3 * z1;
        y3 = y3.square();
        let t3 = y3 * x1;
        y3 = y3.square();
        y3 = y3.half();

        let mut x3 = t2.square();
        t1 = t3.double();
        x3 = x3 - t1;
        t1 = t3 - x3;
        t1 = t1 * t2;
        y3 = t1 - y3;

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Mixed addition `self + (±p2)` with three constant-time control flags.
    ///
    /// The sum is always computed in full. Then, in this order:
    ///
    /// - if `zero` is clear the result is replaced by `(±p2, Z = 1)`;
    /// - if `sel` is clear the result is replaced by `self`.
    ///
    /// So a clear `sel` wins over a clear `zero`. `sign` negates `p2`'s `y`
    /// before anything else, including the `zero` replacement.
    ///
    /// The formula is incomplete. `self` and `p2` must not share an affine
    /// x-coordinate when both `sel` and `zero` are set, and `self` must not be
    /// the identity in that case either.
    pub fn add_mixed(&self, p2: &AffinePoint, sign: Choice, sel: Choice, zero: Choice) -> Self {
        let (x1, y1, z1) = (&self.x, &self.y, &self.z);
        let x2 = &p2.x;
        let y2 = FieldElement::conditional_select(&p2.y, &-p2.y, sign);

        let mut t1 = z1.square();
        let mut t2 = t1 * z1;
        t1 = t1 * x2;
        t2 = t2 * y2;
        t1 = t1 - x1;
        t2 = t2 - y1;
        let z3 = z1 * &t1;
        let mut t3 = t1.square();
        let mut t4 = t3 * t1;
        t3 = t3 * x1;
        t1 = t3.double();
        let mut x3 = t2.square();
        x3 = x3 - t1;
        x3 = x3 - t4;
        t3 = t3 - x3;
        t3 = t3 * t2;
        t4 = t4 * y1;
        let y3 = t3 - t4;

        let sum = Self {
            x: x3,
            y: y3,
            z: z3,
        };
        let other = Self {
            x: *x2,
            y: y2,
            z: FieldElement::ONE,
        };
        let out = Self::conditional_select(&other, &sum, zero);
        Self::conditional_select(self, &out, sel)
    }

    /// Complete addition of two Jacobian points.
    ///
    /// Handles either input being the identity, equal inputs and opposite
    /// inputs, all without branching.
    pub fn add(&self, other: &Self) -> Self {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * z2z2 * other.z;
        let s2 = other.y * z1z1 * self.z;
        let h = u2 - u1;
        let r = s2 - s1;

        let hh = h.square();
        let hhh = hh * h;
        let v = u1 * hh;
        let x3 = r.square() - hhh - v.double();
        let y3 = r * (v - x3) - s1 * hhh;
        let z3 = self.z * other.z * h;

        let mut out = Self {
            x: x3,
            y: y3,
            z: z3,
        };

        // h = 0 with r ≠ 0 already gives z3 = 0; h = r = 0 means self == other
        let same = h.is_zero() & r.is_zero();
        out.conditional_assign(&self.double(), same);
        out.conditional_assign(other, self.is_identity());
        out.conditional_assign(self, other.is_identity());
        out
    }

    /// Returns `(X, -Y, Z)`.
    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Converts to affine with one inversion. None for the identity.
    pub fn to_affine(&self) -> CtOption<AffinePoint> {
        let zinv = self.z.invert();
        let zinv2 = zinv.square();
        let affine = AffinePoint {
            x: self.x * zinv2,
            y: self.y * zinv2 * zinv,
        };
        CtOption::new(affine, !self.is_identity())
    }

    /// Converts `points` to affine, writing into `out`, using one inversion for the whole batch.
    ///
    /// The identity comes out as the all-zero pair and does not affect the
    /// other entries. `out` must have the same length as `points`.
    pub fn normalize_batch(points: &[JacobianPoint], out: &mut [AffinePoint]) {
        debug_assert_eq!(points.len(), out.len());

        // out[i].x holds the product of the Z's before i until the second pass
        let mut acc = FieldElement::ONE;
        for (p, o) in points.iter().zip(out.iter_mut()) {
            o.x = acc;
            let z = FieldElement::conditional_select(&p.z, &FieldElement::ONE, p.is_identity());
            acc = acc * z;
        }

        acc = acc.invert();

        for (p, o) in points.iter().zip(out.iter_mut()).rev() {
            let is_identity = p.is_identity();
            let z = FieldElement::conditional_select(&p.z, &FieldElement::ONE, is_identity);
            let zinv = acc * o.x;
            acc = acc * z;
            let zinv2 = zinv.square();
            let affine = AffinePoint {
                x: p.x * zinv2,
                y: p.y * zinv2 * zinv,
            };
            *o = AffinePoint::conditional_select(&affine, &AffinePoint::BLANK, is_identity);
        }
    }

    /// Allocating form of [`JacobianPoint::normalize_batch`].
    #[cfg(feature = "alloc")]
    pub fn batch_to_affine(points: &[JacobianPoint]) -> alloc::vec::Vec<AffinePoint> {
        let mut out = alloc::vec![AffinePoint::BLANK; points.len()];
        Self::normalize_batch(points, &mut out);
        out
    }

    /// Does this point represent the affine point `other`?
    pub fn eq_affine(&self, other: &AffinePoint) -> Choice {
        let z2 = self.z.square();
        let z3 = z2 * self.z;
        (other.x * z2).ct_eq(&self.x) & (other.y * z3).ct_eq(&self.y) & !self.is_identity()
    }
}

impl From<AffinePoint> for JacobianPoint {
    fn from(p: AffinePoint) -> Self {
        Self::from_affine(&p)
    }
}

impl From<&AffinePoint> for JacobianPoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from_affine(p)
    }
}

impl ConditionallySelectable for JacobianPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for JacobianPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // x₁/z₁² == x₂/z₂² and y₁/z₁³ == y₂/z₂³ without inverting
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let same_x = (self.x * z2z2).ct_eq(&(other.x * z1z1));
        let same_y = (self.y * z2z2 * other.z).ct_eq(&(other.y * z1z1 * self.z));

        let both_identity = self.is_identity() & other.is_identity();
        let neither_identity = !self.is_identity() & !other.is_identity();
        both_identity | (neither_identity & same_x & same_y)
    }
}

impl PartialEq for JacobianPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for JacobianPoint {}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Neg for JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn g() -> JacobianPoint {
        JacobianPoint::GENERATOR
    }

    #[test]
    fn three_g_two_ways() {
        let two_g = g().double();
        let three_a = two_g.add_mixed(
            &AffinePoint::GENERATOR,
            Choice::from(0),
            Choice::from(1),
            Choice::from(1),
        );
        let three_b = g().add(&two_g);
        assert_eq!(three_a, three_b);
        assert!(bool::from(three_a.to_affine().unwrap().is_on_curve()));
    }

    #[test]
    fn add_mixed_flag_precedence() {
        let p1 = g().double();
        let p2 = AffinePoint::GENERATOR;
        for bits in 0u8..8 {
            let (sign, sel, zero) = (bits & 1, (bits >> 1) & 1, (bits >> 2) & 1);
            let out = p1.add_mixed(&p2, Choice::from(sign), Choice::from(sel), Choice::from(zero));
            let signed = if sign == 1 { -p2 } else { p2 };
            let expected = if sel == 0 {
                p1
            } else if zero == 0 {
                JacobianPoint::from(signed)
            } else {
                p1.add(&JacobianPoint::from(signed))
            };
            assert_eq!(out, expected, "sign={} sel={} zero={}", sign, sel, zero);
        }
    }

    #[test]
    fn sel_clear_returns_p1_coordinates_exactly() {
        let p1 = g().double();
        let out = p1.add_mixed(
            &AffinePoint::GENERATOR,
            Choice::from(1),
            Choice::from(0),
            Choice::from(0),
        );
        assert_eq!(out.x, p1.x);
        assert_eq!(out.y, p1.y);
        assert_eq!(out.z, p1.z);
    }

    #[test]
    fn complete_add_edge_cases() {
        let p = g().double();
        let id = JacobianPoint::IDENTITY;
        assert_eq!(p.add(&id), p);
        assert_eq!(id.add(&p), p);
        assert!(bool::from(id.add(&id).is_identity()));
        assert_eq!(p.add(&p), p.double());
        assert!(bool::from(p.add(&-p).is_identity()));
    }

    #[test]
    fn identity_handling() {
        let id = JacobianPoint::IDENTITY;
        assert!(bool::from(id.to_affine().is_none()));
        assert_eq!(id, JacobianPoint::default());
        assert_ne!(id, g());
        assert!(!bool::from(id.eq_affine(&AffinePoint::default())));
        assert!(bool::from(g().eq_affine(&AffinePoint::GENERATOR)));
    }

    #[test]
    fn batch_conversion_skips_identity() {
        let two_g = g().double();
        let points = [two_g, JacobianPoint::IDENTITY, g(), two_g.double()];
        let affine = JacobianPoint::batch_to_affine(&points);
        assert_eq!(affine[0], two_g.to_affine().unwrap());
        assert_eq!(affine[1], AffinePoint::default());
        assert_eq!(affine[2], AffinePoint::GENERATOR);
        assert_eq!(affine[3], two_g.double().to_affine().unwrap());
        assert!(JacobianPoint::batch_to_affine(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn representation_independent(p in any::<JacobianPoint>(), lambda in any::<FieldElement>()) {
            prop_assume!(!bool::from(lambda.is_zero()));
            let l2 = lambda.square();
            let rescaled = JacobianPoint::new_unchecked(p.x * l2, p.y * l2 * lambda, p.z * lambda);
            prop_assert_eq!(rescaled, p);
            prop_assert_eq!(rescaled.double(), p.double());
            prop_assert_eq!(rescaled.to_affine().unwrap(), p.to_affine().unwrap());
        }

        #[test]
        fn add_mixed_matches_complete_add(p in any::<JacobianPoint>(), q in any::<AffinePoint>()) {
            prop_assume!(!bool::from(p.eq_affine(&q) | p.eq_affine(&-q)));
            let sum = p.add_mixed(&q, Choice::from(0), Choice::from(1), Choice::from(1));
            prop_assert_eq!(sum, p.add(&JacobianPoint::from(q)));
            prop_assert!(bool::from(sum.to_affine().unwrap().is_on_curve()));
        }
    }
}
