//! Affine points

use crate::params::{CURVE_B, FieldElement, GENERATOR_X, GENERATOR_Y};
use core::ops::Neg;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A point `(x, y)` with both coordinates in Montgomery form.
///
/// There is no affine identity. The all-zero pair, which is not on the curve,
/// is what [`Default`] and batch conversion of the identity produce.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

impl AffinePoint {
    /// Base point of P-256.
    ///
    /// ```text
    /// Gₓ = 6b17d1f2 e12c4247 f8bce6e5 63a440f2 77037d81 2deb33a0 f4a13945 d898c296
    /// Gᵧ = 4fe342e2 fe1a7f9b 8ee7eb4a 7c0f9e16 2bce3357 6b315ece cbb64068 37bf51f5
    /// ```
    pub const GENERATOR: Self = Self {
        x: GENERATOR_X,
        y: GENERATOR_Y,
    };

    pub(crate) const BLANK: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
    };

    /// Wraps coordinates without checking that they lie on the curve.
    pub const fn new_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// Creates a point from its coordinates if they satisfy `y² = x³ - 3x + b`.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> CtOption<Self> {
        let point = Self { x, y };
        CtOption::new(point, point.is_on_curve())
    }

    /// The x-coordinate.
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    /// The y-coordinate.
    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    /// Checks the curve equation.
    pub fn is_on_curve(&self) -> Choice {
        let rhs = (self.x.square() * self.x) - self.x.triple() + CURVE_B;
        self.y.square().ct_eq(&rhs)
    }

    /// Returns `(x, -y)`.
    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
        }
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &AffinePoint, b: &AffinePoint, choice: Choice) -> AffinePoint {
        AffinePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &AffinePoint) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::BLANK
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &AffinePoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
