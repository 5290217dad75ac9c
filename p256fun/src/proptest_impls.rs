//! Implementations of [`Arbitrary`] for core types.
//!
//! [`Arbitrary`]: proptest::arbitrary::Arbitrary

use crate::{AffinePoint, FieldElement, JacobianPoint, Scalar, field::Fe, field::Modulus};
use ::proptest::prelude::*;

impl<M: Modulus> Arbitrary for Fe<M> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // insert some pathological cases
            1 => Just(Fe::ZERO),
            1 => Just(Fe::ONE),
            1 => Just(-Fe::ONE),
            27 => any::<[u64; 4]>().prop_map(Fe::from_uint_reduced),
        ]
        .boxed()
    }
}

impl Arbitrary for AffinePoint {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<Scalar>()
            .prop_filter_map("zero scalar has no affine point", |k| {
                Option::from(crate::mul::mul(&AffinePoint::GENERATOR, &k).to_affine())
            })
            .boxed()
    }
}

impl Arbitrary for JacobianPoint {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Random non-identity points with a random `Z`.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<AffinePoint>(), any::<FieldElement>())
            .prop_filter("Z must be non-zero", |(_, z)| !bool::from(z.is_zero()))
            .prop_map(|(p, z)| {
                let z2 = z.square();
                JacobianPoint::new_unchecked(p.x * z2, p.y * z2 * z, z)
            })
            .boxed()
    }
}
