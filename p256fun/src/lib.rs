//! Constant-time arithmetic for the NIST P-256 curve.
//!
//! This is the kernel underneath signing and key agreement: Montgomery field
//! arithmetic modulo the field prime and the group order, Jacobian point
//! doubling and mixed addition driven by constant-time control flags, and
//! table-driven scalar multiplication.
//!
//! ```
//! use p256fun::{AffinePoint, GeneratorTable, Scalar, mul, mul_base};
//!
//! let table = GeneratorTable::new();
//! let k = Scalar::from_u64(3);
//! let by_table = mul_base(&table, &k);
//! let by_point = mul(&AffinePoint::GENERATOR, &k);
//! assert_eq!(by_table, by_point);
//! ```
//!
//! The generator table is an ordinary value. With the `std` feature a
//! compute-once copy is available as [`GENERATOR_TABLE`].
#![no_std]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

mod util;

pub mod affine;
pub mod ct;
pub mod field;
pub mod inverse;
pub mod jacobian;
pub mod mul;
pub mod params;
pub mod table;

#[cfg(any(test, feature = "proptest"))]
mod proptest_impls;

pub use affine::AffinePoint;
pub use field::{Fe, Modulus};
pub use jacobian::JacobianPoint;
pub use mul::{booth_digit, mul};
pub use params::{CURVE_B, FieldElement, FieldModulus, OrderModulus, Scalar};
pub use subtle;
pub use table::LocalTable;

#[cfg(feature = "alloc")]
pub use mul::{double_mul, mul_base};
#[cfg(feature = "alloc")]
pub use table::GeneratorTable;
#[cfg(feature = "std")]
pub use table::{GENERATOR_TABLE, SharedTable};
