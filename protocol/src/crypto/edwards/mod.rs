//! # Edwards25519 Arithmetic
//!
//! Field, group and scalar arithmetic for the twisted Edwards curve
//! -x^2 + y^2 = 1 + d x^2 y^2 over GF(2^255 - 19), as used by Ed25519.
//!
//! ```text
//! edwards/
//! ├── field.rs        FieldElement, ten signed limbs
//! ├── extended.rs     ExtendedPoint (X:Y:Z:T), decoding, base-point mult
//! ├── projective.rs   ProjectivePoint (X:Y:Z), double-scalar mult
//! ├── completed.rs    CompletedPoint, output of every add/double
//! ├── cached.rs       CachedPoint, reusable addition operand
//! ├── precomputed.rs  PreComputedPoint, affine table entries
//! ├── table.rs        base point and lazily built tables
//! └── scalar.rs       Scalar, arithmetic modulo the group order
//! ```
//!
//! Nothing outside [`crate::crypto`] needs these types directly; the
//! signature scheme in [`crate::crypto::ed25519`] is the public face.

pub mod cached;
pub mod completed;
pub mod extended;
pub mod field;
pub mod precomputed;
pub mod projective;
pub mod scalar;
pub mod table;

pub use extended::ExtendedPoint;
pub use field::FieldElement;
pub use projective::ProjectivePoint;
pub use scalar::Scalar;
pub use table::BASE_POINT_BYTES;
