//! Extended coordinates (X:Y:Z:T) with x = X/Z, y = Y/Z and XY = ZT.
//!
//! This is the representation points live in between operations, and the
//! only one that can be decoded from bytes.

use super::cached::CachedPoint;
use super::completed::CompletedPoint;
use super::field::{FieldElement, D, SQRT_M1};
use super::precomputed::PreComputedPoint;
use super::projective::ProjectivePoint;
use super::table::base_table;

#[derive(Clone, Copy, Debug)]
pub struct ExtendedPoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
    pub t: FieldElement,
}

impl ExtendedPoint {
    pub fn identity() -> Self {
        ExtendedPoint {
            x: FieldElement::ZERO,
            y: FieldElement::ONE,
            z: FieldElement::ONE,
            t: FieldElement::ZERO,
        }
    }

    pub fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    pub fn to_cached(&self) -> CachedPoint {
        CachedPoint::from_extended(self)
    }

    pub fn double(&self) -> CompletedPoint {
        self.to_projective().double()
    }

    /// -self
    pub fn negate(&self) -> Self {
        ExtendedPoint {
            x: -self.x,
            y: self.y,
            z: self.z,
            t: -self.t,
        }
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.to_projective().to_bytes()
    }

    /// Decodes a point, accepting non-canonical y encodings.
    ///
    /// Returns `None` when no x satisfies the curve equation for the
    /// decoded y.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Self::decompress(bytes, FieldElement::from_bytes(bytes))
    }

    /// Decodes a point, additionally rejecting y encodings `>= p`.
    pub fn from_canonical_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Self::decompress(bytes, FieldElement::from_canonical_bytes(bytes)?)
    }

    /// Recovers x from y: x^2 = (y^2 - 1) / (d y^2 + 1).
    fn decompress(bytes: &[u8; 32], y: FieldElement) -> Option<Self> {
        let z = FieldElement::ONE;
        let yy = y.square();
        let u = yy - z;
        let v = yy * D + z;

        let v3 = v.square() * v;
        let mut x = v3.square() * v * u;
        x = x.pow22523();
        x = x * v3 * u;

        let vxx = x.square() * v;
        if (vxx - u).is_non_zero() {
            if (vxx + u).is_non_zero() {
                return None;
            }
            x = x * SQRT_M1;
        }

        if x.is_negative() != bytes[31] >> 7 {
            x = -x;
        }

        Some(ExtendedPoint {
            x,
            y,
            z,
            t: x * y,
        })
    }

    /// Computes `a * B` for the base point B, in constant time.
    ///
    /// `a` is read as 64 signed radix-16 digits in [-8, 8]. Precondition:
    /// `a[31] <= 127`, which holds for clamped and reduced scalars.
    pub fn scalar_mult_base(a: &[u8; 32]) -> Self {
        let mut e = [0i8; 64];
        for (i, byte) in a.iter().enumerate() {
            e[2 * i] = (byte & 15) as i8;
            e[2 * i + 1] = ((byte >> 4) & 15) as i8;
        }

        let mut carry = 0i8;
        for digit in e.iter_mut().take(63) {
            *digit += carry;
            carry = (*digit + 8) >> 4;
            *digit -= carry << 4;
        }
        e[63] += carry;

        let table = base_table();
        let mut h = ExtendedPoint::identity();

        for i in (1..64).step_by(2) {
            let t = PreComputedPoint::select(&table[i / 2], e[i]);
            h = CompletedPoint::from_mixed_sum(&h, &t).to_extended();
        }

        // h *= 16
        let mut r = h.double();
        for _ in 0..3 {
            r = r.to_projective().double();
        }
        h = r.to_extended();

        for i in (0..64).step_by(2) {
            let t = PreComputedPoint::select(&table[i / 2], e[i]);
            h = CompletedPoint::from_mixed_sum(&h, &t).to_extended();
        }
        h
    }

    /// Reports whether `self` and `q` differ by a point of small order,
    /// i.e. whether 8 * (self - q) is the identity.
    pub fn cofactor_equal(&self, q: &ExtendedPoint) -> bool {
        let mut p = CompletedPoint::from_difference(self, &q.to_cached()).to_projective();
        for _ in 0..3 {
            p = p.double().to_projective();
        }

        // In projective coordinates the identity is (0 : Z : Z).
        !p.x.is_non_zero() && p.y.to_bytes() == p.z.to_bytes()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
