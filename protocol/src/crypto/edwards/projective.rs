//! Projective coordinates (X:Y:Z) with x = X/Z, y = Y/Z.

use super::cached::CachedPoint;
use super::completed::CompletedPoint;
use super::extended::ExtendedPoint;
use super::field::FieldElement;
use super::scalar::Scalar;
use super::table::bi_table;

#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
}

impl ProjectivePoint {
    pub fn identity() -> Self {
        ProjectivePoint {
            x: FieldElement::ZERO,
            y: FieldElement::ONE,
            z: FieldElement::ONE,
        }
    }

    /// 2 * self
    pub fn double(&self) -> CompletedPoint {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz2 = self.z.square2();
        let sum_sq = (self.x + self.y).square();
        let y = yy + xx;
        let z = yy - xx;
        CompletedPoint {
            x: sum_sq - y,
            y,
            z,
            t: zz2 - z,
        }
    }

    pub fn to_extended(&self) -> ExtendedPoint {
        ExtendedPoint {
            x: self.x * self.z,
            y: self.y * self.z,
            z: self.z.square(),
            t: self.x * self.y,
        }
    }

    /// Encodes as y with the sign of x in the top bit.
    pub fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = self.x * recip;
        let y = self.y * recip;
        let mut out = y.to_bytes();
        out[31] ^= x.is_negative() << 7;
        out
    }

    /// Computes `a * big_a + b * B` where B is the base point.
    ///
    /// Variable time: only ever called with public inputs during signature
    /// verification.
    pub fn double_scalar_mult_vartime(a: &Scalar, big_a: &ExtendedPoint, b: &Scalar) -> Self {
        let a_slide = a.slide();
        let b_slide = b.slide();
        let bi = bi_table();

        // Odd multiples A, 3A, 5A, ..., 15A.
        let mut odd_multiples = [CachedPoint::from_extended(big_a); 8];
        let a2 = big_a.double().to_extended();
        for i in 0..7 {
            odd_multiples[i + 1] =
                CompletedPoint::from_sum(&a2, &odd_multiples[i]).to_extended().to_cached();
        }

        let mut r = ProjectivePoint::identity();
        let Some(top) = (0..256).rev().find(|&i| a_slide[i] != 0 || b_slide[i] != 0) else {
            return r;
        };

        for i in (0..=top).rev() {
            let mut t = r.double();

            let digit = a_slide[i];
            if digit > 0 {
                t = CompletedPoint::from_sum(&t.to_extended(), &odd_multiples[(digit / 2) as usize]);
            } else if digit < 0 {
                t = CompletedPoint::from_difference(
                    &t.to_extended(),
                    &odd_multiples[(-digit / 2) as usize],
                );
            }

            let digit = b_slide[i];
            if digit > 0 {
                t = CompletedPoint::from_mixed_sum(&t.to_extended(), &bi[(digit / 2) as usize]);
            } else if digit < 0 {
                t = CompletedPoint::from_mixed_difference(
                    &t.to_extended(),
                    &bi[(-digit / 2) as usize],
                );
            }

            r = t.to_projective();
        }
        r
    }
}
