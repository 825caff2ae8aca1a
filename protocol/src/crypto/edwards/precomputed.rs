//! Affine precomputed points (y+x, y-x, 2dxy), the form the base-point
//! tables are stored in.

use super::extended::ExtendedPoint;
use super::field::{FieldElement, D2};

#[derive(Clone, Copy, Debug)]
pub struct PreComputedPoint {
    pub y_plus_x: FieldElement,
    pub y_minus_x: FieldElement,
    pub xy2d: FieldElement,
}

impl PreComputedPoint {
    pub fn identity() -> Self {
        PreComputedPoint {
            y_plus_x: FieldElement::ONE,
            y_minus_x: FieldElement::ONE,
            xy2d: FieldElement::ZERO,
        }
    }

    /// Converts to affine form. Each coordinate is reduced through its
    /// byte encoding so table entries start with tight limbs.
    pub fn from_extended(p: &ExtendedPoint) -> Self {
        let recip = p.z.invert();
        let x = p.x * recip;
        let y = p.y * recip;
        let tight = |f: FieldElement| FieldElement::from_bytes(&f.to_bytes());
        PreComputedPoint {
            y_plus_x: tight(y + x),
            y_minus_x: tight(y - x),
            xy2d: tight(x * y * D2),
        }
    }

    pub fn conditional_move(&mut self, other: &PreComputedPoint, flag: u8) {
        self.y_plus_x.conditional_move(&other.y_plus_x, flag);
        self.y_minus_x.conditional_move(&other.y_minus_x, flag);
        self.xy2d.conditional_move(&other.xy2d, flag);
    }

    pub fn negate(&self) -> Self {
        PreComputedPoint {
            y_plus_x: self.y_minus_x,
            y_minus_x: self.y_plus_x,
            xy2d: -self.xy2d,
        }
    }

    /// Returns `b * P` for a table row `[P, 2P, ..., 8P]` and `b` in
    /// [-8, 8], touching every row entry regardless of `b`.
    pub fn select(row: &[PreComputedPoint; 8], b: i8) -> Self {
        let neg = negative(b);
        let babs = b.wrapping_sub(((neg as i8).wrapping_neg() & b) << 1);

        let mut t = PreComputedPoint::identity();
        for (j, entry) in row.iter().enumerate() {
            t.conditional_move(entry, equal(babs, j as i8 + 1));
        }

        let minus_t = t.negate();
        t.conditional_move(&minus_t, neg);
        t
    }
}

/// 1 if `b == c`, else 0.
fn equal(b: i8, c: i8) -> u8 {
    let x = (b ^ c) as u8 as u32;
    (x.wrapping_sub(1) >> 31) as u8
}

/// 1 if `b < 0`, else 0.
fn negative(b: i8) -> u8 {
    ((b as i64 as u64) >> 63) as u8
}
