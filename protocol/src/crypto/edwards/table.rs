//! Base-point constants and the lazily built multiplication tables.
//!
//! Both tables are derived from the base point on first use and shared for
//! the lifetime of the process.

use std::sync::OnceLock;

use super::cached::CachedPoint;
use super::completed::CompletedPoint;
use super::extended::ExtendedPoint;
use super::field::FieldElement;
use super::precomputed::PreComputedPoint;

/// Canonical encoding of the base point B (y = 4/5, x even).
pub const BASE_POINT_BYTES: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
];

/// Little-endian x-coordinate of B.
const BASE_POINT_X: [u8; 32] = [
    0x1a, 0xd5, 0x25, 0x8f, 0x60, 0x2d, 0x56, 0xc9, 0xb2, 0xa7, 0x25, 0x95, 0x60, 0xc7, 0x2c, 0x69,
    0x5c, 0xdc, 0xd6, 0xfd, 0x31, 0xe2, 0xa4, 0xc0, 0xfe, 0x53, 0x6e, 0xcd, 0xd3, 0x36, 0x69, 0x21,
];

/// The base point in extended coordinates with Z = 1.
pub fn base_point() -> ExtendedPoint {
    let x = FieldElement::from_bytes(&BASE_POINT_X);
    let y = FieldElement::from_bytes(&BASE_POINT_BYTES);
    ExtendedPoint {
        x,
        y,
        z: FieldElement::ONE,
        t: x * y,
    }
}

static BASE_TABLE: OnceLock<[[PreComputedPoint; 8]; 32]> = OnceLock::new();
static BI_TABLE: OnceLock<[PreComputedPoint; 8]> = OnceLock::new();

/// `base_table()[i][j] = (j + 1) * 256^i * B`.
pub fn base_table() -> &'static [[PreComputedPoint; 8]; 32] {
    BASE_TABLE.get_or_init(|| {
        let mut table = [[PreComputedPoint::identity(); 8]; 32];
        let mut row_base = base_point();

        for row in table.iter_mut() {
            let step = row_base.to_cached();
            let mut acc = row_base;
            for (j, entry) in row.iter_mut().enumerate() {
                if j > 0 {
                    acc = CompletedPoint::from_sum(&acc, &step).to_extended();
                }
                *entry = PreComputedPoint::from_extended(&acc);
            }

            // row_base *= 256
            let mut p = row_base.double();
            for _ in 0..7 {
                p = p.to_projective().double();
            }
            row_base = p.to_extended();
        }
        table
    })
}

/// `bi_table()[k] = (2k + 1) * B`.
pub fn bi_table() -> &'static [PreComputedPoint; 8] {
    BI_TABLE.get_or_init(|| {
        let b = base_point();
        let b2: CachedPoint = b.double().to_extended().to_cached();

        let mut table = [PreComputedPoint::identity(); 8];
        let mut acc = b;
        for (k, entry) in table.iter_mut().enumerate() {
            if k > 0 {
                acc = CompletedPoint::from_sum(&acc, &b2).to_extended();
            }
            *entry = PreComputedPoint::from_extended(&acc);
        }
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_point_is_on_curve() {
        let b = base_point();
        let decoded = ExtendedPoint::from_bytes(&BASE_POINT_BYTES).unwrap();
        assert_eq!(decoded.x, b.x);
        assert_eq!(decoded.y, b.y);
    }

    #[test]
    fn tables_agree_on_three_b() {
        let from_base = base_table()[0][2];
        let from_bi = bi_table()[1];
        assert_eq!(from_base.y_plus_x, from_bi.y_plus_x);
        assert_eq!(from_base.y_minus_x, from_bi.y_minus_x);
        assert_eq!(from_base.xy2d, from_bi.xy2d);
    }
}
