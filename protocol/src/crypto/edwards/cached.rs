//! Cached coordinates (Y+X, Y-X, Z, 2dT): the right-hand operand of an
//! extended-coordinate addition, prepared once and reused.

use super::extended::ExtendedPoint;
use super::field::{FieldElement, D2};

#[derive(Clone, Copy, Debug)]
pub struct CachedPoint {
    pub y_plus_x: FieldElement,
    pub y_minus_x: FieldElement,
    pub z: FieldElement,
    pub t2d: FieldElement,
}

impl CachedPoint {
    pub fn from_extended(p: &ExtendedPoint) -> Self {
        CachedPoint {
            y_plus_x: p.y + p.x,
            y_minus_x: p.y - p.x,
            z: p.z,
            t2d: p.t * D2,
        }
    }
}
