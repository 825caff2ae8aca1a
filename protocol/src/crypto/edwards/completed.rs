//! Completed coordinates ((X:Z), (Y:T)) with x = X/Z and y = Y/T.
//!
//! Every addition and doubling produces a completed point; callers convert
//! to whichever representation the next operation consumes.

use super::cached::CachedPoint;
use super::extended::ExtendedPoint;
use super::field::FieldElement;
use super::precomputed::PreComputedPoint;
use super::projective::ProjectivePoint;

#[derive(Clone, Copy, Debug)]
pub struct CompletedPoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
    pub t: FieldElement,
}

impl CompletedPoint {
    /// p + q
    pub fn from_sum(p: &ExtendedPoint, q: &CachedPoint) -> Self {
        let a = (p.y + p.x) * q.y_plus_x;
        let b = (p.y - p.x) * q.y_minus_x;
        let c = q.t2d * p.t;
        let zz = p.z * q.z;
        let d = zz + zz;
        CompletedPoint {
            x: a - b,
            y: a + b,
            z: d + c,
            t: d - c,
        }
    }

    /// p - q
    pub fn from_difference(p: &ExtendedPoint, q: &CachedPoint) -> Self {
        let a = (p.y + p.x) * q.y_minus_x;
        let b = (p.y - p.x) * q.y_plus_x;
        let c = q.t2d * p.t;
        let zz = p.z * q.z;
        let d = zz + zz;
        CompletedPoint {
            x: a - b,
            y: a + b,
            z: d - c,
            t: d + c,
        }
    }

    /// p + q where q is affine.
    pub fn from_mixed_sum(p: &ExtendedPoint, q: &PreComputedPoint) -> Self {
        let a = (p.y + p.x) * q.y_plus_x;
        let b = (p.y - p.x) * q.y_minus_x;
        let c = q.xy2d * p.t;
        let d = p.z + p.z;
        CompletedPoint {
            x: a - b,
            y: a + b,
            z: d + c,
            t: d - c,
        }
    }

    /// p - q where q is affine.
    pub fn from_mixed_difference(p: &ExtendedPoint, q: &PreComputedPoint) -> Self {
        let a = (p.y + p.x) * q.y_minus_x;
        let b = (p.y - p.x) * q.y_plus_x;
        let c = q.xy2d * p.t;
        let d = p.z + p.z;
        CompletedPoint {
            x: a - b,
            y: a + b,
            z: d - c,
            t: d + c,
        }
    }

    pub fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x * self.t,
            y: self.y * self.z,
            z: self.z * self.t,
        }
    }

    pub fn to_extended(&self) -> ExtendedPoint {
        ExtendedPoint {
            x: self.x * self.t,
            y: self.y * self.z,
            z: self.z * self.t,
            t: self.x * self.y,
        }
    }
}
