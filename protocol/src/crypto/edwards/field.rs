//! # Field Arithmetic over GF(2^255 - 19)
//!
//! Elements are stored as ten signed limbs in radix 2^25.5: even limbs hold
//! 26 bits, odd limbs hold 25 bits, so limb `i` starts at bit
//! `ceil(25.5 * i)`. Products are accumulated in `i64`, which leaves enough
//! headroom that no intermediate carry is needed inside a multiplication.
//!
//! Every routine here is total over well-formed inputs and branch-free with
//! respect to the limb values. Whether the generated machine code stays
//! branch-free is up to the compiler; see [`FieldElement::conditional_move`].

use std::ops::{Add, Mul, Neg, Sub};

/// Bit width of each limb.
const LIMB_BITS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

/// Bit offset of each limb inside the 255-bit little-endian integer.
const LIMB_OFFSETS: [usize; 10] = [0, 26, 51, 77, 102, 128, 153, 179, 204, 230];

/// Carry order used after every multiplication. Alternating between the two
/// halves keeps each limb inside its bound before the next carry reads it.
const MUL_CARRY_ORDER: [usize; 12] = [0, 4, 1, 5, 2, 6, 3, 7, 4, 8, 9, 0];

/// An element of the prime field GF(2^255 - 19).
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) [i32; 10]);

/// The curve constant d = -121665/121666.
pub(crate) const D: FieldElement = FieldElement([
    -10913610, 13857413, -15372611, 6949391, 114729, -8787816, -6275908, -3247719, -18696448,
    -12055116,
]);

/// 2 * d, used by the cached and precomputed representations.
pub(crate) const D2: FieldElement = FieldElement([
    -21827239, -5839606, -30745221, 13898782, 229458, 15978800, -12551817, -6495438, 29715968,
    9444199,
]);

/// A square root of -1.
pub(crate) const SQRT_M1: FieldElement = FieldElement([
    -32595792, -7943725, 9377950, 3500415, 12389472, -272473, -25146209, -2005654, 326686,
    11406482,
]);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0; 10]);
    pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Decodes 32 little-endian bytes. The top bit is ignored and values
    /// in `[p, 2^255)` are accepted as their residue.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0i32; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let offset = LIMB_OFFSETS[i];
            let start = offset / 8;
            let mut word = 0u64;
            for (k, byte) in bytes[start..].iter().take(5).enumerate() {
                word |= (*byte as u64) << (8 * k);
            }
            let mask = (1u64 << LIMB_BITS[i]) - 1;
            *limb = ((word >> (offset % 8)) & mask) as i32;
        }
        FieldElement(limbs)
    }

    /// Decodes 32 bytes, rejecting encodings of values `>= p`.
    ///
    /// The top bit is still ignored: it carries the sign of x when the
    /// field element is the y-coordinate of an encoded point.
    pub fn from_canonical_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let element = Self::from_bytes(bytes);
        let mut expected = *bytes;
        expected[31] &= 0x7f;
        if element.to_bytes() == expected {
            Some(element)
        } else {
            None
        }
    }

    /// Encodes the fully reduced value as 32 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut h = self.0.map(|x| x as i64);

        // q is the quotient of h by p, 0 or 1 for loosely reduced input.
        let mut q = (19 * h[9] + (1 << 24)) >> 25;
        for (i, limb) in h.iter().enumerate() {
            q = (limb + q) >> LIMB_BITS[i];
        }
        h[0] += 19 * q;

        for i in 0..9 {
            let carry = h[i] >> LIMB_BITS[i];
            h[i + 1] += carry;
            h[i] -= carry << LIMB_BITS[i];
        }
        let carry = h[9] >> 25;
        h[9] -= carry << 25;

        let mut out = [0u8; 32];
        let mut acc = 0u64;
        let mut acc_bits = 0u32;
        let mut index = 0usize;
        for (i, limb) in h.iter().enumerate() {
            acc |= (*limb as u64) << acc_bits;
            acc_bits += LIMB_BITS[i];
            while acc_bits >= 8 {
                out[index] = acc as u8;
                acc >>= 8;
                acc_bits -= 8;
                index += 1;
            }
        }
        out[index] = acc as u8;
        out
    }

    /// Returns 1 if the canonical encoding is odd ("negative"), else 0.
    pub fn is_negative(&self) -> u8 {
        self.to_bytes()[0] & 1
    }

    pub fn is_non_zero(&self) -> bool {
        self.to_bytes().iter().fold(0u8, |acc, byte| acc | byte) != 0
    }

    /// Replaces `self` with `other` when `flag == 1`, keeps it when
    /// `flag == 0`.
    ///
    /// The selection is a mask computed from the flag, never a branch.
    /// True constant-time execution still depends on the compiler keeping
    /// it that way; this crate cannot enforce that on its own.
    pub fn conditional_move(&mut self, other: &FieldElement, flag: u8) {
        let mask = -(flag as i32);
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a ^= mask & (*a ^ *b);
        }
    }

    pub fn square(&self) -> Self {
        Self::carry_wide(Self::mul_wide(self, self))
    }

    /// Computes `2 * self^2`.
    pub fn square2(&self) -> Self {
        let mut h = Self::mul_wide(self, self);
        for limb in h.iter_mut() {
            *limb += *limb;
        }
        Self::carry_wide(h)
    }

    fn square_times(&self, n: usize) -> Self {
        let mut out = *self;
        for _ in 0..n {
            out = out.square();
        }
        out
    }

    /// Multiplicative inverse via z^(p-2). Returns zero for zero.
    pub fn invert(&self) -> Self {
        let z = *self;
        let t0 = z.square();
        let t1 = z * t0.square_times(2);
        let t0 = t0 * t1;
        let t1 = t1 * t0.square();
        let t1 = t1.square_times(5) * t1;
        let t2 = t1.square_times(10) * t1;
        let t2 = t2.square_times(20) * t2;
        let t1 = t2.square_times(10) * t1;
        let t2 = t1.square_times(50) * t1;
        let t2 = t2.square_times(100) * t2;
        let t1 = t2.square_times(50) * t1;
        t1.square_times(5) * t0
    }

    /// Computes z^((p-5)/8) = z^(2^252 - 3), the core of the square root
    /// used when decompressing points.
    pub fn pow22523(&self) -> Self {
        let z = *self;
        let t0 = z.square();
        let t1 = z * t0.square_times(2);
        let t0 = t0 * t1;
        let t0 = t1 * t0.square();
        let t0 = t0.square_times(5) * t0;
        let t1 = t0.square_times(10) * t0;
        let t1 = t1.square_times(20) * t1;
        let t0 = t1.square_times(10) * t0;
        let t1 = t0.square_times(50) * t0;
        let t1 = t1.square_times(100) * t1;
        let t0 = t1.square_times(50) * t0;
        t0.square_times(2) * z
    }

    /// Schoolbook product with the reduction 2^255 = 19 folded in. Odd
    /// limbs sit half a bit below their nominal position, so the product
    /// of two odd limbs is doubled.
    fn mul_wide(f: &FieldElement, g: &FieldElement) -> [i64; 10] {
        let mut h = [0i64; 10];
        for i in 0..10 {
            for j in 0..10 {
                let mut term = f.0[i] as i64 * g.0[j] as i64;
                if i & 1 == 1 && j & 1 == 1 {
                    term *= 2;
                }
                if i + j >= 10 {
                    h[i + j - 10] += term * 19;
                } else {
                    h[i + j] += term;
                }
            }
        }
        h
    }

    fn carry_wide(mut h: [i64; 10]) -> Self {
        for &i in MUL_CARRY_ORDER.iter() {
            let bits = LIMB_BITS[i];
            let carry = (h[i] + (1 << (bits - 1))) >> bits;
            if i == 9 {
                h[0] += carry * 19;
            } else {
                h[i + 1] += carry;
            }
            h[i] -= carry << bits;
        }
        FieldElement(h.map(|x| x as i32))
    }
}

impl Add for FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: FieldElement) -> FieldElement {
        let mut out = self.0;
        for (a, b) in out.iter_mut().zip(rhs.0.iter()) {
            *a += *b;
        }
        FieldElement(out)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: FieldElement) -> FieldElement {
        let mut out = self.0;
        for (a, b) in out.iter_mut().zip(rhs.0.iter()) {
            *a -= *b;
        }
        FieldElement(out)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement(self.0.map(|x| -x))
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement::carry_wide(FieldElement::mul_wide(&self, &rhs))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FieldElement {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
