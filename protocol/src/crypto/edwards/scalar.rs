//! # Scalars modulo the group order
//!
//! l = 2^252 + 27742317777372353535851937790883648493.
//!
//! Arithmetic works on signed 21-bit limbs held in `i64`. A limb at
//! position `k >= 12` has weight 2^(21k), and 2^252 = -27742317777372353535851937790883648493
//! (mod l) lets it be folded back six positions lower using
//! [`FOLD_COEFFICIENTS`].

/// Little-endian 64-bit words of l, least significant first.
const ORDER_WORDS: [u64; 4] = [
    0x5812631a5cf5d3ed,
    0x14def9dea2f79cd6,
    0x0000000000000000,
    0x1000000000000000,
];

/// 2^252 mod l expressed as six signed 21-bit limbs (negated).
const FOLD_COEFFICIENTS: [i64; 6] = [666643, 470296, 654183, -997805, 136657, -683901];

const LIMB_MASK: i64 = (1 << 21) - 1;

/// A 32-byte little-endian scalar.
///
/// The value is not necessarily reduced; [`Scalar::is_canonical`] tells
/// whether it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(pub [u8; 32]);

impl Scalar {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Scalar(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Reduces a 64-byte little-endian integer (typically a SHA-512
    /// digest) modulo l.
    pub fn reduce(wide: &[u8; 64]) -> Self {
        let mut s = [0i64; 24];
        load_limbs(wide, &mut s);
        Scalar(reduce_limbs(s))
    }

    /// Computes `(a * b + c) mod l`.
    pub fn mul_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Self {
        let mut la = [0i64; 12];
        let mut lb = [0i64; 12];
        let mut lc = [0i64; 12];
        load_limbs(&a.0, &mut la);
        load_limbs(&b.0, &mut lb);
        load_limbs(&c.0, &mut lc);

        let mut s = [0i64; 24];
        s[..12].copy_from_slice(&lc);
        for (i, ai) in la.iter().enumerate() {
            for (j, bj) in lb.iter().enumerate() {
                s[i + j] += ai * bj;
            }
        }

        for k in (0..=22).step_by(2) {
            carry_round(&mut s, k);
        }
        for k in (1..=21).step_by(2) {
            carry_round(&mut s, k);
        }
        Scalar(reduce_limbs(s))
    }

    /// Reports whether the value is strictly below l.
    pub fn is_canonical(&self) -> bool {
        for i in (0..4).rev() {
            let mut word = [0u8; 8];
            word.copy_from_slice(&self.0[i * 8..i * 8 + 8]);
            let v = u64::from_le_bytes(word);
            if v > ORDER_WORDS[i] {
                return false;
            }
            if v < ORDER_WORDS[i] {
                return true;
            }
        }
        false
    }

    /// Sliding-window recoding into 256 signed digits, each zero or odd in
    /// [-15, 15], such that `sum(r[i] * 2^i)` equals the scalar.
    pub fn slide(&self) -> [i8; 256] {
        let mut r = [0i32; 256];
        for (i, digit) in r.iter_mut().enumerate() {
            *digit = 1 & (self.0[i >> 3] >> (i & 7)) as i32;
        }

        for i in 0..256 {
            if r[i] == 0 {
                continue;
            }
            for b in 1..=6 {
                if i + b >= 256 {
                    break;
                }
                if r[i + b] == 0 {
                    continue;
                }
                let shifted = r[i + b] << b;
                if r[i] + shifted <= 15 {
                    r[i] += shifted;
                    r[i + b] = 0;
                } else if r[i] - shifted >= -15 {
                    r[i] -= shifted;
                    for digit in r.iter_mut().skip(i + b) {
                        if *digit == 0 {
                            *digit = 1;
                            break;
                        }
                        *digit = 0;
                    }
                } else {
                    break;
                }
            }
        }

        r.map(|d| d as i8)
    }
}

// ---------------------------------------------------------------------------
// Limb helpers
// ---------------------------------------------------------------------------

/// Splits little-endian bytes into 21-bit limbs. The final limb keeps all
/// remaining bits.
fn load_limbs(bytes: &[u8], limbs: &mut [i64]) {
    let last = limbs.len() - 1;
    for (i, limb) in limbs.iter_mut().enumerate() {
        let offset = 21 * i;
        let start = offset / 8;
        let mut word = 0u64;
        for (k, byte) in bytes[start..].iter().take(4).enumerate() {
            word |= (*byte as u64) << (8 * k);
        }
        let value = (word >> (offset % 8)) as i64;
        *limb = if i == last { value } else { value & LIMB_MASK };
    }
}

/// Folds limb `top` into the six limbs starting at `top - 12`.
fn fold(s: &mut [i64; 24], top: usize) {
    let v = s[top];
    for (j, c) in FOLD_COEFFICIENTS.iter().enumerate() {
        s[top - 12 + j] += v * c;
    }
    s[top] = 0;
}

/// Moves the rounded high part of limb `k` into limb `k + 1`, leaving limb
/// `k` in [-2^20, 2^20).
fn carry_round(s: &mut [i64; 24], k: usize) {
    let carry = (s[k] + (1 << 20)) >> 21;
    s[k + 1] += carry;
    s[k] -= carry << 21;
}

/// Moves the floored high part of limb `k` into limb `k + 1`, leaving limb
/// `k` in [0, 2^21).
fn carry_floor(s: &mut [i64; 24], k: usize) {
    let carry = s[k] >> 21;
    s[k + 1] += carry;
    s[k] -= carry << 21;
}

/// Reduces 24 limbs modulo l and packs the result.
fn reduce_limbs(mut s: [i64; 24]) -> [u8; 32] {
    for top in (18..=23).rev() {
        fold(&mut s, top);
    }
    for k in (6..=16).step_by(2) {
        carry_round(&mut s, k);
    }
    for k in (7..=15).step_by(2) {
        carry_round(&mut s, k);
    }

    for top in (12..=17).rev() {
        fold(&mut s, top);
    }
    for k in (0..=10).step_by(2) {
        carry_round(&mut s, k);
    }
    for k in (1..=11).step_by(2) {
        carry_round(&mut s, k);
    }

    fold(&mut s, 12);
    for k in 0..=11 {
        carry_floor(&mut s, k);
    }

    fold(&mut s, 12);
    for k in 0..=10 {
        carry_floor(&mut s, k);
    }

    let mut out = [0u8; 32];
    let mut acc = 0u64;
    let mut acc_bits = 0u32;
    let mut index = 0usize;
    for limb in s.iter().take(12) {
        acc |= (*limb as u64) << acc_bits;
        acc_bits += 21;
        while acc_bits >= 8 && index < 32 {
            out[index] = acc as u8;
            acc >>= 8;
            acc_bits -= 8;
            index += 1;
        }
    }
    if index < 32 {
        out[index] = acc as u8;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
