//! Polynomials over Z/NZ modulo x^R − 1, packed into one big integer.
//!
//! Every witness check raises (x + a) to the n-th power in the ring
//! Z/NZ[x]/(x^R − 1), so cyclic multiplication is the hot path of the
//! whole prover. A naive representation (R separate big integers) costs
//! R² bignum multiplications per product. Instead, a polynomial is
//! stored Kronecker-style: coefficient i occupies a fixed slot of k
//! 64-bit limbs at offset i·k in one limb array, where k is chosen so
//! that even the largest intermediate convolution coefficient,
//! R·(N−1)², fits in a slot. Evaluating the polynomial at 2^(64k) is
//! then lossless, and one GMP multiplication of the packed integers
//! produces every convolution coefficient at once, at GMP's
//! Karatsuba/Toom/FFT speed rather than schoolbook.
//!
//! Reduction stays cheap on the packed form:
//!
//! - mod x^R − 1: split the product at limb R·k and add the high half
//!   onto the low half (x^(R+j) ≡ x^j). Slot sums stay below R·(N−1)²,
//!   so the addition never carries across a slot boundary.
//! - mod N: walk the slots and reduce only those that reached N.
//!
//! The limb array keeps a strict invariant: every limb at or above the
//! logical coefficient count is zero. Writes go through GMP's digit
//! export, which zero-fills the spare limbs wholesale, so a coefficient
//! can later be read straight out of its slot with no masking.
//!
//! All heavy state lives in [`PackedPoly`] buffers and a [`MulScratch`]
//! workspace, both sized at construction; the multiply-reduce cycle
//! performs no allocation.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use rug::integer::Order;
use rug::{Assign, Integer};

const LIMB_BITS: usize = 64;

/// Shared parameters of a polynomial ring mod (N, x^R − 1).
///
/// Built once per (N, R) pair; polynomials and scratches constructed
/// from the same params may be combined freely, anything else is a
/// programming error.
pub struct PolyParams {
    /// The coefficient modulus N.
    n: Integer,
    /// N's limbs zero-padded to a full slot, for slot comparisons.
    n_digits: Box<[u64]>,
    /// The exponent modulus R.
    r: usize,
    r_big: Integer,
    /// Limbs per coefficient slot.
    k: usize,
    /// Bit offset of slot R, where the cyclic fold splits a product.
    fold_bits: u32,
}

impl PolyParams {
    pub fn new(n: &Integer, r: &Integer) -> PolyParams {
        assert!(*n >= 2, "coefficient modulus must be at least 2");
        let r_usize = r.to_usize().expect("exponent modulus must fit in usize");
        assert!(r_usize >= 2, "exponent modulus must be at least 2");

        // The largest value a slot ever holds mid-convolution.
        let n_minus_1 = Integer::from(n - 1u32);
        let max_coefficient = Integer::from(&n_minus_1 * &n_minus_1) * r;
        let k = max_coefficient.significant_digits::<u64>();

        let mut n_digits = vec![0u64; k].into_boxed_slice();
        n.write_digits(&mut n_digits, Order::Lsf);

        let fold_bits =
            u32::try_from(r_usize * k * LIMB_BITS).expect("polynomial ring exceeds address space");

        PolyParams {
            n: n.clone(),
            n_digits,
            r: r_usize,
            r_big: r.clone(),
            k,
            fold_bits,
        }
    }

    pub fn modulus(&self) -> &Integer {
        &self.n
    }

    pub fn r(&self) -> usize {
        self.r
    }

    /// Limbs per coefficient slot.
    pub fn slot_limbs(&self) -> usize {
        self.k
    }
}

/// One polynomial mod (N, x^R − 1).
///
/// The backing store holds 2·R·k limbs so a full convolution product
/// fits before folding. A fresh polynomial is the zero polynomial.
pub struct PackedPoly {
    digits: Vec<u64>,
    /// Logical coefficient count; 0 is the zero polynomial. Every limb
    /// at or above `coeffs·k` is zero.
    coeffs: usize,
    k: usize,
}

impl PackedPoly {
    pub fn new(params: &PolyParams) -> PackedPoly {
        PackedPoly {
            digits: vec![0; 2 * params.r * params.k],
            coeffs: 0,
            k: params.k,
        }
    }

    /// One past the degree, or 0 for the zero polynomial.
    pub fn coefficient_count(&self) -> usize {
        self.coeffs
    }

    /// The i-th coefficient; i must be below `coefficient_count`.
    pub fn coefficient(&self, i: usize) -> Integer {
        assert!(i < self.coeffs, "coefficient index out of range");
        Integer::from_digits(&self.digits[i * self.k..(i + 1) * self.k], Order::Lsf)
    }

    /// Sets self to x^(kexp mod R) + (a mod N).
    pub fn set(&mut self, a: &Integer, kexp: &Integer, params: &PolyParams) {
        let k = params.k;
        self.digits.fill(0);

        let c0 = Integer::from(a % &params.n);
        c0.write_digits(&mut self.digits[..k], Order::Lsf);

        let idx = Integer::from(kexp % &params.r_big)
            .to_usize()
            .expect("exponent modulus fits in usize");
        self.digits[idx * k..(idx + 1) * k].fill(0);
        self.digits[idx * k] = 1;
        self.coeffs = idx + 1;
    }

    /// Coefficient-wise equality. Limbs beyond the logical length do not
    /// participate, so spare-capacity contents cannot affect the answer.
    pub fn eq(&self, other: &PackedPoly) -> bool {
        debug_assert_eq!(self.k, other.k, "polynomials from different rings");
        self.coeffs == other.coeffs
            && self.digits[..self.coeffs * self.k] == other.digits[..other.coeffs * other.k]
    }

    fn copy_from(&mut self, src: &PackedPoly) {
        self.digits.copy_from_slice(&src.digits);
        self.coeffs = src.coeffs;
    }

    /// self ← self·q mod (N, x^R − 1). q must be a distinct polynomial;
    /// for self-multiplication use [`PackedPoly::square`].
    pub fn mul(&mut self, q: &PackedPoly, params: &PolyParams, scratch: &mut MulScratch) {
        scratch
            .lhs
            .assign_digits(&self.digits[..self.coeffs * params.k], Order::Lsf);
        scratch
            .rhs
            .assign_digits(&q.digits[..q.coeffs * params.k], Order::Lsf);
        let MulScratch { lhs, rhs, product, .. } = scratch;
        product.assign(&*lhs * &*rhs);
        self.reduce(params, scratch);
    }

    /// self ← self² mod (N, x^R − 1).
    pub fn square(&mut self, params: &PolyParams, scratch: &mut MulScratch) {
        scratch
            .lhs
            .assign_digits(&self.digits[..self.coeffs * params.k], Order::Lsf);
        let MulScratch { lhs, product, .. } = scratch;
        product.assign(&*lhs * &*lhs);
        self.reduce(params, scratch);
    }

    /// self ← self^e mod (N, x^R − 1) by left-to-right binary
    /// exponentiation; about bitlen(e) squarings plus one multiplication
    /// per set bit. e must be positive; tmp must be a distinct
    /// polynomial.
    pub fn pow(
        &mut self,
        e: &Integer,
        tmp: &mut PackedPoly,
        params: &PolyParams,
        scratch: &mut MulScratch,
    ) {
        assert!(*e >= 1, "exponent must be positive");
        tmp.copy_from(self);
        for bit in (0..e.significant_bits() - 1).rev() {
            tmp.square(params, scratch);
            if e.get_bit(bit) {
                tmp.mul(self, params, scratch);
            }
        }
        mem::swap(self, tmp);
    }

    /// Folds the convolution product in `scratch.product` back into R
    /// slots, writes it over self, and reduces every slot modulo N.
    /// Restores the zero-spare-limbs invariant wholesale.
    fn reduce(&mut self, params: &PolyParams, scratch: &mut MulScratch) {
        // mod x^R − 1: add the limbs above slot R onto the low half.
        if scratch.product.significant_bits() > params.fold_bits {
            scratch.wrap.assign(&scratch.product >> params.fold_bits);
            scratch.product.keep_bits_mut(params.fold_bits);
            scratch.product += &scratch.wrap;
        }
        // Zero-fills everything above the written limbs.
        scratch.product.write_digits(&mut self.digits, Order::Lsf);

        // mod N, slot by slot, in place.
        let k = params.k;
        let slots = scratch.product.significant_digits::<u64>().div_ceil(k);
        let mut count = 0;
        for i in 0..slots {
            let slot = &mut self.digits[i * k..(i + 1) * k];
            if compare_digits(slot, &params.n_digits) != Ordering::Less {
                scratch.coefficient.assign_digits(slot, Order::Lsf);
                scratch.coefficient %= &params.n;
                scratch.coefficient.write_digits(slot, Order::Lsf);
            }
            if slot.iter().any(|&limb| limb != 0) {
                count = i + 1;
            }
        }
        self.coeffs = count;
    }

    #[cfg(test)]
    fn set_coefficient(&mut self, i: usize, value: &Integer) {
        value.write_digits(&mut self.digits[i * self.k..(i + 1) * self.k], Order::Lsf);
        if i + 1 > self.coeffs {
            self.coeffs = i + 1;
        }
    }
}

impl fmt::Display for PackedPoly {
    /// Standard descending notation: "8x^3 + x + 6"; the zero polynomial
    /// prints as "0".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeffs == 0 {
            return f.write_str("0");
        }
        let mut first = true;
        for i in (0..self.coeffs).rev() {
            let c = self.coefficient(i);
            if c.is_zero() {
                continue;
            }
            if !first {
                f.write_str(" + ")?;
            }
            first = false;
            if c != 1u32 || i == 0 {
                write!(f, "{c}")?;
            }
            if i > 0 {
                f.write_str("x")?;
                if i > 1 {
                    write!(f, "^{i}")?;
                }
            }
        }
        Ok(())
    }
}

/// Lexicographic comparison of two equal-length little-endian limb
/// slices.
fn compare_digits(a: &[u64], b: &[u64]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Reusable big-integer workspace for packed multiplication. Capacities
/// are reserved up front so the squaring cascade of a `pow` never
/// allocates.
pub struct MulScratch {
    lhs: Integer,
    rhs: Integer,
    product: Integer,
    wrap: Integer,
    coefficient: Integer,
}

impl MulScratch {
    pub fn new(params: &PolyParams) -> MulScratch {
        let operand_bits = params.fold_bits as usize;
        MulScratch {
            lhs: Integer::with_capacity(operand_bits),
            rhs: Integer::with_capacity(operand_bits),
            product: Integer::with_capacity(2 * operand_bits),
            wrap: Integer::with_capacity(operand_bits),
            coefficient: Integer::with_capacity(2 * params.k * LIMB_BITS),
        }
    }
}
