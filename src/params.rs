//! Selection of the AKS parameters r and M.
//!
//! r is the exponent modulus of the polynomial ring: the least r whose
//! multiplicative order o_r(n) exceeds ⌈lg n⌉². M is the number of
//! witness candidates that must then be ruled out, ⌊√φ(r)⌋·⌈lg n⌉ + 1.
//! Throughout, ⌈lg n⌉ is taken as the bit length of n.

use std::cmp::max;

use rug::ops::Pow;
use rug::Integer;

use crate::arith::floor_root;
use crate::order::{euler_phi, multiplicative_order};

/// A polylog-in-n ceiling under which a suitable r is guaranteed to
/// exist: max(⌈lg n⌉^5, 3), tightened to 8·⌈lg n⌉² when n ≡ 3, 5 (mod 8)
/// (2 is then a quadratic non-residue of n).
fn modulus_search_ceiling(n: &Integer) -> Integer {
    let ceil_lg = Integer::from(n.significant_bits());
    let mut ceiling = max(Integer::from((&ceil_lg).pow(5)), Integer::from(3u32));

    let n_mod_8 = Integer::from(n % 8u32);
    if n_mod_8 == 3u32 || n_mod_8 == 5u32 {
        let tightened = Integer::from(&ceil_lg * &ceil_lg) * 8u32;
        if tightened < ceiling {
            ceiling = tightened;
        }
    }
    ceiling
}

/// Returns the least r with o_r(n) > ⌈lg n⌉².
///
/// The search starts at ⌈lg n⌉² + 2 and skips r sharing a factor with n
/// (their unit group cannot contain n at large order). Exhausting the
/// ceiling is impossible for n ≥ 2 and panics.
pub fn aks_modulus(n: &Integer) -> Integer {
    let ceil_lg = Integer::from(n.significant_bits());
    let ceil_lg_sq = Integer::from(&ceil_lg * &ceil_lg);
    let ceiling = modulus_search_ceiling(n);

    let mut r = Integer::from(&ceil_lg_sq + 2u32);
    while r < ceiling {
        if Integer::from(n.gcd_ref(&r)) == 1u32 && multiplicative_order(n, &r) > ceil_lg_sq {
            return r;
        }
        r += 1u32;
    }
    panic!("no polynomial modulus for {n} below {ceiling}");
}

/// Returns M = ⌊√φ(r)⌋·⌈lg n⌉ + 1, the exclusive upper bound of the
/// witness candidates that decide n.
pub fn aks_witness_bound(n: &Integer, r: &Integer) -> Integer {
    let mut m = floor_root(&euler_phi(r), 2);
    m *= n.significant_bits();
    m += 1u32;
    m
}
