//! Streaming trial division.
//!
//! `trial_divide` enumerates the prime factorization of n in ascending
//! order, handing each (prime, multiplicity) pair to a sink that decides
//! whether to keep going. After stripping 2, 3, 5 and 7 it walks a mod-30
//! wheel, which skips every multiple of 2, 3 and 5 and roughly halves the
//! number of odd candidates tried. The search bound shrinks with the
//! running quotient, so removing a factor early cuts the tail of the
//! iteration.

use rug::{Assign, Integer};

use crate::arith::floor_root;

/// Divides d out of t completely and reports it to the sink.
///
/// Returns false when the sink asked to stop; the caller must then
/// abandon the iteration.
fn factor_out<F>(t: &mut Integer, bound: &mut Integer, sink: &mut F, d: &Integer) -> bool
where
    F: FnMut(&Integer, u32) -> bool,
{
    let mut multiplicity = 0u32;
    while t.is_divisible(d) {
        *t /= d;
        if *t < *bound {
            bound.assign(&*t);
        }
        multiplicity += 1;
    }
    multiplicity == 0 || sink(d, multiplicity)
}

/// Finds factors of n by trial division and streams them to `sink` as
/// (prime, multiplicity) pairs in ascending prime order, until the sink
/// returns false. Only divisors up to `upper_bound` (default ⌊√n⌋) are
/// tried; whatever quotient is left above the bound is delivered last
/// with multiplicity 1.
///
/// n must be non-negative. n = 0 produces no factors.
pub fn trial_divide<F>(n: &Integer, mut sink: F, upper_bound: Option<&Integer>)
where
    F: FnMut(&Integer, u32) -> bool,
{
    assert!(*n >= 0, "cannot factor a negative number");
    if n.is_zero() {
        return;
    }

    let mut bound = match upper_bound {
        Some(b) => b.clone(),
        None => floor_root(n, 2),
    };
    let mut t = n.clone();

    for small in [2u32, 3, 5, 7] {
        let d = Integer::from(small);
        if d <= bound && !factor_out(&mut t, &mut bound, &mut sink, &d) {
            return;
        }
    }

    // 30 = 2·3·5; starting from 11, these increments land exactly on the
    // residues coprime to 30.
    const WHEEL: [u32; 8] = [4, 2, 4, 2, 4, 6, 2, 6];
    let mut d = Integer::from(11u32);
    let mut spoke = 1;
    while d <= bound {
        if !factor_out(&mut t, &mut bound, &mut sink, &d) {
            return;
        }
        d += WHEEL[spoke];
        spoke = (spoke + 1) % WHEEL.len();
    }

    // Anything left above the bound is prime.
    if t != 1u32 {
        sink(&t, 1);
    }
}

/// Returns the first proper factor of n that is strictly below m, or
/// None if trial division up to m − 1 finds nothing.
///
/// A quotient equal to n itself (n prime and below m) is not a proper
/// factor and is never reported.
pub fn first_factor_below(n: &Integer, m: &Integer) -> Option<Integer> {
    let mut factor = None;
    let bound = Integer::from(m - 1u32);
    trial_divide(
        n,
        |q, _| {
            if q < m && q < n {
                factor = Some(q.clone());
            }
            false
        },
        Some(&bound),
    );
    factor
}
