//! The top-level primality decision.
//!
//! n ≥ 2 is prime exactly when it has no proper factor below the
//! witness bound M and no a in [1, M) is an AKS witness. The decision
//! procedure short-circuits through trial division twice: a factor
//! below M settles compositeness immediately, and M² > n means trial
//! division already covered every possible factor ≤ √n, settling
//! primality without touching a polynomial.

use anyhow::{bail, Result};
use rug::Integer;
use tracing::info;

use crate::factor::first_factor_below;
use crate::params::{aks_modulus, aks_witness_bound};
use crate::witness::{get_aks_witness, WitnessLog};

/// Outcome of a primality decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Prime,
    /// A proper factor of n below the witness bound.
    HasFactor(Integer),
    /// An AKS witness (any witness, not necessarily the smallest).
    HasWitness(Integer),
    /// The searched range held no witness but does not cover [1, M),
    /// so nothing is proven about n.
    NoWitness { start: Integer, end: Integer },
}

/// Decides the primality of n, testing witness candidates on `jobs`
/// worker threads. `start` and `end` bound the candidate range; an
/// absent (or non-positive) `end` means the full witness bound M.
///
/// n < 2 is a caller error, not a verdict.
pub fn decide(
    n: &Integer,
    jobs: usize,
    start: Option<&Integer>,
    end: Option<&Integer>,
    log: &dyn WitnessLog,
) -> Result<Verdict> {
    if *n < 2u32 {
        bail!("n must be at least 2, got {n}");
    }

    let r = aks_modulus(n);
    let m = aks_witness_bound(n, &r);
    let start = match start {
        Some(s) => s.clone(),
        None => Integer::from(1u32),
    };
    let end = match end {
        Some(e) if *e > 0u32 => e.clone(),
        _ => m.clone(),
    };
    info!(%n, %r, %m, %start, %end, "computed AKS parameters");

    if let Some(factor) = first_factor_below(n, &m) {
        return Ok(Verdict::HasFactor(factor));
    }
    info!("{n} has no factor below {m}");

    // M² > n is M > ⌊√n⌋: trial division has already ruled out every
    // possible factor.
    if Integer::from(&m * &m) > *n {
        info!("{m} exceeds the square root of {n}, no witness search needed");
        return Ok(Verdict::Prime);
    }

    match get_aks_witness(n, &r, &start, &end, jobs, log) {
        Some(a) => Ok(Verdict::HasWitness(a)),
        None if start <= 1u32 && end >= m => Ok(Verdict::Prime),
        None => Ok(Verdict::NoWitness { start, end }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::NullLog;

    fn verdict(n: u64) -> Verdict {
        decide(&Integer::from(n), 2, None, None, &NullLog).unwrap()
    }

    #[test]
    fn rejects_numbers_below_two() {
        assert!(decide(&Integer::from(1u32), 1, None, None, &NullLog).is_err());
        assert!(decide(&Integer::from(0u32), 1, None, None, &NullLog).is_err());
        assert!(decide(&Integer::from(-5), 1, None, None, &NullLog).is_err());
    }

    #[test]
    fn classifies_small_numbers() {
        const PRIMES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
        for n in 2u64..=50 {
            match verdict(n) {
                Verdict::Prime => assert!(PRIMES.contains(&n), "{n} is not prime"),
                Verdict::HasFactor(f) => {
                    assert!(!PRIMES.contains(&n), "{n} is prime");
                    let f = f.to_u64().unwrap();
                    assert!(f > 1 && f < n && n % f == 0, "{f} does not divide {n}");
                }
                other => panic!("unexpected verdict for {n}: {other:?}"),
            }
        }
    }

    #[test]
    fn finds_the_smallest_factor_of_1961() {
        assert_eq!(verdict(1961), Verdict::HasFactor(Integer::from(37u32)));
    }

    #[test]
    fn reports_factor_for_a_32_bit_composite() {
        // Large composite whose smallest factor sits below the witness
        // bound, so trial division settles it.
        match verdict(2993374620) {
            Verdict::HasFactor(f) => assert_eq!(f, 2u32),
            other => panic!("expected a factor, got {other:?}"),
        }
    }

    #[test]
    fn bounded_range_proves_nothing() {
        // 2685241991 is prime, but searching [1, 1) cannot say so.
        let n = Integer::from(2685241991u64);
        let end = Integer::from(1u32);
        let verdict = decide(&n, 2, None, Some(&end), &NullLog).unwrap();
        assert_eq!(
            verdict,
            Verdict::NoWitness {
                start: Integer::from(1u32),
                end: Integer::from(1u32),
            }
        );
    }
}
