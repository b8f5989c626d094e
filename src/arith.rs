//! Integer k-th roots.
//!
//! The parameter and bound computations need exact floor roots of big
//! integers (never floating point, which loses precision long before the
//! sizes involved here). `floor_root` runs the classic integer Newton
//! iteration, which converges in O(log log x) steps from a power-of-two
//! initial guess.

use rug::ops::Pow;
use rug::Integer;

/// Returns the greatest y such that y^k ≤ x.
///
/// x must be non-negative and k positive; both violations are
/// programming errors and panic.
pub fn floor_root(x: &Integer, k: u32) -> Integer {
    assert!(*x >= 0, "negative radicand");
    assert!(k > 0, "root index must be positive");
    if x.is_zero() {
        return Integer::new();
    }
    if k == 1 {
        return x.clone();
    }

    // Start at 2^ceil(bitlen(x)/k), which always overshoots: the
    // iteration below only ever decreases until it crosses the root.
    let p = x.significant_bits().div_ceil(k);
    let mut y = Integer::from(1u32) << p;

    while y > 1u32 {
        // z = floor(((k−1)·y + floor(x / y^(k−1))) / k)
        let y_pow = Integer::from((&y).pow(k - 1));
        let mut z = Integer::from(&y * (k - 1));
        z += Integer::from(x / &y_pow);
        z /= k;

        if z >= y {
            return y;
        }
        y = z;
    }
    Integer::from(1u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(x: u64, k: u32) -> u64 {
        floor_root(&Integer::from(x), k).to_u64().unwrap()
    }

    #[test]
    fn exact_powers() {
        for x in 0u64..20 {
            for k in 1u32..6 {
                let pow = Integer::from(x).pow(k);
                assert_eq!(floor_root(&pow, k), x, "x={x} k={k}");
            }
        }
    }

    #[test]
    fn slightly_over_exact_power() {
        for x in 1u64..20 {
            for k in 2u32..6 {
                assert_eq!(root(x.pow(k) + 1, k), x, "x={x} k={k}");
            }
        }
    }

    #[test]
    fn slightly_under_next_power() {
        for x in 1u64..20 {
            for k in 2u32..6 {
                assert_eq!(root((x + 1).pow(k) - 1, k), x, "x={x} k={k}");
            }
        }
    }

    #[test]
    fn midway_between_exact_powers() {
        for x in 1u64..20 {
            for k in 2u32..6 {
                let mid = (x.pow(k) + (x + 1).pow(k)) / 2;
                assert_eq!(root(mid, k), x, "x={x} k={k}");
            }
        }
    }

    #[test]
    fn first_root_is_identity() {
        let x = Integer::from(123456789u64);
        assert_eq!(floor_root(&x, 1), x);
    }

    #[test]
    fn large_radicand() {
        let x = Integer::from(1u32) << 200u32;
        assert_eq!(floor_root(&x, 2), Integer::from(1u32) << 100u32);
        let x_minus_1 = x - 1u32;
        assert_eq!(
            floor_root(&x_minus_1, 2),
            (Integer::from(1u32) << 100u32) - 1u32
        );
    }

    #[test]
    #[should_panic(expected = "negative radicand")]
    fn negative_radicand_panics() {
        floor_root(&Integer::from(-1), 2);
    }

    #[test]
    #[should_panic(expected = "root index")]
    fn zero_index_panics() {
        floor_root(&Integer::from(4), 0);
    }
}
