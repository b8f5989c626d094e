//! Euler's totient and multiplicative orders, built on trial division.

use rug::ops::Pow;
use rug::Integer;

use crate::factor::trial_divide;

/// b^e mod m for a non-negative exponent.
pub(crate) fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    Integer::from(
        base.pow_mod_ref(exp, modulus)
            .expect("exponent is non-negative"),
    )
}

/// φ(p^k) = p^(k−1)·(p−1). The caller promises p is prime; no check is
/// performed.
pub fn euler_phi_prime_power(p: &Integer, k: u32) -> Integer {
    assert!(k >= 1, "prime power needs a positive exponent");
    let phi = Integer::from(p.pow(k - 1));
    phi * Integer::from(p - 1u32)
}

/// φ(n), computed from the trial-division factorization of n.
pub fn euler_phi(n: &Integer) -> Integer {
    let mut phi = Integer::from(1u32);
    trial_divide(
        n,
        |p, e| {
            phi *= euler_phi_prime_power(p, e);
            true
        },
        None,
    );
    phi
}

/// The least o > 0 with a^o ≡ 1 (mod p^e), assuming p prime and
/// gcd(a, p) = 1.
///
/// Builds the order from 1 upward: for each prime q dividing φ(p^e),
/// start from a raised to the q-free part of φ and multiply q back in
/// until the power reaches 1.
pub fn multiplicative_order_prime_power(a: &Integer, p: &Integer, e: u32) -> Integer {
    let modulus = Integer::from(p.pow(e));
    let t = euler_phi_prime_power(p, e);
    let mut o = Integer::from(1u32);

    let mut raise = |q: &Integer, qe: u32| {
        let q_pow = Integer::from(q.pow(qe));
        let exp = Integer::from(&t / &q_pow);
        let mut x = pow_mod(a, &exp, &modulus);
        while x != 1u32 {
            o *= q;
            x = pow_mod(&x, q, &modulus);
        }
        true
    };

    // φ(p^e) = p^(e−1)·(p−1), so its prime factors are p (when e > 1)
    // and the factors of p − 1.
    if e > 1 {
        raise(p, e - 1);
    }
    let p_minus_1 = Integer::from(p - 1u32);
    trial_divide(&p_minus_1, |q, qe| raise(q, qe), None);

    o
}

/// The least o > 0 with a^o ≡ 1 (mod n), assuming gcd(a, n) = 1: the
/// lcm of the orders modulo each prime power of n.
pub fn multiplicative_order(a: &Integer, n: &Integer) -> Integer {
    let mut o = Integer::from(1u32);
    trial_divide(
        n,
        |q, e| {
            let oq = multiplicative_order_prime_power(a, q, e);
            o.lcm_mut(&oq);
            true
        },
        None,
    );
    o
}
