//! # Adamant — Deterministic AKS Primality Proving
//!
//! Decides the primality of an integer n ≥ 2 with the
//! Agrawal–Kayal–Saxena polynomial congruence test: n is prime exactly
//! when it has no proper factor below a computed bound M and
//! (x + a)^n ≡ x^n + a (mod n, x^r − 1) for every a in [1, M), where r
//! is the least modulus giving n a large multiplicative order. Unlike
//! Miller–Rabin, the answer carries no error probability.
//!
//! ## Module Organization
//!
//! - [`arith`] — integer floor k-th roots (Newton iteration)
//! - [`factor`] — streaming trial division over a mod-30 wheel
//! - [`order`] — Euler's totient and multiplicative orders
//! - [`params`] — selection of the polynomial modulus r and the witness
//!   bound M
//! - [`poly`] — polynomials mod (N, x^R − 1) packed into one big integer
//!   (Kronecker substitution); the engine behind every witness check
//! - [`wordpoly`] — fixed-array fast path for word-sized moduli
//! - [`witness`] — the witness predicate and the multi-threaded search
//! - [`aks`] — the decision procedure tying everything together
//!
//! ## Design Philosophy
//!
//! The witness check dominates everything: (x + a)^n costs about
//! bitlen(n) cyclic-polynomial squarings, each realized as a single GMP
//! multiplication of the packed representation, and tens of thousands
//! of such powers may be needed per n. Every polynomial buffer and
//! every scratch integer is therefore allocated once per worker and
//! reused for the whole search; the hot loop performs no allocation.

pub mod aks;
pub mod arith;
pub mod factor;
pub mod order;
pub mod params;
pub mod poly;
pub mod witness;
pub mod wordpoly;
