//! The AKS witness predicate and the concurrent witness search.
//!
//! An integer a is an AKS witness for n when
//! (x + a)^n ≢ x^n + a (mod n, x^r − 1); one witness certifies n
//! composite. The driver farms candidates out to worker threads over a
//! bounded channel, each worker owning its own preallocated polynomial
//! workspace, and takes the first witness any worker reports. Ordering
//! across workers is deliberately unspecified; any witness suffices.
//!
//! Only the two channels are shared. Workers never hold a lock while
//! doing arithmetic; closing the candidate channel is the sole shutdown
//! signal.

use std::fmt;
use std::process;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use rug::Integer;

use crate::poly::{MulScratch, PackedPoly, PolyParams};
use crate::wordpoly::WordPoly;

/// Sink for per-candidate progress lines. The CLI wires this to stderr;
/// benchmarks and tests install [`NullLog`].
pub trait WitnessLog: Send + Sync {
    fn record(&self, line: fmt::Arguments<'_>);
}

/// Writes every record to stderr.
pub struct StderrLog;

impl WitnessLog for StderrLog {
    fn record(&self, line: fmt::Arguments<'_>) {
        eprintln!("{line}");
    }
}

/// Swallows every record.
pub struct NullLog;

impl WitnessLog for NullLog {
    fn record(&self, _line: fmt::Arguments<'_>) {}
}

/// Per-worker workspace for the packed engine: the three polynomials of
/// a witness check plus the multiplication scratch, built once and
/// reused for every candidate.
pub struct WitnessScratch {
    params: PolyParams,
    lhs: PackedPoly,
    rhs: PackedPoly,
    tmp: PackedPoly,
    mul: MulScratch,
}

impl WitnessScratch {
    pub fn new(n: &Integer, r: &Integer) -> WitnessScratch {
        let params = PolyParams::new(n, r);
        WitnessScratch {
            lhs: PackedPoly::new(&params),
            rhs: PackedPoly::new(&params),
            tmp: PackedPoly::new(&params),
            mul: MulScratch::new(&params),
            params,
        }
    }
}

/// Returns whether a is an AKS witness for n, i.e. whether
/// (x + a)^n ≢ x^n + a (mod n, x^r − 1). n and r are fixed by the
/// scratch.
pub fn is_aks_witness(n: &Integer, a: &Integer, scratch: &mut WitnessScratch) -> bool {
    debug_assert_eq!(n, scratch.params.modulus());

    // Left-hand side: (x + a)^n.
    let one = Integer::from(1u32);
    scratch.lhs.set(a, &one, &scratch.params);
    scratch
        .lhs
        .pow(n, &mut scratch.tmp, &scratch.params, &mut scratch.mul);

    // Right-hand side: x^(n mod r) + a.
    scratch.rhs.set(a, n, &scratch.params);

    !scratch.lhs.eq(&scratch.rhs)
}

/// Word-engine counterpart of [`WitnessScratch`], used when n fits in a
/// machine word.
pub struct WordWitnessScratch {
    n: u64,
    lhs: WordPoly,
    rhs: WordPoly,
    tmp1: WordPoly,
    tmp2: WordPoly,
}

impl WordWitnessScratch {
    pub fn new(n: u64, r: usize) -> WordWitnessScratch {
        WordWitnessScratch {
            n,
            lhs: WordPoly::new(r),
            rhs: WordPoly::new(r),
            tmp1: WordPoly::new(r),
            tmp2: WordPoly::new(r),
        }
    }
}

/// Word-engine witness check; semantics identical to [`is_aks_witness`].
pub fn is_aks_witness_word(a: u64, scratch: &mut WordWitnessScratch) -> bool {
    let n = scratch.n;
    scratch.lhs.set(a, 1, n);
    scratch.lhs.pow(n, n, &mut scratch.tmp1, &mut scratch.tmp2);
    scratch.rhs.set(a, n, n);
    !scratch.lhs.eq(&scratch.rhs)
}

/// Outcome of one candidate test, sent from a worker to the driver.
struct WitnessResult {
    a: Integer,
    is_witness: bool,
}

/// Turns a worker panic into a process abort. A panic inside the engine
/// means its packing invariants no longer hold, and the driver would
/// otherwise block forever on the lost result.
struct AbortOnPanic;

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            eprintln!("witness worker panicked; aborting");
            process::abort();
        }
    }
}

fn run_worker(
    n: &Integer,
    r: &Integer,
    word_n: Option<u64>,
    candidates: &Mutex<Receiver<Integer>>,
    results: SyncSender<WitnessResult>,
    log: &dyn WitnessLog,
) {
    let _abort = AbortOnPanic;
    match word_n {
        Some(n_word) => {
            let r = r.to_usize().expect("exponent modulus fits in usize");
            let mut scratch = WordWitnessScratch::new(n_word, r);
            serve(candidates, &results, log, |a| {
                let a = a.to_u64().expect("candidate fits in a word");
                is_aks_witness_word(a, &mut scratch)
            });
        }
        None => {
            let mut scratch = WitnessScratch::new(n, r);
            serve(candidates, &results, log, |a| {
                is_aks_witness(n, a, &mut scratch)
            });
        }
    }
}

/// Worker loop: pull candidates until the channel closes, report each
/// result, exit as soon as the driver stops listening.
fn serve<F>(
    candidates: &Mutex<Receiver<Integer>>,
    results: &SyncSender<WitnessResult>,
    log: &dyn WitnessLog,
    mut test: F,
) where
    F: FnMut(&Integer) -> bool,
{
    loop {
        let a = match candidates.lock().unwrap().recv() {
            Ok(a) => a,
            Err(_) => break,
        };
        log.record(format_args!("testing {a}..."));
        let is_witness = test(&a);
        log.record(format_args!("finished testing {a} (witness: {is_witness})"));
        if results.send(WitnessResult { a, is_witness }).is_err() {
            break;
        }
    }
}

/// Searches [start, end) for an AKS witness of n, testing candidates on
/// `jobs` worker threads. Returns the first witness any worker reports
/// (not necessarily the smallest), or None once the range is exhausted.
pub fn get_aks_witness(
    n: &Integer,
    r: &Integer,
    start: &Integer,
    end: &Integer,
    jobs: usize,
    log: &dyn WitnessLog,
) -> Option<Integer> {
    assert!(jobs > 0, "need at least one worker");
    if start >= end {
        return None;
    }

    // The word engine only applies when every candidate fits alongside n.
    let word_n = if end.to_u64().is_some() { n.to_u64() } else { None };

    let (cand_tx, cand_rx) = mpsc::sync_channel::<Integer>(jobs);
    let (res_tx, res_rx) = mpsc::sync_channel::<WitnessResult>(jobs);
    let cand_rx = Arc::new(Mutex::new(cand_rx));

    thread::scope(|s| {
        for _ in 0..jobs {
            let cand_rx = Arc::clone(&cand_rx);
            let res_tx = res_tx.clone();
            s.spawn(move || run_worker(n, r, word_n, &cand_rx, res_tx, log));
        }
        drop(res_tx);

        // Hand out candidates, draining finished results as they come
        // in; the first witness ends the search.
        let mut next = start.clone();
        let mut drained = start.clone();
        let mut witness = None;
        while next < *end {
            match res_rx.try_recv() {
                Ok(result) => {
                    drained += 1u32;
                    log.record(format_args!("{} witness: {}", result.a, result.is_witness));
                    if result.is_witness {
                        witness = Some(result.a);
                        break;
                    }
                }
                Err(TryRecvError::Empty) => {
                    cand_tx
                        .send(next.clone())
                        .expect("worker pool outlives dispatch");
                    next += 1u32;
                }
                Err(TryRecvError::Disconnected) => {
                    unreachable!("workers hold result senders until shutdown")
                }
            }
        }

        // Everything is dispatched; wait for the stragglers.
        while witness.is_none() && drained < next {
            let Ok(result) = res_rx.recv() else { break };
            drained += 1u32;
            log.record(format_args!("{} witness: {}", result.a, result.is_witness));
            if result.is_witness {
                witness = Some(result.a);
            }
        }

        // Closing the candidate channel sends the workers home; dropping
        // the result receiver unblocks any worker mid-send.
        drop(cand_tx);
        drop(res_rx);
        witness
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{aks_modulus, aks_witness_bound};

    #[test]
    fn primes_have_no_witnesses() {
        // (x + a)^p ≡ x^p + a holds mod p alone, whatever r is.
        let n = Integer::from(101u32);
        for r in [5u32, 7, 53] {
            let r = Integer::from(r);
            let mut scratch = WitnessScratch::new(&n, &r);
            for a in 1u32..8 {
                assert!(
                    !is_aks_witness(&n, &Integer::from(a), &mut scratch),
                    "a = {a}, r = {r}"
                );
            }
        }
    }

    #[test]
    fn word_and_packed_engines_agree() {
        for n in [91u64, 101, 323, 561] {
            let n_big = Integer::from(n);
            for r in [5u64, 16, 29] {
                let mut packed = WitnessScratch::new(&n_big, &Integer::from(r));
                let mut word = WordWitnessScratch::new(n, r as usize);
                for a in 1u64..10 {
                    assert_eq!(
                        is_aks_witness(&n_big, &Integer::from(a), &mut packed),
                        is_aks_witness_word(a, &mut word),
                        "n = {n}, r = {r}, a = {a}"
                    );
                }
            }
        }
    }

    #[test]
    fn hand_checked_witness_for_six() {
        // mod (6, x² − 1): (x + 1)^6 ≡ 2x + 2, while x^6 + 1 ≡ 2.
        let n = Integer::from(6u32);
        let r = Integer::from(2u32);
        let mut scratch = WitnessScratch::new(&n, &r);
        assert!(is_aks_witness(&n, &Integer::from(1u32), &mut scratch));
    }

    #[test]
    fn driver_finds_the_hand_checked_witness() {
        let n = Integer::from(6u32);
        let r = Integer::from(2u32);
        let found = get_aks_witness(
            &n,
            &r,
            &Integer::from(1u32),
            &Integer::from(2u32),
            2,
            &NullLog,
        );
        assert_eq!(found, Some(Integer::from(1u32)));
    }

    #[test]
    fn driver_exhausts_a_witness_free_range() {
        let n = Integer::from(101u32);
        let r = aks_modulus(&n);
        let m = aks_witness_bound(&n, &r);
        let end = std::cmp::min(m, Integer::from(20u32));
        let found = get_aks_witness(&n, &r, &Integer::from(1u32), &end, 4, &NullLog);
        assert_eq!(found, None);
    }

    #[test]
    fn driver_result_is_a_real_witness() {
        // 323 = 17 · 19; whatever the driver returns must verify.
        let n = Integer::from(323u32);
        let r = aks_modulus(&n);
        let found = get_aks_witness(
            &n,
            &r,
            &Integer::from(1u32),
            &Integer::from(10u32),
            3,
            &NullLog,
        );
        if let Some(a) = &found {
            let mut scratch = WitnessScratch::new(&n, &r);
            assert!(is_aks_witness(&n, a, &mut scratch));
        }
        // And a single-threaded rescan agrees about existence.
        let sequential = get_aks_witness(
            &n,
            &r,
            &Integer::from(1u32),
            &Integer::from(10u32),
            1,
            &NullLog,
        );
        assert_eq!(found.is_some(), sequential.is_some());
    }

    #[test]
    fn empty_range_yields_nothing() {
        let n = Integer::from(101u32);
        let r = Integer::from(5u32);
        let found = get_aks_witness(
            &n,
            &r,
            &Integer::from(7u32),
            &Integer::from(7u32),
            2,
            &NullLog,
        );
        assert_eq!(found, None);
    }
}
