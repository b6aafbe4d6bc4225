//! Two-phase spin barrier.
//!
//! The barrier holds two independent arrival gates used in strict
//! alternation: every participant must leave gate 1 before any of them can
//! be released from gate 2, and the reverse. A gate resets to zero when it
//! opens, so it can be reused indefinitely without a generation counter.
//!
//! Two usage modes are supported:
//!
//! - **Symmetric** ([`SpinBarrier::new`]): `K` participants each call
//!   [`SpinBarrier::wait`]; the last arrival at a gate opens it.
//! - **Driven** ([`SpinBarrier::with_driver`]): `K` participants call
//!   [`SpinBarrier::wait`] but never open a gate themselves. A separate
//!   controller thread, not counted in `K`, opens gate 1 with
//!   [`SpinBarrier::wait_for`] and gate 2 with [`SpinBarrier::release`].
//!
//! Waiting never yields or sleeps. A participant that never arrives, or a
//! participant count that does not match the real number of threads, will
//! spin forever.

use std::hint;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Busy-wait rendezvous for a fixed set of participants.
#[derive(Debug)]
pub struct SpinBarrier {
    /// Gate 1: "finished work".
    done: AtomicUsize,
    /// Gate 2: "may continue".
    proceed: AtomicUsize,
    participants: usize,
    /// Gates are opened only by `wait_for`/`release`, never by an arrival.
    driven: bool,
}

impl SpinBarrier {
    /// Create a symmetric barrier for `participants` threads calling
    /// [`wait`](Self::wait).
    ///
    /// # Panics
    /// Panics if `participants` is zero.
    pub fn new(participants: usize) -> Self {
        Self::build(participants, false)
    }

    /// Create a barrier whose gates are opened by a controller thread.
    ///
    /// The `participants` threads calling [`wait`](Self::wait) stay parked
    /// at gate 1 until the controller calls [`wait_for`](Self::wait_for) and
    /// at gate 2 until it calls [`release`](Self::release).
    ///
    /// # Panics
    /// Panics if `participants` is zero.
    pub fn with_driver(participants: usize) -> Self {
        Self::build(participants, true)
    }

    fn build(participants: usize, driven: bool) -> Self {
        assert!(participants > 0, "spin barrier needs at least one participant");
        Self {
            done: AtomicUsize::new(0),
            proceed: AtomicUsize::new(0),
            participants,
            driven,
        }
    }

    /// Number of threads expected to call [`wait`](Self::wait).
    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Whether gates are opened by a controller rather than by arrivals.
    #[inline]
    pub fn is_driven(&self) -> bool {
        self.driven
    }

    /// Arrive at both gates in turn, spinning at each until it opens.
    pub fn wait(&self) {
        self.arrive(&self.done);
        self.arrive(&self.proceed);
    }

    /// Spin until `count` participants have arrived at gate 1, then open it.
    ///
    /// Called by the controller of a driven barrier.
    pub fn wait_for(&self, count: usize) {
        debug_assert!(self.driven, "wait_for on a symmetric barrier");
        Self::open_when(&self.done, count);
    }

    /// Spin until every participant has arrived at gate 2, then open it.
    ///
    /// Called by the controller of a driven barrier. Waiting for the full
    /// count before resetting keeps a late arrival from missing the release
    /// and parking until the next cycle.
    pub fn release(&self) {
        debug_assert!(self.driven, "release on a symmetric barrier");
        Self::open_when(&self.proceed, self.participants);
    }

    fn arrive(&self, gate: &AtomicUsize) {
        let arrived = gate.fetch_add(1, Ordering::AcqRel) + 1;
        if !self.driven && arrived == self.participants {
            gate.store(0, Ordering::Release);
            return;
        }
        while gate.load(Ordering::Acquire) != 0 {
            hint::spin_loop();
        }
    }

    fn open_when(gate: &AtomicUsize, count: usize) {
        while gate.load(Ordering::Acquire) != count {
            hint::spin_loop();
        }
        gate.store(0, Ordering::Release);
    }
}
