/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * This file is part of the Ark Sovereign Compiler.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 *
 * 1. OPEN SOURCE: You may use this file under the terms of the GNU Affero
 * General Public License v3.0. If you link to this code, your ENTIRE
 * application must be open-sourced under AGPLv3.
 *
 * 2. COMMERCIAL: For proprietary use, you must obtain a Commercial License
 * from Sovereign Systems.
 *
 * PATENT NOTICE: Protected by US Patent App #63/935,467.
 * NO IMPLIED LICENSE to rights of Mohamad Al-Zawahreh or Sovereign Systems.
 */

use crate::condition::Condition;
use crate::error::BoundaryError;
use crate::pairlist::{language, pairlist, Arg, Pairlist};
use crate::runtime::ValueHandle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::ops::Deref;

/// The embedding interpreter, as seen from native code.
///
/// Every method takes `&self`: a host call may re-enter native code, which
/// may call back into the host again.
pub trait Host {
    /// Active call stack, outermost call first.
    fn sys_calls(&self) -> Pairlist;

    /// Reads the host's random generator state.
    fn get_rng_state(&self) -> StdRng;

    /// Writes the random generator state back to the host.
    fn put_rng_state(&self, state: StdRng);

    /// Shields a value from collection until the matching `unprotect`.
    fn protect(&self, value: &ValueHandle);

    /// Releases the `count` most recently protected values.
    fn unprotect(&self, count: usize);
}

impl<H: Host + ?Sized> Host for &H {
    fn sys_calls(&self) -> Pairlist {
        (**self).sys_calls()
    }

    fn get_rng_state(&self) -> StdRng {
        (**self).get_rng_state()
    }

    fn put_rng_state(&self, state: StdRng) {
        (**self).put_rng_state(state)
    }

    fn protect(&self, value: &ValueHandle) {
        (**self).protect(value)
    }

    fn unprotect(&self, count: usize) {
        (**self).unprotect(count)
    }
}

/// Scoped protection of one value. Released when dropped, including on
/// early returns and unwinding.
pub struct Shield<'h, H: Host + ?Sized> {
    host: &'h H,
    value: ValueHandle,
}

impl<'h, H: Host + ?Sized> Shield<'h, H> {
    pub fn new(host: &'h H, value: ValueHandle) -> Self {
        host.protect(&value);
        Self { host, value }
    }

    pub fn get(&self) -> ValueHandle {
        self.value.clone()
    }
}

impl<H: Host + ?Sized> Deref for Shield<'_, H> {
    type Target = ValueHandle;

    fn deref(&self) -> &ValueHandle {
        &self.value
    }
}

impl<H: Host + ?Sized> Drop for Shield<'_, H> {
    fn drop(&mut self) {
        self.host.unprotect(1);
    }
}

// =============================================================================
// In-process host
// =============================================================================

pub struct CallFrame {
    pub call: ValueHandle,
}

/// A minimal host interpreter: a frame stack, a protect stack, the random
/// generator state and a condition handler chain.
pub struct HostRuntime {
    frames: RefCell<Vec<CallFrame>>,
    protected: RefCell<Vec<ValueHandle>>,
    random_seed: RefCell<StdRng>,
    rng_reads: Cell<usize>,
    rng_writes: Cell<usize>,
}

struct FrameGuard<'a> {
    frames: &'a RefCell<Vec<CallFrame>>,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.frames.borrow_mut().pop();
    }
}

impl HostRuntime {
    pub fn new(seed: u64) -> Self {
        Self {
            frames: RefCell::new(Vec::new()),
            protected: RefCell::new(Vec::new()),
            random_seed: RefCell::new(StdRng::seed_from_u64(seed)),
            rng_reads: Cell::new(0),
            rng_writes: Cell::new(0),
        }
    }

    /// Evaluates `fun(args...)`: pushes a frame for the call, runs `body` as
    /// the callee and pops the frame on every exit path.
    pub fn call<T>(
        &self,
        fun: &str,
        args: Pairlist,
        body: impl FnOnce(&Self) -> Result<T, BoundaryError>,
    ) -> Result<T, BoundaryError> {
        self.frames.borrow_mut().push(CallFrame {
            call: language(fun, args),
        });
        let _frame = FrameGuard {
            frames: &self.frames,
        };
        body(self)
    }

    /// Runs `body` with handlers for `classes` established.
    ///
    /// A raised condition inheriting from any handler class is caught and
    /// returned as `Ok(Err(condition))`; anything else keeps propagating.
    pub fn try_catch<T>(
        &self,
        classes: &[&str],
        body: impl FnOnce(&Self) -> Result<T, BoundaryError>,
    ) -> Result<Result<T, Condition>, BoundaryError> {
        match body(self) {
            Ok(v) => Ok(Ok(v)),
            Err(BoundaryError::Raised(condition))
                if classes.iter().any(|class| condition.inherits(class)) =>
            {
                Ok(Err(*condition))
            }
            Err(e) => Err(e),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Number of values currently protected.
    pub fn protect_depth(&self) -> usize {
        self.protected.borrow().len()
    }

    /// Snapshot of the generator state.
    pub fn rng_state(&self) -> StdRng {
        self.random_seed.borrow().clone()
    }

    /// How often the generator state was read and written back.
    pub fn rng_syncs(&self) -> (usize, usize) {
        (self.rng_reads.get(), self.rng_writes.get())
    }
}

impl Host for HostRuntime {
    fn sys_calls(&self) -> Pairlist {
        let frames = self.frames.borrow();
        pairlist(
            frames
                .iter()
                .map(|frame| Arg::positional(&frame.call))
                .collect::<Vec<_>>(),
        )
    }

    fn get_rng_state(&self) -> StdRng {
        self.rng_reads.set(self.rng_reads.get() + 1);
        self.random_seed.borrow().clone()
    }

    fn put_rng_state(&self, state: StdRng) {
        self.rng_writes.set(self.rng_writes.get() + 1);
        *self.random_seed.borrow_mut() = state;
    }

    fn protect(&self, value: &ValueHandle) {
        self.protected.borrow_mut().push(value.clone());
    }

    fn unprotect(&self, count: usize) {
        let mut protected = self.protected.borrow_mut();
        let keep = protected.len().saturating_sub(count);
        protected.truncate(keep);
    }
}
