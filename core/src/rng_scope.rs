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

use crate::error::BoundaryError;
use crate::host::Host;
use rand::rngs::StdRng;
use rand::Rng;
use std::cell::{Cell, RefCell};

/// Synchronizes the host's random generator with native code across nested
/// boundary crossings.
///
/// The outermost `enter` pulls the host state into local storage; the
/// matching outermost `exit` pushes it back. Inner crossings only move the
/// depth counter, so native draws made at any depth advance one shared
/// stream.
#[derive(Debug)]
pub struct RngSync {
    depth: Cell<usize>,
    local: RefCell<Option<StdRng>>,
    strict: bool,
}

impl Default for RngSync {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RngSync {
    /// `strict` makes an unmatched `exit` an error; otherwise it is ignored.
    pub fn new(strict: bool) -> Self {
        Self {
            depth: Cell::new(0),
            local: RefCell::new(None),
            strict,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Returns the new depth.
    pub fn enter<H: Host + ?Sized>(&self, host: &H) -> usize {
        let depth = self.depth.get();
        if depth == 0 {
            let state = host.get_rng_state();
            *self.local.borrow_mut() = Some(state);
            tracing::debug!(depth = depth + 1, "rng state pulled from host");
        }
        self.depth.set(depth + 1);
        depth + 1
    }

    /// Returns the new depth. The counter never goes below zero.
    pub fn exit<H: Host + ?Sized>(&self, host: &H) -> Result<usize, BoundaryError> {
        let depth = self.depth.get();
        if depth == 0 {
            tracing::warn!(strict = self.strict, "rng scope exit without matching enter");
            return if self.strict {
                Err(BoundaryError::UnbalancedScope)
            } else {
                Ok(0)
            };
        }
        self.depth.set(depth - 1);
        if depth == 1 {
            let state = self.local.borrow_mut().take();
            if let Some(state) = state {
                host.put_rng_state(state);
                tracing::debug!(depth = depth - 1, "rng state pushed to host");
            }
        }
        Ok(depth - 1)
    }

    /// Enters a scope that is exited when the guard drops.
    pub fn scope<'a, H: Host + ?Sized>(&'a self, host: &'a H) -> RngScope<'a, H> {
        let depth = self.enter(host);
        RngScope {
            sync: self,
            host,
            depth,
        }
    }

    /// Uniform draw in `[0, 1)` from the synchronized stream.
    pub fn unif_rand(&self) -> Result<f64, BoundaryError> {
        self.local
            .borrow_mut()
            .as_mut()
            .map(|rng| rng.gen::<f64>())
            .ok_or(BoundaryError::RngUnavailable)
    }

    pub fn next_u64(&self) -> Result<u64, BoundaryError> {
        self.local
            .borrow_mut()
            .as_mut()
            .map(|rng| rng.gen::<u64>())
            .ok_or(BoundaryError::RngUnavailable)
    }
}

/// Guard for one level of RNG scope nesting.
///
/// Do not mix guards with manual `exit` calls on the same `RngSync`: an
/// exit that consumes the guard's level leaves the guard's own exit
/// unmatched, which is logged and otherwise ignored.
pub struct RngScope<'a, H: Host + ?Sized> {
    sync: &'a RngSync,
    host: &'a H,
    depth: usize,
}

impl<H: Host + ?Sized> RngScope<'_, H> {
    /// Depth right after this scope was entered.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<H: Host + ?Sized> Drop for RngScope<'_, H> {
    fn drop(&mut self) {
        // Matched by the enter in `RngSync::scope`.
        if let Err(err) = self.sync.exit(self.host) {
            tracing::warn!(error = %err, depth = self.depth, "rng scope guard exit failed");
        }
    }
}
