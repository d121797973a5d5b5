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
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoundaryError {
    /// A condition signaled to the host. Call sites propagate it untouched
    /// until a host handler intercepts it.
    #[error("{}", .0.message)]
    Raised(Box<Condition>),
    #[error("RNG scope exited more times than it was entered")]
    UnbalancedScope,
    #[error("Random draw outside of an RNG scope")]
    RngUnavailable,
    #[error("Config Parse Error: {0}")]
    Config(#[from] serde_json::Error),
}

impl BoundaryError {
    /// The raised condition, if this error is one.
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            BoundaryError::Raised(condition) => Some(condition),
            _ => None,
        }
    }
}
