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

//! Boundary layer between native Rust code and an embedding host
//! interpreter: value marshaling, call-argument lists, lazy shape metadata,
//! condition translation and random generator synchronization.

pub mod api;
pub mod condition;
pub mod config;
pub mod error;
pub mod host;
pub mod matrix;
pub mod pairlist;
pub mod rng_scope;
pub mod runtime;
pub mod sizing;

pub use api::Boundary;
pub use condition::{Condition, NativeException};
pub use config::BoundaryConfig;
pub use error::BoundaryError;
pub use host::{Host, HostRuntime, Shield};
pub use pairlist::{language, named, pairlist, Arg, Pairlist};
pub use runtime::{IntoValue, Value, ValueHandle};
