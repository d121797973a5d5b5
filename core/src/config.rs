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
use serde::{Deserialize, Serialize};

/// Tunables for a [`Boundary`](crate::api::Boundary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundaryConfig {
    /// Class placed right after the exception's own type name.
    pub native_error_class: String,
    /// Capture the innermost active host call into raised conditions.
    pub capture_call: bool,
    /// Record a native backtrace into raised conditions.
    pub capture_native_stack: bool,
    /// Report an unmatched RNG scope exit as an error instead of ignoring it.
    pub strict_scope: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            native_error_class: "NativeError".to_string(),
            capture_call: true,
            capture_native_stack: false,
            strict_scope: true,
        }
    }
}

impl BoundaryConfig {
    pub fn from_json(json: &str) -> Result<Self, BoundaryError> {
        Ok(serde_json::from_str(json)?)
    }
}
