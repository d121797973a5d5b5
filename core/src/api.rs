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

use crate::condition::{self, Condition, NativeException};
use crate::config::BoundaryConfig;
use crate::error::BoundaryError;
use crate::host::Host;
use crate::rng_scope::{RngScope, RngSync};
use crate::runtime::ValueHandle;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Entry points native code uses to talk to the host: error translation and
/// random generator synchronization.
pub struct Boundary<H: Host> {
    host: H,
    rng: RngSync,
    config: BoundaryConfig,
}

impl<H: Host> Boundary<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, BoundaryConfig::default())
    }

    pub fn with_config(host: H, config: BoundaryConfig) -> Self {
        Self {
            rng: RngSync::new(config.strict_scope),
            host,
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn condition_for(&self, ex: &NativeException) -> Condition {
        condition::exception_to_condition(&self.host, &self.config, ex)
    }

    /// Signals `ex` to the host. The returned error must be propagated to
    /// the nearest host handler.
    pub fn raise_condition(&self, ex: &NativeException) -> BoundaryError {
        BoundaryError::Raised(Box::new(self.condition_for(ex)))
    }

    pub fn raise_error<E: std::error::Error + ?Sized>(&self, err: &E) -> BoundaryError {
        self.raise_condition(&NativeException::from_error(err))
    }

    pub fn exception_to_try_error(&self, ex: &NativeException) -> ValueHandle {
        condition::exception_to_try_error(ex)
    }

    pub fn string_to_try_error(&self, message: &str) -> ValueHandle {
        condition::string_to_try_error(message)
    }

    pub fn enter_rng_scope(&self) -> usize {
        self.rng.enter(&self.host)
    }

    pub fn exit_rng_scope(&self) -> Result<usize, BoundaryError> {
        self.rng.exit(&self.host)
    }

    pub fn rng_scope(&self) -> RngScope<'_, H> {
        self.rng.scope(&self.host)
    }

    pub fn rng_depth(&self) -> usize {
        self.rng.depth()
    }

    pub fn unif_rand(&self) -> Result<f64, BoundaryError> {
        self.rng.unif_rand()
    }

    /// Runs native code inside an RNG scope and translates its failures.
    ///
    /// A `BoundaryError` returned from a nested crossing passes through as
    /// is; any other error or a panic is raised as a condition.
    pub fn run<T, E, F>(&self, body: F) -> Result<T, BoundaryError>
    where
        E: std::error::Error + 'static,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        let _scope = self.rng_scope();
        match panic::catch_unwind(AssertUnwindSafe(|| body(self))) {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(err)) => Err(self.translate(err)),
            Err(payload) => {
                let ex = NativeException::from_panic(payload.as_ref());
                Err(self.raise_condition(&ex))
            }
        }
    }

    fn translate<E: std::error::Error + 'static>(&self, err: E) -> BoundaryError {
        let ex = NativeException::from_error(&err);
        let boxed: Box<dyn Any> = Box::new(err);
        match boxed.downcast::<BoundaryError>() {
            Ok(inner) => *inner,
            Err(_) => self.raise_condition(&ex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostRuntime;
    use crate::pairlist::{named, pairlist, Arg, Pairlist};
    use crate::runtime::{IntoValue, Value};
    use pretty_assertions::assert_eq;
    use std::fmt;

    #[derive(Debug)]
    struct BadInput;

    impl fmt::Display for BadInput {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "bad input")
        }
    }

    impl std::error::Error for BadInput {}

    #[test]
    fn test_raise_reaches_handler_at_every_level() {
        let boundary = Boundary::new(HostRuntime::new(0));
        for class in ["BadInput", "NativeError", "error", "condition"] {
            let caught = boundary
                .host()
                .try_catch(&[class], |h| {
                    h.call("native", Pairlist::Nil, |_| -> Result<(), BoundaryError> {
                        Err(boundary.raise_error(&BadInput))
                    })
                })
                .unwrap();
            let condition = caught.unwrap_err();
            assert_eq!(condition.message, "bad input");
            assert_eq!(
                condition.call.as_ref().map(|c| c.to_string()),
                Some("native()".to_string())
            );
        }
        assert_eq!(boundary.host().depth(), 0);
    }

    #[test]
    fn test_run_translates_error() {
        let boundary = Boundary::new(HostRuntime::new(0));
        let res: Result<(), _> = boundary.run(|_| Err(BadInput));
        let condition = res.unwrap_err().condition().cloned().unwrap();
        assert_eq!(
            condition.classes,
            vec!["BadInput", "NativeError", "error", "condition"]
        );
        assert_eq!(boundary.rng_depth(), 0);
    }

    #[test]
    fn test_run_passes_nested_condition_through() {
        let boundary = Boundary::new(HostRuntime::new(0));
        let res: Result<(), _> = boundary.run(|b| {
            b.run(|_| -> Result<(), BadInput> { Err(BadInput) })
        });
        let condition = res.unwrap_err().condition().cloned().unwrap();
        assert_eq!(condition.classes[0], "BadInput");
    }

    #[test]
    fn test_run_translates_panic() {
        let boundary = Boundary::new(HostRuntime::new(0));
        let res: Result<(), BoundaryError> = boundary.run(|_| -> Result<(), BadInput> {
            panic!("index out of bounds");
        });
        let err = res.unwrap_err();
        assert_eq!(err.to_string(), "index out of bounds");
        let condition = err.condition().unwrap();
        assert_eq!(condition.classes[0], "NativePanic");
        assert!(condition.inherits("error"));
        assert_eq!(boundary.rng_depth(), 0);
        assert_eq!(boundary.host().rng_syncs(), (1, 1));
    }

    #[test]
    fn test_run_value_and_rng() {
        let boundary = Boundary::new(HostRuntime::new(5));
        let draws = boundary
            .run(|b| -> Result<Vec<f64>, BoundaryError> {
                let first = b.unif_rand()?;
                let nested = b.run(|b| b.unif_rand())?;
                Ok(vec![first, nested])
            })
            .unwrap();
        assert_eq!(draws.len(), 2);
        assert!(draws.iter().all(|d| (0.0..1.0).contains(d)));
        assert_ne!(draws[0], draws[1]);
        assert_eq!(boundary.host().rng_syncs(), (1, 1));
    }

    #[test]
    fn test_entry_point_counts() {
        let boundary = Boundary::new(HostRuntime::new(0));
        let counts = vec![
            boundary.enter_rng_scope(),
            boundary.enter_rng_scope(),
            boundary.exit_rng_scope().unwrap(),
            boundary.enter_rng_scope(),
            boundary.exit_rng_scope().unwrap(),
            boundary.exit_rng_scope().unwrap(),
        ];
        assert_eq!(counts, vec![1, 2, 1, 2, 1, 0]);
        assert!(matches!(
            boundary.exit_rng_scope(),
            Err(BoundaryError::UnbalancedScope)
        ));
    }

    #[test]
    fn test_lenient_config() {
        let config = BoundaryConfig::from_json(r#"{"strict_scope": false}"#).unwrap();
        let boundary = Boundary::with_config(HostRuntime::new(0), config);
        assert_eq!(boundary.exit_rng_scope().unwrap(), 0);
    }

    #[test]
    fn test_try_error_values() {
        let boundary = Boundary::new(HostRuntime::new(0));

        let value = boundary.string_to_try_error("boom");
        assert!(value.inherits("try-error"));
        let condition = value.attribute("condition").cloned().unwrap();
        assert_eq!(condition.element(0), Some("boom".into_value()));

        let value = boundary.exception_to_try_error(&NativeException::new("E", "bad"));
        assert_eq!(value.value(), &Value::string("bad"));
        // no unwinding, no frames touched
        assert_eq!(boundary.host().depth(), 0);
    }

    #[test]
    fn test_borrowed_host() {
        let host = HostRuntime::new(0);
        let boundary = Boundary::new(&host);
        let condition = host
            .call("f", pairlist(vec![named("x", 1), Arg::positional(2)]), |_| {
                Ok(boundary.condition_for(&NativeException::new("E", "m")))
            })
            .unwrap();
        assert_eq!(
            condition.call.map(|c| c.to_string()),
            Some("f(x = 1L, 2L)".to_string())
        );
        assert_eq!(host.protect_depth(), 0);
    }
}
