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

use crate::config::BoundaryConfig;
use crate::host::{Host, Shield};
use crate::runtime::{IntoValue, Object, Value, ValueHandle};
use serde::Serialize;
use std::any::{type_name, Any};
use std::backtrace::Backtrace;

/// Runtime type name given to panics caught at the boundary.
pub const PANIC_CLASS: &str = "NativePanic";

/// A native failure about to cross into the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeException {
    /// Human-readable runtime type name of the failure.
    pub class: String,
    pub message: String,
}

impl NativeException {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Captures the static type name of `err` together with its message.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new(demangle(type_name::<E>()), err.to_string())
    }

    /// Builds an exception from a `catch_unwind` payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::new(PANIC_CLASS, message)
    }
}

/// Strips module paths from a Rust type name, including inside generic
/// arguments: `alloc::boxed::Box<dyn core::error::Error>` becomes
/// `Box<dyn Error>`.
pub fn demangle(raw: &str) -> String {
    fn flush(out: &mut String, token: &str) {
        out.push_str(token.rsplit("::").next().unwrap_or(token));
    }

    let mut out = String::with_capacity(raw.len());
    let mut token = String::new();
    for c in raw.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            token.push(c);
        } else {
            flush(&mut out, &token);
            token.clear();
            out.push(c);
        }
    }
    flush(&mut out, &token);
    out
}

/// A classified error record, most specific class first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub message: String,
    pub call: Option<ValueHandle>,
    #[serde(rename = "nativeStack")]
    pub native_stack: Option<Vec<String>>,
    pub classes: Vec<String>,
}

impl Condition {
    /// The host's plain `simpleError`: no call, generic classification.
    pub fn simple_error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            call: None,
            native_stack: None,
            classes: vec![
                "simpleError".to_string(),
                "error".to_string(),
                "condition".to_string(),
            ],
        }
    }

    pub fn inherits(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Host representation: a named list `message`, `call`, `nativeStack`
    /// carrying the class vector.
    pub fn to_value(&self) -> ValueHandle {
        let fields = vec![
            self.message.as_str().into_value(),
            self.call.clone().into_value(),
            self.native_stack.clone().into_value(),
        ];
        Object::new(Value::List(fields))
            .with_attribute("names", vec!["message", "call", "nativeStack"])
            .with_attribute("class", self.classes.clone())
            .into_handle()
    }
}

/// Innermost entry of the host's active call stack.
pub fn get_last_call<H: Host + ?Sized>(host: &H) -> Option<ValueHandle> {
    let calls = Shield::new(host, host.sys_calls().into_value());
    match calls.value() {
        Value::Pairlist(list) => list.iter().last().map(|node| node.car.clone()),
        _ => None,
    }
}

pub fn exception_classes(ex_class: &str, native_error_class: &str) -> Vec<String> {
    vec![
        ex_class.to_string(),
        native_error_class.to_string(),
        "error".to_string(),
        "condition".to_string(),
    ]
}

fn capture_native_stack() -> Vec<String> {
    Backtrace::force_capture()
        .to_string()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Translates a native exception into a host condition.
///
/// Never fails: an empty call stack yields an absent call.
pub fn exception_to_condition<H: Host + ?Sized>(
    host: &H,
    config: &BoundaryConfig,
    ex: &NativeException,
) -> Condition {
    let call = if config.capture_call {
        get_last_call(host).map(|call| Shield::new(host, call))
    } else {
        None
    };
    let native_stack = config.capture_native_stack.then(capture_native_stack);

    let condition = Condition {
        message: ex.message.clone(),
        call: call.as_ref().map(|c| c.get()),
        native_stack,
        classes: exception_classes(&ex.class, &config.native_error_class),
    };
    tracing::trace!(class = %ex.class, message = %ex.message, "built condition");
    condition
}

/// Error-as-value: the message as a `try-error` string carrying a simple
/// condition under its `condition` attribute.
pub fn string_to_try_error(message: &str) -> ValueHandle {
    Object::new(Value::string(message))
        .with_attribute("class", "try-error")
        .with_attribute("condition", Condition::simple_error(message).to_value())
        .into_handle()
}

pub fn exception_to_try_error(ex: &NativeException) -> ValueHandle {
    string_to_try_error(&ex.message)
}
