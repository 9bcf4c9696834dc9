// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failure boundary around application callbacks.
//!
//! With the `std` feature, panics are caught as well as errors. Without it,
//! only returned errors are contained.

use core::fmt;

#[cfg(feature = "std")]
use alloc::string::String;

/// Why a guarded callback produced no value.
#[derive(Debug)]
pub(crate) enum Failure<E> {
    /// The callback returned an error.
    Error(E),
    /// The callback panicked; carries the panic message when it was a string.
    #[cfg(feature = "std")]
    Panic(String),
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => e.fmt(f),
            #[cfg(feature = "std")]
            Self::Panic(msg) => write!(f, "panicked: {msg}"),
        }
    }
}

/// Run `f`, turning errors (and, with `std`, panics) into a [`Failure`].
#[cfg(feature = "std")]
pub(crate) fn call<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<T, Failure<E>> {
    match std::panic::catch_unwind(core::panic::AssertUnwindSafe(f)) {
        Ok(result) => result.map_err(Failure::Error),
        Err(payload) => Err(Failure::Panic(panic_message(payload.as_ref()))),
    }
}

/// Run `f`, turning errors into a [`Failure`].
#[cfg(not(feature = "std"))]
pub(crate) fn call<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<T, Failure<E>> {
    f().map_err(Failure::Error)
}

#[cfg(feature = "std")]
fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}
