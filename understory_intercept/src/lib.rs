// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_intercept --heading-base-level=0

//! Understory Intercept: policy, lifecycle and events between a host UI and application code.
//!
//! ## Overview
//!
//! A host UI framework fires callbacks at fixed points while it renders and processes input for a
//! container screen. This crate sits behind those callbacks and lets application code hide,
//! disguise, silence or veto individual slots, and observe what was rendered and clicked,
//! without owning the render or input pipeline.
//!
//! - [`policy`]: the four [`SlotPolicy`](policy::SlotPolicy) queries and the fail-open
//!   [`PolicyEngine`](policy::PolicyEngine) that is their only caller.
//! - [`lifecycle`]: the [`ActionTracker`](lifecycle::ActionTracker), which keeps a slot snapshot
//!   per [`ActionKey`](types::ActionKey) between a click's head and its commit.
//! - [`bus`]: synchronous, ordered, named publish/subscribe with per-subscriber failure isolation.
//! - [`tooltip`]: in-place tooltip composition with rollback of failed edits.
//! - [`interceptor`]: the host-facing hook surface that wires all of the above together.
//! - [`config`]: boolean feature flags read fresh on every query.
//!
//! ## Failure model
//!
//! Nothing in this crate returns an error to the host. Policy failures mean "allow", subscriber
//! failures are logged and skipped, and a commit with no matching snapshot publishes an empty
//! stand-in. Outcomes are reported through return values and [`tracing`] events.
//!
//! ## Workflow
//!
//! 1) Implement [`SlotPolicy`](policy::SlotPolicy) for your stack type, overriding only the
//!    queries you need.
//! 2) Create an [`Interceptor`](interceptor::Interceptor) and register subscribers.
//! 3) From the host adapter, call the hook method matching each host callback, then
//!    [`end_cycle`](interceptor::Interceptor::end_cycle) once per render/input cycle.
//!
//! ```
//! use understory_intercept::interceptor::Interceptor;
//! use understory_intercept::policy::AllowAll;
//! use understory_slot::{ContainerId, GridContainer};
//!
//! let chest: GridContainer<Option<&str>> = GridContainer::new(ContainerId(1), 9, 27);
//! let mut icpt: Interceptor<Option<&str>, AllowAll> = Interceptor::new(AllowAll);
//! icpt.register_render_subscriber("log", |e| {
//!     assert!(!e.replaced);
//!     Ok(())
//! });
//! for i in 0..27 {
//!     let _ = icpt.render_slot(&chest, i);
//! }
//! icpt.end_cycle();
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature additionally contains
//! panics raised by policies and subscribers.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod interceptor;
pub mod lifecycle;
pub mod policy;
pub mod tooltip;
pub mod types;

mod guard;

pub use error::{PolicyError, SubscriberError};
pub use interceptor::Interceptor;
pub use policy::{AllowAll, PolicyEngine, PolicyStack, PolicyVerdict, SlotPolicy};
pub use types::{ActionKey, ActionKind, ClickHead, CommitOutcome, RenderHead, TooltipHead};
