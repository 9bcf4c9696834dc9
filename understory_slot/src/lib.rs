// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_slot --heading-base-level=0

//! Understory Slot: the slot model of a grid container screen.
//!
//! ## Overview
//!
//! A container screen shows a grid of addressable cells ("slots"), each holding one item stack.
//! This crate describes those cells without owning them: the host keeps the container, and this
//! crate reads it through the [`Container`] trait whenever a question is asked.
//!
//! - [`SlotElement`]: one cell as seen at resolution time (owner, index, stack, bounds).
//! - [`resolve`]: bounds-checked resolution; out-of-range indices yield the
//!   [sentinel](SlotElement::sentinel) instead of faulting.
//! - [`slot_at`]: point hit testing over slot bounds.
//! - [`ScreenContext`]: title, cursor stack, active container and pointer for one render/input cycle.
//! - [`GridContainer`]: a reference container with a row-major grid layout.
//!
//! ## No caching
//!
//! Hosts mutate containers between hook firings, and may resize them mid-teardown.
//! Resolve again on every firing; never hold a [`SlotElement`] across cycles.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_slot::{ContainerId, GridContainer, resolve};
//!
//! let mut chest: GridContainer<Option<&str>> = GridContainer::new(ContainerId(1), 9, 27);
//! chest.set(4, Some("diamond"));
//!
//! assert_eq!(resolve(&chest, 4).stack(), &Some("diamond"));
//! assert!(resolve(&chest, 27).is_sentinel());
//! assert!(resolve(&chest, -999).is_sentinel());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod container;
mod element;
mod screen;
mod types;

pub use container::{Container, GridContainer};
pub use element::{SlotElement, resolve, resolve_in, slot_at};
pub use screen::ScreenContext;
pub use types::{ContainerId, ItemStack};
