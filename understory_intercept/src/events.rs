// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads published by the interceptor.

use alloc::string::String;

use understory_slot::SlotElement;

use crate::types::{ActionKey, ActionKind};

/// An element was rendered (not hidden) this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEvent<S> {
    /// The element as resolved at render time, with its live stack.
    pub element: SlotElement<S>,
    /// Stack actually drawn: the replacement if one was chosen, else the live stack.
    pub displayed: S,
    /// Whether `displayed` came from a policy replacement.
    pub replaced: bool,
    /// Interceptor frame the render belongs to.
    pub frame: u64,
}

/// A click passed its commit boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct PostClickEvent<S> {
    /// Correlation key issued at capture.
    pub key: ActionKey,
    /// The element re-resolved at commit time (its stack is the post-action state).
    pub element: SlotElement<S>,
    /// Stack captured before the host mutated anything.
    pub pre: S,
    /// Mouse button or hotbar index.
    pub button: i32,
    /// Click action kind.
    pub kind: ActionKind,
    /// Stack held by the cursor when the click committed.
    pub cursor: S,
    /// Screen title: as captured, or read at commit time when the capture
    /// point did not know it.
    pub title: String,
    /// `pre` is an empty stand-in because no snapshot matched the key.
    pub synthesized: bool,
}

impl<S> PostClickEvent<S> {
    /// Slot index the click targeted.
    pub fn slot(&self) -> i32 {
        self.key.slot
    }
}
