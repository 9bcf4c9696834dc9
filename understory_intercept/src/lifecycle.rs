// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action lifecycle tracking: correlate the start and the commit of one click.
//!
//! ## Overview
//!
//! A click reaches the interceptor twice: once before the host mutates anything
//! (capture) and once after the action has been dispatched past the point of no
//! return (fire). Between the two the host moves items and sends requests, so
//! the slot's contents at fire time no longer tell what was clicked.
//! [`ActionTracker`] keeps a [`Snapshot`] of the slot per [`ActionKey`] across
//! that gap.
//!
//! ## States
//!
//! Per key: `Idle → Captured → Fired`.
//! - [`ActionTracker::capture`] takes the snapshot (the empty sentinel when the
//!   index does not resolve) and issues a fresh key.
//! - [`ActionTracker::fire`] hands the snapshot back exactly once and forgets it.
//! - [`ActionTracker::end_cycle`] expires whatever was captured but never fired,
//!   and starts a new frame so no later key can match an expired one.
//!
//! Keys carry a per-frame ordinal, so interleaved actions on the same slot
//! (a fast double click) never share a snapshot.
//!
//! ## Several entry points
//!
//! Hosts can reach click processing through the screen (which has a click-head
//! hook) or through a lower interaction layer that has only a capture point.
//! When both fire for one gesture, [`ActionTracker::capture_or_adopt`] reuses the
//! snapshot the click-head already took instead of writing a second one.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use understory_slot::{Container, ContainerId, ItemStack, resolve};

use crate::types::{ActionKey, ActionKind, CycleId};

/// Immutable copy of a slot's stack taken when an action started.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<S> {
    stack: S,
    title: Option<String>,
}

impl<S> Snapshot<S> {
    /// Stack at capture time.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Screen title at capture time, when the capturing hook knew it.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Split into stack and title.
    pub fn into_parts(self) -> (S, Option<String>) {
        (self.stack, self.title)
    }
}

/// Where a key is in its lifecycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActionState {
    /// Unknown to the tracker: never captured, or expired at a cycle boundary.
    Idle,
    /// Snapshot held, waiting for the commit.
    Captured,
    /// Committed in the current cycle.
    Fired,
    /// Dropped unread in the current cycle (blocked or aborted).
    Dropped,
}

/// What [`ActionTracker::fire`] found for a key.
#[derive(Clone, Debug, PartialEq)]
pub enum Correlation<S> {
    /// The snapshot captured for this key.
    Matched(Snapshot<S>),
    /// No snapshot existed (lost to a cycle boundary, or never captured); an
    /// empty one stands in.
    Synthesized(Snapshot<S>),
    /// The key was already fired in this cycle.
    AlreadyFired,
    /// The key's snapshot was dropped unread (blocked or aborted action).
    Dropped,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Retired {
    Fired,
    Dropped,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Origin {
    // Written by a click-head, after the veto was asked.
    Head,
    // Written by a capture point without a veto; no click-head has seen it yet.
    Unvetted,
}

#[derive(Debug)]
struct Pending<S> {
    snapshot: Snapshot<S>,
    origin: Origin,
    // Set once a capture point has taken ownership of this key.
    claimed: bool,
}

/// Snapshot table for in-flight actions, scoped to one render/input cycle.
#[derive(Debug)]
pub struct ActionTracker<S> {
    frame: u64,
    next_ordinal: u32,
    pending: BTreeMap<ActionKey, Pending<S>>,
    // Keys that left `pending` this cycle, and how.
    retired: BTreeMap<ActionKey, Retired>,
}

impl<S: ItemStack> Default for ActionTracker<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ItemStack> ActionTracker<S> {
    /// Create an empty tracker at frame 0.
    pub fn new() -> Self {
        Self {
            frame: 0,
            next_ordinal: 0,
            pending: BTreeMap::new(),
            retired: BTreeMap::new(),
        }
    }

    /// Current cycle counter.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of captured, not yet fired snapshots.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Lifecycle state of `key`.
    pub fn state(&self, key: &ActionKey) -> ActionState {
        if self.pending.contains_key(key) {
            return ActionState::Captured;
        }
        match self.retired.get(key) {
            Some(Retired::Fired) => ActionState::Fired,
            Some(Retired::Dropped) => ActionState::Dropped,
            None => ActionState::Idle,
        }
    }

    fn next_key(
        &mut self,
        container: ContainerId,
        slot: i32,
        button: i32,
        kind: ActionKind,
    ) -> ActionKey {
        let ordinal = self.next_ordinal;
        self.next_ordinal = self.next_ordinal.wrapping_add(1);
        ActionKey {
            container,
            slot,
            button,
            kind,
            cycle: CycleId {
                frame: self.frame,
                ordinal,
            },
        }
    }

    /// `Idle → Captured` at a click-head, after the veto said no.
    ///
    /// Snapshots the slot and issues a fresh key. An index that does not
    /// resolve snapshots the empty stack. `title` is kept alongside the
    /// snapshot for the post-click event.
    ///
    /// If a capture point without a veto already snapshotted this gesture in
    /// the current cycle, that entry is marked vetted and its key returned, so
    /// the gesture keeps its earliest snapshot.
    pub fn capture(
        &mut self,
        container: &dyn Container<Stack = S>,
        slot: i32,
        button: i32,
        kind: ActionKind,
        title: Option<&str>,
    ) -> ActionKey {
        if let Some(key) = self.vet(container.id(), slot, button, kind, title) {
            return key;
        }
        self.insert(container, slot, button, kind, title, Origin::Head)
    }

    fn insert(
        &mut self,
        container: &dyn Container<Stack = S>,
        slot: i32,
        button: i32,
        kind: ActionKind,
        title: Option<&str>,
        origin: Origin,
    ) -> ActionKey {
        let key = self.next_key(container.id(), slot, button, kind);
        let snapshot = Snapshot {
            stack: resolve(container, slot).into_stack(),
            title: title.map(String::from),
        };
        // Unvetted entries belong to the capture point that wrote them.
        let claimed = origin == Origin::Unvetted;
        self.pending.insert(
            key,
            Pending {
                snapshot,
                origin,
                claimed,
            },
        );
        tracing::trace!(target: "understory_intercept::lifecycle", ?key, ?origin, "captured");
        key
    }

    fn vet(
        &mut self,
        container: ContainerId,
        slot: i32,
        button: i32,
        kind: ActionKind,
        title: Option<&str>,
    ) -> Option<ActionKey> {
        let (key, pending) = self.pending.iter_mut().find(|(k, p)| {
            p.origin == Origin::Unvetted && same_gesture(k, container, slot, button, kind)
        })?;
        pending.origin = Origin::Head;
        if pending.snapshot.title.is_none() {
            pending.snapshot.title = title.map(String::from);
        }
        tracing::trace!(target: "understory_intercept::lifecycle", key = ?key, "vetted");
        Some(*key)
    }

    /// Claim the oldest unclaimed capture of this gesture in the current cycle.
    pub fn adopt(
        &mut self,
        container: ContainerId,
        slot: i32,
        button: i32,
        kind: ActionKind,
    ) -> Option<ActionKey> {
        // Keys order by coordinates first, then by cycle, so the first match is the oldest.
        let (key, pending) = self.pending.iter_mut().find(|(k, p)| {
            !p.claimed && same_gesture(k, container, slot, button, kind)
        })?;
        pending.claimed = true;
        tracing::trace!(target: "understory_intercept::lifecycle", key = ?key, "adopted");
        Some(*key)
    }

    /// Adopt a matching click-head capture, or capture afresh as unvetted.
    pub fn capture_or_adopt(
        &mut self,
        container: &dyn Container<Stack = S>,
        slot: i32,
        button: i32,
        kind: ActionKind,
    ) -> ActionKey {
        match self.adopt(container.id(), slot, button, kind) {
            Some(key) => key,
            None => self.insert(container, slot, button, kind, None, Origin::Unvetted),
        }
    }

    /// `Captured → Fired`: hand back the snapshot for `key` and forget it.
    pub fn fire(&mut self, key: &ActionKey) -> Correlation<S> {
        if let Some(pending) = self.pending.remove(key) {
            self.retired.insert(*key, Retired::Fired);
            return Correlation::Matched(pending.snapshot);
        }
        match self.retired.get(key) {
            Some(Retired::Fired) => {
                tracing::debug!(
                    target: "understory_intercept::lifecycle",
                    ?key,
                    "action already fired this cycle"
                );
                return Correlation::AlreadyFired;
            }
            Some(Retired::Dropped) => {
                tracing::debug!(
                    target: "understory_intercept::lifecycle",
                    ?key,
                    "commit for a dropped action"
                );
                return Correlation::Dropped;
            }
            None => {}
        }
        tracing::warn!(
            target: "understory_intercept::lifecycle",
            ?key,
            current_frame = self.frame,
            "no snapshot for action; synthesizing an empty one"
        );
        self.retired.insert(*key, Retired::Fired);
        Correlation::Synthesized(Snapshot {
            stack: S::empty(),
            title: None,
        })
    }

    /// Drop the snapshot for `key` unread (blocked or aborted action).
    ///
    /// A later [`fire`](Self::fire) for `key` in this cycle reports
    /// [`Correlation::Dropped`]. Returns whether a snapshot was pending.
    pub fn discard(&mut self, key: &ActionKey) -> bool {
        if self.pending.remove(key).is_none() {
            return false;
        }
        self.retired.insert(*key, Retired::Dropped);
        true
    }

    /// Drop the unvetted snapshots of one gesture in the current cycle.
    ///
    /// Used when a click-head vetoes a gesture that a capture point without a
    /// veto already snapshotted. Snapshots written or vetted by a click-head
    /// belong to clicks that went through and are kept.
    pub fn discard_unvetted(
        &mut self,
        container: ContainerId,
        slot: i32,
        button: i32,
        kind: ActionKind,
    ) -> usize {
        let keys: Vec<ActionKey> = self
            .pending
            .iter()
            .filter(|(k, p)| {
                p.origin == Origin::Unvetted && same_gesture(k, container, slot, button, kind)
            })
            .map(|(k, _)| *k)
            .collect();
        for key in &keys {
            self.discard(key);
        }
        keys.len()
    }

    /// Close the cycle: expire unfired snapshots and advance the frame.
    ///
    /// Returns how many snapshots expired.
    pub fn end_cycle(&mut self) -> usize {
        let expired = self.pending.len();
        for key in self.pending.keys() {
            tracing::debug!(
                target: "understory_intercept::lifecycle",
                ?key,
                "expiring snapshot that never reached its commit"
            );
        }
        self.pending.clear();
        self.retired.clear();
        self.frame = self.frame.wrapping_add(1);
        self.next_ordinal = 0;
        expired
    }
}

fn same_gesture(
    key: &ActionKey,
    container: ContainerId,
    slot: i32,
    button: i32,
    kind: ActionKind,
) -> bool {
    key.container == container && key.slot == slot && key.button == button && key.kind == kind
}
