// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the interceptor: action kinds, correlation keys, and hook outcomes.

use understory_slot::ContainerId;

use crate::bus::PublishReport;

/// Kind of click action, as reported by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ActionKind {
    /// Pick up or place a stack.
    Pickup,
    /// Shift-click transfer to the other inventory.
    QuickMove,
    /// Swap with a hotbar or off-hand slot.
    Swap,
    /// Creative-mode clone.
    Clone,
    /// Drop out of the container.
    Throw,
    /// Drag-distribute across several slots.
    QuickCraft,
    /// Double-click collect of matching stacks.
    PickupAll,
}

/// Disambiguates actions that share slot coordinates.
///
/// `frame` is the cycle counter of the tracker that issued the key; `ordinal`
/// is unique within that frame. Keys from an earlier cycle never compare equal
/// to keys issued later, even for the same slot, button and kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CycleId {
    /// Render/input cycle the action started in.
    pub frame: u64,
    /// Capture order within the cycle.
    pub ordinal: u32,
}

/// Correlation key for one logical action.
///
/// Issued when an action is captured and handed back by the host at the
/// commit boundary. Snapshots are keyed by the full value, never by slot alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ActionKey {
    /// Container the action targets.
    pub container: ContainerId,
    /// Slot index as the host reported it (may be out of range).
    pub slot: i32,
    /// Mouse button or hotbar index, host-defined.
    pub button: i32,
    /// Click action kind.
    pub kind: ActionKind,
    /// Cycle disambiguator.
    pub cycle: CycleId,
}

/// Decision of the render-head hook.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RenderHead {
    /// Cancel rendering of this element for this frame.
    Skip,
    /// Let the host render the element.
    Proceed,
}

/// Decision of the tooltip-head hook.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TooltipHead {
    /// Cancel the hovered element's tooltip.
    Suppress,
    /// Let the host draw the tooltip.
    Proceed,
}

/// Decision of the click-head hook.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClickHead {
    /// Veto the action; the host must not process it further.
    Blocked,
    /// Let the action proceed. Pass the key to the commit hook.
    Proceed(ActionKey),
}

/// Result of the click-commit hook.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommitOutcome {
    /// A post-click event carrying the captured snapshot was published.
    Published(PublishReport),
    /// No snapshot matched the key; an empty one was synthesized and published.
    Synthesized(PublishReport),
    /// The slot no longer resolves; nothing was published.
    OutOfRange,
    /// The key belongs to a different container; nothing was published.
    ContainerMismatch,
    /// The key was already committed in this cycle; nothing was published.
    Duplicate,
    /// The action was blocked or aborted before its commit; nothing was published.
    Dropped,
}

impl CommitOutcome {
    /// Whether a post-click event was published.
    pub fn published(&self) -> bool {
        matches!(self, Self::Published(_) | Self::Synthesized(_))
    }
}

/// Handle to a registered subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub(crate) u32);
