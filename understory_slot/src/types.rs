// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the slot model: container identity and item stacks.

/// Identifier for a container (a chest, an inventory, a crafting grid, ...).
///
/// The host assigns these; the model only compares them. Two resolutions that
/// report the same `ContainerId` refer to the same live container.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ContainerId(pub u32);

/// The contents of one slot.
///
/// Implement this for the host's stack type. The model never inspects a stack
/// beyond asking whether it is empty; cloning must produce an independent copy
/// so that snapshots stay stable while the host keeps mutating the container.
///
/// ## Empty sentinel
///
/// [`ItemStack::empty`] is the value reported for slots that cannot be
/// resolved (out-of-range index, missing container). It must report
/// `is_empty() == true`.
pub trait ItemStack: Clone {
    /// The empty stack.
    fn empty() -> Self;

    /// Whether this stack holds nothing.
    fn is_empty(&self) -> bool;
}

/// `None` is the empty stack.
impl<T: Clone> ItemStack for Option<T> {
    #[inline]
    fn empty() -> Self {
        None
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}
