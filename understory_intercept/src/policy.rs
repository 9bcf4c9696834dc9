// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Policy queries and the fail-open boundary around them.
//!
//! ## Overview
//!
//! Application code decides what happens to a slot by implementing
//! [`SlotPolicy`]. The four queries are independent and each is asked at one
//! hook point:
//!
//! | Query | Hook | Effect when `true` / `Some` |
//! |---|---|---|
//! | [`should_hide`](SlotPolicy::should_hide) | render-head | element skipped this frame |
//! | [`replacement_stack`](SlotPolicy::replacement_stack) | stack resolution | drawn instead of the real stack |
//! | [`should_suppress_tooltip`](SlotPolicy::should_suppress_tooltip) | tooltip-head | tooltip cancelled |
//! | [`should_block_action`](SlotPolicy::should_block_action) | click-head | action vetoed before any side effect |
//!
//! Queries take `&self` and must not mutate container state. They are asked
//! afresh on every hook firing; nothing is cached between frames.
//!
//! ## Failure
//!
//! [`PolicyEngine`] is the only caller of a policy. A query that returns an
//! error (or panics, with the `std` feature) counts as "allow the host's normal
//! behavior" and is logged. This holds for click blocking too: a broken policy
//! never silently swallows a legitimate click.
//!
//! ## Composition
//!
//! [`PolicyStack`] combines several independently written policies, for example
//! one per feature, into one.

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_slot::{ItemStack, ScreenContext, SlotElement};

use crate::error::PolicyError;
use crate::guard;
use crate::types::ActionKind;

/// One verdict component, as produced by the [`PolicyEngine`] verdict views.
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyVerdict<S> {
    /// Leave the host's behavior alone.
    Allow,
    /// Skip rendering the element this frame.
    HideElement,
    /// Render this stack instead of the element's real contents.
    ReplaceStack(S),
    /// Cancel the element's tooltip.
    SuppressTooltip,
    /// Veto the action.
    BlockAction,
}

/// Application policy over slots.
///
/// Every query defaults to "allow"; implement only the ones you need.
pub trait SlotPolicy<S> {
    /// Skip rendering `element` entirely this frame.
    fn should_hide(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        let _ = element;
        Ok(false)
    }

    /// Stack to draw instead of `element`'s real contents.
    ///
    /// Only asked when [`should_hide`](Self::should_hide) said no.
    fn replacement_stack(&self, element: &SlotElement<S>) -> Result<Option<S>, PolicyError> {
        let _ = element;
        Ok(None)
    }

    /// Cancel the tooltip for the hovered `element`.
    fn should_suppress_tooltip(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        let _ = element;
        Ok(false)
    }

    /// Veto a click before the host commits it.
    fn should_block_action(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> Result<bool, PolicyError> {
        let _ = (element, button, kind, screen);
        Ok(false)
    }
}

/// A policy that allows everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct AllowAll;

impl<S> SlotPolicy<S> for AllowAll {}

impl<S, P: SlotPolicy<S> + ?Sized> SlotPolicy<S> for &P {
    fn should_hide(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        (**self).should_hide(element)
    }

    fn replacement_stack(&self, element: &SlotElement<S>) -> Result<Option<S>, PolicyError> {
        (**self).replacement_stack(element)
    }

    fn should_suppress_tooltip(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        (**self).should_suppress_tooltip(element)
    }

    fn should_block_action(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> Result<bool, PolicyError> {
        (**self).should_block_action(element, button, kind, screen)
    }
}

impl<S, P: SlotPolicy<S> + ?Sized> SlotPolicy<S> for Box<P> {
    fn should_hide(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        (**self).should_hide(element)
    }

    fn replacement_stack(&self, element: &SlotElement<S>) -> Result<Option<S>, PolicyError> {
        (**self).replacement_stack(element)
    }

    fn should_suppress_tooltip(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        (**self).should_suppress_tooltip(element)
    }

    fn should_block_action(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> Result<bool, PolicyError> {
        (**self).should_block_action(element, button, kind, screen)
    }
}

/// Run one query behind the failure boundary, falling back to `default`.
fn ask<S: ItemStack, T>(
    query: &'static str,
    element: &SlotElement<S>,
    default: T,
    f: impl FnOnce() -> Result<T, PolicyError>,
) -> T {
    match guard::call(f) {
        Ok(value) => value,
        Err(failure) => {
            tracing::warn!(
                target: "understory_intercept::policy",
                query,
                container = ?element.container(),
                index = element.index(),
                error = %failure,
                "policy query failed; allowing host default"
            );
            default
        }
    }
}

/// Fail-open wrapper that is the single call site for a [`SlotPolicy`].
#[derive(Clone, Debug, Default)]
pub struct PolicyEngine<P> {
    policy: P,
}

impl<P> PolicyEngine<P> {
    /// Wrap `policy`.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Borrow the wrapped policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutably borrow the wrapped policy (for reconfiguration between frames).
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Whether to skip rendering `element`. `false` on failure.
    pub fn should_hide<S: ItemStack>(&self, element: &SlotElement<S>) -> bool
    where
        P: SlotPolicy<S>,
    {
        ask("should_hide", element, false, || {
            self.policy.should_hide(element)
        })
    }

    /// Replacement stack for `element`. `None` on failure.
    pub fn replacement_stack<S: ItemStack>(&self, element: &SlotElement<S>) -> Option<S>
    where
        P: SlotPolicy<S>,
    {
        ask("replacement_stack", element, None, || {
            self.policy.replacement_stack(element)
        })
    }

    /// Whether to cancel `element`'s tooltip. `false` on failure.
    pub fn should_suppress_tooltip<S: ItemStack>(&self, element: &SlotElement<S>) -> bool
    where
        P: SlotPolicy<S>,
    {
        ask("should_suppress_tooltip", element, false, || {
            self.policy.should_suppress_tooltip(element)
        })
    }

    /// Whether to veto a click. `false` on failure: the click goes through.
    pub fn should_block_action<S: ItemStack>(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> bool
    where
        P: SlotPolicy<S>,
    {
        ask("should_block_action", element, false, || {
            self.policy
                .should_block_action(element, button, kind, screen)
        })
    }

    /// Render verdict: `HideElement`, `ReplaceStack` or `Allow`, in that precedence.
    pub fn render_verdict<S: ItemStack>(&self, element: &SlotElement<S>) -> PolicyVerdict<S>
    where
        P: SlotPolicy<S>,
    {
        if self.should_hide(element) {
            return PolicyVerdict::HideElement;
        }
        match self.replacement_stack(element) {
            Some(stack) => PolicyVerdict::ReplaceStack(stack),
            None => PolicyVerdict::Allow,
        }
    }

    /// Tooltip verdict: `SuppressTooltip` or `Allow`.
    pub fn tooltip_verdict<S: ItemStack>(&self, element: &SlotElement<S>) -> PolicyVerdict<S>
    where
        P: SlotPolicy<S>,
    {
        if self.should_suppress_tooltip(element) {
            PolicyVerdict::SuppressTooltip
        } else {
            PolicyVerdict::Allow
        }
    }

    /// Action verdict: `BlockAction` or `Allow`.
    pub fn action_verdict<S: ItemStack>(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> PolicyVerdict<S>
    where
        P: SlotPolicy<S>,
    {
        if self.should_block_action(element, button, kind, screen) {
            PolicyVerdict::BlockAction
        } else {
            PolicyVerdict::Allow
        }
    }
}

/// Named member policies combined into one.
///
/// - Hide, suppress-tooltip and block: any member saying yes wins.
/// - Replacement: the first member, in push order, that offers one.
///
/// Each member sits behind its own failure boundary: a failing member is
/// logged and counted as "allow", and the other members still decide.
pub struct PolicyStack<S> {
    members: Vec<(&'static str, Box<dyn SlotPolicy<S>>)>,
}

impl<S> Default for PolicyStack<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> core::fmt::Debug for PolicyStack<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|(name, _)| name))
            .finish()
    }
}

impl<S> PolicyStack<S> {
    /// Create an empty stack (allows everything).
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Append a member under `name`.
    pub fn push(&mut self, name: &'static str, policy: impl SlotPolicy<S> + 'static) {
        self.members.push((name, Box::new(policy)));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, name: &'static str, policy: impl SlotPolicy<S> + 'static) -> Self {
        self.push(name, policy);
        self
    }

    /// Remove the member registered under `name`. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|(n, _)| *n != name);
        self.members.len() != before
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<S: ItemStack> PolicyStack<S> {
    fn any(
        &self,
        query: &'static str,
        element: &SlotElement<S>,
        f: impl Fn(&dyn SlotPolicy<S>) -> Result<bool, PolicyError>,
    ) -> bool {
        self.members.iter().any(|(name, member)| {
            ask(query, element, false, || {
                f(member.as_ref()).map_err(|e| member_error(name, e))
            })
        })
    }
}

fn member_error(name: &str, error: PolicyError) -> PolicyError {
    use alloc::format;
    match error {
        PolicyError::ConfigUnavailable(m) => PolicyError::ConfigUnavailable(format!("{name}: {m}")),
        PolicyError::InvalidVerdict(m) => PolicyError::InvalidVerdict(format!("{name}: {m}")),
        PolicyError::Failed(m) => PolicyError::Failed(format!("{name}: {m}")),
    }
}

impl<S: ItemStack> SlotPolicy<S> for PolicyStack<S> {
    fn should_hide(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        Ok(self.any("should_hide", element, |p| p.should_hide(element)))
    }

    fn replacement_stack(&self, element: &SlotElement<S>) -> Result<Option<S>, PolicyError> {
        Ok(self.members.iter().find_map(|(name, member)| {
            ask("replacement_stack", element, None, || {
                member
                    .replacement_stack(element)
                    .map_err(|e| member_error(name, e))
            })
        }))
    }

    fn should_suppress_tooltip(&self, element: &SlotElement<S>) -> Result<bool, PolicyError> {
        Ok(self.any("should_suppress_tooltip", element, |p| {
            p.should_suppress_tooltip(element)
        }))
    }

    fn should_block_action(
        &self,
        element: &SlotElement<S>,
        button: i32,
        kind: ActionKind,
        screen: &ScreenContext<'_, S>,
    ) -> Result<bool, PolicyError> {
        Ok(self.any("should_block_action", element, |p| {
            p.should_block_action(element, button, kind, screen)
        }))
    }
}
