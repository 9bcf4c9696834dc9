// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Favorites-only filtering.
//!
//! A 6x9 menu shows contacts in the inner 4x7 block. With "favorites only" on, every
//! non-favorite contact is hidden, has no tooltip, and cannot be clicked. The
//! filter is composed with a second, flag-driven policy loaded from TOML.
//!
//! Run:
//! - `cargo run -p understory_demos --example favorite_slots`

use std::cell::Cell;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_intercept::config::{FeatureConfig, FeatureFlags, enabled};
use understory_intercept::{
    ActionKind, ClickHead, Interceptor, PolicyError, PolicyStack, RenderHead, SlotPolicy,
    TooltipHead,
};
use understory_slot::{ContainerId, GridContainer, ScreenContext, SlotElement};

type Stack = Option<String>;

/// Inner block of a six-row menu; the border is decoration.
const CONTENT_ROWS: [RangeInclusive<i32>; 4] = [10..=16, 19..=25, 28..=34, 37..=43];

struct FavoritesOnly {
    favorites: BTreeSet<String>,
    on: Rc<Cell<bool>>,
}

impl FavoritesOnly {
    fn filtered(&self, element: &SlotElement<Stack>) -> bool {
        let Some(name) = element.stack() else {
            return false;
        };
        self.on.get()
            && CONTENT_ROWS.iter().any(|r| r.contains(&element.index()))
            && !self.favorites.contains(name)
    }
}

impl SlotPolicy<Stack> for FavoritesOnly {
    fn should_hide(&self, element: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Ok(self.filtered(element))
    }

    fn should_suppress_tooltip(&self, element: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Ok(self.filtered(element))
    }

    fn should_block_action(
        &self,
        element: &SlotElement<Stack>,
        _button: i32,
        _kind: ActionKind,
        screen: &ScreenContext<'_, Stack>,
    ) -> Result<bool, PolicyError> {
        Ok(screen.title == "Contacts" && self.filtered(element))
    }
}

/// Hides the status overlay slot when the flag is on.
struct StatusOverlay {
    config: FeatureConfig,
}

impl SlotPolicy<Stack> for StatusOverlay {
    fn should_hide(&self, element: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Ok(element.index() == 4 && enabled(&self.config, FeatureFlags::HIDE_STATUS_OVERLAY))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: FeatureConfig = match toml::from_str("hide_status_overlay = true\n") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bad config: {err}");
            FeatureConfig::default()
        }
    };

    let mut menu: GridContainer<Stack> = GridContainer::new(ContainerId(3), 9, 54);
    menu.set(4, Some("Status".into()));
    for (index, name) in [(10, "Alice"), (11, "Bob"), (19, "Carol"), (28, "Dave")] {
        menu.set(index, Some(name.into()));
    }

    let on = Rc::new(Cell::new(true));
    let favorites = FavoritesOnly {
        favorites: ["Alice".to_string(), "Dave".to_string()]
            .into_iter()
            .collect(),
        on: on.clone(),
    };
    let policy = PolicyStack::new()
        .with("favorites-only", favorites)
        .with("status-overlay", StatusOverlay { config });
    let mut icpt: Interceptor<Stack, PolicyStack<Stack>> = Interceptor::new(policy);

    for pass in ["favorites only", "show all"] {
        println!("== {pass}");
        for index in [4, 10, 11, 19, 28] {
            let shown = icpt.render_head(&menu, index) == RenderHead::Proceed;
            println!(
                "  slot {index:>2} {:<6} shown: {shown}",
                label(&menu, index)
            );
        }

        // Hover Bob (slot 11: column 2, row 1).
        let screen: ScreenContext<'_, Stack> = ScreenContext::new("Contacts", &menu)
            .with_pointer(kurbo::Point::new(2.0 * 18.0 + 4.0, 18.0 + 4.0));
        let tooltip = icpt.tooltip_head(&screen) == TooltipHead::Proceed;
        let click = matches!(
            icpt.click_head(&screen, 11, 0, ActionKind::Pickup),
            ClickHead::Proceed(_)
        );
        println!("  Bob tooltip: {tooltip}, click allowed: {click}");

        let expired = icpt.end_cycle();
        println!("  expired snapshots: {expired}");
        on.set(false);
    }
}

fn label(menu: &GridContainer<Stack>, index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| menu.get(i).cloned().flatten())
        .unwrap_or_default()
}
