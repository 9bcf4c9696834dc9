// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click lifecycle.
//!
//! Follow clicks from head to commit while the host mutates the slot in between:
//! a plain click, an interleaved double click, a click that reaches both entry
//! points, and a commit that arrives after its cycle ended.
//!
//! Run:
//! - `cargo run -p understory_demos --example click_lifecycle`
//! - `RUST_LOG=understory_intercept=debug cargo run -p understory_demos --example click_lifecycle`

use tracing_subscriber::EnvFilter;
use understory_intercept::{ActionKey, ActionKind, AllowAll, ClickHead, CommitOutcome, Interceptor};
use understory_slot::{ContainerId, GridContainer, ScreenContext};

type Stack = Option<&'static str>;

fn head(
    icpt: &mut Interceptor<Stack, AllowAll>,
    chest: &GridContainer<Stack>,
    slot: i32,
) -> Option<ActionKey> {
    let screen: ScreenContext<'_, Stack> = ScreenContext::new("Chest", chest);
    match icpt.click_head(&screen, slot, 0, ActionKind::Pickup) {
        ClickHead::Proceed(key) => Some(key),
        ClickHead::Blocked => None,
    }
}

fn commit(
    icpt: &mut Interceptor<Stack, AllowAll>,
    chest: &GridContainer<Stack>,
    cursor: Stack,
    key: ActionKey,
) -> CommitOutcome {
    let screen: ScreenContext<'_, Stack> = ScreenContext::new("Chest", chest).with_cursor(cursor);
    icpt.click_commit(key, &screen)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut chest: GridContainer<Stack> = GridContainer::new(ContainerId(1), 9, 27);
    chest.set(2, Some("apple"));
    chest.set(5, Some("bread"));

    let mut icpt: Interceptor<Stack, AllowAll> = Interceptor::new(AllowAll);
    icpt.register_post_click_subscriber("print", |e| {
        println!(
            "  post-click in {} slot {} {:?}: was {:?}, now {:?}, holding {:?}{}",
            e.title,
            e.slot(),
            e.kind,
            e.pre,
            e.element.stack(),
            e.cursor,
            if e.synthesized { " (synthesized)" } else { "" }
        );
        Ok(())
    });

    println!("Plain click:");
    if let Some(key) = head(&mut icpt, &chest, 2) {
        let held = chest.take(2).flatten();
        commit(&mut icpt, &chest, held, key);
    }
    icpt.end_cycle();

    println!("Interleaved:");
    let k1 = head(&mut icpt, &chest, 5);
    chest.set(5, Some("toast"));
    let k2 = head(&mut icpt, &chest, 5);
    for key in [k2, k1].into_iter().flatten() {
        commit(&mut icpt, &chest, None, key);
    }
    icpt.end_cycle();

    println!("Two entry points:");
    if let Some(key) = head(&mut icpt, &chest, 5) {
        let held = chest.take(5).flatten();
        let adopted = icpt.capture(&chest, 5, 0, ActionKind::Pickup);
        println!("  adopted the head's key: {}", adopted == key);
        let first = commit(&mut icpt, &chest, held, adopted);
        println!("  first commit: {first:?}");
        let second = commit(&mut icpt, &chest, held, key);
        println!("  second commit: {second:?}");
    }
    icpt.end_cycle();

    println!("Commit after cycle end:");
    chest.set(2, Some("pear"));
    if let Some(key) = head(&mut icpt, &chest, 2) {
        println!("  expired: {}", icpt.end_cycle());
        commit(&mut icpt, &chest, None, key);
    }
}
