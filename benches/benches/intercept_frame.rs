// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_intercept::{
    ActionKind, AllowAll, ClickHead, Interceptor, PolicyError, PolicyStack, SlotPolicy,
};
use understory_slot::{ContainerId, GridContainer, ScreenContext, SlotElement, resolve, slot_at};

type Stack = Option<u32>;

fn gen_chest(rows: usize) -> GridContainer<Stack> {
    let mut chest = GridContainer::new(ContainerId(1), 9, rows * 9);
    for i in 0..rows * 9 {
        if i % 3 != 0 {
            chest.set(i, Some(i as u32));
        }
    }
    chest
}

struct HideMultiplesOf(i32);

impl SlotPolicy<Stack> for HideMultiplesOf {
    fn should_hide(&self, element: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Ok(element.index() % self.0 == 0)
    }
}

struct Disguise;

impl SlotPolicy<Stack> for Disguise {
    fn replacement_stack(
        &self,
        element: &SlotElement<Stack>,
    ) -> Result<Option<Stack>, PolicyError> {
        Ok(element.stack().filter(|n| n % 5 == 0).map(|_| Some(0)))
    }
}

struct Broken;

impl SlotPolicy<Stack> for Broken {
    fn should_hide(&self, _: &SlotElement<Stack>) -> Result<bool, PolicyError> {
        Err(PolicyError::Failed("unavailable".into()))
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let chest = gen_chest(6);
    group.throughput(Throughput::Elements(54));
    group.bench_function("in_range_54", |b| {
        b.iter(|| {
            for i in 0..54 {
                black_box(resolve(&chest, i));
            }
        });
    });
    group.bench_function("slot_at_grid", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for y in 0..6 {
                for x in 0..9 {
                    let pt = Point::new(f64::from(x) * 18.0 + 4.0, f64::from(y) * 18.0 + 4.0);
                    hits += usize::from(slot_at(&chest, pt).is_some());
                }
            }
            black_box(hits);
        });
    });
    group.finish();
}

fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");
    for &rows in &[3_usize, 6] {
        let chest = gen_chest(rows);
        let n = (rows * 9) as i32;
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("allow_all_{rows}_rows"), |b| {
            let mut icpt: Interceptor<Stack, AllowAll> = Interceptor::new(AllowAll);
            icpt.register_render_subscriber("sink", |e| {
                black_box(e.displayed);
                Ok(())
            });
            b.iter(|| {
                for i in 0..n {
                    black_box(icpt.render_slot(&chest, i));
                }
                icpt.end_cycle();
            });
        });

        group.bench_function(format!("policy_stack_{rows}_rows"), |b| {
            let stack = PolicyStack::new()
                .with("broken", Broken)
                .with("hide", HideMultiplesOf(4))
                .with("disguise", Disguise);
            let mut icpt: Interceptor<Stack, PolicyStack<Stack>> = Interceptor::new(stack);
            b.iter(|| {
                for i in 0..n {
                    black_box(icpt.render_slot(&chest, i));
                }
                icpt.end_cycle();
            });
        });
    }
    group.finish();
}

fn bench_click_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("click_cycle");
    let chest = gen_chest(6);
    group.bench_function("head_commit_x16", |b| {
        b.iter_batched(
            || {
                let mut icpt: Interceptor<Stack, AllowAll> = Interceptor::new(AllowAll);
                icpt.register_post_click_subscriber("sink", |e| {
                    black_box(e.pre);
                    Ok(())
                });
                icpt
            },
            |mut icpt| {
                let screen: ScreenContext<'_, Stack> = ScreenContext::new("Chest", &chest);
                let mut keys = Vec::with_capacity(16);
                for i in 0..16 {
                    if let ClickHead::Proceed(key) =
                        icpt.click_head(&screen, i, 0, ActionKind::Pickup)
                    {
                        keys.push(key);
                    }
                }
                for key in keys.into_iter().rev() {
                    black_box(icpt.click_commit(key, &screen));
                }
                icpt.end_cycle();
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve,
    bench_render_frame,
    bench_click_cycle
);
criterion_main!(benches);
