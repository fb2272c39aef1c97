//! Performance benchmarks for evloop
//!
//! Tracks the cost of the dispatch path: queue operations, handler
//! traversal and full send-to-handler throughput on a running loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evloop::prelude::*;
use evloop::{EventQueue, HandlerRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn benchmark_event_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_creation");

    group.bench_function("empty", |b| {
        b.iter(|| black_box(Event::empty(black_box(EVENT_PRE_USER + 1))))
    });

    group.bench_function("with_payload", |b| {
        b.iter(|| black_box(Event::new(EVENT_PRE_USER + 1, black_box(42_u64))))
    });

    group.finish();
}

fn benchmark_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");

    for batch in [1usize, 16, 256].iter() {
        group.bench_with_input(BenchmarkId::new("enqueue_dequeue", batch), batch, |b, &batch| {
            let queue = EventQueue::new();
            let event = Event::empty(EVENT_PRE_USER + 1);
            b.iter(|| {
                queue.enqueue_all((0..batch).map(|_| event.clone()));
                while let Some(event) = queue.dequeue() {
                    black_box(event);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_handler_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("handler_traversal");

    for handler_count in [1usize, 10, 100].iter() {
        let registry = HandlerRegistry::new("bench");
        for index in 0..*handler_count {
            let event_type = EVENT_PRE_USER + 1 + (index as u64 % 4);
            registry
                .add(EventHandler::new(event_type, format!("handler-{}", index), |_: &Event| true))
                .expect("unique handler names");
        }

        let event = Event::empty(EVENT_PRE_USER + 1);
        group.bench_with_input(
            BenchmarkId::new("match", handler_count),
            handler_count,
            |b, _| {
                b.iter(|| {
                    let mut matched = 0;
                    registry.for_each(|handler| {
                        if handler.matches(&event) {
                            matched += 1;
                        }
                        true
                    });
                    black_box(matched)
                })
            },
        );
    }

    group.finish();
}

fn benchmark_loop_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_throughput");
    group.sample_size(20);

    for batch in [100usize, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("send_and_sync", batch), batch, |b, &batch| {
            let event_loop = EventLoop::builder("bench")
                .idle_delay(Duration::from_micros(50))
                .sync_interval(Duration::from_micros(200))
                .build();
            let handled = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&handled);
            event_loop.subscribe(EventHandler::new(EVENT_ALL, "counter", move |_: &Event| {
                counter.fetch_add(1, Ordering::Relaxed);
                true
            }));
            event_loop.start();

            b.iter(|| {
                for _ in 0..batch {
                    event_loop.send(Event::empty(EVENT_PRE_USER + 1));
                }
                event_loop.sync(0)
            });

            event_loop.stop_and_join(0);
            black_box(handled.load(Ordering::Relaxed));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_event_creation,
    benchmark_queue,
    benchmark_handler_traversal,
    benchmark_loop_throughput
);

criterion_main!(benches);
