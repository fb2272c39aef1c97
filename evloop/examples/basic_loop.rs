//! Basic event loop example
//!
//! Shows typed event kinds, a channel source fed from another thread, a
//! default handler for unrouted events and the stop/join handshake.
//!
//! Run with `RUST_LOG=evloop=debug cargo run --example basic_loop` to see the
//! loop's own log output.

use evloop::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(EventKind, Clone, Copy, Debug, PartialEq)]
enum Order {
    Placed,
    Shipped,
    Cancelled,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== evloop Basic Example ===\n");

    let event_loop = EventLoop::builder("orders")
        .default_handler(EventHandler::fallback("unrouted", |event: &Event| {
            println!("  unrouted event: {}", event);
            true
        }))
        .build();

    event_loop.subscribe(EventHandler::new(
        Order::Placed.event_type(),
        "placed",
        |event: &Event| {
            let id = event.payload::<u32>().copied().unwrap_or_default();
            println!("  order {} placed", id);
            true
        },
    ));

    event_loop.subscribe(EventHandler::new(
        Order::Shipped.event_type(),
        "shipped",
        |event: &Event| {
            let id = event.payload::<u32>().copied().unwrap_or_default();
            println!("  order {} shipped", id);
            true
        },
    ));

    let (sender, source) = ChannelSource::pair("warehouse");
    event_loop.add_source(Arc::new(source));

    event_loop.start();

    println!("1. Sending events directly:");
    event_loop.send(Event::of_kind(Order::Placed, 1_u32));
    event_loop.send(Event::of_kind(Order::Placed, 2_u32));
    event_loop.sync(0);

    println!("\n2. Events from a channel source:");
    let warehouse = thread::spawn(move || {
        for id in 1..=2_u32 {
            thread::sleep(Duration::from_millis(20));
            let _ = sender.send(Event::of_kind(Order::Shipped, id));
        }
        let _ = sender.send(Event::of_kind(Order::Cancelled, 3_u32));
    });
    let _ = warehouse.join();

    println!("\n3. Stopping:");
    let exit_code = event_loop.stop_and_join(0);
    println!("  event loop exited with code {}", exit_code);
}
