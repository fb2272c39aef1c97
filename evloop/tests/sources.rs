//! Source integration tests for evloop
//!
//! Channel and stream sources feeding a running loop, plus the async
//! join and sync helpers.

use evloop::prelude::*;
use evloop::testing::CallCounter;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn recording_loop(name: &str) -> (EventLoop, Arc<Mutex<Vec<u64>>>) {
    let event_loop = EventLoop::builder(name)
        .idle_delay(Duration::from_millis(1))
        .sync_interval(Duration::from_millis(10))
        .build();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    event_loop.subscribe(EventHandler::new(EVENT_ALL, "recorder", move |event: &Event| {
        sink.lock().unwrap().push(event.event_type());
        true
    }));
    (event_loop, seen)
}

#[test]
fn test_channel_source_feeds_loop_until_disconnected() {
    let (event_loop, seen) = recording_loop("channel");
    let (sender, source) = ChannelSource::pair("inbox");
    event_loop.add_source(Arc::new(source));
    event_loop.start();

    let producer = std::thread::spawn(move || {
        for offset in 1..=20 {
            sender.send(Event::empty(EVENT_PRE_USER + offset)).unwrap();
        }
    });
    producer.join().unwrap();

    assert!(event_loop.sync(0));
    assert_eq!(event_loop.stop_and_join(0), 0);

    let expected: Vec<u64> = (1..=20).map(|offset| EVENT_PRE_USER + offset).collect();
    assert_eq!(*seen.lock().unwrap(), expected);
}

#[test]
fn test_live_channel_keeps_loop_busy() {
    let (event_loop, _seen) = recording_loop("live-channel");
    let (sender, source) = ChannelSource::pair("inbox");
    event_loop.add_source(Arc::new(source));
    event_loop.start();

    assert!(!event_loop.sync(3));
    drop(sender);
    assert!(event_loop.sync(0));
    assert_eq!(event_loop.stop_and_join(0), 0);
}

#[test]
fn test_sources_emit_before_queued_events_of_later_iterations() {
    let (event_loop, seen) = recording_loop("mixed");
    let (sender, source) = ChannelSource::pair("inbox");
    sender.send(Event::empty(EVENT_PRE_USER + 2)).unwrap();
    drop(sender);

    event_loop.send(Event::empty(EVENT_PRE_USER + 1));
    event_loop.add_source(Arc::new(source));
    event_loop.start();
    assert_eq!(event_loop.stop_and_join(0), 0);

    assert_eq!(*seen.lock().unwrap(), vec![EVENT_PRE_USER + 1, EVENT_PRE_USER + 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stream_source_and_async_join() {
    let (event_loop, seen) = recording_loop("stream");
    let (sender, receiver) = futures::channel::mpsc::unbounded::<Event>();
    event_loop.add_source(Arc::new(StreamSource::new("stream", receiver)));
    event_loop.start();

    for offset in 1..=5 {
        sender.unbounded_send(Event::empty(EVENT_PRE_USER + offset)).unwrap();
    }
    drop(sender);

    assert!(event_loop.sync_async(0).await);
    assert_eq!(event_loop.stop_and_join_async(4).await, 4);
    assert_eq!(seen.lock().unwrap().len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_runs_fire_and_forget_handlers() {
    let spawner = TaskSpawner::current_tokio().expect("inside a runtime");
    let event_loop = EventLoop::builder("tokio").spawner(spawner).build();

    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    event_loop.subscribe(EventHandler::fire_and_forget(EVENT_ALL, "forward", move |event: &Event| {
        let _ = sender.send(event.event_type());
        true
    }));

    event_loop.start();
    event_loop.send(Event::empty(EVENT_PRE_USER + 8));
    assert_eq!(event_loop.stop_and_join_async(0).await, 0);

    let mut receiver = receiver;
    let received = tokio::time::timeout(Duration::from_secs(5), receiver.recv()).await;
    assert_eq!(received.ok().flatten(), Some(EVENT_PRE_USER + 8));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_join_async_waits_for_external_stop() {
    let idle = CallCounter::new();
    let event_loop = EventLoop::builder("async-stop")
        .idle_handler(IdleHandler::new("idle", idle.idle_callback()))
        .build();
    event_loop.start();

    let stopper = event_loop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        stopper.stop(11);
    });

    assert_eq!(event_loop.join_async().await, 11);
    assert!(idle.count() > 0);
}
