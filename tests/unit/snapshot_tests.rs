//! Depth snapshots, the transport package and the channel publisher.

use matchbook_rs::{
    ChannelPublisher, DepthSnapshotPackage, MarketEvent, Order, OrderBook, OrderBookError, Side,
    TimeInForce,
};
use std::sync::Arc;

fn seeded_book() -> OrderBook {
    let mut book = OrderBook::new("ETH/USD");
    book.submit(Order::limit(1, Side::Buy, 2_000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Buy, 1_990, 5, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(3, Side::Buy, 1_990, 5, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(4, Side::Sell, 2_010, 7, TimeInForce::Gtc))
        .unwrap();
    book
}

#[test]
fn test_depth_levels_in_priority_order() {
    let book = seeded_book();
    let depth = book.depth(10);

    assert_eq!(depth.symbol, "ETH/USD");
    assert_eq!(depth.bids.len(), 2);
    assert_eq!(depth.bids[0].price, 2_000);
    assert_eq!(depth.bids[0].quantity, 10);
    assert_eq!(depth.bids[0].order_count, 1);
    assert_eq!(depth.bids[1].price, 1_990);
    assert_eq!(depth.bids[1].quantity, 10);
    assert_eq!(depth.bids[1].order_count, 2);
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.best_ask().unwrap().price, 2_010);
    assert_eq!(depth.spread(), Some(10));
}

#[test]
fn test_depth_respects_level_limit() {
    let book = seeded_book();
    let depth = book.depth(1);
    assert_eq!(depth.bids.len(), 1);
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.total_bid_quantity(), 10);
}

#[test]
fn test_depth_is_not_event_driven() {
    let (publisher, receiver) = ChannelPublisher::unbounded();
    let mut book = OrderBook::with_publisher("ETH/USD", Arc::new(publisher));
    book.submit(Order::limit(1, Side::Buy, 2_000, 10, TimeInForce::Gtc))
        .unwrap();
    let drained: Vec<MarketEvent> = receiver.try_iter().collect();
    assert!(!drained.is_empty());

    let _ = book.depth(5);
    assert!(receiver.try_iter().next().is_none());
}

#[test]
fn test_package_round_trip_and_tamper_detection() {
    let book = seeded_book();
    let snapshot = book.depth(10);

    let package = DepthSnapshotPackage::pack(&snapshot).unwrap();
    assert_eq!(package.unpack().unwrap(), snapshot);

    let mut tampered = package.clone();
    tampered.payload = tampered.payload.replace("2000", "2001");
    assert!(matches!(
        tampered.unpack(),
        Err(OrderBookError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_channel_publisher_streams_ordered_events() {
    let (publisher, receiver) = ChannelPublisher::unbounded();
    let mut book = OrderBook::with_publisher("ETH/USD", Arc::new(publisher));

    book.submit(Order::limit(1, Side::Buy, 2_000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Sell, 2_000, 4, TimeInForce::Ioc))
        .unwrap();
    book.cancel(1).unwrap();

    let events: Vec<MarketEvent> = receiver.try_iter().collect();
    assert!(!events.is_empty());
    for (offset, event) in events.iter().enumerate() {
        assert_eq!(event.sequence(), offset as u64 + 1);
    }
    assert!(events
        .iter()
        .any(|event| matches!(event, MarketEvent::Trade(t) if t.quantity == 4)));
}

#[test]
fn test_snapshot_sequence_aligns_with_stream() {
    let (publisher, receiver) = ChannelPublisher::unbounded();
    let mut book = OrderBook::with_publisher("ETH/USD", Arc::new(publisher));
    book.submit(Order::limit(1, Side::Buy, 2_000, 10, TimeInForce::Gtc))
        .unwrap();

    let last_sequence = receiver.try_iter().map(|event| event.sequence()).max();
    let depth = book.depth(5);
    assert_eq!(Some(depth.sequence), last_sequence);
}
