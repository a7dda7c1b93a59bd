//! End-to-end scenarios against the public API: a book driven the way a
//! FIX front-end would drive it, with the event stream observed through a
//! recording publisher.

use matchbook_rs::{
    MarketEvent, Order, OrderBook, OrderBookError, RecordingPublisher, Side, TimeInForce,
};
use std::sync::Arc;

fn recording_book() -> (OrderBook, Arc<RecordingPublisher>) {
    let publisher = RecordingPublisher::new();
    let book = OrderBook::with_publisher("ACME", publisher.clone());
    (book, publisher)
}

fn trade_events(events: &[MarketEvent]) -> Vec<&matchbook_rs::Trade> {
    events
        .iter()
        .filter_map(|event| match event {
            MarketEvent::Trade(trade) => Some(trade),
            _ => None,
        })
        .collect()
}

#[test]
fn test_first_bid_on_empty_book() {
    let (mut book, publisher) = recording_book();
    let result = book
        .submit(Order::limit(1, Side::Buy, 100_0000, 10, TimeInForce::Gtc))
        .unwrap();

    assert_eq!(result.residual_quantity, 10);
    assert!(result.resting);
    assert_eq!(book.best_bid(), Some(100_0000));
    assert_eq!(book.best_ask(), None);

    let events = publisher.take();
    assert!(trade_events(&events).is_empty());
    let adds = events
        .iter()
        .filter(|event| {
            matches!(event, MarketEvent::BookUpdate(u) if u.kind == matchbook_rs::BookUpdateKind::Add)
        })
        .count();
    assert_eq!(adds, 1);
}

#[test]
fn test_non_crossing_ask_builds_spread() {
    let (mut book, _publisher) = recording_book();
    book.submit(Order::limit(1, Side::Buy, 100_0000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Sell, 101_0000, 5, TimeInForce::Gtc))
        .unwrap();

    assert_eq!(book.best_bid(), Some(100_0000));
    assert_eq!(book.best_ask(), Some(101_0000));
    assert_eq!(book.spread(), Some(1_0000));
    assert_eq!(book.mid_price(), Some(100_5000.0));
}

#[test]
fn test_ioc_sell_crosses_resting_bid() {
    let (mut book, publisher) = recording_book();
    book.submit(Order::limit(1, Side::Buy, 100_0000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Sell, 101_0000, 5, TimeInForce::Gtc))
        .unwrap();
    publisher.take();

    let result = book
        .submit(Order::limit(3, Side::Sell, 100_0000, 7, TimeInForce::Ioc))
        .unwrap();
    assert_eq!(result.filled_quantity, 7);
    assert_eq!(result.residual_quantity, 0);

    let events = publisher.take();
    let trades = trade_events(&events);
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 100_0000);
    assert_eq!(trades[0].quantity, 7);
    assert_eq!(trades[0].buy_order_id, 1);
    assert_eq!(trades[0].sell_order_id, 3);
    assert_eq!(trades[0].aggressor_side, Side::Sell);

    assert_eq!(book.get_order(1).unwrap().remaining(), 3);
    assert!(!book.contains(3));
}

#[test]
fn test_oversized_market_buy_takes_what_exists() {
    let (mut book, publisher) = recording_book();
    book.submit(Order::limit(1, Side::Buy, 100_0000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Sell, 101_0000, 5, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(3, Side::Sell, 100_0000, 7, TimeInForce::Ioc))
        .unwrap();
    publisher.take();

    let result = book.submit(Order::market(4, Side::Buy, 100)).unwrap();
    assert_eq!(result.filled_quantity, 5);
    assert_eq!(result.residual_quantity, 95);
    assert!(!result.resting);
    assert!(!book.contains(4));

    let events = publisher.take();
    let trades = trade_events(&events);
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 101_0000);
    assert_eq!(trades[0].quantity, 5);
    assert_eq!(trades[0].buy_order_id, 4);
    assert_eq!(trades[0].sell_order_id, 2);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn test_fok_rejection_leaves_book_untouched() {
    let (mut book, publisher) = recording_book();
    // empty opposite side: a FOK can never fill and must not rest
    let err = book
        .submit(Order::limit(10, Side::Buy, 50_0000, 10, TimeInForce::Fok))
        .unwrap_err();
    assert!(matches!(
        err,
        OrderBookError::InsufficientLiquidity { available: 0, .. }
    ));
    assert!(book.is_empty());
    assert!(publisher.is_empty());

    // seed the bid via GTC, then fail a larger FOK against it
    book.submit(Order::limit(10, Side::Buy, 50_0000, 10, TimeInForce::Gtc))
        .unwrap();
    publisher.take();

    let err = book
        .submit(Order::limit(11, Side::Sell, 50_0000, 15, TimeInForce::Fok))
        .unwrap_err();
    assert!(matches!(err, OrderBookError::InsufficientLiquidity { .. }));
    assert!(publisher.is_empty());
    assert_eq!(book.best_bid_with_size(), Some((50_0000, 10)));
}

#[test]
fn test_queue_priority_after_partial_drain() {
    let (mut book, publisher) = recording_book();
    for (id, _) in [(1u64, "A"), (2, "B"), (3, "C")] {
        book.submit(Order::limit(id, Side::Buy, 100_0000, 5, TimeInForce::Gtc))
            .unwrap();
    }
    publisher.take();

    book.submit(Order::limit(4, Side::Sell, 100_0000, 7, TimeInForce::Gtc))
        .unwrap();

    let events = publisher.take();
    let trades = trade_events(&events);
    assert_eq!(trades.len(), 2);
    assert_eq!((trades[0].buy_order_id, trades[0].quantity), (1, 5));
    assert_eq!((trades[1].buy_order_id, trades[1].quantity), (2, 2));

    assert!(!book.contains(1));
    assert_eq!(book.get_order(2).unwrap().remaining(), 3);
    assert_eq!(book.get_order(3).unwrap().remaining(), 5);
    assert_eq!(book.best_bid_with_size(), Some((100_0000, 8)));
}

#[test]
fn test_full_session_counts_and_last_trade() {
    let (mut book, _publisher) = recording_book();
    book.submit(Order::limit(1, Side::Buy, 99_0000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(2, Side::Buy, 100_0000, 10, TimeInForce::Gtc))
        .unwrap();
    book.submit(Order::limit(3, Side::Sell, 102_0000, 10, TimeInForce::Gtc))
        .unwrap();
    assert_eq!(book.count_orders(), 3);
    assert_eq!(book.count_levels(Side::Buy), 2);
    assert_eq!(book.count_levels(Side::Sell), 1);
    assert_eq!(book.last_trade_price(), None);

    book.submit(Order::limit(4, Side::Sell, 100_0000, 4, TimeInForce::Ioc))
        .unwrap();
    assert_eq!(book.last_trade_price(), Some(100_0000));
    assert_eq!(book.resting_quantity(Side::Buy), 16);
}
