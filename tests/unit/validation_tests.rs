//! Tick size, lot size and structural validation through the public API.

use matchbook_rs::{Order, OrderBook, OrderBookError, Side, TimeInForce};

fn make_limit(id: u64, price: u128, quantity: u64, side: Side) -> Order {
    Order::limit(id, side, price, quantity, TimeInForce::Gtc)
}

// --- tick size ---

#[test]
fn test_no_tick_size_accepts_any_price() {
    let mut book = OrderBook::new("BTC/USD");
    assert!(book.submit(make_limit(1, 12_345, 100, Side::Buy)).is_ok());
    assert_eq!(book.tick_size(), None);
}

#[test]
fn test_tick_size_accepts_exact_multiples() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_tick_size(100);
    assert_eq!(book.tick_size(), Some(100));
    assert!(book.submit(make_limit(1, 1_000, 100, Side::Buy)).is_ok());
    assert!(book.submit(make_limit(2, 50_000, 100, Side::Buy)).is_ok());
    assert!(book.submit(make_limit(3, 100, 100, Side::Buy)).is_ok());
}

#[test]
fn test_tick_size_rejects_off_tick_price() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_tick_size(100);
    let err = book.submit(make_limit(1, 150, 100, Side::Buy)).unwrap_err();
    assert!(matches!(
        err,
        OrderBookError::InvalidPrice { price: 150, .. }
    ));
    assert!(book.is_empty());
}

#[test]
fn test_tick_size_applies_to_modify() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_tick_size(100);
    book.submit(make_limit(1, 1_000, 100, Side::Buy)).unwrap();
    assert!(matches!(
        book.modify(1, 1_050, 100),
        Err(OrderBookError::InvalidPrice { .. })
    ));
    assert!(book.modify(1, 1_100, 100).is_ok());
}

// --- lot size ---

#[test]
fn test_lot_size_accepts_exact_multiples() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_lot_size(10);
    assert_eq!(book.lot_size(), Some(10));
    assert!(book.submit(make_limit(1, 1_000, 50, Side::Sell)).is_ok());
}

#[test]
fn test_lot_size_rejects_odd_lots() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_lot_size(10);
    let err = book.submit(make_limit(1, 1_000, 55, Side::Sell)).unwrap_err();
    assert!(matches!(
        err,
        OrderBookError::InvalidQuantity { quantity: 55, .. }
    ));
}

#[test]
fn test_lot_size_applies_to_market_orders() {
    let mut book = OrderBook::new("BTC/USD");
    book.set_lot_size(10);
    assert!(matches!(
        book.submit(Order::market(1, Side::Buy, 15)),
        Err(OrderBookError::InvalidQuantity { .. })
    ));
}

// --- structural checks ---

#[test]
fn test_zero_quantity_is_first_failure() {
    // zero quantity and zero price together: the quantity error wins, as
    // validation runs quantity first
    let mut book = OrderBook::new("BTC/USD");
    let err = book
        .submit(Order::limit(1, Side::Buy, 0, 0, TimeInForce::Gtc))
        .unwrap_err();
    assert!(matches!(err, OrderBookError::InvalidQuantity { .. }));
}

#[test]
fn test_duplicate_rejected_even_after_partial_fill() {
    let mut book = OrderBook::new("BTC/USD");
    book.submit(make_limit(1, 1_000, 10, Side::Buy)).unwrap();
    book.submit(Order::limit(2, Side::Sell, 1_000, 4, TimeInForce::Ioc))
        .unwrap();
    // order 1 still rests with 6 left, so its id is still taken
    let err = book.submit(make_limit(1, 900, 10, Side::Buy)).unwrap_err();
    assert_eq!(err, OrderBookError::DuplicateOrderId(1));
}

#[test]
fn test_id_reusable_after_full_lifecycle() {
    let mut book = OrderBook::new("BTC/USD");
    book.submit(make_limit(1, 1_000, 10, Side::Buy)).unwrap();
    book.cancel(1).unwrap();
    // the id left the book, so it may be admitted again
    assert!(book.submit(make_limit(1, 1_000, 10, Side::Buy)).is_ok());
}

#[test]
fn test_rejected_submit_keeps_admission_stamps_stable() {
    let mut book = OrderBook::new("BTC/USD");
    book.submit(make_limit(1, 1_000, 10, Side::Buy)).unwrap();
    let stamp_before = book.get_order(1).unwrap().admit_time;

    let _ = book.submit(make_limit(1, 1_000, 10, Side::Buy)); // duplicate
    let _ = book.submit(make_limit(2, 0, 10, Side::Buy)); // bad price

    book.submit(make_limit(3, 999, 10, Side::Buy)).unwrap();
    let stamp_after = book.get_order(3).unwrap().admit_time;
    // rejections never consume admission stamps
    assert_eq!(stamp_after, stamp_before + 1);
}
