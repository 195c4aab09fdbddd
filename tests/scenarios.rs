//! End-to-end matching scenarios driven through the engine.

use matchbook::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn order(
    symbol: &str,
    order_type: OrderType,
    side: Side,
    quantity: Decimal,
    price: Option<Decimal>,
) -> Order {
    Order::new(symbol, order_type, side, quantity, price).unwrap()
}

fn limit(side: Side, quantity: Decimal, price: Decimal) -> Order {
    order("BTC-USDT", OrderType::Limit, side, quantity, Some(price))
}

#[test]
fn market_buy_executes_at_the_maker_price() {
    let engine = MatchingEngine::new();
    let resting = limit(Side::Sell, dec!(1.0), dec!(50000));
    let resting_id = resting.id;
    engine.submit(resting).unwrap();

    let report = engine
        .submit(order("BTC-USDT", OrderType::Market, Side::Buy, dec!(0.5), None))
        .unwrap();

    assert_eq!(report.status, OrderStatus::Filled);
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].price, dec!(50000));
    assert_eq!(report.trades[0].quantity, dec!(0.5));
    assert_eq!(report.trades[0].maker_order_id, resting_id);
    assert_eq!(report.trades[0].aggressor_side, Side::Buy);
    assert_eq!(report.average_price, dec!(50000));

    let maker = engine.order(&resting_id, "BTC-USDT").unwrap();
    assert_eq!(maker.status, OrderStatus::PartiallyFilled);
    assert_eq!(maker.remaining_quantity(), dec!(0.5));
}

#[test]
fn same_price_makers_fill_in_arrival_order() {
    let engine = MatchingEngine::new();
    let first = limit(Side::Sell, dec!(1.0), dec!(50000));
    let second = limit(Side::Sell, dec!(1.0), dec!(50000));
    let first_id = first.id;
    let second_id = second.id;
    engine.submit(first).unwrap();
    engine.submit(second).unwrap();

    let report = engine
        .submit(order("BTC-USDT", OrderType::Market, Side::Buy, dec!(1.5), None))
        .unwrap();

    assert_eq!(report.trades.len(), 2);
    assert_eq!(report.trades[0].maker_order_id, first_id);
    assert_eq!(report.trades[0].quantity, dec!(1.0));
    assert_eq!(report.trades[1].maker_order_id, second_id);
    assert_eq!(report.trades[1].quantity, dec!(0.5));

    assert!(engine.order(&first_id, "BTC-USDT").is_none());
    let survivor = engine.order(&second_id, "BTC-USDT").unwrap();
    assert_eq!(survivor.status, OrderStatus::PartiallyFilled);
    assert_eq!(survivor.remaining_quantity(), dec!(0.5));
}

#[test]
fn unmatched_limit_rests_as_pending() {
    let engine = MatchingEngine::new();
    let report = engine.submit(limit(Side::Buy, dec!(1.0), dec!(49000))).unwrap();

    assert!(report.trades.is_empty());
    assert_eq!(report.status, OrderStatus::Pending);
    assert_eq!(engine.bbo("BTC-USDT"), (Some(dec!(49000)), None));
}

#[test]
fn ioc_fills_what_it_can_and_cancels_the_rest() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();

    let report = engine
        .submit(order(
            "BTC-USDT",
            OrderType::Ioc,
            Side::Buy,
            dec!(2.0),
            Some(dec!(50000)),
        ))
        .unwrap();

    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].quantity, dec!(1.0));
    assert_eq!(report.status, OrderStatus::PartiallyFilled);
    assert_eq!(report.filled_quantity, dec!(1.0));
    assert_eq!(report.remaining_quantity, dec!(1.0));
    // The remainder never rests.
    assert_eq!(engine.bbo("BTC-USDT"), (None, None));
}

#[test]
fn ioc_with_no_match_is_cancelled() {
    let engine = MatchingEngine::new();
    let report = engine
        .submit(order(
            "BTC-USDT",
            OrderType::Ioc,
            Side::Buy,
            dec!(1.0),
            Some(dec!(49000)),
        ))
        .unwrap();

    assert!(report.trades.is_empty());
    assert_eq!(report.status, OrderStatus::Cancelled);
    assert_eq!(engine.bbo("BTC-USDT"), (None, None));
}

#[test]
fn feasible_fok_fills_in_full() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();

    let report = engine
        .submit(order(
            "BTC-USDT",
            OrderType::Fok,
            Side::Buy,
            dec!(1.0),
            Some(dec!(50000)),
        ))
        .unwrap();

    assert_eq!(report.status, OrderStatus::Filled);
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].quantity, dec!(1.0));
    assert!(report.is_complete());
}

#[test]
fn infeasible_fok_rejects_without_touching_the_book() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();
    let before = engine.book_snapshot("BTC-USDT").unwrap();

    let report = engine
        .submit(order(
            "BTC-USDT",
            OrderType::Fok,
            Side::Buy,
            dec!(2.0),
            Some(dec!(50000)),
        ))
        .unwrap();

    assert!(report.trades.is_empty());
    assert_eq!(report.status, OrderStatus::Rejected);
    let after = engine.book_snapshot("BTC-USDT").unwrap();
    assert_eq!(after.best_ask, Some(dec!(50000)));
    assert_eq!(after.asks, before.asks);
    assert_eq!(after.bids, before.bids);
}

#[test]
fn cancelling_the_last_order_empties_the_level() {
    let engine = MatchingEngine::new();
    let resting = limit(Side::Buy, dec!(1.0), dec!(49000));
    let id = resting.id;
    engine.submit(resting).unwrap();

    assert!(engine.cancel(&id, "BTC-USDT"));
    assert_eq!(engine.bbo("BTC-USDT"), (None, None));
    assert!(engine.depth("BTC-USDT", Side::Buy, 10).is_empty());
    assert!(engine.order(&id, "BTC-USDT").is_none());
}

#[test]
fn symbols_do_not_interact() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Buy, dec!(1.0), dec!(49000))).unwrap();
    engine
        .submit(order(
            "ETH-USDT",
            OrderType::Limit,
            Side::Buy,
            dec!(5.0),
            Some(dec!(3000)),
        ))
        .unwrap();

    // A sell on ETH-USDT must not see the BTC-USDT bid.
    let report = engine
        .submit(order(
            "ETH-USDT",
            OrderType::Limit,
            Side::Sell,
            dec!(2.0),
            Some(dec!(3000)),
        ))
        .unwrap();
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].price, dec!(3000));

    assert_eq!(engine.bbo("BTC-USDT"), (Some(dec!(49000)), None));
    assert_eq!(engine.bbo("ETH-USDT"), (Some(dec!(3000)), None));
}

#[test]
fn market_order_on_a_thin_book_keeps_its_fills() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();

    let report = engine
        .submit(order("BTC-USDT", OrderType::Market, Side::Buy, dec!(3.0), None))
        .unwrap();

    // The remainder was not honoured, but the fill stands.
    assert_eq!(report.status, OrderStatus::Rejected);
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].quantity, dec!(1.0));
    assert_eq!(report.filled_quantity, dec!(1.0));
    assert_eq!(report.remaining_quantity, dec!(2.0));
    assert_eq!(engine.bbo("BTC-USDT"), (None, None));
}

#[test]
fn market_order_on_an_empty_book_is_rejected() {
    let engine = MatchingEngine::new();
    let report = engine
        .submit(order("BTC-USDT", OrderType::Market, Side::Buy, dec!(1.0), None))
        .unwrap();

    assert!(report.trades.is_empty());
    assert_eq!(report.status, OrderStatus::Rejected);
}

#[test]
fn submit_then_cancel_round_trips_the_book() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Buy, dec!(2.0), dec!(48000))).unwrap();
    engine.submit(limit(Side::Sell, dec!(2.0), dec!(52000))).unwrap();
    let before = engine.book_snapshot("BTC-USDT").unwrap();

    let probe = limit(Side::Buy, dec!(1.0), dec!(47000));
    let id = probe.id;
    let report = engine.submit(probe).unwrap();
    assert!(report.trades.is_empty());
    assert!(engine.cancel(&id, "BTC-USDT"));

    let after = engine.book_snapshot("BTC-USDT").unwrap();
    assert_eq!(
        serde_json::to_string(&before.bids).unwrap(),
        serde_json::to_string(&after.bids).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&before.asks).unwrap(),
        serde_json::to_string(&after.asks).unwrap()
    );
    assert_eq!(before.best_bid, after.best_bid);
    assert_eq!(before.best_ask, after.best_ask);
}

#[test]
fn resting_remainder_can_be_filled_by_a_later_aggressor() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();

    // Partially fill a large limit buy; the remainder rests.
    let big = limit(Side::Buy, dec!(3.0), dec!(50000));
    let big_id = big.id;
    let report = engine.submit(big).unwrap();
    assert_eq!(report.status, OrderStatus::PartiallyFilled);
    assert_eq!(report.remaining_quantity, dec!(2.0));

    // A later sell fills the remainder; the resting order leaves the book.
    let closing = engine
        .submit(limit(Side::Sell, dec!(2.0), dec!(50000)))
        .unwrap();
    assert_eq!(closing.status, OrderStatus::Filled);
    assert_eq!(closing.trades.len(), 1);
    assert_eq!(closing.trades[0].maker_order_id, big_id);
    assert!(engine.order(&big_id, "BTC-USDT").is_none());
    assert_eq!(engine.bbo("BTC-USDT"), (None, None));
}

#[test]
fn average_price_is_volume_weighted_across_levels() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50100))).unwrap();

    let report = engine
        .submit(order("BTC-USDT", OrderType::Market, Side::Buy, dec!(2.0), None))
        .unwrap();

    assert_eq!(report.status, OrderStatus::Filled);
    assert_eq!(report.average_price, dec!(50050));
    let notional: Decimal = report.trades.iter().map(|t| t.notional_value()).sum();
    assert_eq!(report.average_price * report.filled_quantity, notional);
}

#[test]
fn no_trade_through_for_priced_aggressors() {
    let engine = MatchingEngine::new();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(49900))).unwrap();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50000))).unwrap();
    engine.submit(limit(Side::Sell, dec!(1.0), dec!(50200))).unwrap();

    let report = engine
        .submit(order(
            "BTC-USDT",
            OrderType::Ioc,
            Side::Buy,
            dec!(3.0),
            Some(dec!(50000)),
        ))
        .unwrap();

    // Only the crossable levels execute, best first, each at the maker
    // price.
    assert_eq!(report.trades.len(), 2);
    assert_eq!(report.trades[0].price, dec!(49900));
    assert_eq!(report.trades[1].price, dec!(50000));
    assert!(report.trades.iter().all(|t| t.price <= dec!(50000)));
    assert_eq!(engine.bbo("BTC-USDT"), (None, Some(dec!(50200))));
}
