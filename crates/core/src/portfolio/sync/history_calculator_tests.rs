//! Unit tests for the daily state iterator.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::activities::{CashTransaction, CashTransactionType, Trade, TradeAction};
use crate::market_data::PriceCache;
use crate::portfolio::sync::{calculate_history_rows, resolve_sync_start, SyncStart};
use crate::utils::time_utils::get_days_between;

const BASE: &str = "USD";
const BENCH: &str = "^GSPC";

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn trade(
    ticker: &str,
    action: TradeAction,
    quantity: Decimal,
    unit_price: Decimal,
    date: NaiveDate,
) -> Trade {
    Trade {
        id: format!("t-{}-{}", ticker, date),
        portfolio_id: "p-1".to_string(),
        ticker: ticker.to_string(),
        action,
        quantity,
        unit_price,
        fee: Decimal::ZERO,
        trade_date: date,
        created_at: Utc::now(),
    }
}

fn buy(ticker: &str, quantity: Decimal, unit_price: Decimal, date: NaiveDate) -> Trade {
    trade(ticker, TradeAction::Buy, quantity, unit_price, date)
}

fn cash(
    currency: &str,
    amount: Decimal,
    tx_type: CashTransactionType,
    date: NaiveDate,
) -> CashTransaction {
    CashTransaction {
        id: format!("c-{}-{}-{}", currency, amount, date),
        portfolio_id: "p-1".to_string(),
        currency: currency.to_string(),
        amount,
        transaction_type: tx_type,
        transaction_date: date,
        created_at: Utc::now(),
    }
}

fn deposit(amount: Decimal, date: NaiveDate) -> CashTransaction {
    cash(BASE, amount, CashTransactionType::Deposit, date)
}

fn bootstrap(trades: &[Trade], cash_transactions: &[CashTransaction]) -> SyncStart {
    resolve_sync_start(trades, cash_transactions, None, BASE).unwrap()
}

fn flat_series(cache: &mut PriceCache, symbol: &str, close: Decimal, from: NaiveDate, to: NaiveDate) {
    for day in get_days_between(from, to) {
        cache.insert_close(symbol, day, close);
    }
}

#[test]
fn test_buy_and_hold_at_flat_price_yields_zero_returns() {
    // 10 shares bought on day one, price flat for four more days, no cash
    // flows recorded.
    let day1 = d(2024, 3, 4);
    let day5 = d(2024, 3, 8);
    let trades = vec![buy("X", dec!(10), dec!(100), day1)];
    let mut prices = PriceCache::default();
    flat_series(&mut prices, "X", dec!(100), day1, day5);

    let start = bootstrap(&trades, &[]);
    let rows = calculate_history_rows("p-1", &start, &trades, &[], &prices, BASE, BENCH, day5);

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].entry_date, day1);
    assert_eq!(rows[0].total_value, dec!(1000));
    assert_eq!(rows[0].cost_basis, Decimal::ZERO);
    for row in &rows {
        assert_eq!(row.daily_return, Decimal::ZERO);
    }
    assert_eq!(rows[4].cumulative_twr, Decimal::ZERO);
}

#[test]
fn test_same_day_deposit_and_buy_do_not_double_count() {
    let day1 = d(2024, 3, 4);
    let transactions = vec![deposit(dec!(1000), day1)];
    let trades = vec![buy("Y", dec!(5), dec!(100), day1)];
    let mut prices = PriceCache::default();
    flat_series(&mut prices, "Y", dec!(100), day1, day1);

    let start = bootstrap(&trades, &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &trades, &transactions, &prices, BASE, BENCH, day1);

    assert_eq!(rows.len(), 1);
    // Cost basis is the deposit alone; the purchase only moved value from
    // cash into the position (500 cash + 500 shares).
    assert_eq!(rows[0].cost_basis, dec!(1000));
    assert_eq!(rows[0].total_value, dec!(1000));
    assert_eq!(rows[0].daily_return, Decimal::ZERO);
}

#[test]
fn test_price_gain_produces_the_expected_daily_return() {
    let day1 = d(2024, 3, 4);
    let day2 = d(2024, 3, 5);
    let transactions = vec![deposit(dec!(1000), day1)];
    let trades = vec![buy("X", dec!(10), dec!(100), day1)];
    let mut prices = PriceCache::default();
    prices.insert_close("X", day1, dec!(100));
    prices.insert_close("X", day2, dec!(110));

    let start = bootstrap(&trades, &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &trades, &transactions, &prices, BASE, BENCH, day2);

    assert_eq!(rows[1].daily_return, dec!(0.1));
    assert_eq!(rows[1].cumulative_twr, dec!(0.1));
    assert_eq!(rows[1].total_value, dec!(1100));
}

#[test]
fn test_cumulative_twr_is_the_product_of_daily_returns() {
    let day1 = d(2024, 3, 4);
    let today = d(2024, 3, 12);
    let transactions = vec![
        deposit(dec!(1000), day1),
        deposit(dec!(500), d(2024, 3, 7)),
        cash(BASE, dec!(-200), CashTransactionType::Withdrawal, d(2024, 3, 10)),
    ];
    let trades = vec![
        buy("X", dec!(8), dec!(100), day1),
        trade("X", TradeAction::Sell, dec!(3), dec!(104), d(2024, 3, 8)),
    ];
    let mut prices = PriceCache::default();
    for (offset, close) in [100, 102, 99, 101, 104, 104, 107, 105, 108].iter().enumerate() {
        prices.insert_close("X", day1 + Duration::days(offset as i64), Decimal::from(*close));
    }

    let start = bootstrap(&trades, &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &trades, &transactions, &prices, BASE, BENCH, today);

    assert_eq!(rows.len(), 9);
    let mut factor = Decimal::ONE;
    for row in &rows {
        factor *= Decimal::ONE + row.daily_return;
    }
    assert_eq!(rows.last().unwrap().cumulative_twr, factor - Decimal::ONE);
}

#[test]
fn test_splitting_a_deposit_leaves_returns_unchanged() {
    let day1 = d(2024, 3, 4);
    let day3 = d(2024, 3, 6);
    let trades = vec![buy("X", dec!(10), dec!(100), day1)];
    let mut prices = PriceCache::default();
    prices.insert_close("X", day1, dec!(100));
    prices.insert_close("X", d(2024, 3, 5), dec!(103));
    prices.insert_close("X", day3, dec!(106));

    let single = vec![deposit(dec!(1000), day1)];
    let split = vec![deposit(dec!(380), day1), deposit(dec!(620), day1)];

    let rows_single = calculate_history_rows(
        "p-1",
        &bootstrap(&trades, &single),
        &trades,
        &single,
        &prices,
        BASE,
        BENCH,
        day3,
    );
    let rows_split = calculate_history_rows(
        "p-1",
        &bootstrap(&trades, &split),
        &trades,
        &split,
        &prices,
        BASE,
        BENCH,
        day3,
    );

    for (a, b) in rows_single.iter().zip(&rows_split) {
        assert_eq!(a.daily_return, b.daily_return);
        assert_eq!(a.cumulative_twr, b.cumulative_twr);
        assert_eq!(a.total_value, b.total_value);
    }
}

#[test]
fn test_resuming_mid_history_matches_the_single_pass() {
    let day1 = d(2024, 3, 4);
    let today = d(2024, 3, 13);
    let transactions = vec![
        deposit(dec!(2000), day1),
        deposit(dec!(750), d(2024, 3, 9)),
    ];
    let trades = vec![
        buy("X", dec!(12), dec!(100), day1),
        buy("X", dec!(5), dec!(108), d(2024, 3, 9)),
    ];
    let mut prices = PriceCache::default();
    for (offset, close) in [100, 101, 105, 103, 102, 108, 109, 111, 110, 112]
        .iter()
        .enumerate()
    {
        prices.insert_close("X", day1 + Duration::days(offset as i64), Decimal::from(*close));
    }
    flat_series(&mut prices, BENCH, dec!(4000), day1, today);

    let single_pass = calculate_history_rows(
        "p-1",
        &bootstrap(&trades, &transactions),
        &trades,
        &transactions,
        &prices,
        BASE,
        BENCH,
        today,
    );

    // Same ledger, computed in two passes split at an arbitrary day.
    for split in [2usize, 5, 8] {
        let split_day = day1 + Duration::days(split as i64);
        let first_pass = calculate_history_rows(
            "p-1",
            &bootstrap(&trades, &transactions),
            &trades,
            &transactions,
            &prices,
            BASE,
            BENCH,
            split_day,
        );
        let anchor = first_pass.last().unwrap();
        let resumed_start =
            resolve_sync_start(&trades, &transactions, Some(anchor), BASE).unwrap();
        let second_pass = calculate_history_rows(
            "p-1",
            &resumed_start,
            &trades,
            &transactions,
            &prices,
            BASE,
            BENCH,
            today,
        );

        let last = second_pass.last().unwrap();
        let expected = single_pass.last().unwrap();
        assert_eq!(last.total_value, expected.total_value, "split at {}", split);
        assert_eq!(last.cumulative_twr, expected.cumulative_twr, "split at {}", split);
        assert_eq!(last.cost_basis, expected.cost_basis, "split at {}", split);
    }
}

#[test]
fn test_stale_price_backfills_up_to_seven_days() {
    let day1 = d(2024, 3, 4);
    let trades = vec![buy("X", dec!(2), dec!(50), day1)];
    let mut prices = PriceCache::default();
    // Only one close, three days before the valuation day.
    prices.insert_close("X", day1, dec!(50));

    let start = bootstrap(&trades, &[]);
    let rows =
        calculate_history_rows("p-1", &start, &trades, &[], &prices, BASE, BENCH, d(2024, 3, 7));

    assert_eq!(rows.last().unwrap().total_value, dec!(100));
}

#[test]
fn test_price_older_than_the_window_values_the_position_at_zero() {
    let day1 = d(2024, 3, 4);
    let trades = vec![buy("X", dec!(2), dec!(50), day1)];
    let mut prices = PriceCache::default();
    prices.insert_close("X", day1, dec!(50));

    let start = bootstrap(&trades, &[]);
    let rows =
        calculate_history_rows("p-1", &start, &trades, &[], &prices, BASE, BENCH, d(2024, 3, 15));

    // Eleven days past the last close: the position drops out of the
    // valuation instead of failing the sync.
    assert_eq!(rows.last().unwrap().total_value, Decimal::ZERO);
}

#[test]
fn test_foreign_deposit_converts_through_the_fx_pair() {
    let day1 = d(2024, 3, 4);
    let transactions = vec![cash("HUF", dec!(360000), CashTransactionType::Deposit, day1)];
    let mut prices = PriceCache::default();
    prices.insert_close("USDHUF=X", day1, dec!(360));

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, day1);

    assert_eq!(rows[0].cost_basis, dec!(1000));
    assert_eq!(rows[0].total_value, dec!(1000));
    assert_eq!(rows[0].daily_return, Decimal::ZERO);
}

#[test]
fn test_foreign_balance_without_a_rate_is_invisible() {
    let day1 = d(2024, 3, 4);
    let transactions = vec![cash("HUF", dec!(360000), CashTransactionType::Deposit, day1)];
    let prices = PriceCache::default();

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, day1);

    // No USDHUF rate cached: the deposit neither counts as a flow nor
    // contributes to valuation, so the day stays flat instead of showing a
    // phantom gain or loss.
    assert_eq!(rows[0].cost_basis, Decimal::ZERO);
    assert_eq!(rows[0].total_value, Decimal::ZERO);
    assert_eq!(rows[0].daily_return, Decimal::ZERO);
}

#[test]
fn test_dividends_move_cash_but_are_not_external_flows() {
    let day1 = d(2024, 3, 4);
    let day2 = d(2024, 3, 5);
    let transactions = vec![
        deposit(dec!(1000), day1),
        cash(BASE, dec!(50), CashTransactionType::Dividend, day2),
    ];
    let prices = PriceCache::default();

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, day2);

    // The dividend lands in cash and shows up as performance, not as
    // contributed capital.
    assert_eq!(rows[1].cost_basis, dec!(1000));
    assert_eq!(rows[1].total_value, dec!(1050));
    assert_eq!(rows[1].daily_return, dec!(0.05));
}

#[test]
fn test_benchmark_tracks_its_growth_since_inception() {
    let day1 = d(2024, 3, 4);
    let day3 = d(2024, 3, 6);
    let transactions = vec![deposit(dec!(1000), day1)];
    let mut prices = PriceCache::default();
    prices.insert_close(BENCH, day1, dec!(4000));
    prices.insert_close(BENCH, day3, dec!(4400));

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, day3);

    assert_eq!(rows[0].bench_cumulative, Decimal::ZERO);
    assert_eq!(rows[2].bench_cumulative, dec!(0.1));
}

#[test]
fn test_benchmark_carries_forward_when_data_runs_out() {
    let day1 = d(2024, 3, 4);
    let today = d(2024, 3, 20);
    let transactions = vec![deposit(dec!(1000), day1)];
    let mut prices = PriceCache::default();
    prices.insert_close(BENCH, day1, dec!(4000));
    prices.insert_close(BENCH, d(2024, 3, 5), dec!(4400));

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, today);

    // The last usable close is eventually past the backfill window; the
    // ratio from the last computable day sticks.
    assert_eq!(rows.last().unwrap().bench_cumulative, dec!(0.1));
}

#[test]
fn test_benchmark_missing_entirely_stays_at_zero() {
    let day1 = d(2024, 3, 4);
    let transactions = vec![deposit(dec!(1000), day1)];
    let prices = PriceCache::default();

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, day1);

    assert_eq!(rows[0].bench_cumulative, Decimal::ZERO);
}

#[test]
fn test_realized_pnl_is_carried_through_unchanged() {
    let day1 = d(2024, 3, 4);
    let today = d(2024, 3, 6);
    let transactions = vec![deposit(dec!(1000), day1)];
    let prices = PriceCache::default();

    let mut start = bootstrap(&[], &transactions);
    start.realized_pnl = dec!(42.5);

    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, today);

    for row in &rows {
        assert_eq!(row.realized_pnl, dec!(42.5));
    }
}

#[test]
fn test_rows_form_an_unbroken_ascending_sequence() {
    let day1 = d(2024, 3, 4);
    let today = d(2024, 3, 11);
    let transactions = vec![deposit(dec!(1000), day1)];
    let prices = PriceCache::default();

    let start = bootstrap(&[], &transactions);
    let rows =
        calculate_history_rows("p-1", &start, &[], &transactions, &prices, BASE, BENCH, today);

    assert_eq!(rows.len(), 8);
    for (offset, row) in rows.iter().enumerate() {
        assert_eq!(row.entry_date, day1 + Duration::days(offset as i64));
        assert_eq!(row.id, format!("p-1_{}", row.entry_date));
    }
}

#[test]
fn test_nothing_to_compute_when_start_is_past_today() {
    let day1 = d(2024, 3, 4);
    let transactions = vec![deposit(dec!(1000), day1)];
    let prices = PriceCache::default();

    let mut start = bootstrap(&[], &transactions);
    start.resume_from = Some(d(2024, 3, 10));

    let rows = calculate_history_rows(
        "p-1",
        &start,
        &[],
        &transactions,
        &prices,
        BASE,
        BENCH,
        d(2024, 3, 10),
    );

    assert!(rows.is_empty());
}
