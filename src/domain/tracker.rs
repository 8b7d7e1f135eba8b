//! Position tracking over an annotated frame.
//!
//! Two states, FLAT and LONG, evaluated once per bar in date order:
//!
//! | State | Condition   | New state | Effect                                 |
//! |-------|-------------|-----------|----------------------------------------|
//! | Flat  | buy fires   | Long      | signal = +1, record entry close/date   |
//! | Long  | sell fires  | Flat      | signal = -1, annotate profit, emit trade |
//!
//! When both trees fire on the same bar, buy wins while flat and sell wins
//! while long, so a sell never chains into a same-bar re-entry. A position
//! still open at the last bar realizes no trade.

use chrono::NaiveDate;

use crate::domain::frame::IndicatorFrame;
use crate::domain::rule::{evaluate, SignalRules};

#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Long {
        entry_price: f64,
        entry_date: NaiveDate,
    },
}

/// A closed round trip. Profit is exit close minus entry close; no costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub profit: f64,
}

/// Run the state machine over the frame, annotating the signal, profit and
/// buy-date columns and returning the closed trades in exit order.
pub fn track_positions(frame: &mut IndicatorFrame, rules: &SignalRules) -> Vec<Trade> {
    let mut state = PositionState::Flat;
    let mut trades = Vec::new();

    for row in &mut frame.rows {
        let buy = evaluate(&rules.buy, row);
        let sell = evaluate(&rules.sell, row);

        match state {
            PositionState::Flat if buy => {
                row.signal = 1;
                state = PositionState::Long {
                    entry_price: row.close,
                    entry_date: row.date,
                };
            }
            PositionState::Long {
                entry_price,
                entry_date,
            } if sell => {
                let profit = row.close - entry_price;
                row.signal = -1;
                row.profit = profit;
                row.buy_date = Some(entry_date);
                trades.push(Trade {
                    entry_date,
                    exit_date: row.date,
                    profit,
                });
                state = PositionState::Flat;
            }
            _ => {
                row.signal = 0;
            }
        }
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{Field, FrameRow};
    use crate::domain::rule::{CmpOp, Condition};
    use proptest::prelude::*;

    fn close_rules(buy_below: f64, sell_above: f64) -> SignalRules {
        SignalRules {
            buy: Condition::Leaf {
                field: Field::Close,
                op: CmpOp::Lt,
                threshold: buy_below,
            },
            sell: Condition::Leaf {
                field: Field::Close,
                op: CmpOp::Gt,
                threshold: sell_above,
            },
        }
    }

    fn make_frame(closes: &[f64]) -> IndicatorFrame {
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| FrameRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
                ma: f64::NAN,
                rsi: f64::NAN,
                macd: f64::NAN,
                macd_signal: f64::NAN,
                macd_hist: f64::NAN,
                willr: f64::NAN,
                k: f64::NAN,
                d: f64::NAN,
                j: f64::NAN,
                signal: 0,
                profit: f64::NAN,
                buy_date: None,
            })
            .collect();
        IndicatorFrame { rows }
    }

    #[test]
    fn single_round_trip() {
        let mut frame = make_frame(&[100.0, 90.0, 95.0, 120.0, 110.0]);
        let trades = track_positions(&mut frame, &close_rules(95.0, 115.0));

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.entry_date, frame.rows[1].date);
        assert_eq!(trade.exit_date, frame.rows[3].date);
        assert!((trade.profit - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn signal_annotations_match_transitions() {
        let mut frame = make_frame(&[100.0, 90.0, 95.0, 120.0, 110.0]);
        track_positions(&mut frame, &close_rules(95.0, 115.0));

        let signals: Vec<i8> = frame.rows.iter().map(|r| r.signal).collect();
        assert_eq!(signals, vec![0, 1, 0, -1, 0]);

        assert!((frame.rows[3].profit - 30.0).abs() < f64::EPSILON);
        assert_eq!(frame.rows[3].buy_date, Some(frame.rows[1].date));
        assert!(frame.rows[2].profit.is_nan());
    }

    #[test]
    fn no_pyramiding_while_long() {
        // Buy keeps firing after entry; only the first bar records a signal.
        let mut frame = make_frame(&[90.0, 85.0, 80.0, 120.0]);
        let trades = track_positions(&mut frame, &close_rules(95.0, 115.0));

        assert_eq!(trades.len(), 1);
        assert_eq!(frame.rows[0].signal, 1);
        assert_eq!(frame.rows[1].signal, 0);
        assert_eq!(frame.rows[2].signal, 0);
        assert!((trades[0].profit - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sell_while_flat_is_noop() {
        let mut frame = make_frame(&[120.0, 130.0, 125.0]);
        let trades = track_positions(&mut frame, &close_rules(95.0, 115.0));

        assert!(trades.is_empty());
        assert!(frame.rows.iter().all(|r| r.signal == 0));
    }

    #[test]
    fn open_position_at_end_realizes_no_trade() {
        let mut frame = make_frame(&[90.0, 100.0, 105.0]);
        let trades = track_positions(&mut frame, &close_rules(95.0, 115.0));

        assert!(trades.is_empty());
        assert_eq!(frame.rows[0].signal, 1);
    }

    #[test]
    fn buy_wins_over_sell_while_flat() {
        // Both trees always fire: entry on bar 0, exit on bar 1, re-entry on
        // bar 2. A flat bar never records -1.
        let always = SignalRules {
            buy: Condition::All(vec![]),
            sell: Condition::All(vec![]),
        };
        let mut frame = make_frame(&[100.0, 101.0, 102.0, 103.0]);
        let trades = track_positions(&mut frame, &always);

        let signals: Vec<i8> = frame.rows.iter().map(|r| r.signal).collect();
        assert_eq!(signals, vec![1, -1, 1, -1]);
        assert_eq!(trades.len(), 2);
    }

    #[test]
    fn sell_wins_over_buy_while_long_no_same_bar_reentry() {
        let always = SignalRules {
            buy: Condition::All(vec![]),
            sell: Condition::All(vec![]),
        };
        let mut frame = make_frame(&[100.0, 110.0]);
        let trades = track_positions(&mut frame, &always);

        // Bar 1 closes the position; the simultaneous buy does not re-enter.
        assert_eq!(trades.len(), 1);
        assert_eq!(frame.rows[1].signal, -1);
        assert!((trades[0].profit - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_indicators_nan_never_trades() {
        let rules = SignalRules {
            buy: Condition::Leaf {
                field: Field::Ma,
                op: CmpOp::Lt,
                threshold: 1e9,
            },
            sell: Condition::Leaf {
                field: Field::Ma,
                op: CmpOp::Gt,
                threshold: -1e9,
            },
        };
        let mut frame = make_frame(&[10.0, 12.0, 8.0]);
        let trades = track_positions(&mut frame, &rules);

        assert!(trades.is_empty());
        assert!(frame.rows.iter().all(|r| r.signal == 0));
    }

    #[test]
    fn rerun_is_idempotent() {
        let closes = [100.0, 90.0, 95.0, 120.0, 88.0, 130.0];
        let rules = close_rules(95.0, 115.0);

        let mut first = make_frame(&closes);
        let mut second = make_frame(&closes);
        let trades_a = track_positions(&mut first, &rules);
        let trades_b = track_positions(&mut second, &rules);

        assert_eq!(trades_a, trades_b);
        let signals_a: Vec<i8> = first.rows.iter().map(|r| r.signal).collect();
        let signals_b: Vec<i8> = second.rows.iter().map(|r| r.signal).collect();
        assert_eq!(signals_a, signals_b);
    }

    proptest! {
        #[test]
        fn trade_count_equals_sell_transitions(closes in prop::collection::vec(50.0f64..150.0, 1..60)) {
            let rules = close_rules(90.0, 110.0);
            let mut frame = make_frame(&closes);
            let trades = track_positions(&mut frame, &rules);

            let sells = frame.rows.iter().filter(|r| r.signal == -1).count();
            prop_assert_eq!(trades.len(), sells);
        }

        #[test]
        fn exits_strictly_after_entries(closes in prop::collection::vec(50.0f64..150.0, 1..60)) {
            let rules = close_rules(90.0, 110.0);
            let mut frame = make_frame(&closes);
            let trades = track_positions(&mut frame, &rules);

            for trade in &trades {
                prop_assert!(trade.exit_date > trade.entry_date);
            }
        }

        #[test]
        fn buys_and_sells_alternate(closes in prop::collection::vec(50.0f64..150.0, 1..60)) {
            let rules = close_rules(90.0, 110.0);
            let mut frame = make_frame(&closes);
            track_positions(&mut frame, &rules);

            let mut expecting_buy = true;
            for row in &frame.rows {
                match row.signal {
                    1 => {
                        prop_assert!(expecting_buy);
                        expecting_buy = false;
                    }
                    -1 => {
                        prop_assert!(!expecting_buy);
                        expecting_buy = true;
                    }
                    _ => {}
                }
            }
        }
    }
}
