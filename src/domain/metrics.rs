//! Per-run profitability metrics.

use crate::domain::tracker::Trade;

/// Aggregate outcome of one parameter combination.
///
/// `profit_factor` is `None` whenever the gross loss is zero, including the
/// all-winners case. Undefined is reported as undefined, never coerced to
/// zero or infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: Option<f64>,
    pub trade_count: usize,
}

impl RunMetrics {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;

        for trade in trades {
            if trade.profit > 0.0 {
                gross_profit += trade.profit;
            } else if trade.profit < 0.0 {
                gross_loss += -trade.profit;
            }
        }

        let profit_factor = if gross_loss > 0.0 {
            Some(gross_profit / gross_loss)
        } else {
            None
        };

        RunMetrics {
            gross_profit,
            gross_loss,
            profit_factor,
            trade_count: trades.len(),
        }
    }
}
