//! Rule-set store port.

use crate::domain::error::SweeptraderError;
use crate::domain::rule::SignalRules;

/// Load/persist the buy and sell condition trees. Implementations must be
/// lossless: `load` after `save` yields an equal rule set.
pub trait RulesPort {
    fn load(&self) -> Result<SignalRules, SweeptraderError>;
    fn save(&self, rules: &SignalRules) -> Result<(), SweeptraderError>;
}
