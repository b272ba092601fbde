use crate::domain::ClosedTrade;

/// Compounding balance tracker.
///
/// Every closed trade (forced closures included) multiplies the balance by
/// `1 + pnl_percent / 100`, in closure order.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityTracker {
    initial_balance: f64,
    balance: f64,
    balance_history: Vec<f64>,
}

impl EquityTracker {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            balance: initial_balance,
            balance_history: vec![initial_balance],
        }
    }

    /// Compound one closed trade into the balance.
    pub fn apply_trade(&mut self, trade: &ClosedTrade) {
        self.balance *= trade.growth_factor();
        self.balance_history.push(self.balance);
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Balance after each closed trade, starting with the initial balance.
    pub fn balance_history(&self) -> &[f64] {
        &self.balance_history
    }

    /// Total return since the start, in percent.
    pub fn total_return_percent(&self) -> f64 {
        if self.initial_balance == 0.0 {
            return 0.0;
        }
        (self.balance / self.initial_balance - 1.0) * 100.0
    }
}

/// Round to 2 decimal places.
///
/// Exact ties go to the even cent (`10000.125` reports as `10000.12`).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
