//! Run state shared by the strategies: the threaded account plus an
//! in-memory journal of every order placed.

use log::{debug, warn};

use super::ledger::{transact, Account, Fill, OrderRequest, Rejection};

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEvent {
    pub day: usize,
    pub label: Option<String>,
    pub request: OrderRequest,
    pub outcome: Result<Fill, Rejection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub strategy: String,
    pub account: Account,
    pub events: Vec<LedgerEvent>,
}

impl SimulationResult {
    /// `(shares held, cash balance)` after liquidation.
    pub fn final_position(&self) -> (i64, f64) {
        (self.account.shares, self.account.cash)
    }

    pub fn fills(&self) -> impl Iterator<Item = (usize, &Fill)> {
        self.events
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok().map(|f| (e.day, f)))
    }

    pub fn rejections(&self) -> impl Iterator<Item = (usize, &Rejection)> {
        self.events
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|r| (e.day, r)))
    }
}

/// Threads an [`Account`] through a strategy loop and journals each order.
#[derive(Debug)]
pub struct Run {
    strategy: String,
    account: Account,
    events: Vec<LedgerEvent>,
}

impl Run {
    pub fn new(strategy: &str, initial: Account) -> Self {
        Run {
            strategy: strategy.to_string(),
            account: initial,
            events: Vec::new(),
        }
    }

    pub fn account(&self) -> Account {
        self.account
    }

    /// Places `request` through the ledger. Rejections are logged and
    /// journaled; the account is left as it was.
    pub fn place(&mut self, day: usize, label: Option<&str>, request: OrderRequest) {
        let (account, outcome) = transact(self.account, &request);
        self.account = account;
        match &outcome {
            Ok(fill) => debug!(
                "{} day {}: {} {} @ {:.4} (cash {:.2}, shares {})",
                self.strategy,
                day,
                fill.side,
                fill.quantity,
                fill.price,
                account.cash,
                account.shares
            ),
            Err(rejection) => warn!("{} day {}: order rejected: {}", self.strategy, day, rejection),
        }
        self.events.push(LedgerEvent {
            day,
            label: label.map(str::to_string),
            request,
            outcome,
        });
    }

    pub fn finish(self) -> SimulationResult {
        SimulationResult {
            strategy: self.strategy,
            account: self.account,
            events: self.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::Side;

    #[test]
    fn run_threads_account_through_orders() {
        let mut run = Run::new("test", Account::new(1000.0));
        run.place(21, Some("2024-02-01"), OrderRequest::buy(10, 50.0));
        run.place(22, None, OrderRequest::sell(4, 60.0));
        let result = run.finish();

        assert_eq!(result.final_position(), (6, 740.0));
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].label.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn rejected_order_is_journaled_and_ignored() {
        let mut run = Run::new("test", Account::new(100.0));
        run.place(21, None, OrderRequest::buy(10, 50.0));
        run.place(22, None, OrderRequest::sell(1, 50.0));
        let result = run.finish();

        assert_eq!(result.account, Account::new(100.0));
        assert_eq!(result.fills().count(), 0);
        let rejections: Vec<_> = result.rejections().collect();
        assert_eq!(rejections.len(), 2);
        assert_eq!(rejections[0].0, 21);
        assert!(matches!(rejections[1].1, Rejection::InsufficientShares { .. }));
    }

    #[test]
    fn fills_report_side_and_day() {
        let mut run = Run::new("test", Account::new(1000.0));
        run.place(30, None, OrderRequest::buy(3, 10.0));
        let result = run.finish();
        let fills: Vec<_> = result.fills().collect();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].0, 30);
        assert_eq!(fills[0].1.side, Side::Buy);
    }
}
