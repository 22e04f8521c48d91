//! Transaction bookkeeping for a single cash/share account.
//!
//! `transact` never fails a run: a rejected order comes back as a
//! [`Rejection`] next to the unchanged account so the caller can log, count
//! or ignore it.

use std::fmt;

/// Cash balance and shares held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub shares: i64,
}

impl Account {
    pub fn new(cash: f64) -> Self {
        Account { cash, shares: 0 }
    }

    pub fn with_shares(cash: f64, shares: i64) -> Self {
        Account { cash, shares }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `None` when both or neither flag is set.
    pub fn from_flags(buy: bool, sell: bool) -> Option<Side> {
        match (buy, sell) {
            (true, false) => Some(Side::Buy),
            (false, true) => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// One buy or sell instruction. Exactly one of `buy`/`sell` must be set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRequest {
    pub quantity: i64,
    pub price: f64,
    pub buy: bool,
    pub sell: bool,
}

impl OrderRequest {
    pub fn buy(quantity: i64, price: f64) -> Self {
        OrderRequest {
            quantity,
            price,
            buy: true,
            sell: false,
        }
    }

    pub fn sell(quantity: i64, price: f64) -> Self {
        OrderRequest {
            quantity,
            price,
            buy: false,
            sell: true,
        }
    }
}

/// A completed transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
    pub value: f64,
}

/// Why an order left the account untouched.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("ambiguous transaction: exactly one of buy or sell must be requested")]
    AmbiguousDirection,

    #[error("insufficient funds: need {required:.2}, have {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient shares: selling {requested}, holding {held}")]
    InsufficientShares { requested: i64, held: i64 },

    #[error("negative quantity {quantity}")]
    NegativeQuantity { quantity: i64 },
}

/// Applies `order` to `account`.
///
/// On rejection the returned account equals the input.
pub fn transact(account: Account, order: &OrderRequest) -> (Account, Result<Fill, Rejection>) {
    let Some(side) = Side::from_flags(order.buy, order.sell) else {
        return (account, Err(Rejection::AmbiguousDirection));
    };

    if order.quantity < 0 {
        return (
            account,
            Err(Rejection::NegativeQuantity {
                quantity: order.quantity,
            }),
        );
    }

    let value = order.quantity as f64 * order.price;

    match side {
        Side::Buy => {
            if value > account.cash {
                return (
                    account,
                    Err(Rejection::InsufficientFunds {
                        required: value,
                        available: account.cash,
                    }),
                );
            }
            let next = Account {
                cash: account.cash - value,
                shares: account.shares + order.quantity,
            };
            (next, Ok(fill(side, order, value)))
        }
        Side::Sell => {
            if order.quantity > account.shares {
                return (
                    account,
                    Err(Rejection::InsufficientShares {
                        requested: order.quantity,
                        held: account.shares,
                    }),
                );
            }
            let next = Account {
                cash: account.cash + value,
                shares: account.shares - order.quantity,
            };
            (next, Ok(fill(side, order, value)))
        }
    }
}

fn fill(side: Side, order: &OrderRequest, value: f64) -> Fill {
    Fill {
        side,
        quantity: order.quantity,
        price: order.price,
        value,
    }
}
