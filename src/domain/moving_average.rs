//! Moving-average trend strategy.
//!
//! Days `1..=window` only build the trailing average. After that, a price at
//! or below `buy_ratio * average` buys `trade_size` shares and a price at or
//! above `sell_ratio * average` sells them; the window then slides by one day.
//! On the last day every held share is sold.

use log::info;

use super::error::StocksimError;
use super::ledger::{Account, OrderRequest};
use super::price_table::PriceTable;
use super::simulation::{Run, SimulationResult};
use super::strategy::MovingAverageParams;

pub const STRATEGY_NAME: &str = "moving-average";

pub fn run_moving_average(
    table: &PriceTable,
    params: &MovingAverageParams,
    initial: Account,
) -> Result<SimulationResult, StocksimError> {
    let column = params.column.as_str();
    let window = params.window;
    let last_day = table.day_count();

    let mut run = Run::new(STRATEGY_NAME, initial);
    let mut running_sum = 0.0;
    let mut average = 0.0;

    for day in 1..=last_day {
        let price = table.price(column, day)?;

        if day <= window {
            running_sum += price;
            average = running_sum / day as f64;
            continue;
        }

        if day == last_day {
            let held = run.account().shares;
            run.place(day, table.label(day), OrderRequest::sell(held, price));
            break;
        }

        if price <= params.buy_ratio * average {
            run.place(day, table.label(day), OrderRequest::buy(params.trade_size, price));
        } else if price >= params.sell_ratio * average {
            run.place(day, table.label(day), OrderRequest::sell(params.trade_size, price));
        }

        running_sum += price - table.price(column, day - window)?;
        average = running_sum / window as f64;
    }

    let result = run.finish();
    info!(
        "{}: {} days, {} fills, {} rejections, cash {:.2}, shares {}",
        STRATEGY_NAME,
        last_day,
        result.fills().count(),
        result.rejections().count(),
        result.account.cash,
        result.account.shares
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::Side;
    use crate::domain::price_table::Field;

    fn table_from_opens(opens: &[f64]) -> PriceTable {
        let header = vec!["date".to_string(), "open".to_string(), "volume".to_string()];
        let rows = opens
            .iter()
            .enumerate()
            .map(|(i, &open)| {
                vec![
                    Field::Text(format!("d{}", i + 1)),
                    Field::Float(open),
                    Field::Int(1000),
                ]
            })
            .collect();
        PriceTable::new(header, rows).unwrap()
    }

    #[test]
    fn no_trades_during_warmup() {
        let table = table_from_opens(&[100.0; 20]);
        let result =
            run_moving_average(&table, &MovingAverageParams::default(), Account::new(1000.0))
                .unwrap();
        assert!(result.events.is_empty());
        assert_eq!(result.final_position(), (0, 1000.0));
    }

    #[test]
    fn empty_table_returns_initial_account() {
        let table = table_from_opens(&[]);
        let result =
            run_moving_average(&table, &MovingAverageParams::default(), Account::new(1000.0))
                .unwrap();
        assert_eq!(result.final_position(), (0, 1000.0));
    }

    #[test]
    fn drop_below_average_buys_then_liquidates() {
        let mut opens = vec![100.0; 20];
        opens.push(50.0);
        opens.push(60.0);
        let table = table_from_opens(&opens);
        let result =
            run_moving_average(&table, &MovingAverageParams::default(), Account::new(1000.0))
                .unwrap();

        let fills: Vec<_> = result.fills().collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].0, 21);
        assert_eq!(fills[0].1.side, Side::Buy);
        assert_eq!(fills[0].1.quantity, 10);
        assert_eq!(fills[1].0, 22);
        assert_eq!(fills[1].1.side, Side::Sell);
        assert_eq!(fills[1].1.quantity, 10);
        assert_eq!(result.final_position(), (0, 1000.0 - 500.0 + 600.0));
    }

    #[test]
    fn rise_above_average_sells_preseeded_holding() {
        let mut opens = vec![100.0; 20];
        opens.push(106.0);
        opens.push(100.0);
        let table = table_from_opens(&opens);
        let result = run_moving_average(
            &table,
            &MovingAverageParams::default(),
            Account::with_shares(0.0, 15),
        )
        .unwrap();

        let fills: Vec<_> = result.fills().collect();
        assert_eq!(fills[0].0, 21);
        assert_eq!(fills[0].1.side, Side::Sell);
        assert_eq!(fills[0].1.quantity, 10);
        assert_eq!(fills[1].1.quantity, 5);
        assert_eq!(result.final_position(), (0, 1060.0 + 500.0));
    }

    #[test]
    fn sell_signal_without_holdings_is_rejected_not_fatal() {
        let mut opens = vec![100.0; 20];
        opens.extend([120.0, 120.0, 100.0]);
        let table = table_from_opens(&opens);
        let result =
            run_moving_average(&table, &MovingAverageParams::default(), Account::new(1000.0))
                .unwrap();
        assert_eq!(result.rejections().count(), 2);
        assert_eq!(result.final_position(), (0, 1000.0));
    }

    #[test]
    fn within_band_no_trade() {
        let mut opens = vec![100.0; 20];
        opens.extend([96.0, 104.0, 100.0]);
        let table = table_from_opens(&opens);
        let result =
            run_moving_average(&table, &MovingAverageParams::default(), Account::new(1000.0))
                .unwrap();
        // Only the terminal liquidation of zero shares.
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].day, 23);
    }

    #[test]
    fn unknown_column_propagates() {
        let table = table_from_opens(&[100.0; 25]);
        let params = MovingAverageParams {
            column: "close".into(),
            ..MovingAverageParams::default()
        };
        let err = run_moving_average(&table, &params, Account::new(1000.0)).unwrap_err();
        assert!(matches!(err, StocksimError::ColumnNotFound { .. }));
    }
}
