//! Day-over-day fractional returns.

use crate::data::normalize::CleanPrices;
use crate::error::AnalysisError;
use chrono::NaiveDate;

/// Aligned daily returns, one column per symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    /// Date of the later price in each pair.
    pub dates: Vec<NaiveDate>,
    pub symbols: Vec<String>,
    /// `columns[col][row]`
    pub columns: Vec<Vec<f64>>,
}

impl ReturnTable {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }
}

/// `r_t = p_t / p_{t-1} - 1` per symbol; the first row has no predecessor
/// and is dropped, so every column is one shorter than its price series.
pub fn daily_returns(prices: &CleanPrices) -> Result<ReturnTable, AnalysisError> {
    if prices.symbols.is_empty() {
        return Err(AnalysisError::EmptyUniverse);
    }
    if prices.row_count() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            got: prices.row_count(),
        });
    }

    let mut columns = Vec::with_capacity(prices.symbols.len());
    for (symbol, series) in prices.symbols.iter().zip(&prices.columns) {
        // A zero price would make the next return infinite
        if let Some((row, &price)) = series.iter().enumerate().find(|(_, p)| **p <= 0.0) {
            return Err(AnalysisError::NonPositivePrice {
                symbol: symbol.clone(),
                row,
                price,
            });
        }
        columns.push(series.windows(2).map(|w| w[1] / w[0] - 1.0).collect());
    }

    Ok(ReturnTable {
        dates: prices.dates[1..].to_vec(),
        symbols: prices.symbols.clone(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(symbols: &[&str], columns: Vec<Vec<f64>>) -> CleanPrices {
        let n = columns.first().map(|c| c.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CleanPrices {
            dates: (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            columns,
            dropped_symbols: Vec::new(),
            dropped_dates: 0,
        }
    }

    #[test]
    fn returns_are_one_shorter_than_prices() {
        let p = prices(&["AAPL"], vec![vec![100.0, 110.0, 99.0]]);
        let r = daily_returns(&p).unwrap();

        assert_eq!(r.row_count(), 2);
        assert_eq!(r.dates[0], p.dates[1]);
        let col = r.column("AAPL").unwrap();
        assert!((col[0] - 0.10).abs() < 1e-12);
        assert!((col[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn single_row_is_insufficient() {
        let p = prices(&["AAPL"], vec![vec![100.0]]);
        assert_eq!(
            daily_returns(&p).unwrap_err(),
            AnalysisError::InsufficientData { needed: 2, got: 1 }
        );
    }

    #[test]
    fn empty_universe_is_an_error() {
        let p = prices(&[], vec![]);
        assert_eq!(daily_returns(&p).unwrap_err(), AnalysisError::EmptyUniverse);
    }

    #[test]
    fn zero_price_is_rejected() {
        let p = prices(&["BAD"], vec![vec![1.0, 0.0, 2.0]]);
        assert!(matches!(
            daily_returns(&p).unwrap_err(),
            AnalysisError::NonPositivePrice { row: 1, .. }
        ));
    }
}
