//! Multi-symbol alignment and the missing-data policy.
//!
//! Bars for every symbol are laid onto the union of all observed dates,
//! producing a date-indexed table with one column per symbol. Missing cells
//! stay missing (no forward-fill, no imputation); the `MissingDataPolicy`
//! then decides what survives.

use super::provider::RawBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Which price of a bar populates the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Split/dividend adjusted close, falling back to the raw close when the
    /// provider reports none.
    #[default]
    AdjustedClose,
    /// Raw session close.
    Close,
}

impl PriceField {
    fn select(self, bar: &RawBar) -> f64 {
        match self {
            PriceField::AdjustedClose => bar.adj_close.unwrap_or(bar.close),
            PriceField::Close => bar.close,
        }
    }
}

/// What to do with gaps in the aligned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Drop every symbol with at least one missing value. Rows are untouched.
    #[default]
    DropColumn,
    /// Drop every date on which some symbol is missing. Symbols with no data
    /// at all are dropped first, otherwise they would empty the table.
    DropRow,
}

/// Date-indexed price table with one column per symbol. `None` = missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    /// `columns[col][row]`
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.columns.get(col).and_then(|c| c.get(row)).copied().flatten()
    }

    pub fn column(&self, col: usize) -> &[Option<f64>] {
        &self.columns[col]
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of missing cells in a column.
    pub fn missing_count(&self, col: usize) -> usize {
        self.columns[col].iter().filter(|v| v.is_none()).count()
    }
}

/// Align fetched bars onto the union of their dates.
///
/// Column order follows `symbols`; a symbol absent from `fetched` becomes an
/// all-missing column. Non-finite prices count as missing.
pub fn align_prices(
    symbols: &[String],
    fetched: &HashMap<String, Vec<RawBar>>,
    field: PriceField,
) -> PriceTable {
    let mut all_dates = BTreeSet::new();
    for symbol in symbols {
        if let Some(bars) = fetched.get(symbol) {
            all_dates.extend(bars.iter().map(|b| b.date));
        }
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let columns = symbols
        .iter()
        .map(|symbol| {
            let by_date: HashMap<NaiveDate, f64> = fetched
                .get(symbol)
                .map(|bars| {
                    bars.iter()
                        .map(|b| (b.date, field.select(b)))
                        .filter(|(_, v)| v.is_finite())
                        .collect()
                })
                .unwrap_or_default();

            dates.iter().map(|d| by_date.get(d).copied()).collect()
        })
        .collect();

    PriceTable {
        dates,
        symbols: symbols.to_vec(),
        columns,
    }
}

/// Gap-free prices left after applying a `MissingDataPolicy`.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanPrices {
    pub dates: Vec<NaiveDate>,
    pub symbols: Vec<String>,
    /// `columns[col][row]`, every cell present.
    pub columns: Vec<Vec<f64>>,
    /// Symbols removed by the policy, in table order.
    pub dropped_symbols: Vec<String>,
    /// Number of dates removed by the policy.
    pub dropped_dates: usize,
}

impl CleanPrices {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }
}

/// Apply a missing-data policy. Never fails: dropping is policy, not a fault.
pub fn apply_policy(table: &PriceTable, policy: MissingDataPolicy) -> CleanPrices {
    match policy {
        MissingDataPolicy::DropColumn => drop_incomplete_columns(table),
        MissingDataPolicy::DropRow => drop_incomplete_rows(table),
    }
}

fn drop_incomplete_columns(table: &PriceTable) -> CleanPrices {
    let mut symbols = Vec::new();
    let mut columns = Vec::new();
    let mut dropped_symbols = Vec::new();

    for (col, symbol) in table.symbols.iter().enumerate() {
        // A symbol with no observations at all is never complete, even over zero dates
        let complete: Option<Vec<f64>> = table.columns[col].iter().copied().collect();
        match complete {
            Some(values) if !values.is_empty() => {
                symbols.push(symbol.clone());
                columns.push(values);
            }
            _ => dropped_symbols.push(symbol.clone()),
        }
    }

    CleanPrices {
        dates: table.dates.clone(),
        symbols,
        columns,
        dropped_symbols,
        dropped_dates: 0,
    }
}

fn drop_incomplete_rows(table: &PriceTable) -> CleanPrices {
    let (kept, empty): (Vec<usize>, Vec<usize>) = (0..table.symbols.len())
        .partition(|&col| table.columns[col].iter().any(|v| v.is_some()));

    let rows: Vec<usize> = (0..table.row_count())
        .filter(|&row| kept.iter().all(|&col| table.columns[col][row].is_some()))
        .collect();

    let columns = kept
        .iter()
        .map(|&col| {
            rows.iter()
                .filter_map(|&row| table.columns[col][row])
                .collect()
        })
        .collect();

    CleanPrices {
        dates: rows.iter().map(|&row| table.dates[row]).collect(),
        symbols: kept.iter().map(|&col| table.symbols[col].clone()).collect(),
        columns,
        dropped_symbols: empty.iter().map(|&col| table.symbols[col].clone()).collect(),
        dropped_dates: table.row_count() - rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> RawBar {
        RawBar::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
    }

    fn sample() -> (Vec<String>, HashMap<String, Vec<RawBar>>) {
        let mut input = HashMap::new();
        input.insert(
            "SPY".to_string(),
            vec![
                bar("2024-01-02", 100.0),
                bar("2024-01-03", 101.0),
                bar("2024-01-04", 102.0),
            ],
        );
        input.insert(
            "QQQ".to_string(),
            vec![
                bar("2024-01-02", 200.0),
                // QQQ missing 2024-01-03
                bar("2024-01-04", 202.0),
            ],
        );
        (vec!["SPY".into(), "QQQ".into(), "IWM".into()], input)
    }

    #[test]
    fn align_leaves_gaps_missing() {
        let (symbols, input) = sample();
        let table = align_prices(&symbols, &input, PriceField::Close);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.symbols(), &symbols[..]);
        assert_eq!(table.value(1, 0), Some(101.0));
        assert_eq!(table.value(1, 1), None);
        assert_eq!(table.missing_count(1), 1);
        // IWM was never fetched
        assert_eq!(table.missing_count(2), 3);
    }

    #[test]
    fn adjusted_close_falls_back_to_close() {
        let mut input = HashMap::new();
        let mut adjusted = bar("2024-01-02", 100.0);
        adjusted.adj_close = Some(98.5);
        input.insert("SPY".to_string(), vec![adjusted, bar("2024-01-03", 101.0)]);

        let table = align_prices(&["SPY".to_string()], &input, PriceField::AdjustedClose);
        assert_eq!(table.value(0, 0), Some(98.5));
        assert_eq!(table.value(1, 0), Some(101.0));

        let raw = align_prices(&["SPY".to_string()], &input, PriceField::Close);
        assert_eq!(raw.value(0, 0), Some(100.0));
    }

    #[test]
    fn nan_prices_count_as_missing() {
        let mut input = HashMap::new();
        input.insert(
            "SPY".to_string(),
            vec![bar("2024-01-02", f64::NAN), bar("2024-01-03", 101.0)],
        );
        let table = align_prices(&["SPY".to_string()], &input, PriceField::Close);
        assert_eq!(table.value(0, 0), None);
    }

    #[test]
    fn drop_column_removes_any_incomplete_symbol() {
        let (symbols, input) = sample();
        let table = align_prices(&symbols, &input, PriceField::Close);
        let clean = apply_policy(&table, MissingDataPolicy::DropColumn);

        assert_eq!(clean.symbols, vec!["SPY".to_string()]);
        assert_eq!(clean.dropped_symbols, vec!["QQQ".to_string(), "IWM".to_string()]);
        assert_eq!(clean.row_count(), 3);
        assert_eq!(clean.dropped_dates, 0);
        assert_eq!(clean.columns[0], vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn drop_row_keeps_symbols_and_removes_gap_dates() {
        let (symbols, input) = sample();
        let table = align_prices(&symbols, &input, PriceField::Close);
        let clean = apply_policy(&table, MissingDataPolicy::DropRow);

        assert_eq!(clean.symbols, vec!["SPY".to_string(), "QQQ".to_string()]);
        assert_eq!(clean.dropped_symbols, vec!["IWM".to_string()]);
        assert_eq!(clean.row_count(), 2);
        assert_eq!(clean.dropped_dates, 1);
        assert_eq!(clean.columns[1], vec![200.0, 202.0]);
    }

    #[test]
    fn all_symbols_unavailable_drops_everything() {
        let symbols = vec!["X".to_string(), "Y".to_string()];
        let table = align_prices(&symbols, &HashMap::new(), PriceField::AdjustedClose);
        assert_eq!(table.row_count(), 0);

        for policy in [MissingDataPolicy::DropColumn, MissingDataPolicy::DropRow] {
            let clean = apply_policy(&table, policy);
            assert!(clean.symbols.is_empty(), "{policy:?} kept {:?}", clean.symbols);
            assert!(clean.columns.is_empty());
            assert_eq!(clean.dropped_symbols, symbols);
        }
    }

    #[test]
    fn policy_default_is_drop_column() {
        assert_eq!(MissingDataPolicy::default(), MissingDataPolicy::DropColumn);
    }
}
