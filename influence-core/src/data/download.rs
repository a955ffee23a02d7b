//! Universe fetch: coordinates per-symbol fetches with progress reporting.

use super::provider::{DataError, DataProvider, DataSource, DownloadProgress, RawBar};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Bars fetched for a universe, plus the symbols the provider had no data for.
#[derive(Debug, Clone)]
pub struct FetchedUniverse {
    /// Name of the provider the bars came from.
    pub provider: String,
    /// Requested symbols, in request order.
    pub symbols: Vec<String>,
    pub bars: HashMap<String, Vec<RawBar>>,
    pub sources: HashMap<String, DataSource>,
    /// Symbols reported as not found. They stay in `symbols` and surface as
    /// all-missing columns after alignment.
    pub unavailable: Vec<String>,
}

/// Fetch every symbol in order.
///
/// `SymbolNotFound` is recorded and the batch continues; any other error
/// aborts the whole fetch.
pub fn fetch_universe(
    provider: &dyn DataProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn DownloadProgress,
) -> Result<FetchedUniverse, DataError> {
    let total = symbols.len();
    let mut bars = HashMap::new();
    let mut sources = HashMap::new();
    let mut unavailable = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        match provider.fetch(symbol, start, end) {
            Ok(fetched) => {
                progress.on_complete(symbol, i, total, &Ok(()));
                sources.insert(symbol.clone(), fetched.source);
                bars.insert(symbol.clone(), fetched.bars);
            }
            Err(e) if e.is_symbol_scoped() => {
                let result = Err(e);
                progress.on_complete(symbol, i, total, &result);
                unavailable.push(symbol.clone());
            }
            Err(e) => {
                // The error is handed back to the caller, so report a copy of its message
                progress.on_complete(symbol, i, total, &Err(DataError::Other(e.to_string())));
                return Err(e);
            }
        }
    }

    progress.on_batch_complete(total - unavailable.len(), unavailable.len(), total);

    Ok(FetchedUniverse {
        provider: provider.name().to_string(),
        symbols: symbols.to_vec(),
        bars,
        sources,
        unavailable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{FetchResult, NoProgress};
    use std::cell::RefCell;

    struct FakeProvider {
        fail_with_network: bool,
        calls: RefCell<Vec<String>>,
    }

    impl DataProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            self.calls.borrow_mut().push(symbol.to_string());
            match symbol {
                "GONE" => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
                "DOWN" if self.fail_with_network => {
                    Err(DataError::NetworkUnreachable("connection refused".into()))
                }
                _ => Ok(FetchResult {
                    symbol: symbol.to_string(),
                    bars: vec![RawBar::new(start, 10.0)],
                    source: DataSource::Synthetic,
                }),
            }
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn not_found_symbols_are_recorded_not_fatal() {
        let provider = FakeProvider {
            fail_with_network: false,
            calls: RefCell::new(Vec::new()),
        };
        let fetched = fetch_universe(
            &provider,
            &symbols(&["AAPL", "GONE", "MSFT"]),
            day(),
            day(),
            &NoProgress,
        )
        .unwrap();

        assert_eq!(fetched.symbols.len(), 3);
        assert_eq!(fetched.unavailable, vec!["GONE".to_string()]);
        assert!(fetched.bars.contains_key("AAPL"));
        assert!(fetched.bars.contains_key("MSFT"));
        assert_eq!(fetched.sources["AAPL"], DataSource::Synthetic);
        assert_eq!(fetched.provider, "fake");
    }

    #[test]
    fn network_failure_aborts_the_batch() {
        let provider = FakeProvider {
            fail_with_network: true,
            calls: RefCell::new(Vec::new()),
        };
        let err = fetch_universe(
            &provider,
            &symbols(&["AAPL", "DOWN", "MSFT"]),
            day(),
            day(),
            &NoProgress,
        )
        .unwrap_err();

        assert!(matches!(err, DataError::NetworkUnreachable(_)));
        // MSFT is never requested
        assert_eq!(*provider.calls.borrow(), symbols(&["AAPL", "DOWN"]));
    }
}
