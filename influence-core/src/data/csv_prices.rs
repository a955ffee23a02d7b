//! Wide CSV price files.
//!
//! Layout: a `date` column (YYYY-MM-DD) followed by one column per symbol.
//! An empty cell means "no observation". This is the same shape as the
//! normalized `PriceTable`, so a downloaded table can be fed back offline.

use super::normalize::PriceTable;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

/// Offline provider backed by a wide CSV file loaded into memory.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    series: HashMap<String, Vec<RawBar>>,
}

impl CsvPriceProvider {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path)
            .map_err(|e| DataError::CsvImport(format!("open {}: {e}", path.display())))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| DataError::CsvImport(format!("read header: {e}")))?
            .clone();
        if headers.is_empty() || !headers[0].eq_ignore_ascii_case("date") {
            return Err(DataError::CsvImport(
                "first column must be 'date'".into(),
            ));
        }
        let symbols: Vec<String> = headers.iter().skip(1).map(|s| s.trim().to_string()).collect();

        let mut series: HashMap<String, Vec<RawBar>> =
            symbols.iter().map(|s| (s.clone(), Vec::new())).collect();

        for (line, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| DataError::CsvImport(format!("row {}: {e}", line + 2)))?;
            let date = NaiveDate::parse_from_str(record.get(0).unwrap_or("").trim(), "%Y-%m-%d")
                .map_err(|e| DataError::CsvImport(format!("row {}: bad date: {e}", line + 2)))?;

            for (col, symbol) in symbols.iter().enumerate() {
                let cell = record.get(col + 1).unwrap_or("").trim();
                if cell.is_empty() {
                    continue;
                }
                let close: f64 = cell.parse().map_err(|e| {
                    DataError::CsvImport(format!("row {}: bad price for {symbol}: {e}", line + 2))
                })?;
                if let Some(bars) = series.get_mut(symbol) {
                    bars.push(RawBar::new(date, close));
                }
            }
        }

        for bars in series.values_mut() {
            bars.sort_by_key(|b| b.date);
        }

        Ok(Self { series })
    }

    /// Symbols present in the file (header order is not preserved).
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.series.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl DataProvider for CsvPriceProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars: Vec<RawBar> = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}

/// Write a price table in the wide CSV layout read by `CsvPriceProvider`.
pub fn write_price_csv<W: Write>(table: &PriceTable, writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| DataError::CsvImport(format!("write: {e}"));

    let mut header = vec!["date".to_string()];
    header.extend(table.symbols().iter().cloned());
    wtr.write_record(&header).map_err(csv_err)?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for col in 0..table.symbols().len() {
            record.push(match table.value(row, col) {
                Some(v) => format!("{v}"),
                None => String::new(),
            });
        }
        wtr.write_record(&record).map_err(csv_err)?;
    }

    wtr.flush()
        .map_err(|e| DataError::CsvImport(format!("flush: {e}")))
}
