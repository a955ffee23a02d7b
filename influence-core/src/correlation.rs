//! Pairwise Pearson correlation of aligned return series.

use crate::error::AnalysisError;
use crate::returns::ReturnTable;

/// Symmetric correlation matrix with a unit diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    /// Row-major `n * n`.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Compute every pairwise correlation once and mirror it, so
    /// `get(i, j) == get(j, i)` holds bit-for-bit.
    pub fn from_returns(returns: &ReturnTable) -> Result<Self, AnalysisError> {
        let n = returns.symbol_count();
        if n == 0 {
            return Err(AnalysisError::EmptyUniverse);
        }
        if returns.row_count() < 2 {
            return Err(AnalysisError::InsufficientData {
                needed: 2,
                got: returns.row_count(),
            });
        }

        let centered: Vec<(Vec<f64>, f64)> = returns
            .symbols
            .iter()
            .zip(&returns.columns)
            .map(|(symbol, col)| {
                let mean = col.iter().sum::<f64>() / col.len() as f64;
                let dev: Vec<f64> = col.iter().map(|x| x - mean).collect();
                let norm = dev.iter().map(|d| d * d).sum::<f64>().sqrt();
                if norm == 0.0 || !norm.is_finite() {
                    return Err(AnalysisError::UndefinedCorrelation {
                        symbol: symbol.clone(),
                    });
                }
                Ok((dev, norm))
            })
            .collect::<Result<_, _>>()?;

        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let (di, ni) = &centered[i];
                let (dj, nj) = &centered[j];
                let cov: f64 = di.iter().zip(dj).map(|(a, b)| a * b).sum();
                let r = (cov / (ni * nj)).clamp(-1.0, 1.0);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        Ok(Self {
            symbols: returns.symbols.clone(),
            values,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    /// Correlation by symbol name.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.get(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(symbols: &[&str], columns: Vec<Vec<f64>>) -> ReturnTable {
        let n = columns[0].len();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        ReturnTable {
            dates: (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            columns,
        }
    }

    #[test]
    fn identical_series_correlate_perfectly() {
        let r = vec![0.01, -0.02, 0.03, 0.0, 0.015];
        let m = CorrelationMatrix::from_returns(&table(&["A", "B"], vec![r.clone(), r])).unwrap();
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mirrored_series_correlate_negatively() {
        let a = vec![0.01, -0.02, 0.03, 0.0];
        let b: Vec<f64> = a.iter().map(|x| -x).collect();
        let m = CorrelationMatrix::from_returns(&table(&["A", "B"], vec![a, b])).unwrap();
        assert!((m.get(0, 1) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_value() {
        // Deviations (-1, 0, 1) and (-1, 1, 0): 1 / (sqrt(2) * sqrt(2))
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 3.0, 2.0];
        let m = CorrelationMatrix::from_returns(&table(&["A", "B"], vec![a, b])).unwrap();
        assert!((m.get(0, 1) - 0.5).abs() < 1e-12);
        assert_eq!(m.between("B", "A"), Some(m.get(0, 1)));
    }

    #[test]
    fn diagonal_is_one_and_matrix_symmetric() {
        let m = CorrelationMatrix::from_returns(&table(
            &["A", "B", "C"],
            vec![
                vec![0.01, 0.02, -0.01, 0.03],
                vec![0.02, -0.01, 0.00, 0.01],
                vec![-0.03, 0.01, 0.02, 0.00],
            ],
        ))
        .unwrap();

        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn constant_series_is_undefined() {
        let err = CorrelationMatrix::from_returns(&table(
            &["A", "FLAT"],
            vec![vec![0.01, 0.02, -0.01], vec![0.0, 0.0, 0.0]],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UndefinedCorrelation {
                symbol: "FLAT".into()
            }
        );
    }
}
