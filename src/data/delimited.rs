//! Delimited text dataset implementation
//!
//! Supports loading datasets from text files where:
//! - Fields are separated by tabs, commas or spaces
//! - The last column is the label
//! - All other columns are features
//! - Blank lines and lines starting with '#' are ignored
//! - A non-numeric first row is treated as a header

use crate::core::{Result, SVMError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dense feature matrix with a parallel label vector
#[derive(Debug, Clone)]
pub struct DenseDataset {
    features: Array2<f64>,
    labels: Array1<f64>,
}

impl DenseDataset {
    /// Pair a feature matrix with its labels
    ///
    /// Only the shapes are checked here; label values are validated when
    /// training starts.
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(SVMError::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Load a dataset from a delimited text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        let mut width: Option<usize> = None;
        let mut seen_first_row = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = split_fields(line).collect();
            let parsed: std::result::Result<Vec<f64>, _> =
                fields.iter().map(|field| field.parse::<f64>()).collect();

            let row = match parsed {
                Ok(row) => row,
                Err(_) if !seen_first_row => {
                    // Header line
                    seen_first_row = true;
                    continue;
                }
                Err(e) => {
                    return Err(SVMError::ParseError(format!(
                        "line {}: {e} in '{line}'",
                        line_no + 1
                    )))
                }
            };
            seen_first_row = true;

            if row.len() < 2 {
                return Err(SVMError::ParseError(format!(
                    "line {}: expected at least one feature and a label",
                    line_no + 1
                )));
            }
            match width {
                Some(w) if w != row.len() => {
                    return Err(SVMError::ParseError(format!(
                        "line {}: expected {w} fields, found {}",
                        line_no + 1,
                        row.len()
                    )))
                }
                _ => width = Some(row.len()),
            }

            let (features, label) = row.split_at(row.len() - 1);
            values.extend_from_slice(features);
            labels.push(label[0]);
        }

        let Some(width) = width else {
            return Err(SVMError::EmptyDataset);
        };

        let features = Array2::from_shape_vec((labels.len(), width - 1), values)
            .map_err(|e| SVMError::ParseError(e.to_string()))?;
        Self::new(features, Array1::from(labels))
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, f64> {
        self.labels.view()
    }

    /// Feature vector of example `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.features.row(i)
    }

    /// Number of samples in the dataset
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Number of features (dimensionality)
    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Keep only the listed examples, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}
