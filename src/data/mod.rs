//! Data loading for SVM training

pub mod delimited;

pub use self::delimited::DenseDataset;
