//! Precomputed kernel matrix
//!
//! SMO touches K(i, j) for the same training pairs over and over. The whole
//! N×N matrix is filled once per training run so the hot loop only indexes.

use crate::kernel::Kernel;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Square matrix with entry (i, j) = K(x_i, x_j)
#[derive(Debug, Clone)]
pub struct KernelMatrix {
    values: Array2<f64>,
}

impl KernelMatrix {
    /// Fill the matrix with one kernel evaluation per row of `data`.
    pub fn new<K: Kernel + ?Sized>(kernel: &K, data: ArrayView2<f64>) -> Self {
        let n = data.nrows();
        let mut values = Array2::zeros((n, n));
        for (i, row) in data.rows().into_iter().enumerate() {
            values.column_mut(i).assign(&kernel.evaluate(data, row));
        }
        Self { values }
    }

    /// Number of examples (rows and columns)
    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    /// K(x_i, x_j)
    ///
    /// # Panics
    /// Panics if either index is >= size()
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// Column i, i.e. K(x_k, x_i) for every k
    pub fn column(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.column(i)
    }

    pub fn diagonal(&self) -> ArrayView1<'_, f64> {
        self.values.diag()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{KernelSpec, LinearKernel};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn data() -> Array2<f64> {
        array![[1.0, 2.0], [-0.5, 3.0], [2.0, -1.0], [0.0, 0.0]]
    }

    #[test]
    fn test_linear_matrix_entries() {
        let x = data();
        let matrix = KernelMatrix::new(&LinearKernel::new(), x.view());

        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.get(0, 1), 1.0 * -0.5 + 2.0 * 3.0);
        assert_eq!(matrix.get(2, 3), 0.0);
    }

    #[test]
    fn test_linear_diagonal_is_squared_norm() {
        let x = data();
        let matrix = KernelMatrix::new(&KernelSpec::Linear, x.view());

        for (i, row) in x.rows().into_iter().enumerate() {
            assert_abs_diff_eq!(matrix.diagonal()[i], row.dot(&row), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_matrix_symmetry() {
        let x = data();
        for kernel in [KernelSpec::Linear, KernelSpec::GaussianRbf { bandwidth: 0.8 }] {
            let matrix = KernelMatrix::new(&kernel, x.view());
            for i in 0..matrix.size() {
                for j in 0..matrix.size() {
                    assert_abs_diff_eq!(matrix.get(i, j), matrix.get(j, i), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_rbf_diagonal_is_one() {
        let x = data();
        let matrix = KernelMatrix::new(&KernelSpec::GaussianRbf { bandwidth: 2.0 }, x.view());
        for &value in matrix.diagonal() {
            assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_column_matches_entries() {
        let x = data();
        let matrix = KernelMatrix::new(&KernelSpec::Linear, x.view());
        let column = matrix.column(2);
        for k in 0..matrix.size() {
            assert_eq!(column[k], matrix.get(k, 2));
        }
        assert_eq!(matrix.view().dim(), (4, 4));
    }
}
