use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples every entry from N(0, std_dev²).
    ///
    /// Used with `std_dev = 1.0` for biases and `std_dev = 1/sqrt(fan_in)`
    /// for weights, so pre-activation magnitudes do not grow with the width
    /// of the preceding layer.
    pub fn gaussian<R: Rng>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// A column vector of shape (values.len(), 1).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_data(values.iter().map(|&x| vec![x]).collect())
    }

    /// Flattens a single-column matrix back into a Vec.
    pub fn into_column(self) -> Vec<f64> {
        debug_assert_eq!(self.cols, 1);
        self.data.into_iter().map(|row| row[0]).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            (self.data)
                .clone()
                .into_iter()
                .map(|row| row.into_iter().map(|x| functor(x)).collect())
                .collect()
        )
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows);
        assert_eq!(self.cols, rhs.cols);
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix::from_data(data)
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data[0].len(),
            data
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}
