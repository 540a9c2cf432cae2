// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use eet_core::EetError;

const PIVOT_EPSILON: f64 = 1e-14;

/// Ordinary least-squares solution for a small design matrix (p ≤ 3).
#[derive(Clone, Debug)]
pub struct LeastSquares {
    /// Fitted parameters, one per design column.
    pub params: Vec<f64>,
    /// Standard errors of the parameters; infinite when `n <= p`.
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals.
    pub sse: f64,
}

impl LeastSquares {
    /// t-statistic of parameter `j`; zero-valued standard errors yield
    /// infinity so degenerate columns never pass a significance test
    /// silently.
    pub fn t_statistic(&self, j: usize) -> f64 {
        if self.std_errors[j].is_finite() && self.std_errors[j] > 0.0 {
            self.params[j] / self.std_errors[j]
        } else if self.std_errors[j].is_infinite() {
            0.0
        } else if self.params[j] == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(self.params[j])
        }
    }
}

/// Solves `min ||y - X b||²` by normal equations with a Gauss-Jordan
/// inverse, sized for the at-most-three columns a change-point shape needs.
///
/// Fails with a numerical-issue error when `X'X` is singular, which happens
/// when a hinge column is identically zero (change point outside the data).
pub fn least_squares(columns: &[&[f64]], y: &[f64]) -> Result<LeastSquares, EetError> {
    let p = columns.len();
    let n = y.len();
    debug_assert!(p >= 1 && p <= 3);
    debug_assert!(columns.iter().all(|col| col.len() == n));

    // Normal equations X'X b = X'y.
    let mut xtx = vec![vec![0.0_f64; p]; p];
    let mut xty = vec![0.0_f64; p];
    for i in 0..p {
        for j in 0..p {
            xtx[i][j] = dot(columns[i], columns[j]);
        }
        xty[i] = dot(columns[i], y);
    }

    let inverse = invert(&xtx)?;

    let mut params = vec![0.0_f64; p];
    for i in 0..p {
        for j in 0..p {
            params[i] += inverse[i][j] * xty[j];
        }
    }

    let mut sse = 0.0;
    for k in 0..n {
        let mut predicted = 0.0;
        for i in 0..p {
            predicted += params[i] * columns[i][k];
        }
        let residual = y[k] - predicted;
        sse += residual * residual;
    }

    let std_errors = if n > p {
        let sigma_squared = sse / (n - p) as f64;
        (0..p)
            .map(|i| (sigma_squared * inverse[i][i]).max(0.0).sqrt())
            .collect()
    } else {
        vec![f64::INFINITY; p]
    };

    Ok(LeastSquares {
        params,
        std_errors,
        sse,
    })
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Gauss-Jordan inverse with partial pivoting.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, EetError> {
    let p = matrix.len();
    let mut augmented: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut extended = row.clone();
            extended.extend((0..p).map(|j| if i == j { 1.0 } else { 0.0 }));
            extended
        })
        .collect();

    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|a, b| augmented[*a][col].abs().total_cmp(&augmented[*b][col].abs()))
            .ok_or_else(|| EetError::numerical_issue("empty system"))?;
        if augmented[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(EetError::numerical_issue(
                "singular normal equations: a design column is degenerate",
            ));
        }
        augmented.swap(col, pivot_row);

        let pivot = augmented[col][col];
        for value in augmented[col].iter_mut() {
            *value /= pivot;
        }
        for row in 0..p {
            if row == col {
                continue;
            }
            let factor = augmented[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * p {
                augmented[row][j] -= factor * augmented[col][j];
            }
        }
    }

    Ok(augmented.into_iter().map(|row| row[p..].to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::least_squares;

    #[test]
    fn recovers_an_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ones = [1.0; 5];
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let fit = least_squares(&[&ones, &x], &y).expect("line should fit");
        assert!((fit.params[0] - 2.0).abs() < 1e-10);
        assert!((fit.params[1] - 3.0).abs() < 1e-10);
        assert!(fit.sse < 1e-18);
    }

    #[test]
    fn intercept_only_fit_recovers_the_mean() {
        let ones = [1.0; 4];
        let y = [1.0, 2.0, 3.0, 4.0];
        let fit = least_squares(&[&ones], &y).expect("mean should fit");
        assert!((fit.params[0] - 2.5).abs() < 1e-12);
        assert!((fit.sse - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_column_is_singular() {
        let ones = [1.0; 4];
        let zero = [0.0; 4];
        let y = [1.0, 2.0, 3.0, 4.0];
        let err = least_squares(&[&ones, &zero], &y).expect_err("zero column must fail");
        assert!(err.to_string().contains("singular"));
    }

    #[test]
    fn noisy_slope_has_a_large_t_statistic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let ones = [1.0; 8];
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 0.5 * v + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let fit = least_squares(&[&ones, &x], &y).expect("fit should succeed");
        assert!(fit.t_statistic(1) > 10.0);
    }

    #[test]
    fn saturated_fit_reports_infinite_standard_errors() {
        let ones = [1.0, 1.0];
        let x = [1.0, 2.0];
        let y = [1.0, 3.0];
        let fit = least_squares(&[&ones, &x], &y).expect("saturated fit solves");
        assert!(fit.std_errors.iter().all(|se| se.is_infinite()));
    }
}
