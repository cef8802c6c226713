//! Ordinary least-squares polynomial trend fitting.
//!
//! The normal equations `(XᵀX)a = Xᵀy` are solved with plain Gaussian
//! elimination: each row is normalised by its own diagonal entry and no pivot
//! search is performed. A diagonal entry that is exactly zero aborts the solve.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Coefficients `a₀ … a_d` of `y = Σ aᵢ·xⁱ`, lowest power first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }
}

/// Fits a polynomial of `degree` to the `(xs, ys)` pairs.
///
/// Fails with `UnderdeterminedFit` unless `1 <= degree < n` and there are more
/// distinct x values than the degree.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], degree: usize) -> AppResult<Polynomial> {
    if xs.len() != ys.len() {
        return Err(AppError::validation(format!(
            "x and y lengths differ ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }

    let samples = xs.len();
    if degree == 0 || degree >= samples {
        return Err(AppError::underdetermined_fit(degree, samples));
    }

    let distinct = count_distinct(xs);
    if degree >= distinct {
        return Err(AppError::underdetermined_fit(degree, distinct));
    }

    let design = vandermonde(xs, degree);
    let (mut normal, mut rhs) = normal_equations(&design, ys);
    let coefficients = solve_in_place(&mut normal, &mut rhs)?;

    Ok(Polynomial { coefficients })
}

/// Row `k` is `[x_k^0, x_k^1, …, x_k^degree]`.
fn vandermonde(xs: &[f64], degree: usize) -> Vec<Vec<f64>> {
    xs.iter()
        .map(|x| {
            let mut row = Vec::with_capacity(degree + 1);
            let mut power = 1.0;
            for _ in 0..=degree {
                row.push(power);
                power *= x;
            }
            row
        })
        .collect()
}

fn normal_equations(design: &[Vec<f64>], ys: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let width = design.first().map_or(0, Vec::len);
    let mut normal = vec![vec![0.0; width]; width];
    let mut rhs = vec![0.0; width];

    for (row, y) in design.iter().zip(ys) {
        for i in 0..width {
            rhs[i] += row[i] * y;
            for j in 0..width {
                normal[i][j] += row[i] * row[j];
            }
        }
    }

    (normal, rhs)
}

/// Forward elimination with per-row normalisation, then back-substitution.
fn solve_in_place(matrix: &mut [Vec<f64>], rhs: &mut [f64]) -> AppResult<Vec<f64>> {
    let size = rhs.len();

    for k in 0..size {
        let pivot = matrix[k][k];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(AppError::numerical_failure(format!(
                "zero pivot at row {k} while solving normal equations"
            )));
        }

        for j in k..size {
            matrix[k][j] /= pivot;
        }
        rhs[k] /= pivot;

        for i in (k + 1)..size {
            let factor = matrix[i][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..size {
                matrix[i][j] -= factor * matrix[k][j];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    let mut solution = vec![0.0; size];
    for k in (0..size).rev() {
        let tail: f64 = ((k + 1)..size)
            .map(|j| matrix[k][j] * solution[j])
            .sum();
        solution[k] = rhs[k] - tail;
    }

    if solution.iter().any(|value| !value.is_finite()) {
        return Err(AppError::numerical_failure(
            "least-squares solution is not finite",
        ));
    }

    Ok(solution)
}

fn count_distinct(xs: &[f64]) -> usize {
    let mut sorted: Vec<f64> = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn linear_fit_through_two_points() {
        let fit = fit_polynomial(&[0.0, 10.0], &[5.0, 10.0], 1).unwrap();
        assert_eq!(fit.degree(), 1);
        assert_close(fit.coefficients[0], 5.0);
        assert_close(fit.coefficients[1], 0.5);
        assert_close(fit.evaluate(15.0), 12.5);
    }

    #[test]
    fn quadratic_fit_recovers_exact_curve() {
        let xs: Vec<f64> = (0..6).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - 2.0 * x + 0.5 * x * x).collect();

        let fit = fit_polynomial(&xs, &ys, 2).unwrap();
        assert_close(fit.coefficients[0], 3.0);
        assert_close(fit.coefficients[1], -2.0);
        assert_close(fit.coefficients[2], 0.5);
        assert_close(fit.evaluate(8.0), 3.0 - 16.0 + 32.0);
    }

    #[test]
    fn noisy_linear_fit_matches_closed_form() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 2.0, 5.0];
        let fit = fit_polynomial(&xs, &ys, 1).unwrap();

        // slope = Σ(x-x̄)(y-ȳ) / Σ(x-x̄)² = 5.5 / 5
        assert_close(fit.coefficients[1], 1.1);
        assert_close(fit.coefficients[0], 2.75 - 1.1 * 1.5);
    }

    #[test]
    fn degree_must_be_below_sample_count() {
        let result = fit_polynomial(&[0.0, 1.0], &[1.0, 2.0], 2);
        assert!(matches!(
            result,
            Err(AppError::UnderdeterminedFit {
                degree: 2,
                samples: 2
            })
        ));

        let zero = fit_polynomial(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], 0);
        assert!(matches!(zero, Err(AppError::UnderdeterminedFit { .. })));
    }

    #[test]
    fn repeated_x_values_cannot_support_the_degree() {
        let result = fit_polynomial(&[0.0, 0.0, 5.0], &[1.0, 2.0, 3.0], 2);
        assert!(matches!(
            result,
            Err(AppError::UnderdeterminedFit { samples: 2, .. })
        ));
    }

    #[test]
    fn zero_pivot_is_reported() {
        let mut matrix = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let mut rhs = vec![1.0, 1.0];
        let result = solve_in_place(&mut matrix, &mut rhs);
        assert!(matches!(result, Err(AppError::NumericalFailure { .. })));
    }

    #[test]
    fn fitting_is_deterministic() {
        let xs = [0.0, 2.0, 3.0, 7.0, 9.0];
        let ys = [4.0, 6.0, 5.0, 9.0, 12.0];
        let first = fit_polynomial(&xs, &ys, 2).unwrap();
        let second = fit_polynomial(&xs, &ys, 2).unwrap();
        assert_eq!(first, second);
    }
}
