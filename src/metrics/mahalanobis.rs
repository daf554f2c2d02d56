use super::error::{DomainError, ScoreError};
use crate::angle::angle_between_deg;
use crate::stats::ShapeError;
use nalgebra::{DMatrix, DVector};

/// Mahalanobis distance `sqrt((u - v)ᵀ · VI · (u - v))`.
///
/// `u` and `v` must have the same length `D` and `vi` must be `D×D`. A
/// negative quadratic form (possible when `vi` is only approximately
/// positive semi-definite) is reported as a [`DomainError`], never clamped.
/// NaN inputs are not rejected; they yield `Ok(NaN)`.
pub fn mahalanobis(u: &[f64], v: &[f64], vi: &DMatrix<f64>) -> Result<f64, ScoreError> {
    check_same_len(u, v)?;
    let (rows, cols) = vi.shape();
    if rows != cols {
        return Err(ShapeError::NonSquareInverse { rows, cols }.into());
    }
    if rows != v.len() {
        return Err(ShapeError::InverseDimensionMismatch {
            mean_len: v.len(),
            inv_dim: rows,
        }
        .into());
    }

    let delta = DVector::from_iterator(u.len(), u.iter().zip(v).map(|(a, b)| a - b));
    let m = delta.dot(&(vi * &delta));
    if m < 0.0 {
        return Err(DomainError::NegativeQuadraticForm { value: m }.into());
    }
    Ok(m.sqrt())
}

/// Angle in degrees between a sample vector and a reference vector.
pub fn angle_difference_deg(u: &[f64], v: &[f64]) -> Result<f64, ScoreError> {
    check_same_len(u, v)?;
    angle_between_deg(u, v).ok_or_else(|| DomainError::ZeroNorm.into())
}

fn check_same_len(u: &[f64], v: &[f64]) -> Result<(), ShapeError> {
    if u.len() != v.len() {
        return Err(ShapeError::SampleDimensionMismatch {
            expected: v.len(),
            found: u.len(),
        });
    }
    Ok(())
}
