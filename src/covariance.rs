//! Covariance propagation `P' = A P Aᵀ + Q` with the numerical checks a
//! long-running filter needs.

use nalgebra::SVector;

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::math;
use crate::{Matrix7, Real};

/// Relative slack allowed on the Cauchy-Schwarz bound `|Pij| <= sqrt(Pii Pjj)`.
pub const CONDITIONING_TOLERANCE: Real = 1e-3;

/// Diagonal process noise with one variance for the quaternion block and
/// one for the bias block.
pub fn diagonal_process_noise(quaternion_variance: Real, bias_variance: Real) -> Matrix7 {
    let v = quaternion_variance;
    let b = bias_variance;
    Matrix7::from_diagonal(&SVector::<Real, 7>::from_column_slice(&[v, v, v, v, b, b, b]))
}

pub fn initial_covariance(config: &FilterConfig) -> Matrix7 {
    diagonal_process_noise(config.quaternion_variance, config.bias_variance)
}

/// `(P + Pᵀ) / 2`
pub fn symmetrize(P: &Matrix7) -> Matrix7 {
    (P + P.transpose()) * 0.5
}

/// Cheap necessary conditions for a finite, symmetric, positive
/// semi-definite matrix: finite entries, symmetry, a non-negative
/// diagonal and every off-diagonal entry within the Cauchy-Schwarz bound.
pub fn check_conditioning(P: &Matrix7) -> Result<()> {
    if P.iter().any(|v| !v.is_finite()) {
        return Err(Error::CovarianceIllConditioned);
    }
    for i in 0..7 {
        if P[(i, i)] < 0.0 {
            return Err(Error::CovarianceIllConditioned);
        }
    }
    for i in 0..7 {
        for j in (i + 1)..7 {
            let bound = math::sqrt(P[(i, i)] * P[(j, j)]);
            let slack = CONDITIONING_TOLERANCE * bound + Real::EPSILON;
            if math::abs(P[(i, j)] - P[(j, i)]) > slack || math::abs(P[(i, j)]) > bound + slack {
                return Err(Error::CovarianceIllConditioned);
            }
        }
    }
    Ok(())
}

/// `A P Aᵀ + Q`, symmetrized and checked.
pub fn propagate_covariance(P: &Matrix7, A: &Matrix7, Q: &Matrix7) -> Result<Matrix7> {
    let P_next = symmetrize(&(A * P * A.transpose() + Q));
    check_conditioning(&P_next)?;
    Ok(P_next)
}
