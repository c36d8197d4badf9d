//! Correction with a vector observation (gravity from the accelerometer,
//! field direction from the magnetometer, ...). Which sensor is fed in, and
//! when, is left to the caller.

use nalgebra::Matrix3;

use crate::covariance::{check_conditioning, symmetrize};
use crate::error::{Error, Result};
use crate::measurement::linearize_measurement;
use crate::process::{check_finite, State};
use crate::quaternion;
use crate::{Matrix7, Real, Vector};

/// Standard EKF update against an `observed` body-frame vector whose
/// navigation-frame counterpart is `reference`.
///
/// `measurement_noise` is the 3×3 covariance `R` of the observation. The
/// covariance is updated in Joseph form and the quaternion renormalized.
/// Non-finite `observed`, `reference` or `measurement_noise` is rejected
/// with [`Error::InvalidMeasurement`] before anything is computed. On any
/// error the inputs are left as they were.
pub fn correct(
    state: &State,
    covariance: &Matrix7,
    observed: &Vector,
    reference: &Vector,
    measurement_noise: &Matrix3<Real>,
) -> Result<(State, Matrix7)> {
    check_finite(observed)?;
    check_finite(reference)?;
    if !measurement_noise.iter().all(|v| v.is_finite()) {
        return Err(Error::InvalidMeasurement);
    }

    let lin = linearize_measurement(&state.quaternion, reference)?;
    let H = lin.full_jacobian();
    let PHt = covariance * H.transpose();
    let S = H * PHt + measurement_noise;
    let S_inv = S.try_inverse().ok_or(Error::SingularInnovation)?;
    let K = PHt * S_inv;

    let innovation = observed - lin.predicted;
    let corrected = State::from_vector(&(state.to_vector() + K * innovation));

    let I_KH = Matrix7::identity() - K * H;
    let P = symmetrize(
        &(I_KH * covariance * I_KH.transpose() + K * measurement_noise * K.transpose()),
    );
    check_conditioning(&P)?;

    Ok((
        State {
            quaternion: quaternion::normalize(&corrected.quaternion)?,
            bias: corrected.bias,
        },
        P,
    ))
}
