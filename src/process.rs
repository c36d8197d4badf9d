//! Process model: discrete quaternion kinematics driven by the gyro, with
//! the bias held constant (random walk, the stochastic part lives in the
//! process noise).

use nalgebra::Vector4;

use crate::error::{Error, Result};
use crate::quaternion::{self, cross_matrix};
use crate::{Matrix7, Quaternion, Real, StateVector, Vector};

/// Filter state, laid out as `[q0, q1, q2, q3, bx, by, bz]` when flattened.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// Navigation-to-body attitude, unit norm after every step.
    pub quaternion: Quaternion,
    /// Gyro bias, rad/s.
    pub bias: Vector,
}

impl Default for State {
    fn default() -> Self {
        State::new(quaternion::identity(), Vector::zeros())
    }
}

impl State {
    pub fn new(quaternion: Quaternion, bias: Vector) -> Self {
        State { quaternion, bias }
    }

    pub fn to_vector(&self) -> StateVector {
        let q = &self.quaternion;
        let b = &self.bias;
        StateVector::from_column_slice(&[q[0], q[1], q[2], q[3], b.x, b.y, b.z])
    }

    pub fn from_vector(x: &StateVector) -> Self {
        State {
            quaternion: Vector4::new(x[0], x[1], x[2], x[3]),
            bias: Vector::new(x[4], x[5], x[6]),
        }
    }
}

/// How the bias estimate enters the deterministic quaternion update.
///
/// The A matrix is the same in both cases; only the rate used for
/// integration differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateCompensation {
    /// Integrate the measured rate as is. The bias is coupled to the
    /// attitude only through the covariance.
    #[default]
    Raw,
    /// Integrate `rate - bias`.
    SubtractBias,
}

pub(crate) fn check_interval(dt: Real) -> Result<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInterval)
    }
}

pub(crate) fn check_finite(v: &Vector) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(Error::InvalidMeasurement)
    }
}

/// Advances the state by `dt` seconds given the body angular `rate` (rad/s).
///
/// First-order integration `q + dt/2 * Ξ(q) * w`, followed by the mandatory
/// renormalization. Inputs are validated before anything is computed.
pub fn propagate_state(
    state: &State,
    rate: &Vector,
    dt: Real,
    compensation: RateCompensation,
) -> Result<State> {
    check_interval(dt)?;
    check_finite(rate)?;

    let w = match compensation {
        RateCompensation::Raw => *rate,
        RateCompensation::SubtractBias => rate - state.bias,
    };
    let q = &state.quaternion;
    let q_next = q + cross_matrix(q) * w * (0.5 * dt);

    Ok(State {
        quaternion: quaternion::normalize(&q_next)?,
        bias: state.bias,
    })
}

/// State-transition Jacobian
///
/// ```text
/// | I4    -dt/2 Ξ(q) |
/// | 0     I3         |
/// ```
///
/// evaluated at the quaternion the step starts from.
pub fn transition_jacobian(q: &Quaternion, dt: Real) -> Matrix7 {
    let mut A = Matrix7::identity();
    A.fixed_view_mut::<4, 3>(0, 4)
        .copy_from(&(cross_matrix(q) * (-0.5 * dt)));
    A
}
