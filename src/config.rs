//! Start-up configuration of a [`Filter`](crate::Filter).
//!
//! Process noise is deliberately absent: it is a tuning parameter the
//! caller must always supply.

use crate::process::RateCompensation;
use crate::quaternion;
use crate::{Quaternion, Real, Vector};

/// Initial variance of each quaternion component.
pub const INITIAL_QUATERNION_VARIANCE: Real = 1.0;
/// Initial variance of each gyro bias component, (rad/s)².
pub const INITIAL_BIAS_VARIANCE: Real = 0.1 * 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Attitude the filter starts from (and returns to on reset). Does not
    /// need to be unit norm.
    pub initial_attitude: Quaternion,
    /// Gyro bias the filter starts from, rad/s.
    pub initial_bias: Vector,
    pub quaternion_variance: Real,
    pub bias_variance: Real,
    /// Whether the bias estimate is removed from the measured rate before
    /// the quaternion is integrated.
    pub rate_compensation: RateCompensation,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            initial_attitude: quaternion::identity(),
            initial_bias: Vector::zeros(),
            quaternion_variance: INITIAL_QUATERNION_VARIANCE,
            bias_variance: INITIAL_BIAS_VARIANCE,
            rate_compensation: RateCompensation::default(),
        }
    }
}

impl FilterConfig {
    pub fn with_initial_attitude(mut self, attitude: Quaternion) -> Self {
        self.initial_attitude = attitude;
        self
    }

    pub fn with_initial_bias(mut self, bias: Vector) -> Self {
        self.initial_bias = bias;
        self
    }

    /// Diagonal of the quaternion block of the initial covariance.
    pub fn with_quaternion_variance(mut self, variance: Real) -> Self {
        self.quaternion_variance = variance;
        self
    }

    /// Diagonal of the bias block of the initial covariance.
    pub fn with_bias_variance(mut self, variance: Real) -> Self {
        self.bias_variance = variance;
        self
    }

    pub fn with_rate_compensation(mut self, compensation: RateCompensation) -> Self {
        self.rate_compensation = compensation;
        self
    }
}
