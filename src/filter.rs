use log::{debug, trace, warn};
use nalgebra::Matrix3;

use crate::config::FilterConfig;
use crate::covariance::{check_conditioning, initial_covariance, propagate_covariance};
use crate::error::{Error, Result};
use crate::process::{propagate_state, transition_jacobian, RateCompensation, State};
use crate::quaternion::{self, TaitBryanAngles};
use crate::update::correct;
use crate::{Matrix7, Quaternion, Real, Vector};

/// One prediction step: new state and covariance after `dt` seconds of
/// rotation at `angular_rate` (rad/s, body frame).
///
/// Nothing is modified in place; on error the caller keeps its previous
/// state and covariance.
pub fn predict(
    state: &State,
    covariance: &Matrix7,
    angular_rate: &Vector,
    dt: Real,
    process_noise: &Matrix7,
    compensation: RateCompensation,
) -> Result<(State, Matrix7)> {
    let next = propagate_state(state, angular_rate, dt, compensation)?;
    let A = transition_jacobian(&state.quaternion, dt);
    let P = propagate_covariance(covariance, &A, process_noise)?;
    Ok((next, P))
}

/// Quaternion EKF with online gyro bias estimation.
///
/// Call [`predict`](Filter::predict) for every gyro sample and
/// [`update`](Filter::update) whenever a vector observation is available.
/// Each instance owns its state; clone it to run independent filters from
/// the same starting point.
#[derive(Debug, Clone)]
pub struct Filter {
    state: State,
    covariance: Matrix7,
    process_noise: Matrix7,
    initial_state: State,
    config: FilterConfig,
}

impl Filter {
    /// New filter starting from `config`. `process_noise` is the Q matrix
    /// added on every prediction; there is no default for it.
    pub fn new(process_noise: Matrix7, config: FilterConfig) -> Result<Self> {
        check_conditioning(&process_noise)?;
        let initial_state = State::new(
            quaternion::normalize(&config.initial_attitude)?,
            config.initial_bias,
        );
        let covariance = initial_covariance(&config);
        check_conditioning(&covariance)?;
        Ok(Filter {
            state: initial_state,
            covariance,
            process_noise,
            initial_state,
            config,
        })
    }

    /// New filter with default configuration starting at `attitude`.
    pub fn with_attitude(process_noise: Matrix7, attitude: Quaternion) -> Result<Self> {
        Filter::new(
            process_noise,
            FilterConfig::default().with_initial_attitude(attitude),
        )
    }

    /// Propagates the estimate by `dt` seconds using the gyro `rate`.
    ///
    /// Rejected input (`InvalidInterval`, `InvalidMeasurement`) leaves the
    /// filter untouched, so the caller can simply skip the sample. If the
    /// propagated covariance is ill-conditioned the state is kept, the
    /// covariance is reinitialized from the configuration and
    /// `CovarianceIllConditioned` is returned.
    pub fn predict(&mut self, rate: &Vector, dt: Real) -> Result<&State> {
        let result = predict(
            &self.state,
            &self.covariance,
            rate,
            dt,
            &self.process_noise,
            self.config.rate_compensation,
        );
        match result {
            Ok((state, covariance)) => {
                self.state = state;
                self.covariance = covariance;
                trace!("predict dt={} q={:?}", dt, self.state.quaternion);
                Ok(&self.state)
            }
            Err(e) => Err(self.recover("predict", e)),
        }
    }

    /// Corrects the estimate with `observed`, the body-frame measurement of
    /// the navigation-frame `reference` direction, with noise covariance
    /// `measurement_noise`. Error handling follows [`Filter::predict`].
    pub fn update(
        &mut self,
        observed: &Vector,
        reference: &Vector,
        measurement_noise: &Matrix3<Real>,
    ) -> Result<&State> {
        match correct(
            &self.state,
            &self.covariance,
            observed,
            reference,
            measurement_noise,
        ) {
            Ok((state, covariance)) => {
                self.state = state;
                self.covariance = covariance;
                trace!("update q={:?} b={:?}", self.state.quaternion, self.state.bias);
                Ok(&self.state)
            }
            Err(e) => Err(self.recover("update", e)),
        }
    }

    fn recover(&mut self, step: &str, e: Error) -> Error {
        if e == Error::CovarianceIllConditioned {
            warn!("{}: {}, reinitializing covariance", step, e);
            self.covariance = initial_covariance(&self.config);
        } else {
            warn!("{}: {}", step, e);
        }
        e
    }

    /// Back to the configured initial attitude, bias and covariance. This is
    /// the way out of `DegenerateQuaternion`.
    pub fn reset(&mut self) {
        debug!("filter reset");
        self.state = self.initial_state;
        self.covariance = initial_covariance(&self.config);
    }

    /// Replaces Q, e.g. after retuning in flight.
    pub fn set_process_noise(&mut self, process_noise: Matrix7) -> Result<()> {
        check_conditioning(&process_noise)?;
        self.process_noise = process_noise;
        Ok(())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn quaternion(&self) -> &Quaternion {
        &self.state.quaternion
    }

    pub fn bias(&self) -> &Vector {
        &self.state.bias
    }

    pub fn covariance(&self) -> &Matrix7 {
        &self.covariance
    }

    pub fn process_noise(&self) -> &Matrix7 {
        &self.process_noise
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Returns all moments (yaw, pitch, roll)
    pub fn to_euler_angles(&self) -> TaitBryanAngles {
        TaitBryanAngles::from_unit_quaternion(&self.state.quaternion)
    }

    /// Yaw
    pub fn yaw(&self) -> Real {
        self.to_euler_angles().yaw
    }

    /// Pitch
    pub fn pitch(&self) -> Real {
        self.to_euler_angles().pitch
    }

    /// Roll
    pub fn roll(&self) -> Real {
        self.to_euler_angles().roll
    }
}
