//! no_std quaternion Extended Kalman Filter with online gyroscope bias
//! estimation, for attitude and heading reference systems.
//!
//! The state is the attitude quaternion `[q0, q1, q2, q3]` (navigation to
//! body frame) followed by the gyro bias `[bx, by, bz]`. Every gyro sample
//! drives a prediction step: first-order quaternion kinematics, mandatory
//! renormalization, and `P' = A P Aᵀ + Q`. Vector observations (gravity,
//! magnetic north) are linearized around the current attitude with an
//! analytic Jacobian and fed to a standard EKF correction.
//!
//! All arithmetic is on fixed-size `nalgebra` matrices; scalars are `f32`
//! unless the `f64` feature is enabled.
//!
//! # Usage
//! ```
//! use ahrs_ekf::covariance::diagonal_process_noise;
//! use ahrs_ekf::nalgebra::Matrix3;
//! use ahrs_ekf::{Filter, FilterConfig, Vector};
//!
//! // Q is a tuning parameter and has no default:
//! let mut filter = Filter::new(diagonal_process_noise(1e-6, 1e-10), FilterConfig::default())?;
//! // gyro in rad/s, dt in seconds:
//! filter.predict(&Vector::new(0.0, 0.0, 0.1), 0.01)?;
//! // accelerometer (normalized) against gravity:
//! let gravity = Vector::new(0.0, 0.0, 1.0);
//! filter.update(&gravity, &gravity, &Matrix3::from_diagonal_element(0.05))?;
//! let angles = filter.to_euler_angles();
//! assert!(angles.yaw > 0.0);
//! # Ok::<(), ahrs_ekf::Error>(())
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(non_snake_case)]
#![deny(warnings)]

pub use nalgebra;

use nalgebra::{SMatrix, SVector, Vector3, Vector4};

pub mod config;
pub mod covariance;
mod error;
pub mod filter;
mod math;
pub mod measurement;
pub mod process;
pub mod quaternion;
pub mod update;

/// Scalar used throughout the filter.
#[cfg(not(feature = "f64"))]
pub type Real = f32;
/// Scalar used throughout the filter.
#[cfg(feature = "f64")]
pub type Real = f64;

/// `[q0, q1, q2, q3]`, scalar part first.
pub type Quaternion = Vector4<Real>;
pub type Vector = Vector3<Real>;
/// `[q0, q1, q2, q3, bx, by, bz]`
pub type StateVector = SVector<Real, 7>;
pub type Matrix7 = SMatrix<Real, 7, 7>;

pub use config::FilterConfig;
pub use error::{Error, Result};
pub use filter::{predict, Filter};
pub use measurement::{linearize_measurement, Linearization};
pub use process::{RateCompensation, State};
pub use quaternion::{normalize as normalize_quaternion, TaitBryanAngles};
pub use update::correct;
