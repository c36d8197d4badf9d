use core::fmt;

/// Every way a filter operation can refuse to produce a result.
///
/// None of these are retried inside the crate. Operations that return an
/// error leave the caller's state and covariance exactly as they were,
/// with the single exception documented on
/// [`Filter::predict`](crate::Filter::predict).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The time step was zero, negative or not finite.
    InvalidInterval,
    /// A sensor sample (angular rate or observed vector) had a non-finite
    /// component. Skip the cycle and keep the previous estimate.
    InvalidMeasurement,
    /// The quaternion norm was zero or not finite. The filter has diverged
    /// and should be reinitialized; there is no sound automatic recovery.
    DegenerateQuaternion,
    /// The covariance lost symmetry, went non-finite, or failed the
    /// positive-semi-definite check after propagation or correction.
    CovarianceIllConditioned,
    /// The innovation covariance of a correction step could not be inverted.
    SingularInnovation,
}

/// Helper definition to make it easier to work with errors
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidInterval => "time step must be finite and positive",
            Error::InvalidMeasurement => "measurement contains a non-finite component",
            Error::DegenerateQuaternion => "quaternion norm is zero or not finite",
            Error::CovarianceIllConditioned => "covariance is not a finite symmetric PSD matrix",
            Error::SingularInnovation => "innovation covariance is singular",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
