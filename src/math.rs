//! Scalar functions routed through `libm` so the crate stays `no_std`.

use crate::Real;

#[cfg(not(feature = "f64"))]
mod imp {
    use super::Real;

    #[inline]
    pub fn sqrt(x: Real) -> Real {
        libm::sqrtf(x)
    }

    #[inline]
    pub fn abs(x: Real) -> Real {
        libm::fabsf(x)
    }

    #[inline]
    pub fn atan2(y: Real, x: Real) -> Real {
        libm::atan2f(y, x)
    }

    #[inline]
    pub fn asin(x: Real) -> Real {
        libm::asinf(x)
    }

    #[inline]
    pub fn sin(x: Real) -> Real {
        libm::sinf(x)
    }

    #[inline]
    pub fn cos(x: Real) -> Real {
        libm::cosf(x)
    }
}

#[cfg(feature = "f64")]
mod imp {
    use super::Real;

    #[inline]
    pub fn sqrt(x: Real) -> Real {
        libm::sqrt(x)
    }

    #[inline]
    pub fn abs(x: Real) -> Real {
        libm::fabs(x)
    }

    #[inline]
    pub fn atan2(y: Real, x: Real) -> Real {
        libm::atan2(y, x)
    }

    #[inline]
    pub fn asin(x: Real) -> Real {
        libm::asin(x)
    }

    #[inline]
    pub fn sin(x: Real) -> Real {
        libm::sin(x)
    }

    #[inline]
    pub fn cos(x: Real) -> Real {
        libm::cos(x)
    }
}

pub(crate) use imp::{abs, asin, atan2, cos, sin, sqrt};

/// `asin` with the argument clamped to `[-1, 1]`, so rounding on a unit
/// quaternion never produces `NaN` at gimbal lock.
#[inline]
pub(crate) fn asin_clamped(x: Real) -> Real {
    asin(x.clamp(-1.0, 1.0))
}
