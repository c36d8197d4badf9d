//! Quaternion algebra on plain `[q0, q1, q2, q3]` vectors, scalar part first.
//!
//! The attitude occupies the first four entries of the 7-element state, so
//! it is kept as a `Vector4` rather than a `UnitQuaternion`. Unit norm is
//! restored explicitly with [`normalize`].

use nalgebra::{Matrix3, Matrix4x3, Vector4};

use crate::error::{Error, Result};
use crate::math;
use crate::{Quaternion, Real, Vector};

/// `(1, 0, 0, 0)`: body frame aligned with the navigation frame.
pub fn identity() -> Quaternion {
    Vector4::new(1.0, 0.0, 0.0, 0.0)
}

/// Rotation of `angle` radians about `axis`. The axis does not need to be
/// unit length, but it must not be zero.
pub fn from_axis_angle(axis: &Vector, angle: Real) -> Result<Quaternion> {
    let len2 = axis.norm_squared();
    if !(len2 > 0.0 && len2.is_finite()) || !angle.is_finite() {
        return Err(Error::DegenerateQuaternion);
    }
    let half = 0.5 * angle;
    let s = math::sin(half) / math::sqrt(len2);
    Ok(Vector4::new(
        math::cos(half),
        axis.x * s,
        axis.y * s,
        axis.z * s,
    ))
}

/// `q` divided by its largest absolute component, together with that
/// component.
///
/// The result has norm in `[1, 2]`, so squaring it can neither overflow nor
/// underflow. Zero or non-finite input is [`Error::DegenerateQuaternion`].
pub(crate) fn rescale(q: &Quaternion) -> Result<(Quaternion, Real)> {
    if !q.iter().all(|c| c.is_finite()) {
        return Err(Error::DegenerateQuaternion);
    }
    let m = q.amax();
    if m == 0.0 {
        return Err(Error::DegenerateQuaternion);
    }
    Ok((q / m, m))
}

/// Scales `q` to unit norm.
///
/// A zero or non-finite norm means the filter has diverged; that is
/// reported as [`Error::DegenerateQuaternion`] instead of producing `NaN`.
/// Any finite non-zero `q` normalizes, however large or small.
pub fn normalize(q: &Quaternion) -> Result<Quaternion> {
    let (p, _) = rescale(q)?;
    Ok(p / math::sqrt(p.norm_squared()))
}

/// Homogeneous rotation matrix taking navigation-frame vectors to the body
/// frame.
///
/// Entries are built from the raw component products and multiplied
/// through once by `s = 1 / ||q||²`, so the result is orthonormal for any
/// non-zero `q`, not only for unit quaternions.
pub fn rotation_matrix(q: &Quaternion) -> Result<Matrix3<Real>> {
    let (q, _) = rescale(q)?;
    let s = 1.0 / q.norm_squared();
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);

    let q00 = q0 * q0;
    let q11 = q1 * q1;
    let q22 = q2 * q2;
    let q33 = q3 * q3;
    let q01 = q0 * q1;
    let q02 = q0 * q2;
    let q03 = q0 * q3;
    let q12 = q1 * q2;
    let q13 = q1 * q3;
    let q23 = q2 * q3;

    let s2 = 2.0 * s;
    #[cfg_attr(rustfmt, rustfmt_skip)]
    let m = Matrix3::new(
        s * (q00 + q11 - q22 - q33), s2 * (q12 + q03),           s2 * (q13 - q02),
        s2 * (q12 - q03),           s * (q00 - q11 + q22 - q33), s2 * (q23 + q01),
        s2 * (q13 + q02),           s2 * (q23 - q01),           s * (q00 - q11 - q22 + q33),
    );
    Ok(m)
}

/// Matrix form of `w ↦ q ⊗ [0, w]`.
///
/// Multiplying by `0.5` gives the quaternion derivative for a body angular
/// rate `w`.
pub fn cross_matrix(q: &Quaternion) -> Matrix4x3<Real> {
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
    #[cfg_attr(rustfmt, rustfmt_skip)]
    let m = Matrix4x3::new(
        -q1, -q2, -q3,
         q0, -q3,  q2,
         q3,  q0, -q1,
        -q2,  q1,  q0,
    );
    m
}

/// Represents three dimensions:
///  * yaw, nose left or right about an axis running up and down;
///  * pitch, nose up or down about an axis running from wing to wing;
///  * roll, rotation about an axis running from nose to tail.
/// The axes are alternatively designated as
/// vertical, transverse, and longitudinal respectively.
/// See https://en.wikipedia.org/wiki/Euler_angles#Tait%E2%80%93Bryan_angles
/// and https://en.wikipedia.org/wiki/Aircraft_principal_axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaitBryanAngles {
    pub yaw: Real,
    pub pitch: Real,
    pub roll: Real,
}

impl TaitBryanAngles {
    /// Z-Y-X angles of any non-zero quaternion.
    pub fn from_quaternion(q: &Quaternion) -> Result<Self> {
        Ok(Self::from_unit_quaternion(&normalize(q)?))
    }

    pub(crate) fn from_unit_quaternion(q: &Quaternion) -> Self {
        let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
        TaitBryanAngles {
            yaw: math::atan2(2.0 * (q0 * q3 + q1 * q2), 1.0 - 2.0 * (q2 * q2 + q3 * q3)),
            pitch: math::asin_clamped(2.0 * (q0 * q2 - q1 * q3)),
            roll: math::atan2(2.0 * (q0 * q1 + q2 * q3), 1.0 - 2.0 * (q1 * q1 + q2 * q2)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use core::f64::consts::{FRAC_PI_2, PI};

    /// A spread of attitudes with norms between 0.5 and 2.
    pub(crate) fn sample_quaternions() -> [Quaternion; 8] {
        [
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.5, 0.0, 0.0, 0.0),
            Vector4::new(0.9, 0.3, -0.2, 0.1),
            Vector4::new(0.2, -0.7, 0.5, 0.4),
            Vector4::new(-0.3, 0.4, 0.8, -0.6),
            Vector4::new(1.2, -0.9, 0.6, 0.7),
            Vector4::new(0.0, 0.0, 0.0, 2.0),
            Vector4::new(0.35, 0.35, -0.35, 0.35),
        ]
    }

    fn hamilton(a: &Quaternion, b: &Quaternion) -> Quaternion {
        Vector4::new(
            a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
            a[0] * b[1] + a[1] * b[0] + a[2] * b[3] - a[3] * b[2],
            a[0] * b[2] - a[1] * b[3] + a[2] * b[0] + a[3] * b[1],
            a[0] * b[3] + a[1] * b[2] - a[2] * b[1] + a[3] * b[0],
        )
    }

    #[test]
    fn normalize_is_idempotent() {
        for q in sample_quaternions() {
            let once = normalize(&q).unwrap();
            let twice = normalize(&once).unwrap();
            assert_relative_eq!(once.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(once, twice, epsilon = 1e-6);
        }
    }

    #[test]
    fn normalize_rejects_degenerate_quaternions() {
        assert_eq!(
            normalize(&Vector4::zeros()),
            Err(Error::DegenerateQuaternion)
        );
        assert_eq!(
            normalize(&Vector4::new(Real::NAN, 0.0, 0.0, 1.0)),
            Err(Error::DegenerateQuaternion)
        );
        assert_eq!(
            normalize(&Vector4::new(Real::INFINITY, 0.0, 0.0, 0.0)),
            Err(Error::DegenerateQuaternion)
        );
    }

    #[test]
    fn normalize_handles_extreme_magnitudes() {
        let q = Vector4::new(0.9, 0.3, -0.2, 0.1);
        let unit = normalize(&q).unwrap();
        for scale in [1e20 as Real, 1e-25 as Real] {
            assert_relative_eq!(normalize(&(q * scale)).unwrap(), unit, epsilon = 1e-6);
            assert_relative_eq!(
                rotation_matrix(&(q * scale)).unwrap(),
                rotation_matrix(&unit).unwrap(),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn rotation_matrix_is_orthonormal_for_scaled_quaternions() {
        for q in sample_quaternions() {
            let m = rotation_matrix(&q).unwrap();
            assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-5);
            assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn rotation_preserves_length_of_unit_vectors() {
        let refs = [
            Vector::new(0.0, 0.0, 1.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.6, -0.8, 0.0),
            Vector::new(0.48, 0.6, 0.64),
        ];
        for q in sample_quaternions() {
            let m = rotation_matrix(&q).unwrap();
            for r in refs.iter() {
                assert_relative_eq!((m * r).norm(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn rotation_matrix_does_not_depend_on_scale() {
        let q = Vector4::new(0.9, 0.3, -0.2, 0.1);
        let unit = rotation_matrix(&normalize(&q).unwrap()).unwrap();
        assert_relative_eq!(rotation_matrix(&(q * 1.7)).unwrap(), unit, epsilon = 1e-5);
        assert_relative_eq!(rotation_matrix(&(q * 0.6)).unwrap(), unit, epsilon = 1e-5);
    }

    #[test]
    fn rotation_matrix_maps_navigation_axes_into_body_frame() {
        // body yawed +90 degrees: the navigation x axis points along body -y
        let q = from_axis_angle(&Vector::z(), FRAC_PI_2 as Real).unwrap();
        let m = rotation_matrix(&q).unwrap();
        assert_abs_diff_eq!(m * Vector::x(), -Vector::y(), epsilon = 1e-6);
        assert_abs_diff_eq!(m * Vector::y(), Vector::x(), epsilon = 1e-6);
        assert_abs_diff_eq!(m * Vector::z(), Vector::z(), epsilon = 1e-6);
    }

    #[test]
    fn rotation_matrix_rejects_zero_quaternion() {
        assert_eq!(
            rotation_matrix(&Vector4::zeros()),
            Err(Error::DegenerateQuaternion)
        );
    }

    #[test]
    fn cross_matrix_matches_hamilton_product() {
        let w = Vector::new(0.3, -1.1, 2.0);
        let pure = Vector4::new(0.0, w.x, w.y, w.z);
        for q in sample_quaternions() {
            assert_relative_eq!(cross_matrix(&q) * w, hamilton(&q, &pure), epsilon = 1e-5);
        }
    }

    #[test]
    fn axis_angle_needs_an_axis() {
        assert_eq!(
            from_axis_angle(&Vector::zeros(), 1.0),
            Err(Error::DegenerateQuaternion)
        );
    }

    #[test]
    fn euler_angles_of_single_axis_rotations() {
        let yaw = from_axis_angle(&Vector::z(), FRAC_PI_2 as Real).unwrap();
        let a = TaitBryanAngles::from_quaternion(&yaw).unwrap();
        assert_abs_diff_eq!(a.yaw, FRAC_PI_2 as Real, epsilon = 1e-5);
        assert_abs_diff_eq!(a.pitch, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(a.roll, 0.0, epsilon = 1e-5);

        let roll = from_axis_angle(&Vector::x(), (PI / 6.0) as Real).unwrap();
        let a = TaitBryanAngles::from_quaternion(&(roll * 3.0)).unwrap();
        assert_abs_diff_eq!(a.roll, (PI / 6.0) as Real, epsilon = 1e-5);
        assert_abs_diff_eq!(a.yaw, 0.0, epsilon = 1e-5);

        let pitch = from_axis_angle(&Vector::y(), (-PI / 4.0) as Real).unwrap();
        let a = TaitBryanAngles::from_quaternion(&pitch).unwrap();
        assert_abs_diff_eq!(a.pitch, (-PI / 4.0) as Real, epsilon = 1e-5);
    }
}
