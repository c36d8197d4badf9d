//! Linearization of a reference-vector observation around the current
//! attitude.

use nalgebra::{Matrix3x4, SMatrix};

use crate::error::Result;
use crate::quaternion::{rescale, rotation_matrix};
use crate::{Quaternion, Real, Vector};

/// Predicted body-frame direction of a reference vector together with its
/// derivative with respect to `[q0, q1, q2, q3]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linearization {
    pub predicted: Vector,
    pub jacobian: Matrix3x4<Real>,
}

impl Linearization {
    /// The 3×7 Jacobian over the whole state. The bias columns are zero:
    /// a reference-vector observation depends on attitude only.
    pub fn full_jacobian(&self) -> SMatrix<Real, 3, 7> {
        let mut H = SMatrix::<Real, 3, 7>::zeros();
        H.fixed_view_mut::<3, 4>(0, 0).copy_from(&self.jacobian);
        H
    }
}

/// Rotates `reference` (navigation frame, expected to be unit length) into
/// the body frame and differentiates the result with respect to `q`.
///
/// `q` does not have to be normalized. With `M(q)` the unscaled rotation
/// matrix and `s = 1 / ||q||²`, the prediction is `v = s M r` and
///
/// ```text
/// ∂v/∂qi = s (∂M/∂qi) r - 2 qi s v
/// ```
///
/// `v` does not depend on the scale of `q`, so the work is done on `q`
/// divided by its largest component and the Jacobian divided by that
/// component afterwards.
///
/// `reference` is not validated; a wrong scale biases the innovation.
pub fn linearize_measurement(q: &Quaternion, reference: &Vector) -> Result<Linearization> {
    let (p, m) = rescale(q)?;
    let q = &p;
    let s = 1.0 / q.norm_squared();
    let predicted = rotation_matrix(q)? * reference;

    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
    let (rx, ry, rz) = (reference.x, reference.y, reference.z);

    // (∂M/∂qi) r / 2
    let dM = [
        Vector::new(
            q0 * rx + q3 * ry - q2 * rz,
            -q3 * rx + q0 * ry + q1 * rz,
            q2 * rx - q1 * ry + q0 * rz,
        ),
        Vector::new(
            q1 * rx + q2 * ry + q3 * rz,
            q2 * rx - q1 * ry + q0 * rz,
            q3 * rx - q0 * ry - q1 * rz,
        ),
        Vector::new(
            -q2 * rx + q1 * ry - q0 * rz,
            q1 * rx + q2 * ry + q3 * rz,
            q0 * rx + q3 * ry - q2 * rz,
        ),
        Vector::new(
            -q3 * rx + q0 * ry + q1 * rz,
            -q0 * rx - q3 * ry + q2 * rz,
            q1 * rx + q2 * ry + q3 * rz,
        ),
    ];

    let s2 = 2.0 * s / m;
    let mut jacobian = Matrix3x4::zeros();
    for (i, d) in dM.iter().enumerate() {
        jacobian.set_column(i, &((d - predicted * q[i]) * s2));
    }

    Ok(Linearization {
        predicted,
        jacobian,
    })
}
