extern crate nalgebra as na;

use na::{Matrix3, UnitQuaternion, Vector3};
use crate::Float;

/**
 * Maps a tangent-space vector onto the rotation group via the group exponential.
 * Small-angle stability is handled by nalgebra.
 */
pub fn exp_so3(w: &Vector3<Float>) -> UnitQuaternion<Float> {
    UnitQuaternion::from_scaled_axis(*w)
}

/**
 * Inverse of exp_so3: the scaled rotation axis of a rotation.
 */
pub fn ln_so3(rotation: &UnitQuaternion<Float>) -> Vector3<Float> {
    rotation.scaled_axis()
}

/**
 * Repeated compositions of approximately-unit quaternions drift off the group;
 * every composed rotation is pushed back onto it before being stored.
 */
pub fn normalize_rotation(rotation: &UnitQuaternion<Float>) -> UnitQuaternion<Float> {
    let mut normalized = *rotation;
    normalized.renormalize();
    normalized
}

pub fn rotation_matrix(rotation: &UnitQuaternion<Float>) -> Matrix3<Float> {
    rotation.to_rotation_matrix().into_inner()
}
