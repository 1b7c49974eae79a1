extern crate nalgebra as na;

use na::{DVector, Matrix3, UnitQuaternion, Vector3};

use crate::numerics::lie::{exp_so3, normalize_rotation, rotation_matrix};
use crate::state::correction::{BiasCorrection, NavCorrection, PoseVelocityCorrection};
use crate::state::error::StateError;
use crate::Float;

pub mod correction;
pub mod error;

/**
 * Correction sizes consumed by the three update operations:
 * [position, velocity, rotation, bias_gyr, bias_acc] for the full problem,
 * the first three blocks for pose/velocity, the last two for bias.
 */
pub const FULL_CORRECTION_SIZE: usize = 15;
pub const POSE_VELOCITY_CORRECTION_SIZE: usize = 9;
pub const BIAS_CORRECTION_SIZE: usize = 6;

/**
 * Flat serial layout: position, velocity, rotation as scaled axis, bias_gyr,
 * bias_acc, delta_bias_gyr, delta_bias_acc.
 */
pub const NAV_STATE_SERIAL_SIZE: usize = 21;

/**
 * Navigation state of one keyframe: world-frame position and velocity,
 * body-to-world rotation, and the accumulated gyroscope/accelerometer biases.
 *
 * The delta biases hold the correction accumulated across optimizer iterations
 * since the linearization point was last refreshed. The optimizer re-estimates
 * only the deltas; they are folded into the absolute biases by fold_bias_deltas
 * when the owning estimator refreshes its linearization point.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    position: Vector3<Float>,
    velocity: Vector3<Float>,
    rotation: UnitQuaternion<Float>,
    bias_gyr: Vector3<Float>,
    bias_acc: Vector3<Float>,
    delta_bias_gyr: Vector3<Float>,
    delta_bias_acc: Vector3<Float>,
}

impl Default for NavState {
    fn default() -> NavState {
        NavState {
            position: Vector3::<Float>::zeros(),
            velocity: Vector3::<Float>::zeros(),
            rotation: UnitQuaternion::<Float>::identity(),
            bias_gyr: Vector3::<Float>::zeros(),
            bias_acc: Vector3::<Float>::zeros(),
            delta_bias_gyr: Vector3::<Float>::zeros(),
            delta_bias_acc: Vector3::<Float>::zeros(),
        }
    }
}

impl NavState {
    pub fn new(
        position: Vector3<Float>,
        velocity: Vector3<Float>,
        rotation: UnitQuaternion<Float>,
        bias_gyr: Vector3<Float>,
        bias_acc: Vector3<Float>,
    ) -> NavState {
        NavState {
            position,
            velocity,
            rotation: normalize_rotation(&rotation),
            bias_gyr,
            bias_acc,
            delta_bias_gyr: Vector3::<Float>::zeros(),
            delta_bias_acc: Vector3::<Float>::zeros(),
        }
    }

    pub fn get_position(&self) -> &Vector3<Float> {
        &self.position
    }

    pub fn get_velocity(&self) -> &Vector3<Float> {
        &self.velocity
    }

    pub fn get_rotation(&self) -> &UnitQuaternion<Float> {
        &self.rotation
    }

    pub fn get_rotation_matrix(&self) -> Matrix3<Float> {
        rotation_matrix(&self.rotation)
    }

    pub fn get_bias_gyr(&self) -> &Vector3<Float> {
        &self.bias_gyr
    }

    pub fn get_bias_acc(&self) -> &Vector3<Float> {
        &self.bias_acc
    }

    pub fn get_delta_bias_gyr(&self) -> &Vector3<Float> {
        &self.delta_bias_gyr
    }

    pub fn get_delta_bias_acc(&self) -> &Vector3<Float> {
        &self.delta_bias_acc
    }

    pub fn set_position(&mut self, position: Vector3<Float>) -> () {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector3<Float>) -> () {
        self.velocity = velocity;
    }

    pub fn set_rotation(&mut self, rotation: UnitQuaternion<Float>) -> () {
        self.rotation = normalize_rotation(&rotation);
    }

    pub fn set_bias_gyr(&mut self, bias_gyr: Vector3<Float>) -> () {
        self.bias_gyr = bias_gyr;
    }

    pub fn set_bias_acc(&mut self, bias_acc: Vector3<Float>) -> () {
        self.bias_acc = bias_acc;
    }

    /**
     * Applies a 15-row correction [position, velocity, rotation, bias_gyr, bias_acc].
     *
     * The position block is expressed in the body frame and rotated into the world
     * frame by the rotation held before this call; the rotation block is composed on
     * the right through the exponential map. Both match the optimizer's body-frame
     * perturbation Jacobians. The bias blocks accumulate into the delta biases only.
     */
    pub fn apply_full_correction(&mut self, correction: &DVector<Float>) -> Result<(), StateError> {
        let correction = NavCorrection::from_vector(correction)?;

        // rotation before the update
        let rotation = self.rotation;
        self.position += rotation * correction.position;
        self.velocity += correction.velocity;
        self.rotation = normalize_rotation(&(rotation * exp_so3(&correction.rotation)));
        self.delta_bias_gyr += correction.bias_gyr;
        self.delta_bias_acc += correction.bias_acc;
        Ok(())
    }

    /**
     * Applies a 9-row correction [position, velocity, rotation]; bias fields are
     * left untouched. Used when the optimizer is not re-estimating bias.
     */
    pub fn apply_pose_velocity_correction(&mut self, correction: &DVector<Float>) -> Result<(), StateError> {
        let correction = PoseVelocityCorrection::from_vector(correction)?;

        let rotation = self.rotation;
        self.position += rotation * correction.position;
        self.velocity += correction.velocity;
        self.rotation = normalize_rotation(&(rotation * exp_so3(&correction.rotation)));
        Ok(())
    }

    /**
     * Applies a 6-row correction [bias_gyr, bias_acc] to the delta biases;
     * position, velocity and rotation are left untouched.
     */
    pub fn apply_bias_correction(&mut self, correction: &DVector<Float>) -> Result<(), StateError> {
        let correction = BiasCorrection::from_vector(correction)?;

        self.delta_bias_gyr += correction.bias_gyr;
        self.delta_bias_acc += correction.bias_acc;
        Ok(())
    }

    /**
     * Folds the accumulated delta biases into the absolute biases and resets the
     * deltas. Called by the owning estimator when it refreshes its linearization
     * point; the update operations never do this on their own.
     */
    pub fn fold_bias_deltas(&mut self) -> () {
        self.bias_gyr += self.delta_bias_gyr;
        self.bias_acc += self.delta_bias_acc;
        self.delta_bias_gyr = Vector3::<Float>::zeros();
        self.delta_bias_acc = Vector3::<Float>::zeros();
    }

    pub fn to_serial(&self) -> [Float; NAV_STATE_SERIAL_SIZE] {
        let w = self.rotation.scaled_axis();
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            w.x,
            w.y,
            w.z,
            self.bias_gyr.x,
            self.bias_gyr.y,
            self.bias_gyr.z,
            self.bias_acc.x,
            self.bias_acc.y,
            self.bias_acc.z,
            self.delta_bias_gyr.x,
            self.delta_bias_gyr.y,
            self.delta_bias_gyr.z,
            self.delta_bias_acc.x,
            self.delta_bias_acc.y,
            self.delta_bias_acc.z,
        ]
    }

    pub fn from_serial(serial: &[Float; NAV_STATE_SERIAL_SIZE]) -> NavState {
        let axis_angle = Vector3::<Float>::new(serial[6], serial[7], serial[8]);
        NavState {
            position: Vector3::<Float>::new(serial[0], serial[1], serial[2]),
            velocity: Vector3::<Float>::new(serial[3], serial[4], serial[5]),
            rotation: exp_so3(&axis_angle),
            bias_gyr: Vector3::<Float>::new(serial[9], serial[10], serial[11]),
            bias_acc: Vector3::<Float>::new(serial[12], serial[13], serial[14]),
            delta_bias_gyr: Vector3::<Float>::new(serial[15], serial[16], serial[17]),
            delta_bias_acc: Vector3::<Float>::new(serial[18], serial[19], serial[20]),
        }
    }
}
