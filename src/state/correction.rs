extern crate nalgebra as na;

use na::{DVector, Vector3};

use crate::state::error::StateError;
use crate::state::{BIAS_CORRECTION_SIZE, FULL_CORRECTION_SIZE, POSE_VELOCITY_CORRECTION_SIZE};
use crate::Float;

/**
 * A full correction, parsed from the optimizer's flat vector into named blocks.
 * Block order within the flat vector is [position, velocity, rotation, bias_gyr, bias_acc],
 * one 3-vector per block, mirroring the variable ordering used when the optimizer
 * assembles its Jacobian/Hessian blocks.
 *
 * position is a body-frame translation, rotation a tangent-space (scaled axis) vector;
 * the bias blocks are increments to the delta biases, not to the absolute biases.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavCorrection {
    pub position: Vector3<Float>,
    pub velocity: Vector3<Float>,
    pub rotation: Vector3<Float>,
    pub bias_gyr: Vector3<Float>,
    pub bias_acc: Vector3<Float>,
}

impl NavCorrection {
    pub fn empty() -> NavCorrection {
        NavCorrection {
            position: Vector3::<Float>::zeros(),
            velocity: Vector3::<Float>::zeros(),
            rotation: Vector3::<Float>::zeros(),
            bias_gyr: Vector3::<Float>::zeros(),
            bias_acc: Vector3::<Float>::zeros(),
        }
    }

    pub fn from_vector(correction: &DVector<Float>) -> Result<NavCorrection, StateError> {
        check_size(correction, FULL_CORRECTION_SIZE)?;
        Ok(NavCorrection {
            position: correction.fixed_rows::<3>(0).into(),
            velocity: correction.fixed_rows::<3>(3).into(),
            rotation: correction.fixed_rows::<3>(6).into(),
            bias_gyr: correction.fixed_rows::<3>(9).into(),
            bias_acc: correction.fixed_rows::<3>(12).into(),
        })
    }

    pub fn to_vector(&self) -> DVector<Float> {
        let mut correction = DVector::<Float>::zeros(FULL_CORRECTION_SIZE);
        correction.fixed_rows_mut::<3>(0).copy_from(&self.position);
        correction.fixed_rows_mut::<3>(3).copy_from(&self.velocity);
        correction.fixed_rows_mut::<3>(6).copy_from(&self.rotation);
        correction.fixed_rows_mut::<3>(9).copy_from(&self.bias_gyr);
        correction.fixed_rows_mut::<3>(12).copy_from(&self.bias_acc);
        correction
    }

    pub fn norm(&self) -> Float {
        self.position.norm() + self.velocity.norm() + self.rotation.norm() + self.bias_gyr.norm() + self.bias_acc.norm()
    }
}

/**
 * Correction for the reduced problem that leaves biases fixed.
 * Flat layout: [position, velocity, rotation].
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseVelocityCorrection {
    pub position: Vector3<Float>,
    pub velocity: Vector3<Float>,
    pub rotation: Vector3<Float>,
}

impl PoseVelocityCorrection {
    pub fn empty() -> PoseVelocityCorrection {
        PoseVelocityCorrection {
            position: Vector3::<Float>::zeros(),
            velocity: Vector3::<Float>::zeros(),
            rotation: Vector3::<Float>::zeros(),
        }
    }

    pub fn from_vector(correction: &DVector<Float>) -> Result<PoseVelocityCorrection, StateError> {
        check_size(correction, POSE_VELOCITY_CORRECTION_SIZE)?;
        Ok(PoseVelocityCorrection {
            position: correction.fixed_rows::<3>(0).into(),
            velocity: correction.fixed_rows::<3>(3).into(),
            rotation: correction.fixed_rows::<3>(6).into(),
        })
    }

    pub fn to_vector(&self) -> DVector<Float> {
        let mut correction = DVector::<Float>::zeros(POSE_VELOCITY_CORRECTION_SIZE);
        correction.fixed_rows_mut::<3>(0).copy_from(&self.position);
        correction.fixed_rows_mut::<3>(3).copy_from(&self.velocity);
        correction.fixed_rows_mut::<3>(6).copy_from(&self.rotation);
        correction
    }

    pub fn norm(&self) -> Float {
        self.position.norm() + self.velocity.norm() + self.rotation.norm()
    }
}

/**
 * Correction for the bias-only problem. Flat layout: [bias_gyr, bias_acc].
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasCorrection {
    pub bias_gyr: Vector3<Float>,
    pub bias_acc: Vector3<Float>,
}

impl BiasCorrection {
    pub fn empty() -> BiasCorrection {
        BiasCorrection {
            bias_gyr: Vector3::<Float>::zeros(),
            bias_acc: Vector3::<Float>::zeros(),
        }
    }

    pub fn from_vector(correction: &DVector<Float>) -> Result<BiasCorrection, StateError> {
        check_size(correction, BIAS_CORRECTION_SIZE)?;
        Ok(BiasCorrection {
            bias_gyr: correction.fixed_rows::<3>(0).into(),
            bias_acc: correction.fixed_rows::<3>(3).into(),
        })
    }

    pub fn to_vector(&self) -> DVector<Float> {
        let mut correction = DVector::<Float>::zeros(BIAS_CORRECTION_SIZE);
        correction.fixed_rows_mut::<3>(0).copy_from(&self.bias_gyr);
        correction.fixed_rows_mut::<3>(3).copy_from(&self.bias_acc);
        correction
    }

    pub fn norm(&self) -> Float {
        self.bias_gyr.norm() + self.bias_acc.norm()
    }
}

fn check_size(correction: &DVector<Float>, expected: usize) -> Result<(), StateError> {
    match correction.len() {
        actual if actual == expected => Ok(()),
        actual => Err(StateError::InvalidCorrectionSize { expected, actual }),
    }
}
