//! Constant-velocity Kalman filter over (cx, cy, aspect, height) built on
//! fixed-size nalgebra matrices.

use nalgebra::{SMatrix, SVector};

use crate::tracker::TrackerError;

pub type StateVector = SVector<f64, 8>;
pub type StateCovariance = SMatrix<f64, 8, 8>;
pub type Measurement = SVector<f64, 4>;

type MeasurementCovariance = SMatrix<f64, 4, 4>;
type UpdateMatrix = SMatrix<f64, 4, 8>;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: StateCovariance,
    update_mat: UpdateMatrix,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 4;
        let mut motion_mat = StateCovariance::identity();
        for i in 0..ndim {
            motion_mat[(i, ndim + i)] = 1.0;
        }

        let mut update_mat = UpdateMatrix::zeros();
        for i in 0..ndim {
            update_mat[(i, i)] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    /// Start a track from an unassociated XYAH measurement.
    pub fn initiate(&self, measurement: Measurement) -> (StateVector, StateCovariance) {
        let mut mean = StateVector::zeros();
        mean.fixed_rows_mut::<4>(0).copy_from(&measurement);

        let h = measurement[3];
        let pos = 2.0 * self.std_weight_position * h;
        let vel = 10.0 * self.std_weight_velocity * h;
        let std = [pos, pos, 1e-2, pos, vel, vel, 1e-5, vel];

        (mean, diagonal_covariance(&std))
    }

    pub fn predict(
        &self,
        mean: &StateVector,
        covariance: &StateCovariance,
    ) -> (StateVector, StateCovariance) {
        let h = mean[3];
        let pos = self.std_weight_position * h;
        let vel = self.std_weight_velocity * h;
        let motion_cov = diagonal_covariance(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        let new_mean = self.motion_mat * mean;
        let new_covariance =
            self.motion_mat * covariance * self.motion_mat.transpose() + motion_cov;

        (new_mean, new_covariance)
    }

    fn project(
        &self,
        mean: &StateVector,
        covariance: &StateCovariance,
    ) -> (Measurement, MeasurementCovariance) {
        let h = mean[3];
        let pos = self.std_weight_position * h;
        let variances = Measurement::new(pos * pos, pos * pos, 1e-2, pos * pos);
        let innovation_cov = MeasurementCovariance::from_diagonal(&variances);

        let mean_proj = self.update_mat * mean;
        let covariance_proj =
            self.update_mat * covariance * self.update_mat.transpose() + innovation_cov;

        (mean_proj, covariance_proj)
    }

    /// Correct a predicted state with a new XYAH measurement.
    ///
    /// Fails only when the projected covariance cannot be inverted, which
    /// happens for degenerate zero-height boxes.
    pub fn update(
        &self,
        mean: &StateVector,
        covariance: &StateCovariance,
        measurement: Measurement,
    ) -> Result<(StateVector, StateCovariance), TrackerError> {
        let (projected_mean, projected_cov) = self.project(mean, covariance);
        let innovation = measurement - projected_mean;

        let s_inv = projected_cov
            .try_inverse()
            .ok_or(TrackerError::SingularCovariance)?;

        // K = P * H^T * S^-1
        let kalman_gain = covariance * self.update_mat.transpose() * s_inv;

        let new_mean = mean + kalman_gain * innovation;
        let new_covariance = covariance - kalman_gain * projected_cov * kalman_gain.transpose();

        Ok((new_mean, new_covariance))
    }
}

fn diagonal_covariance(std: &[f64; 8]) -> StateCovariance {
    let variances = StateVector::from_iterator(std.iter().map(|s| s * s));
    StateCovariance::from_diagonal(&variances)
}
