//! Reconstruction losses for chroma prediction.

use burn::prelude::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Kind of reconstruction loss.
///
/// # Example
///
/// ```
/// use colorizer_training::LossKind;
///
/// assert_eq!(LossKind::default(), LossKind::Mse);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LossKind {
    /// Mean squared error.
    #[default]
    Mse,

    /// Mean absolute error. Less sensitive to outlier pixels, tends to
    /// produce slightly less washed-out chroma.
    Mae,
}

impl LossKind {
    /// Returns the loss name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mse => "mse",
            Self::Mae => "mae",
        }
    }
}

impl std::fmt::Display for LossKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Computes the reconstruction loss between predicted and target
/// chroma.
///
/// # Arguments
///
/// - `kind`: The loss to compute
/// - `pred`: Predicted chroma `[batch, 2, H, W]`
/// - `target`: Target chroma `[batch, 2, H, W]`
///
/// # Returns
///
/// Scalar loss tensor, averaged over all elements.
pub fn reconstruction_loss<B: Backend>(
    kind: LossKind,
    pred: Tensor<B, 4>,
    target: Tensor<B, 4>,
) -> Tensor<B, 1> {
    let diff = pred - target;
    match kind {
        LossKind::Mse => diff.powf_scalar(2.0).mean(),
        LossKind::Mae => diff.abs().mean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::ElementConversion;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn loss_kind_name() {
        assert_eq!(LossKind::Mse.name(), "mse");
        assert_eq!(LossKind::Mae.name(), "mae");
        assert_eq!(format!("{}", LossKind::Mae), "mae");
    }

    #[test]
    fn identical_tensors_give_zero_loss() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::ones([1, 2, 4, 4], &device);

        for kind in [LossKind::Mse, LossKind::Mae] {
            let loss = reconstruction_loss(kind, pred.clone(), pred.clone());
            let value: f32 = loss.into_scalar().elem();
            assert!(value.abs() < 1e-7, "{kind} loss {value}");
        }
    }

    #[test]
    fn mse_squares_the_error() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::full([1, 2, 2, 2], 0.5, &device);
        let target = Tensor::<TestBackend, 4>::zeros([1, 2, 2, 2], &device);

        let loss = reconstruction_loss(LossKind::Mse, pred, target);
        let value: f32 = loss.into_scalar().elem();
        assert!((value - 0.25).abs() < 1e-6);
    }

    #[test]
    fn mae_is_linear_in_the_error() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::full([1, 2, 2, 2], -0.5, &device);
        let target = Tensor::<TestBackend, 4>::zeros([1, 2, 2, 2], &device);

        let loss = reconstruction_loss(LossKind::Mae, pred, target);
        let value: f32 = loss.into_scalar().elem();
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn loss_is_positive_for_mismatch() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::ones([2, 2, 4, 4], &device);
        let target = Tensor::<TestBackend, 4>::zeros([2, 2, 4, 4], &device);

        for kind in [LossKind::Mse, LossKind::Mae] {
            let loss = reconstruction_loss(kind, pred.clone(), target.clone());
            let value: f32 = loss.into_scalar().elem();
            assert!(value > 0.0);
        }
    }
}
