//! Fit plans, requests and the fitting service interface.

use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::FitResult;

/// One step of a fit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum FitStep {
    /// Rigid alignment of the model to the data.
    Align {
        /// Align on matching markers.
        markers: bool,
        /// Also solve for uniform scale.
        scale: bool,
    },
    /// Deformation toward the data, regularized by penalties.
    Fit {
        /// Penalty on element strain.
        strain_penalty: f64,
        /// Penalty on surface curvature.
        curvature_penalty: f64,
        /// Weight of the data term.
        data_weight: f64,
    },
}

impl FitStep {
    /// Default strain penalty of a fit step.
    pub const DEFAULT_STRAIN_PENALTY: f64 = 0.001;

    /// Default curvature penalty of a fit step.
    pub const DEFAULT_CURVATURE_PENALTY: f64 = 200.0;

    /// Default data weight of a fit step.
    pub const DEFAULT_DATA_WEIGHT: f64 = 1000.0;

    /// Marker alignment with scale.
    #[must_use]
    pub const fn align_markers() -> Self {
        Self::Align {
            markers: true,
            scale: true,
        }
    }

    /// Fit step with the default penalties.
    #[must_use]
    pub const fn default_fit() -> Self {
        Self::Fit {
            strain_penalty: Self::DEFAULT_STRAIN_PENALTY,
            curvature_penalty: Self::DEFAULT_CURVATURE_PENALTY,
            data_weight: Self::DEFAULT_DATA_WEIGHT,
        }
    }
}

/// Ordered fit steps.
///
/// The default plan aligns on markers (with scale) and then runs one fit
/// step with the default penalties.
///
/// # Example
///
/// ```
/// use scaffold_fit::{FitPlan, FitStep};
///
/// let plan = FitPlan::default();
/// assert_eq!(plan.steps, vec![FitStep::align_markers(), FitStep::default_fit()]);
/// assert_eq!(plan.fit_count(), 1);
///
/// let align_only = FitPlan::empty().with_step(FitStep::align_markers());
/// assert_eq!(align_only.fit_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitPlan {
    /// Steps in execution order.
    pub steps: Vec<FitStep>,
}

impl Default for FitPlan {
    fn default() -> Self {
        Self {
            steps: vec![FitStep::align_markers(), FitStep::default_fit()],
        }
    }
}

impl FitPlan {
    /// A plan with no steps.
    #[must_use]
    pub const fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: FitStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of fit steps, each of which writes a model.
    #[must_use]
    pub fn fit_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, FitStep::Fit { .. }))
            .count()
    }
}

/// Everything a fitting service needs for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest {
    /// Model region file to deform.
    pub model: PathBuf,
    /// Marker dataset file to fit to.
    pub data: PathBuf,
    /// Model coordinate field, discovered when `None` or absent.
    pub model_coordinates: Option<String>,
    /// Steps to run.
    pub plan: FitPlan,
    /// Output path without the `_fit<N>.<ext>` suffix.
    pub output_stem: PathBuf,
}

impl FitRequest {
    /// Create a request with the default plan.
    #[must_use]
    pub fn new(
        model: impl Into<PathBuf>,
        data: impl Into<PathBuf>,
        output_stem: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model: model.into(),
            data: data.into(),
            model_coordinates: None,
            plan: FitPlan::default(),
            output_stem: output_stem.into(),
        }
    }

    /// Use a named model coordinate field.
    #[must_use]
    pub fn with_model_coordinates(mut self, name: impl Into<String>) -> Self {
        self.model_coordinates = Some(name.into());
        self
    }

    /// Use a custom plan.
    #[must_use]
    pub fn with_plan(mut self, plan: FitPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Extension of the model file, `exf` if it has none.
    #[must_use]
    pub fn model_extension(&self) -> &str {
        self.model
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("exf")
    }
}

/// Fits a model to marker data.
///
/// Implementations run the request's plan and write the model after each fit
/// step to [`fit_output_path`]`(stem, n, ext)` for the `n`-th fit step.
pub trait FittingService {
    /// Run the plan and return the path of the last written model.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs cannot be read, a step fails or no
    /// model is written.
    fn fit(&self, request: &FitRequest) -> FitResult<PathBuf>;
}

/// Path of the model written by the `n`-th fit step.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use scaffold_fit::fit_output_path;
///
/// assert_eq!(
///     fit_output_path(Path::new("out/heart_transformed"), 1, "exf"),
///     Path::new("out/heart_transformed_fit1.exf")
/// );
/// ```
#[must_use]
pub fn fit_output_path(stem: &Path, n: usize, extension: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(format!("_fit{n}.{extension}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_penalties() {
        match FitStep::default_fit() {
            FitStep::Fit {
                strain_penalty,
                curvature_penalty,
                data_weight,
            } => {
                assert!((strain_penalty - 0.001).abs() < f64::EPSILON);
                assert!((curvature_penalty - 200.0).abs() < f64::EPSILON);
                assert!((data_weight - 1000.0).abs() < f64::EPSILON);
            }
            FitStep::Align { .. } => panic!("expected a fit step"),
        }
    }

    #[test]
    fn request_extension() {
        let request = FitRequest::new("in/heart.EXF", "m.exnode", "out/heart_transformed");
        assert_eq!(request.model_extension(), "EXF");
        let request = FitRequest::new("in/heart", "m.exnode", "out/heart_transformed");
        assert_eq!(request.model_extension(), "exf");
    }

    #[test]
    fn numbered_outputs() {
        let stem = Path::new("/tmp/lung_transformed");
        assert_eq!(
            fit_output_path(stem, 2, "json"),
            PathBuf::from("/tmp/lung_transformed_fit2.json")
        );
    }
}
