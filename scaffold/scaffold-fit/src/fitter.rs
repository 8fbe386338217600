//! Marker alignment fitter.

use std::path::PathBuf;

use nalgebra::Point3;
use scaffold_io::{read_region, write_region};
use scaffold_markers::{extract_markers, resolve_coordinate_field, ExtractOptions};
use scaffold_types::{FieldError, Region};
use tracing::{debug, info, warn};

use crate::kabsch::{alignment_rms, compute_rigid_transform, MIN_MARKER_PAIRS};
use crate::landmark::match_markers;
use crate::plan::{fit_output_path, FitRequest, FitStep, FittingService};
use crate::{FitError, FitResult, RigidTransform};

/// A [`FittingService`] that aligns a model on its markers.
///
/// `Align { markers: true, .. }` steps extract the model's own markers,
/// pair them by label with the data markers and apply the Kabsch transform
/// to the model coordinate field. `Fit` steps do not deform the model; they
/// write the current model to the numbered output and log that the penalty
/// weights were not applied.
#[derive(Debug, Clone, Default)]
pub struct MarkerAlignFitter {
    markers: ExtractOptions,
}

impl MarkerAlignFitter {
    /// Create a fitter using the default marker naming rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom options when extracting the model's markers.
    #[must_use]
    pub fn with_marker_options(mut self, options: ExtractOptions) -> Self {
        self.markers = options;
        self
    }

    fn align(
        &self,
        model: &mut Region,
        coordinates: &str,
        data: &Region,
        scale: bool,
    ) -> FitResult<RigidTransform> {
        let options = self.markers.clone().with_coordinate_field(coordinates);
        let model_markers = extract_markers(model, &options)?;
        let pairs = match_markers(&model_markers.region, data);
        if pairs.len() < MIN_MARKER_PAIRS {
            return Err(FitError::InsufficientMarkers {
                required: MIN_MARKER_PAIRS,
                provided: pairs.len(),
            });
        }

        let (source, target): (Vec<Point3<f64>>, Vec<Point3<f64>>) =
            pairs.iter().map(|p| (p.model, p.data)).unzip();
        let transform = compute_rigid_transform(&source, &target, scale)?;

        let field = model
            .fields_mut()
            .get_mut(coordinates)
            .ok_or_else(|| FieldError::FieldNotFound {
                name: coordinates.to_string(),
            })?;
        let wrong = FieldError::WrongKind {
            name: coordinates.to_string(),
            kind: field.kind().name(),
            expected: "finite element",
        };
        let moved = transform.apply_to_field(field.as_finite_element_mut().ok_or(wrong)?);

        info!(
            markers = pairs.len(),
            nodes = moved,
            scale = format!("{:.4}", transform.scale),
            rms = format!("{:.4}", alignment_rms(&transform, &source, &target)),
            "Aligned model on markers"
        );
        Ok(transform)
    }
}

impl FittingService for MarkerAlignFitter {
    fn fit(&self, request: &FitRequest) -> FitResult<PathBuf> {
        let mut model = read_region(&request.model)?;
        let data = read_region(&request.data)?;
        let coordinates =
            resolve_coordinate_field(&model, request.model_coordinates.as_deref())?
                .name()
                .to_string();
        let extension = request.model_extension().to_string();

        debug!(
            model = %request.model.display(),
            data = %request.data.display(),
            coordinates = %coordinates,
            steps = request.plan.steps.len(),
            "Starting fit"
        );

        let mut written = None;
        let mut fit_index = 0;
        for step in &request.plan.steps {
            match *step {
                FitStep::Align { markers: false, .. } => {
                    debug!("Alignment without markers requested, model left in place");
                }
                FitStep::Align {
                    markers: true,
                    scale,
                } => {
                    self.align(&mut model, &coordinates, &data, scale)?;
                }
                FitStep::Fit {
                    strain_penalty,
                    curvature_penalty,
                    data_weight,
                } => {
                    fit_index += 1;
                    warn!(
                        strain_penalty,
                        curvature_penalty,
                        data_weight,
                        "Fit penalties not applied, writing aligned model"
                    );
                    let path = fit_output_path(&request.output_stem, fit_index, &extension);
                    write_region(&model, &path)?;
                    written = Some(path);
                }
            }
        }

        written.ok_or(FitError::NoFitSteps)
    }
}
