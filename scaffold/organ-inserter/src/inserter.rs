//! The insertion run.
//!
//! A run exports the scaffold's markers and then, for each organ file in
//! order, either tags it in place (pre-tagged organs, already in scaffold
//! coordinates) or fits it to the markers and tags the fitted model.

use std::path::{Path, PathBuf};

use scaffold_fit::{FitRequest, FittingService, MarkerAlignFitter};
use scaffold_io::file_basename;
use scaffold_markers::{export_marker_coordinates, ExtractionReport};
use tracing::{debug, error, info, warn};

use crate::manifest::{AnnotationManifest, MANIFEST_FILE_NAME};
use crate::organ::{organ_name_from_path, OrganName};
use crate::params::{FailurePolicy, InsertParams};
use crate::tagger::{tag_organ_file, TagOutcome};
use crate::{InsertError, InsertResult};

/// Suffix of the fitted model stem, before `_fit<N>`.
pub const TRANSFORMED_SUFFIX: &str = "_transformed";

/// How an organ file was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganRoute {
    /// Tagged in place.
    Pretagged,
    /// Fitted to the markers, then tagged.
    Fitted,
}

/// Outcome for one organ file.
#[derive(Debug)]
pub struct OrganOutcome {
    /// Input file.
    pub input: PathBuf,
    /// Organ name and group.
    pub organ: OrganName,
    /// How the file was handled.
    pub route: OrganRoute,
    /// Tagged output, or why there is none.
    pub result: InsertResult<TagOutcome>,
}

impl OrganOutcome {
    /// Tagged output file, if the organ succeeded.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(|t| t.path.as_path())
    }
}

/// Result of a run.
#[derive(Debug)]
pub struct InsertReport {
    /// Marker dataset file.
    pub marker_file: PathBuf,
    /// Marker extraction counts.
    pub extraction: ExtractionReport,
    /// One outcome per input organ, in input order.
    pub organs: Vec<OrganOutcome>,
    /// Manifest file, if written.
    pub manifest: Option<PathBuf>,
}

impl InsertReport {
    /// Output per input organ, `None` where the organ failed.
    pub fn outputs(&self) -> impl Iterator<Item = Option<&Path>> {
        self.organs.iter().map(OrganOutcome::output)
    }

    /// Number of failed organs.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.organs.iter().filter(|o| o.result.is_err()).count()
    }

    /// True if every organ succeeded and extraction was clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures() == 0 && !self.extraction.is_degraded()
    }
}

/// Inserts organs into a scaffold.
///
/// # Example
///
/// ```no_run
/// use std::path::{Path, PathBuf};
/// use organ_inserter::{InsertParams, OrganInserter};
///
/// let inserter = OrganInserter::new(InsertParams::default());
/// let report = inserter
///     .run(
///         Path::new("whole_body.exf"),
///         &[PathBuf::from("heart.exf")],
///         Path::new("out"),
///     )
///     .unwrap();
/// println!("{:?}", report.outputs().collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct OrganInserter<F = MarkerAlignFitter> {
    params: InsertParams,
    fitter: F,
}

impl OrganInserter<MarkerAlignFitter> {
    /// Create an inserter using the built-in marker alignment fitter.
    #[must_use]
    pub fn new(params: InsertParams) -> Self {
        let fitter = MarkerAlignFitter::new().with_marker_options(params.markers.clone());
        Self { params, fitter }
    }
}

impl<F: FittingService> OrganInserter<F> {
    /// Use another fitting service.
    #[must_use]
    pub fn with_fitter<G: FittingService>(self, fitter: G) -> OrganInserter<G> {
        OrganInserter {
            params: self.params,
            fitter,
        }
    }

    /// The run parameters.
    #[must_use]
    pub const fn params(&self) -> &InsertParams {
        &self.params
    }

    /// Run the insertion.
    ///
    /// Writes the marker dataset to `output_dir`, then handles each organ
    /// file in order. Outcomes are reported 1:1 with `organs`.
    ///
    /// # Errors
    ///
    /// Returns an error if marker extraction fails (nothing else is
    /// attempted), if the manifest cannot be written, or, under
    /// [`FailurePolicy::FailFast`], if any organ fails
    /// ([`InsertError::Organ`]).
    pub fn run(
        &self,
        scaffold: &Path,
        organs: &[PathBuf],
        output_dir: &Path,
    ) -> InsertResult<InsertReport> {
        info!(
            scaffold = %scaffold.display(),
            organs = organs.len(),
            output_dir = %output_dir.display(),
            "Starting organ insertion"
        );

        let export = export_marker_coordinates(scaffold, output_dir, &self.params.markers)?;

        let mut outcomes = Vec::with_capacity(organs.len());
        for input in organs {
            let organ = organ_name_from_path(input, &self.params.organ_keywords);
            let route = if self.params.is_pretagged(input) {
                OrganRoute::Pretagged
            } else {
                OrganRoute::Fitted
            };
            debug!(input = %input.display(), organ = %organ, ?route, "Processing organ");

            let result = match self.insert_organ(input, &organ, route, &export.path, output_dir) {
                Err(e) if self.params.failure_policy == FailurePolicy::FailFast => {
                    return Err(InsertError::organ(input, e));
                }
                Err(e) => {
                    error!(organ = %input.display(), error = %e, "Organ failed, continuing");
                    Err(e)
                }
                Ok(tagged) => Ok(tagged),
            };
            outcomes.push(OrganOutcome {
                input: input.clone(),
                organ,
                route,
                result,
            });
        }

        let manifest = if self.params.write_manifest {
            Some(self.write_manifest(scaffold, &outcomes, output_dir)?)
        } else {
            None
        };

        let report = InsertReport {
            marker_file: export.path,
            extraction: export.report,
            organs: outcomes,
            manifest,
        };

        if report.failures() > 0 {
            warn!(
                failed = report.failures(),
                total = report.organs.len(),
                "Organ insertion complete with failures"
            );
        } else {
            info!(organs = report.organs.len(), "Organ insertion complete");
        }
        Ok(report)
    }

    fn insert_organ(
        &self,
        input: &Path,
        organ: &OrganName,
        route: OrganRoute,
        marker_file: &Path,
        output_dir: &Path,
    ) -> InsertResult<TagOutcome> {
        match route {
            OrganRoute::Pretagged => tag_organ_file(input, organ),
            OrganRoute::Fitted => {
                let fitted = self.fit(input, marker_file, output_dir)?;
                tag_organ_file(&fitted, organ)
            }
        }
    }

    fn fit(&self, input: &Path, marker_file: &Path, output_dir: &Path) -> InsertResult<PathBuf> {
        let stem = output_dir.join(format!("{}{TRANSFORMED_SUFFIX}", file_basename(input)));
        let mut request =
            FitRequest::new(input, marker_file, stem).with_plan(self.params.fit_plan.clone());
        if let Some(name) = &self.params.model_coordinates {
            request = request.with_model_coordinates(name);
        }
        Ok(self.fitter.fit(&request)?)
    }

    fn write_manifest(
        &self,
        scaffold: &Path,
        outcomes: &[OrganOutcome],
        output_dir: &Path,
    ) -> InsertResult<PathBuf> {
        let mut manifest = AnnotationManifest::new(scaffold, &self.params.sources);
        for (position, outcome) in outcomes.iter().enumerate() {
            if let Some(output) = outcome.output() {
                manifest.add_organ(position, outcome.organ.as_str(), &outcome.input, output);
            }
        }
        let path = output_dir.join(MANIFEST_FILE_NAME);
        manifest.export_csv(&path)?;
        info!(path = %path.display(), rows = manifest.rows().len(), "Wrote annotation manifest");
        Ok(path)
    }
}
