use crate::analyzers::{DashboardAnalyzer, DashboardViews, GeoView, Geocoder, ViewRequest};
use crate::error::Result;
use crate::models::{Dataset, Selection};
use crate::processors::{CleaningReport, DataCleaner, IntegrityChecker, IntegrityReport};
use crate::readers::{DatasetLoader, ObservationReader};
use crate::utils::{ProgressReporter, Settings};
use std::path::Path;
use tracing::info;

/// Everything one invocation works from: settings plus the cleaned dataset.
///
/// Built fresh for every command and dropped when it finishes.
pub struct DashboardContext {
    pub settings: Settings,
    pub dataset: Dataset,
    pub cleaning: CleaningReport,
    pub integrity: IntegrityReport,
}

impl DashboardContext {
    /// Ingest and clean `input` (file, directory or zip archive)
    pub fn load(
        settings: Settings,
        input: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Self> {
        let reader = ObservationReader::from_settings(&settings);
        let raw = DatasetLoader::new(reader).load(input, progress)?;

        if let Some(p) = progress {
            p.set_message("Cleaning data...");
        }

        Self::from_dataset(settings, raw)
    }

    pub fn from_dataset(settings: Settings, raw: Dataset) -> Result<Self> {
        let cleaner = DataCleaner::with_columns(settings.numeric_columns.clone());
        let (dataset, cleaning) = cleaner.clean(raw.clone())?;
        let integrity = IntegrityChecker::new().check_integrity(&raw, &dataset, &cleaning);

        info!(
            records = dataset.len(),
            stations = integrity.station_count,
            "Dashboard context ready"
        );

        Ok(Self {
            settings,
            dataset,
            cleaning,
            integrity,
        })
    }

    fn analyzer(&self) -> DashboardAnalyzer<'_> {
        DashboardAnalyzer::new(&self.dataset, &self.settings.correlation_targets)
    }

    pub fn views(&self, request: &ViewRequest) -> Result<DashboardViews> {
        self.analyzer().build(request)
    }

    pub fn geo_view(
        &self,
        request: &ViewRequest,
        geocoder: &dyn Geocoder,
    ) -> Result<Selection<GeoView>> {
        self.analyzer()
            .geo_view(&request.pollutant, request.range, geocoder)
    }

    pub fn integrity_summary(&self) -> String {
        IntegrityChecker::new().generate_summary(&self.integrity)
    }
}
