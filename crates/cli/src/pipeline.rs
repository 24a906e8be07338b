//! Before/after change detection run: gate inputs, load, detect, composite, save.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use changemask_algorithms::imagery::{detect_changes, ChangeDetectionParams, DEFAULT_THRESHOLD};
use changemask_colormap::composite;
use changemask_core::io::{self, check_format_compatibility};
use changemask_core::{Error, Result};

/// Output path used when none is given
pub const DEFAULT_OUTPUT: &str = "change_mask.tif";

/// Everything a run needs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub before: PathBuf,
    pub after: PathBuf,
    pub output: PathBuf,
    pub threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            before: PathBuf::new(),
            after: PathBuf::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Config with the default output path and threshold
    pub fn new(before: impl Into<PathBuf>, after: impl Into<PathBuf>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSummary {
    /// (bands, rows, cols) of the inputs
    pub shape: (usize, usize, usize),
    pub added: usize,
    pub removed: usize,
    pub output: PathBuf,
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Added: {}, Removed: {}", self.added, self.removed)
    }
}

/// Both inputs must exist before anything else is checked
pub fn check_inputs_exist(before: &Path, after: &Path) -> Result<()> {
    for path in [before, after] {
        if !path.exists() {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Run the whole detection for `config`.
///
/// Inputs are checked for existence and a matching allowed extension before
/// either file is opened. The overlay is written only once detection and
/// compositing have succeeded.
pub fn run(config: &PipelineConfig) -> Result<ChangeSummary> {
    check_inputs_exist(&config.before, &config.after)?;
    let format = check_format_compatibility(&config.before, &config.after)?;
    debug!("Input format: {:?}", format);

    let params = ChangeDetectionParams {
        threshold: config.threshold,
    };

    let (before, before_profile) = io::load(&config.before)?;
    let (after, after_profile) = io::load(&config.after)?;
    info!("Loaded images with shape: {:?}", before.shape());

    if let (Some(a), Some(b)) = (&before_profile.crs, &after_profile.crs) {
        if !a.is_equivalent(b) {
            warn!("Input CRS differ ({} vs {}); output uses {}", a, b, a);
        }
    }

    let masks = detect_changes(&before, &after, params)?;
    let summary = ChangeSummary {
        shape: before.shape(),
        added: masks.added_count(),
        removed: masks.removed_count(),
        output: config.output.clone(),
    };
    info!("Detected changes: {}", summary);

    let overlay = composite(&masks.added, &masks.removed)?;
    io::save_overlay(&overlay, &before_profile, &config.output)?;
    info!("Change mask saved to {}", config.output.display());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use changemask_core::io::write_raster_stack;
    use changemask_core::{GeoTransform, MultiBandRaster, RasterProfile, CRS};
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, name: &str, data: Vec<f64>, shape: (usize, usize, usize)) -> PathBuf {
        let (bands, rows, cols) = shape;
        let raster = MultiBandRaster::from_vec(data, bands, rows, cols).unwrap();
        let mut profile = RasterProfile::new(cols, rows, bands);
        profile.transform = GeoTransform::new(272_000.0, 2_110_000.0, 0.5, -0.5);
        profile.crs = Some(CRS::from_epsg(32643));
        let path = dir.path().join(name);
        write_raster_stack(&raster, &profile, &path).unwrap();
        path
    }

    fn config(dir: &TempDir, before: PathBuf, after: PathBuf) -> PipelineConfig {
        PipelineConfig {
            output: dir.path().join("change_mask.tif"),
            ..PipelineConfig::new(before, after)
        }
    }

    #[test]
    fn default_config() {
        assert_eq!(PipelineConfig::default().output, PathBuf::from(DEFAULT_OUTPUT));
        let config = PipelineConfig::new("a.tif", "b.tif");
        assert_eq!(config.output, PathBuf::from("change_mask.tif"));
        assert_eq!(config.threshold, 0.1);
    }

    #[test]
    fn end_to_end_two_by_two() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 0.0, 10.0, 10.0], (1, 2, 2));
        let after = write_input(&dir, "after.tif", vec![0.0, 10.0, 10.0, 0.0], (1, 2, 2));
        let config = config(&dir, before, after);

        let summary = run(&config).unwrap();
        assert_eq!(summary.shape, (1, 2, 2));
        assert_eq!(summary.added, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.to_string(), "Added: 1, Removed: 1");

        let (overlay, profile) = io::load(&config.output).unwrap();
        assert_eq!(overlay.shape(), (3, 2, 2));
        assert_eq!(profile.count, 3);
        assert_eq!(profile.crs, Some(CRS::from_epsg(32643)));
        assert_eq!(profile.transform, GeoTransform::new(272_000.0, 2_110_000.0, 0.5, -0.5));

        // (0,1) green, (1,1) red, others black
        let pixel = |r, c| {
            [
                overlay.get(0, r, c).unwrap(),
                overlay.get(1, r, c).unwrap(),
                overlay.get(2, r, c).unwrap(),
            ]
        };
        assert_eq!(pixel(0, 1), [0.0, 255.0, 0.0]);
        assert_eq!(pixel(1, 1), [255.0, 0.0, 0.0]);
        assert_eq!(pixel(0, 0), [0.0, 0.0, 0.0]);
        assert_eq!(pixel(1, 0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn three_band_inputs() {
        let dir = TempDir::new().unwrap();
        // after is flat in every band so it normalizes to zeros: pixel 0 stays
        // at 0 while pixel 1 drops from 1 to 0 in all three bands
        let before = write_input(&dir, "before.tif", vec![0.0, 5.0, 0.0, 5.0, 0.0, 5.0], (3, 1, 2));
        let after = write_input(&dir, "after.tif", vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0], (3, 1, 2));

        let summary = run(&config(&dir, before, after)).unwrap();
        assert_eq!(summary.shape, (3, 1, 2));
        assert_eq!((summary.added, summary.removed), (0, 1));
    }

    #[test]
    fn missing_input_reported_first() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 1.0], (1, 1, 2));
        let after = dir.path().join("missing.img");

        let err = run(&config(&dir, before, after.clone())).unwrap_err();
        match err {
            Error::InputNotFound { path } => assert_eq!(path, after),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn format_gate_runs_before_any_read() {
        let dir = TempDir::new().unwrap();
        // neither file is a raster; reading either would fail as UnreadableFile
        let before = dir.path().join("before.tif");
        let after = dir.path().join("after.img");
        std::fs::write(&before, b"not a raster").unwrap();
        std::fs::write(&after, b"not a raster").unwrap();
        let config = config(&dir, before, after);

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { .. }), "got {err}");
        assert!(!config.output.exists());
    }

    #[test]
    fn shape_mismatch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 1.0, 2.0, 3.0], (1, 2, 2));
        let after = write_input(&dir, "after.tif", vec![0.0, 1.0, 2.0], (1, 1, 3));
        let config = config(&dir, before, after);

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn unreadable_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 1.0], (1, 1, 2));
        let after = dir.path().join("after.tif");
        std::fs::write(&after, b"II*\0garbage").unwrap();
        let config = config(&dir, before, after);

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::UnreadableFile { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn non_finite_threshold_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 1.0], (1, 1, 2));
        let after = write_input(&dir, "after.tif", vec![1.0, 0.0], (1, 1, 2));
        let config = PipelineConfig {
            threshold: f64::INFINITY,
            ..config(&dir, before, after)
        };

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "threshold", .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn strict_threshold_from_config() {
        let dir = TempDir::new().unwrap();
        let before = write_input(&dir, "before.tif", vec![0.0, 2.0, 4.0], (1, 1, 3));
        let after = write_input(&dir, "after.tif", vec![0.0, 4.0, 2.0], (1, 1, 3));
        let config = PipelineConfig {
            threshold: 0.5,
            ..config(&dir, before, after)
        };

        let summary = run(&config).unwrap();
        assert_eq!((summary.added, summary.removed), (0, 0));
        assert!(config.output.exists());
    }
}
