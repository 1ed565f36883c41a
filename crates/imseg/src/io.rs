//! JSON configuration, analysis runner and report for the `imseg` tool.

use crate::cluster::{
    optimize_cluster_count, ClusterCountSelection, ClusterError, KMeans, KMeansParams,
};
use crate::convert::{gray_view, rgb_from_color, segment_dynamic_image, to_luma_image};
use crate::core::ImageError;
use crate::features::{sample_intensities, DEFAULT_MAX_POINTS};
use crate::segment::{SegmentError, SegmentationSummary};
use crate::texture::local_binary_pattern;
use crate::threshold::{normalized_histogram, GrayHistogram, RegionParams, ThresholdError};
use image::ImageReader;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Buffer(#[from] ImageError),
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

/// Cluster-count sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cap on sampled pixel intensities; `0` keeps all of them.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    #[serde(default)]
    pub kmeans: KMeansParams,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            kmeans: KMeansParams::default(),
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub image_path: String,
    /// Where images and the report go. Nothing but the report is written
    /// when unset.
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub segment: RegionParams,
    #[serde(default)]
    pub cluster: Option<ClusterConfig>,
    #[serde(default)]
    pub lbp: bool,
}

impl AnalysisConfig {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_dir: None,
            segment: RegionParams::default(),
            cluster: None,
            lbp: false,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn output_file(&self, name: &str) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| Path::new(dir).join(name))
    }

    /// Resolve the output report path.
    pub fn report_path(&self) -> PathBuf {
        self.output_file("report.json")
            .unwrap_or_else(|| PathBuf::from("imseg_report.json"))
    }
}

/// Compact description of an LBP code histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbpSummary {
    /// Most frequent code.
    pub dominant_code: u8,
    pub dominant_share: f64,
    /// Number of codes that occur at least once.
    pub distinct_codes: usize,
    pub histogram: Vec<f64>,
}

impl LbpSummary {
    pub fn from_histogram(hist: &GrayHistogram) -> Self {
        let dominant_code = hist.mode();
        Self {
            dominant_code,
            dominant_share: hist.bins()[dominant_code as usize],
            distinct_codes: hist.bins().iter().filter(|&&p| p > 0.0).count(),
            histogram: hist.bins().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_image: u64,
    pub segment: u64,
    pub clusters: u64,
    pub lbp: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputPaths {
    #[serde(default)]
    pub masked_image: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub lbp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub image_path: String,
    pub width: usize,
    pub height: usize,
    pub segmentation: SegmentationSummary,
    #[serde(default)]
    pub clusters: Option<ClusterCountSelection>,
    #[serde(default)]
    pub lbp: Option<LbpSummary>,
    #[serde(default)]
    pub outputs: OutputPaths,
    pub timings_ms: TimingsMs,
}

impl AnalysisReport {
    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> Result<image::DynamicImage, IoError> {
    Ok(ImageReader::open(path)?.decode()?)
}

fn timed_result<T, E, F: FnOnce() -> Result<T, E>>(f: F) -> Result<(T, u64), E> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed().as_millis() as u64))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Run everything `cfg` asks for and write the requested images.
///
/// The report itself is returned, not written; see
/// [`AnalysisConfig::report_path`].
pub fn run_analysis(cfg: &AnalysisConfig) -> Result<AnalysisReport, IoError> {
    let t_total = Instant::now();
    let mut timings = TimingsMs::default();

    let (img, ms) = timed_result(|| load_image(&cfg.image_path))?;
    timings.load_image = ms;
    let luma = img.to_luma8();
    let gray = gray_view(&luma);

    let (seg, ms) = timed_result(|| segment_dynamic_image(&img, &cfg.segment))?;
    timings.segment = ms;

    let mut outputs = OutputPaths::default();
    if let Some(dir) = cfg.output_dir.as_ref() {
        fs::create_dir_all(dir)?;
    }
    if let Some(path) = cfg.output_file("masked.png") {
        rgb_from_color(&seg.image)?.save(&path)?;
        outputs.masked_image = Some(path_string(&path));
    }
    if let Some(path) = cfg.output_file("mask.png") {
        to_luma_image(&seg.mask.to_gray_image())?.save(&path)?;
        outputs.mask = Some(path_string(&path));
    }

    let clusters = match cfg.cluster.as_ref() {
        Some(cc) => {
            let (sel, ms) = timed_result(|| {
                let features = sample_intensities(&gray, cc.max_points);
                optimize_cluster_count(&features, &mut KMeans::new(cc.kmeans.clone()))
            })?;
            timings.clusters = ms;
            Some(sel)
        }
        None => None,
    };

    let lbp = if cfg.lbp {
        let start = Instant::now();
        let codes = local_binary_pattern(&gray);
        let hist = normalized_histogram(&codes.view())?;
        timings.lbp = start.elapsed().as_millis() as u64;
        if let Some(path) = cfg.output_file("lbp.png") {
            to_luma_image(&codes)?.save(&path)?;
            outputs.lbp = Some(path_string(&path));
        }
        Some(LbpSummary::from_histogram(&hist))
    } else {
        None
    };

    timings.total = t_total.elapsed().as_millis() as u64;
    info!("analysis of {} done in {} ms", cfg.image_path, timings.total);

    Ok(AnalysisReport {
        image_path: cfg.image_path.clone(),
        width: gray.width,
        height: gray.height,
        segmentation: seg.summary(),
        clusters,
        lbp,
        outputs,
        timings_ms: timings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_sections() {
        let cfg: AnalysisConfig = serde_json::from_str(r#"{"image_path":"a.png"}"#).unwrap();
        assert_eq!(cfg.segment, RegionParams::default());
        assert!(cfg.cluster.is_none());
        assert!(!cfg.lbp);
        assert_eq!(cfg.report_path(), PathBuf::from("imseg_report.json"));

        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"image_path":"a.png","cluster":{},"output_dir":"out"}"#)
                .unwrap();
        assert_eq!(cfg.cluster, Some(ClusterConfig::default()));
        assert_eq!(cfg.report_path(), Path::new("out").join("report.json"));
    }

    #[test]
    fn lbp_summary_reports_dominant_code() {
        let mut counts = [0u64; 256];
        counts[255] = 6;
        counts[28] = 2;
        let hist = GrayHistogram::from_counts(&counts).unwrap();
        let summary = LbpSummary::from_histogram(&hist);
        assert_eq!(summary.dominant_code, 255);
        assert_eq!(summary.distinct_codes, 2);
        assert!((summary.dominant_share - 0.75).abs() < 1e-12);
    }
}
