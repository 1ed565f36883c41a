//! `imseg` command line tool.
//!
//! ```bash
//! imseg segment object.png --output masked.png --mask mask.png
//! imseg segment object.png --policy center --report seg.json
//! imseg lbp texture.png --output codes.png
//! imseg clusters --values 1,2,3,50,51,52,100,101,102
//! imseg run analysis.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use imseg::cluster::{optimize_cluster_count, KMeans, KMeansParams};
use imseg::convert::{gray_view, rgb_from_color, segment_dynamic_image, to_luma_image};
use imseg::features::{parse_values, sample_intensities, DEFAULT_MAX_POINTS};
use imseg::io::{load_image, AnalysisConfig};
use imseg::texture::local_binary_pattern;
use imseg::threshold::{ReferencePolicy, RegionParams};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Otsu segmentation, cluster-count selection and LBP codes")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit tracing spans as JSON lines (requires the `tracing` feature)
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RegionArgs {
    /// Heuristic that decides which class is background: border or center
    #[arg(long, default_value = "border")]
    policy: ReferencePolicy,

    /// Border strip width as a fraction of each dimension
    #[arg(long, default_value_t = 0.1)]
    border_fraction: f32,

    /// Center window size as a fraction of each dimension
    #[arg(long, default_value_t = 0.1)]
    center_fraction: f32,
}

impl RegionArgs {
    fn params(&self) -> RegionParams {
        RegionParams {
            policy: self.policy,
            border_fraction: self.border_fraction,
            center_fraction: self.center_fraction,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Threshold an image and mask its background
    Segment {
        image: PathBuf,

        #[command(flatten)]
        region: RegionArgs,

        /// Masked RGB image
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Binary mask (foreground 255)
        #[arg(long)]
        mask: Option<PathBuf>,

        /// JSON summary with threshold and bounding box
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write the local binary pattern code image
    Lbp {
        image: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Pick the number of intensity clusters by silhouette score
    Clusters {
        /// Image whose pixel intensities are clustered
        #[arg(required_unless_present = "values", conflicts_with = "values")]
        image: Option<PathBuf>,

        /// Comma separated feature values instead of an image
        #[arg(long)]
        values: Option<String>,

        #[arg(long, default_value_t = 100)]
        max_iters: usize,

        /// Cap on sampled pixels, 0 keeps all
        #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
        max_points: usize,
    },
    /// Run everything listed in a JSON config
    Run { config: PathBuf },
}

fn init_logging(verbose: u8, json: bool) -> CliResult<()> {
    #[cfg(feature = "tracing")]
    {
        imseg::core::init_tracing(json, imseg::core::level_from_verbosity(verbose));
        let _ = LogTracer::init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        imseg::core::init_from_verbosity(verbose)?;
        if json {
            log::warn!("--json-logs needs the `tracing` feature; using plain logs");
        }
    }
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Segment {
            image,
            region,
            output,
            mask,
            report,
        } => segment(image, region.params(), output, mask, report),
        Commands::Lbp { image, output } => lbp(image, output),
        Commands::Clusters {
            image,
            values,
            max_iters,
            max_points,
        } => clusters(image, values, max_iters, max_points),
        Commands::Run { config } => run(config),
    }
}

fn segment(
    image: PathBuf,
    params: RegionParams,
    output: Option<PathBuf>,
    mask: Option<PathBuf>,
    report: Option<PathBuf>,
) -> CliResult<()> {
    let img = load_image(&image)?;
    let seg = segment_dynamic_image(&img, &params)?;

    if let Some(path) = output {
        rgb_from_color(&seg.image)?.save(&path)?;
        println!("wrote masked image to {}", path.display());
    }
    if let Some(path) = mask {
        to_luma_image(&seg.mask.to_gray_image())?.save(&path)?;
        println!("wrote mask to {}", path.display());
    }

    let summary = seg.summary();
    match seg.bounding_box {
        Some(b) => println!(
            "threshold={} reference={} bbox=({}, {})-({}, {}) foreground={:.4}",
            seg.threshold,
            seg.reference,
            b.min_row,
            b.min_col,
            b.max_row,
            b.max_col,
            seg.foreground_ratio
        ),
        None => println!(
            "threshold={} reference={} bbox=none foreground=0",
            seg.threshold, seg.reference
        ),
    }

    if let Some(path) = report {
        std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        println!("wrote report JSON to {}", path.display());
    }
    Ok(())
}

fn lbp(image: PathBuf, output: PathBuf) -> CliResult<()> {
    let luma = load_image(&image)?.to_luma8();
    let codes = local_binary_pattern(&gray_view(&luma));
    to_luma_image(&codes)?.save(&output)?;
    println!("wrote LBP codes to {}", output.display());
    Ok(())
}

fn clusters(
    image: Option<PathBuf>,
    values: Option<String>,
    max_iters: usize,
    max_points: usize,
) -> CliResult<()> {
    let features = match (values, image) {
        (Some(raw), _) => parse_values(&raw)?,
        (None, Some(path)) => {
            let luma = load_image(&path)?.to_luma8();
            sample_intensities(&gray_view(&luma), max_points)
        }
        (None, None) => return Err("either an image or --values is required".into()),
    };

    let mut provider = KMeans::new(KMeansParams { max_iters });
    let sel = optimize_cluster_count(&features, &mut provider)?;
    for s in &sel.scores {
        println!("k={} silhouette={:.4}", s.k, s.score);
    }
    println!("best k={} silhouette={:.4}", sel.best_k, sel.best_score);
    Ok(())
}

fn run(config: PathBuf) -> CliResult<()> {
    let cfg = AnalysisConfig::load_json(&config)?;
    let report = imseg::io::run_analysis(&cfg)?;
    let path = cfg.report_path();
    report.write_json(&path)?;
    println!("wrote report JSON to {}", path.display());
    Ok(())
}
