use clap::Parser;
use crossbeam_channel::{bounded, Receiver};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use strum::{Display as StrumDisplay, EnumString};
use tracesight::{
    start_feed_thread, ClusterIndex, Dashboard, PipelineConfig, RawPoint, Snapshot, SyntheticFeed,
    TraceSightResult,
};

const CHANNEL_SIZE: usize = 100;

/*-------------------------------------------------------------------------------------------------
 *                                     Command Line Options
 *-----------------------------------------------------------------------------------------------*/

/// How to print the final snapshot.
#[derive(Debug, Clone, Copy, StrumDisplay, EnumString)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    Text,
    Json,
}

///
/// Analyze geolocation traces.
///
/// Cleans the raw points, groups them into activity clusters, flags speed anomalies and
/// bottlenecks, and scores the overall safety of the traces.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "tracesight")]
#[clap(author, version, about)]
struct TraceSightOptionsInit {
    /// A JSON file holding an array of raw points, or a directory of such files.
    ///
    /// Files in a directory are processed in name order, each one replacing the previous
    /// results. If this is not specified, then the program will check for it in the
    /// "TRACESIGHT_INPUT" environment variable.
    #[clap(env = "TRACESIGHT_INPUT")]
    input: PathBuf,

    /// Output format for the final results, text or json.
    #[clap(short, long)]
    #[clap(default_value_t=OutputFormat::Text)]
    format: OutputFormat,

    /// Number of synthetic real-time points to append after the input is loaded.
    #[clap(short, long, default_value_t = 0)]
    realtime: usize,

    /// Milliseconds between synthetic points.
    #[clap(long, default_value_t = 1_000)]
    interval_ms: u64,

    /// Seed for the synthetic feed, random if not given.
    #[clap(long)]
    seed: Option<u64>,

    /// Neighbor search for clustering, grid or pairwise.
    #[clap(long, default_value_t=ClusterIndex::Grid)]
    cluster_index: ClusterIndex,

    /// Maximum number of raw points retained in real-time mode.
    #[clap(long, default_value_t = tracesight::config::DEFAULT_HISTORY_LIMIT)]
    history: usize,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct TraceSightOptionsChecked {
    input_files: Vec<PathBuf>,
    format: OutputFormat,
    realtime: usize,
    interval: Duration,
    seed: Option<u64>,
    config: PipelineConfig,
    verbose: bool,
}

impl Display for TraceSightOptionsChecked {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "   Input Files: {}", self.input_files.len())?;
        writeln!(f, "        Format: {}", self.format)?;
        writeln!(f, "     Real-time: {} points", self.realtime)?;
        writeln!(f, "      Interval: {} ms", self.interval.as_millis())?;
        writeln!(f, " Cluster Index: {}", self.config.cluster_index)?;
        writeln!(f, "       History: {}", self.config.history_limit)?;
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/// Get the command line arguments and check them.
fn parse_args() -> TraceSightResult<TraceSightOptionsChecked> {
    let TraceSightOptionsInit {
        input,
        format,
        realtime,
        interval_ms,
        seed,
        cluster_index,
        history,
        verbose,
    } = TraceSightOptionsInit::parse();

    let input_files = find_input_files(&input);
    if input_files.is_empty() {
        return Err(format!("no JSON input found at {}", input.display()).into());
    }

    let config = PipelineConfig::default()
        .with_cluster_index(cluster_index)
        .with_history_limit(history);

    Ok(TraceSightOptionsChecked {
        input_files,
        format,
        realtime,
        interval: Duration::from_millis(interval_ms),
        seed,
        config,
        verbose,
    })
}

fn find_input_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_owned()];
    }

    walkdir::WalkDir::new(input)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_map(|res| res.ok())
        // Ignore directories, WalkDir will take care of recursing into them.
        .filter(|entry| entry.path().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".json"))
        .map(|entry| entry.into_path())
        .collect()
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> TraceSightResult<()> {
    let opts = parse_args()?;

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .with_module_level("tracesight", LevelFilter::Debug)
        .init()?;

    if opts.verbose {
        log::info!("{}", opts);
    }

    let dashboard = Arc::new(Dashboard::new(opts.config));
    log::debug!("Pipeline configuration: {:?}", dashboard.config());

    for path in &opts.input_files {
        log::debug!("Processing {}", path.display());
        if let Err(err) = load_batch(&dashboard, path) {
            log::error!("Skipping {}: {}", path.display(), err);
        }
    }

    if dashboard.snapshot().is_none() {
        return Err("no input file produced any valid data".into());
    }

    if opts.realtime > 0 {
        let feed = match opts.seed {
            Some(seed) => SyntheticFeed::seeded(seed),
            None => SyntheticFeed::from_entropy(),
        };

        let (to_analysis, from_feed) = bounded(CHANNEL_SIZE);

        let feed_thread = start_feed_thread(
            feed,
            Arc::clone(&dashboard),
            opts.interval,
            Some(opts.realtime),
            to_analysis,
        )?;
        let anal_thread = start_analysis_thread(from_feed, Arc::clone(&dashboard))?;

        let sent = feed_thread.join().unwrap();
        let processed = anal_thread.join().unwrap();
        log::info!("Real-time feed sent {} points, {} processed.", sent, processed);
    }

    let snapshot = dashboard
        .snapshot()
        .ok_or("the dashboard lost its snapshot")?;
    print_snapshot(&snapshot, opts.format)?;

    Ok(())
}

fn load_batch(dashboard: &Dashboard, path: &Path) -> TraceSightResult<()> {
    let text = std::fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&text)?;
    let raw = RawPoint::list_from_json(doc)?;

    dashboard.ingest_batch(raw)?;

    Ok(())
}

fn start_analysis_thread(
    from_feed: Receiver<RawPoint>,
    dashboard: Arc<Dashboard>,
) -> TraceSightResult<JoinHandle<usize>> {
    let jh = thread::Builder::new()
        .name("tracesight-analysis".to_owned())
        .spawn(move || {
            let mut processed = 0;
            for raw in from_feed {
                match dashboard.append_point(raw) {
                    Ok(_) => processed += 1,
                    Err(err) => log::warn!("Synthetic point rejected: {}", err),
                }
            }

            processed
        })?;

    Ok(jh)
}

fn print_snapshot(snapshot: &Snapshot, format: OutputFormat) -> TraceSightResult<()> {
    match format {
        OutputFormat::Text => print!("{}", snapshot),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
    }

    Ok(())
}
