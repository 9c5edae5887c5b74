//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::bundled_adapter::BundledDataAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::cache::SimulationCache;
use crate::domain::chart_data::ChartData;
use crate::domain::config_validation::{validate_config, MAX_PATHS};
use crate::domain::distribution::EstimationMode;
use crate::domain::error::StocksimError;
use crate::domain::simulation::{simulate_symbol, SimulationRun};
use crate::domain::simulator::PathSimulator;
use crate::ports::chart_port::{ChartLabels, ChartPort};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Simulate forward stock price paths")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate 30 days forward and write a chart
    Simulate {
        #[arg(long)]
        symbol: String,
        /// normal, lognormal or uniform
        #[arg(short, long)]
        distribution: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// price_level or log_return
        #[arg(long)]
        mode: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show estimated distribution parameters for a symbol
    Stats {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Effective settings after config defaults and CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub distribution: String,
    pub mode: EstimationMode,
    pub paths: usize,
    pub seed: Option<u64>,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            symbol,
            distribution,
            config,
            paths,
            seed,
            mode,
            output,
        } => {
            let overrides = Overrides {
                distribution,
                paths,
                seed,
                mode,
                output,
            };
            run_simulate(&symbol, config.as_ref(), overrides)
        }
        Command::ListSymbols { config } => run_list_symbols(config.as_ref()),
        Command::Stats {
            symbol,
            config,
            mode,
        } => run_stats(&symbol, config.as_ref(), mode.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub distribution: Option<String>,
    pub paths: Option<usize>,
    pub seed: Option<u64>,
    pub mode: Option<String>,
    pub output: Option<PathBuf>,
}

fn fail(err: StocksimError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Loads and validates `path`, or an empty config when no path is given.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, StocksimError> {
    let adapter = match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_data_port(config: &dyn ConfigPort) -> Box<dyn DataPort> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "bundled".to_string());
    match source.to_lowercase().as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| "data".to_string());
            Box::new(CsvAdapter::new(PathBuf::from(dir)))
        }
        _ => Box::new(BundledDataAdapter::new()),
    }
}

fn parse_mode(value: &str, section: &str, key: &str) -> Result<EstimationMode, StocksimError> {
    value
        .parse()
        .map_err(|reason| StocksimError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        })
}

pub fn resolve_mode(
    config: &dyn ConfigPort,
    mode_override: Option<&str>,
) -> Result<EstimationMode, StocksimError> {
    match mode_override {
        Some(m) => parse_mode(m, "cli", "mode"),
        None => match config.get_string("simulation", "estimation_mode") {
            Some(m) => parse_mode(&m, "simulation", "estimation_mode"),
            None => Ok(EstimationMode::default()),
        },
    }
}

pub fn build_settings(
    config: &dyn ConfigPort,
    overrides: Overrides,
) -> Result<SimulationSettings, StocksimError> {
    let mode = resolve_mode(config, overrides.mode.as_deref())?;

    let paths = match overrides.paths {
        Some(p) => p,
        None => usize::try_from(config.get_int("simulation", "paths", 1)).unwrap_or(0),
    };
    if !(1..=MAX_PATHS).contains(&paths) {
        return Err(StocksimError::ConfigInvalid {
            section: "cli".into(),
            key: "paths".into(),
            reason: format!("paths must be between 1 and {}", MAX_PATHS),
        });
    }

    let seed = match overrides.seed {
        Some(s) => Some(s),
        None => config
            .get_string("simulation", "seed")
            .and_then(|s| s.parse::<u64>().ok()),
    };

    let distribution = overrides
        .distribution
        .or_else(|| config.get_string("simulation", "distribution"))
        .unwrap_or_else(|| "normal".to_string());

    let output = overrides.output.unwrap_or_else(|| {
        PathBuf::from(
            config
                .get_string("chart", "output")
                .unwrap_or_else(|| "chart.svg".to_string()),
        )
    });

    Ok(SimulationSettings {
        distribution,
        mode,
        paths,
        seed,
        output,
        width: config.get_int("chart", "width", 800) as u32,
        height: config.get_int("chart", "height", 400) as u32,
    })
}

fn run_simulate(symbol: &str, config_path: Option<&PathBuf>, overrides: Overrides) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let settings = match build_settings(&config, overrides) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_port = build_data_port(&config);
    let chart = SvgChartAdapter::new(settings.width, settings.height);

    let mut cache = SimulationCache::new();
    let mut simulator = PathSimulator::seeded(settings.seed);

    match simulate_and_render(
        &mut cache,
        data_port.as_ref(),
        &mut simulator,
        &chart,
        symbol,
        &settings,
    ) {
        Ok(run) if run.is_empty() => {
            let err = StocksimError::UnknownSymbol {
                symbol: run.symbol.clone(),
            };
            eprintln!("No historical data for {}; nothing simulated", run.symbol);
            (&err).into()
        }
        Ok(run) => {
            print_summary(&run);
            eprintln!("\nChart written to: {}", settings.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Runs one simulation and hands the result to `chart`. An empty run (no
/// history for the symbol) renders nothing.
pub fn simulate_and_render(
    cache: &mut SimulationCache,
    data_port: &dyn DataPort,
    simulator: &mut PathSimulator,
    chart: &dyn ChartPort,
    symbol: &str,
    settings: &SimulationSettings,
) -> Result<SimulationRun, StocksimError> {
    let run = simulate_symbol(
        cache,
        data_port,
        simulator,
        symbol,
        &settings.distribution,
        settings.mode,
        settings.paths,
    )?;

    if let Some(history) = &run.history {
        let data = ChartData::from_run(history, &run.paths);
        let labels = ChartLabels::for_symbol(&run.symbol, run.distribution.name());
        chart.render(&data, &labels, &settings.output.to_string_lossy())?;
    }
    Ok(run)
}

fn print_summary(run: &SimulationRun) {
    eprintln!("\n=== {} ({}, {}) ===", run.symbol, run.distribution, run.mode);
    if let Some(history) = &run.history {
        eprintln!(
            "History:          {} points, {} to {}",
            history.len(),
            history.first().date,
            history.last().date
        );
        eprintln!("Last close:       {:.2}", history.last().price);
    }
    if let Some(p) = &run.params {
        eprintln!("Mean / stdev:     {:.6} / {:.6}", p.mean, p.stdev);
        eprintln!("Log mean / stdev: {:.6} / {:.6}", p.log_mean, p.log_stdev);
    }

    let finals: Vec<f64> = run.paths.iter().filter_map(|p| p.final_price()).collect();
    if let Some(path) = run.paths.first() {
        if let (Some(start), Some(end)) = (path.points.first(), path.points.last()) {
            eprintln!("Horizon:          {} to {}", start.date, end.date);
        }
    }
    if !finals.is_empty() {
        let mean = finals.iter().sum::<f64>() / finals.len() as f64;
        let min = finals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        eprintln!("Paths:            {}", finals.len());
        eprintln!("Final price:      mean {:.2}, min {:.2}, max {:.2}", mean, min, max);
    }
}

fn run_list_symbols(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let data_port = build_data_port(&config);

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_stats(symbol: &str, config_path: Option<&PathBuf>, mode: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let mode = match resolve_mode(&config, mode) {
        Ok(m) => m,
        Err(e) => return fail(e),
    };
    let data_port = build_data_port(&config);
    let symbol = symbol.trim().to_uppercase();

    let mut cache = SimulationCache::new();
    match cache.load(&symbol, mode, data_port.as_ref()) {
        Ok(Some((series, params))) => {
            println!("symbol:    {}", series.symbol());
            println!("mode:      {}", mode);
            println!("points:    {}", series.len());
            println!("range:     {} to {}", series.first().date, series.last().date);
            println!("mean:      {:.6}", params.mean);
            println!("stdev:     {:.6}", params.stdev);
            println!("log_mean:  {:.6}", params.log_mean);
            println!("log_stdev: {:.6}", params.log_stdev);
            ExitCode::SUCCESS
        }
        Ok(None) => fail(StocksimError::UnknownSymbol { symbol }),
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_config(Some(config_path)) {
        Ok(config) => {
            let source = config
                .get_string("data", "source")
                .unwrap_or_else(|| "bundled".to_string());
            eprintln!("Data source: {}", source);
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
