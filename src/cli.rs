//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::{JsonReportAdapter, TextReportAdapter};
use crate::domain::bar::Resolution;
use crate::domain::error::RobofundError;
use crate::domain::frame::Column;
use crate::domain::fund_metrics::FundMetrics;
use crate::domain::indicator::{FibParams, SarParams};
use crate::domain::instrument::contract_spec;
use crate::domain::simulator::{simulate_trades, ScanWindow, SimulationConfig, StopMode};
use crate::domain::stats::compute_running_stats;
use crate::domain::summary::{PerformanceSummary, DEFAULT_RISK_FREE_RATE};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "robofund", about = "Technical indicator engine and backtest simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over signal-annotated bar files
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the [data] path from the config
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Instrument(s) to run; independent series run in parallel
        #[arg(short, long, required = true)]
        instrument: Vec<String>,
        #[arg(short, long, default_value = "MINUTE_10")]
        resolution: String,
        /// Report destination; "-" for stdout
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Emit the machine-consumable JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compute the indicator catalogue and write the enriched series as CSV
    Indicators {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        instrument: String,
        #[arg(short, long, default_value = "MINUTE_10")]
        resolution: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List instruments available in a data directory
    ListInstruments {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Show the data range for an instrument
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        instrument: String,
        #[arg(short, long, default_value = "MINUTE_10")]
        resolution: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            instrument,
            resolution,
            output,
            json,
        } => run_backtest(&config, data, &instrument, &resolution, &output, json),
        Command::Indicators {
            data,
            instrument,
            resolution,
            output,
        } => run_indicators(&data, &instrument, &resolution, &output),
        Command::ListInstruments { data } => run_list_instruments(&data),
        Command::Info {
            data,
            instrument,
            resolution,
        } => run_info(&data, &instrument, &resolution),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn run_backtest(
    config_path: &PathBuf,
    data_override: Option<PathBuf>,
    instruments: &[String],
    resolution: &str,
    output: &str,
    json: bool,
) -> Result<(), RobofundError> {
    let resolution = Resolution::from_str(resolution)?;
    let config =
        FileConfigAdapter::from_file(config_path).map_err(|e| RobofundError::ConfigParse {
            file: config_path.display().to_string(),
            reason: e.to_string(),
        })?;

    let data_path = match data_override {
        Some(path) => path,
        None => PathBuf::from(config.get_string("data", "path").ok_or_else(|| {
            RobofundError::ConfigMissing {
                section: "data".into(),
                key: "path".into(),
            }
        })?),
    };

    let scan_bars = config.get_int("backtest", "scan_bars", 0);
    let scan = if scan_bars > 0 {
        ScanWindow::Bars(scan_bars as usize)
    } else {
        ScanWindow::ToEnd
    };
    let stop_mode = if config.get_bool("backtest", "trailing", false) {
        StopMode::Trailing {
            step: config.get_double("backtest", "trailing_step", 0.0),
        }
    } else {
        StopMode::Static
    };
    let sim_config = SimulationConfig { scan, stop_mode };

    let notional = config.get_double("backtest", "notional_value", 0.0);
    let margin_rate = config.get_double("backtest", "margin_rate", 0.0);
    let risk_free_rate =
        config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE);

    // Independent series are embarrassingly parallel: one worker owns one
    // full series for the duration of its computation.
    let summaries: Vec<Result<(), RobofundError>> = instruments
        .par_iter()
        .map(|instrument| {
            let adapter = CsvAdapter::new(data_path.clone());
            let data = adapter.fetch_market_data(instrument, resolution)?;
            let signals = data.signals.ok_or_else(|| RobofundError::Data {
                reason: format!(
                    "{} has no signal columns; the backtest needs a strategy-annotated file",
                    instrument
                ),
            })?;

            let mut metrics = FundMetrics::new(data.series)?;
            metrics.set_signals(signals)?;

            let result = simulate_trades(metrics.bars(), &metrics.signals, &sim_config)?;

            let mut spec = contract_spec(instrument);
            if notional > 0.0 {
                spec.notional_value = notional;
            }
            if margin_rate > 0.0 {
                spec.margin_rate = margin_rate;
            }

            let stats = compute_running_stats(
                metrics.bars(),
                &metrics.signals,
                &result,
                spec.notional_value,
            )?;
            let summary =
                PerformanceSummary::compute(&result.trades, &stats, &spec, risk_free_rate);

            let destination = if output == "-" || instruments.len() == 1 {
                output.to_string()
            } else {
                format!("{}.{}", output, instrument)
            };
            if json {
                JsonReportAdapter.write(&summary, &result.trades, &destination)?;
            } else {
                TextReportAdapter.write(&summary, &result.trades, &destination)?;
            }
            Ok(())
        })
        .collect();

    for outcome in summaries {
        outcome?;
    }
    Ok(())
}

fn run_indicators(
    data: &PathBuf,
    instrument: &str,
    resolution: &str,
    output: &PathBuf,
) -> Result<(), RobofundError> {
    let resolution = Resolution::from_str(resolution)?;
    let adapter = CsvAdapter::new(data.clone());
    let market = adapter.fetch_market_data(instrument, resolution)?;

    let spec = contract_spec(instrument);
    let mut metrics = FundMetrics::new(market.series)?;
    metrics.set_adx(14)?;
    metrics.set_parabolic_sar(&SarParams::default())?;
    metrics.set_linear_regression(21)?;
    metrics.set_squeeze(20, 200, 20, 150)?;
    metrics.set_fibonacci(&FibParams {
        threshold_pips: 50.0,
        pip_size: spec.pip_size,
    })?;

    write_enriched_csv(&metrics, output)
}

fn write_enriched_csv(metrics: &FundMetrics, output: &PathBuf) -> Result<(), RobofundError> {
    let mut wtr = csv::Writer::from_path(output).map_err(|e| RobofundError::Data {
        reason: format!("failed to write {}: {}", output.display(), e),
    })?;

    let column_names: Vec<String> = metrics
        .frame
        .column_names()
        .map(|s| s.to_string())
        .collect();
    let mut header = vec![
        "snapshotTimeUTC".to_string(),
        "openPrice".to_string(),
        "highPrice".to_string(),
        "lowPrice".to_string(),
        "closePrice".to_string(),
        "volume".to_string(),
    ];
    header.extend(column_names.iter().cloned());
    wtr.write_record(&header).map_err(|e| RobofundError::Data {
        reason: format!("CSV write error: {}", e),
    })?;

    for (i, bar) in metrics.bars().iter().enumerate() {
        let mut record = vec![
            bar.snapshot_time_utc.format("%Y-%m-%dT%H:%M:%S").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        for name in &column_names {
            let cell = match metrics.frame.column(name) {
                Some(Column::Float(values)) => values[i]
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                Some(Column::Flag(values)) => values[i].to_string(),
                None => String::new(),
            };
            record.push(cell);
        }
        wtr.write_record(&record).map_err(|e| RobofundError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

fn run_list_instruments(data: &PathBuf) -> Result<(), RobofundError> {
    let adapter = CsvAdapter::new(data.clone());
    for instrument in adapter.list_instruments()? {
        println!("{}", instrument);
    }
    Ok(())
}

fn run_info(data: &PathBuf, instrument: &str, resolution: &str) -> Result<(), RobofundError> {
    let resolution = Resolution::from_str(resolution)?;
    let adapter = CsvAdapter::new(data.clone());
    let market = adapter.fetch_market_data(instrument, resolution)?;
    let bars = market.series.bars();

    println!("Instrument:  {}", market.series.instrument());
    println!("Resolution:  {}", market.series.resolution());
    println!("Bars:        {}", bars.len());
    println!(
        "Range:       {} .. {}",
        bars[0].snapshot_time_utc,
        bars[bars.len() - 1].snapshot_time_utc
    );
    println!(
        "Signals:     {}",
        if market.signals.is_some() {
            "present"
        } else {
            "absent"
        }
    );
    Ok(())
}
