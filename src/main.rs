// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line entry point: `generate`, `evaluate` and `send-cases`.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use discharge_search::geometry::Degree;
use discharge_search::search::{
    enumerate_send_cases, evaluate_wheel, generate_wheels, SendCaseOptions,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "discharge-search")]
#[command(about = "Verify discharging arguments on planar near-triangulations")]
struct Cli {
    /// 1 for debug, 2 for trace
    #[arg(short, long, global = true, default_value_t = 0)]
    verbosity: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the candidate wheel files for one hub degree
    Generate {
        /// Hub degree of the wheels to generate
        #[arg(short, long)]
        degree: String,
        /// Directory of configuration files
        #[arg(short, long)]
        conf: PathBuf,
        /// Directory of send case files (.rule extension)
        #[arg(short, long)]
        send_case: PathBuf,
        /// Maximum degree to check (choosing degrees from {5, ..., 8, 9+} means 9)
        #[arg(short, long)]
        max_degree: usize,
        /// Directory the wheel files are placed in
        #[arg(short, long)]
        outdir: PathBuf,
    },
    /// Evaluate one wheel file, logging every overcharged cartwheel
    Evaluate {
        /// The wheel file to evaluate
        #[arg(short, long)]
        wheel: PathBuf,
        /// Directory of rule files
        #[arg(short, long)]
        rule: PathBuf,
        /// Directory of send case files (.rule extension)
        #[arg(short, long)]
        send_case: PathBuf,
        /// Directory of configuration files
        #[arg(short, long)]
        conf: PathBuf,
        /// Maximum degree to check
        #[arg(short, long)]
        max_degree: usize,
    },
    /// Enumerate the situations in which one degree sends charge to another
    SendCases {
        /// Degree of the vertex that sends charge; must be fixed
        #[arg(short, long)]
        from: String,
        /// Degree of the vertex that receives charge
        #[arg(short, long)]
        to: String,
        /// Directory of configuration files
        #[arg(short, long)]
        conf: PathBuf,
        /// Directory of rule files
        #[arg(short, long)]
        rule: PathBuf,
        /// Maximum degree to check
        #[arg(short, long)]
        max_degree: usize,
        /// Also require the reverse flow and log mutual cases
        #[arg(short, long)]
        bidirectional: bool,
        /// Directory for the emitted rule files; no files without it
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    if let Err(error) = run(cli.command) {
        tracing::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            degree,
            conf,
            send_case,
            max_degree,
            outdir,
        } => {
            let degree = Degree::from_str(&degree)?;
            if !degree.is_fixed() {
                bail!("the hub degree must be a fixed value");
            }
            let written = generate_wheels(degree.lower(), &conf, &send_case, max_degree, &outdir)?;
            tracing::info!("wrote {written} wheel files");
            Ok(())
        }
        Command::Evaluate {
            wheel,
            rule,
            send_case,
            conf,
            max_degree,
        } => {
            if !wheel.extension().is_some_and(|ext| ext == "wheel") {
                bail!("{} is not a .wheel file", wheel.display());
            }
            evaluate_wheel(&wheel, &rule, &send_case, &conf, max_degree)?;
            Ok(())
        }
        Command::SendCases {
            from,
            to,
            conf,
            rule,
            max_degree,
            bidirectional,
            outdir,
        } => {
            let send_degree = Degree::from_str(&from)?;
            let receive_degree = Degree::from_str(&to)?;
            if !send_degree.is_fixed() {
                bail!("the degree of the vertex that sends charge must be a fixed value");
            }
            if let Some(dir) = &outdir {
                if !dir.exists() {
                    bail!("the directory {} does not exist", dir.display());
                }
            }
            let confs = discharge_search::catalog::load_configurations(&conf)?;
            let rules = discharge_search::catalog::load_rules(&rule)?;
            let options = SendCaseOptions {
                send_degree,
                receive_degree,
                max_degree,
                bidirectional,
                out_dir: outdir,
            };
            enumerate_send_cases(&options, &confs, &rules)?;
            Ok(())
        }
    }
}
