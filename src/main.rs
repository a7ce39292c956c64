//! vigil: a terminal system monitor with a rolling metrics history.
//!
//! Run with:  `RUST_LOG=info vigil watch`

mod cli;
mod render;
mod watch;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vigil_system::{
    battery, disk, overview,
    process::{paginate, ProcessQuery, ProcessTable},
};

use crate::cli::{Cli, Command, ProcessArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    // Logs go to stderr so stdout stays clean for data.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("vigil v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(vigil_config::default_path);
    let config = vigil_config::load(&config_path)
        .with_context(|| format!("loading config from '{}'", config_path.display()))?;

    match cli.command {
        Command::Watch(args) => watch::run(config_path, config, args).await,
        Command::Overview { json } => {
            let host = overview::host_info();
            let (cpu, memory) = overview::usage();
            let disks = disk::list_disks();

            if json {
                #[derive(Serialize)]
                struct Overview<'a> {
                    host:   &'a vigil_core::state::HostInfo,
                    cpu:    &'a vigil_core::state::CpuInfo,
                    memory: &'a vigil_core::state::MemoryInfo,
                    disks:  &'a [vigil_core::state::DiskInfo],
                }
                let view = Overview { host: &host, cpu: &cpu, memory: &memory, disks: &disks };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::overview(&host, &cpu, &memory, &disks));
            }
            Ok(())
        }
        Command::Processes(args) => list_processes(&config, args),
        Command::Kill { pid } => {
            let table = ProcessTable::new();
            let name = table
                .terminate(pid)
                .with_context(|| format!("terminating PID {pid}"))?;
            println!("Process {name} (PID: {pid}) terminated.");
            Ok(())
        }
        Command::Battery { json } => {
            let status = battery::read_battery();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print!("{}", render::battery(status.as_ref()));
            }
            Ok(())
        }
    }
}

fn list_processes(config: &vigil_config::VigilConfig, args: ProcessArgs) -> Result<()> {
    let query = ProcessQuery {
        sort:   args.sort.unwrap_or(config.processes.sort),
        filter: args.filter,
    };
    let table = ProcessTable::new();
    let processes = table.list(&query);
    let page = paginate(&processes, args.page.saturating_sub(1), config.processes.page_size);

    if args.json {
        println!("{}", serde_json::to_string_pretty(page.items)?);
    } else {
        print!("{}", render::processes(&page, table.total_memory()));
    }
    Ok(())
}
