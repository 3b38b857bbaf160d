use anyhow::{Context, Result};
use clap::Parser;
use jmmc::*;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    simplelog::CombinedLogger::init(vec![simplelog::TermLogger::new(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )])
    .context("failed to install the logger")?;

    compile(args)
}
