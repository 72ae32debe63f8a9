use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod fix;
mod header;
mod report;
mod resequence;
mod schedule;
mod validate;

use cli::RootArgs;
use schedule::Schedule;

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let schedule = match &args.schedule {
        Some(path) => Schedule::load(path)?,
        None => Schedule::embedded()?,
    };
    let summary = resequence::run(&args.stories_dir, &schedule, args.mode())?;

    if args.json {
        println!("{}", report::render_json(&summary)?);
    } else {
        print!("{}", report::render_text(&summary));
    }

    Ok(if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
