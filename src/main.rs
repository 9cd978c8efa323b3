use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod manager;
mod output;
mod parser;
mod schema;
mod template;
mod validate;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    let workspace = args.workspace;
    match args.command {
        Command::New(args) => workflow::run_new(&workspace, args),
        Command::List(args) => workflow::run_list(&workspace, args),
        Command::Validate(args) => workflow::run_validate(&workspace, args),
        Command::Stats(args) => workflow::run_stats(&workspace, args),
        Command::Coverage(args) => workflow::run_coverage(&workspace, args),
        Command::Search(args) => workflow::run_search(&workspace, args),
    }
}
