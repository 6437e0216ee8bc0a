#![warn(rust_2024_compatibility, clippy::all)]
#![allow(clippy::needless_pass_by_value)]

mod check;
mod cli;
mod config;
mod doctor;
mod output;
mod process;
mod project;
mod sink;
mod watch;

use anyhow::Result;
use clap::Parser;

use check::run_once;
use cli::{Args, Command};
use doctor::run_doctor;
use watch::run_watch;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = args.config;
    match args.command {
        Command::Check(check) => run_once(check, config),
        Command::Watch(watch) => run_watch(watch, config),
        Command::Doctor(doctor) => run_doctor(doctor, config),
    }
}
