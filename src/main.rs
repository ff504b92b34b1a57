use clap::Parser;
use robofund::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
