//! artifactor - deploy the newest release artifact of a project
//!
//! Reads provider credentials from a YAML deploy config and the project to
//! deploy from environment variables, downloads the release zip from GitHub
//! or GitLab and unpacks it into the mounted volume.

use clap::Parser;

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
