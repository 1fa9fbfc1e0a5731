use clap::Parser;

use cashladder::cli::{self, output};

fn main() {
    let cli = cli::Cli::parse();

    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = cli::run(cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
