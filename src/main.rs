use anyhow::Result;
use clap::Parser;
use sheet_linkcheck::cli;
use tracing::error;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        // Config and logging failures happen before any subscriber exists.
        if tracing::dispatcher::has_been_set() {
            error!("{:#}", err);
        } else {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
    Ok(())
}
