use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use miette::Result;
use uf2patch::{
    cli::{config::Config, erase_region, image_info, EraseRegionArgs, InfoArgs},
    logging::initialize_logger,
};

#[derive(Debug, Parser)]
#[command(about, propagate_version = true, version)]
struct Cli {
    #[command(subcommand)]
    subcommand: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Append erase blocks covering a flash region to a UF2 image
    EraseRegion(EraseRegionArgs),
    /// Display information about a UF2 image and exit
    Info(InfoArgs),
}

fn main() -> Result<()> {
    miette::set_panic_hook();
    initialize_logger(LevelFilter::Info);

    // Attempt to parse any provided command-line arguments, or print the
    // help message and terminate if the invocation is not correct.
    let args = Cli::parse().subcommand;
    debug!("{:#?}", args);

    // Load any user configuration, if present.
    let config = Config::load()?;

    // Execute the correct action based on the provided subcommand and its
    // associated arguments.
    match args {
        Commands::EraseRegion(args) => erase_region(args, &config),
        Commands::Info(args) => image_info(args),
    }
}
