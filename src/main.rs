use clap::Parser;
use log::info;

use clusterplot::Args;

fn main() {
    let args = Args::parse();

    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    info!("Starting clusterplot...");

    let stdout = std::io::stdout();
    if let Err(e) = clusterplot::run(&args, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
