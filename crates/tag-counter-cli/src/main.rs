mod commands;
mod logging;
mod progress;
mod report;

use std::process;

use anyhow::Context;
use clap::Parser;
use commands::Cli;
use dotenv::dotenv;
use progress::CliReporter;
use report::ListingLimits;
use tag_counter_core::request::parse_extensions;
use tag_counter_core::{AppConfig, CountEngine, ProgressReporter, ScanRequest, SilentReporter};
use tracing::{debug, error};

fn main() {
    dotenv().ok();

    let args = Cli::parse();
    let _guard = logging::init_logger(args.show_debug);

    if let Err(err) = run(&args) {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = tag_counter_core::config::load_configuration()
        .context("Error loading configuration")?;
    debug!("config: {:?}", config);

    let extensions = match &args.extensions {
        Some(raw) => parse_extensions(raw),
        None => config.extensions.clone(),
    };
    let request = ScanRequest::new(&args.directory, &args.tag_name, &extensions)?;

    let mut engine = CountEngine::new(request);
    if args.show_debug {
        engine = engine.with_debug_sample(config.debug_sample_size);
    }

    let show_progress = args.show_progress || config.show_progress;
    let reporter: Box<dyn ProgressReporter> = if show_progress {
        Box::new(CliReporter::new())
    } else {
        Box::new(SilentReporter)
    };
    let result = engine.run(reporter.as_ref())?;

    let request = engine.request();
    if args.show_debug {
        println!(
            "{}",
            report::render_debug(request.root_directory(), result.debug_sample.as_ref())
        );
    }
    print!(
        "{}",
        report::render_report(request, &result, listing_limits(&config))
    );

    Ok(())
}

fn listing_limits(config: &AppConfig) -> ListingLimits {
    ListingLimits {
        limit: config.listing_limit,
        head: config.listing_head,
    }
}
