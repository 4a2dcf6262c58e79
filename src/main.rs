mod cli;
mod logging;
mod scenarios;

use std::error::Error;

use clap::Parser;
use lumber_capitator::{CapitatorConfig, load_config_from_path};

use cli::{Cli, Scenario};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => {
            let cfg = load_config_from_path(path)?;
            log::info!("loaded capitator config from {}", path.display());
            cfg
        }
        None => CapitatorConfig::default(),
    };

    let summary = match cli.scenario {
        Scenario::Fell {
            species,
            trunk,
            canopy,
            fungus,
        } => scenarios::fell(config, &species, trunk, canopy, fungus),
        Scenario::Abandon { phase, species } => scenarios::abandon(config, phase, &species),
        Scenario::Switch => scenarios::switch(config),
    };

    for note in &summary.notes {
        log::info!("{}: {}", summary.scenario, note);
    }
    log::info!(
        "{} {} after {} tick(s)",
        summary.scenario,
        if summary.passed { "passed" } else { "FAILED" },
        summary.ticks
    );
    if !summary.passed {
        return Err(format!("scenario {} did not meet its expectation", summary.scenario).into());
    }
    Ok(())
}
