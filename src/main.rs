mod cli;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use cli::{Cli, Commands};
use hostcopy::attrib::{self, Scope};
use hostcopy::walk::SourceFilter;
use hostcopy::{batch, loc, logging};

fn dispatch(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Attribute {
            reports,
            extension,
            hosts,
            scope,
            base_dir,
            patterns,
            intervals,
            json,
            blocks_out,
        } => {
            let mut target = Scope::new(&extension, &hosts).with_mode(scope);
            if let Some(base) = base_dir {
                target = target.with_base_dir(base);
            }
            let filter = SourceFilter::from_patterns_or_default(&patterns)?;
            attrib::run(
                &reports,
                &target,
                &filter,
                intervals,
                json,
                blocks_out.as_deref(),
            )
        }
        Commands::Batch {
            config,
            json,
            blocks_out,
        } => batch::run(&config, json, blocks_out.as_deref()),
        Commands::Loc {
            path,
            patterns,
            json,
        } => {
            let target = path.unwrap_or_else(|| PathBuf::from("."));
            let filter = SourceFilter::from_patterns_or_default(&patterns)?;
            loc::run(&target, &filter, json)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
