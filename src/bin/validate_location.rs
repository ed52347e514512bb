use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use weather_pipeline::{NominatimGeocoder, cli, stages};

#[derive(FromArgs)]
/// Validate the LOCATION variable against the geocoder and write validated_location.txt
struct Args {
    /// path to a TOML settings file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// enable debug logging on stderr
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let config = match cli::bootstrap(args.config, args.verbose) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let geocoder = match NominatimGeocoder::new(&config.geocoder) {
        Ok(geocoder) => geocoder,
        Err(e) => {
            eprintln!("❌ Failed to create geocoding client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = stages::validate_location(&config, &geocoder, &mut io::stdout().lock());
    stages::exit_code(&result)
}
