use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use weather_pipeline::{NominatimGeocoder, OpenWeatherMapClient, cli, stages};

#[derive(FromArgs)]
/// Run location validation and the weather fetch in one process
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

    let clients = NominatimGeocoder::new(&config.geocoder)
        .and_then(|geocoder| Ok((geocoder, OpenWeatherMapClient::new(&config.weather)?)));
    let (geocoder, weather) = match clients {
        Ok(clients) => clients,
        Err(e) => {
            eprintln!("❌ Failed to create HTTP clients: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = stages::run_pipeline(&config, &geocoder, &weather, &mut io::stdout().lock());
    stages::exit_code(&result)
}
