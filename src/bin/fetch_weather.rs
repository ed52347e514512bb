use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use weather_pipeline::{OpenWeatherMapClient, cli, stages};

#[derive(FromArgs)]
/// Fetch current weather for validated_location.txt and write weather_data.txt
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

    let client = match OpenWeatherMapClient::new(&config.weather) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to create weather client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = stages::fetch_weather(&config, &client, &mut io::stdout().lock());
    stages::exit_code(&result)
}
