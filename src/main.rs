use log::LevelFilter;
use pnginator::cli::{self, Options};
use pnginator::{Encoder, Error};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    println!("{}\n", env!("CARGO_PKG_NAME"));

    let mut args = std::env::args();
    let name = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").into());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Usage(_)) => {
            print!("{}", cli::usage(&name));
            eprintln!("{err}");
            ExitCode::FAILURE
        },
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: impl Iterator<Item = String>) -> Result<(), Error> {
    let options = Options::parse(args)?;
    let mut encoder = Encoder::new();
    *encoder.settings_mut() = options.settings;

    let report = encoder.encode_file(&options.input, &options.output)?;
    if options.statistics {
        println!("{report}");
    }
    Ok(())
}
