//! Analyses a file with retdec.com and prints the report.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use retdec::{settings::DEFAULT_API_URL, AnalysisArguments, File, Fileinfo, OnError, Settings};

#[derive(clap::Parser)]
#[command(name = "fileinfo")]
#[command(version)]
#[command(about = "Analyse a binary file with retdec.com")]
struct Args {
    /// API key to authenticate with
    #[arg(value_name = "API-KEY")]
    api_key: String,

    /// File to analyse
    #[arg(value_name = "FILE")]
    file: Utf8PathBuf,

    /// URL of the retdec.com API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Ask for a more detailed report
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = Settings::new()
        .with_api_key(&args.api_key)
        .with_api_url(&args.api_url);
    let fileinfo = Fileinfo::new(settings)?;

    let mut analysis = fileinfo.run_analysis(
        &AnalysisArguments::new()
            .with_verbose(args.verbose)
            .with_input_file(File::from_filesystem(args.file.clone())),
    )?;
    analysis.wait_until_finished(OnError::Raise)?;

    print!("{}", analysis.output()?);
    Ok(())
}
