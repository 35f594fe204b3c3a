//! Decompiles a file with retdec.com and prints the decompiled code.

mod progress;

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use retdec::{
    settings::DEFAULT_API_URL, DecompilationArguments, Decompiler, File, OnError, Settings,
};

use crate::progress::DecompilationProgress;

#[derive(clap::Parser)]
#[command(name = "decompiler")]
#[command(version)]
#[command(about = "Decompile a binary file with retdec.com")]
struct Args {
    /// API key to authenticate with
    #[arg(value_name = "API-KEY")]
    api_key: String,

    /// File to decompile
    #[arg(value_name = "FILE")]
    file: Utf8PathBuf,

    /// URL of the retdec.com API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    api_url: String,
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
    let decompiler = Decompiler::new(settings)?;

    let mut decompilation = decompiler.run_decompilation(
        &DecompilationArguments::new()
            .with_mode("bin")
            .with_input_file(File::from_filesystem(args.file.clone())),
    )?;

    let progress = DecompilationProgress::new(decompilation.id());
    let finished = decompilation.wait_until_finished_with(
        |d| progress.set_completion(d.completion_cached()),
        OnError::Raise,
    );
    progress.finish_and_clear();
    finished?;

    print!("{}", decompilation.output_hll()?);
    Ok(())
}
