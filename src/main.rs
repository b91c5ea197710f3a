//! Binary entrypoint for the `gitversion` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();

    match gitversion::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
