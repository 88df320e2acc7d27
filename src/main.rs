//! taskrank - priority ranking for task batches

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskrank::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
