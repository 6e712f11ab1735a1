//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured store and report what it holds.
//! - Keep output deterministic for quick local sanity checks.

use schoolbook_core::{core_version, init_logging, AppConfig, School};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("schoolbook logging disabled: {err}");
        }
    }

    let school = match School::open(config.store.clone()).await {
        Ok(school) => school,
        Err(err) => {
            log::error!("event=cli_open module=cli status=error error={err}");
            eprintln!("schoolbook failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("schoolbook_core version={}", core_version());
    println!("students={}", school.students().len().await);
    println!("teachers={}", school.teachers().len().await);
    println!("courses={}", school.courses().len().await);
    println!("resources={}", school.resources().len().await);
    ExitCode::SUCCESS
}
