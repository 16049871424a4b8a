use std::process::ExitCode;

use clap::Args;
use clap::crate_version;

use crate::config::Settings;

#[derive(Args, Debug)]
pub struct VersionCommand;

pub async fn execute(action: &VersionCommand, settings: &Settings) -> ExitCode {
    match action {
        VersionCommand {} => print_version(settings).await,
    }
    ExitCode::SUCCESS
}

pub async fn print_version(settings: &Settings) {
    println!("schema-guard version: {}", crate_version!());
    if !settings.enabled {
        println!("(disabled in configuration)");
    }
}
