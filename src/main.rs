use std::process::ExitCode;

use schema_guard::{
    cli::{Cli, Context, ExitOnErr},
    config::Settings,
    services::AppServices,
    utils,
};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = Settings::new().exit_on_err("Failed to load configuration");
    let cli = Cli::parse_args();

    let _guard = utils::logger::init_logging(&settings.logs);

    let app_services = AppServices::new(&settings).exit_on_err("Failed to initialize services");

    cli.execute(&Context {
        settings: &settings,
        services: &app_services,
    })
    .await
}
