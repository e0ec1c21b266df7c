mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod render;

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);
    let config = config::AppConfig::from_env();
    app::run(config)
}
