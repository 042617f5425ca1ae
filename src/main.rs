mod app;
mod commentary;
mod config;
mod driver;
mod engine;
mod grid;
mod store;

fn main() {
    env_logger::init();

    log::info!("LifeTorus - Conway's Game of Life on a torus");

    let config = config::Config::from_env();
    log::info!("state file: {}", config.state_path.display());
    log::info!("tick interval: {} ms", config.interval.as_millis());

    let mut app = app::App::new(config);
    if let Err(e) = app.run() {
        log::error!("stdin loop failed: {e}");
        std::process::exit(1);
    }
}
