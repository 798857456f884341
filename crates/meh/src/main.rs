//! Runs the hello handler once and prints its response.

use meh::config::Config;
use meh::dependencies::{LoggerKey, bootstrap};
use meh::handlers::hello;
use meh::logging::init_logging;
use meh_core::logger::Level;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config.log()?)?;

    let deps = bootstrap()?;
    match hello::handler(&deps) {
        Ok(body) => {
            println!("{body}");
            Ok(())
        }
        Err(err) => {
            if let Ok(logger) = deps.get::<LoggerKey>() {
                logger.report(Level::ERROR, &err);
            }
            Err(err.into())
        }
    }
}
