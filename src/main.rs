use std::time;

use env_logger::init_from_env;
use log::info;
use rsdos::{
    Result,
    cli::run,
};


fn main() -> Result<()> {
    let now = time::Instant::now();

    init_from_env(
        env_logger::Env::new().filter_or("RSDOS_LOG", "info"));

    run()?;

    info!("Time used: {:?}", now.elapsed());
    Ok(())
}
