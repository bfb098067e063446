use std::io;

use log::info;

use vgg16::{Config, pipeline};

fn main() -> io::Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    info!("classifying '{}'", config.image.display());

    let mut stdout = io::stdout().lock();
    pipeline::run(&config, &mut stdout)?;

    Ok(())
}
