use anyhow::Context;

use lifeview::ViewerConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::default().apply_env();
    config.validate().context("invalid viewer configuration")?;

    lifeview::run(config).context("viewer stopped with an error")
}
