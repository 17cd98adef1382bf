use letterbox::Config;
use miette::Result;

/// Configuration file read from the working directory.
const CONFIG_PATH: &str = "letterbox.toml";

fn main() -> Result<()> {
    // Show info logs by default, override with `RUST_LOG`
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load_or_default(CONFIG_PATH)?;

    letterbox::run(config)
}
