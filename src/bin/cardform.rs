use anyhow::Result;
use cardform::cli;
use cardform::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // stdout carries the protocol, logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let code = cli::run(config).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
