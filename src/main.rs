use log::info;
use session_login::{api, config::Config, session::SessionTokens, sled_db};

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;
    info!("starting with {:?}", config);

    let state = api::State {
        db: sled_db::open(&config.db_path)?,
        tokens: SessionTokens::new(config.token_secret.as_bytes()),
    };
    let app = api::app(state, &config.public_dir)?;

    info!("Server running on port {}", config.port);
    app.listen(format!("0.0.0.0:{}", config.port)).await?;
    Ok(())
}
