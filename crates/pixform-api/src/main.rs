use pixform_core::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServiceConfig::from_env()?;

    let (_state, router) = pixform_api::setup::initialize_app(config.clone()).await?;

    pixform_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
