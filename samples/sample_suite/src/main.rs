mod config;
mod scenarios;

use ils_connector::Connector;

use config::load_settings;

#[tokio::main]
async fn main() -> Result<(), String> {
    let settings = load_settings()?;
    let connector = Connector::new(settings.connector.clone()).map_err(|e| e.to_string())?;

    scenarios::connection::run(&connector).await?;
    scenarios::search::run(&connector, &settings).await?;

    Ok(())
}
