use ils_connector::Connector;
use ils_connector::resource::ResourceKind;

pub async fn run(connector: &Connector) -> Result<(), String> {
    println!("Scenario: connection");

    for kind in ResourceKind::ALL {
        let schema = connector.schema().for_kind(kind);
        println!("{kind}: {} attribute(s)", schema.len());
    }

    connector.test_connection().await.map_err(|e| e.to_string())?;
    println!("Connection test passed");

    Ok(())
}
