use ils_connector::Connector;
use ils_connector::filter::Filter;
use ils_connector::schema::NAME;

use crate::config::Settings;

pub async fn run(connector: &Connector, settings: &Settings) -> Result<(), String> {
    println!("Scenario: search");

    let mut categories = Vec::new();
    connector
        .search("__GROUP__", None, None, |object| {
            categories.push(object.name().to_string());
            true
        })
        .await
        .map_err(|e| e.to_string())?;
    println!("Categories: {}", categories.join(", "));

    let patrons = connector
        .search("__ACCOUNT__", None, None, |_| true)
        .await
        .map_err(|e| e.to_string())?;
    println!("Patrons: {patrons}");

    if let Some(userid) = &settings.sample_userid {
        let filter = Filter::equals(NAME, userid.as_str());
        connector
            .search("__ACCOUNT__", Some(&filter), None, |object| {
                let keys = object.attributes().keys().cloned().collect::<Vec<String>>();
                println!("{} ({}): {}", object.name(), object.uid(), keys.join(", "));
                true
            })
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}
