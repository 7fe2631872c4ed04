pub mod config {
    use std::fs;
    use std::path::Path;

    use serde::Deserialize;

    use ils_connector::ConnectorConfig;

    /// Live-server settings read from `settings.json` in the working directory.
    #[derive(Debug, Deserialize)]
    pub struct Settings {
        pub connector: ConnectorConfig,
        pub library_id: String,
        pub category_id: String,
    }

    pub fn load_settings() -> Result<Settings, String> {
        let mut path = std::env::current_dir().map_err(|e| e.to_string())?;
        path.push("settings.json");
        read_settings(&path)
    }

    fn read_settings(path: &Path) -> Result<Settings, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str(&contents).map_err(|e| format!("Invalid settings.json: {e}"))
    }
}
