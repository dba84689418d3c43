use fleet_replay::app::config::ReplayAppConfig;

/// writes the JSON schema of the replay configuration file to stdout
pub fn main() {
    let schema = schemars::schema_for!(ReplayAppConfig);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failure serializing configuration schema: {e}");
            std::process::exit(1);
        }
    }
}
