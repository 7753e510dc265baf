use agrosmart::config::Config;
use agrosmart::paths;
use anyhow::Result;
use serde_json::json;

/// Print the effective configuration
pub fn execute(config: &Config, json: bool) -> Result<i32> {
    if json {
        let info = json!({
            "config_path": paths::config_path(),
            "server": config.server,
            "username": config.username,
            "timeout_secs": config.timeout_secs,
            "data_dir": config.data_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(0);
    }

    println!("Config file: {}", paths::config_path().display());
    println!("Server:      {}", config.server);
    println!(
        "Username:    {}",
        config.username.as_deref().unwrap_or("(prompt)")
    );
    println!("Timeout:     {}s", config.timeout_secs);
    println!("Data dir:    {}", config.data_dir().display());
    Ok(0)
}
