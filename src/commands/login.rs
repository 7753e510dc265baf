use agrosmart::advisor::Advisor;
use agrosmart::config::Config;
use anyhow::Result;

/// Check credentials against the auth service
pub fn execute(config: &Config, username: Option<String>) -> Result<i32> {
    let client = super::connect(config)?;
    let mut history = super::open_history(config);
    let advisor = Advisor::new(&client, &mut history);

    if super::authenticate(&advisor, config, username)? {
        Ok(0)
    } else {
        Ok(1)
    }
}
