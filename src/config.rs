use std::fs::File;
use std::path::Path;

use anyhow::Result;
use serde_derive::Deserialize;

use portal::services::SupabaseConfig;

#[derive(Debug, Deserialize)]
pub struct Configuration {
    pub supabase: SupabaseConfiguration,

    pub admin: Option<AdminConfiguration>,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct SupabaseConfiguration {
    pub url: String,
    pub anon_key: String,
}

impl From<SupabaseConfiguration> for SupabaseConfig {
    fn from(config: SupabaseConfiguration) -> Self {
        Self {
            baseurl: config.url,
            anon_key: config.anon_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminConfiguration {
    pub email: String,
    pub password: String,
}
