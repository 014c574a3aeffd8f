//! Settings command implementation
//!
//! Lists the clinical settings table with typed values.

use crate::adapters::postgresql::{PostgresAdapter, PostgresClient};
use crate::config::load_config;
use crate::core::settings::SettingsGate;
use clap::Args;
use std::sync::Arc;

/// Arguments for the settings command
#[derive(Args, Debug)]
pub struct SettingsArgs {}

impl SettingsArgs {
    /// Execute the settings command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("⚙️  Clinical Settings");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let client = match PostgresClient::new(config.database.clone()).await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        let adapter = Arc::new(PostgresAdapter::new(client));
        let gate = SettingsGate::new(adapter);

        let details = match gate.detailed().await {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to load clinical settings");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        if details.is_empty() {
            println!("No clinical settings configured.");
            return Ok(0);
        }

        println!(
            "{:<34} {:<10} {:<24} {:<20}",
            "Key", "Type", "Value", "Updated By"
        );
        println!("{}", "-".repeat(90));

        for detail in &details {
            let value = serde_json::to_string(&detail.value)?;
            println!(
                "{:<34} {:<10} {:<24} {:<20}",
                detail.key,
                detail.value_type.as_str(),
                value,
                detail.updated_by.as_deref().unwrap_or("-")
            );
        }

        println!();
        println!("{} setting(s)", details.len());

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_missing_config_is_config_error() {
        let args = SettingsArgs {};
        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
