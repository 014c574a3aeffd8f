//! Validate-config command implementation

use crate::adapters::postgresql::PostgresClient;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also connect to the database and run the schema migration check
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🔍 Validating configuration: {config_path}");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration valid");

        if self.check_connection {
            let client = match PostgresClient::new(config.database.clone()).await {
                Ok(c) => c,
                Err(e) => {
                    println!("❌ Failed to create database client");
                    println!("   Error: {e}");
                    return Ok(4);
                }
            };

            if let Err(e) = client.test_connection().await {
                println!("❌ Database connection failed");
                println!("   Target: {}", client.connection_string_safe());
                println!("   Error: {e}");
                return Ok(4);
            }

            println!("✅ Connected to {}", client.connection_string_safe());
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_missing_config_is_config_error() {
        let args = ValidateArgs {
            check_connection: false,
        };
        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
