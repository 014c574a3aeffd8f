//! Status command implementation
//!
//! Shows note counts by lifecycle state and the number of live drafts.

use crate::adapters::postgresql::PostgresClient;
use crate::config::load_config;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("📊 Record Store Status");
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

        let note_rows = match client
            .query(
                "SELECT status, is_locked, COUNT(*) AS count \
                 FROM clinical_notes GROUP BY status, is_locked \
                 ORDER BY status, is_locked",
                &[],
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                println!("❌ Failed to query note counts");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("Store: {}", client.connection_string_safe());
        println!();
        println!("{:<12} {:<10} {:<10}", "Status", "Locked", "Notes");
        println!("{}", "-".repeat(34));

        let mut total: i64 = 0;
        for row in &note_rows {
            let status: String = row.get("status");
            let is_locked: bool = row.get("is_locked");
            let count: i64 = row.get("count");
            total += count;
            println!(
                "{:<12} {:<10} {:<10}",
                status,
                if is_locked { "yes" } else { "no" },
                count
            );
        }
        println!("{}", "-".repeat(34));
        println!("{:<23} {:<10}", "total", total);

        let addenda: i64 = client
            .query_one(
                "SELECT COUNT(*) FROM clinical_notes WHERE is_addendum = TRUE",
                &[],
            )
            .await
            .map(|row| row.get(0))
            .unwrap_or(0);

        let drafts: i64 = client
            .query_one("SELECT COUNT(*) FROM note_drafts", &[])
            .await
            .map(|row| row.get(0))
            .unwrap_or(0);

        println!();
        println!("Addenda: {addenda}");
        println!("Live drafts: {drafts}");

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_missing_config_is_config_error() {
        let args = StatusArgs {};
        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
