//! Clinical settings gate
//!
//! Typed read interface over the settings store. Values are stored as
//! strings and coerced on read per their declared type; see
//! [`crate::domain::setting`] for the coercion contract.
//!
//! Lifetime policy: by default every read goes to the store, so policy
//! changes (notably `allow_post_signature_edits`) are observed immediately.
//! A short TTL cache can be enabled for deployments that need to shed read
//! load, trading bounded staleness.

use crate::adapters::database::traits::SettingsStore;
use crate::domain::setting::{ClinicalSetting, SettingDetail, SettingValue};
use crate::domain::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Setting key gating addendum creation
pub const ALLOW_POST_SIGNATURE_EDITS: &str = "allow_post_signature_edits";

struct CachedRows {
    loaded_at: Instant,
    rows: Vec<ClinicalSetting>,
}

/// Typed reader for clinical settings
pub struct SettingsGate {
    store: Arc<dyn SettingsStore>,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedRows>>,
}

impl SettingsGate {
    /// Creates a gate that re-reads the store on every call
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_cache_ttl(store, Duration::ZERO)
    }

    /// Creates a gate with a TTL cache; a zero TTL disables caching
    pub fn with_cache_ttl(store: Arc<dyn SettingsStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    /// Reads one setting as its typed value
    ///
    /// Returns `Ok(None)` for unknown keys; "not configured" is
    /// distinguishable from any configured value and never guessed.
    ///
    /// # Errors
    ///
    /// [`crate::domain::ScribeError::Config`] when a json-typed value is
    /// malformed; [`crate::domain::ScribeError::Storage`] on store failure.
    pub async fn get(&self, key: &str) -> Result<Option<SettingValue>> {
        if self.cache_ttl.is_zero() {
            let row = self.store.fetch_setting(key).await?;
            return row.map(|r| r.typed_value()).transpose();
        }

        let rows = self.cached_rows().await?;
        rows.iter()
            .find(|r| r.key == key)
            .map(|r| r.typed_value())
            .transpose()
    }

    /// All settings as a key → typed-value map
    pub async fn all(&self) -> Result<BTreeMap<String, SettingValue>> {
        let rows = self.rows().await?;
        let mut map = BTreeMap::new();
        for row in &rows {
            map.insert(row.key.clone(), row.typed_value()?);
        }
        Ok(map)
    }

    /// All settings with storage metadata, for the administrative listing
    pub async fn detailed(&self) -> Result<Vec<SettingDetail>> {
        let rows = self.rows().await?;
        rows.into_iter()
            .map(|row| {
                let value = row.typed_value()?;
                Ok(SettingDetail {
                    key: row.key,
                    value,
                    value_type: row.value_type,
                    updated_at: row.updated_at,
                    updated_by: row.updated_by,
                })
            })
            .collect()
    }

    /// Whether post-signature addenda are permitted
    ///
    /// Unconfigured means disabled: an administrator must opt in before
    /// locked notes can be amended.
    pub async fn allow_post_signature_edits(&self) -> Result<bool> {
        let value = self.get(ALLOW_POST_SIGNATURE_EDITS).await?;
        Ok(matches!(value, Some(SettingValue::Bool(true))))
    }

    /// Drops the cached rows so the next read hits the store
    ///
    /// Call after an administrative write when a TTL cache is enabled.
    pub async fn invalidate(&self) {
        if !self.cache_ttl.is_zero() {
            *self.cache.write().await = None;
        }
    }

    async fn rows(&self) -> Result<Vec<ClinicalSetting>> {
        if self.cache_ttl.is_zero() {
            return self.store.fetch_all_settings().await;
        }
        self.cached_rows().await
    }

    async fn cached_rows(&self) -> Result<Vec<ClinicalSetting>> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.loaded_at.elapsed() < self.cache_ttl {
                    return Ok(cached.rows.clone());
                }
            }
        }

        let rows = self.store.fetch_all_settings().await?;
        let mut cache = self.cache.write().await;
        *cache = Some(CachedRows {
            loaded_at: Instant::now(),
            rows: rows.clone(),
        });

        tracing::debug!(count = rows.len(), "Refreshed settings cache");
        Ok(rows)
    }
}
