//! Settings persistence

use super::schema::Database;
use crate::error::Result;
use crate::settings::{normalize_settings, Settings};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::warn;

pub(crate) fn store_settings(conn: &Connection, settings: &Settings) -> Result<()> {
    conn.execute(
        "INSERT INTO app_settings (id, settings_json, updated_at)
         VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE
         SET settings_json = excluded.settings_json,
             updated_at = excluded.updated_at",
        params![serde_json::to_string(settings)?, Utc::now().timestamp_millis()],
    )?;
    Ok(())
}

/// Read the stored settings, writing the defaults when no row exists
pub(crate) fn load_settings(conn: &Connection) -> Result<Settings> {
    let json: Option<String> = conn
        .query_row("SELECT settings_json FROM app_settings WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    let Some(json) = json else {
        let settings = Settings::default();
        store_settings(conn, &settings)?;
        return Ok(settings);
    };

    match serde_json::from_str::<Value>(&json) {
        Ok(value) => Ok(normalize_settings(&value)),
        Err(err) => {
            warn!(error = %err, "stored settings are not valid JSON, using defaults");
            Ok(Settings::default())
        }
    }
}

pub(crate) fn ensure_settings_row(conn: &Connection) -> Result<()> {
    let present = conn
        .query_row("SELECT 1 FROM app_settings WHERE id = 1", [], |_| Ok(()))
        .optional()?
        .is_some();
    if !present {
        store_settings(conn, &Settings::default())?;
    }
    Ok(())
}

impl Database {
    /// Current settings, normalized
    pub fn get_settings(&self) -> Result<Settings> {
        load_settings(&self.lock())
    }

    /// Normalize and persist raw settings, returning what was stored
    pub fn save_settings(&self, raw: &Value) -> Result<Settings> {
        let settings = normalize_settings(raw);
        store_settings(&self.lock(), &settings)?;
        Ok(settings)
    }
}
