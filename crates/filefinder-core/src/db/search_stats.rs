//! Search frequency statistics

use super::schema::Database;
use crate::error::{FileFinderError, Result};
use crate::settings::normalize_section_id;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of top searches returned
pub const DEFAULT_TOP_SEARCHES: i64 = 5;

/// Counter for one normalized query in a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStat {
    pub query: String,
    pub count: i64,
    pub last_searched: i64,
}

/// Acknowledgement of a recorded search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSearch {
    pub section_id: String,
    pub query: String,
}

/// Merge an imported counter, keeping the larger count and the later timestamp
pub(crate) fn merge_search_stat(
    conn: &Connection,
    section_id: &str,
    stat: &SearchStat,
) -> Result<()> {
    conn.execute(
        "INSERT INTO search_stats (section_id, query_key, query, count, last_searched)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(section_id, query_key) DO UPDATE
         SET query = excluded.query,
             count = MAX(search_stats.count, excluded.count),
             last_searched = MAX(search_stats.last_searched, excluded.last_searched)",
        params![
            section_id,
            stat.query.to_lowercase(),
            stat.query,
            stat.count,
            stat.last_searched
        ],
    )?;
    Ok(())
}

impl Database {
    /// Most frequent queries of a section; `limit` is clamped to `[1, 100]`
    pub fn get_top_searches(&self, section_id: &str, limit: i64) -> Result<Vec<SearchStat>> {
        let section_id = normalize_section_id(section_id);
        let limit = limit.clamp(1, 100);

        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT query, count, last_searched
             FROM search_stats
             WHERE section_id = ?1
             ORDER BY count DESC, last_searched DESC
             LIMIT ?2",
        )?;

        let stats = stmt
            .query_map(params![section_id, limit], |row| {
                Ok(SearchStat {
                    query: row.get(0)?,
                    count: row.get(1)?,
                    last_searched: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }

    /// Count one search; the key is the lowercased query, the last casing is kept for display
    pub fn record_search(&self, section_id: &str, query: &str) -> Result<RecordedSearch> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FileFinderError::invalid("Invalid query"));
        }

        let section_id = normalize_section_id(section_id);
        self.lock().execute(
            "INSERT INTO search_stats (section_id, query_key, query, count, last_searched)
             VALUES (?1, ?2, ?3, 1, ?4)
             ON CONFLICT(section_id, query_key) DO UPDATE
             SET query = excluded.query,
                 count = search_stats.count + 1,
                 last_searched = MAX(search_stats.last_searched, excluded.last_searched)",
            params![
                section_id,
                query.to_lowercase(),
                query,
                Utc::now().timestamp_millis()
            ],
        )?;
        debug!(section = %section_id, query, "recorded search");

        Ok(RecordedSearch {
            section_id,
            query: query.to_string(),
        })
    }
}
