use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_titles(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!("Invalid bookmark titles in database: '{}' - {}", raw, e);
        Vec::new()
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Shop session operations

    fn save_session(&self, shop: &str, access_token: &str, scope: &str) -> Result<ShopSession> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO shop_sessions (shop, access_token, scope, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (shop) DO UPDATE SET
                access_token = excluded.access_token,
                scope = excluded.scope,
                updated_at = excluded.updated_at",
            params![shop, access_token, scope, format_datetime(&now)],
        )?;

        Ok(ShopSession {
            shop: shop.to_string(),
            access_token: access_token.to_string(),
            scope: scope.to_string(),
            updated_at: now,
        })
    }

    fn get_session(&self, shop: &str) -> Result<Option<ShopSession>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT shop, access_token, scope, updated_at FROM shop_sessions WHERE shop = ?1",
            params![shop],
            |row| {
                Ok(ShopSession {
                    shop: row.get(0)?,
                    access_token: row.get(1)?,
                    scope: row.get(2)?,
                    updated_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Generated content operations

    fn insert_content(&self, content: &GeneratedContent) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO generated_content (id, landing, popup) VALUES (?1, ?2, ?3)",
            params![content.id, content.landing, content.popup],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_content(&self, id: &str) -> Result<Option<GeneratedContent>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, landing, popup FROM generated_content WHERE id = ?1",
            params![id],
            |row| {
                Ok(GeneratedContent {
                    id: row.get(0)?,
                    landing: row.get(1)?,
                    popup: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Page path operations

    fn save_page_path(&self, shop_name: &str, path: &str) -> Result<PagePath> {
        let result = self.conn().execute(
            "INSERT INTO page_paths (shop_name, path) VALUES (?1, ?2)",
            params![shop_name, path],
        );

        match result {
            Ok(_) => Ok(PagePath {
                shop_name: shop_name.to_string(),
                path: path.to_string(),
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_page_path(&self, shop_name: &str) -> Result<Option<PagePath>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT shop_name, path FROM page_paths WHERE shop_name = ?1",
            params![shop_name],
            |row| {
                Ok(PagePath {
                    shop_name: row.get(0)?,
                    path: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Bookmark operations

    fn manage_bookmarks(
        &self,
        shop_name: &str,
        action: BookmarkAction,
        title: Option<&str>,
    ) -> Result<BookmarkSet> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let raw: Option<String> = tx
            .query_row(
                "SELECT titles FROM bookmarks WHERE shop_name = ?1",
                params![shop_name],
                |row| row.get(0),
            )
            .optional()?;

        let mut titles = match raw {
            Some(raw) => parse_titles(&raw),
            None => {
                tx.execute(
                    "INSERT INTO bookmarks (shop_name, titles) VALUES (?1, '[]')",
                    params![shop_name],
                )?;
                Vec::new()
            }
        };

        match action {
            BookmarkAction::Add => {
                if let Some(title) = title {
                    if !titles.iter().any(|t| t == title) {
                        titles.push(title.to_string());
                    }
                }
            }
            BookmarkAction::Remove => {
                if let Some(title) = title {
                    titles.retain(|t| t != title);
                }
            }
            BookmarkAction::Get => {}
            BookmarkAction::Clear => titles.clear(),
        }

        let serialized = serde_json::to_string(&titles)
            .map_err(|e| Error::BadRequest(format!("failed to serialize titles: {e}")))?;
        tx.execute(
            "UPDATE bookmarks SET titles = ?1 WHERE shop_name = ?2",
            params![serialized, shop_name],
        )?;

        tx.commit()?;

        let count = titles.len();
        Ok(BookmarkSet { titles, count })
    }

    // Installation metrics operations

    fn increment_installation(&self, tool_name: &str) -> Result<ToolInstallation> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO tool_installations (tool_name, metrics) VALUES (?1, 1)
             ON CONFLICT (tool_name) DO UPDATE SET metrics = metrics + 1",
            params![tool_name],
        )?;

        let metrics: i64 = conn.query_row(
            "SELECT metrics FROM tool_installations WHERE tool_name = ?1",
            params![tool_name],
            |row| row.get(0),
        )?;

        Ok(ToolInstallation {
            tool_name: tool_name.to_string(),
            metrics,
        })
    }

    fn installation_leaderboard(&self) -> Result<Vec<ToolInstallation>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT tool_name, metrics FROM tool_installations ORDER BY metrics DESC, tool_name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ToolInstallation {
                tool_name: row.get(0)?,
                metrics: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open_store();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"shop_sessions".to_string()));
        assert!(tables.contains(&"generated_content".to_string()));
        assert!(tables.contains(&"page_paths".to_string()));
        assert!(tables.contains(&"bookmarks".to_string()));
        assert!(tables.contains(&"tool_installations".to_string()));
    }

    #[test]
    fn test_session_upsert_refreshes_token_and_scope() {
        let (_temp, store) = open_store();

        store
            .save_session("s1.myshopify.com", "token-1", "read_themes")
            .unwrap();
        store
            .save_session("s1.myshopify.com", "token-2", "read_themes,write_themes")
            .unwrap();

        let session = store.get_session("s1.myshopify.com").unwrap().unwrap();
        assert_eq!(session.access_token, "token-2");
        assert_eq!(session.scope, "read_themes,write_themes");

        // Still a single row per shop
        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM shop_sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_get_session_absent() {
        let (_temp, store) = open_store();
        assert!(store.get_session("nope.myshopify.com").unwrap().is_none());
    }

    #[test]
    fn test_content_write_once() {
        let (_temp, store) = open_store();

        let content = GeneratedContent {
            id: "abc123def456g".to_string(),
            landing: "<div>tool</div>".to_string(),
            popup: "<div>popup</div>".to_string(),
        };
        store.insert_content(&content).unwrap();

        let fetched = store.get_content("abc123def456g").unwrap().unwrap();
        assert_eq!(fetched.landing, "<div>tool</div>");
        assert_eq!(fetched.popup, "<div>popup</div>");

        let dup = store.insert_content(&content);
        assert!(matches!(dup, Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_page_path_duplicate_rejected() {
        let (_temp, store) = open_store();

        store.save_page_path("s1.myshopify.com", "tools").unwrap();
        let result = store.save_page_path("s1.myshopify.com", "other");
        assert!(matches!(result, Err(Error::AlreadyExists)));

        let path = store.get_page_path("s1.myshopify.com").unwrap().unwrap();
        assert_eq!(path.path, "tools");
    }

    #[test]
    fn test_bookmark_add_is_idempotent() {
        let (_temp, store) = open_store();

        store
            .manage_bookmarks("s1", BookmarkAction::Add, Some("Fit Tool"))
            .unwrap();
        let set = store
            .manage_bookmarks("s1", BookmarkAction::Add, Some("Fit Tool"))
            .unwrap();

        assert_eq!(set.titles, vec!["Fit Tool"]);
        assert_eq!(set.count, 1);
    }

    #[test]
    fn test_bookmark_remove_absent_is_noop() {
        let (_temp, store) = open_store();

        store
            .manage_bookmarks("s1", BookmarkAction::Add, Some("Fit Tool"))
            .unwrap();
        let set = store
            .manage_bookmarks("s1", BookmarkAction::Remove, Some("Missing"))
            .unwrap();

        assert_eq!(set.titles, vec!["Fit Tool"]);
        assert_eq!(set.count, 1);
    }

    #[test]
    fn test_bookmark_order_and_clear() {
        let (_temp, store) = open_store();

        for title in ["A", "B", "C"] {
            store
                .manage_bookmarks("s1", BookmarkAction::Add, Some(title))
                .unwrap();
        }
        store
            .manage_bookmarks("s1", BookmarkAction::Remove, Some("B"))
            .unwrap();

        let set = store.manage_bookmarks("s1", BookmarkAction::Get, None).unwrap();
        assert_eq!(set.titles, vec!["A", "C"]);

        let cleared = store
            .manage_bookmarks("s1", BookmarkAction::Clear, None)
            .unwrap();
        assert!(cleared.titles.is_empty());
        assert_eq!(cleared.count, 0);
    }

    #[test]
    fn test_bookmarks_are_per_shop() {
        let (_temp, store) = open_store();

        store
            .manage_bookmarks("s1", BookmarkAction::Add, Some("Fit Tool"))
            .unwrap();
        let other = store.manage_bookmarks("s2", BookmarkAction::Get, None).unwrap();
        assert!(other.titles.is_empty());
    }

    #[test]
    fn test_increment_counts_and_leaderboard_order() {
        let (_temp, store) = open_store();

        for _ in 0..3 {
            store.increment_installation("size-chart").unwrap();
        }
        let result = store.increment_installation("countdown").unwrap();
        assert_eq!(result.metrics, 1);

        let board = store.installation_leaderboard().unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].tool_name, "size-chart");
        assert_eq!(board[0].metrics, 3);
        assert_eq!(board[1].tool_name, "countdown");
        assert_eq!(board[1].metrics, 1);
        assert!(board.windows(2).all(|w| w[0].metrics >= w[1].metrics));
    }
}
