pub const SCHEMA: &str = r#"
-- One authentication record per shop, refreshed on re-auth
CREATE TABLE IF NOT EXISTS shop_sessions (
    shop TEXT PRIMARY KEY,
    access_token TEXT NOT NULL,
    scope TEXT NOT NULL DEFAULT '',
    updated_at TEXT DEFAULT (datetime('now'))
);

-- AI-generated markup, read by the storefront loader via id
CREATE TABLE IF NOT EXISTS generated_content (
    id TEXT PRIMARY KEY,
    landing TEXT NOT NULL,
    popup TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Storefront page slug per shop; insert-only
CREATE TABLE IF NOT EXISTS page_paths (
    shop_name TEXT PRIMARY KEY,
    path TEXT NOT NULL
);

-- Favorited tool titles per shop, JSON array in insertion order
CREATE TABLE IF NOT EXISTS bookmarks (
    shop_name TEXT PRIMARY KEY,
    titles TEXT NOT NULL DEFAULT '[]'
);

-- Installation counter per tool name
CREATE TABLE IF NOT EXISTS tool_installations (
    tool_name TEXT PRIMARY KEY,
    metrics INTEGER NOT NULL DEFAULT 0
);
"#;
