mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Shop session operations
    fn save_session(&self, shop: &str, access_token: &str, scope: &str) -> Result<ShopSession>;
    fn get_session(&self, shop: &str) -> Result<Option<ShopSession>>;

    // Generated content operations
    fn insert_content(&self, content: &GeneratedContent) -> Result<()>;
    fn get_content(&self, id: &str) -> Result<Option<GeneratedContent>>;

    // Page path operations
    fn save_page_path(&self, shop_name: &str, path: &str) -> Result<PagePath>;
    fn get_page_path(&self, shop_name: &str) -> Result<Option<PagePath>>;

    // Bookmark operations
    fn manage_bookmarks(
        &self,
        shop_name: &str,
        action: BookmarkAction,
        title: Option<&str>,
    ) -> Result<BookmarkSet>;

    // Installation metrics operations
    fn increment_installation(&self, tool_name: &str) -> Result<ToolInstallation>;
    fn installation_leaderboard(&self) -> Result<Vec<ToolInstallation>>;

    fn close(&self) -> Result<()>;
}
