pub mod config;
mod de;
pub mod error;
pub mod scripture;
pub mod state;
pub mod theme;

// Re-export main types for convenience
pub use config::{load_theme, BookmarkStore, Config, ConfigFile, ConfigStore};
pub use error::{LoadError, StoreError};
pub use scripture::{Chapter, Library, SearchHit, Verse, BOOK_TITLE};
pub use state::Bookmark;
pub use theme::{Palette, Rgb, Theme};
