//! View models and the rendering port
//!
//! Pure functions turn API records into render instructions; a [`Renderer`]
//! (the DOM, a terminal) applies them. Nothing here touches a surface.

use crate::graphql::operations::{MediaItem, User};

/// Prefix of every media link's text
pub const OPEN_PREFIX: &str = "Open ";

/// Fixed notification texts
pub mod alerts {
    pub const UPLOAD_FAILED: &str = "File upload failed";
    pub const POST_FAILED: &str = "Failed to post file";
    pub const UPLOAD_SUCCEEDED: &str = "File uploaded successfully";
}

/// Profile fields shown after login or session restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// One row of the media list: a thumbnail and a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub thumbnail_src: String,
    pub thumbnail_alt: String,
    pub href: String,
    pub link_text: String,
}

impl From<&MediaItem> for MediaRow {
    fn from(item: &MediaItem) -> Self {
        Self {
            thumbnail_src: item.thumbnail.clone(),
            thumbnail_alt: item.title.clone(),
            href: item.filename.clone(),
            link_text: format!("{}{}", OPEN_PREFIX, item.title),
        }
    }
}

/// Rows for a media list, one per item in the order given
pub fn media_rows(items: &[MediaItem]) -> Vec<MediaRow> {
    items.iter().map(MediaRow::from).collect()
}

/// A presentation surface the controller writes to
pub trait Renderer {
    /// Fill the profile fields
    fn show_profile(&self, profile: &ProfileView);

    /// Replace the whole media list with `rows`
    fn replace_media_list(&self, rows: &[MediaRow]);

    /// Blocking user-facing notification
    fn alert(&self, message: &str);

    /// Diagnostic output for swallowed failures
    fn log(&self, _message: &str) {}
}
