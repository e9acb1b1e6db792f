//! Text renderer for the terminal front end

use std::io::BufRead;

use crate::error::{ClientError, ClientResult};
use crate::view::{MediaRow, ProfileView, Renderer};

/// Writes the page to stdout
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TerminalRenderer {
    fn show_profile(&self, profile: &ProfileView) {
        print!("{}", format_profile(profile));
    }

    fn replace_media_list(&self, rows: &[MediaRow]) {
        print!("{}", format_media_table(rows));
    }

    fn alert(&self, message: &str) {
        println!("{}", message);
    }
}

/// First line of `reader` without its line ending
///
/// Used for passwords piped on stdin, which stay out of shell history.
pub fn read_secret<R: BufRead>(mut reader: R) -> ClientResult<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| ClientError::Rejected(format!("Cannot read password: {}", e)))?;

    let secret = line.trim_end_matches(['\r', '\n']);
    if secret.is_empty() {
        return Err(ClientError::Rejected("Password is required".to_string()));
    }
    Ok(secret.to_string())
}

pub fn format_profile(profile: &ProfileView) -> String {
    format!("Username: {}\nEmail:    {}\n", profile.username, profile.email)
}

/// Media rows as an aligned table
pub fn format_media_table(rows: &[MediaRow]) -> String {
    if rows.is_empty() {
        return "No media items.\n".to_string();
    }

    let link_width = rows
        .iter()
        .map(|r| r.link_text.chars().count())
        .max()
        .unwrap_or(0)
        .max("Link".len());
    let href_width = rows
        .iter()
        .map(|r| r.href.chars().count())
        .max()
        .unwrap_or(0)
        .max("File".len());

    let mut out = format!(
        "{:<lw$} | {:<hw$} | {}\n",
        "Link",
        "File",
        "Thumbnail",
        lw = link_width,
        hw = href_width
    );
    out.push_str(&"-".repeat(link_width + href_width + 6 + "Thumbnail".len()));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<lw$} | {:<hw$} | {}\n",
            row.link_text,
            row.href,
            row.thumbnail_src,
            lw = link_width,
            hw = href_width
        ));
    }

    out
}
