//! DOM renderer
//!
//! Writes view models into the page's fixed elements. Targets that are
//! missing from the page are skipped silently.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

use mediadesk::{MediaRow, ProfileView, Renderer};

/// Element ids the page provides
pub mod ids {
    pub const LOGIN_FORM: &str = "login-form";
    pub const FILE_FORM: &str = "file-form";
    pub const USERNAME_INPUT: &str = "username";
    pub const PASSWORD_INPUT: &str = "password";
    pub const FILE_INPUT: &str = "file-input";
    pub const USERNAME_TARGET: &str = "username-target";
    pub const EMAIL_TARGET: &str = "email-target";
    pub const FILES_LIST: &str = "files-list";
}

pub struct DomRenderer {
    window: Window,
    document: Document,
    username_target: Option<Element>,
    email_target: Option<Element>,
    files_list: Option<Element>,
}

impl DomRenderer {
    /// Locate the render targets in `document`
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            username_target: document.get_element_by_id(ids::USERNAME_TARGET),
            email_target: document.get_element_by_id(ids::EMAIL_TARGET),
            files_list: document.get_element_by_id(ids::FILES_LIST),
            window,
            document,
        }
    }

    /// `<tr><td><img></td><td><a></a></td></tr>`
    fn build_row(&self, row: &MediaRow) -> Result<Element, JsValue> {
        let tr = self.document.create_element("tr")?;

        let thumb_cell = self.document.create_element("td")?;
        let img = self.document.create_element("img")?;
        img.set_attribute("src", &row.thumbnail_src)?;
        img.set_attribute("alt", &row.thumbnail_alt)?;
        thumb_cell.append_child(&img)?;
        tr.append_child(&thumb_cell)?;

        let link_cell = self.document.create_element("td")?;
        let link = self.document.create_element("a")?;
        link.set_attribute("href", &row.href)?;
        link.set_text_content(Some(&row.link_text));
        link_cell.append_child(&link)?;
        tr.append_child(&link_cell)?;

        Ok(tr)
    }
}

impl Renderer for DomRenderer {
    fn show_profile(&self, profile: &ProfileView) {
        if let (Some(username), Some(email)) = (&self.username_target, &self.email_target) {
            username.set_text_content(Some(&profile.username));
            email.set_text_content(Some(&profile.email));
        }
    }

    fn replace_media_list(&self, rows: &[MediaRow]) {
        let Some(list) = &self.files_list else {
            return;
        };

        list.set_inner_html("");
        for row in rows {
            let appended = self
                .build_row(row)
                .and_then(|tr| list.append_child(&tr).map(|_| ()));
            if let Err(e) = appended {
                self.log(&format!("Failed to render media row: {:?}", e));
            }
        }
    }

    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            self.log(message);
        }
    }

    fn log(&self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}
