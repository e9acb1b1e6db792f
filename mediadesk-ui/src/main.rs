//! Mediadesk Page
//!
//! Browser glue for the media page, compiled to WebAssembly.
//!
//! # Features
//!
//! - Login form: stores the token in `localStorage` and fills the profile
//! - File form: uploads to `/upload`, registers the file, re-renders the list
//! - On load: restores the stored session and renders the media list
//!
//! # Architecture
//!
//! The shared `PageController` does the work; this crate supplies the
//! browser side of its ports (fetch transport, `localStorage`, DOM renderer)
//! and turns form submissions into controller calls.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlInputElement, SubmitEvent};

use mediadesk::{Credentials, GraphQlClient, PageController};

mod api;
mod dom;
mod storage;

use api::{graphql_url, FetchTransport, FormUploader};
use dom::{ids, DomRenderer};
use storage::LocalTokenStore;

type BrowserPage = PageController<FetchTransport, FormUploader, LocalTokenStore, DomRenderer>;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    if let Err(e) = start() {
        web_sys::console::error_1(&e);
    }
}

fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let store = LocalTokenStore::new(&window).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let page: Rc<BrowserPage> = Rc::new(PageController::new(
        GraphQlClient::new(FetchTransport::new(graphql_url())),
        FormUploader::default(),
        store,
        DomRenderer::new(window, document.clone()),
    ));

    {
        let page = Rc::clone(&page);
        spawn_local(async move { page.load().await });
    }

    bind_forms(&document, &page);

    Ok(())
}

/// Wire both forms; a broken form only disables itself
fn bind_forms(document: &Document, page: &Rc<BrowserPage>) {
    if let Err(e) = bind_login_form(document, Rc::clone(page)) {
        web_sys::console::error_1(&e);
    }
    if let Err(e) = bind_file_form(document, Rc::clone(page)) {
        web_sys::console::error_1(&e);
    }
}

fn input_by_id(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an input", id)))
}

fn bind_login_form(document: &Document, page: Rc<BrowserPage>) -> Result<(), JsValue> {
    let Some(form) = document.get_element_by_id(ids::LOGIN_FORM) else {
        return Ok(());
    };
    let username = input_by_id(document, ids::USERNAME_INPUT)?;
    let password = input_by_id(document, ids::PASSWORD_INPUT)?;

    let on_submit = Closure::wrap(Box::new(move |event: SubmitEvent| {
        event.prevent_default();
        let credentials = Credentials::new(username.value(), password.value());
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.on_login_submit(credentials).await;
        });
    }) as Box<dyn FnMut(SubmitEvent)>);

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}

fn bind_file_form(document: &Document, page: Rc<BrowserPage>) -> Result<(), JsValue> {
    let Some(form) = document.get_element_by_id(ids::FILE_FORM) else {
        return Ok(());
    };
    let document = document.clone();

    let on_submit = Closure::wrap(Box::new(move |event: SubmitEvent| {
        event.prevent_default();
        let file = input_by_id(&document, ids::FILE_INPUT)
            .ok()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.on_file_submit(file.as_ref()).await;
        });
    }) as Box<dyn FnMut(SubmitEvent)>);

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::{Event, EventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    fn page_for(html: &str) -> (Document, Rc<BrowserPage>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        document.body().unwrap().set_inner_html(html);

        let page = Rc::new(PageController::new(
            GraphQlClient::new(FetchTransport::new(graphql_url())),
            FormUploader::default(),
            LocalTokenStore::new(&window).unwrap(),
            DomRenderer::new(window, document.clone()),
        ));
        (document, page)
    }

    /// Whether a listener cancelled the submit
    fn submit_is_handled(document: &Document, form_id: &str) -> bool {
        let init = EventInit::new();
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict("submit", &init).unwrap();
        let form = document.get_element_by_id(form_id).unwrap();
        !form.dispatch_event(&event).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_incomplete_login_form_leaves_file_form_bound() {
        let (document, page) = page_for(
            r#"<form id="login-form"><input id="username"></form>
               <form id="file-form"><input id="file-input" type="file"></form>"#,
        );

        bind_forms(&document, &page);

        assert!(!submit_is_handled(&document, ids::LOGIN_FORM));
        assert!(submit_is_handled(&document, ids::FILE_FORM));
    }
}
