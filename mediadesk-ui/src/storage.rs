//! `localStorage`-backed token store

use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use mediadesk::{ClientError, ClientResult, TokenStore};

pub struct LocalTokenStore {
    storage: Storage,
}

impl LocalTokenStore {
    pub fn new(window: &Window) -> ClientResult<Self> {
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| ClientError::Storage("localStorage is unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl TokenStore for LocalTokenStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(value: JsValue) -> ClientError {
    ClientError::Storage(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
