//! # Mediadesk
//!
//! Client for a GraphQL media API: log in, upload files, list media.
//!
//! The same [`PageController`] drives two front ends. The `mediadesk`
//! binary renders to a terminal and keeps the session token in a file; the
//! `mediadesk-ui` crate renders to the DOM and keeps it in `localStorage`.
//!
//! ## Modules
//!
//! - [`graphql`]: Typed operations and the GraphQL-over-HTTP envelope
//! - [`session`]: Session context and the token store port
//! - [`upload`]: Upload endpoint port
//! - [`view`]: View models and the renderer port
//! - [`controller`]: Login, upload, media list and session restore flows
//!
//! With the default `native` feature:
//!
//! - [`config`]: TOML + environment configuration
//! - [`http`]: `reqwest` transport and uploader
//! - [`file_store`]: File-backed token store
//! - [`terminal`]: Text renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediadesk::{
//!     build_client, Config, Credentials, FileTokenStore, GraphQlClient, HttpTransport,
//!     HttpUploader, PageController, TerminalRenderer,
//! };
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let http = build_client(Duration::from_secs(config.api.request_timeout_secs))?;
//!
//!     let page = PageController::new(
//!         GraphQlClient::new(HttpTransport::new(http.clone(), config.api.graphql_endpoint()?)),
//!         HttpUploader::new(http, config.api.upload_endpoint()?),
//!         FileTokenStore::new(&config.session.token_file),
//!         TerminalRenderer::new(),
//!     );
//!
//!     page.on_login_submit(Credentials::new("alice", "secret")).await?;
//!     page.refresh_media().await?;
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
pub mod graphql;
pub mod session;
pub mod upload;
pub mod view;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod file_store;
#[cfg(feature = "native")]
pub mod http;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod terminal;

pub use controller::PageController;
pub use error::{ClientError, ClientResult};
pub use graphql::operations::{Credentials, LoginOutcome, MediaItem, User};
pub use graphql::{GraphQlClient, GraphQlError, GraphQlTransport};
pub use session::{MemoryTokenStore, Session, TokenStore, TOKEN_KEY};
pub use upload::{FileUploader, UploadFile, UPLOAD_FIELD, UPLOAD_PATH};
pub use view::{media_rows, MediaRow, ProfileView, Renderer};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};
#[cfg(feature = "native")]
pub use file_store::FileTokenStore;
#[cfg(feature = "native")]
pub use http::{build_client, HttpTransport, HttpUploader};
#[cfg(feature = "native")]
pub use terminal::TerminalRenderer;
