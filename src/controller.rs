//! Page Controller
//!
//! Wires user actions to the media API and the API's answers to a
//! [`Renderer`]. Every handler catches its own failures: login and upload
//! failures become alerts, media-list and session-restore failures are only
//! logged. Handlers still return the error so a caller (the CLI) can pick an
//! exit status, but nothing is left for the caller to display.

use futures_util::future;

use crate::error::{ClientError, ClientResult};
use crate::graphql::operations::{Credentials, LoginOutcome, MediaItem, User};
use crate::graphql::{GraphQlClient, GraphQlTransport};
use crate::session::{Session, TokenStore};
use crate::upload::FileUploader;
use crate::view::{alerts, media_rows, ProfileView, Renderer};

/// Controller for the media page
pub struct PageController<T, U, S, R> {
    client: GraphQlClient<T>,
    uploader: U,
    store: S,
    renderer: R,
}

impl<T, U, S, R> PageController<T, U, S, R>
where
    T: GraphQlTransport,
    U: FileUploader,
    S: TokenStore,
    R: Renderer,
{
    pub fn new(client: GraphQlClient<T>, uploader: U, store: S, renderer: R) -> Self {
        Self {
            client,
            uploader,
            store,
            renderer,
        }
    }

    pub fn client(&self) -> &GraphQlClient<T> {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Page load: media list and session restore, concurrently
    pub async fn load(&self) {
        let _ = future::join(self.refresh_media(), self.restore_session()).await;
    }

    // ============ Authentication ============

    /// Log in and persist the token
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginOutcome> {
        let outcome = self.client.login(credentials).await?;
        outcome.session.persist(&self.store)?;
        Ok(outcome)
    }

    /// Login form submission
    pub async fn on_login_submit(&self, credentials: Credentials) -> ClientResult<()> {
        match self.login(&credentials).await {
            Ok(outcome) => {
                tracing::info!(username = %credentials.username, "Logged in");
                if let Some(user) = &outcome.user {
                    self.renderer.show_profile(&ProfileView::from(user));
                }
                self.renderer.alert(&outcome.message);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(username = %credentials.username, error = %e, "Login failed");
                self.renderer.log(&format!("Login failed: {}", e));
                self.renderer.alert(&e.to_string());
                Err(e)
            }
        }
    }

    // ============ Session restore ============

    /// The user behind the stored token, if there is one
    pub async fn current_user(&self) -> ClientResult<Option<User>> {
        match Session::restore(&self.store)? {
            Some(session) => Ok(Some(self.client.check_token(&session).await?)),
            None => Ok(None),
        }
    }

    /// Render the stored session's user
    ///
    /// Failures are logged only; the stored token is left alone.
    pub async fn restore_session(&self) -> ClientResult<Option<User>> {
        match self.current_user().await {
            Ok(Some(user)) => {
                tracing::info!(username = %user.username, "Session restored");
                self.renderer.show_profile(&ProfileView::from(&user));
                Ok(Some(user))
            }
            Ok(None) => {
                tracing::debug!("No stored session");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed");
                self.renderer.log(&format!("Session restore failed: {}", e));
                Err(e)
            }
        }
    }

    // ============ Media list ============

    /// Fetch and re-render the whole media list
    ///
    /// The list is replaced only after a successful fetch; on failure the
    /// previous rows stay and the error is logged.
    pub async fn refresh_media(&self) -> ClientResult<Vec<MediaItem>> {
        match self.client.media_items().await {
            Ok(items) => {
                tracing::info!(count = items.len(), "Media list loaded");
                self.renderer.replace_media_list(&media_rows(&items));
                Ok(items)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Media list fetch failed");
                self.renderer.log(&format!("Media list fetch failed: {}", e));
                Err(e)
            }
        }
    }

    // ============ Upload ============

    /// Register an uploaded file's path as a media item
    pub async fn register_file(&self, file_path: &str) -> ClientResult<()> {
        let session = Session::restore(&self.store)?.ok_or(ClientError::NoSession)?;
        self.client.add_file(&session, file_path).await
    }

    /// File form submission
    ///
    /// Upload, then register, then re-fetch the list. A failed upload never
    /// reaches registration. A failed registration leaves the uploaded file
    /// on the server with no media record.
    pub async fn on_file_submit(&self, file: Option<&U::File>) -> ClientResult<()> {
        let Some(file) = file else {
            tracing::debug!("File form submitted without a file");
            return Ok(());
        };

        let file_path = match self.uploader.upload(file).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Upload failed");
                self.renderer.log(&format!("Upload failed: {}", e));
                self.renderer.alert(alerts::UPLOAD_FAILED);
                return Err(e);
            }
        };

        if let Err(e) = self.register_file(&file_path).await {
            tracing::warn!(
                file_path = %file_path,
                error = %e,
                "Uploaded file could not be registered; it has no media record"
            );
            self.renderer.log(&format!("Registering {} failed: {}", file_path, e));
            self.renderer.alert(alerts::POST_FAILED);
            return Err(e);
        }

        tracing::info!(file_path = %file_path, "File uploaded and registered");
        let _ = self.refresh_media().await;
        self.renderer.alert(alerts::UPLOAD_SUCCEEDED);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{GraphQlRequest, GraphQlResponse};
    use crate::session::{MemoryTokenStore, TOKEN_KEY};
    use crate::upload::UploadFile;
    use crate::view::MediaRow;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Transport answering from a per-operation script
    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<HashMap<&'static str, Value>>,
        failing: RefCell<Vec<&'static str>>,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn reply(self, operation: &'static str, body: Value) -> Self {
            self.replies.borrow_mut().insert(operation, body);
            self
        }

        fn fail(self, operation: &'static str) -> Self {
            self.failing.borrow_mut().push(operation);
            self
        }

        fn calls_to(&self, operation: &str) -> Vec<Option<String>> {
            self.calls
                .borrow()
                .iter()
                .filter(|(name, _)| name == operation)
                .map(|(_, bearer)| bearer.clone())
                .collect()
        }
    }

    #[async_trait(?Send)]
    impl GraphQlTransport for ScriptedTransport {
        async fn execute(
            &self,
            request: &GraphQlRequest,
            bearer: Option<&str>,
        ) -> ClientResult<GraphQlResponse> {
            self.calls
                .borrow_mut()
                .push((request.operation_name.to_string(), bearer.map(str::to_string)));

            if self.failing.borrow().contains(&request.operation_name) {
                return Err(ClientError::Transport("connection refused".to_string()));
            }

            let body = self
                .replies
                .borrow()
                .get(request.operation_name)
                .cloned()
                .unwrap_or(json!({"data": null}));
            Ok(serde_json::from_value(body)?)
        }
    }

    struct FakeUploader {
        result: Result<String, String>,
        calls: Cell<usize>,
    }

    impl FakeUploader {
        fn returning(path: &str) -> Self {
            Self {
                result: Ok(path.to_string()),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err("connection reset".to_string()),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl FileUploader for FakeUploader {
        type File = UploadFile;

        async fn upload(&self, _file: &UploadFile) -> ClientResult<String> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone().map_err(ClientError::Upload)
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        profile: RefCell<Option<ProfileView>>,
        rows: RefCell<Option<Vec<MediaRow>>>,
        alerts: RefCell<Vec<String>>,
        logs: RefCell<Vec<String>>,
    }

    impl Renderer for RecordingRenderer {
        fn show_profile(&self, profile: &ProfileView) {
            *self.profile.borrow_mut() = Some(profile.clone());
        }

        fn replace_media_list(&self, rows: &[MediaRow]) {
            *self.rows.borrow_mut() = Some(rows.to_vec());
        }

        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }

        fn log(&self, message: &str) {
            self.logs.borrow_mut().push(message.to_string());
        }
    }

    type TestController =
        PageController<ScriptedTransport, FakeUploader, MemoryTokenStore, RecordingRenderer>;

    fn controller(
        transport: ScriptedTransport,
        uploader: FakeUploader,
        store: MemoryTokenStore,
    ) -> TestController {
        PageController::new(
            GraphQlClient::new(transport),
            uploader,
            store,
            RecordingRenderer::default(),
        )
    }

    fn user_json() -> Value {
        json!({
            "user_id": 1,
            "username": "alice",
            "email": "alice@example.com",
            "level_name": "User",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    fn media_json(count: usize) -> Value {
        let items: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "filename": format!("/uploads/file{}.png", i),
                    "thumbnail": format!("/uploads/file{}-thumb.png", i),
                    "title": format!("File {}", i)
                })
            })
            .collect();
        json!({"data": {"mediaItems": items}})
    }

    fn sample_file() -> UploadFile {
        UploadFile::new("y.png", vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn test_login_success_persists_token_and_renders_profile() {
        let transport = ScriptedTransport::default().reply(
            "Login",
            json!({"data": {"login": {
                "token": "fresh-token",
                "message": "Login successful",
                "user": user_json()
            }}}),
        );
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::with_token("stale-token"),
        );

        page.on_login_submit(Credentials::new("alice", "pw"))
            .await
            .unwrap();

        assert_eq!(
            page.store().get(TOKEN_KEY).unwrap().as_deref(),
            Some("fresh-token")
        );
        let profile = page.renderer().profile.borrow().clone().unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(*page.renderer().alerts.borrow(), vec!["Login successful"]);
        assert_eq!(page.client().transport().calls_to("Login"), vec![None]);
    }

    #[tokio::test]
    async fn test_login_graphql_error_keeps_prior_token() {
        let transport = ScriptedTransport::default().reply(
            "Login",
            json!({"data": {"login": null}, "errors": [{"message": "Invalid username/password"}]}),
        );
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::with_token("prior"),
        );

        let result = page.on_login_submit(Credentials::new("alice", "bad")).await;

        assert!(result.is_err());
        assert_eq!(page.store().get(TOKEN_KEY).unwrap().as_deref(), Some("prior"));
        assert_eq!(
            *page.renderer().alerts.borrow(),
            vec!["Invalid username/password"]
        );
        assert!(page.renderer().profile.borrow().is_none());
    }

    #[tokio::test]
    async fn test_login_payload_without_token_alerts_message() {
        let transport = ScriptedTransport::default().reply(
            "Login",
            json!({"data": {"login": {"token": null, "message": "User not found", "user": null}}}),
        );
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::new(),
        );

        assert!(page
            .on_login_submit(Credentials::new("ghost", "pw"))
            .await
            .is_err());
        assert!(page.store().get(TOKEN_KEY).unwrap().is_none());
        assert_eq!(*page.renderer().alerts.borrow(), vec!["User not found"]);
    }

    #[tokio::test]
    async fn test_upload_success_refetches_list() {
        let transport = ScriptedTransport::default()
            .reply("AddFile", json!({"data": {"addFile": {"success": true}}}))
            .reply("MediaItems", media_json(2));
        let page = controller(
            transport,
            FakeUploader::returning("/x/y.png"),
            MemoryTokenStore::with_token("tok"),
        );

        page.on_file_submit(Some(&sample_file())).await.unwrap();

        let transport = page.client().transport();
        assert_eq!(transport.calls_to("AddFile"), vec![Some("tok".to_string())]);
        assert_eq!(transport.calls_to("MediaItems").len(), 1);

        let rows = page.renderer().rows.borrow().clone().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].link_text, "Open File 0");
        assert_eq!(rows[1].href, "/uploads/file1.png");
        assert_eq!(
            *page.renderer().alerts.borrow(),
            vec![alerts::UPLOAD_SUCCEEDED]
        );
    }

    #[tokio::test]
    async fn test_upload_failure_never_registers() {
        let page = controller(
            ScriptedTransport::default(),
            FakeUploader::failing(),
            MemoryTokenStore::with_token("tok"),
        );

        assert!(page.on_file_submit(Some(&sample_file())).await.is_err());

        assert!(page.client().transport().calls_to("AddFile").is_empty());
        assert!(page.client().transport().calls_to("MediaItems").is_empty());
        assert_eq!(*page.renderer().alerts.borrow(), vec![alerts::UPLOAD_FAILED]);
    }

    #[tokio::test]
    async fn test_registration_failure_does_not_refetch() {
        let transport = ScriptedTransport::default().reply(
            "AddFile",
            json!({"errors": [{"message": "Not authorized"}]}),
        );
        let page = controller(
            transport,
            FakeUploader::returning("/x/y.png"),
            MemoryTokenStore::with_token("expired"),
        );

        assert!(page.on_file_submit(Some(&sample_file())).await.is_err());

        assert_eq!(page.uploader.calls.get(), 1);
        assert!(page.client().transport().calls_to("MediaItems").is_empty());
        assert_eq!(*page.renderer().alerts.borrow(), vec![alerts::POST_FAILED]);
        assert!(page.renderer().logs.borrow()[0].contains("/x/y.png"));
    }

    #[tokio::test]
    async fn test_registration_without_session() {
        let page = controller(
            ScriptedTransport::default(),
            FakeUploader::returning("/x/y.png"),
            MemoryTokenStore::new(),
        );

        let err = page.on_file_submit(Some(&sample_file())).await.unwrap_err();

        assert!(matches!(err, ClientError::NoSession));
        assert!(page.client().transport().calls_to("AddFile").is_empty());
        assert_eq!(*page.renderer().alerts.borrow(), vec![alerts::POST_FAILED]);
    }

    #[tokio::test]
    async fn test_submit_without_file_is_noop() {
        let page = controller(
            ScriptedTransport::default(),
            FakeUploader::returning("/x"),
            MemoryTokenStore::new(),
        );

        page.on_file_submit(None).await.unwrap();

        assert_eq!(page.uploader.calls.get(), 0);
        assert!(page.renderer().alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_restore_with_invalid_token_only_logs() {
        let transport = ScriptedTransport::default().reply(
            "CheckToken",
            json!({"data": {"checkToken": null}, "errors": [{"message": "Token expired"}]}),
        );
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::with_token("expired"),
        );

        assert!(page.restore_session().await.is_err());

        assert!(page.renderer().profile.borrow().is_none());
        assert!(page.renderer().alerts.borrow().is_empty());
        assert_eq!(page.renderer().logs.borrow().len(), 1);
        assert_eq!(
            page.store().get(TOKEN_KEY).unwrap().as_deref(),
            Some("expired")
        );
    }

    #[tokio::test]
    async fn test_restore_without_token_sends_nothing() {
        let page = controller(
            ScriptedTransport::default(),
            FakeUploader::returning("/x"),
            MemoryTokenStore::new(),
        );

        assert!(page.restore_session().await.unwrap().is_none());
        assert!(page.client().transport().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_rows() {
        let page = controller(
            ScriptedTransport::default().reply("MediaItems", media_json(3)),
            FakeUploader::returning("/x"),
            MemoryTokenStore::new(),
        );
        page.refresh_media().await.unwrap();
        assert_eq!(page.renderer().rows.borrow().as_ref().unwrap().len(), 3);

        page.client().transport().failing.borrow_mut().push("MediaItems");
        assert!(page.refresh_media().await.is_err());

        assert_eq!(page.renderer().rows.borrow().as_ref().unwrap().len(), 3);
        assert!(page.renderer().alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_load_runs_both_flows() {
        let transport = ScriptedTransport::default()
            .reply("MediaItems", media_json(1))
            .reply("CheckToken", json!({"data": {"checkToken": user_json()}}));
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::with_token("tok"),
        );

        page.load().await;

        let transport = page.client().transport();
        assert_eq!(transport.calls_to("MediaItems"), vec![None]);
        assert_eq!(transport.calls_to("CheckToken"), vec![Some("tok".to_string())]);
        assert_eq!(
            page.renderer().profile.borrow().as_ref().unwrap().username,
            "alice"
        );
        assert_eq!(page.renderer().rows.borrow().as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_survives_both_failures() {
        let transport = ScriptedTransport::default()
            .fail("MediaItems")
            .fail("CheckToken");
        let page = controller(
            transport,
            FakeUploader::returning("/x"),
            MemoryTokenStore::with_token("tok"),
        );

        page.load().await;

        assert!(page.renderer().alerts.borrow().is_empty());
        assert_eq!(page.renderer().logs.borrow().len(), 2);
    }
}
