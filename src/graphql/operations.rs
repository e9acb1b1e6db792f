//! Typed contracts for the media API operations
//!
//! One unit struct per operation. The document text, the variables and the
//! data shape live together so a schema change touches one place.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Operation;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

// ============================================
// Records
// ============================================

/// A user as returned by the API (never includes the password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub level_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Parse `created_at`
    ///
    /// Accepts RFC 3339, epoch milliseconds, or a bare `YYYY-MM-DD HH:MM:SS`
    /// (taken as UTC).
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(millis) = raw.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis);
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A server-tracked uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub filename: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => s,
        Some(Id::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================
// login
// ============================================

/// `mutation Login`
pub struct Login;

/// Username and password for [`Login`]
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub login: Option<LoginPayload>,
}

/// Raw `login` payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// A login that produced a token
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub user: Option<User>,
    pub message: String,
}

impl Operation for Login {
    const NAME: &'static str = "Login";
    const DOCUMENT: &'static str = r#"
mutation Login($username: String!, $password: String!) {
  login(username: $username, password: $password) {
    token
    message
    user {
      user_id
      username
      email
      level_name
      created_at
    }
  }
}"#;
    const AUTHENTICATED: bool = false;

    type Variables = Credentials;
    type Data = LoginData;
    type Output = LoginOutcome;

    fn output(data: LoginData) -> ClientResult<LoginOutcome> {
        let payload = data.login.ok_or(ClientError::MissingData(Self::NAME))?;

        match payload.token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(LoginOutcome {
                session: Session::new(token),
                user: payload.user,
                message: payload
                    .message
                    .unwrap_or_else(|| "Login successful".to_string()),
            }),
            None => Err(ClientError::Rejected(
                payload.message.unwrap_or_else(|| "Login failed".to_string()),
            )),
        }
    }
}

// ============================================
// checkToken
// ============================================

/// `query CheckToken`: the user behind the bearer token
pub struct CheckToken;

#[derive(Debug, Deserialize)]
pub struct CheckTokenData {
    #[serde(rename = "checkToken")]
    pub check_token: Option<User>,
}

impl Operation for CheckToken {
    const NAME: &'static str = "CheckToken";
    const DOCUMENT: &'static str = r#"
query CheckToken {
  checkToken {
    user_id
    username
    email
    level_name
    created_at
  }
}"#;
    const AUTHENTICATED: bool = true;

    type Variables = ();
    type Data = CheckTokenData;
    type Output = User;

    fn output(data: CheckTokenData) -> ClientResult<User> {
        data.check_token.ok_or(ClientError::MissingData(Self::NAME))
    }
}

// ============================================
// addFile
// ============================================

/// `mutation AddFile`: register an uploaded file as a media item
pub struct AddFile;

#[derive(Debug, Clone, Serialize)]
pub struct AddFileVariables {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct AddFileData {
    #[serde(rename = "addFile")]
    pub add_file: Option<AddFileResult>,
}

#[derive(Debug, Deserialize)]
pub struct AddFileResult {
    #[serde(default)]
    pub success: bool,
}

impl Operation for AddFile {
    const NAME: &'static str = "AddFile";
    const DOCUMENT: &'static str = r#"
mutation AddFile($filePath: String!) {
  addFile(filePath: $filePath) {
    success
  }
}"#;
    const AUTHENTICATED: bool = true;

    type Variables = AddFileVariables;
    type Data = AddFileData;
    type Output = ();

    fn output(data: AddFileData) -> ClientResult<()> {
        match data.add_file {
            Some(AddFileResult { success: true }) => Ok(()),
            Some(_) => Err(ClientError::Rejected(
                "File registration was not accepted".to_string(),
            )),
            None => Err(ClientError::MissingData(Self::NAME)),
        }
    }
}

// ============================================
// mediaItems
// ============================================

/// `query MediaItems`: every media item, in server order
pub struct MediaItems;

#[derive(Debug, Deserialize)]
pub struct MediaItemsData {
    #[serde(rename = "mediaItems")]
    pub media_items: Option<Vec<MediaItem>>,
}

impl Operation for MediaItems {
    const NAME: &'static str = "MediaItems";
    const DOCUMENT: &'static str = r#"
query MediaItems {
  mediaItems {
    filename
    thumbnail
    title
  }
}"#;
    const AUTHENTICATED: bool = false;

    type Variables = ();
    type Data = MediaItemsData;
    type Output = Vec<MediaItem>;

    fn output(data: MediaItemsData) -> ClientResult<Vec<MediaItem>> {
        Ok(data.media_items.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn decode<O: Operation>(json: &str) -> ClientResult<O::Output> {
        let data: O::Data = serde_json::from_str(json).unwrap();
        O::output(data)
    }

    #[test]
    fn test_login_with_token() {
        let outcome = decode::<Login>(
            r#"{"login": {
                "token": "tok-123",
                "message": "Login successful",
                "user": {"user_id": 7, "username": "alice", "email": "alice@example.com",
                         "level_name": "User", "created_at": "2024-02-01T10:00:00.000Z"}
            }}"#,
        )
        .unwrap();

        assert_eq!(outcome.session.token(), "tok-123");
        assert_eq!(outcome.message, "Login successful");
        let user = outcome.user.unwrap();
        assert_eq!(user.user_id, "7");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_login_without_token_is_rejected_with_server_message() {
        let err = decode::<Login>(
            r#"{"login": {"token": null, "message": "Invalid username/password", "user": null}}"#,
        )
        .unwrap_err();

        assert!(matches!(err, ClientError::Rejected(_)));
        assert_eq!(err.to_string(), "Invalid username/password");
    }

    #[test]
    fn test_check_token_null_user() {
        let err = decode::<CheckToken>(r#"{"checkToken": null}"#).unwrap_err();
        assert!(matches!(err, ClientError::MissingData("CheckToken")));
    }

    #[test]
    fn test_add_file_success_flag() {
        assert!(decode::<AddFile>(r#"{"addFile": {"success": true}}"#).is_ok());

        let err = decode::<AddFile>(r#"{"addFile": {"success": false}}"#).unwrap_err();
        assert!(matches!(err, ClientError::Rejected(_)));
    }

    #[test]
    fn test_media_items_keep_server_order() {
        let items = decode::<MediaItems>(
            r#"{"mediaItems": [
                {"filename": "b.png", "thumbnail": "b-thumb.png", "title": "B"},
                {"filename": "a.png", "thumbnail": null, "title": "A"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].filename, "b.png");
        assert_eq!(items[1].thumbnail, "");
    }

    #[test]
    fn test_media_items_null_list_is_empty() {
        let items = decode::<MediaItems>(r#"{"mediaItems": null}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_created_at_formats() {
        let mut user = User {
            user_id: "1".to_string(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            level_name: None,
            created_at: Some("2024-03-05T08:30:00Z".to_string()),
        };
        let dt = user.created_at_utc().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));

        user.created_at = Some("1709627400000".to_string());
        assert_eq!(user.created_at_utc().unwrap().hour(), 8);

        user.created_at = Some("2024-03-05 08:30:00".to_string());
        assert_eq!(user.created_at_utc().unwrap().minute(), 30);

        user.created_at = Some("yesterday".to_string());
        assert!(user.created_at_utc().is_none());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
