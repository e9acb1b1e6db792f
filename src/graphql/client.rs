//! Typed GraphQL client over a pluggable transport

use super::operations::{
    AddFile, AddFileVariables, CheckToken, Credentials, Login, LoginOutcome, MediaItem, MediaItems,
    User,
};
use super::{GraphQlRequest, GraphQlTransport, Operation};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Executes typed operations against the media API
pub struct GraphQlClient<T> {
    transport: T,
}

impl<T: GraphQlTransport> GraphQlClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute an operation
    ///
    /// Authenticated operations fail with [`ClientError::NoSession`] before
    /// any request is sent when `session` is `None`.
    pub async fn execute<O: Operation>(
        &self,
        variables: &O::Variables,
        session: Option<&Session>,
    ) -> ClientResult<O::Output> {
        let bearer = if O::AUTHENTICATED {
            Some(session.ok_or(ClientError::NoSession)?.token())
        } else {
            None
        };

        let request = GraphQlRequest::for_operation::<O>(variables)?;

        tracing::debug!(
            operation = O::NAME,
            authenticated = O::AUTHENTICATED,
            "Sending GraphQL request"
        );

        let response = self.transport.execute(&request, bearer).await?;
        let data: O::Data = response.into_data(O::NAME)?;
        O::output(data)
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginOutcome> {
        self.execute::<Login>(credentials, None).await
    }

    pub async fn check_token(&self, session: &Session) -> ClientResult<User> {
        self.execute::<CheckToken>(&(), Some(session)).await
    }

    pub async fn add_file(&self, session: &Session, file_path: &str) -> ClientResult<()> {
        let variables = AddFileVariables {
            file_path: file_path.to_string(),
        };
        self.execute::<AddFile>(&variables, Some(session)).await
    }

    pub async fn media_items(&self) -> ClientResult<Vec<MediaItem>> {
        self.execute::<MediaItems>(&(), None).await
    }
}
