mod client;

pub use client::{graphql_url, FetchTransport, FormUploader, DEFAULT_GRAPHQL_URL};
