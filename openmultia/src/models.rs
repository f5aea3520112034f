//! Model listing.

use serde_json::Value;

use crate::client::OpenMultia;
use crate::error::Result;

/// Models facade.
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    client: &'a OpenMultia,
}

impl<'a> Models<'a> {
    pub(crate) const fn new(client: &'a OpenMultia) -> Self {
        Self { client }
    }

    /// List the models the server can run.
    ///
    /// The body is returned as decoded JSON; its shape is defined by the
    /// server.
    pub async fn list(&self) -> Result<Value> {
        let response = OpenMultia::send(self.client.get("/list/models")).await?;
        OpenMultia::decode(response, "JSON model list").await
    }
}
