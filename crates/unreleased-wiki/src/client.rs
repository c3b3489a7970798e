//! Confluence XML-RPC client.

use std::collections::BTreeMap;

use tracing::{debug, info};
use unreleased_config::WikiConfig;

use crate::xmlrpc::{Value, method_call, parse_response};
use crate::{WikiError, WikiResult};

/// Client for the Confluence v1 XML-RPC API.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    client: reqwest::Client,
    rpc_url: String,
}

impl ConfluenceClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(rpc_url: impl Into<String>) -> WikiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    /// Invokes a remote method.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, a fault,
    /// or an unreadable response.
    pub async fn call(&self, method: &str, params: &[Value]) -> WikiResult<Value> {
        debug!(method, url = %self.rpc_url, "XML-RPC call");
        let body = self
            .client
            .post(&self.rpc_url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(method_call(method, params))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_response(&body)
    }

    /// Logs in and returns the session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or does not return a token.
    pub async fn login(&self, user: &str, password: &str) -> WikiResult<String> {
        let token = self
            .call(
                "confluence1.login",
                &[
                    Value::String(user.to_string()),
                    Value::String(password.to_string()),
                ],
            )
            .await?;
        token
            .as_str()
            .map(String::from)
            .ok_or_else(|| WikiError::Protocol("login did not return a token".into()))
    }

    /// Fetches a page by space key and title.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or does not return a page.
    pub async fn get_page(
        &self,
        token: &str,
        space: &str,
        title: &str,
    ) -> WikiResult<BTreeMap<String, Value>> {
        self.call(
            "confluence1.getPage",
            &[
                Value::String(token.to_string()),
                Value::String(space.to_string()),
                Value::String(title.to_string()),
            ],
        )
        .await?
        .into_struct()
        .ok_or_else(|| WikiError::Protocol("getPage did not return a page".into()))
    }

    /// Stores a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn store_page(
        &self,
        token: &str,
        page: BTreeMap<String, Value>,
    ) -> WikiResult<Value> {
        self.call(
            "confluence1.storePage",
            &[Value::String(token.to_string()), Value::Struct(page)],
        )
        .await
    }

    /// Replaces the content of the configured page.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be read or any call fails.
    pub async fn publish(&self, config: &WikiConfig, content: &str) -> WikiResult<()> {
        let password = config.read_password()?;
        let token = self.login(&config.user, &password).await?;

        let mut page = self.get_page(&token, &config.space, &config.page).await?;
        page.insert("content".to_string(), Value::String(content.to_string()));
        self.store_page(&token, page).await?;

        info!(space = %config.space, page = %config.page, "page updated");
        Ok(())
    }
}
