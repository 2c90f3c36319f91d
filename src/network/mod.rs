use regex::Regex;
use reqwest::header;
use tokio::time;

use crate::config::{Config, Credentials};
use crate::error::{Error, Result, TransportError};
use crate::network::lists::{ExportedList, ListDescriptor};
use crate::network::markup::Markup;
use crate::network::urls::*;

pub(crate) mod discover;
pub mod lists;
pub mod markup;
mod urls;

pub struct Network {
    config: Config,
    client: reqwest::Client,
    /// Same cookies, but leaves redirects alone so the profile redirect can be read
    no_redirect_client: reqwest::Client,
    cookie_source: String,
    markup: Markup,
}

impl Network {
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Network> {
        // every request carries the user's cookies
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::COOKIE,
            header::HeaderValue::from_str(&credentials.cookie_header()).map_err(|e| {
                Error::config(format!(
                    "Error constructing cookie header from {}: {}",
                    config.cookies_file.display(),
                    e
                ))
            })?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers.clone())
            .build()
            .map_err(|e| Error::config(format!("Error building request client: {}", e)))?;
        let no_redirect_client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::config(format!("Error building request client: {}", e)))?;

        Ok(Network {
            config: config.clone(),
            client,
            no_redirect_client,
            cookie_source: config.cookies_file.display().to_string(),
            markup: Markup::default(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response> {
        let resp = request
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_owned(),
                source: e,
            })?;
        let status = resp.status();
        tracing::debug!(%url, %status, "response");
        if status.is_client_error() || status.is_server_error() {
            return Err(TransportError::Status {
                url: url.to_owned(),
                status,
            }
            .into());
        }
        Ok(resp)
    }

    async fn get_page(&self, path: &str) -> Result<(String, String)> {
        let url = self.url(path);
        let resp = self.send(self.client.get(&url), &url).await?;
        let text = resp.text().await.map_err(|e| TransportError::Body {
            url: url.clone(),
            source: e,
        })?;
        Ok((url, text))
    }

    /// User ID is required for exporting any lists. Cookie validity is also
    /// checked here: the profile page redirects to `/user/ur.../` only for a
    /// logged-in session.
    pub async fn fetch_user_id(&self) -> Result<String> {
        lazy_static! {
            static ref USER_ID: Regex = Regex::new(r"ur\d+").unwrap();
        }

        let url = self.url(PROFILE_PATH);
        let resp = self.send(self.no_redirect_client.head(&url), &url).await?;
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        tracing::debug!(%location, "profile redirect");

        USER_ID
            .find(location)
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| Error::AuthenticationFailed {
                cookie_source: self.cookie_source.clone(),
            })
    }

    /// All requests are throttled just in case.
    pub async fn export_list(&self, list: ListDescriptor) -> Result<ExportedList> {
        time::sleep(self.config.export_delay()).await;
        println!("Downloading: {}", list.display_title());

        let url = self.url(&format!("{}{}", list.source_path(), EXPORT_SUFFIX));
        let resp = self.send(self.client.get(&url), &url).await?;
        let content = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Body {
                url: url.clone(),
                source: e,
            })?;
        Ok(list.with_content(content.to_vec()))
    }
}
