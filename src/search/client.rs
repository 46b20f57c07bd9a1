// SPDX-License-Identifier: MPL-2.0
//! HTTP client for the search server.
//!
//! Cheap to clone: clones share one connection pool and one cookie store,
//! so the login and locale cookies follow every request.

use crate::error::Result;
use crate::search::page_globals::PageGlobals;
use crate::search::query::{ResultsQuery, SearchSubmission};
use crate::search::response::SearchResponse;
use crate::search::routes::Routes;
use crate::search::validation::SelectedImage;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;

const USER_AGENT: &str = concat!("SearchLens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    routes: Routes,
}

impl SearchClient {
    pub fn new(routes: Routes, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, routes })
    }

    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Reads the upload limits from the index page.
    pub async fn fetch_page_globals(&self) -> Result<PageGlobals> {
        let page = self.get_text(self.routes.index()).await?;
        Ok(PageGlobals::parse(&page))
    }

    /// Posts the password form. Returns false when the server sent us back
    /// to the login page.
    pub async fn login(&self, password: &str) -> Result<bool> {
        let url = self.routes.login();
        tracing::debug!(%url, "POST login");
        let response = self
            .http
            .post(url)
            .form(&[("password", password)])
            .send()
            .await?
            .error_for_status()?;
        let accepted = !response.url().path().trim_end_matches('/').ends_with("/login");
        if !accepted {
            tracing::warn!("login rejected by server");
        }
        Ok(accepted)
    }

    /// Asks the server to render fragments in `code`.
    pub async fn select_locale(&self, code: &str) -> Result<()> {
        let url = self.routes.locale(code);
        tracing::debug!(%url, "GET locale");
        self.http.get(url).send().await?.error_for_status()?;
        Ok(())
    }

    pub async fn fetch_help(&self) -> Result<String> {
        self.get_text(self.routes.help()).await
    }

    /// Starts a new search. The file part is omitted without an image.
    pub async fn post_search(
        &self,
        submission: SearchSubmission,
        image: Option<SelectedImage>,
    ) -> Result<SearchResponse> {
        let mut form = Form::new()
            .text("query_text", submission.query_text)
            .text("text_filter", submission.text_filter.to_string())
            .text("include_digits", submission.include_digits.to_string());
        if let Some(image) = image {
            tracing::info!(file = %image.name, size = image.size, "uploading search image");
            form = form.part("file", Part::bytes(image.bytes).file_name(image.name));
        }

        let url = self.routes.search();
        tracing::debug!(%url, "POST search");
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        SearchResponse::from_json(&body)
    }

    pub async fn fetch_results(&self, query: ResultsQuery) -> Result<String> {
        self.get_text(self.routes.results(&query)).await
    }

    pub async fn fetch_group(&self, group: String, query: ResultsQuery) -> Result<String> {
        self.get_text(self.routes.group(&group, &query)).await
    }

    pub async fn fetch_item(&self, group: String, item: String) -> Result<String> {
        self.get_text(self.routes.item(&group, &item)).await
    }

    /// Downloads an image referenced by a fragment.
    pub async fn fetch_image(&self, src: String) -> Result<Vec<u8>> {
        let url = self.routes.resolve(&src)?;
        tracing::debug!(%url, "GET image");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
