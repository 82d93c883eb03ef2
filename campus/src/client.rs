//! # Campus API client
//!
//! This module provides the HTTP client for the Campus learning platform:
//! CRUD access to courses, lessons, content items, assets and web packages,
//! plus the [`Publisher`] implementation that bridges the core publish
//! pipeline to the real API.
//!
//! All requests authenticate with HTTP Basic Auth, the API key as username
//! and an empty password. Responses are JSON; list endpoints paginate with
//! `page`/`page_size` query parameters.
//!
//! ## Client Usage
//!
//! - Construct a [`ClientConfig`] explicitly, or from the environment
//!   (`CAMPUS_API_KEY`, optional `CAMPUS_BASE_URL`) via
//!   [`ClientConfig::from_env`].
//! - Pass it to [`CampusClient::new`]; the client owns transport,
//!   serialization and error handling.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{error, info};

use campus_core::contract::{self, Publisher};

/// Base URL of the hosted platform, overridable per environment.
pub const DEFAULT_BASE_URL: &str = "https://api.campuslearn.io";

pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a config from `CAMPUS_API_KEY` and (optionally)
    /// `CAMPUS_BASE_URL`, loading a `.env` file first when present.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("CAMPUS_API_KEY").map_err(|e| {
            error!(error = ?e, "CAMPUS_API_KEY missing in environment");
            ClientError::MissingApiKey
        })?;
        let base_url =
            std::env::var("CAMPUS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        info!(
            api_key_set = !api_key.is_empty(),
            base_url = %base_url,
            "Initialized client configuration from environment"
        );
        Ok(ClientConfig::new(base_url, api_key))
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("CAMPUS_API_KEY missing in environment")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One page of a list endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn page_params(page: PageQuery) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.page.to_string()),
        ("page_size", page.page_size.to_string()),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLesson<'a> {
    pub course_id: i64,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    pub lesson_id: i64,
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLesson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContentItem<'a> {
    pub lesson_id: i64,
    pub title: &'a str,
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_package_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    pub content_item_id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub kind: String,
    #[serde(default)]
    pub web_package_id: Option<i64>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateContentItem<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub asset_id: i64,
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebPackage {
    pub web_package_id: i64,
    pub lesson_id: i64,
    pub name: String,
    pub checksum: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
}

pub struct CampusClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl CampusClient {
    pub fn new(config: ClientConfig) -> Self {
        CampusClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Ok(CampusClient::new(ClientConfig::from_env()?))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url, path)
    }

    async fn check(
        &self,
        method: &'static str,
        url: String,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<failed to decode response body>"));
        error!(method, url = %url, status = %status, "Campus API returned an error");
        Err(ClientError::Status {
            method,
            url,
            status,
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .basic_auth(&self.config.api_key, Some(""))
            .send()
            .await?;
        Ok(self.check("GET", url, response).await?.json::<T>().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .json(body)
            .send()
            .await?;
        Ok(self.check("POST", url, response).await?.json::<T>().await?)
    }

    async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .patch(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .json(body)
            .send()
            .await?;
        Ok(self.check("PATCH", url, response).await?.json::<T>().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .delete(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .send()
            .await?;
        self.check("DELETE", url, response).await?;
        Ok(())
    }

    // --- Courses ---

    pub async fn list_courses(&self, page: PageQuery) -> Result<Page<Course>, ClientError> {
        self.get_json("courses", &page_params(page)).await
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Course, ClientError> {
        self.get_json(&format!("courses/{course_id}"), &[]).await
    }

    // --- Lessons ---

    pub async fn create_lesson(&self, new_lesson: &NewLesson<'_>) -> Result<Lesson, ClientError> {
        info!(
            course_id = new_lesson.course_id,
            title = new_lesson.title,
            "Creating lesson"
        );
        self.post_json("lessons", new_lesson).await
    }

    pub async fn get_lesson(&self, lesson_id: i64) -> Result<Lesson, ClientError> {
        self.get_json(&format!("lessons/{lesson_id}"), &[]).await
    }

    pub async fn list_lessons(
        &self,
        course_id: Option<i64>,
        page: PageQuery,
    ) -> Result<Page<Lesson>, ClientError> {
        let mut query = page_params(page);
        if let Some(course_id) = course_id {
            query.push(("course_id", course_id.to_string()));
        }
        self.get_json("lessons", &query).await
    }

    /// Walk the paginated lesson listing until every page is fetched.
    pub async fn list_all_lessons(&self, course_id: Option<i64>) -> Result<Vec<Lesson>, ClientError> {
        let mut page = PageQuery::default();
        let mut lessons: Vec<Lesson> = Vec::new();
        loop {
            let batch = self.list_lessons(course_id, page).await?;
            let fetched = batch.items.len();
            lessons.extend(batch.items);
            if fetched == 0 || lessons.len() as u64 >= batch.total_items {
                break;
            }
            page.page += 1;
        }
        info!(count = lessons.len(), "Fetched all lessons");
        Ok(lessons)
    }

    pub async fn update_lesson(
        &self,
        lesson_id: i64,
        update: &UpdateLesson<'_>,
    ) -> Result<Lesson, ClientError> {
        self.patch_json(&format!("lessons/{lesson_id}"), update).await
    }

    pub async fn delete_lesson(&self, lesson_id: i64) -> Result<(), ClientError> {
        info!(lesson_id, "Deleting lesson");
        self.delete(&format!("lessons/{lesson_id}")).await
    }

    // --- Content items ---

    pub async fn create_content_item(
        &self,
        req: &NewContentItem<'_>,
    ) -> Result<ContentItem, ClientError> {
        info!(
            lesson_id = req.lesson_id,
            title = req.title,
            kind = req.kind,
            "Creating content item"
        );
        self.post_json("content-items", req).await
    }

    pub async fn get_content_item(&self, content_item_id: i64) -> Result<ContentItem, ClientError> {
        self.get_json(&format!("content-items/{content_item_id}"), &[])
            .await
    }

    pub async fn list_content_items(
        &self,
        lesson_id: Option<i64>,
        page: PageQuery,
    ) -> Result<Page<ContentItem>, ClientError> {
        let mut query = page_params(page);
        if let Some(lesson_id) = lesson_id {
            query.push(("lesson_id", lesson_id.to_string()));
        }
        self.get_json("content-items", &query).await
    }

    pub async fn update_content_item(
        &self,
        content_item_id: i64,
        update: &UpdateContentItem<'_>,
    ) -> Result<ContentItem, ClientError> {
        self.patch_json(&format!("content-items/{content_item_id}"), update)
            .await
    }

    pub async fn delete_content_item(&self, content_item_id: i64) -> Result<(), ClientError> {
        info!(content_item_id, "Deleting content item");
        self.delete(&format!("content-items/{content_item_id}")).await
    }

    // --- Assets ---

    pub async fn list_assets(&self, page: PageQuery) -> Result<Page<Asset>, ClientError> {
        self.get_json("assets", &page_params(page)).await
    }

    pub async fn get_asset(&self, asset_id: i64) -> Result<Asset, ClientError> {
        self.get_json(&format!("assets/{asset_id}"), &[]).await
    }

    pub async fn delete_asset(&self, asset_id: i64) -> Result<(), ClientError> {
        info!(asset_id, "Deleting asset");
        self.delete(&format!("assets/{asset_id}")).await
    }

    // --- Web packages ---

    /// Upload a packaged zip archive as a new web package for a lesson.
    ///
    /// The archive is read into memory and sent as a multipart upload with a
    /// SHA-256 checksum the server verifies on receipt.
    pub async fn upload_web_package(
        &self,
        lesson_id: i64,
        name: &str,
        archive: &Path,
    ) -> Result<WebPackage, ClientError> {
        let bytes = std::fs::read(archive)?;
        let checksum = {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            format!("{:x}", hasher.finalize())
        };
        info!(
            lesson_id,
            name,
            size_bytes = bytes.len(),
            archive = %archive.display(),
            "Uploading web package"
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str("application/zip")?;
        let form = multipart::Form::new()
            .text("lesson_id", lesson_id.to_string())
            .text("name", name.to_string())
            .text("checksum", checksum)
            .part("file", part);

        let url = self.url("web-packages");
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.api_key, Some(""))
            .multipart(form)
            .send()
            .await?;
        Ok(self.check("POST", url, response).await?.json().await?)
    }

    pub async fn get_web_package(&self, web_package_id: i64) -> Result<WebPackage, ClientError> {
        self.get_json(&format!("web-packages/{web_package_id}"), &[])
            .await
    }

    pub async fn list_web_packages(
        &self,
        lesson_id: Option<i64>,
        page: PageQuery,
    ) -> Result<Page<WebPackage>, ClientError> {
        let mut query = page_params(page);
        if let Some(lesson_id) = lesson_id {
            query.push(("lesson_id", lesson_id.to_string()));
        }
        self.get_json("web-packages", &query).await
    }

    pub async fn delete_web_package(&self, web_package_id: i64) -> Result<(), ClientError> {
        info!(web_package_id, "Deleting web package");
        self.delete(&format!("web-packages/{web_package_id}")).await
    }
}

#[async_trait]
impl Publisher for CampusClient {
    async fn upload_web_package<'a>(
        &self,
        req: contract::NewWebPackage<'a>,
    ) -> Result<contract::WebPackage, contract::PublishApiError> {
        let uploaded =
            CampusClient::upload_web_package(self, req.lesson_id, req.name, req.archive).await?;
        Ok(contract::WebPackage {
            web_package_id: uploaded.web_package_id,
            lesson_id: uploaded.lesson_id,
            name: uploaded.name,
            checksum: uploaded.checksum,
            updated_datetime: uploaded.updated_datetime,
        })
    }

    async fn create_content_item<'a>(
        &self,
        req: contract::NewContentItem<'a>,
    ) -> Result<contract::ContentItem, contract::PublishApiError> {
        let created = CampusClient::create_content_item(
            self,
            &NewContentItem {
                lesson_id: req.lesson_id,
                title: req.title,
                kind: "web_package",
                web_package_id: Some(req.web_package_id),
            },
        )
        .await?;
        Ok(contract::ContentItem {
            content_item_id: created.content_item_id,
            lesson_id: created.lesson_id,
            title: created.title,
            kind: created.kind,
            web_package_id: created.web_package_id,
            updated_datetime: created.updated_datetime,
        })
    }
}
