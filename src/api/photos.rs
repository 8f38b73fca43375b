//! Collection, photo detail, search, tagging and history calls.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::paths;
use crate::client::http::CSRF_HEADER;
use crate::client::{LumoClient, RequestOptions};
use crate::error::{LumoError, Result};
use crate::types::{Photo, PhotoDetail, SearchHistoryItem, SearchResult, TagKind};

#[derive(Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<SearchHistoryItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePhotoRequest<'a> {
    image_url: &'a str,
}

#[derive(Serialize)]
struct TagRequest<'a> {
    tag: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<TagKind>,
}

/// Photo calls; all of them require a signed-in session.
pub struct PhotoApi<'a> {
    client: &'a LumoClient,
}

impl<'a> PhotoApi<'a> {
    pub(crate) fn new(client: &'a LumoClient) -> Self {
        Self { client }
    }

    /// Photos saved to the user's collection.
    pub async fn collection(&self) -> Result<Vec<Photo>> {
        let response: CollectionResponse = self.get(paths::PHOTOS).await?;
        Ok(response.photos)
    }

    /// One photo with its recommendations.
    pub async fn photo(&self, id: &str) -> Result<PhotoDetail> {
        let path = photo_path(id, "")?;
        self.get(&path).await
    }

    /// Search photos by free text.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LumoError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }
        let url = self.client.url(paths::PHOTO_SEARCH);
        let response: SearchResponse = self
            .client
            .pipeline()
            .execute(
                || self.client.http().get(&url).query(&[("query", query)]),
                RequestOptions::default(),
            )
            .await?;
        Ok(response.results)
    }

    /// Save an image (e.g. a recommendation) into the collection.
    pub async fn save(&self, image_url: &str) -> Result<()> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(LumoError::InvalidArgument(
                "image URL must not be empty".to_string(),
            ));
        }
        self.send_mutation(
            reqwest::Method::POST,
            paths::PHOTOS,
            &SavePhotoRequest { image_url },
        )
        .await
    }

    /// Attach a tag to a photo. Returns the trimmed tag that was stored.
    pub async fn add_tag(&self, id: &str, tag: &str, kind: TagKind) -> Result<String> {
        let tag = validate_tag(tag)?;
        let path = photo_path(id, "/tags")?;
        let body = TagRequest {
            tag,
            kind: Some(kind),
        };
        self.send_mutation(reqwest::Method::POST, &path, &body)
            .await?;
        Ok(tag.to_string())
    }

    /// Detach a tag from a photo.
    pub async fn remove_tag(&self, id: &str, tag: &str) -> Result<()> {
        let tag = validate_tag(tag)?;
        let path = photo_path(id, "/tag")?;
        self.send_mutation(reqwest::Method::DELETE, &path, &TagRequest { tag, kind: None })
            .await
    }

    /// The user's past searches.
    pub async fn history(&self) -> Result<Vec<SearchHistoryItem>> {
        let response: HistoryResponse = self.get(paths::SEARCH_HISTORY).await?;
        Ok(response.history)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.client.url(path);
        self.client
            .pipeline()
            .execute(|| self.client.http().get(&url), RequestOptions::default())
            .await
    }

    async fn send_mutation<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let csrf = self.client.csrf_token().await?;
        let url = self.client.url(path);
        let _: IgnoredAny = self
            .client
            .pipeline()
            .execute(
                || {
                    self.client
                        .http()
                        .request(method.clone(), &url)
                        .header(CSRF_HEADER, csrf.as_str())
                        .json(body)
                },
                RequestOptions::default(),
            )
            .await?;
        Ok(())
    }
}

fn photo_path(id: &str, suffix: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(LumoError::InvalidArgument(format!("invalid photo id '{id}'")));
    }
    Ok(format!("{}/{id}{suffix}", paths::PHOTOS))
}

fn validate_tag(tag: &str) -> Result<&str> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(LumoError::InvalidArgument("tag must not be empty".to_string()));
    }
    Ok(tag)
}
