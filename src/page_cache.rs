//! Revalidating cache for CMS page data
//!
//! Blog pages and the home form are rendered from CMS data that changes
//! rarely. Successful fetches are kept for the configured TTL; failures are
//! never cached, so the next request retries the CMS.

use std::sync::Arc;

use moka::future::Cache;

use crate::contact_form::FormConfig;
use crate::wordpress::{Media, Post, PostQuery, WordPressClient};

const MAX_ENTRIES: u64 = 1_000;

#[derive(Clone)]
pub struct PageCache {
    client: WordPressClient,
    posts: Cache<PostQuery, Arc<Vec<Post>>>,
    post_by_slug: Cache<String, Arc<Option<Post>>>,
    media: Cache<u64, Arc<Media>>,
    forms: Cache<u64, Arc<FormConfig>>,
}

impl PageCache {
    pub fn new(client: WordPressClient) -> Self {
        let ttl = client.config().cache_ttl;
        tracing::info!("Page cache TTL: {:?}", ttl);

        Self {
            posts: Cache::builder().max_capacity(MAX_ENTRIES).time_to_live(ttl).build(),
            post_by_slug: Cache::builder().max_capacity(MAX_ENTRIES).time_to_live(ttl).build(),
            media: Cache::builder().max_capacity(MAX_ENTRIES).time_to_live(ttl).build(),
            forms: Cache::builder().max_capacity(MAX_ENTRIES).time_to_live(ttl).build(),
            client,
        }
    }

    pub fn client(&self) -> &WordPressClient {
        &self.client
    }

    /// Post listing; empty on failure
    pub async fn posts(&self, query: &PostQuery) -> Arc<Vec<Post>> {
        let client = &self.client;
        self.posts
            .try_get_with(query.clone(), async move {
                client.fetch_posts(query).await.map(Arc::new)
            })
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Error fetching posts: {}", e);
                Arc::new(Vec::new())
            })
    }

    /// Single post; a confirmed "no such slug" is cached like a hit
    pub async fn post_by_slug(&self, slug: &str) -> Option<Post> {
        let client = &self.client;
        let cached = self
            .post_by_slug
            .try_get_with(slug.to_string(), async move {
                client.fetch_post_by_slug(slug).await.map(Arc::new)
            })
            .await;

        match cached {
            Ok(post) => (*post).clone(),
            Err(e) => {
                tracing::error!("Error fetching post '{}': {}", slug, e);
                None
            }
        }
    }

    /// Media record; id 0 means no featured image
    pub async fn media(&self, media_id: u64) -> Option<Arc<Media>> {
        if media_id == 0 {
            return None;
        }
        let client = &self.client;
        self.media
            .try_get_with(media_id, async move {
                client.fetch_media(media_id).await.map(Arc::new)
            })
            .await
            .map_err(|e| tracing::error!("Error fetching media {}: {}", media_id, e))
            .ok()
    }

    /// Schema-driven form configuration for server-rendered forms
    pub async fn form_config(&self, form_id: u64) -> Option<Arc<FormConfig>> {
        if let Some(form) = self.forms.get(&form_id).await {
            return Some(form);
        }
        let form = Arc::new(self.client.get_contact_form_config(Some(form_id)).await?);
        self.forms.insert(form_id, form.clone()).await;
        Some(form)
    }
}
