// SPDX-License-Identifier: MPL-2.0
//! In-memory cache of images referenced by fragments.
//!
//! Result pages reuse the same wrapper photos when paging back and forth,
//! so decoded handles are kept in an LRU keyed by the `src` attribute.

use iced::widget::image;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// State of one image source.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState<'a> {
    Ready(&'a image::Handle),
    Loading,
    Failed,
    Unknown,
}

#[derive(Debug)]
pub struct ImageCache {
    ready: LruCache<String, image::Handle>,
    loading: HashSet<String>,
    failed: HashSet<String>,
}

impl ImageCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ready: LruCache::new(capacity),
            loading: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    /// Sources among `sources` that still have to be fetched. They are
    /// marked as loading, so a second call does not return them again.
    pub fn claim_missing(&mut self, sources: &[String]) -> Vec<String> {
        let mut missing = Vec::new();
        for src in sources {
            if self.ready.contains(src) {
                // Refresh recency for images that are about to be shown
                self.ready.promote(src);
                continue;
            }
            if self.loading.contains(src) || self.failed.contains(src) {
                continue;
            }
            self.loading.insert(src.clone());
            missing.push(src.clone());
        }
        missing
    }

    pub fn insert(&mut self, src: String, bytes: Vec<u8>) {
        self.loading.remove(&src);
        self.failed.remove(&src);
        self.ready.put(src, image::Handle::from_bytes(bytes));
    }

    pub fn mark_failed(&mut self, src: String) {
        self.loading.remove(&src);
        self.failed.insert(src);
    }

    /// Forgets failures so the next page view retries them.
    pub fn clear_failures(&mut self) {
        self.failed.clear();
    }

    #[must_use]
    pub fn state(&self, src: &str) -> ImageState<'_> {
        if let Some(handle) = self.ready.peek(src) {
            ImageState::Ready(handle)
        } else if self.loading.contains(src) {
            ImageState::Loading
        } else if self.failed.contains(src) {
            ImageState::Failed
        } else {
            ImageState::Unknown
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(crate::config::IMAGE_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_sources_are_claimed_once() {
        let mut cache = ImageCache::new(4);
        let wanted = sources(&["a.png", "b.png"]);

        assert_eq!(cache.claim_missing(&wanted), wanted);
        assert!(cache.claim_missing(&wanted).is_empty());
        assert_eq!(cache.state("a.png"), ImageState::Loading);
    }

    #[test]
    fn inserted_image_is_ready() {
        let mut cache = ImageCache::new(4);
        cache.claim_missing(&sources(&["a.png"]));
        cache.insert("a.png".to_string(), vec![0, 1, 2]);

        assert!(matches!(cache.state("a.png"), ImageState::Ready(_)));
        assert!(cache.claim_missing(&sources(&["a.png"])).is_empty());
    }

    #[test]
    fn failures_are_not_retried_until_cleared() {
        let mut cache = ImageCache::new(4);
        cache.claim_missing(&sources(&["bad.png"]));
        cache.mark_failed("bad.png".to_string());

        assert_eq!(cache.state("bad.png"), ImageState::Failed);
        assert!(cache.claim_missing(&sources(&["bad.png"])).is_empty());

        cache.clear_failures();
        assert_eq!(cache.claim_missing(&sources(&["bad.png"])).len(), 1);
    }

    #[test]
    fn least_recently_used_image_is_evicted() {
        let mut cache = ImageCache::new(2);
        cache.insert("a".to_string(), vec![1]);
        cache.insert("b".to_string(), vec![2]);
        cache.claim_missing(&sources(&["a"]));
        cache.insert("c".to_string(), vec![3]);

        assert_eq!(cache.len(), 2);
        assert!(matches!(cache.state("a"), ImageState::Ready(_)));
        assert_eq!(cache.state("b"), ImageState::Unknown);
    }

    #[test]
    fn zero_capacity_falls_back_to_one() {
        let mut cache = ImageCache::new(0);
        cache.insert("a".to_string(), vec![1]);
        assert_eq!(cache.len(), 1);
    }
}
