//! Opportunistic image warming for templates that are not yet rendered.

use std::collections::HashSet;

use crate::platform::ImageSurface;

/// Maximum number of images warmed per document.
pub const DEFAULT_WARM_LIMIT: usize = 8;

/// First `limit` distinct, non-empty URLs in input order.
#[must_use]
pub fn collect_warm_urls<I, S>(sources: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for source in sources {
        if urls.len() == limit {
            break;
        }
        let url = source.as_ref().trim();
        if url.is_empty() || !seen.insert(url.to_string()) {
            continue;
        }
        urls.push(url.to_string());
    }
    urls
}

/// Warms template images once per document.
#[derive(Debug, Clone)]
pub struct ImageWarmer {
    limit: usize,
    done: bool,
}

impl ImageWarmer {
    /// A warmer that loads at most `limit` images.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit, done: false }
    }

    /// Whether warming already ran.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Issue loads for template images. Returns how many were started;
    /// later calls do nothing.
    pub fn run<P: ImageSurface + ?Sized>(&mut self, platform: &mut P) -> usize {
        if self.done {
            return 0;
        }
        self.done = true;
        let urls = collect_warm_urls(platform.template_image_sources(), self.limit);
        for url in &urls {
            platform.warm_image(url);
        }
        tracing::debug!("Warming {} template images", urls.len());
        urls.len()
    }
}

impl Default for ImageWarmer {
    fn default() -> Self {
        Self::new(DEFAULT_WARM_LIMIT)
    }
}
