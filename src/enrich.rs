use std::future::Future;

use crate::extract::parse_metadata;
use crate::fetch::{FetchError, PageFetcher};
use crate::models::{EnrichmentRequest, EnrichmentResult};
use crate::urls::extract_domain;

/// Turns a link into a card title and preview image.
#[derive(Clone, Debug)]
pub struct Enricher {
    fetcher: PageFetcher,
}

impl Enricher {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Run one enrichment attempt. Never fails: every error, including a
    /// panic in the pipeline, comes back as [`EnrichmentResult::Failure`].
    pub async fn enrich(&self, request: EnrichmentRequest) -> EnrichmentResult {
        if request.url.is_empty() {
            return EnrichmentResult::url_required();
        }

        let this = self.clone();
        let url = request.url;
        catch_faults(async move { this.run(&url).await }).await
    }

    async fn run(&self, url: &str) -> EnrichmentResult {
        let domain = extract_domain(url);

        let html = match self.fetcher.fetch_page(url).await {
            Ok(html) => html,
            Err(e) => {
                match &e {
                    FetchError::Status(status) => {
                        tracing::warn!(%url, status, "link target returned an error status")
                    }
                    FetchError::Network(msg) => {
                        tracing::warn!(%url, error = %msg, "could not fetch link target")
                    }
                }
                return EnrichmentResult::failure(e.to_string(), domain);
            }
        };

        let parsed = parse_metadata(&html);
        tracing::debug!(%url, found_title = parsed.title.is_some(), found_image = parsed.image.is_some(), "parsed page metadata");

        EnrichmentResult::Success {
            title: parsed.title.unwrap_or(domain),
            image: parsed.image,
        }
    }
}

/// Run `pipeline` on its own task so a panic inside it surfaces as a
/// `JoinError` and is answered with `Unexpected error` instead of unwinding
/// into the caller.
async fn catch_faults<F>(pipeline: F) -> EnrichmentResult
where
    F: Future<Output = EnrichmentResult> + Send + 'static,
{
    match tokio::spawn(pipeline).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "enrichment task aborted");
            EnrichmentResult::unexpected()
        }
    }
}
