use anyhow::bail;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{bookmarks::repo::Bookmark, state::AppState};

/// Title and description pulled out of a fetched page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Retrieve the page and extract metadata. The shared client carries the
/// configured timeout, so a hanging remote fails the fetch instead of
/// tying up the caller.
pub async fn fetch_metadata(client: &reqwest::Client, url: &str) -> anyhow::Result<PageMetadata> {
    let body = client.get(url).send().await?.text().await?;
    if body.is_empty() {
        bail!("empty body from {url}");
    }
    Ok(extract_metadata(&body))
}

/// Best-effort enrichment, run after the bookmark row is committed: fetch
/// the page off the request path and fill in title/description if anything
/// came back. Failures only log; the bookmark stays a bare url.
pub fn spawn_enrichment(state: AppState, bookmark_id: Uuid, url: String) {
    tokio::spawn(async move {
        match fetch_metadata(&state.http, &url).await {
            Ok(meta) if !meta.is_empty() => {
                if let Err(e) = Bookmark::set_metadata(
                    &state.db,
                    bookmark_id,
                    meta.title.as_deref(),
                    meta.description.as_deref(),
                )
                .await
                {
                    warn!(error = %e, bookmark_id = %bookmark_id, "saving fetched metadata failed");
                }
            }
            Ok(_) => debug!(url = %url, "page had no usable metadata"),
            Err(e) => warn!(error = %e, url = %url, "metadata fetch failed"),
        }
    });
}

fn extract_metadata(html: &str) -> PageMetadata {
    lazy_static! {
        static ref OG_TITLE: Selector = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
        static ref OG_DESCRIPTION: Selector =
            Selector::parse(r#"meta[property="og:description"]"#).unwrap();
        static ref META_DESCRIPTION: Selector =
            Selector::parse(r#"meta[name="description"]"#).unwrap();
        static ref TITLE: Selector = Selector::parse("title").unwrap();
    }

    let doc = Html::parse_document(html);

    let meta_content = |sel: &Selector| {
        doc.select(sel)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    };

    let title = meta_content(&OG_TITLE).or_else(|| {
        doc.select(&TITLE)
            .map(|el| el.text().collect::<String>())
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    });

    let description = meta_content(&OG_DESCRIPTION).or_else(|| meta_content(&META_DESCRIPTION));

    PageMetadata { title, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_meta_description() {
        let html = r#"
            <html>
              <head>
                <title>Representational state transfer - Wikipedia</title>
                <meta name="description" content="REST is a software architecture style.">
              </head>
              <body><h1>REST</h1></body>
            </html>
        "#;
        let meta = extract_metadata(html);
        assert_eq!(
            meta.title.as_deref(),
            Some("Representational state transfer - Wikipedia")
        );
        assert_eq!(
            meta.description.as_deref(),
            Some("REST is a software architecture style.")
        );
    }

    #[test]
    fn open_graph_tags_win_over_fallbacks() {
        let html = r#"
            <html>
              <head>
                <title>fallback title</title>
                <meta property="og:title" content="OG Title">
                <meta name="description" content="fallback description">
                <meta property="og:description" content="OG description">
              </head>
            </html>
        "#;
        let meta = extract_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("OG Title"));
        assert_eq!(meta.description.as_deref(), Some("OG description"));
    }

    #[test]
    fn title_text_is_trimmed() {
        let html = "<html><head><title>\n  Spaced Out  \n</title></head></html>";
        let meta = extract_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Spaced Out"));
    }

    #[test]
    fn empty_meta_content_falls_through() {
        let html = r#"
            <html>
              <head>
                <meta property="og:title" content="">
                <title>Real Title</title>
              </head>
            </html>
        "#;
        let meta = extract_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Real Title"));
    }

    #[test]
    fn page_without_metadata_yields_empty() {
        let meta = extract_metadata("<html><body><p>nothing here</p></body></html>");
        assert!(meta.is_empty());
        assert_eq!(meta.title, None);
        assert_eq!(meta.description, None);
    }

    #[test]
    fn garbage_input_does_not_panic() {
        let meta = extract_metadata("<<<not actually html >>>");
        assert!(meta.is_empty());
    }
}
