//! News search feed retrieval.
//!
//! [`FeedFetcher`] is the seam between the scanner and the outside world.
//! [`GoogleNewsFeed`] is the production implementation: it URL-encodes the
//! query into the search endpoint, downloads the feed and parses it with
//! [`parse_feed`]. Tests substitute an in-memory fetcher.
//!
//! # Formats
//!
//! | Container | Title | Link | Published | Summary |
//! |-----------|-------|------|-----------|---------|
//! | RSS `<item>` | `title` | `link` text | `pubDate` / `dc:date` | `description` |
//! | Atom `<entry>` | `title` | `link href` | `published` / `updated` | `summary` / `content` |

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::models::RawEntry;
use crate::utils::truncate_for_log;

/// Default search feed endpoint.
pub const DEFAULT_FEED_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Fixed locale and ordering parameters appended to every search.
const SEARCH_PARAMS: &str = "hl=en-US&gl=US&ceid=US:en&scoring=d";

/// Source of raw feed entries for a search query.
pub trait FeedFetcher {
    /// Run `query` against the feed and return its entries in feed order.
    async fn fetch(&self, query: &str) -> Result<Vec<RawEntry>, Box<dyn Error>>;
}

/// Google News RSS search client.
#[derive(Debug, Clone)]
pub struct GoogleNewsFeed {
    client: Client,
    endpoint: String,
}

impl GoogleNewsFeed {
    /// Create a client for `endpoint`, e.g. `https://news.google.com/rss/search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let parsed = Url::parse(endpoint)?;
        if parsed.cannot_be_a_base() {
            return Err(format!("feed endpoint is not a base URL: {endpoint}").into());
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('?').to_string(),
        })
    }

    /// Full search URL for `query`.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&{}",
            self.endpoint,
            urlencoding::encode(query),
            SEARCH_PARAMS
        )
    }
}

impl FeedFetcher for GoogleNewsFeed {
    #[instrument(level = "debug", skip_all)]
    async fn fetch(&self, query: &str) -> Result<Vec<RawEntry>, Box<dyn Error>> {
        let url = self.search_url(query);
        debug!(%url, "Fetching search feed");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match parse_feed(&body) {
            Ok(entries) => {
                info!(count = entries.len(), "Fetched feed entries");
                Ok(entries)
            }
            Err(e) => {
                warn!(error = %e, body_preview = %truncate_for_log(&body, 200), "Feed did not parse");
                Err(e)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
    Summary,
}

fn field_for(name: &[u8]) -> Option<Field> {
    match name {
        b"title" => Some(Field::Title),
        b"link" => Some(Field::Link),
        b"pubDate" | b"published" | b"updated" | b"dc:date" => Some(Field::Published),
        b"description" | b"summary" | b"content" => Some(Field::Summary),
        _ => None,
    }
}

fn is_entry(name: &[u8]) -> bool {
    matches!(name, b"item" | b"entry")
}

/// Entry under construction; fields keep the first value seen.
#[derive(Default)]
struct EntryBuilder {
    title: String,
    link: String,
    published: Option<String>,
    summary: Option<String>,
}

impl EntryBuilder {
    fn push_text(&mut self, field: Field, text: &str) {
        match field {
            Field::Title => self.title.push_str(text),
            Field::Link => self.link.push_str(text),
            Field::Published => self.published.get_or_insert_with(String::new).push_str(text),
            Field::Summary => self.summary.get_or_insert_with(String::new).push_str(text),
        }
    }

    fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => !self.title.is_empty(),
            Field::Link => !self.link.is_empty(),
            Field::Published => self.published.is_some(),
            Field::Summary => self.summary.is_some(),
        }
    }

    fn set_atom_link(&mut self, e: &BytesStart<'_>) {
        if !self.link.is_empty() {
            return;
        }
        let mut href = None;
        let mut alternate = true;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"href" => href = attr.unescape_value().ok().map(|v| v.into_owned()),
                b"rel" => alternate = &*attr.value == b"alternate",
                _ => {}
            }
        }
        if let (Some(href), true) = (href, alternate) {
            self.link = href;
        }
    }

    fn finish(self) -> Option<RawEntry> {
        let title = self.title.trim().to_string();
        let link = self.link.trim().to_string();
        if title.is_empty() && link.is_empty() {
            return None;
        }
        Some(RawEntry {
            title,
            link,
            published: self.published.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            summary: self.summary,
        })
    }
}

/// Parse an RSS 2.0 or Atom document into raw entries, in document order.
///
/// Summaries are returned as the feed carries them (usually HTML); cleanup is
/// left to [`crate::sanitize::sanitize`].
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    let mut field: Option<Field> = None;
    let mut skip_field = false;
    // Depth below the active field element; nested markup stays in the field.
    let mut field_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if is_entry(name.as_ref()) {
                    current = Some(EntryBuilder::default());
                    field = None;
                    field_depth = 0;
                } else if let Some(entry) = current.as_mut() {
                    if field.is_some() {
                        field_depth += 1;
                    } else {
                        field = field_for(name.as_ref());
                        skip_field = field.is_some_and(|f| entry.has(f));
                        if field == Some(Field::Link) {
                            entry.set_atom_link(&e);
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    if field.is_none() && e.name().as_ref() == b"link" {
                        entry.set_atom_link(&e);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if is_entry(name.as_ref()) {
                    if let Some(entry) = current.take().and_then(EntryBuilder::finish) {
                        entries.push(entry);
                    }
                    field = None;
                } else if field.is_some() {
                    if field_depth == 0 {
                        field = None;
                    } else {
                        field_depth -= 1;
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(entry), Some(f), false) = (current.as_mut(), field, skip_field) {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    entry.push_text(f, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(entry), Some(f), false) = (current.as_mut(), field, skip_field) {
                    entry.push_text(f, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Box::new(e)),
            _ => {}
        }
    }

    Ok(entries)
}
