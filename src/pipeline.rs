//! Prompt to song list resolution.
//!
//! ```text
//! prompt ──► N concurrent completions (join all, tolerate failures)
//!        ──► split lines ──► parse "title" + artist ──► dedupe candidates
//!        ──► concurrent catalog searches ──► most popular match per candidate
//!        ──► dedupe by catalog id ──► saved-status annotation
//! ```
//!
//! The whole run is bounded by a wall-clock timeout. Requests already sent
//! when the timeout fires are abandoned, not cancelled on the wire.

use std::{collections::HashSet, sync::LazyLock, time::Duration};

use futures::future::join_all;
use regex::Regex;

use crate::{
    completion::CompletionSource,
    errors::{CatalogError, ResolveError},
    spotify::Catalog,
    types::{CatalogTrack, Song},
    utils,
};

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*").expect("valid ordinal pattern"));
static LEADING_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:by\s+|-\s+|–\s+)").expect("valid connector pattern"));
static TRAILING_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:\s+by|\s+-|\s+–)$").expect("valid connector pattern"));

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Concurrent completion requests per prompt.
    pub fanout: usize,
    pub timeout: Duration,
    /// Catalog items fetched per candidate.
    pub search_limit: u32,
    /// Attach the saved-to-library status to every song.
    pub annotate: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            fanout: 2,
            timeout: Duration::from_secs(25),
            search_limit: 2,
            annotate: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub songs: Vec<Song>,
    pub candidates: usize,
    /// Completion requests that failed while others succeeded.
    pub failed_completions: Vec<String>,
    /// Suggestion lines without a quoted title.
    pub skipped_lines: Vec<String>,
    /// `(query, reason)` per failed search.
    pub failed_searches: Vec<(String, String)>,
    /// At least one search was rejected with 401.
    pub unauthorized: bool,
    pub annotation_error: Option<String>,
}

/// A parsed completion line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub title: String,
    pub artist: String,
}

impl ParsedLine {
    /// Search query for the catalog: `"<title> <artist>"`.
    pub fn query(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.artist)
        }
    }
}

/// Splits one completion line into the quoted title and the artist around
/// it.
///
/// The title is the text between the first and the last `"`. Leading list
/// ordinals (`3.`) and the connectors `by`, `-`, `–` are removed from the
/// artist. Lines without a quoted title yield `None`.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.replace(['“', '”'], "\"");
    let first = line.find('"')?;
    let last = line.rfind('"')?;
    if first == last {
        return None;
    }

    let title = line[first + 1..last].trim();
    if title.is_empty() {
        return None;
    }

    let before = ORDINAL.replace(&line[..first], "");
    let before = TRAILING_CONNECTOR.replace(before.trim(), "");
    let after = LEADING_CONNECTOR.replace(line[last + 1..].trim(), "");

    let artist = [before.trim(), after.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(ParsedLine {
        title: title.to_string(),
        artist,
    })
}

/// Turns completion texts into unique search queries, first occurrence
/// first.
pub fn extract_candidates(texts: &[String]) -> Vec<String> {
    split_candidates(texts).0
}

/// Like [`extract_candidates`], also returning the lines that did not parse.
pub fn split_candidates(texts: &[String]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    for line in texts.iter().flat_map(|text| text.split('\n')) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(parsed) => {
                let query = parsed.query();
                if seen.insert(query.clone()) {
                    candidates.push(query);
                }
            }
            None => skipped.push(line.to_string()),
        }
    }

    (candidates, skipped)
}

/// Highest popularity wins; ties keep the catalog's order.
pub fn pick_most_popular(mut items: Vec<CatalogTrack>) -> Option<CatalogTrack> {
    items.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    items.into_iter().next()
}

pub struct Resolver<'a, P, C> {
    completions: &'a P,
    catalog: &'a C,
    options: ResolveOptions,
}

impl<'a, P: CompletionSource, C: Catalog> Resolver<'a, P, C> {
    pub fn new(completions: &'a P, catalog: &'a C, options: ResolveOptions) -> Self {
        Self {
            completions,
            catalog,
            options,
        }
    }

    /// Resolves `prompt` into a list of unique songs.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoCompletions`] when every completion request failed
    /// - [`ResolveError::Timeout`] when the run exceeded the configured budget
    ///
    /// Failed or empty searches only drop their candidate.
    pub async fn resolve(&self, prompt: &str) -> Result<Resolution, ResolveError> {
        tokio::time::timeout(self.options.timeout, self.run(prompt))
            .await
            .map_err(|_| ResolveError::Timeout(self.options.timeout))?
    }

    async fn run(&self, prompt: &str) -> Result<Resolution, ResolveError> {
        let (texts, failed_completions) = self.fan_out(prompt).await?;
        let (candidates, skipped_lines) = split_candidates(&texts);

        let searches = join_all(
            candidates
                .iter()
                .map(|candidate| self.resolve_candidate(candidate)),
        )
        .await;

        let mut resolution = Resolution {
            candidates: candidates.len(),
            failed_completions,
            skipped_lines,
            ..Resolution::default()
        };
        for (candidate, result) in candidates.iter().zip(searches) {
            match result {
                Ok(Some(song)) => resolution.songs.push(song),
                Ok(None) => {}
                Err(e) => {
                    if matches!(e, CatalogError::Unauthorized) {
                        resolution.unauthorized = true;
                    }
                    resolution
                        .failed_searches
                        .push((candidate.clone(), e.to_string()));
                }
            }
        }

        utils::remove_duplicate_songs(&mut resolution.songs);

        if self.options.annotate && !resolution.songs.is_empty() {
            resolution.annotation_error = self.annotate(&mut resolution.songs).await.err();
        }

        Ok(resolution)
    }

    async fn fan_out(&self, prompt: &str) -> Result<(Vec<String>, Vec<String>), ResolveError> {
        let results = join_all(
            (0..self.options.fanout).map(|_| self.completions.request_completion(prompt)),
        )
        .await;

        let mut texts = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(text) => texts.push(text),
                Err(e) => errors.push(e),
            }
        }

        if texts.is_empty() {
            return Err(ResolveError::NoCompletions {
                attempted: self.options.fanout,
                errors,
            });
        }
        Ok((texts, errors.iter().map(ToString::to_string).collect()))
    }

    async fn resolve_candidate(&self, candidate: &str) -> Result<Option<Song>, CatalogError> {
        let items = self
            .catalog
            .search(candidate, "track", self.options.search_limit)
            .await?;
        Ok(pick_most_popular(items).map(utils::song_from_track))
    }

    async fn annotate(&self, songs: &mut [Song]) -> Result<(), String> {
        let ids: Vec<String> = songs.iter().map(|s| s.id.clone()).collect();
        let statuses = self
            .catalog
            .saved_status(&ids)
            .await
            .map_err(|e| e.to_string())?;
        for (song, saved) in songs.iter_mut().zip(statuses) {
            song.saved = Some(saved);
        }
        Ok(())
    }
}
