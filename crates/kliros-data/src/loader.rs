// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fetch → parse → validate, with generation tickets so overlapping loads
// resolve in request order.
//
// Each load takes a ticket before its first suspension point. When the load
// finishes it is only reported as `Fresh` if no newer load has started in the
// meantime; otherwise it comes back `Superseded` and the caller drops it.

use std::sync::atomic::{AtomicU64, Ordering};

use kliros_core::error::{KlirosError, Result};
use kliros_core::types::{DocumentKind, NewsDocument, ScheduleDocument};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::source::DocumentSource;
use crate::validate::{IMAGE_SOURCE_KEYS, validate_news, validate_schedule};

/// Result of a completed load.
#[derive(Debug)]
pub enum Loaded<T> {
    /// The newest load; apply it.
    Fresh(T),
    /// A newer load started while this one was in flight.
    Superseded,
}

impl<T> Loaded<T> {
    pub fn fresh(self) -> Option<T> {
        match self {
            Self::Fresh(doc) => Some(doc),
            Self::Superseded => None,
        }
    }
}

/// A validated document together with the JSON it was read from.
///
/// The raw value keeps keys the typed document doesn't model, so exports and
/// backups made from it lose nothing.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub doc: T,
    pub raw: Value,
}

/// Hands out load tickets for one document kind.
#[derive(Debug, Default)]
pub struct Loader {
    generation: AtomicU64,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Fetch and validate the schedule.
    #[instrument(skip_all)]
    pub async fn load_schedule<S: DocumentSource>(
        &self,
        source: &S,
    ) -> Result<Loaded<Validated<ScheduleDocument>>> {
        let ticket = self.begin();
        let outcome = async {
            let text = source.fetch(DocumentKind::Schedule).await?;
            read_schedule(&text)
        }
        .await;
        self.finish(ticket, outcome, DocumentKind::Schedule)
    }

    /// Fetch and validate the news feed.
    #[instrument(skip_all)]
    pub async fn load_news<S: DocumentSource>(&self, source: &S) -> Result<Loaded<NewsDocument>> {
        let ticket = self.begin();
        let outcome = async {
            let text = source.fetch(DocumentKind::News).await?;
            parse_news(&text)
        }
        .await;
        self.finish(ticket, outcome, DocumentKind::News)
    }

    /// Failures are superseded too: only the newest load may report anything.
    fn finish<T>(&self, ticket: u64, outcome: Result<T>, kind: DocumentKind) -> Result<Loaded<T>> {
        if !self.is_current(ticket) {
            debug!(
                kind = kind.label(),
                ticket,
                failed = outcome.is_err(),
                "superseded load discarded"
            );
            return Ok(Loaded::Superseded);
        }
        let doc = outcome?;
        info!(kind = kind.label(), ticket, "document loaded");
        Ok(Loaded::Fresh(doc))
    }
}

/// Parse and validate schedule text. Malformed JSON is a transport error.
pub fn parse_schedule(text: &str) -> Result<ScheduleDocument> {
    Ok(read_schedule(text)?.doc)
}

/// Like [`parse_schedule`], keeping the parsed JSON alongside.
pub fn read_schedule(text: &str) -> Result<Validated<ScheduleDocument>> {
    let raw = parse_json(DocumentKind::Schedule, text)?;
    let doc = schedule_from_value(raw.clone())?;
    Ok(Validated { doc, raw })
}

/// Validate an already-parsed schedule and convert it to the typed document.
pub fn schedule_from_value(value: Value) -> Result<ScheduleDocument> {
    validate_schedule(&value)?;
    typed(value)
}

/// Parse and validate news text. Malformed JSON is a transport error.
pub fn parse_news(text: &str) -> Result<NewsDocument> {
    let mut value = parse_json(DocumentKind::News, text)?;
    validate_news(&value)?;
    normalize_image_sources(&mut value);
    typed(value)
}

fn parse_json(kind: DocumentKind, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| KlirosError::transport(kind.resource(), e))
}

fn typed<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Image blocks may name their source `src`, `url`, `image` or `path`. The
/// first non-empty one wins and is kept as `src`; the others are dropped.
fn normalize_image_sources(doc: &mut Value) {
    let Some(items) = doc.get_mut("news").and_then(Value::as_array_mut) else {
        return;
    };
    let blocks = items
        .iter_mut()
        .filter_map(|item| item.get_mut("content").and_then(Value::as_array_mut))
        .flatten()
        .filter_map(Value::as_object_mut)
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("image"));

    for block in blocks {
        let source = IMAGE_SOURCE_KEYS
            .iter()
            .filter_map(|key| block.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_owned);
        for key in IMAGE_SOURCE_KEYS {
            block.remove(key);
        }
        if let Some(source) = source {
            block.insert("src".into(), Value::String(source));
        }
    }
}
