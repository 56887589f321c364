// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Individual news article: lookup, reading statistics, related items,
// prev/next navigation, and HTML rendering of content blocks.

use std::fmt::Write as _;

use kliros_core::error::{KlirosError, Result};
use kliros_core::types::{ContentBlock, NewsDocument, NewsItem};

/// Reading speed used for the estimate, in words per minute.
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum number of related items shown under an article.
pub const RELATED_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingStats {
    pub word_count: usize,
    pub minutes: usize,
}

/// Everything needed to display one article.
#[derive(Debug, Clone)]
pub struct ArticleView<'a> {
    pub item: &'a NewsItem,
    pub stats: ReadingStats,
    pub related: Vec<&'a NewsItem>,
    pub prev: Option<&'a NewsItem>,
    pub next: Option<&'a NewsItem>,
    pub html: String,
}

/// Find an item by id, falling back to slug.
pub fn find_item<'a>(doc: &'a NewsDocument, key: &str) -> Option<&'a NewsItem> {
    doc.news
        .iter()
        .find(|item| item.id == key)
        .or_else(|| doc.news.iter().find(|item| item.slug == key))
}

/// Build the article view for `key` (id or slug).
pub fn render_article<'a>(doc: &'a NewsDocument, key: &str) -> Result<ArticleView<'a>> {
    let item = find_item(doc, key).ok_or_else(|| KlirosError::NewsNotFound(key.to_owned()))?;
    let related = related(doc, item);
    let (prev, next) = navigation(&related);

    Ok(ArticleView {
        item,
        stats: reading_stats(&item.content),
        prev,
        next,
        related,
        html: render_content_html(&item.content),
    })
}

/// Word count over headings, paragraphs and list items with markup removed.
pub fn reading_stats(content: &[ContentBlock]) -> ReadingStats {
    let mut text = String::new();
    for block in content {
        match block {
            ContentBlock::Heading { text: t, .. } | ContentBlock::Paragraph { text: t } => {
                text.push_str(t);
                text.push(' ');
            }
            ContentBlock::List { items } => {
                for item in items {
                    text.push_str(item);
                    text.push(' ');
                }
            }
            ContentBlock::Image { .. } => {}
        }
    }

    let word_count = strip_tags(&text).split_whitespace().count();
    ReadingStats {
        word_count,
        minutes: word_count.div_ceil(WORDS_PER_MINUTE).max(1),
    }
}

/// Drop everything between `<` and the next `>`.
///
/// An unterminated `<` is kept as text.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Items sharing a category or a tag with `item`, topped up with the most
/// recent other items when there are fewer than [`RELATED_LIMIT`].
pub fn related<'a>(doc: &'a NewsDocument, item: &NewsItem) -> Vec<&'a NewsItem> {
    let others = || doc.news.iter().filter(move |other| other.id != item.id);

    let mut related: Vec<&NewsItem> = others()
        .filter(|other| {
            other.category == item.category
                || other.tags().iter().any(|tag| item.tags().contains(tag))
        })
        .take(RELATED_LIMIT)
        .collect();

    if related.len() < RELATED_LIMIT {
        let mut recent: Vec<&NewsItem> = others()
            .filter(|other| !related.iter().any(|r| r.id == other.id))
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let missing = RELATED_LIMIT - related.len();
        related.extend(recent.into_iter().take(missing));
    }

    related
}

/// Previous is the first related item; next is the second, or the first again
/// when only one exists.
pub fn navigation<'a>(related: &[&'a NewsItem]) -> (Option<&'a NewsItem>, Option<&'a NewsItem>) {
    let prev = related.first().copied();
    let next = related.get(1).copied().or(prev);
    (prev, next)
}

/// Render content blocks to HTML. All text is escaped.
pub fn render_content_html(content: &[ContentBlock]) -> String {
    let mut html = String::new();
    for block in content {
        // Writing to a String cannot fail.
        let _ = write_block(&mut html, block);
    }
    html
}

fn write_block(html: &mut String, block: &ContentBlock) -> std::fmt::Result {
    match block {
        ContentBlock::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            write!(html, "<h{level}>{}</h{level}>", escape_html(text))
        }
        ContentBlock::Paragraph { text } => write!(html, "<p>{}</p>", escape_html(text)),
        ContentBlock::Image { src, caption } => {
            let alt = caption.as_deref().unwrap_or("");
            write!(
                html,
                "<figure class=\"article-image\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape_html(src),
                escape_html(alt)
            )?;
            if let Some(caption) = caption {
                write!(html, "<figcaption>{}</figcaption>", escape_html(caption))?;
            }
            html.push_str("</figure>");
            Ok(())
        }
        ContentBlock::List { items } => {
            html.push_str("<ul>");
            for item in items {
                write!(html, "<li>{}</li>", escape_html(item))?;
            }
            html.push_str("</ul>");
            Ok(())
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
