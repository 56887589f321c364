// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `?news=<id-or-slug>` deep links into an individual article.

use reqwest::Url;

use kliros_core::error::{KlirosError, Result};

pub const NEWS_PARAM: &str = "news";

/// Extract the `news` parameter from a full URL or a bare query string
/// (`?news=x` or `news=x`). Empty values count as absent.
pub fn news_param(input: &str) -> Option<String> {
    let url = Url::parse(input)
        .or_else(|_| {
            Url::parse(&format!("http://localhost/?{}", input.trim_start_matches('?')))
        })
        .ok()?;

    url.query_pairs()
        .find(|(key, _)| key == NEWS_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `page_url` with `news=<slug>` set, replacing any previous value.
pub fn article_link(page_url: &str, slug: &str) -> Result<String> {
    let mut url = Url::parse(page_url).map_err(|e| KlirosError::transport("article link", e))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| key != NEWS_PARAM)
        .collect();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        query.append_pair(NEWS_PARAM, slug);
    }
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_param_from_full_url() {
        assert_eq!(
            news_param("https://example.org/index.html?lang=ru&news=paskha-2025").as_deref(),
            Some("paskha-2025")
        );
    }

    #[test]
    fn reads_param_from_bare_query() {
        assert_eq!(news_param("?news=abc").as_deref(), Some("abc"));
        assert_eq!(news_param("news=%D1%85%D1%80%D0%B0%D0%BC").as_deref(), Some("храм"));
    }

    #[test]
    fn missing_or_empty_param_is_none() {
        assert_eq!(news_param("https://example.org/"), None);
        assert_eq!(news_param("?news="), None);
        assert_eq!(news_param("?page=2"), None);
    }

    #[test]
    fn link_replaces_existing_param() {
        let link = article_link("https://example.org/?news=old&lang=ru", "new").unwrap();
        assert_eq!(link, "https://example.org/?lang=ru&news=new");
        assert_eq!(news_param(&link).as_deref(), Some("new"));
    }
}
