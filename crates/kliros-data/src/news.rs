// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// News feed view: category + text filter, four sort orders, and "load more"
// pagination.

use std::cmp::Ordering;
use std::str::FromStr;

use kliros_core::types::{NewsDocument, NewsItem};

/// Message shown when nothing matches.
pub const EMPTY_NEWS_MESSAGE: &str =
    "No news found. Try a different search or pick another category.";

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_CATEGORY: &str = "main";

/// Sort orders offered by the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewsSort {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl NewsSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
        }
    }

    fn compare(&self, a: &NewsItem, b: &NewsItem) -> Ordering {
        match self {
            Self::DateDesc => b.date.cmp(&a.date),
            Self::DateAsc => a.date.cmp(&b.date),
            Self::TitleAsc => locale_cmp(&a.title, &b.title),
            Self::TitleDesc => locale_cmp(&b.title, &a.title),
        }
    }
}

impl FromStr for NewsSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "title-asc" => Ok(Self::TitleAsc),
            "title-desc" => Ok(Self::TitleDesc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Which category tab is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Self {
        if s == "all" {
            Self::All
        } else {
            Self::Only(s.to_owned())
        }
    }

    fn matches(&self, item: &NewsItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => item.category == *category,
        }
    }
}

/// Transient view state of the feed. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    category: CategoryFilter,
    search: String,
    sort: NewsSort,
    page: usize,
    page_size: usize,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: CategoryFilter::Only(DEFAULT_CATEGORY.to_owned()),
            search: String::new(),
            sort: NewsSort::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl NewsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching tabs clears the search box and goes back to page 1.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.search.clear();
        self.page = 1;
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: NewsSort) {
        self.sort = sort;
        self.page = 1;
    }

    /// Show one more page.
    pub fn load_more(&mut self) {
        self.page += 1;
    }

    /// Jump straight to `page` (clamped to at least 1).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn sort(&self) -> NewsSort {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of items visible at the current page.
    pub fn visible(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    fn matches_search(&self, item: &NewsItem) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let q = self.search.as_str();
        item.title.to_lowercase().contains(q)
            || item.description.to_lowercase().contains(q)
            || item.tags().iter().any(|t| t.to_lowercase().contains(q))
    }
}

/// The rendered feed.
#[derive(Debug, Clone)]
pub struct NewsView<'a> {
    pub items: Vec<&'a NewsItem>,
    /// Matches before pagination.
    pub total_filtered: usize,
    pub has_more: bool,
    pub empty_message: Option<&'static str>,
}

/// Filtered and sorted items, before pagination.
pub fn filter_and_sort<'a>(doc: &'a NewsDocument, query: &NewsQuery) -> Vec<&'a NewsItem> {
    let mut items: Vec<&NewsItem> = doc
        .news
        .iter()
        .filter(|item| query.category.matches(item) && query.matches_search(item))
        .collect();
    items.sort_by(|a, b| query.sort.compare(a, b));
    items
}

/// Render the feed for the current view state.
pub fn render_news<'a>(doc: &'a NewsDocument, query: &NewsQuery) -> NewsView<'a> {
    let mut items = filter_and_sort(doc, query);
    let total_filtered = items.len();
    let visible = query.visible();
    items.truncate(visible);

    NewsView {
        has_more: visible < total_filtered,
        empty_message: items.is_empty().then_some(EMPTY_NEWS_MESSAGE),
        items,
        total_filtered,
    }
}

/// Collation for Russian titles: case-insensitive, `ё` sorting with `е`, then
/// `е` before `ё`, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fn primary(c: char) -> char {
        match c {
            'ё' | 'Ё' => 'е',
            _ => c.to_lowercase().next().unwrap_or(c),
        }
    }
    fn secondary(c: char) -> char {
        c.to_lowercase().next().unwrap_or(c)
    }

    a.chars()
        .map(primary)
        .cmp(b.chars().map(primary))
        .then_with(|| a.chars().map(secondary).cmp(b.chars().map(secondary)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kliros_core::types::ContentBlock;

    fn item(id: &str, title: &str, date: (i32, u32, u32), category: &str) -> NewsItem {
        NewsItem {
            id: id.into(),
            title: title.into(),
            slug: format!("slug-{id}"),
            description: format!("Описание {id}"),
            content: vec![ContentBlock::Paragraph { text: "текст".into() }],
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            author: "Редакция".into(),
            category: category.into(),
            category_name: None,
            image: None,
            tags: None,
        }
    }

    /// Five items; two share a date so stability is observable.
    fn fixture() -> NewsDocument {
        NewsDocument {
            metadata: None,
            news: vec![
                item("1", "Ёлка для детей", (2025, 1, 3), "main"),
                item("2", "Архиерейская служба", (2025, 2, 10), "main"),
                item("3", "Епархиальное собрание", (2025, 1, 3), "main"),
                item("4", "вечерня", (2024, 12, 24), "main"),
                item("5", "Молебен", (2025, 3, 1), "main"),
            ],
        }
    }

    fn ids(view: &[&NewsItem]) -> Vec<String> {
        view.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn date_desc_is_stable() {
        let doc = fixture();
        let q = NewsQuery::new();
        assert_eq!(ids(&filter_and_sort(&doc, &q)), ["5", "2", "1", "3", "4"]);
    }

    #[test]
    fn date_asc_is_stable() {
        let doc = fixture();
        let mut q = NewsQuery::new();
        q.set_sort(NewsSort::DateAsc);
        assert_eq!(ids(&filter_and_sort(&doc, &q)), ["4", "1", "3", "2", "5"]);
    }

    #[test]
    fn title_asc_uses_russian_collation() {
        let doc = fixture();
        let mut q = NewsQuery::new();
        q.set_sort(NewsSort::TitleAsc);
        // "Ёлка" collates as "елка", ahead of "Епархиальное".
        assert_eq!(ids(&filter_and_sort(&doc, &q)), ["2", "4", "1", "3", "5"]);
    }

    #[test]
    fn title_desc_is_reverse() {
        let doc = fixture();
        let mut q = NewsQuery::new();
        q.set_sort(NewsSort::TitleDesc);
        assert_eq!(ids(&filter_and_sort(&doc, &q)), ["5", "3", "1", "4", "2"]);
    }

    #[test]
    fn collation_ties_break_on_yo_then_case() {
        assert_eq!(locale_cmp("ежик", "ёлка"), Ordering::Less);
        assert_eq!(locale_cmp("ёж", "еж"), Ordering::Greater);
        assert_eq!(locale_cmp("храм", "Храм"), Ordering::Less);
        assert_eq!(locale_cmp("абв", "абв"), Ordering::Equal);
    }

    #[test]
    fn unfiltered_render_counts_every_item() {
        let doc = fixture();
        let q = NewsQuery::new().with_page_size(100);
        let view = render_news(&doc, &q);
        assert_eq!(view.items.len(), doc.news.len());
        assert_eq!(view.total_filtered, doc.news.len());
        assert!(!view.has_more);
    }

    #[test]
    fn category_filter() {
        let mut doc = fixture();
        doc.news[1].category = "announcements".into();
        let mut q = NewsQuery::new();
        assert_eq!(render_news(&doc, &q).total_filtered, 4);

        q.set_category(CategoryFilter::parse("announcements"));
        assert_eq!(ids(&render_news(&doc, &q).items), ["2"]);

        q.set_category(CategoryFilter::parse("all"));
        assert_eq!(render_news(&doc, &q).total_filtered, 5);
    }

    #[test]
    fn search_covers_title_description_and_tags() {
        let mut doc = fixture();
        doc.news[3].tags = Some(vec!["Пасха".into()]);
        let mut q = NewsQuery::new();

        q.set_search("МОЛЕБЕН");
        assert_eq!(ids(&render_news(&doc, &q).items), ["5"]);

        q.set_search("описание 2");
        assert_eq!(ids(&render_news(&doc, &q).items), ["2"]);

        q.set_search("пасх");
        assert_eq!(ids(&render_news(&doc, &q).items), ["4"]);
    }

    #[test]
    fn changing_category_resets_search_and_page() {
        let mut q = NewsQuery::new();
        q.set_search("ёлка");
        q.load_more();
        q.set_category(CategoryFilter::All);
        assert_eq!(q.page(), 1);
        assert_eq!(q, {
            let mut expected = NewsQuery::new();
            expected.category = CategoryFilter::All;
            expected
        });
    }

    #[test]
    fn pagination_grows_by_page() {
        let doc = fixture();
        let mut q = NewsQuery::new().with_page_size(2);

        let first = render_news(&doc, &q);
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);

        q.load_more();
        assert_eq!(render_news(&doc, &q).items.len(), 4);

        q.load_more();
        let last = render_news(&doc, &q);
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_more);

        q.set_sort(NewsSort::TitleAsc);
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn no_match_gives_empty_message() {
        let doc = fixture();
        let mut q = NewsQuery::new();
        q.set_search("нет такого");
        let view = render_news(&doc, &q);
        assert!(view.items.is_empty());
        assert_eq!(view.empty_message, Some(EMPTY_NEWS_MESSAGE));
    }

    #[test]
    fn sort_keywords_parse() {
        for sort in [NewsSort::DateDesc, NewsSort::DateAsc, NewsSort::TitleAsc, NewsSort::TitleDesc] {
            assert_eq!(sort.as_str().parse::<NewsSort>(), Ok(sort));
        }
        assert!("popular".parse::<NewsSort>().is_err());
    }
}
