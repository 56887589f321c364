// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only commands: schedule, news, article, settings.

use std::fmt::Write as _;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use kliros_admin::notify::NEWS_NOTIFICATION_TTL;
use kliros_core::error::{KlirosError, Result};
use kliros_core::types::{ContentBlock, DocumentKind, NotificationKind, Priority};
use kliros_data::article::ArticleView;
use kliros_data::share::{self, SharePlatform};
use kliros_data::{CategoryFilter, NewsView, ScheduleView, deep_link, render_article, render_news, render_schedule};

use crate::cli::{NewsArgs, SettingsAction};
use crate::services::app_services::{AppServices, Refreshed};

pub async fn schedule(
    svc: &AppServices,
    today: Option<NaiveDate>,
    share_page: Option<&str>,
    service: Option<&str>,
) -> Result<()> {
    let refreshed = svc.refresh_schedule().await?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    svc.with_state(|s| -> Result<()> {
        let doc = s
            .schedule
            .as_ref()
            .ok_or(KlirosError::NoDocument(DocumentKind::Schedule.label()))?;

        if let Some(page) = share_page {
            let payload = match service {
                Some(id) => {
                    let record = doc
                        .services
                        .iter()
                        .find(|r| r.id == id)
                        .ok_or_else(|| KlirosError::ServiceNotFound(id.to_owned()))?;
                    share::service_payload(record, page)
                }
                None => share::schedule_payload(doc, page),
            };
            println!("{}", payload.clipboard_text());
            return Ok(());
        }

        let view = render_schedule(doc, today);
        print!("{}", format_schedule(&view, s.settings.auto_scroll));
        if refreshed == Refreshed::Offline {
            println!("(offline: showing the last saved schedule)");
        }
        Ok(())
    })
}

/// Text rendition of the schedule. The auto-scroll target is marked with `>`.
pub fn format_schedule(view: &ScheduleView<'_>, auto_scroll: bool) -> String {
    let mut out = String::new();
    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "{message}");
    }

    let target = if auto_scroll { view.today_index() } else { None };
    for (i, item) in view.items.iter().enumerate() {
        let r = item.record;
        let marker = if Some(i) == target { '>' } else { ' ' };
        let flag = if r.priority() == Priority::High { " !" } else { "" };
        let _ = writeln!(
            out,
            "{marker} {:>2} {} ({}) [{}] {}{flag}",
            r.day_number,
            r.month,
            r.weekday,
            item.status.as_str(),
            r.title
        );
        for slot in &r.times {
            let _ = writeln!(out, "      {:>5}  {}", slot.time, slot.kind);
        }
        if let Some(note) = r.note.as_deref().filter(|n| !n.is_empty()) {
            let _ = writeln!(out, "      {note}");
        }
    }

    let stats = &view.stats;
    let _ = write!(out, "\n{} services", stats.total);
    if let Some(period) = &stats.week_period {
        let _ = write!(out, " | {period}");
    }
    if let Some(updated) = stats.last_updated {
        let _ = write!(out, " | updated {}", updated.with_timezone(&Local).format("%d.%m.%Y %H:%M"));
    }
    out.push('\n');
    out
}

pub async fn news(svc: &AppServices, args: &NewsArgs) -> Result<()> {
    svc.refresh_news().await?;
    svc.with_state(|s| -> Result<()> {
        let doc = s
            .news
            .as_ref()
            .ok_or(KlirosError::NoDocument(DocumentKind::News.label()))?;
        let query = &mut s.news_query;
        query.set_category(CategoryFilter::parse(&args.category));
        if let Some(text) = &args.search {
            query.set_search(text);
        }
        query.set_sort(args.sort);
        query.set_page(args.pages);

        print!("{}", format_news(&render_news(doc, query)));
        Ok(())
    })
}

pub fn format_news(view: &NewsView<'_>) -> String {
    let mut out = String::new();
    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "{message}");
        return out;
    }
    for item in &view.items {
        let _ = writeln!(
            out,
            "{}  {}  [{}]\n    {}\n    ?news={}",
            item.date.format("%d.%m.%Y"),
            item.title,
            item.category_label(),
            item.description,
            item.slug
        );
    }
    let _ = writeln!(out, "\nshowing {} of {}", view.items.len(), view.total_filtered);
    if view.has_more {
        let _ = writeln!(out, "more available: use --pages to load more");
    }
    out
}

pub async fn article(
    svc: &AppServices,
    key: &str,
    share: Option<SharePlatform>,
    page_url: &str,
    html: bool,
) -> Result<()> {
    let key = deep_link::news_param(key).unwrap_or_else(|| key.to_owned());
    svc.refresh_news().await?;

    svc.with_state(|s| -> Result<()> {
        let doc = s
            .news
            .as_ref()
            .ok_or(KlirosError::NoDocument(DocumentKind::News.label()))?;
        let view = render_article(doc, &key)?;

        if let Some(platform) = share {
            let link = deep_link::article_link(page_url, &view.item.slug)?;
            println!("{}", platform.share_url(view.item, &link)?);
            s.notifier.push_for(
                NotificationKind::Success,
                "Shared",
                format!("Link ready for {}", platform.as_str()),
                Instant::now(),
                NEWS_NOTIFICATION_TTL,
            );
            return Ok(());
        }

        if html {
            println!("{}", view.html);
        } else {
            print!("{}", format_article(&view));
        }
        Ok(())
    })
}

pub fn format_article(view: &ArticleView<'_>) -> String {
    let item = view.item;
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", item.title);
    let _ = writeln!(
        out,
        "{} | {} | {} | {} min read ({} words)\n",
        item.date.format("%d.%m.%Y"),
        if item.author.is_empty() { "-" } else { item.author.as_str() },
        item.category_label(),
        view.stats.minutes,
        view.stats.word_count
    );

    for block in &item.content {
        match block {
            ContentBlock::Heading { text, .. } => {
                let _ = writeln!(out, "## {text}\n");
            }
            ContentBlock::Paragraph { text } => {
                let _ = writeln!(out, "{text}\n");
            }
            ContentBlock::Image { src, caption } => {
                let _ = writeln!(out, "[image: {}]\n", caption.as_deref().unwrap_or(src));
            }
            ContentBlock::List { items } => {
                for entry in items {
                    let _ = writeln!(out, "  - {entry}");
                }
                out.push('\n');
            }
        }
    }

    if !item.tags().is_empty() {
        let _ = writeln!(out, "tags: {}", item.tags().join(", "));
    }
    for related in &view.related {
        let _ = writeln!(out, "related: {} (?news={})", related.title, related.slug);
    }
    if let (Some(prev), Some(next)) = (view.prev, view.next) {
        let _ = writeln!(out, "prev: {} | next: {}", prev.slug, next.slug);
    }
    out
}

pub fn settings(svc: &AppServices, action: Option<SettingsAction>) -> Result<()> {
    let settings = match action {
        Some(SettingsAction::Set { key, value }) => svc.update_setting(key, value)?,
        None => svc.settings(),
    };
    println!("autoScroll     {}", settings.auto_scroll);
    println!("notifications  {}", settings.notifications);
    println!("debugMode      {}", settings.debug_mode);
    Ok(())
}
