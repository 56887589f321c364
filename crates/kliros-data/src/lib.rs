// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kliros — schedule and news data pipeline.
//
// fetch (source) → parse + validate (validate) → typed document → view
// records (schedule, news, article). Rendering is pure: the same document and
// view state always produce the same views.

pub mod article;
pub mod deep_link;
pub mod import;
pub mod loader;
pub mod news;
pub mod refresh;
pub mod schedule;
pub mod share;
pub mod source;
pub mod validate;

pub use article::{ArticleView, ReadingStats, render_article};
pub use import::{ImportFormat, import_file, parse_csv};
pub use loader::{Loaded, Loader, Validated, parse_news, parse_schedule, read_schedule};
pub use news::{CategoryFilter, NewsQuery, NewsSort, NewsView, render_news};
pub use schedule::{DayStatus, ScheduleView, render_schedule, time_icon};
pub use share::{SharePayload, SharePlatform};
pub use source::{AnySource, DirSource, DocumentSource, HttpSource};
pub use validate::{validate_news, validate_schedule};
