// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kliros_core::config::SettingKey;
use kliros_data::NewsSort;
use kliros_data::share::SharePlatform;

/// Kliros: parish service schedule and news.
#[derive(Parser, Debug)]
#[command(name = "kliros", version, about)]
pub struct Cli {
    /// Where `schedule-data.json` and `news-data.json` live: a base URL or a
    /// local directory.
    #[arg(long, global = true, env = "KLIROS_SOURCE", default_value = ".")]
    pub source: String,

    /// Directory for the local database. Defaults to the XDG data directory.
    #[arg(long, global = true, env = "KLIROS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Answer "yes" to every confirmation prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the service schedule.
    Schedule {
        /// Treat this date as today (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print share text for the whole schedule, linking to this page.
        #[arg(long, value_name = "PAGE_URL")]
        share: Option<String>,
        /// Print share text for one service.
        #[arg(long, value_name = "SERVICE_ID", requires = "share")]
        service: Option<String>,
    },

    /// List news.
    News(NewsArgs),

    /// Show one article by id, slug, or a `?news=` link.
    Article {
        key: String,
        /// Print a share link instead of the article.
        #[arg(long, value_parser = parse_platform)]
        share: Option<SharePlatform>,
        /// Page the share link points to.
        #[arg(long, default_value = "https://example.org/")]
        page_url: String,
        /// Print the article body as HTML.
        #[arg(long)]
        html: bool,
    },

    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Schedule administration.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Keep running: refresh just after midnight, and read panel keys from
    /// stdin.
    Watch,
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Category to show; `all` for every category.
    #[arg(long, default_value = kliros_data::news::DEFAULT_CATEGORY)]
    pub category: String,
    /// Case-insensitive text to look for.
    #[arg(long)]
    pub search: Option<String>,
    /// date-desc, date-asc, title-asc or title-desc.
    #[arg(long, default_value = "date-desc", value_parser = parse_sort)]
    pub sort: NewsSort,
    /// How many pages to show.
    #[arg(long, default_value_t = 1)]
    pub pages: usize,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Set one setting (autoScroll, notifications, debugMode).
    Set {
        #[arg(value_parser = parse_setting)]
        key: SettingKey,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Re-indent a JSON file in place.
    Format { file: PathBuf },
    /// Check a schedule file without saving it.
    Validate { file: PathBuf },
    /// Validate a schedule file, back up the current one, and save it.
    Save { file: PathBuf },
    /// List backups, newest first.
    Backups,
    /// Write a backup's contents to a file (or stdout).
    Restore {
        id: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete one backup.
    Delete { id: i64 },
    /// Export the current schedule as `schedule-YYYY-MM-DD.json`.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Export all backups as `schedule-backups-YYYY-MM-DD.json`.
    ExportBackups {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Convert a .json or .csv file into an editable schedule.
    Import {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Discard local edits and reload from the source.
    Reset,
    /// Write `schedule-debug-YYYY-MM-DD.json` for troubleshooting.
    DebugDump {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn parse_sort(s: &str) -> Result<NewsSort, String> {
    s.parse()
}

fn parse_platform(s: &str) -> Result<SharePlatform, String> {
    s.parse()
}

fn parse_setting(s: &str) -> Result<SettingKey, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admin_restore() {
        let cli = Cli::try_parse_from(["kliros", "--yes", "admin", "restore", "42", "-o", "out.json"])
            .unwrap();
        assert!(cli.yes);
        match cli.command {
            Command::Admin { action: AdminAction::Restore { id, output } } => {
                assert_eq!(id, 42);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_news_options() {
        let cli = Cli::try_parse_from(["kliros", "news", "--category", "all", "--sort", "title-asc"])
            .unwrap();
        match cli.command {
            Command::News(args) => {
                assert_eq!(args.category, "all");
                assert_eq!(args.sort, NewsSort::TitleAsc);
                assert_eq!(args.pages, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_setting_update() {
        let cli = Cli::try_parse_from(["kliros", "settings", "set", "auto-scroll", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings {
                action: Some(SettingsAction::Set { key: SettingKey::AutoScroll, value: false })
            }
        ));
    }
}
