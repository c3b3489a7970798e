//! One complete report run.

use std::mem;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use unreleased_config::{Config, OverrideTables};
use unreleased_scm::{GithubClient, PoliteClient, SvnClient};

use crate::{
    ChangeClassifier, CoreError, CoreResult, GithubBackend, PluginRecord, Report, ReportRow,
    RunContext, ScmKind, SvnBackend, collect, parse_feed,
};

/// Drives a run: feed, released plugins, never-released repositories, report.
#[derive(Debug, Clone)]
pub struct ReportRun {
    config: Config,
}

impl ReportRun {
    /// Creates a run with the given settings.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the run and returns the sorted report.
    ///
    /// `today` anchors the date colours; `prefix` limits the plugins and
    /// repositories processed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the metadata feed cannot be fetched or parsed.
    /// Every other failure is logged and degrades the affected rows.
    pub async fn execute(
        &self,
        tables: OverrideTables,
        prefix: Option<&str>,
        today: NaiveDate,
    ) -> CoreResult<Report> {
        let config = &self.config;
        let http = PoliteClient::new(Duration::from_secs(config.github.delay_secs))?;

        info!(url = %config.feed.url, "loading plugin metadata");
        let body = http
            .fetch(&config.feed.url)
            .await
            .map_err(|source| CoreError::Feed {
                url: config.feed.url.clone(),
                source,
            })?;
        let feed = parse_feed(&body)?;
        info!(plugins = feed.plugins.len(), "loaded plugin metadata");

        let mut ctx = RunContext::new(tables, prefix);
        let github_client = GithubClient::new(
            http,
            config.github.api_url.as_str(),
            config.github.raw_url.as_str(),
        );
        let github = GithubBackend::new(
            github_client.clone(),
            &config.github,
            mem::take(&mut ctx.tables.tag_map),
        );
        let svn = SvnBackend::connect(
            SvnClient::new(config.svn.command.as_str()),
            config.svn.clone(),
        )
        .await;
        let classifier = ChangeClassifier::new(&config.issues);
        let mut report = Report::new();

        for (id, entry) in &feed.plugins {
            if !ctx.matches_prefix(id) {
                continue;
            }
            let Some(plugin) = PluginRecord::from_feed(id, entry, &ctx.tables) else {
                debug!(plugin = %id, "skipped");
                continue;
            };

            let collected = match plugin.scm {
                ScmKind::HostedGit => {
                    ctx.mark_github(plugin.repository.as_str());
                    // In case it moved from svn.
                    ctx.mark_svn(plugin.id.as_str());
                    collect(&github, &plugin, &mut ctx.tables.known_revs).await
                }
                ScmKind::LegacySvn => {
                    ctx.mark_svn(plugin.repository.as_str());
                    ctx.mark_github(format!("{}-plugin", plugin.repository));
                    collect(&svn, &plugin, &mut ctx.tables.known_revs).await
                }
            };

            let classification = classifier.classify(
                &plugin.id,
                &plugin.version,
                &collected.version,
                &collected.revisions,
                &mut ctx.tables.known_revs,
            );
            debug!(plugin = %plugin.id, label = %classification.label, "classified");
            report.push(ReportRow::released(&plugin, &collected, &classification, today));
        }

        ctx.propagate_skips();

        for dir in svn.trunk_directories().await {
            if !ctx.matches_prefix(&dir) || ctx.is_skipped(&dir) || ctx.seen_svn(&dir) {
                continue;
            }
            let label = ctx.unreleased_label(&dir);
            report.push(ReportRow::unreleased(&dir, &svn.browse_url(&dir), label));
            ctx.mark_github(format!("{dir}-plugin"));
        }

        let organization = &config.github.organization;
        let web_url = config.github.web_url.trim_end_matches('/');
        for page in 1.. {
            let Some(repos) = github_client.org_repos(organization, page).await else {
                warn!(%organization, page, "failed to get repository list from github");
                break;
            };
            if repos.is_empty() {
                break;
            }
            for repo in repos {
                let name = repo.name;
                if !ctx.matches_prefix(&name) || ctx.is_skipped(&name) || ctx.seen_github(&name) {
                    continue;
                }
                let label = ctx.unreleased_label(&name);
                let url = format!("{web_url}/{organization}/{name}");
                report.push(ReportRow::unreleased(&name, &url, label));
            }
        }

        report.set_unused(ctx.unused());
        report.sort();
        info!(rows = report.rows().len(), unused = report.unused().len(), "report assembled");
        Ok(report)
    }
}
