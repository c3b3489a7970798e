//! Revision collection from the two source-control backends.

use tracing::{debug, info, warn};
use unreleased_config::{GithubConfig, OverrideTable, SvnConfig};
use unreleased_history::{ReleaseTag, Revision};
use unreleased_scm::{GithubClient, SvnClient, project_version, revisions_through};

use crate::resolver::{SvnTagIndex, TagMatch, TagMatcher, TagRule, latest_release};
use crate::PluginRecord;

/// Version shown when no release could be found.
pub(crate) const UNKNOWN_VERSION: &str = "?";

/// The latest release of a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Release version.
    pub version: String,
    /// Tag (or svn revision) the release was cut from.
    pub tag: ReleaseTag,
}

/// Everything collected for one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    /// Resolved release version, `?` if none was found.
    pub version: String,
    /// Revisions since the release, in backend order.
    pub revisions: Vec<Revision>,
    /// Link showing the changes since the release.
    pub compare_url: String,
}

/// A backend able to locate a plugin's latest release and the revisions since.
///
/// Failures are absorbed: a backend logs them and answers `None` or an empty
/// list.
#[allow(async_fn_in_trait)]
pub trait RevisionSource {
    /// Returns the latest release of a plugin.
    async fn latest_release(&self, plugin: &PluginRecord) -> Option<Release>;

    /// Returns the revisions made after a release.
    async fn revisions_since(&self, plugin: &PluginRecord, release: &Release) -> Vec<Revision>;

    /// Returns the link showing changes since the release.
    fn compare_url(&self, plugin: &PluginRecord, release: Option<&Release>) -> String;
}

/// Resolves the latest release of a plugin and collects the revisions since.
///
/// When no release is found the version is `?` and `<id>-?-0` is seeded into
/// `known_revs`; when a release has no revisions after it, `<id>-<version>-0`
/// is seeded. Both keep a misleading `CURRENT` label off the report.
pub async fn collect<S: RevisionSource>(
    source: &S,
    plugin: &PluginRecord,
    known_revs: &mut OverrideTable,
) -> Collected {
    let release = source.latest_release(plugin).await;
    let compare_url = source.compare_url(plugin, release.as_ref());

    let Some(release) = release else {
        warn!(plugin = %plugin.id, "unable to find latest release");
        known_revs.seed(format!("{}-{UNKNOWN_VERSION}-0", plugin.id), UNKNOWN_VERSION);
        return Collected {
            version: UNKNOWN_VERSION.to_string(),
            revisions: Vec::new(),
            compare_url,
        };
    };

    let revisions = source.revisions_since(plugin, &release).await;
    if revisions.is_empty() {
        warn!(
            plugin = %plugin.id,
            tag = %release.tag.name,
            "unable to find revisions since release"
        );
        known_revs.seed(
            format!("{}-{}-0", plugin.id, release.version),
            UNKNOWN_VERSION,
        );
    }
    debug!(plugin = %plugin.id, version = %release.version, revisions = revisions.len(), "collected");

    Collected {
        version: release.version,
        revisions,
        compare_url,
    }
}

/// GitHub backend.
#[derive(Debug, Clone)]
pub struct GithubBackend {
    client: GithubClient,
    web_url: String,
    organization: String,
    compare_branch: String,
    tag_rules: OverrideTable,
}

impl GithubBackend {
    /// Creates a backend; `tag_rules` maps plugin ids to custom tag rules.
    #[must_use]
    pub fn new(client: GithubClient, config: &GithubConfig, tag_rules: OverrideTable) -> Self {
        Self {
            client,
            web_url: config.web_url.trim_end_matches('/').to_string(),
            organization: config.organization.clone(),
            compare_branch: config.compare_branch.clone(),
            tag_rules,
        }
    }

    /// Returns `owner/repo`, qualifying bare names with the organization.
    #[must_use]
    pub fn qualified(&self, repository: &str) -> String {
        if repository.contains('/') {
            repository.to_string()
        } else {
            format!("{}/{repository}", self.organization)
        }
    }

    async fn descriptor_version(&self, repo: &str, tag: &str, subdir: &str) -> Option<String> {
        let pom = self
            .client
            .raw_file(repo, tag, &format!("{subdir}/pom.xml"))
            .await?;
        match project_version(&pom) {
            Ok(version) => version,
            Err(err) => {
                warn!(%repo, %tag, error = %err, "unreadable project descriptor");
                None
            }
        }
    }
}

impl RevisionSource for GithubBackend {
    async fn latest_release(&self, plugin: &PluginRecord) -> Option<Release> {
        let repo = self.qualified(&plugin.repository);
        let tags = self.client.tags(&repo).await?;

        let rule = self.tag_rules.text(&plugin.id).map(TagRule::parse);
        let matcher = TagMatcher::new(&plugin.id, rule.as_ref());

        let mut candidates = Vec::new();
        for tag in tags {
            let version = match matcher.match_tag(&tag.name) {
                TagMatch::Version(version) => Some(version),
                TagMatch::Lookup { tagged, subdir } => {
                    debug!(plugin = %plugin.id, %tagged, %subdir, "looking up release version");
                    self.descriptor_version(&repo, &tag.name, &subdir).await
                }
                TagMatch::Unmatched => None,
            };
            match version {
                Some(version) => {
                    candidates.push((version, ReleaseTag::new(tag.name, tag.commit.sha)));
                }
                None => info!(plugin = %plugin.id, tag = %tag.name, "skipped github tag"),
            }
        }

        latest_release(candidates).map(|(version, tag)| Release { version, tag })
    }

    async fn revisions_since(&self, plugin: &PluginRecord, release: &Release) -> Vec<Revision> {
        let repo = self.qualified(&plugin.repository);
        self.client
            .commits(&repo)
            .await
            .map(|commits| revisions_through(&commits, &release.tag.reference))
            .unwrap_or_default()
    }

    fn compare_url(&self, plugin: &PluginRecord, release: Option<&Release>) -> String {
        let repo = self.qualified(&plugin.repository);
        match release {
            Some(release) => format!(
                "{}/{repo}/compare/{}...{}",
                self.web_url, release.tag.name, self.compare_branch
            ),
            None => format!("{}/{repo}", self.web_url),
        }
    }
}

/// Legacy svn backend.
#[derive(Debug, Clone)]
pub struct SvnBackend {
    client: SvnClient,
    config: SvnConfig,
    index: SvnTagIndex,
}

impl SvnBackend {
    /// Creates a backend over an already built tag index.
    #[must_use]
    pub fn new(client: SvnClient, config: SvnConfig, index: SvnTagIndex) -> Self {
        Self {
            client,
            config,
            index,
        }
    }

    /// Lists every tag once and builds the backend.
    ///
    /// A failed listing leaves the index empty, so every svn plugin resolves to `?`.
    pub async fn connect(client: SvnClient, config: SvnConfig) -> Self {
        let index = match client.list_tags(&config.tag_urls()).await {
            Ok(tags) => SvnTagIndex::from_tags(&tags),
            Err(err) => {
                warn!(error = %err, "failed to get tags from svn");
                SvnTagIndex::default()
            }
        };
        info!(plugins = index.len(), "indexed svn tags");
        Self::new(client, config, index)
    }

    /// Returns the browse link of a trunk directory.
    #[must_use]
    pub fn browse_url(&self, directory: &str) -> String {
        format!(
            "{}/browse/Jenkins/{}/{directory}",
            self.config.fisheye_url.trim_end_matches('/'),
            self.config.plugins_path
        )
    }

    /// Lists the trunk directories, empty on failure.
    pub async fn trunk_directories(&self) -> Vec<String> {
        match self.client.list_dirs(&self.config.plugins_url()).await {
            Ok(dirs) => dirs,
            Err(err) => {
                warn!(error = %err, "failed to get plugin list from svn");
                Vec::new()
            }
        }
    }
}

impl RevisionSource for SvnBackend {
    async fn latest_release(&self, plugin: &PluginRecord) -> Option<Release> {
        self.index
            .lookup(&plugin.id, &plugin.repository)
            .map(|found| Release {
                version: found.version.clone(),
                tag: ReleaseTag::new(found.tag.clone(), found.revision.to_string()),
            })
    }

    async fn revisions_since(&self, plugin: &PluginRecord, release: &Release) -> Vec<Revision> {
        let Ok(revision) = release.tag.reference.parse::<u64>() else {
            warn!(plugin = %plugin.id, reference = %release.tag.reference, "not an svn revision");
            return Vec::new();
        };
        let url = format!("{}/{}", self.config.plugins_url(), plugin.repository);
        match self.client.log_since(&url, revision).await {
            Ok(revisions) => revisions,
            Err(err) => {
                warn!(plugin = %plugin.id, %url, error = %err, "failed to read svn log");
                Vec::new()
            }
        }
    }

    fn compare_url(&self, plugin: &PluginRecord, _release: Option<&Release>) -> String {
        let dir = format!("{}/{}", self.config.plugins_path, plugin.repository);
        format!(
            "{}/search/Jenkins/{dir}?ql=select%20revisions%20from%20dir%20/{dir}%20where%20date%20%3E=%20{}%20group%20by%20changeset%20return%20csid,%20comment,%20author,%20path",
            self.config.fisheye_url.trim_end_matches('/'),
            plugin.release_timestamp.as_deref().unwrap_or_default()
        )
    }
}
