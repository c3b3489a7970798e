//! Release version resolution.
//!
//! Git tags are matched against `^(pluginId-?)?(version)$`, falling back to an
//! operator-supplied [`TagRule`]. svn tags are indexed once per run by
//! [`SvnTagIndex`].

use std::collections::HashMap;

use regex::Regex;
use tracing::warn;
use unreleased_scm::SvnTag;

use crate::LooseVersion;

/// Characters allowed in a tagged version number.
const VERSION_CHARS: &str = "[0-9._]+";

/// Tag-rule middle field meaning the tag already carries the release version.
const VERSION_OK: &str = "VER_OK";

/// Where the real release version of a custom-tagged plugin comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    /// The version in the tag is the release version.
    AsTagged,
    /// Read it from `<subdir>/pom.xml` at the tag.
    Descriptor(String),
}

/// A custom tag rule: `tagBase|subdirOrVER_OK|optionalSuffixRegex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// Prefix used in tag names instead of the plugin id.
    pub tag_base: String,
    /// How to find the release version.
    pub lookup: VersionLookup,
    /// Regex allowed after the version number.
    pub suffix: String,
}

impl TagRule {
    /// Parses a rule. A missing middle field is treated like `VER_OK`.
    #[must_use]
    pub fn parse(rule: &str) -> Self {
        let mut fields = rule.split('|').map(str::trim);
        let tag_base = fields.next().unwrap_or_default().to_string();
        let lookup = match fields.next() {
            None | Some("" | VERSION_OK) => VersionLookup::AsTagged,
            Some(subdir) => VersionLookup::Descriptor(subdir.to_string()),
        };
        let suffix = fields.next().unwrap_or_default().to_string();
        Self {
            tag_base,
            lookup,
            suffix,
        }
    }
}

/// Outcome of matching one tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// The tag names a release with this version.
    Version(String),
    /// The tag names a release whose version must be read from a descriptor.
    Lookup {
        /// Version as written in the tag.
        tagged: String,
        /// Directory holding the descriptor.
        subdir: String,
    },
    /// The tag is not a release of this plugin.
    Unmatched,
}

/// Matches tag names of one plugin.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    plain: Option<Regex>,
    custom: Option<(Regex, VersionLookup)>,
}

impl TagMatcher {
    /// Builds a matcher for a plugin and its optional custom rule.
    ///
    /// An invalid suffix regex is reported and the rule ignored.
    #[must_use]
    pub fn new(plugin_id: &str, rule: Option<&TagRule>) -> Self {
        let plain = Regex::new(&format!(
            "^(?:{}-?)?({VERSION_CHARS})$",
            regex::escape(plugin_id)
        ))
        .ok();

        let custom = rule.and_then(|rule| {
            let pattern = format!(
                "^(?:{}-?)?({VERSION_CHARS}{})$",
                regex::escape(&rule.tag_base),
                rule.suffix
            );
            match Regex::new(&pattern) {
                Ok(regex) => Some((regex, rule.lookup.clone())),
                Err(err) => {
                    warn!(plugin = %plugin_id, %pattern, error = %err, "ignoring invalid tag rule");
                    None
                }
            }
        });

        Self { plain, custom }
    }

    /// Matches a tag name.
    pub fn match_tag(&self, tag: &str) -> TagMatch {
        if let Some(version) = self.plain.as_ref().and_then(|re| capture(re, tag)) {
            return TagMatch::Version(version);
        }
        if let Some((regex, lookup)) = &self.custom
            && let Some(tagged) = capture(regex, tag)
        {
            return match lookup {
                VersionLookup::AsTagged => TagMatch::Version(tagged),
                VersionLookup::Descriptor(subdir) => TagMatch::Lookup {
                    tagged,
                    subdir: subdir.clone(),
                },
            };
        }
        TagMatch::Unmatched
    }
}

fn capture(regex: &Regex, tag: &str) -> Option<String> {
    regex
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Picks the highest version among `(version, tag)` candidates.
///
/// A version seen twice keeps the tag seen last; among versions comparing
/// equal (e.g. `1_2` and `1.2`) the first one wins.
pub fn latest_release<T>(candidates: impl IntoIterator<Item = (String, T)>) -> Option<(String, T)> {
    let mut unique: Vec<(String, T)> = Vec::new();
    for (version, tag) in candidates {
        match unique.iter_mut().find(|(seen, _)| *seen == version) {
            Some(slot) => slot.1 = tag,
            None => unique.push((version, tag)),
        }
    }

    let mut best: Option<(LooseVersion, (String, T))> = None;
    for (version, tag) in unique {
        let loose = LooseVersion::parse(&version);
        if best.as_ref().is_none_or(|(top, _)| loose > *top) {
            best = Some((loose, (version, tag)));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Latest svn release of one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnRelease {
    /// Full tag directory name.
    pub tag: String,
    /// Version part of the tag name.
    pub version: String,
    /// Revision the tag was created in.
    pub revision: u64,
}

/// Latest svn tag per plugin, built from the full tag listing.
#[derive(Debug, Clone, Default)]
pub struct SvnTagIndex {
    latest: HashMap<String, SvnRelease>,
}

impl SvnTagIndex {
    /// Indexes tags named `<id>-<version>`, keeping the highest revision per id.
    ///
    /// Tags without a `-` are ignored.
    #[must_use]
    pub fn from_tags(tags: &[SvnTag]) -> Self {
        let mut latest: HashMap<String, SvnRelease> = HashMap::new();
        for tag in tags {
            let Some((id, version)) = tag.name.rsplit_once('-') else {
                continue;
            };
            if latest
                .get(id)
                .is_none_or(|release| tag.revision > release.revision)
            {
                latest.insert(
                    id.to_string(),
                    SvnRelease {
                        tag: tag.name.clone(),
                        version: version.to_string(),
                        revision: tag.revision,
                    },
                );
            }
        }
        Self { latest }
    }

    /// Looks up the latest release by plugin id, then repository name, then `<id>-plugin`.
    pub fn lookup(&self, plugin_id: &str, repository: &str) -> Option<&SvnRelease> {
        self.latest
            .get(plugin_id)
            .or_else(|| self.latest.get(repository))
            .or_else(|| self.latest.get(&format!("{plugin_id}-plugin")))
    }

    /// Returns the number of indexed plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// Returns whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found<'a>(index: &'a SvnTagIndex, id: &str, repo: &str) -> Option<(&'a str, u64)> {
        index
            .lookup(id, repo)
            .map(|release| (release.version.as_str(), release.revision))
    }

    fn svn_tag(name: &str, revision: u64) -> SvnTag {
        SvnTag {
            name: name.to_string(),
            revision,
        }
    }

    #[test]
    fn test_rule_parse_full() {
        let rule = TagRule::parse("git|plugin|-final");
        assert_eq!(rule.tag_base, "git");
        assert_eq!(rule.lookup, VersionLookup::Descriptor("plugin".to_string()));
        assert_eq!(rule.suffix, "-final");
    }

    #[test]
    fn test_rule_parse_version_ok() {
        let rule = TagRule::parse("maven-hpi|VER_OK");
        assert_eq!(rule.lookup, VersionLookup::AsTagged);
        assert_eq!(rule.suffix, "");
    }

    #[test]
    fn test_rule_parse_base_only() {
        let rule = TagRule::parse("base");
        assert_eq!(rule.tag_base, "base");
        assert_eq!(rule.lookup, VersionLookup::AsTagged);
    }

    #[test]
    fn test_match_plain_tags() {
        let matcher = TagMatcher::new("foo", None);
        assert_eq!(matcher.match_tag("foo-1.1"), TagMatch::Version("1.1".into()));
        assert_eq!(matcher.match_tag("foo1.2"), TagMatch::Version("1.2".into()));
        assert_eq!(matcher.match_tag("1_3"), TagMatch::Version("1_3".into()));
        assert_eq!(matcher.match_tag("foo-1.1-beta"), TagMatch::Unmatched);
        assert_eq!(matcher.match_tag("bar-1.1"), TagMatch::Unmatched);
        assert_eq!(matcher.match_tag("v1.1"), TagMatch::Unmatched);
    }

    #[test]
    fn test_match_escapes_plugin_id() {
        let matcher = TagMatcher::new("a.b", None);
        assert_eq!(matcher.match_tag("a.b-1.0"), TagMatch::Version("1.0".into()));
        assert_eq!(matcher.match_tag("axb-1.0"), TagMatch::Unmatched);
    }

    #[test]
    fn test_match_custom_rule_version_ok() {
        let rule = TagRule::parse("hudson-foo|VER_OK|(-rc\\d+)?");
        let matcher = TagMatcher::new("foo", Some(&rule));
        assert_eq!(
            matcher.match_tag("hudson-foo-2.0-rc1"),
            TagMatch::Version("2.0-rc1".into())
        );
        assert_eq!(
            matcher.match_tag("hudson-foo-2.0"),
            TagMatch::Version("2.0".into())
        );
    }

    #[test]
    fn test_match_custom_rule_descriptor() {
        let rule = TagRule::parse("parent|plugin");
        let matcher = TagMatcher::new("foo", Some(&rule));
        assert_eq!(
            matcher.match_tag("parent-3.0"),
            TagMatch::Lookup {
                tagged: "3.0".into(),
                subdir: "plugin".into()
            }
        );
    }

    #[test]
    fn test_plain_pattern_wins_over_rule() {
        let rule = TagRule::parse("parent|plugin");
        let matcher = TagMatcher::new("foo", Some(&rule));
        assert_eq!(matcher.match_tag("foo-1.0"), TagMatch::Version("1.0".into()));
    }

    #[test]
    fn test_invalid_rule_is_ignored() {
        let rule = TagRule::parse("parent|VER_OK|(unclosed");
        let matcher = TagMatcher::new("foo", Some(&rule));
        assert_eq!(matcher.match_tag("parent-1.0(unclosed"), TagMatch::Unmatched);
        assert_eq!(matcher.match_tag("foo-1.0"), TagMatch::Version("1.0".into()));
    }

    #[test]
    fn test_latest_release_numeric_order() {
        let best = latest_release(vec![
            ("1.2".to_string(), "t12"),
            ("1.10".to_string(), "t110"),
            ("1.9".to_string(), "t19"),
        ]);
        assert_eq!(best, Some(("1.10".to_string(), "t110")));
    }

    #[test]
    fn test_latest_release_duplicate_keeps_last_tag() {
        let best = latest_release(vec![
            ("1.0".to_string(), "first"),
            ("1.0".to_string(), "second"),
        ]);
        assert_eq!(best, Some(("1.0".to_string(), "second")));
    }

    #[test]
    fn test_latest_release_empty() {
        assert_eq!(latest_release(Vec::<(String, ())>::new()), None);
    }

    #[test]
    fn test_svn_index_keeps_highest_revision() {
        let index = SvnTagIndex::from_tags(&[
            svn_tag("foo-1.1", 120),
            svn_tag("foo-1.0", 100),
            svn_tag("foo-bar-2.0", 130),
            svn_tag("README", 5),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(found(&index, "foo", "foo"), Some(("1.1", 120)));
        assert_eq!(index.lookup("foo", "foo").unwrap().tag, "foo-1.1");
        assert_eq!(found(&index, "foo-bar", "foo-bar"), Some(("2.0", 130)));
    }

    #[test]
    fn test_svn_index_revision_beats_version() {
        let index = SvnTagIndex::from_tags(&[svn_tag("foo-2.0", 10), svn_tag("foo-1.5", 20)]);
        assert_eq!(found(&index, "foo", "foo"), Some(("1.5", 20)));
    }

    #[test]
    fn test_svn_index_fallback_keys() {
        let index = SvnTagIndex::from_tags(&[
            svn_tag("renamed-dir-1.0", 10),
            svn_tag("baz-plugin-3.0", 30),
        ]);
        assert_eq!(found(&index, "foo", "renamed-dir"), Some(("1.0", 10)));
        assert_eq!(found(&index, "baz", "baz"), Some(("3.0", 30)));
        assert_eq!(found(&index, "qux", "qux"), None);
        assert!(!index.is_empty());
    }
}
