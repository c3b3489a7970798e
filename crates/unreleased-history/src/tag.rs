//! Release tag type.

/// The source-control point a release was cut from.
///
/// For hosted git this is a tag name and the commit SHA it points at.
/// For svn the reference is the revision number the tag was created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    /// The tag name (e.g. `foo-1.2`).
    pub name: String,

    /// The commit SHA or svn revision the tag refers to.
    pub reference: String,
}

impl ReleaseTag {
    /// Creates a new release tag.
    #[must_use]
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let tag = ReleaseTag::new("foo-1.1", "abc1234567890");
        assert_eq!(tag.name, "foo-1.1");
        assert_eq!(tag.reference, "abc1234567890");
    }
}
