//! Release tags

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Release channel an app is run from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseTag {
    /// Released version
    #[default]
    Release,
    /// Beta version
    Beta,
    /// Development version
    Dev,
}

impl ReleaseTag {
    /// Every tag, most stable first
    pub const ALL: [Self; 3] = [Self::Release, Self::Beta, Self::Dev];

    /// Tag name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Dev => "dev",
        }
    }
}

impl Display for ReleaseTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag name outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("can't find tag {0} - allowed tags are release, beta, dev")]
pub struct InvalidTag(pub String);

impl FromStr for ReleaseTag {
    type Err = InvalidTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| InvalidTag(s.to_string()))
    }
}

/// Whether `tag` names a release channel
#[inline]
#[must_use]
pub fn check_tag(tag: &str) -> bool {
    tag.parse::<ReleaseTag>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        for tag in ReleaseTag::ALL {
            assert_eq!(tag.as_str().parse::<ReleaseTag>().unwrap(), tag);
        }
    }

    #[test]
    fn rejects_others() {
        assert!(!check_tag("stable"));
        assert!(!check_tag("Release"));
        assert!(check_tag("beta"));
        assert_eq!(
            "stable".parse::<ReleaseTag>().unwrap_err().to_string(),
            "can't find tag stable - allowed tags are release, beta, dev"
        );
    }
}
