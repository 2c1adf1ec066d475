use std::str::FromStr;

use praxis_core::AppError;
use serde::{Deserialize, Serialize};

use crate::GroupId;

/// Visibility setting stored in a group's config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPrivacy {
    /// Content is readable by anyone, members or not.
    Public,
    /// Content is readable by members only.
    Private,
}

impl GroupPrivacy {
    /// Returns a stable storage value for this privacy setting.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    /// Returns whether group content may be read without membership.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl FromStr for GroupPrivacy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(AppError::Validation(format!(
                "unknown group privacy value '{value}'"
            ))),
        }
    }
}

/// Owning group of a scope-bearing resource, with its privacy setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupScope {
    /// Owning group.
    pub group_id: GroupId,
    /// Privacy setting of the owning group.
    pub privacy: GroupPrivacy,
}

impl GroupScope {
    /// Creates a scope from a group and its privacy.
    #[must_use]
    pub fn new(group_id: GroupId, privacy: GroupPrivacy) -> Self {
        Self { group_id, privacy }
    }

    /// Returns whether the owning group is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.privacy.is_public()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::GroupPrivacy;

    #[test]
    fn privacy_parses_storage_values() {
        assert!(matches!(GroupPrivacy::from_str("public"), Ok(GroupPrivacy::Public)));
        assert!(matches!(GroupPrivacy::from_str("private"), Ok(GroupPrivacy::Private)));
        assert!(GroupPrivacy::from_str("secret").is_err());
    }
}
