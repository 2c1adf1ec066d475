//! Resolution of the group a rule is evaluated against.
//!
//! Bindings declare a [`ScopeSource`] describing where the scope lives in the
//! field request. Resolution then runs a fixed sequence: locate an id in the
//! request, fetch the owning group when the id is not a group id, and report
//! one of three states through [`ScopeResolution`].

use std::sync::Arc;

use praxis_core::AppResult;
use praxis_domain::{GroupId, GroupScope, ResourceKind, ResourceRef};
use serde_json::Value;
use tracing::debug;

use crate::ResourceScopeRepository;
use crate::shield::FieldRequest;

/// Location of an id or name inside a field request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    /// Field of the parent object.
    Parent(&'static str),
    /// Path into the field arguments, e.g. `["groupRoleData", "id"]`.
    Args(&'static [&'static str]),
}

impl IdSource {
    /// Reads `parent.<field>`.
    #[must_use]
    pub const fn parent(field: &'static str) -> Self {
        Self::Parent(field)
    }

    /// Reads a nested argument path.
    #[must_use]
    pub const fn args(path: &'static [&'static str]) -> Self {
        Self::Args(path)
    }

    /// Returns the raw JSON value, treating `null` as absent.
    #[must_use]
    pub fn read<'a>(&self, request: &'a FieldRequest) -> Option<&'a Value> {
        let value = match self {
            Self::Parent(field) => request.parent.as_ref()?.get(field)?,
            Self::Args(path) => path
                .iter()
                .try_fold(&request.args, |value, segment| value.get(segment))?,
        };

        (!value.is_null()).then_some(value)
    }

    /// Reads a numeric id. GraphQL `ID` values may arrive as strings.
    #[must_use]
    pub fn read_id(&self, request: &FieldRequest) -> Option<i64> {
        match self.read(request)? {
            Value::Number(number) => number.as_i64(),
            Value::String(value) => value.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Reads a non-empty string.
    #[must_use]
    pub fn read_str<'a>(&self, request: &'a FieldRequest) -> Option<&'a str> {
        self.read(request)?
            .as_str()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Strategy a binding declares for finding the group a rule checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSource {
    /// Id of a resource of the given kind. Group ids are used as-is.
    Resource(ResourceKind, IdSource),
    /// Unique group name.
    GroupName(IdSource),
    /// First alternative whose id is present in the request.
    FirstPresent(Vec<ScopeSource>),
}

impl ScopeSource {
    /// The id itself is the group id.
    #[must_use]
    pub fn group(id: IdSource) -> Self {
        Self::Resource(ResourceKind::Group, id)
    }

    /// The id belongs to a resource owned by a group.
    #[must_use]
    pub fn resource(kind: ResourceKind, id: IdSource) -> Self {
        Self::Resource(kind, id)
    }

    /// Reads `parent.id` for type fields, falling back to `args.id` for
    /// root fields.
    #[must_use]
    pub fn parent_or_arg_id(kind: ResourceKind) -> Self {
        Self::FirstPresent(vec![
            Self::Resource(kind, IdSource::parent("id")),
            Self::Resource(kind, IdSource::args(&["id"])),
        ])
    }

    /// Tries each alternative in order.
    #[must_use]
    pub fn first_present(alternatives: impl IntoIterator<Item = ScopeSource>) -> Self {
        Self::FirstPresent(alternatives.into_iter().collect())
    }

    fn locate(&self, request: &FieldRequest) -> Option<Located> {
        match self {
            Self::Resource(ResourceKind::Group, id) => {
                id.read_id(request).map(|id| Located::Group(GroupId::new(id)))
            }
            Self::Resource(kind, id) => id
                .read_id(request)
                .map(|id| Located::Resource(ResourceRef::from_kind(*kind, id))),
            Self::GroupName(name) => name
                .read_str(request)
                .map(|name| Located::Resource(ResourceRef::GroupName(name.to_owned()))),
            Self::FirstPresent(alternatives) => alternatives
                .iter()
                .find_map(|alternative| alternative.locate(request)),
        }
    }
}

enum Located {
    Group(GroupId),
    Resource(ResourceRef),
}

/// Result of resolving a scope source against one field request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeResolution<T> {
    /// The request carries none of the ids the source expects.
    Unresolvable,
    /// The resource exists but belongs to no group.
    Ungrouped,
    /// The owning group.
    Resolved(T),
}

/// Resolves scope sources through the scope repository.
#[derive(Clone)]
pub struct ScopeResolver {
    repository: Arc<dyn ResourceScopeRepository>,
}

impl ScopeResolver {
    /// Creates a resolver backed by the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ResourceScopeRepository>) -> Self {
        Self { repository }
    }

    /// Resolves only the owning group id. Group ids read straight from the
    /// request are returned without a lookup.
    pub async fn resolve_group_id(
        &self,
        source: &ScopeSource,
        request: &FieldRequest,
    ) -> AppResult<ScopeResolution<GroupId>> {
        match source.locate(request) {
            None => Ok(ScopeResolution::Unresolvable),
            Some(Located::Group(group_id)) => Ok(ScopeResolution::Resolved(group_id)),
            Some(Located::Resource(resource)) => Ok(
                match self.fetch(&resource).await? {
                    Some(scope) => ScopeResolution::Resolved(scope.group_id),
                    None => ScopeResolution::Ungrouped,
                },
            ),
        }
    }

    /// Resolves the owning group together with its privacy setting.
    pub async fn resolve_scope(
        &self,
        source: &ScopeSource,
        request: &FieldRequest,
    ) -> AppResult<ScopeResolution<GroupScope>> {
        let resource = match source.locate(request) {
            None => return Ok(ScopeResolution::Unresolvable),
            Some(Located::Group(group_id)) => ResourceRef::Group(group_id),
            Some(Located::Resource(resource)) => resource,
        };

        Ok(match self.fetch(&resource).await? {
            Some(scope) => ScopeResolution::Resolved(scope),
            None => ScopeResolution::Ungrouped,
        })
    }

    /// Resolves a concrete resource reference.
    pub async fn fetch(&self, resource: &ResourceRef) -> AppResult<Option<GroupScope>> {
        debug!(
            resource = %resource,
            relation_path = resource.relation_path(),
            "resolving group scope"
        );
        self.repository.resolve_scope(resource).await
    }
}
