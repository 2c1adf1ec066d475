use std::collections::HashMap;

use praxis_domain::Outcome;
use tokio::sync::Mutex;

use super::{CachePolicy, FieldRequest, Rule};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum CacheKey {
    Contextual(String),
    Strict {
        rule: String,
        parent: Option<String>,
        args: String,
    },
}

impl CacheKey {
    pub(super) fn for_rule(rule: &dyn Rule, request: &FieldRequest) -> Option<Self> {
        match rule.cache_policy() {
            CachePolicy::NoCache => None,
            CachePolicy::Contextual => Some(Self::Contextual(rule.cache_identity())),
            CachePolicy::Strict => Some(Self::Strict {
                rule: rule.cache_identity(),
                parent: request.parent.as_ref().map(ToString::to_string),
                args: request.args.to_string(),
            }),
        }
    }
}

/// Rule results memoized for a single request.
#[derive(Debug, Default)]
pub struct RuleCache {
    entries: Mutex<HashMap<CacheKey, Outcome>>,
}

impl RuleCache {
    pub(super) async fn get(&self, key: &CacheKey) -> Option<Outcome> {
        self.entries.lock().await.get(key).cloned()
    }

    pub(super) async fn insert(&self, key: CacheKey, outcome: Outcome) {
        self.entries.lock().await.insert(key, outcome);
    }

    /// Returns the number of memoized results.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns whether nothing has been memoized yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
