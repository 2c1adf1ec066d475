use std::collections::HashMap;

use super::RuleExpr;

/// Mapping from GraphQL type/field to the rule expression guarding it.
///
/// Lookup order is exact field, then type wildcard, then the fallback.
#[derive(Debug, Clone)]
pub struct ShieldBindings {
    fields: HashMap<(String, String), RuleExpr>,
    types: HashMap<String, RuleExpr>,
    fallback: RuleExpr,
}

impl ShieldBindings {
    /// Creates an empty table using `fallback` for unbound fields.
    #[must_use]
    pub fn new(fallback: RuleExpr) -> Self {
        Self {
            fields: HashMap::new(),
            types: HashMap::new(),
            fallback,
        }
    }

    /// Binds one field. Rebinding replaces the previous expression.
    #[must_use]
    pub fn bind(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        expression: RuleExpr,
    ) -> Self {
        self.fields
            .insert((type_name.into(), field_name.into()), expression);
        self
    }

    /// Binds every field of a type that has no exact binding.
    #[must_use]
    pub fn bind_type(mut self, type_name: impl Into<String>, expression: RuleExpr) -> Self {
        self.types.insert(type_name.into(), expression);
        self
    }

    /// Returns the expression guarding `type_name.field_name`.
    #[must_use]
    pub fn rule_for(&self, type_name: &str, field_name: &str) -> &RuleExpr {
        self.fields
            .get(&(type_name.to_owned(), field_name.to_owned()))
            .or_else(|| self.types.get(type_name))
            .unwrap_or(&self.fallback)
    }

    /// Returns whether `type_name.field_name` has an explicit binding.
    #[must_use]
    pub fn is_bound(&self, type_name: &str, field_name: &str) -> bool {
        self.fields
            .contains_key(&(type_name.to_owned(), field_name.to_owned()))
            || self.types.contains_key(type_name)
    }

    /// Iterates over exact field bindings as `(type, field, expression)`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str, &RuleExpr)> {
        self.fields.iter().map(|((type_name, field_name), expression)| {
            (type_name.as_str(), field_name.as_str(), expression)
        })
    }

    /// Returns the number of field and type bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.types.len()
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.types.is_empty()
    }
}
