use std::collections::HashSet;

use crate::issuers::IssuerList;

/// Flattened issuer-name set for membership checks against late-filing
/// records. Matching is deliberately strict string equality: no case
/// folding, trimming, or legal-suffix normalization, so "Foo PLC" and
/// "foo plc" are different names. Loosening this would change which rows
/// get highlighted and is a product decision, not a cleanup.
#[derive(Debug, Default)]
pub struct IssuerIndex {
    names: HashSet<String>,
}

impl IssuerIndex {
    pub fn from_lists(lists: &[IssuerList]) -> Self {
        let names = lists
            .iter()
            .flat_map(|list| list.names.iter().cloned())
            .collect();
        Self { names }
    }

    pub fn is_listed(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
