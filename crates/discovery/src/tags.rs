//! # Tag Selector
//!
//! Read-only view of the mood tag catalog.

use std::collections::HashMap;
use std::sync::Arc;

use store::{Store, Tag, TagId};

use crate::error::{DiscoveryError, Result};

#[derive(Clone)]
pub struct TagSelector {
    store: Arc<dyn Store>,
    kind: String,
}

impl TagSelector {
    pub fn new(store: Arc<dyn Store>, kind: impl Into<String>) -> Self {
        Self { store, kind: kind.into() }
    }

    /// Every mood tag, by name
    pub async fn tags(&self) -> Result<Vec<Tag>> {
        Ok(self.store.tags_by_kind(&self.kind).await?)
    }

    /// Map tag names (case-insensitive) to ids, in input order.
    pub async fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<TagId>> {
        let by_name: HashMap<String, TagId> = self
            .tags()
            .await?
            .into_iter()
            .map(|tag| (tag.name.to_lowercase(), tag.id))
            .collect();

        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                by_name
                    .get(&name.trim().to_lowercase())
                    .copied()
                    .ok_or_else(|| DiscoveryError::validation(format!("unknown mood tag: {name}")))
            })
            .collect()
    }
}
