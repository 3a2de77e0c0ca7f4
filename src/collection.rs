//! Collection facade: one per selection
//!
//! ```ignore
//! let c = Collection::new(cache, session, items);
//! let props = c.properties().await;
//! if c.has(&["delete", "items"]) { /* enable the delete button */ }
//! ```

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::cache::FolderCache;
use crate::constants::LARGE_SELECTION;
use crate::error::{Error, Result};
use crate::matcher::classify;
use crate::model::{Item, Session};
use crate::props::{aggregate, Properties};
use crate::store::FolderStore;

pub struct Collection<S> {
    items: Vec<Item>,
    cache: Arc<FolderCache<S>>,
    session: Arc<Session>,
    props: OnceCell<Properties>,
}

impl<S: FolderStore> Collection<S> {
    pub fn new(cache: Arc<FolderCache<S>>, session: Arc<Session>, items: impl IntoIterator<Item = Item>) -> Self {
        Collection { items: items.into_iter().collect(), cache, session, props: OnceCell::new() }
    }

    /// Build from a JSON value: a single entry or arbitrarily nested arrays.
    /// `null`, `false`, `0` and `""` entries are dropped.
    pub fn from_json(cache: Arc<FolderCache<S>>, session: Arc<Session>, value: &Value) -> Result<Self> {
        let mut items = Vec::new();
        flatten(value, &mut items)?;
        Ok(Self::new(cache, session, items))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve the selection's properties. Never fails: unresolvable folders
    /// yield a record with `unknown` set and every right denied. Concurrent
    /// callers share one resolution; later calls return the memoized record.
    pub async fn properties(&self) -> Properties {
        *self.props.get_or_init(|| self.resolve()).await
    }

    async fn resolve(&self) -> Properties {
        let ids: Vec<_> = self.items.iter().filter_map(Item::referenced_folder).collect();
        let folders = self.cache.resolve(ids).await;
        let store = self.cache.store();
        let classified: Vec<_> = self
            .items
            .iter()
            .map(|item| classify(item, &folders, &self.session, store))
            .collect();
        let p = aggregate(&classified);
        debug!(user = self.session.user_id, items = self.items.len(), unknown = p.unknown, "selection resolved");
        p
    }

    pub fn is_resolved(&self) -> bool {
        self.props.initialized()
    }

    /// Last resolved record, if any
    pub fn resolved(&self) -> Option<&Properties> {
        self.props.get()
    }

    /// True iff every named key is set in the resolved record.
    ///
    /// Before resolution this is a usage error: it is logged and answered
    /// with `false`.
    pub fn has(&self, keys: &[&str]) -> bool {
        match self.props.get() {
            Some(p) => p.has(keys),
            None => {
                let e = Error::Usage("has() called before properties() resolved".into());
                warn!(error = %e, keys = ?keys, "selection not resolved");
                false
            }
        }
    }

    #[inline]
    pub fn is_large(&self) -> bool {
        self.items.len() >= LARGE_SELECTION
    }
}

fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn flatten(value: &Value, out: &mut Vec<Item>) -> Result<()> {
    match value {
        Value::Array(list) => {
            for v in list {
                flatten(v, out)?;
            }
        }
        v if is_falsy(v) => {}
        v => out.push(Item::from_json(v)?),
    }
    Ok(())
}
