use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PATH_ROOT;
use crate::model::Collection;
use crate::util::encode::{decode_key, encode_key};

/// YANG module prefixing the payload wrapper names.
const DEFAULT_MODULE: &str = "openconfig-pki";

/// Where each collection lives in the device's resource tree.
///
/// Collection paths are `<root>/<collection>/<list node>`; singular resources
/// append `=<encoded identity>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTable {
  root: String,
  module: String,
}

impl Default for PathTable {
  fn default() -> Self {
    Self::new(DEFAULT_PATH_ROOT)
  }
}

/// A path resolved back to the collection (and resource) it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  pub collection: Collection,
  pub identity: Option<String>,
}

impl PathTable {
  /// Create a table rooted at `root`. A trailing `/` is ignored.
  pub fn new(root: impl Into<String>) -> Self {
    let root = root.into();
    Self {
      root: root.trim_end_matches('/').to_string(),
      module: DEFAULT_MODULE.to_string(),
    }
  }

  /// Path of a collection's list, used for batched patches.
  pub fn collection_path(&self, collection: Collection) -> String {
    format!("{}/{}/{}", self.root, collection.name(), collection.list_node())
  }

  /// Path of one resource within a collection.
  pub fn resource_path(&self, collection: Collection, identity: &str) -> String {
    format!("{}={}", self.collection_path(collection), encode_key(identity))
  }

  /// Payload wrapper key for a collection, e.g. `openconfig-pki:trust-store`.
  pub fn wrapper(&self, collection: Collection) -> String {
    format!("{}:{}", self.module, collection.list_node())
  }

  /// Resolve a request path produced by this table.
  pub fn resolve(&self, path: &str) -> Option<Target> {
    Collection::ALL.into_iter().find_map(|collection| {
      let rest = path.strip_prefix(&self.collection_path(collection))?;
      if rest.is_empty() {
        return Some(Target {
          collection,
          identity: None,
        });
      }
      let key = rest.strip_prefix('=')?;
      Some(Target {
        collection,
        identity: Some(decode_key(key)?),
      })
    })
  }
}
