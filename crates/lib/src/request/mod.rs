//! Request compilation.
//!
//! Turns resource changes into transport-agnostic [`Request`]s. Collection
//! level `patch` requests target the list path and batch every resource into
//! one payload; singular `put` and `delete` requests address one resource by
//! appending `=<identity>` to the list path.
//!
//! # Payload shape
//!
//! ```json
//! {
//!   "openconfig-pki:trust-store": [
//!     { "name": "default-ts", "config": { "name": "default-ts", "ca-name": ["CA2"] } }
//!   ]
//! }
//! ```
//!
//! Attributes the caller did not mention are never emitted, so a merge patch
//! cannot clear them.

mod paths;

pub use paths::{PathTable, Target};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Collection, Resource, SchemaError};

/// HTTP-style method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
  /// Collection-level additive merge.
  Patch,
  /// Full overwrite of a single resource.
  Put,
  /// Removal of a single resource.
  Delete,
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      Method::Patch => "patch",
      Method::Put => "put",
      Method::Delete => "delete",
    }
  }
}

/// A wire-level operation handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
  pub path: String,
  pub method: Method,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>,
}

/// Compiles resource changes into requests against a [`PathTable`].
#[derive(Debug, Clone, Default)]
pub struct RequestCompiler {
  paths: PathTable,
}

impl RequestCompiler {
  pub fn new(paths: PathTable) -> Self {
    Self { paths }
  }

  /// One `patch` request carrying every resource, or `None` if there are none.
  pub fn patch<R: Resource>(&self, resources: &[R]) -> Result<Option<Request>, SchemaError> {
    if resources.is_empty() {
      return Ok(None);
    }
    let items = resources.iter().map(item).collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Request {
      path: self.paths.collection_path(R::COLLECTION),
      method: Method::Patch,
      data: Some(self.wrap(R::COLLECTION, items)),
    }))
  }

  /// A `put` request replacing the resource addressed by its identity.
  pub fn put<R: Resource>(&self, resource: &R) -> Result<Request, SchemaError> {
    let identity = identity_of(resource)?;
    Ok(Request {
      path: self.paths.resource_path(R::COLLECTION, identity),
      method: Method::Put,
      data: Some(self.wrap(R::COLLECTION, vec![item(resource)?])),
    })
  }

  /// A `delete` request for one resource.
  pub fn delete(&self, collection: Collection, identity: &str) -> Request {
    Request {
      path: self.paths.resource_path(collection, identity),
      method: Method::Delete,
      data: None,
    }
  }

  fn wrap(&self, collection: Collection, items: Vec<Value>) -> Value {
    let mut payload = Map::new();
    payload.insert(self.paths.wrapper(collection), Value::Array(items));
    Value::Object(payload)
  }
}

fn identity_of<R: Resource>(resource: &R) -> Result<&str, SchemaError> {
  resource.identity().ok_or(SchemaError::MissingIdentity {
    collection: R::COLLECTION,
    index: 0,
  })
}

/// `{<identity key>: id, "config": {attributes}}` with absent attributes
/// stripped.
fn item<R: Resource>(resource: &R) -> Result<Value, SchemaError> {
  let identity = identity_of(resource)?;
  let mut config = match serde_json::to_value(resource) {
    Ok(Value::Object(map)) => map,
    Ok(other) => return Err(SchemaError::Invalid(format!("resource serialized as {other}"))),
    Err(e) => return Err(SchemaError::Invalid(e.to_string())),
  };
  config.retain(|_, v| !v.is_null());

  let mut entry = Map::new();
  entry.insert(R::COLLECTION.identity_key().to_string(), Value::String(identity.to_string()));
  entry.insert("config".to_string(), Value::Object(config));
  Ok(Value::Object(entry))
}
