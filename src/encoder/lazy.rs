//! Memoized encoders for self-referential schemas.
//!
//! The factory is not run when the encoder is built, only on its first
//! encode, and never more than once even under concurrent first use. Clones
//! of the returned encoder share the cache. A recursive schema refers back to
//! itself through a shared handle, typically a `once_cell::sync::Lazy` static:
//!
//! ```
//! use once_cell::sync::Lazy;
//! use schemable::encoder::{self, Encoder};
//! use serde_json::json;
//!
//! static CATEGORY: Lazy<Encoder> = Lazy::new(|| {
//!     encoder::lazy(|| {
//!         encoder::struct_([
//!             ("title", encoder::string()),
//!             ("children", encoder::array((*CATEGORY).clone())),
//!         ])
//!     })
//! });
//!
//! let v = json!({"title": "a", "children": [{"title": "b", "children": [], "x": 1}]});
//! assert_eq!(
//!     CATEGORY.encode(&v),
//!     json!({"title": "a", "children": [{"title": "b", "children": []}]})
//! );
//! ```
//!
//! The factory must not encode through the encoder it is building; that
//! first use would wait on itself.
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use super::Encoder;

type Factory = Box<dyn FnOnce() -> Encoder + Send>;

pub fn lazy<F>(factory: F) -> Encoder
where
    F: FnOnce() -> Encoder + Send + 'static,
{
    let factory: Factory = Box::new(move || {
        debug!("forcing lazy encoder");
        factory()
    });
    let cell: Arc<Lazy<Encoder, Factory>> = Arc::new(Lazy::new(factory));
    // Lazy derefs by forcing
    Encoder::new(move |a: &Value| cell.encode(a))
}
