//! Describe the shape of a data type once and derive independent algorithms
//! from that single description.
//!
//! - [`schemable`]: the capability contract ([`Schemable`] and its
//!   extensions) every interpreter implements.
//! - [`encoder`]: the structural encoder, turning values into untyped JSON.
//! - [`decode_error`] and [`tree`]: the error tree decoders report, and its
//!   rendering into indented text.
//! - [`doc`]: schemas written as JSON documents, interpreted by any
//!   interpreter.
//!
//! ```
//! use schemable::encoder;
//! use serde_json::json;
//!
//! let person = encoder::struct_([
//!     ("name", encoder::string()),
//!     ("tags", encoder::array(encoder::string())),
//! ]);
//! let out = person.encode(&json!({"name": "Ada", "tags": ["x"], "password": "hunter2"}));
//! assert_eq!(out, json!({"name": "Ada", "tags": ["x"]}));
//! ```
pub mod literal;
pub mod guard;
pub mod schemable;
pub mod encoder;
pub mod decode_error;
pub mod tree;
pub mod doc;
pub mod path_de;
pub mod jq_exec;

pub use decode_error::{DecodeError, ErrorInfo};
pub use encoder::{Encoder, Encoders};
pub use literal::{Int, Literal, Literals};
pub use schemable::{Schemable, SchemaError, WithInt, WithLazy, WithParse, WithUnion};
pub use tree::{draw, draw_tree, map_failure, to_tree, Tree};
