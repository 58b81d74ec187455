//! Schema documents: schemas written as JSON and interpreted through the
//! capability contract, so any interpreter can be driven from a file.
//!
//! ```json
//! {
//!   "definitions": {
//!     "Node": { "kind": "struct", "fields": {
//!       "value": { "kind": "number" },
//!       "children": { "kind": "array", "items": { "kind": "ref", "name": "Node" } }
//!     } }
//!   },
//!   "root": { "kind": "ref", "name": "Node" }
//! }
//! ```
//!
//! `ref` goes through [`WithLazy`], so definitions may be recursive. Every
//! definition is built once up front, which surfaces construction errors
//! before anything is encoded. An interpreter that forces its lazy factories
//! while they are being built sees a reference resolve to `unknown_record`.
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encoder::{Encoder, Encoders};
use crate::literal::Literals;
use crate::schemable::{SchemaError, WithInt, WithLazy};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum SchemaDoc {
    Literals { values: Literals },
    LiteralsOr { values: Literals, fallback: Box<SchemaDoc> },
    String,
    Number,
    Boolean,
    Int,
    UnknownArray,
    UnknownRecord,
    Struct { fields: IndexMap<String, SchemaDoc> },
    Partial { fields: IndexMap<String, SchemaDoc> },
    Record { codomain: Box<SchemaDoc> },
    Array { items: Box<SchemaDoc> },
    Tuple { items: Vec<SchemaDoc> },
    Intersection { members: Vec<SchemaDoc> },
    Sum { tag: String, branches: IndexMap<String, SchemaDoc> },
    Ref { name: String },
}

pub type Definitions = IndexMap<String, SchemaDoc>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub definitions: Definitions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<SchemaDoc>,
}

impl Document {
    /// The named definition, or the document root when `name` is `None`.
    pub fn entry(&self, name: Option<&str>) -> Result<&SchemaDoc, SchemaError> {
        match name {
            Some(name) => self
                .definitions
                .get(name)
                .ok_or_else(|| SchemaError::UnknownRef(name.to_owned())),
            None => self.root.as_ref().ok_or(SchemaError::MissingRoot),
        }
    }

    pub fn interpret<S>(&self, schemable: &S, name: Option<&str>) -> Result<S::Artifact, SchemaError>
    where
        S: WithInt + WithLazy,
        S::Artifact: Send + Sync + 'static,
    {
        interpret(schemable, self.entry(name)?, &self.definitions)
    }

    pub fn encoder(&self, name: Option<&str>) -> Result<Encoder, SchemaError> {
        self.interpret(&Encoders, name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERPRETATION
// ————————————————————————————————————————————————————————————————————————————

/// Builds `doc` with `schemable`, resolving `ref`s against `defs`.
pub fn interpret<S>(schemable: &S, doc: &SchemaDoc, defs: &Definitions) -> Result<S::Artifact, SchemaError>
where
    S: WithInt + WithLazy,
    S::Artifact: Send + Sync + 'static,
{
    let mut ctx = Context {
        schemable,
        defs,
        slots: defs.keys().map(|k| (k.clone(), Arc::new(OnceCell::new()))).collect(),
        refs: HashMap::new(),
    };
    let mut built = Vec::with_capacity(defs.len());
    for (name, def) in defs {
        built.push((name, ctx.build(def)?));
    }
    for (name, artifact) in built {
        // each slot is filled exactly once here
        let _ = ctx.slots[name.as_str()].set(artifact);
    }
    debug!(definitions = defs.len(), "interpreted schema document");
    ctx.build(doc)
}

struct Context<'a, S: WithInt + WithLazy> {
    schemable: &'a S,
    defs: &'a Definitions,
    slots: HashMap<String, Arc<OnceCell<S::Artifact>>>,
    refs: HashMap<String, S::Artifact>,
}

impl<S> Context<'_, S>
where
    S: WithInt + WithLazy,
    S::Artifact: Send + Sync + 'static,
{
    fn build(&mut self, doc: &SchemaDoc) -> Result<S::Artifact, SchemaError> {
        let s = self.schemable;
        Ok(match doc {
            SchemaDoc::Literals { values } => s.literals(values.clone()),
            SchemaDoc::LiteralsOr { values, fallback } => {
                let fallback = self.build(fallback)?;
                s.literals_or(values.clone(), fallback)
            }
            SchemaDoc::String => s.string(),
            SchemaDoc::Number => s.number(),
            SchemaDoc::Boolean => s.boolean(),
            SchemaDoc::Int => s.int(),
            SchemaDoc::UnknownArray => s.unknown_array(),
            SchemaDoc::UnknownRecord => s.unknown_record(),
            SchemaDoc::Struct { fields } => s.struct_(self.build_fields(fields)?),
            SchemaDoc::Partial { fields } => s.partial(self.build_fields(fields)?),
            SchemaDoc::Record { codomain } => {
                let codomain = self.build(codomain)?;
                s.record(codomain)
            }
            SchemaDoc::Array { items } => {
                let items = self.build(items)?;
                s.array(items)
            }
            SchemaDoc::Tuple { items } => s.tuple(self.build_all(items)?)?,
            SchemaDoc::Intersection { members } => s.intersection(self.build_all(members)?)?,
            SchemaDoc::Sum { tag, branches } => s.sum(tag).of(self.build_fields(branches)?)?,
            SchemaDoc::Ref { name } => self.reference(name)?,
        })
    }

    fn build_all(&mut self, docs: &[SchemaDoc]) -> Result<Vec<S::Artifact>, SchemaError> {
        docs.iter().map(|d| self.build(d)).collect()
    }

    fn build_fields(
        &mut self,
        fields: &IndexMap<String, SchemaDoc>,
    ) -> Result<Vec<(String, S::Artifact)>, SchemaError> {
        fields.iter().map(|(k, d)| Ok((k.clone(), self.build(d)?))).collect()
    }

    // one lazy artifact per definition, shared by every reference to it
    fn reference(&mut self, name: &str) -> Result<S::Artifact, SchemaError> {
        if let Some(artifact) = self.refs.get(name) {
            return Ok(artifact.clone());
        }
        if !self.defs.contains_key(name) {
            return Err(SchemaError::UnknownRef(name.to_owned()));
        }
        let slot = Arc::clone(&self.slots[name]);
        let label = name.to_owned();
        // forced before its definition exists: degrade to an unknown record
        let unresolved = self.schemable.unknown_record();
        let artifact = self.schemable.lazy(move || match slot.get() {
            Some(artifact) => {
                debug!(definition = %label, "resolving schema reference");
                artifact.clone()
            }
            None => {
                warn!(definition = %label, "reference forced while definitions were being built");
                unresolved
            }
        });
        self.refs.insert(name.to_owned(), artifact.clone());
        Ok(artifact)
    }
}
