//! Structural encoder: the interpreter whose artifacts turn values into
//! untyped JSON (`serde_json::Value`).
//!
//! Encoding is a best-effort structural transform with no failure channel.
//! Values that do not match the schema are not validated; reads of missing
//! fields see `null`, and container combinators fed the wrong container kind
//! produce an empty container.
//!
//! Every encoder also carries a static [`Hint`] of its declared shape. Hints
//! are only consulted when a tagged sum is built, to check that each branch
//! declares its own key at the tag field.
pub mod object;
pub mod seq;
pub mod intersection;
pub mod sum;
pub mod lazy;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::guard::{self, Guard};
use crate::literal::Literals;
use crate::schemable::{Schemable, SchemaError, WithInt, WithLazy};

pub use intersection::intersection;
pub use lazy::lazy;
pub use object::{partial, record, struct_};
pub use seq::{array, tuple};
pub use sum::{sum, tagged};

// ————————————————————————————————————————————————————————————————————————————
// MODEL
// ————————————————————————————————————————————————————————————————————————————

type EncodeFn<A> = dyn Fn(&A) -> Value + Send + Sync;

/// An encode function from `A` to untyped JSON.
///
/// Clones share the same function; composite encoders own their children.
pub struct Encoder<A: ?Sized = Value> {
    run: Arc<EncodeFn<A>>,
    hint: Hint,
}

/// What an encoder statically declares about the shape it encodes.
#[derive(Debug, Clone, Default)]
pub enum Hint {
    /// Nothing known (scalars, lazy, remapped encoders).
    #[default]
    Opaque,
    /// A closed literal set.
    Literals(Literals),
    /// An object with these fields.
    Fields(Arc<IndexMap<String, Hint>>),
}

impl<A: ?Sized> Clone for Encoder<A> {
    fn clone(&self) -> Self {
        Self { run: Arc::clone(&self.run), hint: self.hint.clone() }
    }
}

impl<A: ?Sized> fmt::Debug for Encoder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").field("hint", &self.hint).finish_non_exhaustive()
    }
}

impl<A: ?Sized + 'static> Encoder<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) -> Value + Send + Sync + 'static,
    {
        Self { run: Arc::new(f), hint: Hint::Opaque }
    }

    pub(crate) fn with_hint(mut self, hint: Hint) -> Self {
        self.hint = hint;
        self
    }

    pub fn hint(&self) -> &Hint { &self.hint }

    pub fn encode(&self, a: &A) -> Value {
        (*self.run)(a)
    }

    /// Reuse this encoder for `B` by converting each input first.
    ///
    /// ```
    /// use schemable::encoder::{self, Encoder};
    /// use serde_json::json;
    ///
    /// struct Point { x: f64, y: f64 }
    ///
    /// let tuple = encoder::tuple(vec![encoder::number(), encoder::number()])?;
    /// let point: Encoder<Point> = tuple.contramap(|p: &Point| json!([p.x, p.y]));
    /// assert_eq!(point.encode(&Point { x: 1.5, y: 2.0 }), json!([1.5, 2.0]));
    /// # Ok::<_, schemable::SchemaError>(())
    /// ```
    pub fn contramap<B, F>(&self, f: F) -> Encoder<B>
    where
        B: ?Sized + 'static,
        A: Sized,
        F: Fn(&B) -> A + Send + Sync + 'static,
    {
        let run = Arc::clone(&self.run);
        Encoder::new(move |b: &B| (*run)(&f(b)))
    }
}

impl Hint {
    pub(crate) fn fields(fields: &IndexMap<String, Encoder>) -> Self {
        let hints = fields.iter().map(|(k, e)| (k.clone(), e.hint.clone())).collect();
        Hint::Fields(Arc::new(hints))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PRIMITIVES
// ————————————————————————————————————————————————————————————————————————————

/// Passes the value through untouched.
pub fn id() -> Encoder {
    Encoder::new(Value::clone)
}

pub fn string() -> Encoder { id() }

pub fn number() -> Encoder { id() }

pub fn boolean() -> Encoder { id() }

pub fn unknown_array() -> Encoder { id() }

pub fn unknown_record() -> Encoder { id() }

/// Integers are already valid JSON; [`crate::literal::Int`] was checked on entry.
pub fn int() -> Encoder { id() }

pub fn literals(values: Literals) -> Encoder {
    id().with_hint(Hint::Literals(values))
}

/// The hint records only the literal set, so a sum still checks it as a tag.
pub fn literals_or(values: Literals, fallback: Encoder) -> Encoder {
    let hint = Hint::Literals(values.clone());
    let members = guard::literals(values);
    Encoder::new(move |a: &Value| {
        if members.is(Some(a)) { a.clone() } else { fallback.encode(a) }
    })
    .with_hint(hint)
}

// ————————————————————————————————————————————————————————————————————————————
// INSTANCE
// ————————————————————————————————————————————————————————————————————————————

/// The encoder as a [`Schemable`] interpreter, for schemas written once and
/// interpreted several ways.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoders;

pub(crate) static ENCODERS: Encoders = Encoders;

impl Schemable for Encoders {
    type Artifact = Encoder;

    fn literals(&self, values: Literals) -> Encoder { literals(values) }

    fn literals_or(&self, values: Literals, fallback: Encoder) -> Encoder {
        literals_or(values, fallback)
    }

    fn string(&self) -> Encoder { string() }

    fn number(&self) -> Encoder { number() }

    fn boolean(&self) -> Encoder { boolean() }

    fn unknown_array(&self) -> Encoder { unknown_array() }

    fn unknown_record(&self) -> Encoder { unknown_record() }

    fn struct_<K, I>(&self, fields: I) -> Encoder
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Encoder)>,
    {
        struct_(fields)
    }

    fn partial<K, I>(&self, fields: I) -> Encoder
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Encoder)>,
    {
        partial(fields)
    }

    fn record(&self, codomain: Encoder) -> Encoder { record(codomain) }

    fn array(&self, item: Encoder) -> Encoder { array(item) }

    fn tuple(&self, items: Vec<Encoder>) -> Result<Encoder, SchemaError> { tuple(items) }

    fn intersection(&self, members: Vec<Encoder>) -> Result<Encoder, SchemaError> {
        intersection(members)
    }

    fn tagged<K, I>(&self, tag: &str, branches: I) -> Result<Encoder, SchemaError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Encoder)>,
    {
        tagged(tag, branches)
    }
}

impl WithInt for Encoders {
    fn int(&self) -> Encoder { int() }
}

impl WithLazy for Encoders {
    fn lazy<F>(&self, factory: F) -> Encoder
    where
        F: FnOnce() -> Encoder + Send + 'static,
    {
        lazy(factory)
    }
}
