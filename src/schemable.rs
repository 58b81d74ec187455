//! The capability contract every schema interpreter implements.
//!
//! A schema is written once against [`Schemable`] (generic over the
//! interpreter) and each interpreter picks its own artifact type: the
//! [`crate::encoder`] builds encode functions, other interpreters may build
//! decoders, guards or descriptions. All of them see the same combinator
//! calls, so they agree on field sets, nesting and tag dispatch.
//!
//! Fixed-arity combinators (`tuple`, `intersection`) take an ordered list and
//! check the arity when the artifact is built.
use thiserror::Error;

use crate::literal::Literals;

// ————————————————————————————————————————————————————————————————————————————
// ERRORS
// ————————————————————————————————————————————————————————————————————————————

/// Contract violations detected while a schema is being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("literal set must contain at least one value")]
    EmptyLiterals,
    #[error("tuple arity must be between 1 and 5, got {0}")]
    TupleArity(usize),
    #[error("intersection arity must be between 2 and 5, got {0}")]
    IntersectionArity(usize),
    #[error("union needs at least 2 members, got {0}")]
    UnionArity(usize),
    #[error("sum over `{tag}` has no branches")]
    EmptySum { tag: String },
    #[error("branch `{branch}` of sum over `{tag}` declares `{tag}` as {declared}")]
    TagMismatch { tag: String, branch: String, declared: String },
    #[error("sum over `{tag}` declares branch `{branch}` more than once")]
    DuplicateBranch { tag: String, branch: String },
    #[error("branch `{branch}` of sum over `{tag}` has no `{tag}` field")]
    MissingTag { tag: String, branch: String },
    #[error("unknown schema reference `{0}`")]
    UnknownRef(String),
    #[error("document has no root schema")]
    MissingRoot,
    #[error("not an integer: {0}")]
    NotAnInteger(String),
}

pub const TUPLE_ARITY: std::ops::RangeInclusive<usize> = 1..=5;
pub const INTERSECTION_ARITY: std::ops::RangeInclusive<usize> = 2..=5;

pub fn check_tuple_arity(n: usize) -> Result<(), SchemaError> {
    if TUPLE_ARITY.contains(&n) { Ok(()) } else { Err(SchemaError::TupleArity(n)) }
}

pub fn check_intersection_arity(n: usize) -> Result<(), SchemaError> {
    if INTERSECTION_ARITY.contains(&n) { Ok(()) } else { Err(SchemaError::IntersectionArity(n)) }
}

pub fn check_union_arity(n: usize) -> Result<(), SchemaError> {
    if n >= 2 { Ok(()) } else { Err(SchemaError::UnionArity(n)) }
}

// ————————————————————————————————————————————————————————————————————————————
// CONTRACT
// ————————————————————————————————————————————————————————————————————————————

pub trait Schemable {
    type Artifact: Clone;

    /// Exactly the given literal values.
    fn literals(&self, values: Literals) -> Self::Artifact;
    /// `literals(values)` for members of the set, `fallback` otherwise.
    fn literals_or(&self, values: Literals, fallback: Self::Artifact) -> Self::Artifact;

    fn string(&self) -> Self::Artifact;
    fn number(&self) -> Self::Artifact;
    fn boolean(&self) -> Self::Artifact;
    fn unknown_array(&self) -> Self::Artifact;
    fn unknown_record(&self) -> Self::Artifact;

    /// Object with exactly these required fields.
    fn struct_<K, I>(&self, fields: I) -> Self::Artifact
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self::Artifact)>;

    /// Object whose fields may each be absent.
    fn partial<K, I>(&self, fields: I) -> Self::Artifact
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self::Artifact)>;

    /// Map with dynamic string keys and a uniform value shape.
    fn record(&self, codomain: Self::Artifact) -> Self::Artifact;

    fn array(&self, item: Self::Artifact) -> Self::Artifact;

    /// Fixed-length sequence; 1 to 5 positions.
    fn tuple(&self, items: Vec<Self::Artifact>) -> Result<Self::Artifact, SchemaError>;

    /// All members hold of the same value; 2 to 5 members.
    fn intersection(&self, members: Vec<Self::Artifact>) -> Result<Self::Artifact, SchemaError>;

    /// One-step form of [`Schemable::sum`].
    fn tagged<K, I>(&self, tag: &str, branches: I) -> Result<Self::Artifact, SchemaError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self::Artifact)>;

    /// Tagged sum: pick the branch keyed by the value's `tag` field.
    ///
    /// ```
    /// use schemable::{encoder::Encoders, literal::Literals, Schemable};
    ///
    /// let s = Encoders;
    /// let _shape = s.sum("type").of([
    ///     ("circle", s.struct_([("type", s.literals(Literals::one("circle"))), ("r", s.number())])),
    ///     ("square", s.struct_([("type", s.literals(Literals::one("square"))), ("side", s.number())])),
    /// ])?;
    /// # Ok::<_, schemable::SchemaError>(())
    /// ```
    fn sum(&self, tag: &str) -> Sum<'_, Self>
    where
        Self: Sized,
    {
        Sum { schemable: self, tag: tag.to_owned() }
    }
}

/// First half of a tagged sum: the tag is fixed, branches come next.
pub struct Sum<'s, S> {
    schemable: &'s S,
    tag: String,
}

impl<S: Schemable> Sum<'_, S> {
    pub fn tag(&self) -> &str { &self.tag }

    pub fn of<K, I>(self, branches: I) -> Result<S::Artifact, SchemaError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, S::Artifact)>,
    {
        self.schemable.tagged(&self.tag, branches)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// EXTENSIONS
// ————————————————————————————————————————————————————————————————————————————

pub trait WithInt: Schemable {
    /// Integers, carried as [`crate::literal::Int`] once validated.
    fn int(&self) -> Self::Artifact;
}

pub trait WithLazy: Schemable {
    /// Self-referential schemas. `factory` runs at most once, on first use.
    ///
    /// Implementations should not run `factory` before the returned artifact
    /// is used: the schema it refers to may not be complete yet.
    fn lazy<F>(&self, factory: F) -> Self::Artifact
    where
        F: FnOnce() -> Self::Artifact + Send + 'static;
}

pub trait WithParse: Schemable {
    /// Refine what `schema` accepts with a fallible step.
    fn parse<F>(&self, schema: Self::Artifact, parser: F) -> Self::Artifact
    where
        F: Fn(&serde_json::Value) -> Result<serde_json::Value, String> + Send + Sync + 'static;
}

pub trait WithUnion: Schemable {
    /// Open alternation without a discriminant field; at least 2 members.
    fn union(&self, members: Vec<Self::Artifact>) -> Result<Self::Artifact, SchemaError>;
}
