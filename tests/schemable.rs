//! One generic schema definition, two interpreters.
use schemable::doc::Document;
use schemable::literal::{Literal, Literals};
use schemable::schemable::{check_intersection_arity, check_tuple_arity, check_union_arity};
use schemable::{Encoders, SchemaError, Schemable, WithInt, WithParse, WithUnion};
use serde_json::{json, Value};

/// Describes a schema as a type-like string, e.g. `{ a: string }`.
#[derive(Debug, Clone, Copy)]
struct Describe;

fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, String)>, optional: bool) -> String {
    let mark = if optional { "?" } else { "" };
    let parts: Vec<String> = fields
        .into_iter()
        .map(|(k, v)| format!("{}{mark}: {v}", k.into()))
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

impl Schemable for Describe {
    type Artifact = String;

    fn literals(&self, values: Literals) -> String { values.to_string() }

    fn literals_or(&self, values: Literals, fallback: String) -> String {
        format!("{values} | {fallback}")
    }

    fn string(&self) -> String { "string".into() }

    fn number(&self) -> String { "number".into() }

    fn boolean(&self) -> String { "boolean".into() }

    fn unknown_array(&self) -> String { "Array<unknown>".into() }

    fn unknown_record(&self) -> String { "Record<string, unknown>".into() }

    fn struct_<K, I>(&self, fields: I) -> String
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, String)>,
    {
        object(fields, false)
    }

    fn partial<K, I>(&self, fields: I) -> String
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, String)>,
    {
        object(fields, true)
    }

    fn record(&self, codomain: String) -> String { format!("Record<string, {codomain}>") }

    fn array(&self, item: String) -> String { format!("Array<{item}>") }

    fn tuple(&self, items: Vec<String>) -> Result<String, SchemaError> {
        check_tuple_arity(items.len())?;
        Ok(format!("[{}]", items.join(", ")))
    }

    fn intersection(&self, members: Vec<String>) -> Result<String, SchemaError> {
        check_intersection_arity(members.len())?;
        Ok(members.join(" & "))
    }

    fn tagged<K, I>(&self, _tag: &str, branches: I) -> Result<String, SchemaError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, String)>,
    {
        let branches: Vec<String> = branches.into_iter().map(|(_, b)| b).collect();
        Ok(branches.join(" | "))
    }
}

impl WithInt for Describe {
    fn int(&self) -> String { "Int".into() }
}

impl WithParse for Describe {
    fn parse<F>(&self, schema: String, _parser: F) -> String
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        format!("Parsed<{schema}>")
    }
}

impl WithUnion for Describe {
    fn union(&self, members: Vec<String>) -> Result<String, SchemaError> {
        check_union_arity(members.len())?;
        Ok(members.join(" | "))
    }
}

fn person<S: WithInt>(s: &S) -> S::Artifact {
    let address = s.partial([("street", s.string()), ("zip", s.int())]);
    s.struct_([
        ("name", s.string()),
        ("age", s.int()),
        ("address", address),
        ("tags", s.array(s.string())),
    ])
}

fn shape<S: Schemable>(s: &S) -> Result<S::Artifact, SchemaError> {
    let kind = |k: &str| s.literals(Literals::one(k));
    s.sum("kind").of([
        ("circle", s.struct_([("kind", kind("circle")), ("radius", s.number())])),
        ("rect", s.struct_([("kind", kind("rect")), ("size", s.tuple(vec![s.number(), s.number()])?)])),
    ])
}

#[test]
fn same_schema_drives_both_interpreters() {
    assert_eq!(
        person(&Describe),
        "{ name: string, age: Int, address: { street?: string, zip?: Int }, tags: Array<string> }"
    );
    let encoded = person(&Encoders).encode(&json!({
        "name": "Ada",
        "age": 36,
        "address": {"zip": 1, "country": "UK"},
        "tags": [],
        "internal": true
    }));
    assert_eq!(encoded, json!({"name": "Ada", "age": 36, "address": {"zip": 1}, "tags": []}));
}

#[test]
fn sums_agree_across_interpreters() {
    assert_eq!(
        shape(&Describe).unwrap(),
        r#"{ kind: "circle", radius: number } | { kind: "rect", size: [number, number] }"#
    );
    let e = shape(&Encoders).unwrap();
    assert_eq!(
        e.encode(&json!({"kind": "rect", "size": [1, 2], "radius": 9})),
        json!({"kind": "rect", "size": [1, 2]})
    );
}

#[test]
fn extensions_are_checked() {
    let s = Describe;
    assert_eq!(s.union(vec![s.string(), s.number()]).unwrap(), "string | number");
    assert_eq!(s.union(vec![s.string()]).unwrap_err(), SchemaError::UnionArity(1));
    let nonempty = s.parse(s.string(), |v| match v.as_str() {
        Some("") | None => Err("empty".to_owned()),
        Some(_) => Ok(v.clone()),
    });
    assert_eq!(nonempty, "Parsed<string>");
    let maybe = s.literals_or(Literals::new([Literal::Null, Literal::Undefined]).unwrap(), s.string());
    assert_eq!(maybe, "null | undefined | string");
}

#[test]
fn documents_drive_any_interpreter() {
    let doc: Document = serde_json::from_value(json!({
        "root": {"kind": "intersection", "members": [
            {"kind": "struct", "fields": {"id": {"kind": "int"}}},
            {"kind": "partial", "fields": {"labels": {"kind": "record", "codomain": {"kind": "string"}}}}
        ]}
    }))
    .unwrap();
    let described = schemable::doc::interpret(&DescribeLazy { eager: false }, doc.entry(None).unwrap(), &doc.definitions);
    assert_eq!(described.unwrap(), "{ id: Int } & { labels?: Record<string, string> }");
}

#[test]
fn eager_lazy_interpreter_does_not_panic_on_recursion() {
    let doc: Document = serde_json::from_value(json!({
        "definitions": {
            "Node": {"kind": "struct", "fields": {
                "value": {"kind": "int"},
                "children": {"kind": "array", "items": {"kind": "ref", "name": "Node"}}
            }}
        },
        "root": {"kind": "struct", "fields": {
            "children": {"kind": "array", "items": {"kind": "ref", "name": "Node"}}
        }}
    }))
    .unwrap();
    let described = doc.interpret(&DescribeLazy { eager: true }, None).unwrap();
    assert_eq!(described, "{ children: Array<Record<string, unknown>> }");
    assert_eq!(
        doc.interpret(&DescribeLazy { eager: true }, Some("Node")).unwrap(),
        "{ value: Int, children: Array<Record<string, unknown>> }"
    );
}

/// [`Describe`] plus a lazy that either names the reference or, when
/// `eager`, runs the factory straight away.
#[derive(Debug, Clone, Copy)]
struct DescribeLazy {
    eager: bool,
}

impl Schemable for DescribeLazy {
    type Artifact = String;
    fn literals(&self, values: Literals) -> String { Describe.literals(values) }
    fn literals_or(&self, values: Literals, fallback: String) -> String { Describe.literals_or(values, fallback) }
    fn string(&self) -> String { Describe.string() }
    fn number(&self) -> String { Describe.number() }
    fn boolean(&self) -> String { Describe.boolean() }
    fn unknown_array(&self) -> String { Describe.unknown_array() }
    fn unknown_record(&self) -> String { Describe.unknown_record() }
    fn struct_<K: Into<String>, I: IntoIterator<Item = (K, String)>>(&self, fields: I) -> String {
        Describe.struct_(fields)
    }
    fn partial<K: Into<String>, I: IntoIterator<Item = (K, String)>>(&self, fields: I) -> String {
        Describe.partial(fields)
    }
    fn record(&self, codomain: String) -> String { Describe.record(codomain) }
    fn array(&self, item: String) -> String { Describe.array(item) }
    fn tuple(&self, items: Vec<String>) -> Result<String, SchemaError> { Describe.tuple(items) }
    fn intersection(&self, members: Vec<String>) -> Result<String, SchemaError> {
        Describe.intersection(members)
    }
    fn tagged<K: Into<String>, I: IntoIterator<Item = (K, String)>>(
        &self,
        tag: &str,
        branches: I,
    ) -> Result<String, SchemaError> {
        Describe.tagged(tag, branches)
    }
}

impl WithInt for DescribeLazy {
    fn int(&self) -> String { Describe.int() }
}

impl schemable::WithLazy for DescribeLazy {
    fn lazy<F>(&self, factory: F) -> String
    where
        F: FnOnce() -> String + Send + 'static,
    {
        if self.eager { factory() } else { "Lazy".into() }
    }
}
