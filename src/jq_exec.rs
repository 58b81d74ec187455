//! jq pre-processing of input documents before they are encoded.
//!
//! A filter is compiled once and then run over every input document.
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, Filter, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;
use tracing::debug;

/// A compiled jq program with the standard library loaded.
pub struct JqFilter {
    src: String,
    filter: Filter<Native<Val>>,
}

impl JqFilter {
    pub fn compile(filter_src: &str) -> Result<Self> {
        let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = load::Arena::default();
        let program = load::File { code: filter_src, path: () };

        let modules = loader.load(&arena, program).map_err(format_parse_errors)?;
        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(format_undefined_errors)?;

        debug!(filter = filter_src, "compiled jq filter");
        Ok(Self { src: filter_src.to_owned(), filter })
    }

    pub fn source(&self) -> &str { &self.src }

    /// Runs the filter over `input`, returning every output as JSON.
    pub fn apply(&self, input: &Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        let outputs = self.filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

        let mut out = Vec::new();
        for item in outputs {
            let v = item.map_err(|e| anyhow!("jq filter `{}` failed: {e:?}", self.src))?;
            // Val renders as JSON text
            let v = serde_json::from_str::<Value>(&v.to_string())
                .with_context(|| format!("jq filter `{}` produced non-JSON output", self.src))?;
            out.push(v);
        }
        Ok(out)
    }
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect();
    anyhow!(lines.join("\n"))
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect();
    anyhow!(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_and_fans_out() {
        let filter = JqFilter::compile(".items[]").unwrap();
        let input = json!({"items": [{"a": 1}, {"a": 2}]});
        assert_eq!(filter.apply(&input).unwrap(), vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn one_compiled_filter_serves_many_documents() {
        let filter = JqFilter::compile("{id: .id}").unwrap();
        for i in 0..3 {
            let out = filter.apply(&json!({"id": i, "drop": true})).unwrap();
            assert_eq!(out, vec![json!({"id": i})]);
        }
        assert_eq!(filter.source(), "{id: .id}");
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(JqFilter::compile(".[").is_err());
    }

    #[test]
    fn undefined_functions_are_reported() {
        let err = JqFilter::compile("no_such_fn(1)").err().unwrap();
        assert!(err.to_string().contains("no_such_fn"));
    }
}
