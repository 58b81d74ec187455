//! Label trees and the rendering of [`DecodeError`]s into indented text.
use serde::Serialize;

use crate::decode_error::{DecodeError, ErrorInfo};

/// A rose tree: a value and an ordered forest of children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree<T> {
    pub value: T,
    pub forest: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn new(value: T, forest: Vec<Tree<T>>) -> Self {
        Self { value, forest }
    }

    pub fn leaf(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn map<U>(self, f: &impl Fn(T) -> U) -> Tree<U> {
        Tree {
            value: f(self.value),
            forest: self.forest.into_iter().map(|t| t.map(f)).collect(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DRAWING
// ————————————————————————————————————————————————————————————————————————————

/// Draws a tree one label per line, children under `├─`/`└─` glyphs.
///
/// ```text
/// root
/// ├─ a
/// │  └─ a.1
/// └─ b
/// ```
pub fn draw_tree<T: AsRef<str>>(tree: &Tree<T>) -> String {
    let mut out = String::from(tree.value.as_ref());
    draw_forest(&mut out, "\n", &tree.forest);
    out
}

fn draw_forest<T: AsRef<str>>(out: &mut String, indentation: &str, forest: &[Tree<T>]) {
    let len = forest.len();
    for (i, tree) in forest.iter().enumerate() {
        let is_last = i == len - 1;
        out.push_str(indentation);
        out.push_str(if is_last { "└─ " } else { "├─ " });
        out.push_str(tree.value.as_ref());
        let pad = if len > 1 && !is_last { "│  " } else { "   " };
        draw_forest(out, &format!("{indentation}{pad}"), &tree.forest);
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE ERRORS
// ————————————————————————————————————————————————————————————————————————————

const AND_SUFFIX: &str = ", some of the following conditions are not met";
const OR_SUFFIX: &str = ", all the following conditions are not met";

fn label(info: &ErrorInfo) -> String {
    if let Some(message) = &info.message {
        return message.clone();
    }
    match &info.id {
        Some(id) => format!("Cannot decode {}, expected {id}", info.actual),
        None => format!("Cannot decode {}", info.actual),
    }
}

fn prefixed(prefix: String, mut tree: Tree<String>) -> Tree<String> {
    tree.value = format!("({prefix}) {}", tree.value);
    tree
}

pub fn to_tree(e: &DecodeError) -> Tree<String> {
    match e {
        DecodeError::Leaf { info } => Tree::leaf(label(info)),
        DecodeError::Indexed { info, errors } => Tree::new(
            label(info),
            errors.iter().map(|(i, e)| prefixed(i.to_string(), to_tree(e))).collect(),
        ),
        DecodeError::Labeled { info, errors } => Tree::new(
            label(info),
            errors
                .iter()
                .map(|(k, e)| prefixed(serde_json::Value::from(k.as_str()).to_string(), to_tree(e)))
                .collect(),
        ),
        DecodeError::And { info, errors } => {
            Tree::new(label(info) + AND_SUFFIX, errors.iter().map(to_tree).collect())
        }
        DecodeError::Or { info, errors } => {
            Tree::new(label(info) + OR_SUFFIX, errors.iter().map(to_tree).collect())
        }
    }
}

/// `draw_tree(to_tree(e))`.
pub fn draw(e: &DecodeError) -> String {
    draw_tree(&to_tree(e))
}

/// Replaces a decode failure with its rendered text; successes pass through.
pub fn map_failure<A>(result: Result<A, DecodeError>) -> Result<A, String> {
    result.map_err(|e| draw(&e))
}
