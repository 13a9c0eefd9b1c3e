//! Operation Registry
//!
//! The dispatch table: normalised operation name (or alias) to plugin.

use crate::{EvalContext, OperationMeta, OperationPlugin};
use linal_core::{LinalError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Normalise an operation name for lookup.
///
/// Case-insensitive (Unicode-aware), trims, and treats runs of spaces,
/// `_` and `-` as one separator, so "dot_product" and "Dot  Product"
/// name the same operation.
pub fn normalize_name(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Central operation registry
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn OperationPlugin>>,
    /// Normalised alias → normalised canonical name
    aliases: HashMap<String, String>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn with_operation<P: OperationPlugin + 'static>(mut self, op: P) -> Self {
        let meta = op.meta();
        let key = normalize_name(meta.name);
        for alias in meta.aliases {
            self.aliases.insert(normalize_name(alias), key.clone());
        }
        if self.operations.insert(key, Arc::new(op)).is_some() {
            warn!(operation = meta.name, "operation registered twice, keeping the later one");
        }
        self
    }

    fn resolve(&self, name: &str) -> Option<&Arc<dyn OperationPlugin>> {
        let key = normalize_name(name);
        self.operations.get(&key).or_else(|| {
            self.aliases.get(&key).and_then(|canonical| self.operations.get(canonical))
        })
    }

    pub fn get(&self, name: &str) -> Option<&dyn OperationPlugin> {
        self.resolve(name).map(|op| op.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of distinct operations (aliases not counted)
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Canonical names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.operations.values().map(|op| op.meta().name).collect();
        names.sort_unstable();
        names
    }

    /// Look up an operation or produce an `UNKNOWN_OPERATION` error with
    /// similar names as the suggestion
    pub fn lookup(&self, name: &str) -> Result<&dyn OperationPlugin, LinalError> {
        match self.get(name) {
            Some(op) => Ok(op),
            None => {
                let similar = self.find_similar(name);
                debug!(name, similar = similar.len(), "unknown operation");
                let mut err = LinalError::unknown_operation(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Err(err)
            }
        }
    }

    /// Call an operation on already-typed operands
    pub fn call(&self, name: &str, args: &[Value], ctx: &mut EvalContext) -> Value {
        match self.lookup(name) {
            Ok(op) => op.call(args, ctx),
            Err(e) => Value::Error(e),
        }
    }

    /// Find operation names similar to the given name (for error suggestions)
    fn find_similar(&self, name: &str) -> Vec<String> {
        let query = normalize_name(name);
        let mut matches: Vec<(String, usize)> = self.operations.values()
            .map(|op| op.meta().name.to_string())
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, &normalize_name(&candidate));
                (score > 0).then_some((candidate, score))
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two normalised names
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared words count for more than shared letters
        let query_words: HashSet<&str> = query.split(' ').collect();
        let candidate_words: HashSet<&str> = candidate.split(' ').collect();
        score += query_words.intersection(&candidate_words).count() * 20;

        let query_chars: HashSet<char> = query.chars().filter(|c| *c != ' ').collect();
        let candidate_chars: HashSet<char> = candidate.chars().filter(|c| *c != ' ').collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // Require more than incidental overlap
        if common * 2 > query_chars.len().max(1) {
            score += common * 2;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.lookup(name) {
            Ok(op) => Self::operation_to_help(op.meta()),
            Err(e) => Value::Error(e),
        }
    }

    fn general_help(&self) -> Value {
        let mut by_category: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for name in self.names() {
            if let Some(op) = self.get(name) {
                by_category.entry(op.meta().category.to_string())
                    .or_default()
                    .push(Value::from(name));
            }
        }

        Value::object([
            ("operations", Value::Object(
                by_category.into_iter().map(|(k, v)| (k, Value::List(v))).collect()
            )),
            ("usage", Value::from("Call help('operation name') for detailed help. Commands are written '<operation>:<payload>'.")),
        ])
    }

    fn operation_to_help(meta: OperationMeta) -> Value {
        Value::object([
            ("name", Value::from(meta.name)),
            ("aliases", Value::List(meta.aliases.iter().map(|a| Value::from(*a)).collect())),
            ("description", Value::from(meta.description)),
            ("usage", Value::from(meta.usage)),
            ("grammar", Value::from(meta.grammar.template())),
            ("returns", Value::from(meta.returns)),
            ("category", Value::from(meta.category)),
            ("args", Value::List(
                meta.args.iter().map(|a| Value::object([
                    ("name", Value::from(a.name)),
                    ("type", Value::from(a.typ)),
                    ("description", Value::from(a.description)),
                    ("optional", Value::Bool(a.optional)),
                ])).collect()
            )),
            ("examples", Value::List(meta.examples.iter().map(|e| Value::from(*e)).collect())),
            ("related", Value::List(meta.related.iter().map(|r| Value::from(*r)).collect())),
        ])
    }

    pub fn list_operations(&self, category: Option<&str>) -> Value {
        let ops: Vec<Value> = self.names().into_iter()
            .filter_map(|name| self.get(name))
            .map(|op| op.meta())
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .map(|meta| Value::object([
                ("name", Value::from(meta.name)),
                ("description", Value::from(meta.description)),
                ("usage", Value::from(meta.usage)),
                ("category", Value::from(meta.category)),
            ]))
            .collect();
        Value::List(ops)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
