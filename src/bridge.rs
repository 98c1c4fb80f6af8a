use crate::convert::{hydrate, serialize};
use crate::error::BridgeError;
use crate::parser::{self, ParserOptions, DEFAULT_MAX_DEPTH};
use crate::restore::restore as restore_ast;
use crate::tokenizer::tokenize;
use crate::value::{normalize, HostValue, Value};
use crate::wire::{decode_nodes, encode_nodes, WireNode};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Deepest node nesting accepted by `parse` and `restore`. Recursion
    /// depth, and so stack use, grows with it; see [`DEFAULT_MAX_DEPTH`].
    pub max_depth: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BridgeOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Value nesting that wire nodes up to `max_depth` can reach: each node
    /// level spends three value levels, and table cells sit four below the
    /// innermost node.
    pub fn max_value_depth(&self) -> usize {
        self.max_depth.saturating_mul(3).saturating_add(4)
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_depth: self.max_depth,
        }
    }
}

/// Parses markdown into typed wire nodes.
pub fn parse_nodes(text: &str, options: &BridgeOptions) -> Result<Vec<WireNode>, BridgeError> {
    let tokens = tokenize(text)?;
    let ast = parser::parse(&tokens, &options.parser_options())
        .inspect_err(|e| warn!(error = %e, "parse aborted"))?;
    let nodes = serialize(&ast);
    trace!(tokens = tokens.len(), nodes = nodes.len(), "parsed");
    Ok(nodes)
}

/// Parses markdown into an array of encoded wire nodes.
pub fn parse(text: &str, options: &BridgeOptions) -> Result<Value, BridgeError> {
    parse_nodes(text, options).map(|nodes| encode_nodes(&nodes))
}

/// Restores markdown from a host value holding an array of wire nodes.
///
/// Returns `Ok(None)` when the value is not an array.
pub fn restore<H: HostValue>(host: H, options: &BridgeOptions) -> Result<Option<String>, BridgeError> {
    let value =
        normalize(host, options).inspect_err(|e| warn!(error = %e, "restore input rejected"))?;
    restore_value(&value, options)
}

pub fn restore_value(value: &Value, options: &BridgeOptions) -> Result<Option<String>, BridgeError> {
    let Some(items) = value.as_array() else {
        debug!("restore input is not an array");
        return Ok(None);
    };
    let nodes = decode_nodes(items, options.max_depth)
        .inspect_err(|e| warn!(error = %e, "restore aborted"))?;
    Ok(Some(restore_nodes(&nodes)))
}

pub fn restore_nodes(nodes: &[WireNode]) -> String {
    let text = restore_ast(&hydrate(nodes));
    trace!(nodes = nodes.len(), bytes = text.len(), "restored");
    text
}
