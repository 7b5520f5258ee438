//! Automaton to DOT (Graphviz) conversion.
//!
//! The drawing is built from the [`DfaDict`](crate::dict::DfaDict) view only,
//! so any automaton with a finite input alphabet can be rendered.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - An invisible **start marker** (a point) has an edge into the start state
//! - **States** are numbered from `1` in walk order and labelled with the
//!   state value above its output, separated by `---`
//! - **Edges** are labelled by the letter; one edge per letter, so parallel
//!   edges between the same two states are kept apart
//!
//! # Examples
//!
//! ```
//! use dfa_rs::dfa::Dfa;
//! use dfa_rs::dot::to_dot;
//!
//! let dfa = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 1)
//!     .inputs([0, 1])
//!     .build();
//!
//! let dot = to_dot(&dfa).unwrap();
//! assert!(dot.starts_with("digraph {"));
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::{Debug, Write as _};

use crate::alphabet::Letter;
use crate::dfa::{Dfa, State};
use crate::dict::dfa_to_dict;
use crate::error::Result;

/// Configuration options for DOT output generation.
///
/// ```
/// use dfa_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     rankdir: "TB",
///     ..DotConfig::default()
/// };
/// assert_eq!(config.node_shape, "circle");
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for state nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for the start marker (default: "point")
    pub start_shape: &'static str,
    /// Graph layout direction (default: "LR")
    pub rankdir: &'static str,
    /// Whether state values are shown above the labels (default: true)
    pub show_states: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            start_shape: "point",
            rankdir: "LR",
            show_states: true,
        }
    }
}

/// Quotes a `Debug` rendering for use inside a DOT string.
fn escape(value: &impl Debug) -> String {
    format!("{:?}", value).replace('\\', "\\\\").replace('"', "\\\"")
}

/// Converts an automaton to DOT format with the default configuration.
pub fn to_dot<S: State, I: Letter, O: Letter>(dfa: &Dfa<S, I, O>) -> Result<String> {
    to_dot_with_config(dfa, &DotConfig::default())
}

/// Converts an automaton to DOT format with custom configuration.
///
/// ```
/// use dfa_rs::dfa::Dfa;
/// use dfa_rs::dot::{to_dot_with_config, DotConfig};
///
/// let dfa = Dfa::builder(0u8, |s: &u8, c: &u8| (s + c) % 2, |s: &u8| *s == 1)
///     .inputs([0, 1])
///     .build();
///
/// let config = DotConfig {
///     node_shape: "ellipse",
///     ..DotConfig::default()
/// };
/// let dot = to_dot_with_config(&dfa, &config).unwrap();
/// assert!(dot.contains("shape=ellipse"));
/// ```
pub fn to_dot_with_config<S: State, I: Letter, O: Letter>(dfa: &Dfa<S, I, O>, config: &DotConfig) -> Result<String> {
    let (dict, start) = dfa_to_dict(dfa)?;

    let mut dot = String::new();
    writeln!(dot, "digraph {{")?;
    writeln!(dot, "rankdir={};", config.rankdir)?;
    writeln!(dot, "node [shape={}];", config.node_shape)?;
    writeln!(dot, "0 [shape={}, label=\"\"];", config.start_shape)?;

    // Node ids follow the dictionary order, shifted past the start marker.
    for (i, (state, (label, _))) in dict.iter().enumerate() {
        if config.show_states {
            writeln!(dot, "{} [label=\"{}\\n---\\n{}\"];", i + 1, escape(state), escape(label))?;
        } else {
            writeln!(dot, "{} [label=\"{}\"];", i + 1, escape(label))?;
        }
    }

    // The start state is always first in walk order.
    debug_assert_eq!(dict.get_index_of(&start), Some(0));
    writeln!(dot, "0 -> 1;")?;

    for (i, (_, (_, successors))) in dict.iter().enumerate() {
        for (letter, next) in successors {
            let j = dict.get_index_of(next).map_or(0, |j| j + 1);
            writeln!(dot, "{} -> {} [label=\"{}\"];", i + 1, j, escape(letter))?;
        }
    }

    writeln!(dot, "}}")?;
    Ok(dot)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn parity() -> Dfa<u8, char> {
        Dfa::builder(0, |s: &u8, c: &char| if *c == 'b' { 1 - s } else { *s }, |s: &u8| *s == 1)
            .inputs(['a', 'b'])
            .build()
    }

    #[test]
    fn test_to_dot_basic() {
        let dot = to_dot(&parity()).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("0 [shape=point, label=\"\"];"));
        assert!(dot.contains("0 -> 1;"));
        assert!(dot.contains(r#"1 [label="0\n---\nfalse"];"#));
        assert!(dot.contains(r#"2 [label="1\n---\ntrue"];"#));
        assert!(dot.contains(r#"1 -> 1 [label="'a'"];"#));
        assert!(dot.contains(r#"1 -> 2 [label="'b'"];"#));
        assert!(dot.contains(r#"2 -> 1 [label="'b'"];"#));
    }

    #[test]
    fn test_to_dot_escapes_quotes() {
        let dfa = Dfa::builder(
            "idle",
            |_: &&str, c: &&str| if *c == "go" { "busy" } else { "idle" },
            |s: &&str| s.len(),
        )
        .inputs(["go", "stop"])
        .build();
        let dot = to_dot(&dfa).unwrap();
        assert!(dot.contains(r#"1 [label="\"idle\"\n---\n4"];"#));
        assert!(dot.contains(r#"1 -> 2 [label="\"go\""];"#));
    }

    #[test]
    fn test_to_dot_with_config() {
        let config = DotConfig {
            show_states: false,
            rankdir: "TB",
            ..DotConfig::default()
        };
        let dot = to_dot_with_config(&parity(), &config).unwrap();
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains(r#"2 [label="true"];"#));
    }

    #[test]
    fn test_to_dot_unbounded() {
        let dfa = Dfa::new(0u8, |s: &u8, c: &u8| s ^ c, |s: &u8| *s == 0);
        assert!(to_dot(&dfa).is_err());
    }
}
