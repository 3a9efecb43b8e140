//! A small regular-expression compiler.
//!
//! Patterns over literal characters, concatenation, alternation (`|`),
//! Kleene star (`*`) and grouping (`( )`) are parsed into an intermediate
//! directed graph of fragments, then flattened into an explicit
//! state/transition-matrix [`NFA`] for membership testing:
//!
//! ```
//! let nfa = renfa::compile("(ab)*").unwrap();
//! assert!(nfa.accepts("abab"));
//! assert!(!nfa.accepts("aba"));
//! ```

pub mod digraph;
pub mod nfa;
pub mod parser;
pub mod render;

use crate::digraph::DigraphBuilder;
pub use crate::digraph::{Digraph, GraphNode, NodeCollector, NodeId, Symbol};
pub use crate::nfa::{CompileError, NFABuilder, State, NFA};
pub use crate::parser::SyntaxError;

/// Compiles a pattern into an [`NFA`]. Either a complete, valid automaton
/// comes back or an error does; there is no partial result.
pub fn compile(pattern: &str) -> Result<NFA, CompileError> {
    let root = parser::run_parse(pattern).map_err(CompileError::ParsingFailed)?;
    let graph = DigraphBuilder::build(root);
    NFABuilder::new(&graph).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_inputs(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut inputs = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for prefix in &frontier {
                for &char_literal in alphabet {
                    let mut input = prefix.clone();
                    input.push(char_literal);
                    next.push(input);
                }
            }
            inputs.extend(next.iter().cloned());
            frontier = next;
        }
        inputs
    }

    #[test]
    fn agrees_with_reference_engine() {
        let patterns = [
            "ab",
            "a|b",
            "a*",
            "(ab)*",
            "(a|b)*abb",
            "a(b|a)*",
            "(a|b)(a|b)",
            "a*b*",
            "((a)(b))",
            "(ab|ba)*",
            "a|a",
            "(a*)*",
        ];
        for pattern in patterns {
            let nfa = compile(pattern).unwrap();
            let oracle = regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap();
            for input in all_inputs(&['a', 'b'], 4) {
                assert_eq!(
                    nfa.accepts(&input),
                    oracle.is_match(&input),
                    "pattern {:?} disagrees with the reference engine on {:?}",
                    pattern,
                    input
                );
            }
        }
    }

    #[test]
    fn accepts_is_total_over_arbitrary_input() {
        let nfa = compile("(a|b)*").unwrap();
        for input in ["", "a", "zzz", "ε", "a b", "\n"] {
            // no panic, just a boolean
            let _ = nfa.accepts(input);
        }
    }
}
