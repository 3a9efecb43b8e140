use itertools::Itertools;

use crate::{digraph::Symbol, nfa::NFA};

/// Two-column state listing, one row per state id.
pub fn state_table(nfa: &NFA) -> String {
    let mut out = String::from("States:\nNumber\tName\n");
    for (id, name) in nfa.states().iter().enumerate() {
        out += &format!("{}\t{}\n", id, name);
    }
    out
}

/// The transition matrix as a tab-separated grid. Each cell joins its label
/// sequence with `·`; `-` marks the absence of an edge.
pub fn transition_table(nfa: &NFA) -> String {
    let size = nfa.len();
    let mut out = String::from("Transitions:\n");
    out += &format!("\t{}\n", (0..size).map(|id| id.to_string()).join("\t"));
    for from in 0..size {
        let row = (0..size)
            .map(|to| {
                let cell = nfa.symbols(from, to);
                if cell.is_empty() {
                    String::from("-")
                } else {
                    cell.iter().map(|symbol| symbol.to_string()).join("·")
                }
            })
            .join("\t");
        out += &format!("{}\t{}\n", from, row);
    }
    out
}

/// GraphViz dot code for the automaton, for debugging purposes.
pub fn as_graphviz_code(nfa: &NFA) -> String {
    let mut out = String::new();
    for (id, name) in nfa.states().iter().enumerate() {
        if id == nfa.initial_state() {
            out += &format!("node_{}[label=\"{}\"]{}\n", id, name, "[fillcolor=green]");
        } else if nfa.final_states().contains(&id) {
            out += &format!("node_{}[label=\"{}\"shape=doublecircle]\n", id, name);
        } else {
            out += &format!(
                "node_{}[label=\"{}\"]{}\n",
                id, name, "[fillcolor=\"#EEEEEE\" fontcolor=\"#888888\"]"
            );
        }
    }
    for from in 0..nfa.len() {
        for to in 0..nfa.len() {
            for symbol in nfa.symbols(from, to) {
                if let Symbol::Epsilon = symbol {
                    out += &format!("node_{} -> node_{}[style=dashed]\n", from, to);
                } else {
                    out += &format!("node_{} -> node_{}[label=\"{}\"]\n", from, to, symbol);
                }
            }
        }
    }
    format!(
        "digraph G {{  rankdir=\"LR\" graph [fontname = \"Courier New\"];
            node [fontname = \"verdana\", style = rounded];
            edge [fontname = \"verdana\"];
            {{\n{}\n}}}}",
        out
    )
}
