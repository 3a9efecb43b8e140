use std::{collections::HashSet, error::Error, fmt::Display};

use colored::Colorize;

use crate::{
    digraph::{Digraph, NodeId, Symbol},
    parser::SyntaxError,
};

pub type State = usize;

#[derive(Debug)]
pub enum CompileError {
    ParsingFailed(SyntaxError),
    InconsistentGraph(NodeId),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParsingFailed(syntax_error) => write!(f, "{}", syntax_error),
            Self::InconsistentGraph(id) => write!(
                f,
                "{} node {} is referenced by the digraph but missing from its enumeration",
                "[fatal]".red().bold(),
                id
            ),
        }
    }
}

impl Error for CompileError {}

/// A flattened, immutable automaton.
///
/// Cell `[i][j]` of the transition matrix holds the ordered symbols labeling
/// the parallel edges from state `i` to state `j`; an empty cell means no
/// edge. State 0 is the synthetic initial state, named `initial`.
#[derive(Debug, Clone, PartialEq)]
pub struct NFA {
    states: Vec<String>,
    transitions: Vec<Vec<Vec<Symbol>>>,
    initial: State,
    finals: Vec<State>,
}

impl NFA {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Debug names, indexed by state id.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> State {
        self.initial
    }

    pub fn final_states(&self) -> &[State] {
        &self.finals
    }

    /// The ordered label sequence of the parallel edges from `from` to `to`.
    pub fn symbols(&self, from: State, to: State) -> &[Symbol] {
        &self.transitions[from][to]
    }

    /// All states reachable from `states` via zero or more epsilon edges.
    pub fn epsilon_closure(&self, states: &HashSet<State>) -> HashSet<State> {
        let mut closure = states.clone();
        let mut stack: Vec<State> = states.iter().copied().collect();
        while let Some(state) = stack.pop() {
            for target in 0..self.len() {
                if self.transitions[state][target].contains(&Symbol::Epsilon)
                    && closure.insert(target)
                {
                    stack.push(target);
                }
            }
        }
        closure
    }

    /// Membership test. Never fails: symbols outside the pattern's alphabet
    /// simply empty the active set, which rejects.
    pub fn accepts(&self, input: &str) -> bool {
        let mut active = self.epsilon_closure(&HashSet::from([self.initial]));
        for char_literal in input.chars() {
            let symbol = Symbol::Literal(char_literal);
            let moved: HashSet<State> = active
                .iter()
                .flat_map(|&state| {
                    (0..self.len())
                        .filter(move |&target| self.transitions[state][target].contains(&symbol))
                })
                .collect();
            if moved.is_empty() {
                return false;
            }
            active = self.epsilon_closure(&moved);
        }
        active
            .iter()
            .any(|state| self.finals.contains(state))
    }
}

/// Flattens a digraph into an `NFA`.
///
/// The k-th node of the collector's order becomes state k+1; state 0 is the
/// synthetic initial state, wired to every starting node by an epsilon edge.
/// Edges accumulate into their matrix cell in insertion order, so parallel
/// edges between one node pair never overwrite each other.
#[derive(Debug)]
pub struct NFABuilder<'a> {
    graph: &'a Digraph,
    order: Vec<NodeId>,
}

impl<'a> NFABuilder<'a> {
    pub fn new(graph: &'a Digraph) -> NFABuilder<'a> {
        NFABuilder {
            graph,
            order: graph.node_list(),
        }
    }

    pub fn build(self) -> Result<NFA, CompileError> {
        let size = self.order.len() + 1;

        let mut assigned: Vec<Option<State>> = vec![None; self.graph.len()];
        for (index, &id) in self.order.iter().enumerate() {
            assigned[id] = Some(index + 1);
        }

        let mut states = Vec::with_capacity(size);
        states.push(String::from("initial"));
        for &id in &self.order {
            states.push(self.graph.node(id).name.clone());
        }

        let mut transitions: Vec<Vec<Vec<Symbol>>> = vec![vec![Vec::new(); size]; size];
        for &start in &self.graph.starts {
            let state = assigned[start].ok_or(CompileError::InconsistentGraph(start))?;
            transitions[0][state].push(Symbol::Epsilon);
        }
        for &id in &self.order {
            let from = assigned[id].ok_or(CompileError::InconsistentGraph(id))?;
            for &(symbol, target) in &self.graph.node(id).edges {
                let to = assigned[target].ok_or(CompileError::InconsistentGraph(target))?;
                transitions[from][to].push(symbol);
            }
        }

        let mut finals = Vec::with_capacity(self.graph.ends.len());
        for &end in &self.graph.ends {
            finals.push(assigned[end].ok_or(CompileError::InconsistentGraph(end))?);
        }

        Ok(NFA {
            states,
            transitions,
            initial: 0,
            finals,
        })
    }
}
