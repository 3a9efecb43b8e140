use std::fmt::Display;

use itertools::Itertools;

use crate::parser::{visitor::Visitor, Data, Node, Quantifier};

/// Handle into a digraph's node arena.
pub type NodeId = usize;

/// An atomic transition label: a literal character or the empty symbol.
/// `Epsilon` is a variant of the type, never something a pattern can spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Literal(char),
    Epsilon,
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(char_literal) => write!(f, "{}", char_literal),
            Self::Epsilon => write!(f, "ε"),
        }
    }
}

/// A fragment exit point. `name` is a debug label only; distinct nodes may
/// share one, which is why everything downstream keys on handles.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub name: String,
    pub edges: Vec<(Symbol, NodeId)>,
}

/// The intermediate graph a pattern compiles into before flattening.
///
/// Nodes live in an arena and reference each other by handle, so the cycles
/// the star construction introduces need no shared ownership. The top-level
/// pattern contributes one starting/ending node per alternation arm.
#[derive(Debug, Default)]
pub struct Digraph {
    nodes: Vec<GraphNode>,
    pub starts: Vec<NodeId>,
    pub ends: Vec<NodeId>,
}

impl Digraph {
    pub fn new() -> Digraph {
        Digraph::default()
    }

    pub fn add_node(&mut self, name: &str) -> NodeId {
        self.nodes.push(GraphNode {
            name: String::from(name),
            edges: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn add_edge(&mut self, from: NodeId, symbol: Symbol, to: NodeId) {
        self.nodes[from].edges.push((symbol, to));
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node reachable from the starting set, in canonical order.
    pub fn node_list(&self) -> Vec<NodeId> {
        NodeCollector::new(self).run()
    }
}

/// Deterministic reachability enumeration over a digraph.
///
/// Depth-first preorder from each starting node in turn. A node is appended
/// exactly once; the `seen` check is indexed by handle, which keeps the
/// traversal finite on cyclic graphs and O(1) per check.
pub struct NodeCollector<'a> {
    graph: &'a Digraph,
    seen: Vec<bool>,
    order: Vec<NodeId>,
}

impl<'a> NodeCollector<'a> {
    pub fn new(graph: &'a Digraph) -> NodeCollector<'a> {
        NodeCollector {
            graph,
            seen: vec![false; graph.len()],
            order: Vec::new(),
        }
    }

    pub fn run(mut self) -> Vec<NodeId> {
        let graph = self.graph;
        for &start in &graph.starts {
            self.visit(start);
        }
        self.order
    }

    fn visit(&mut self, id: NodeId) {
        if self.seen[id] {
            return;
        }
        self.seen[id] = true;
        self.order.push(id);
        let graph = self.graph;
        for &(_, target) in &graph.node(id).edges {
            self.visit(target);
        }
    }
}

type Fragment = (NodeId, NodeId);

/// Compiles a parsed pattern into a digraph by composing fragments, one
/// entry/exit node pair per sub-expression.
#[derive(Debug, Default)]
pub struct DigraphBuilder {
    graph: Digraph,
}

impl DigraphBuilder {
    pub fn build(root: Node) -> Digraph {
        let mut builder = DigraphBuilder {
            graph: Digraph::new(),
        };
        builder.toplevel(root);
        builder.graph
    }

    fn toplevel(&mut self, expression: Node) {
        if let Node::Expression(items, alternate) = expression {
            let fragment = self.concatenation(items);
            self.graph.starts.push(fragment.0);
            self.graph.ends.push(fragment.1);
            if let Some(alternative) = alternate {
                self.toplevel(*alternative);
            }
        } else {
            panic!("expected an expression, not {:#?}", expression)
        }
    }

    fn epsilon(&mut self, from: NodeId, to: NodeId) {
        self.graph.add_edge(from, Symbol::Epsilon, to);
    }

    fn concatenation(&mut self, items: Vec<Box<Node>>) -> Fragment {
        let fragments: Vec<Fragment> = items.iter().map(|node| node.accept(self)).collect();
        for (a, b) in fragments.iter().tuple_windows() {
            self.epsilon(a.1, b.0);
        }
        (fragments.first().unwrap().0, fragments.last().unwrap().1)
    }

    fn alternation(&mut self, lower: &Fragment, upper: &Fragment) -> Fragment {
        let entry = self.graph.add_node("alt");
        let exit = self.graph.add_node("join");
        self.epsilon(entry, lower.0);
        self.epsilon(entry, upper.0);
        self.epsilon(lower.1, exit);
        self.epsilon(upper.1, exit);
        (entry, exit)
    }

    fn parallel_literals(&mut self, arms: &[char]) -> Fragment {
        let entry = self.graph.add_node("alt");
        let exit = self.graph.add_node("join");
        for &char_literal in arms {
            self.graph.add_edge(entry, Symbol::Literal(char_literal), exit);
        }
        (entry, exit)
    }

    fn zero_or_more(&mut self, fragment: &Fragment) -> Fragment {
        self.epsilon(fragment.1, fragment.0);
        self.epsilon(fragment.0, fragment.1);
        *fragment
    }

    fn match_or_group(&mut self, node: Node) -> Fragment {
        match node {
            Node::Match(node, quantifier) => {
                let fragment = node.accept(self);
                match quantifier {
                    Quantifier::None => fragment,
                    Quantifier::ZeroOrMore => self.zero_or_more(&fragment),
                }
            }
            Node::Group(node, quantifier) => {
                let fragment = node.accept(self);
                match quantifier {
                    Quantifier::None => fragment,
                    Quantifier::ZeroOrMore => self.zero_or_more(&fragment),
                }
            }
            _ => panic!("expected Group or Match, not {:#?}", node),
        }
    }
}

/// An alternation whose arms are all single unquantified literals collapses
/// to parallel edges between one entry/exit pair.
fn literal_arms(expression: &Node) -> Option<Vec<char>> {
    fn arm_literal(items: &[Box<Node>]) -> Option<char> {
        match items {
            [item] => match &**item {
                Node::Match(atom, Quantifier::None) => match &**atom {
                    Node::Character(char_literal) => Some(*char_literal),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    let mut arms = Vec::new();
    let mut current = expression;
    loop {
        match current {
            Node::Expression(items, alternate) => {
                arms.push(arm_literal(items)?);
                match alternate {
                    Some(next) => current = next,
                    None => break,
                }
            }
            _ => return None,
        }
    }
    if arms.len() > 1 {
        Some(arms)
    } else {
        None
    }
}

impl Visitor for DigraphBuilder {
    type Result = Fragment;

    fn visit_expression(&mut self, expression: Node) -> Self::Result {
        if let Some(arms) = literal_arms(&expression) {
            return self.parallel_literals(&arms);
        }
        if let Node::Expression(items, alternate) = expression {
            let fragment = self.concatenation(items);
            if let Some(alternative) = alternate {
                let alternate_fragment = alternative.accept(self);
                self.alternation(&fragment, &alternate_fragment)
            } else {
                fragment
            }
        } else {
            panic!("expected an expression, not {:#?}", expression)
        }
    }

    fn visit_character(&mut self, char: Node) -> Self::Result {
        if let Node::Character(char_literal) = char {
            let entry = self.graph.add_node(&char_literal.to_string());
            let exit = self.graph.add_node("out");
            self.graph.add_edge(entry, Symbol::Literal(char_literal), exit);
            (entry, exit)
        } else {
            panic!("expected a character, not {:#?}", char)
        }
    }

    fn visit_match(&mut self, match_: Node) -> Self::Result {
        self.match_or_group(match_)
    }

    fn visit_group(&mut self, group: Node) -> Self::Result {
        self.match_or_group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::run_parse;

    fn straight_graph() -> (Digraph, [NodeId; 3]) {
        let mut graph = Digraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.add_edge(a, Symbol::Literal('a'), b);
        graph.add_edge(b, Symbol::Literal('b'), c);
        graph.starts.push(a);
        graph.ends.push(c);
        (graph, [a, b, c])
    }

    #[test]
    fn node_list_straight_graph() {
        let (graph, [a, b, c]) = straight_graph();
        assert_eq!(graph.node_list(), vec![a, b, c]);
    }

    #[test]
    fn node_list_diamond_graph() {
        let mut graph = Digraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(a, Symbol::Literal('a'), b);
        graph.add_edge(a, Symbol::Literal('a'), c);
        graph.add_edge(b, Symbol::Literal('b'), d);
        graph.add_edge(c, Symbol::Literal('c'), d);
        graph.starts.push(a);
        graph.ends.push(d);
        assert_eq!(graph.node_list(), vec![a, b, d, c]);
    }

    #[test]
    fn node_list_cyclic_graph() {
        let mut graph = Digraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(a, Symbol::Literal('a'), b);
        graph.add_edge(a, Symbol::Literal('a'), c);
        graph.add_edge(b, Symbol::Literal('b'), d);
        graph.add_edge(c, Symbol::Literal('c'), d);
        graph.add_edge(d, Symbol::Literal('d'), b);
        graph.starts.push(a);
        graph.ends.push(c);
        assert_eq!(graph.node_list(), vec![a, b, d, c]);
    }

    #[test]
    fn node_list_cyclic_graph_with_two_starts() {
        let mut graph = Digraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(a, Symbol::Literal('a'), b);
        graph.add_edge(a, Symbol::Literal('a'), c);
        graph.add_edge(b, Symbol::Literal('b'), d);
        graph.add_edge(c, Symbol::Literal('c'), d);
        graph.add_edge(d, Symbol::Literal('d'), b);
        graph.starts.push(a);
        graph.starts.push(b);
        graph.ends.push(c);
        assert_eq!(graph.node_list(), vec![a, b, d, c]);
    }

    #[test]
    fn node_list_is_deterministic() {
        let (graph, _) = straight_graph();
        assert_eq!(graph.node_list(), graph.node_list());

        let compiled = DigraphBuilder::build(run_parse("(a|b)*abb").unwrap());
        assert_eq!(compiled.node_list(), compiled.node_list());
    }

    #[test]
    fn node_list_dedups_by_handle_not_name() {
        let mut graph = Digraph::new();
        let first = graph.add_node("x");
        let second = graph.add_node("x");
        let third = graph.add_node("x");
        graph.add_edge(first, Symbol::Literal('x'), second);
        graph.add_edge(second, Symbol::Literal('x'), third);
        graph.add_edge(third, Symbol::Literal('x'), first);
        graph.starts.push(first);
        graph.ends.push(third);
        assert_eq!(graph.node_list(), vec![first, second, third]);
    }

    #[test]
    fn literal_fragment_shape() {
        let graph = DigraphBuilder::build(run_parse("a").unwrap());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.starts.len(), 1);
        assert_eq!(graph.ends.len(), 1);
        let entry = graph.node(graph.starts[0]);
        assert_eq!(entry.name, "a");
        assert_eq!(entry.edges, vec![(Symbol::Literal('a'), graph.ends[0])]);
    }

    #[test]
    fn concatenation_chains_with_epsilon() {
        let graph = DigraphBuilder::build(run_parse("ab").unwrap());
        let entry = graph.starts[0];
        let exit_of_a = graph.node(entry).edges[0].1;
        let (symbol, entry_of_b) = graph.node(exit_of_a).edges[0];
        assert_eq!(symbol, Symbol::Epsilon);
        assert_eq!(graph.node(entry_of_b).name, "b");
    }

    #[test]
    fn kleene_star_adds_loop_back_and_bypass() {
        let graph = DigraphBuilder::build(run_parse("a*").unwrap());
        let entry = graph.starts[0];
        let exit = graph.ends[0];
        assert_eq!(
            graph.node(entry).edges,
            vec![(Symbol::Literal('a'), exit), (Symbol::Epsilon, exit)]
        );
        assert_eq!(graph.node(exit).edges, vec![(Symbol::Epsilon, entry)]);
    }

    #[test]
    fn alternation_of_literals_collapses_to_parallel_edges() {
        let graph = DigraphBuilder::build(run_parse("(a|b|c)").unwrap());
        assert_eq!(graph.len(), 2);
        let entry = graph.starts[0];
        let exit = graph.ends[0];
        assert_eq!(
            graph.node(entry).edges,
            vec![
                (Symbol::Literal('a'), exit),
                (Symbol::Literal('b'), exit),
                (Symbol::Literal('c'), exit),
            ]
        );
    }

    #[test]
    fn nested_alternation_builds_junctions() {
        let graph = DigraphBuilder::build(run_parse("(ab|c)").unwrap());
        let entry = graph.node(graph.starts[0]);
        assert_eq!(entry.name, "alt");
        assert_eq!(entry.edges.len(), 2);
        assert!(entry.edges.iter().all(|&(symbol, _)| symbol == Symbol::Epsilon));
        assert_eq!(graph.node(graph.ends[0]).name, "join");
    }

    #[test]
    fn top_level_alternation_has_one_start_per_arm() {
        let graph = DigraphBuilder::build(run_parse("ab|cd").unwrap());
        assert_eq!(graph.starts.len(), 2);
        assert_eq!(graph.ends.len(), 2);
        assert_eq!(graph.node(graph.starts[0]).name, "a");
        assert_eq!(graph.node(graph.starts[1]).name, "c");
    }

    #[test]
    fn every_node_is_reachable_from_a_start() {
        for pattern in ["a", "ab", "a|b", "a*", "(ab)*", "(a|b)*abb", "((a|b)c)*d"] {
            let graph = DigraphBuilder::build(run_parse(pattern).unwrap());
            assert_eq!(
                graph.node_list().len(),
                graph.len(),
                "unreachable nodes compiled from {:?}",
                pattern
            );
        }
    }
}
