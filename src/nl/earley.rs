//! Earley parser over part-of-speech tag sequences.
//!
//! Implements Earley's algorithm for ambiguous context-free grammars whose
//! terminals are POS tags. Every complete derivation of the start symbol is
//! returned, ranked; callers that want "the" derivation take the first.
//!
//! Ranking is fully deterministic: score (sum of rule weights) descending,
//! then the start rule's grammar index ascending. Within one start rule the
//! first back-pointer chain reaching an item in chart order is kept, so the
//! same tag sequence always yields the same tree.

use std::collections::HashSet;
use std::fmt;

use crate::types::TaggedToken;

// ---------------------------------------------------------------------------
// Grammar definition
// ---------------------------------------------------------------------------

/// A symbol in the grammar: either a non-terminal (rule name) or a terminal
/// (a POS tag that must match an input token's tag exactly).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A non-terminal: references a grammar rule by name.
    NonTerminal(String),
    /// A terminal: matches tokens carrying this tag.
    Terminal(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal(s) => write!(f, "{}", s),
            Symbol::Terminal(s) => write!(f, "'{}'", s),
        }
    }
}

/// A production rule: LHS → RHS₁ RHS₂ ... RHSₙ
#[derive(Debug, Clone)]
pub struct Rule {
    /// Left-hand side non-terminal name.
    pub lhs: String,
    /// Right-hand side: sequence of symbols.
    pub rhs: Vec<Symbol>,
    /// Priority weight (higher = preferred when ranking parses).
    pub weight: f64,
}

impl Rule {
    pub fn new(lhs: impl Into<String>, rhs: Vec<Symbol>) -> Self {
        Self { lhs: lhs.into(), rhs, weight: 1.0 }
    }

    pub fn weighted(lhs: impl Into<String>, rhs: Vec<Symbol>, weight: f64) -> Self {
        Self { lhs: lhs.into(), rhs, weight }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// A context-free grammar: a set of rules plus a start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    pub start: String,
}

impl Grammar {
    pub fn new(start: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self { start: start.into(), rules }
    }

    /// True if at least one rule has `name` as its left-hand side.
    pub fn defines(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.lhs == name)
    }
}

// ---------------------------------------------------------------------------
// Earley items and chart
// ---------------------------------------------------------------------------

/// An Earley item: a dotted rule with origin position.
#[derive(Debug, Clone)]
struct EarleyItem {
    rule_idx: usize,
    /// Position of the dot within the rule's RHS (0 = start, len = complete).
    dot: usize,
    /// The chart position where this item started.
    origin: usize,
    /// Back-pointers for building the tree, one per symbol before the dot.
    completions: Vec<BackPointer>,
}

#[derive(Debug, Clone)]
enum BackPointer {
    /// A completed non-terminal and the back-pointers of its own children.
    Completed {
        rule_idx: usize,
        completions: Vec<BackPointer>,
    },
    /// A scanned terminal token.
    Scanned {
        tag: String,
        token: String,
    },
}

impl EarleyItem {
    fn new(rule_idx: usize, dot: usize, origin: usize) -> Self {
        Self { rule_idx, dot, origin, completions: Vec::new() }
    }

    fn advanced(&self, bp: BackPointer) -> Self {
        let mut completions = self.completions.clone();
        completions.push(bp);
        Self {
            rule_idx: self.rule_idx,
            dot: self.dot + 1,
            origin: self.origin,
            completions,
        }
    }

    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.rules[self.rule_idx].rhs.len()
    }

    fn next_symbol<'a>(&self, grammar: &'a Grammar) -> Option<&'a Symbol> {
        grammar.rules[self.rule_idx].rhs.get(self.dot)
    }

    /// Identity key for deduplication (rule_idx, dot, origin).
    fn key(&self) -> (usize, usize, usize) {
        (self.rule_idx, self.dot, self.origin)
    }
}

type ChartSet = Vec<EarleyItem>;

// ---------------------------------------------------------------------------
// Parse tree (output)
// ---------------------------------------------------------------------------

/// A node in a derivation tree.
///
/// Trees are never mutated once built; combining trees means building a new
/// root over cloned subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    /// An interior node: a non-terminal with children.
    Interior {
        /// The non-terminal name (e.g., "Root", "NounPhrase").
        label: String,
        children: Vec<ParseNode>,
        /// The rule weight that produced this node.
        weight: f64,
    },
    /// A leaf node: a terminal token.
    Leaf {
        /// The POS tag (e.g., "NN", "VBZ", "CC").
        tag: String,
        /// The actual input token.
        token: String,
    },
}

impl ParseNode {
    /// Interior node with the default weight.
    pub fn interior(label: impl Into<String>, children: Vec<ParseNode>) -> Self {
        ParseNode::Interior { label: label.into(), children, weight: 1.0 }
    }

    pub fn leaf(tag: impl Into<String>, token: impl Into<String>) -> Self {
        ParseNode::Leaf { tag: tag.into(), token: token.into() }
    }

    /// The non-terminal name, or the tag for a leaf.
    pub fn label(&self) -> &str {
        match self {
            ParseNode::Interior { label, .. } => label,
            ParseNode::Leaf { tag, .. } => tag,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ParseNode::Leaf { .. })
    }

    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::Interior { children, .. } => children,
            ParseNode::Leaf { .. } => &[],
        }
    }

    /// Labels of the immediate children, in order.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children().iter().map(|c| c.label()).collect()
    }

    /// Compute the total weight of this parse tree.
    pub fn total_weight(&self) -> f64 {
        match self {
            ParseNode::Interior { weight, children, .. } => {
                *weight + children.iter().map(|c| c.total_weight()).sum::<f64>()
            }
            ParseNode::Leaf { .. } => 0.0,
        }
    }

    /// Collect all leaf tokens in order.
    pub fn leaf_tokens(&self) -> Vec<&str> {
        match self {
            ParseNode::Leaf { token, .. } => vec![token.as_str()],
            ParseNode::Interior { children, .. } => {
                children.iter().flat_map(|c| c.leaf_tokens()).collect()
            }
        }
    }

    /// Collect all leaf tags in order.
    pub fn leaf_tags(&self) -> Vec<&str> {
        match self {
            ParseNode::Leaf { tag, .. } => vec![tag.as_str()],
            ParseNode::Interior { children, .. } => {
                children.iter().flat_map(|c| c.leaf_tags()).collect()
            }
        }
    }

    /// Find the first descendant with the given label (pre-order).
    pub fn find(&self, target_label: &str) -> Option<&ParseNode> {
        if self.label() == target_label {
            return Some(self);
        }
        if let ParseNode::Interior { children, .. } = self {
            for child in children {
                if let Some(found) = child.find(target_label) {
                    return Some(found);
                }
            }
        }
        None
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_indent(node: &ParseNode, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
            let pad = "  ".repeat(indent);
            match node {
                ParseNode::Leaf { tag, token } => {
                    writeln!(f, "{}[{}] \"{}\"", pad, tag, token)
                }
                ParseNode::Interior { label, children, .. } => {
                    writeln!(f, "{}({})", pad, label)?;
                    for child in children {
                        fmt_indent(child, f, indent + 1)?;
                    }
                    Ok(())
                }
            }
        }
        fmt_indent(self, f, 0)
    }
}

/// A ranked parse result.
#[derive(Debug, Clone)]
pub struct RankedParse {
    pub tree: ParseNode,
    /// The total weight/score of this parse.
    pub score: f64,
    /// Index of the start rule at the root; the secondary sort key.
    pub rule_index: usize,
}

// ---------------------------------------------------------------------------
// Earley parser
// ---------------------------------------------------------------------------

/// Parse a tag sequence with the given grammar.
/// Returns every derivation of the start symbol spanning the whole input,
/// ranked by score (highest first) and then by start rule index.
///
/// The parser implements the three core Earley operations:
/// - **Predict**: When the dot is before a non-terminal, add items for all
///   rules that produce that non-terminal.
/// - **Scan**: When the dot is before a terminal, advance the dot if the
///   next input token carries that tag.
/// - **Complete**: When the dot reaches the end of a rule, advance the dot
///   in all items that were waiting for this non-terminal.
pub fn parse(grammar: &Grammar, tokens: &[TaggedToken]) -> Vec<RankedParse> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let n = tokens.len();
    let mut chart: Vec<ChartSet> = vec![Vec::new(); n + 1];

    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == grammar.start {
            chart[0].push(EarleyItem::new(idx, 0, 0));
        }
    }

    for i in 0..=n {
        let mut j = 0;
        while j < chart[i].len() {
            let item = chart[i][j].clone();

            if item.is_complete(grammar) {
                complete(grammar, &mut chart, &item, i);
            } else {
                match item.next_symbol(grammar) {
                    Some(Symbol::NonTerminal(nt)) => predict(grammar, &mut chart, nt, i),
                    Some(Symbol::Terminal(tag)) => {
                        if i < n {
                            scan(&mut chart, &item, i, &tokens[i], tag);
                        }
                    }
                    None => {}
                }
            }
            j += 1;
        }
    }

    let mut parses = Vec::new();
    for item in &chart[n] {
        if item.is_complete(grammar)
            && grammar.rules[item.rule_idx].lhs == grammar.start
            && item.origin == 0
        {
            if let Some(tree) = build_tree(grammar, item) {
                let score = tree.total_weight();
                parses.push(RankedParse { tree, score, rule_index: item.rule_idx });
            }
        }
    }

    parses.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.rule_index.cmp(&b.rule_index))
    });

    parses
}

/// The first derivation under the ranking of [`parse`], if any.
pub fn first_parse(grammar: &Grammar, tokens: &[TaggedToken]) -> Option<ParseNode> {
    parse(grammar, tokens).into_iter().next().map(|p| p.tree)
}

// ---------------------------------------------------------------------------
// Earley operations
// ---------------------------------------------------------------------------

fn push_unique(set: &mut ChartSet, item: EarleyItem) {
    let key = item.key();
    if !set.iter().any(|existing| existing.key() == key) {
        set.push(item);
    }
}

/// Predict: for each rule A → ... where A matches the non-terminal after
/// the dot, add A → •... to chart[pos].
fn predict(grammar: &Grammar, chart: &mut [ChartSet], nt: &str, pos: usize) {
    let existing_keys: HashSet<(usize, usize, usize)> =
        chart[pos].iter().map(|item| item.key()).collect();

    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == nt && !existing_keys.contains(&(idx, 0, pos)) {
            chart[pos].push(EarleyItem::new(idx, 0, pos));
        }
    }
}

/// Scan: if the next input token carries the terminal's tag,
/// advance the dot and add the item to chart[pos + 1].
fn scan(chart: &mut [ChartSet], item: &EarleyItem, pos: usize, token: &TaggedToken, tag: &str) {
    if token.tag != tag {
        return;
    }
    let bp = BackPointer::Scanned {
        tag: token.tag.clone(),
        token: token.token.clone(),
    };
    push_unique(&mut chart[pos + 1], item.advanced(bp));
}

/// Complete: when an item B → γ• is complete at position `end`,
/// find all items in chart[item.origin] that have B after their dot,
/// and advance their dot.
fn complete(grammar: &Grammar, chart: &mut [ChartSet], completed_item: &EarleyItem, end: usize) {
    let completed_lhs = &grammar.rules[completed_item.rule_idx].lhs;

    let waiting: Vec<EarleyItem> = chart[completed_item.origin]
        .iter()
        .filter(|item| {
            matches!(item.next_symbol(grammar), Some(Symbol::NonTerminal(nt)) if nt == completed_lhs)
        })
        .cloned()
        .collect();

    for item in waiting {
        let bp = BackPointer::Completed {
            rule_idx: completed_item.rule_idx,
            completions: completed_item.completions.clone(),
        };
        push_unique(&mut chart[end], item.advanced(bp));
    }
}

// ---------------------------------------------------------------------------
// Parse tree construction from back-pointers
// ---------------------------------------------------------------------------

fn build_tree(grammar: &Grammar, item: &EarleyItem) -> Option<ParseNode> {
    let rule = &grammar.rules[item.rule_idx];
    let children = build_children(grammar, &item.completions)?;

    Some(ParseNode::Interior {
        label: rule.lhs.clone(),
        children,
        weight: rule.weight,
    })
}

fn build_children(grammar: &Grammar, completions: &[BackPointer]) -> Option<Vec<ParseNode>> {
    let mut children = Vec::new();
    for bp in completions {
        match bp {
            BackPointer::Scanned { tag, token } => {
                children.push(ParseNode::leaf(tag.clone(), token.clone()));
            }
            BackPointer::Completed { rule_idx, completions: sub_completions } => {
                let rule = &grammar.rules[*rule_idx];
                let sub_children = build_children(grammar, sub_completions)?;
                children.push(ParseNode::Interior {
                    label: rule.lhs.clone(),
                    children: sub_children,
                    weight: rule.weight,
                });
            }
        }
    }
    Some(children)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
