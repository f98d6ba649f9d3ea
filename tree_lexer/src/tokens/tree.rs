//! Arena-backed token tree
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. The
//! parent index exists only for upward navigation; ownership is the arena.
use super::token::Token;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The root block is always the first node
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub token: Token,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TokenTree {
    nodes: Vec<Node>,
}

/// Span-free nested view of a tree, for structural comparison and dumps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeShape {
    pub token: Token,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeShape>,
}

impl TokenTree {
    pub(crate) fn with_root(span: Span) -> Self {
        Self {
            nodes: vec![Node {
                token: Token::Block,
                span,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Append `token` as the last child of `parent`
    pub(crate) fn push_child(&mut self, parent: NodeId, token: Token, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            token,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self[id].token
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Tokens of the direct children, in source order
    pub fn child_tokens(&self, id: NodeId) -> impl Iterator<Item = &Token> + '_ {
        self[id].children.iter().map(move |&child| &self[child].token)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Enclosing nodes from the direct parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Block scoping test: `id` is a descendant of `block` when it is that
    /// block, or its chain of directly enclosing blocks reaches it. Any
    /// non-block on the way breaks the chain. The root is never a valid
    /// target.
    pub fn is_descendant_of(&self, id: NodeId, block: NodeId) -> bool {
        let is_block = |node: NodeId| matches!(self.get(node), Some(n) if n.token == Token::Block);

        if !is_block(block) || self.parent(block).is_none() {
            return false;
        }

        let mut current = id;
        loop {
            if !is_block(current) {
                return false;
            }
            if current == block {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Pre-order traversal yielding each node with its depth
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(NodeId::ROOT, 0)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn structure(&self) -> TreeShape {
        self.shape_of(NodeId::ROOT)
    }

    fn shape_of(&self, id: NodeId) -> TreeShape {
        TreeShape {
            token: self[id].token.clone(),
            children: self[id]
                .children
                .iter()
                .map(|&child| self.shape_of(child))
                .collect(),
        }
    }

    /// JSON rendering of [`TokenTree::structure`]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.structure())
    }
}

impl Index<NodeId> for TokenTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

pub struct Walk<'a> {
    tree: &'a TokenTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack.extend(
            self.tree[id]
                .children
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
        Some((id, depth))
    }
}

impl fmt::Display for TokenTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, depth) in self.walk() {
            writeln!(f, "{}{}", "  ".repeat(depth), self[id].token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Operator;
    use crate::utils::Position;

    fn span() -> Span {
        Span::single(Position::start())
    }

    /// [ [ ( [ ] ) ] ]
    fn nested() -> (TokenTree, NodeId, NodeId, NodeId) {
        let mut tree = TokenTree::with_root(span());
        let outer = tree.push_child(NodeId::ROOT, Token::Block, span());
        let parens = tree.push_child(outer, Token::Parentheses, span());
        let inner = tree.push_child(parens, Token::Block, span());
        (tree, outer, parens, inner)
    }

    #[test]
    fn test_push_child_links_both_ways() {
        let (tree, outer, parens, _) = nested();
        assert_eq!(tree.children(NodeId::ROOT), &[outer]);
        assert_eq!(tree.parent(parens), Some(outer));
        assert_eq!(tree.parent(NodeId::ROOT), None);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let (tree, outer, parens, inner) = nested();
        let chain: Vec<NodeId> = tree.ancestors(inner).collect();
        assert_eq!(chain, vec![parens, outer, NodeId::ROOT]);
        assert_eq!(tree.depth(inner), 3);
        assert_eq!(tree.depth(NodeId::ROOT), 0);
    }

    #[test]
    fn test_is_descendant_of_follows_block_chain() {
        let mut tree = TokenTree::with_root(span());
        let outer = tree.push_child(NodeId::ROOT, Token::Block, span());
        let middle = tree.push_child(outer, Token::Block, span());

        assert!(tree.is_descendant_of(middle, outer));
        assert!(tree.is_descendant_of(outer, outer));
        assert!(!tree.is_descendant_of(outer, middle));
    }

    #[test]
    fn test_is_descendant_of_root_is_false() {
        let (tree, outer, _, _) = nested();
        assert!(!tree.is_descendant_of(outer, NodeId::ROOT));
    }

    #[test]
    fn test_is_descendant_of_stops_at_non_block() {
        let (tree, outer, _, inner) = nested();
        assert!(!tree.is_descendant_of(inner, outer));
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = TokenTree::with_root(span());
        let parens = tree.push_child(NodeId::ROOT, Token::Parentheses, span());
        tree.push_child(parens, Token::Identifier("a".into()), span());
        tree.push_child(NodeId::ROOT, Token::Operator(Operator::Addition), span());

        let order: Vec<String> = tree.walk().map(|(id, _)| tree.token(id).to_string()).collect();
        assert_eq!(order, vec!["Block", "Parentheses", "a", "+"]);
        assert_eq!(tree.to_string(), "Block\n  Parentheses\n    a\n  +\n");
    }

    #[test]
    fn test_structure_ignores_spans() {
        let mut a = TokenTree::with_root(span());
        a.push_child(NodeId::ROOT, Token::Comma, span());

        let mut b = TokenTree::with_root(Span::single(Position::new(9, 3, 1)));
        b.push_child(NodeId::ROOT, Token::Comma, Span::single(Position::new(4, 1, 5)));

        assert_eq!(a.structure(), b.structure());
    }

    #[test]
    fn test_json_dump() {
        let mut tree = TokenTree::with_root(span());
        tree.push_child(NodeId::ROOT, Token::NumberLiteral(1.0), span());

        let json: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(json["token"], "Block");
        assert_eq!(json["children"][0]["token"]["NumberLiteral"], 1.0);
    }
}
