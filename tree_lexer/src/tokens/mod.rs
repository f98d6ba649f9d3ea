//! Token model and the tree that holds it
//!
//! The builder in [`crate::lexical`] produces a [`TokenTree`]: an arena of
//! [`Node`]s rooted at a `Block`. Containers (`Block`, `Parentheses`,
//! `Assignment`) own children in source order; every other [`Token`] is a
//! leaf.
//!
//! ## Token Kinds
//!
//! - **Containers**: `[ ]` blocks, `( )` parentheses, and the implicit
//!   assignment opened by `=`
//! - **String literals**: text between `"` delimiters, taken verbatim
//! - **Leaves**: identifiers, numbers, [`Keyword`]s, commas and [`Operator`]s

pub mod keyword;
pub mod operator;
pub mod token;
pub mod tree;

pub use keyword::{is_reserved_keyword, Keyword};
pub use operator::{Operator, SYMBOL_TABLE, WORD_TABLE};
pub use token::{Token, TokenClass};
pub use tree::{Node, NodeId, TokenTree, TreeShape, Walk};
