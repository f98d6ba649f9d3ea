//! Single-pass tree builder
//!
//! Scanning and structuring happen in one left-to-right pass with no
//! backtracking. The state is the node currently being filled, a return
//! stack for leaving string literals, and the pending character sequence.
//! Containers are left through their parent link; a string literal is not a
//! container, so entering one pushes the enclosing node on the stack.

use super::error::BuildError;
use super::metrics::BuildMetrics;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::BuilderPreferences;
use crate::logging::codes;
use crate::tokens::{NodeId, Operator, Token, TokenTree};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

pub struct TreeBuilder {
    metrics: BuildMetrics,
    preferences: BuilderPreferences,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_preferences(BuilderPreferences::default())
    }

    pub fn with_preferences(preferences: BuilderPreferences) -> Self {
        Self {
            metrics: BuildMetrics::default(),
            preferences,
        }
    }

    /// Build the token tree for `source`. Metrics from the previous build
    /// are discarded.
    pub fn build(&mut self, source: &str) -> Result<TokenTree, BuildError> {
        self.metrics = BuildMetrics::default();

        log_debug!("Starting tree build",
            "source_bytes" => source.len(),
            "max_tokens" => MAX_TOKEN_COUNT,
            "max_depth" => MAX_NESTING_DEPTH
        );

        let result = if source.len() > MAX_SOURCE_SIZE {
            Err(BuildError::SourceTooLarge { size: source.len() })
        } else {
            Scan::new(&mut self.metrics, &self.preferences).run(source)
        };

        match &result {
            Ok(tree) => {
                log_success!(codes::success::TREE_BUILD_COMPLETE,
                    "Token tree built",
                    "nodes" => tree.len(),
                    "max_depth" => self.metrics.max_depth,
                    "identifiers" => self.metrics.identifiers,
                    "operators" => self.metrics.operators,
                    "comments" => self.metrics.comments
                );
            }
            Err(error) => self.log_failure(error),
        }

        result
    }

    fn log_failure(&self, error: &BuildError) {
        let message = match error.position() {
            Some(at) if self.preferences.include_position_in_errors => format!(
                "Tree build failed at line {}, column {}: {}",
                at.line, at.column, error
            ),
            _ => format!("Tree build failed: {}", error),
        };

        match error.span() {
            Some(span) => log_error!(error.error_code(), &message,
                span = span,
                "tokens_processed" => self.metrics.total_tokens
            ),
            None => log_error!(error.error_code(), &message,
                "tokens_processed" => self.metrics.total_tokens
            ),
        }
    }

    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &BuilderPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: BuilderPreferences) {
        self.preferences = preferences;
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state for one pass over a source text
struct Scan<'m> {
    tree: TokenTree,
    current: NodeId,
    stack: Vec<NodeId>,
    sequence: String,
    sequence_start: Position,
    sequence_end: Position,
    metrics: &'m mut BuildMetrics,
    preferences: &'m BuilderPreferences,
}

impl<'m> Scan<'m> {
    fn new(metrics: &'m mut BuildMetrics, preferences: &'m BuilderPreferences) -> Self {
        Self {
            tree: TokenTree::with_root(Span::new(Position::start(), Position::start())),
            current: NodeId::ROOT,
            stack: Vec::new(),
            sequence: String::new(),
            sequence_start: Position::start(),
            sequence_end: Position::start(),
            metrics,
            preferences,
        }
    }

    fn run(mut self, source: &str) -> Result<TokenTree, BuildError> {
        let mut chars = source.char_indices();
        let mut pos = Position::start();
        let mut in_comment = false;

        while let Some((offset, ch)) = chars.next() {
            let here = pos;
            let next = here.advance(ch);
            pos = next;

            if in_comment {
                if ch == '\n' || ch == '\r' {
                    in_comment = false;
                } else {
                    continue;
                }
            }

            let in_string = self.in_string();

            if !in_string {
                if let Some((op, len)) = Operator::match_prefix(&source[offset..]) {
                    // Symbols are ASCII, one char per byte
                    for _ in 1..len {
                        chars.next();
                    }
                    pos = here.advance_str(&source[offset..offset + len]);

                    self.end_sequence()?;
                    self.add_leaf(Token::Operator(op), Span::new(here, pos))?;
                    continue;
                }
            }

            match ch {
                '#' if !in_string => {
                    in_comment = true;
                    self.metrics.record_comment();
                }
                '=' if !in_string && self.current_token() != &Token::Parentheses => {
                    self.end_sequence()?;
                    self.nest(Token::Assignment, here, next)?;
                }
                ',' if !in_string => {
                    self.end_sequence()?;
                    self.add_leaf(Token::Comma, Span::new(here, next))?;
                }
                '(' if !in_string => {
                    self.end_sequence()?;
                    self.nest(Token::Parentheses, here, next)?;
                }
                ')' if !in_string => {
                    self.end_sequence()?;
                    if self.current_token() != &Token::Parentheses {
                        return Err(BuildError::UnmatchedClosingParenthesis { position: here });
                    }
                    self.go_up(here, next)?;
                }
                '[' if !in_string => {
                    self.end_sequence()?;
                    self.nest(Token::Block, here, next)?;
                }
                ']' if !in_string => {
                    self.end_sequence()?;
                    self.close_assignment(here)?;
                    if self.current_token() != &Token::Block {
                        return Err(BuildError::TooManyClosingBraces { position: here });
                    }
                    self.go_up(here, next)?;
                }
                '"' if in_string => self.finish_string(here, next)?,
                '"' => {
                    self.end_sequence()?;
                    self.nest(Token::StringLiteral(String::new()), here, next)?;
                }
                c if c.is_whitespace() && !in_string => {
                    self.end_sequence()?;
                    if c == '\n' || c == '\r' {
                        self.close_assignment(here)?;
                    }
                }
                _ => self.append(ch, here, next),
            }
        }

        self.end_sequence()?;
        self.close_assignment(pos)?;

        if self.current != NodeId::ROOT {
            let open = &self.tree[self.current];
            return Err(BuildError::Unclosed {
                kind: open.token.kind_name(),
                opened_at: open.span.start,
            });
        }

        self.tree.node_mut(NodeId::ROOT).span = Span::new(Position::start(), pos);
        Ok(self.tree)
    }

    fn current_token(&self) -> &Token {
        self.tree.token(self.current)
    }

    fn in_string(&self) -> bool {
        self.current_token().is_string_literal()
    }

    fn append(&mut self, ch: char, here: Position, next: Position) {
        if self.sequence.is_empty() {
            self.sequence_start = here;
        }
        self.sequence.push(ch);
        self.sequence_end = next;
    }

    /// Classify and emit the pending sequence. Outside a container the
    /// sequence is dropped.
    fn end_sequence(&mut self) -> Result<(), BuildError> {
        let sequence = std::mem::take(&mut self.sequence);
        if !self.current_token().is_container() {
            return Ok(());
        }

        let Some(token) = Token::from_sequence(&sequence) else {
            return Ok(());
        };

        if let Token::Identifier(name) = &token {
            let length = name.chars().count();
            if length > MAX_IDENTIFIER_LENGTH {
                return Err(BuildError::IdentifierTooLong {
                    length,
                    position: self.sequence_start,
                });
            }
        }

        let span = Span::new(self.sequence_start, self.sequence_end);
        self.add_leaf(token, span)
    }

    fn check_token_limit(&self, position: Position) -> Result<(), BuildError> {
        // The root is not counted
        if self.tree.len() > MAX_TOKEN_COUNT {
            return Err(BuildError::TooManyTokens { position });
        }
        Ok(())
    }

    fn add_leaf(&mut self, token: Token, span: Span) -> Result<(), BuildError> {
        self.check_token_limit(span.start)?;
        self.metrics.record_token(&token, self.preferences);
        self.tree.push_child(self.current, token, span);
        Ok(())
    }

    /// Open `token` as the new current node
    fn nest(&mut self, token: Token, here: Position, next: Position) -> Result<(), BuildError> {
        if !self.current_token().is_container() {
            return Err(BuildError::NestOutsideContainer { position: here });
        }
        self.check_token_limit(here)?;

        let depth = self.tree.depth(self.current) + 1;
        if depth > MAX_NESTING_DEPTH {
            return Err(BuildError::NestingTooDeep {
                depth,
                position: here,
            });
        }
        self.metrics.record_depth(depth);
        self.metrics.record_token(&token, self.preferences);

        let enters_container = token.is_container();
        let id = self.tree.push_child(self.current, token, Span::new(here, next));
        if !enters_container {
            self.stack.push(self.current);
        }
        self.current = id;
        Ok(())
    }

    /// Leave the current node, closing its span at `end`
    fn go_up(&mut self, here: Position, end: Position) -> Result<(), BuildError> {
        let leaving = self.current;

        let target = if self.current_token().is_container() {
            self.tree.parent(leaving)
        } else {
            self.stack.pop()
        };
        let Some(target) = target else {
            return Err(BuildError::MismatchedBraces { position: here });
        };

        let node = self.tree.node_mut(leaving);
        node.span = Span::new(node.span.start, end);
        self.current = target;
        Ok(())
    }

    /// Close one open assignment at the current level
    fn close_assignment(&mut self, at: Position) -> Result<(), BuildError> {
        if self.current_token() == &Token::Assignment {
            self.go_up(at, at)?;
        }
        Ok(())
    }

    /// Closing quote: the raw sequence becomes the literal's value
    fn finish_string(&mut self, here: Position, next: Position) -> Result<(), BuildError> {
        let value = std::mem::take(&mut self.sequence);
        let size = value.len();
        if size > MAX_STRING_SIZE {
            let opened_at = self.tree[self.current].span.start;
            return Err(BuildError::StringTooLarge {
                size,
                position: opened_at,
            });
        }

        self.metrics.record_string_length(size);
        self.tree.node_mut(self.current).token = Token::StringLiteral(value);
        self.go_up(here, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Keyword, TreeShape};
    use assert_matches::assert_matches;

    fn build(source: &str) -> Result<TokenTree, BuildError> {
        TreeBuilder::new().build(source)
    }

    fn root_tokens(tree: &TokenTree) -> Vec<Token> {
        tree.child_tokens(tree.root()).cloned().collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    fn leaf(token: Token) -> TreeShape {
        TreeShape {
            token,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_empty_source() {
        let tree = build("").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.token(tree.root()), &Token::Block);
    }

    #[test]
    fn test_longest_operator_match() {
        let tree = build("a >= b").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![
                ident("a"),
                Token::Operator(Operator::GreaterEqual),
                ident("b")
            ]
        );
    }

    #[test]
    fn test_operator_splits_sequence_without_spaces() {
        let tree = build("1..10").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![
                Token::NumberLiteral(1.0),
                Token::Operator(Operator::Range),
                Token::NumberLiteral(10.0)
            ]
        );
    }

    #[test]
    fn test_number_and_identifier() {
        let tree = build("42 42abc 3.5").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![
                Token::NumberLiteral(42.0),
                ident("42abc"),
                Token::NumberLiteral(3.5)
            ]
        );
    }

    #[test]
    fn test_keywords_and_word_operators() {
        let tree = build("if not done and ready").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![
                Token::Keyword(Keyword::If),
                Token::Operator(Operator::Not),
                ident("done"),
                Token::Operator(Operator::And),
                ident("ready"),
            ]
        );
    }

    #[test]
    fn test_comment_is_skipped() {
        let tree = build("x = 1 # comment\ny = 2").unwrap();
        let expected = vec![
            leaf(ident("x")),
            TreeShape {
                token: Token::Assignment,
                children: vec![leaf(Token::NumberLiteral(1.0))],
            },
            leaf(ident("y")),
            TreeShape {
                token: Token::Assignment,
                children: vec![leaf(Token::NumberLiteral(2.0))],
            },
        ];
        assert_eq!(tree.structure().children, expected);
    }

    #[test]
    fn test_comment_does_not_flush_until_line_end() {
        let tree = build("abc#tail\nxyz").unwrap();
        assert_eq!(root_tokens(&tree), vec![ident("abc"), ident("xyz")]);
        assert_eq!(tree[tree.children(tree.root())[0]].span.end.offset, 3);
    }

    #[test]
    fn test_comment_operators_ignored() {
        let tree = build("# a == (b\n").unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_string_suppresses_structure() {
        let tree = build("\"a ( b\"").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![Token::StringLiteral("a ( b".to_string())]
        );
    }

    #[test]
    fn test_string_keeps_comment_and_operators() {
        let tree = build("s = \"x # y == ]\"").unwrap();
        let assignment = tree.children(tree.root())[1];
        assert_eq!(
            tree.child_tokens(assignment).cloned().collect::<Vec<_>>(),
            vec![Token::StringLiteral("x # y == ]".to_string())]
        );
    }

    #[test]
    fn test_string_flushes_pending_sequence() {
        let tree = build("ab\"cd\"").unwrap();
        assert_eq!(
            root_tokens(&tree),
            vec![ident("ab"), Token::StringLiteral("cd".to_string())]
        );
    }

    #[test]
    fn test_empty_string_literal() {
        let tree = build("\"\"").unwrap();
        assert_eq!(root_tokens(&tree), vec![Token::StringLiteral(String::new())]);
    }

    #[test]
    fn test_assignment_target_is_previous_sibling() {
        let tree = build("total = a + 1\n").unwrap();
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 2);
        assert_eq!(tree.token(children[0]), &ident("total"));
        assert_eq!(
            tree.child_tokens(children[1]).cloned().collect::<Vec<_>>(),
            vec![
                ident("a"),
                Token::Operator(Operator::Addition),
                Token::NumberLiteral(1.0)
            ]
        );
    }

    #[test]
    fn test_equals_inside_parentheses_is_sequence() {
        let tree = build("(a = b)").unwrap();
        let parens = tree.children(tree.root())[0];
        assert_eq!(
            tree.child_tokens(parens).cloned().collect::<Vec<_>>(),
            vec![ident("a"), ident("="), ident("b")]
        );
    }

    #[test]
    fn test_assignment_survives_parentheses_and_commas() {
        let tree = build("f = (1, 2), 3").unwrap();
        let assignment = tree.children(tree.root())[1];
        let tokens: Vec<&str> = tree
            .child_tokens(assignment)
            .map(Token::kind_name)
            .collect();
        assert_eq!(
            tokens,
            vec!["Parentheses", "Comma", "NumberLiteral"]
        );
    }

    #[test]
    fn test_closing_bracket_closes_one_assignment() {
        let tree = build("[x = 1]").unwrap();
        let block = tree.children(tree.root())[0];
        assert_eq!(
            tree.child_tokens(block).map(Token::kind_name).collect::<Vec<_>>(),
            vec!["Identifier", "Assignment"]
        );
    }

    #[test]
    fn test_chained_assignment_needs_two_line_ends() {
        assert!(build("a = b = c\n").is_ok());
        assert_matches!(
            build("a = b = c"),
            Err(BuildError::Unclosed { kind: "Assignment", .. })
        );
    }

    #[test]
    fn test_crlf_closes_assignment() {
        let tree = build("a = 1\r\nb").unwrap();
        assert_eq!(
            root_tokens(&tree)
                .iter()
                .map(Token::kind_name)
                .collect::<Vec<_>>(),
            vec!["Identifier", "Assignment", "Identifier"]
        );
    }

    #[test]
    fn test_unclosed_block() {
        assert_matches!(
            build("[1, 2"),
            Err(BuildError::Unclosed { kind: "Block", opened_at }) if opened_at.offset == 0
        );
    }

    #[test]
    fn test_unclosed_string() {
        assert_matches!(
            build("x \"abc"),
            Err(BuildError::Unclosed { kind: "StringLiteral", .. })
        );
    }

    #[test]
    fn test_unmatched_closing_parenthesis() {
        assert_matches!(
            build(")"),
            Err(BuildError::UnmatchedClosingParenthesis { position }) if position.column == 1
        );
        assert_matches!(
            build("[ ) ]"),
            Err(BuildError::UnmatchedClosingParenthesis { .. })
        );
    }

    #[test]
    fn test_closing_bracket_at_root_is_mismatched() {
        assert_matches!(build("]"), Err(BuildError::MismatchedBraces { .. }));
    }

    #[test]
    fn test_closing_bracket_inside_parentheses() {
        assert_matches!(
            build("( ]"),
            Err(BuildError::TooManyClosingBraces { position }) if position.offset == 2
        );
    }

    #[test]
    fn test_idempotent_builds() {
        let source = "def f = [ if (a >= 1) [ x = \"y\" ] ]\nz = 1..3 # done\n";
        let first = build(source).unwrap();
        let second = build(source).unwrap();
        assert_eq!(first.structure(), second.structure());
    }

    #[test]
    fn test_spans_cover_source() {
        let source = "x = (a)";
        let tree = build(source).unwrap();
        let assignment = tree.children(tree.root())[1];
        let parens = tree.children(assignment)[0];

        assert_eq!(tree[parens].span.slice(source), Some("(a)"));
        assert_eq!(tree[tree.root()].span.len(), source.len());
        assert_eq!(tree[assignment].span.start.column, 3);
    }

    #[test]
    fn test_unicode_identifiers() {
        let tree = build("café = \"ü\"").unwrap();
        assert_eq!(root_tokens(&tree)[0], ident("café"));
        assert_eq!(tree[tree.children(tree.root())[0]].span.end.column, 5);
    }

    #[test]
    fn test_nesting_limit() {
        let source = "[".repeat(MAX_NESTING_DEPTH + 1);
        assert_matches!(
            build(&source),
            Err(BuildError::NestingTooDeep { depth, .. }) if depth == MAX_NESTING_DEPTH + 1
        );
    }

    #[test]
    fn test_identifier_limit() {
        let source = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_matches!(
            build(&source),
            Err(BuildError::IdentifierTooLong { .. })
        );
    }

    #[test]
    fn test_string_size_limit() {
        let at_limit = format!("\"{}\"", "s".repeat(MAX_STRING_SIZE));
        assert!(build(&at_limit).is_ok());

        let over = format!("\"{}\"", "s".repeat(MAX_STRING_SIZE + 1));
        assert_matches!(
            build(&over),
            Err(BuildError::StringTooLarge { size, position }) if size == MAX_STRING_SIZE + 1 && position.offset == 0
        );
    }

    #[test]
    fn test_token_count_limit() {
        let at_limit = ",".repeat(MAX_TOKEN_COUNT);
        assert_eq!(build(&at_limit).unwrap().len(), MAX_TOKEN_COUNT + 1);

        let over = ",".repeat(MAX_TOKEN_COUNT + 1);
        assert_matches!(
            build(&over),
            Err(BuildError::TooManyTokens { position }) if position.offset == MAX_TOKEN_COUNT
        );
    }

    #[test]
    fn test_source_size_limit() {
        let source = " ".repeat(MAX_SOURCE_SIZE + 1);
        assert_matches!(
            build(&source),
            Err(BuildError::SourceTooLarge { size }) if size == MAX_SOURCE_SIZE + 1
        );
    }

    #[test]
    fn test_metrics_recorded() {
        let mut builder = TreeBuilder::with_preferences(BuilderPreferences {
            collect_metrics: true,
            track_operator_usage: true,
            include_position_in_errors: true,
        });
        builder.build("a = [b + c + 1] # note").unwrap();

        let metrics = builder.metrics();
        assert_eq!(metrics.identifiers, 3);
        assert_eq!(metrics.numbers, 1);
        assert_eq!(metrics.containers, 2);
        assert_eq!(metrics.comments, 1);
        assert_eq!(metrics.max_depth, 2);
        assert_eq!(metrics.operator_usage.get(&Operator::Addition), Some(&2));
    }
}
