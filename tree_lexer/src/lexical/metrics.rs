//! Counters gathered during a build

use crate::config::runtime::BuilderPreferences;
use crate::tokens::{Operator, Token, TokenClass};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildMetrics {
    pub total_tokens: usize,
    pub containers: usize,
    pub string_literals: usize,
    pub identifiers: usize,
    pub numbers: usize,
    pub keywords: usize,
    pub commas: usize,
    pub operators: usize,
    pub comments: usize,
    pub max_depth: usize,
    pub max_string_length: usize,

    /// Only filled when operator tracking is enabled
    pub operator_usage: BTreeMap<Operator, usize>,
}

impl BuildMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &BuilderPreferences) {
        self.total_tokens += 1;

        if preferences.collect_metrics {
            let counter = match token.class() {
                TokenClass::Container => &mut self.containers,
                TokenClass::String => &mut self.string_literals,
                TokenClass::Identifier => &mut self.identifiers,
                TokenClass::Number => &mut self.numbers,
                TokenClass::Keyword => &mut self.keywords,
                TokenClass::Punctuation => &mut self.commas,
                TokenClass::Operator => &mut self.operators,
            };
            *counter += 1;
        }

        if preferences.track_operator_usage {
            if let Some(op) = token.as_operator() {
                *self.operator_usage.entry(op).or_insert(0) += 1;
            }
        }
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    pub(crate) fn record_string_length(&mut self, length: usize) {
        self.max_string_length = self.max_string_length.max(length);
    }

    pub(crate) fn record_comment(&mut self) {
        self.comments += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences(collect: bool, track: bool) -> BuilderPreferences {
        BuilderPreferences {
            collect_metrics: collect,
            track_operator_usage: track,
            include_position_in_errors: true,
        }
    }

    #[test]
    fn test_record_by_class() {
        let mut metrics = BuildMetrics::default();
        let prefs = preferences(true, false);

        metrics.record_token(&Token::Block, &prefs);
        metrics.record_token(&Token::Comma, &prefs);
        metrics.record_token(&Token::Operator(Operator::Addition), &prefs);

        assert_eq!(metrics.total_tokens, 3);
        assert_eq!(metrics.containers, 1);
        assert_eq!(metrics.commas, 1);
        assert_eq!(metrics.operators, 1);
        assert!(metrics.operator_usage.is_empty());
    }

    #[test]
    fn test_operator_usage_only_when_tracking() {
        let mut metrics = BuildMetrics::default();
        let prefs = preferences(false, true);

        metrics.record_token(&Token::Operator(Operator::Range), &prefs);
        metrics.record_token(&Token::Operator(Operator::Range), &prefs);

        assert_eq!(metrics.operators, 0);
        assert_eq!(metrics.operator_usage.get(&Operator::Range), Some(&2));
    }
}
