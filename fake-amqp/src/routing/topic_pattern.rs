/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Compiled topic binding patterns.
//!
//! `*` matches exactly one non-empty segment and `#` matches zero or more
//! segments. Segments are separated by `.`; everything else is literal and
//! case-sensitive.

use crate::error::BrokerError;
use regex::Regex;

const SEGMENT_SEPARATOR: char = '.';
const SINGLE_SEGMENT_WILDCARD: &str = "*";
const MULTI_SEGMENT_WILDCARD: &str = "#";

/// A binding key compiled into an anchored regular expression.
///
/// The key is matched against `"." + routing_key` so that every segment,
/// including the first, carries its leading separator. A whole-segment `#`
/// then owns its separator and can collapse to zero segments.
#[derive(Clone, Debug)]
pub(crate) struct TopicPattern {
    source: String,
    matcher: Regex,
}

impl TopicPattern {
    pub(crate) fn compile(pattern: &str) -> Result<Self, BrokerError> {
        let mut expression = String::from("^");

        for segment in pattern.split(SEGMENT_SEPARATOR) {
            match segment {
                MULTI_SEGMENT_WILDCARD => expression.push_str(r"(?:\.[^.]*)*"),
                SINGLE_SEGMENT_WILDCARD => expression.push_str(r"\.[^.]+"),
                literal => {
                    expression.push_str(r"\.");
                    expression.push_str(&Self::translate_segment(literal));
                }
            }
        }
        expression.push('$');

        let matcher =
            Regex::new(&expression).map_err(|_| BrokerError::invalid_routing_pattern(pattern))?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// Wildcards embedded inside a longer segment keep their textual meaning.
    fn translate_segment(segment: &str) -> String {
        let mut translated = String::with_capacity(segment.len() * 2);
        let mut literal = [0u8; 4];

        for ch in segment.chars() {
            match ch {
                '*' => translated.push_str("[^.]+"),
                '#' => translated.push_str(".*"),
                other => translated.push_str(&regex::escape(other.encode_utf8(&mut literal))),
            }
        }
        translated
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn is_match(&self, routing_key: &str) -> bool {
        let mut candidate = String::with_capacity(routing_key.len() + 1);
        candidate.push(SEGMENT_SEPARATOR);
        candidate.push_str(routing_key);
        self.matcher.is_match(&candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::TopicPattern;

    fn matches(pattern: &str, routing_key: &str) -> bool {
        TopicPattern::compile(pattern)
            .expect("pattern should compile")
            .is_match(routing_key)
    }

    #[test]
    fn empty_pattern_matches_only_empty_key() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
        assert!(!matches("", "."));
    }

    #[test]
    fn star_requires_a_non_empty_segment() {
        assert!(!matches("*", ""));
        assert!(matches("*", " "));
        assert!(matches("*", "foo"));
        assert!(!matches("*", "foo.bar"));
    }

    #[test]
    fn star_segments_count_exactly() {
        assert!(matches("*.*.foo", "bar.baz.foo"));
        assert!(!matches("*.*.foo", "bar.foo"));
        assert!(!matches("*.foo", "bar.baz.foo"));
        assert!(matches("*.foo.baz.*", "bar.foo.baz.bar"));
        assert!(!matches("*.foo.*", "bar.baz.foo.bar"));
    }

    #[test]
    fn hash_matches_zero_or_more_segments() {
        assert!(matches("#.foo", "baz.bar.foo"));
        assert!(matches("#.foo", "foo"));
        assert!(!matches("#.foo", "bar.baz.foo.bat"));
        assert!(matches("#.foo.*.baz.#", "baz.bar.foo.jaz.baz.bar.bar"));
        assert!(matches("*.*.#", "foo.bar"));
        assert!(!matches("*.*.#", "foo"));
        assert!(matches("*.#", "foo"));
        assert!(matches("#", ""));
        assert!(matches("#", "a.b.c"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(matches("a+b.(c)", "a+b.(c)"));
        assert!(!matches("a+b", "aab"));
        assert!(!matches("a.b", "axb"));
        assert!(matches("price.$", "price.$"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(matches("routingKey1", "routingKey1"));
        assert!(!matches("routingKey1", "routingkey1"));
    }

    #[test]
    fn source_is_preserved() {
        let pattern = TopicPattern::compile("orders.#").expect("pattern should compile");

        assert_eq!(pattern.source(), "orders.#");
    }
}
