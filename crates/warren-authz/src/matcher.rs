//! Name globs, AMQP topic matching and routing-key patterns.
//!
//! # Purpose
//! Provides the string matchers that policy rules are evaluated with:
//! - [`wildcard_match`] for name-like fields (`*` matches any run of bytes),
//! - [`topic_match`] for AMQP topic syntax over `.`-delimited tokens,
//! - [`RoutingKeyPattern`] for topic-permission routing-key checks, with
//!   `{username}`, `{vhost}` and `{client_id}` expansion.
//!
//! # Key invariants
//! - Regex routing-key patterns are anchored to the whole routing key.
//! - Variable values are escaped before being spliced into a regex, and are
//!   literal words in topic patterns.
//! - Expansion is single-pass; substituted values are never rescanned.
//! - A pattern that references a variable the request did not supply never
//!   matches.
use crate::{AuthzError, AuthzResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    let (mut p_idx, mut v_idx) = (0usize, 0usize);
    let (mut star_idx, mut match_idx) = (None, 0usize);
    let pattern_bytes = pattern.as_bytes();
    let value_bytes = value.as_bytes();

    while v_idx < value_bytes.len() {
        if p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == b'*' {
            star_idx = Some(p_idx);
            match_idx = v_idx;
            p_idx += 1;
            continue;
        }

        if p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == value_bytes[v_idx] {
            p_idx += 1;
            v_idx += 1;
            continue;
        }

        if let Some(star) = star_idx {
            p_idx = star + 1;
            match_idx += 1;
            v_idx = match_idx;
            continue;
        }

        return false;
    }

    while p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == b'*' {
        p_idx += 1;
    }

    p_idx == pattern_bytes.len()
}

/// Match a routing key against an AMQP topic pattern.
///
/// Both sides are split on `.`. In the pattern, `*` matches exactly one token
/// and `#` matches zero or more tokens; any other token must be equal.
///
/// ```rust
/// use warren_authz::topic_match;
///
/// assert!(topic_match("a.b", "a.b"));
/// assert!(!topic_match("a.b", "b.b"));
/// assert!(topic_match("a.#", "a"));
/// assert!(topic_match("*.orders.#", "eu.orders.created.v1"));
/// ```
pub fn topic_match(pattern: &str, routing_key: &str) -> bool {
    let tokens: Vec<TopicToken<'_>> = pattern.split('.').map(TopicToken::parse).collect();
    topic_tokens_match(&tokens, routing_key)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TopicToken<'a> {
    Word(Cow<'a, str>),
    Star,
    Hash,
}

impl<'a> TopicToken<'a> {
    fn parse(token: &'a str) -> Self {
        match token {
            "*" => Self::Star,
            "#" => Self::Hash,
            word => Self::Word(Cow::Borrowed(word)),
        }
    }

    fn is_hash(&self) -> bool {
        matches!(self, Self::Hash)
    }

    fn matches(&self, word: &str) -> bool {
        match self {
            Self::Word(expected) => expected.as_ref() == word,
            Self::Star => true,
            Self::Hash => false,
        }
    }
}

fn topic_tokens_match(pattern: &[TopicToken<'_>], routing_key: &str) -> bool {
    if let [TopicToken::Hash] = pattern {
        return true;
    }

    let key: Vec<&str> = routing_key.split('.').collect();

    let (mut p_idx, mut k_idx) = (0usize, 0usize);
    let (mut hash_idx, mut match_idx) = (None, 0usize);

    while k_idx < key.len() {
        if p_idx < pattern.len() && pattern[p_idx].is_hash() {
            hash_idx = Some(p_idx);
            match_idx = k_idx;
            p_idx += 1;
            continue;
        }

        if p_idx < pattern.len() && pattern[p_idx].matches(key[k_idx]) {
            p_idx += 1;
            k_idx += 1;
            continue;
        }

        if let Some(hash) = hash_idx {
            p_idx = hash + 1;
            match_idx += 1;
            k_idx = match_idx;
            continue;
        }

        return false;
    }

    while p_idx < pattern.len() && pattern[p_idx].is_hash() {
        p_idx += 1;
    }

    p_idx == pattern.len()
}

/// Split a topic template into tokens, expanding variables.
///
/// Substituted values only ever produce literal words: a username of `#` or
/// `*` is not a wildcard, and a `.` in a value splits into further literal
/// words.
fn expand_topic<'a>(template: &'a str, vars: &Variables<'_>) -> Option<Vec<TopicToken<'a>>> {
    let mut tokens = Vec::new();
    for token in template.split('.') {
        if !has_variables(token) {
            tokens.push(TopicToken::parse(token));
            continue;
        }
        let expanded = vars.expand(token)?;
        tokens.extend(
            expanded
                .split('.')
                .map(|word| TopicToken::Word(Cow::Owned(word.to_string()))),
        );
    }
    Some(tokens)
}

/// Values substituted into `{username}`, `{vhost}` and `{client_id}`.
#[derive(Debug, Clone, Copy)]
pub struct Variables<'a> {
    pub username: &'a str,
    pub vhost: &'a str,
    pub client_id: Option<&'a str>,
}

impl<'a> Variables<'a> {
    pub fn new(username: &'a str, vhost: &'a str, client_id: Option<&'a str>) -> Self {
        Self {
            username,
            vhost,
            client_id,
        }
    }

    /// `Some(None)` for a known variable the request did not supply, `None`
    /// for an unknown name.
    fn lookup(&self, name: &str) -> Option<Option<&'a str>> {
        match name {
            "username" => Some(Some(self.username)),
            "vhost" => Some(Some(self.vhost)),
            "client_id" => Some(self.client_id),
            _ => None,
        }
    }

    /// Expand every known variable in `template`, passing each value through
    /// `escape` first.
    ///
    /// The template is scanned once; substituted text is never rescanned, so
    /// a value containing `{vhost}` stays literal. Unknown `{...}` sequences
    /// are kept as written.
    ///
    /// # Returns
    /// - `None` when the template references `{client_id}` and none was
    ///   supplied.
    pub fn expand_with(&self, template: &str, escape: impl Fn(&str) -> String) -> Option<String> {
        let mut expanded = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let (head, tail) = rest.split_at(start);
            expanded.push_str(head);
            let Some(end) = tail.find('}') else {
                rest = tail;
                break;
            };
            let name = &tail[1..end];
            if name.contains('{') {
                expanded.push('{');
                rest = &tail[1..];
                continue;
            }
            match self.lookup(name) {
                Some(Some(value)) => expanded.push_str(&escape(value)),
                Some(None) => return None,
                None => expanded.push_str(&tail[..=end]),
            }
            rest = &tail[end + 1..];
        }
        expanded.push_str(rest);
        Some(expanded)
    }

    pub fn expand(&self, template: &str) -> Option<String> {
        self.expand_with(template, |value| value.to_string())
    }
}

pub fn has_variables(template: &str) -> bool {
    ["{username}", "{vhost}", "{client_id}"]
        .iter()
        .any(|var| template.contains(var))
}

/// Routing-key pattern as written in a policy document. Exactly one of
/// `topic` or `regex` must be set.
///
/// ```yaml
/// routing_key:
///   topic: "orders.*"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingKeySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl RoutingKeySpec {
    pub fn topic(pattern: impl Into<String>) -> Self {
        Self {
            topic: Some(pattern.into()),
            regex: None,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            topic: None,
            regex: Some(pattern.into()),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.topic.is_some() != self.regex.is_some()
    }
}

/// Compiled routing-key pattern.
///
/// Regexes without variables are compiled once; templated regexes are
/// expanded and compiled per evaluation.
#[derive(Debug, Clone)]
pub enum RoutingKeyPattern {
    Topic(String),
    Regex(Regex),
    RegexTemplate(String),
}

impl RoutingKeyPattern {
    /// Compile a policy-level routing-key spec.
    ///
    /// # Errors
    /// - [`AuthzError::AmbiguousRoutingKey`] unless exactly one of `topic`
    ///   and `regex` is set.
    /// - [`AuthzError::InvalidRoutingKeyPattern`] if the regex (with
    ///   placeholder values substituted for variables) does not compile.
    pub fn compile(spec: &RoutingKeySpec) -> AuthzResult<Self> {
        match (&spec.topic, &spec.regex) {
            (Some(pattern), None) => Ok(Self::Topic(pattern.clone())),
            (None, Some(pattern)) if has_variables(pattern) => {
                // Syntax check only; real values are substituted per request.
                let sample = Variables::new("user", "vhost", Some("client"));
                let expanded = sample
                    .expand_with(pattern, |value| regex::escape(value))
                    .unwrap_or_else(|| pattern.clone());
                anchored(&expanded).map_err(|source| AuthzError::InvalidRoutingKeyPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                Ok(Self::RegexTemplate(pattern.clone()))
            }
            (None, Some(pattern)) => {
                let regex =
                    anchored(pattern).map_err(|source| AuthzError::InvalidRoutingKeyPattern {
                        pattern: pattern.clone(),
                        source,
                    })?;
                Ok(Self::Regex(regex))
            }
            _ => Err(AuthzError::AmbiguousRoutingKey),
        }
    }

    pub fn matches(&self, routing_key: &str, vars: &Variables<'_>) -> bool {
        match self {
            Self::Topic(template) => match expand_topic(template, vars) {
                Some(tokens) => topic_tokens_match(&tokens, routing_key),
                None => false,
            },
            Self::Regex(regex) => regex.is_match(routing_key),
            Self::RegexTemplate(template) => {
                let Some(expanded) = vars.expand_with(template, |value| regex::escape(value))
                else {
                    return false;
                };
                match anchored(&expanded) {
                    Ok(regex) => regex.is_match(routing_key),
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            "expanded routing key pattern did not compile"
                        );
                        false
                    }
                }
            }
        }
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
