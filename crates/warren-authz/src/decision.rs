//! Allow/deny decisions and their wire rendering.
//!
//! The broker plugin treats any body that does not start with `allow` as a
//! denial, so [`Decision::render`] is the only place the wire text is built.
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Deny,
    /// Allowed, with the broker role tags granted to the principal. Only
    /// user authentication carries tags.
    Allow(BTreeSet<String>),
}

impl Decision {
    pub fn allow() -> Self {
        Decision::Allow(BTreeSet::new())
    }

    pub fn allow_with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Decision::Allow(tags.into_iter().map(Into::into).collect())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn tags(&self) -> Option<&BTreeSet<String>> {
        match self {
            Decision::Allow(tags) => Some(tags),
            Decision::Deny => None,
        }
    }

    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow(_) => "allow",
            Decision::Deny => "deny",
        }
    }

    /// Render as the plugin expects: `deny`, `allow`, or `allow tag1 tag2`.
    pub fn render(&self) -> String {
        match self {
            Decision::Deny => "deny".to_string(),
            Decision::Allow(tags) if tags.is_empty() => "allow".to_string(),
            Decision::Allow(tags) => {
                let mut rendered = String::from("allow");
                for tag in tags {
                    rendered.push(' ');
                    rendered.push_str(tag);
                }
                rendered
            }
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
