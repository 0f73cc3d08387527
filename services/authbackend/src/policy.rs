//! Policy loading.
//!
//! Reads a policy YAML file (or the built-in default), compiles it, and logs
//! what was loaded. The compiled policy is immutable for the process lifetime.
use anyhow::{Context, Result};
use std::path::Path;
use warren_authz::{PolicyDocument, StaticPolicy};

pub const DEFAULT_POLICY_YAML: &str = include_str!("../config/default_policy.yaml");

pub fn load_policy(path: Option<&Path>) -> Result<StaticPolicy> {
    let (source, contents) = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("read policy file: {}", path.display()))?;
            (path.display().to_string(), contents)
        }
        None => ("built-in".to_string(), DEFAULT_POLICY_YAML.to_string()),
    };
    let policy = parse_policy(&contents).with_context(|| format!("load policy from {source}"))?;
    let summary = policy.summary();
    tracing::info!(
        %source,
        users = summary.users,
        vhosts = summary.vhosts,
        resources = summary.resources,
        topics = summary.topics,
        "policy loaded"
    );
    Ok(policy)
}

pub fn parse_policy(contents: &str) -> Result<StaticPolicy> {
    let document: PolicyDocument =
        serde_yaml::from_str(contents).with_context(|| "parse policy yaml")?;
    StaticPolicy::compile(document).with_context(|| "compile policy")
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_authz::{
        Decision, Permission, PolicyEvaluator, ResourceKind, ResourcePermissionRequest,
        TopicPermissionRequest, UserAuthRequest, VhostAccessRequest,
    };

    #[test]
    fn default_policy_matches_reference_behaviour() {
        let policy = load_policy(None).expect("default policy");
        assert_eq!(
            policy
                .authenticate_user(&UserAuthRequest::new("Zq81", "Zq81"))
                .render(),
            "allow administrator management"
        );
        assert_eq!(
            policy.authenticate_user(&UserAuthRequest::new("guest", "guest")),
            Decision::Deny
        );
        assert_eq!(
            policy.check_vhost(&VhostAccessRequest::new("Zq81", "guest")),
            Decision::allow()
        );
        assert_eq!(
            policy.check_vhost(&VhostAccessRequest::new("guest", "guest")),
            Decision::Deny
        );

        let resource = ResourcePermissionRequest::new(
            "Zq81",
            "guest",
            ResourceKind::Exchange,
            "amq.topic",
            Permission::Write,
        );
        assert_eq!(policy.check_resource(&resource), Decision::allow());
        assert_eq!(
            policy.check_topic(&TopicPermissionRequest::new(resource.clone(), "a.b")),
            Decision::allow()
        );
        assert_eq!(
            policy.check_topic(&TopicPermissionRequest::new(resource, "b.b")),
            Decision::Deny
        );
    }

    #[test]
    fn load_policy_from_file() {
        let path = std::env::temp_dir().join(format!("warren-policy-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            "users:\n  - username: svc\n    password: pw\n    tags: [monitoring]\n",
        )
        .expect("write policy");
        let policy = load_policy(Some(&path)).expect("policy");
        assert_eq!(
            policy.authenticate_user(&UserAuthRequest::new("svc", "pw")).render(),
            "allow monitoring"
        );
        assert_eq!(
            policy.check_vhost(&VhostAccessRequest::new("svc", "/")),
            Decision::Deny
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_policy_missing_file_errors() {
        let err = load_policy(Some(Path::new("/nonexistent/warren/policy.yaml")))
            .expect_err("missing file");
        assert!(err.to_string().contains("read policy file"));
    }

    #[test]
    fn parse_policy_reports_invalid_rules() {
        let err = parse_policy("users:\n  - username: \"*\"\n").expect_err("no password");
        let chain = format!("{err:#}");
        assert!(chain.contains("compile policy"));
        assert!(chain.contains("allow rules require a password"));
    }
}
