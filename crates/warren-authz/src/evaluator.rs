use crate::{
    AuthRequest, Decision, ResourcePermissionRequest, TopicPermissionRequest, UserAuthRequest,
    VhostAccessRequest,
};

/// The four decisions the broker plugin asks for.
///
/// Implementations must be pure: a decision depends only on the request and
/// the evaluator's own (immutable) policy, and never fails. Anything that
/// cannot be decided is a [`Decision::Deny`].
pub trait PolicyEvaluator: Send + Sync {
    fn authenticate_user(&self, request: &UserAuthRequest) -> Decision;

    fn check_vhost(&self, request: &VhostAccessRequest) -> Decision;

    fn check_resource(&self, request: &ResourcePermissionRequest) -> Decision;

    fn check_topic(&self, request: &TopicPermissionRequest) -> Decision;

    fn decide(&self, request: &AuthRequest) -> Decision {
        match request {
            AuthRequest::User(request) => self.authenticate_user(request),
            AuthRequest::Vhost(request) => self.check_vhost(request),
            AuthRequest::Resource(request) => self.check_resource(request),
            AuthRequest::Topic(request) => self.check_topic(request),
        }
    }
}
