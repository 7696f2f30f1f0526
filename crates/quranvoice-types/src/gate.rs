//! Subscription gate roles and decisions

use serde::{Deserialize, Serialize};

/// Membership role reported by the channel lookup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
    /// Role the lookup reported but we do not recognize
    Unknown,
}

impl MemberRole {
    /// Roles that count as "subscribed to the channel"
    pub fn is_subscribed(&self) -> bool {
        matches!(
            self,
            MemberRole::Creator | MemberRole::Administrator | MemberRole::Member
        )
    }
}

/// Outcome of the subscription check for a single gated event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Denied,
}

impl GateDecision {
    /// Map a looked-up role to a decision
    pub fn from_role(role: MemberRole) -> Self {
        if role.is_subscribed() {
            GateDecision::Allowed
        } else {
            GateDecision::Denied
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribed_roles_allowed() {
        for role in [
            MemberRole::Creator,
            MemberRole::Administrator,
            MemberRole::Member,
        ] {
            assert!(role.is_subscribed());
            assert_eq!(GateDecision::from_role(role), GateDecision::Allowed);
        }
    }

    #[test]
    fn test_unsubscribed_roles_denied() {
        for role in [
            MemberRole::Restricted,
            MemberRole::Left,
            MemberRole::Banned,
            MemberRole::Unknown,
        ] {
            assert!(!role.is_subscribed());
            assert_eq!(GateDecision::from_role(role), GateDecision::Denied);
        }
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&MemberRole::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
        let back: MemberRole = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(back, MemberRole::Creator);
    }
}
