//! Subscription gate
//!
//! Every user-visible operation runs through `check` first. The check
//! is recomputed per event; nothing about it is cached.

use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, Recipient, UserId};
use tracing::warn;

use quranvoice_types::{GateDecision, MemberRole};

/// Wraps the channel membership lookup with the fixed allow-list of
/// subscriber roles.
#[derive(Clone)]
pub struct SubscriptionGate {
    bot: Bot,
    channel: String,
}

impl SubscriptionGate {
    /// Create a gate for the given channel ("@username" form)
    pub fn new(bot: Bot, channel: impl Into<String>) -> Self {
        Self {
            bot,
            channel: channel.into(),
        }
    }

    /// Decide whether `user_id` may proceed.
    ///
    /// Any lookup failure is treated as Denied (fail-closed) and logged;
    /// this never raises past its boundary.
    pub async fn check(&self, user_id: UserId) -> GateDecision {
        let recipient = Recipient::ChannelUsername(self.channel.clone());
        match self.bot.get_chat_member(recipient, user_id).await {
            Ok(member) => GateDecision::from_role(convert_status(member.status())),
            Err(e) => {
                warn!(
                    "Subscription lookup failed for user {} in {}: {}",
                    user_id, self.channel, e
                );
                GateDecision::Denied
            }
        }
    }
}

fn convert_status(status: ChatMemberStatus) -> MemberRole {
    match status {
        ChatMemberStatus::Owner => MemberRole::Creator,
        ChatMemberStatus::Administrator => MemberRole::Administrator,
        ChatMemberStatus::Member => MemberRole::Member,
        ChatMemberStatus::Restricted => MemberRole::Restricted,
        ChatMemberStatus::Left => MemberRole::Left,
        ChatMemberStatus::Banned => MemberRole::Banned,
    }
}
