//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use chatdeck_core::{ChatBucket, ChatRole};

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_chat_metrics(state, &mut output).await;
    collect_user_metrics(state, &mut output).await;

    output
}

/// Collect chat and message counts.
async fn collect_chat_metrics(state: &Arc<AppState>, output: &mut String) {
    let store = state.store.read().await;

    let mut user_messages = 0u64;
    let mut assistant_messages = 0u64;
    for message in store.chats().iter().flat_map(|chat| &chat.messages) {
        match message.role {
            ChatRole::User => user_messages += 1,
            ChatRole::Assistant => assistant_messages += 1,
        }
    }

    writeln!(output, "# HELP chatdeck_chats_total Number of chats in the store").ok();
    writeln!(output, "# TYPE chatdeck_chats_total gauge").ok();
    writeln!(output, "chatdeck_chats_total {}", store.len()).ok();

    writeln!(output).ok();
    writeln!(output, "# HELP chatdeck_messages_total Number of messages by role").ok();
    writeln!(output, "# TYPE chatdeck_messages_total gauge").ok();
    writeln!(output, "chatdeck_messages_total{{role=\"user\"}} {user_messages}").ok();
    writeln!(
        output,
        "chatdeck_messages_total{{role=\"assistant\"}} {assistant_messages}"
    )
    .ok();

    // Every bucket is reported, including empty ones, so series don't vanish.
    let groups = store.grouped_chats();
    writeln!(output).ok();
    writeln!(output, "# HELP chatdeck_chats_by_recency Number of chats per recency bucket").ok();
    writeln!(output, "# TYPE chatdeck_chats_by_recency gauge").ok();
    for bucket in ChatBucket::all() {
        let count = groups
            .iter()
            .find(|group| group.bucket == *bucket)
            .map_or(0, |group| group.chats.len());
        writeln!(
            output,
            "chatdeck_chats_by_recency{{bucket=\"{}\"}} {count}",
            bucket.label()
        )
        .ok();
    }
}

/// Collect user and session counts.
async fn collect_user_metrics(state: &Arc<AppState>, output: &mut String) {
    let (onboarded, pending) = {
        let users = state.users.read().await;
        let onboarded = users.values().filter(|u| u.onboarding_completed).count();
        (onboarded, users.len() - onboarded)
    };
    let sessions = state.active_session_count().await;

    writeln!(output).ok();
    writeln!(output, "# HELP chatdeck_users_total Number of users by onboarding state").ok();
    writeln!(output, "# TYPE chatdeck_users_total gauge").ok();
    writeln!(output, "chatdeck_users_total{{onboarded=\"true\"}} {onboarded}").ok();
    writeln!(output, "chatdeck_users_total{{onboarded=\"false\"}} {pending}").ok();

    writeln!(output).ok();
    writeln!(output, "# HELP chatdeck_sessions_active Number of unexpired sessions").ok();
    writeln!(output, "# TYPE chatdeck_sessions_active gauge").ok();
    writeln!(output, "chatdeck_sessions_active {sessions}").ok();
}
