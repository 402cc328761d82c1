//! Conversation analytics for the admin dashboard.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

/// Days covered by `daily_stats`.
const DAILY_WINDOW_DAYS: i64 = 30;

/// Days covered by `filtered_daily_stats`.
const FILTERED_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Bot,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDetail {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A finished (or ongoing) widget conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub messages: Vec<MessageDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_rating: Option<u8>,
    pub handed_off_to_human: bool,
    pub lead_generated: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: DateTime<Utc>,
    pub conversations: usize,
    pub leads: usize,
    /// Seconds
    pub avg_response_time: f64,
    pub handoffs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentStat {
    pub intent: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnalytics {
    pub total_conversations: usize,
    pub leads_generated: usize,
    pub human_handoffs: usize,
    /// Seconds
    pub avg_response_time: f64,
    pub daily_stats: Vec<DailyStats>,
    pub intent_stats: Vec<IntentStat>,
    pub filtered_daily_stats: Vec<DailyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationPage {
    pub conversations: Vec<Conversation>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsExport<'a> {
    analytics: ChatAnalytics,
    conversations: &'a [Conversation],
    export_date: DateTime<Utc>,
}

/// In-memory conversation log with dashboard aggregates.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsService {
    conversations: Vec<Conversation>,
}

fn average_response_secs<'a, I>(messages: I) -> f64
where
    I: IntoIterator<Item = &'a MessageDetail>,
{
    let (total, count) = messages
        .into_iter()
        .filter_map(|m| m.response_time_ms)
        .fold((0u64, 0u64), |(total, count), ms| (total + ms, count + 1));
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64 / 1000.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }

    /// Records a conversation. A blank id is replaced by a fresh one.
    pub fn add_conversation(&mut self, mut conversation: Conversation) -> Conversation {
        if conversation.id.trim().is_empty() {
            conversation.id = Uuid::new_v4().to_string();
        }
        debug!(
            id = %conversation.id,
            messages = conversation.messages.len(),
            "Conversation recorded"
        );
        self.conversations.push(conversation.clone());
        conversation
    }

    pub fn conversation(&self, id: &str) -> Result<&Conversation, AppError> {
        self.conversations
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("conversation {}", id)))
    }

    /// One page of conversations; `page` is 1-based and 0 is treated as 1.
    pub fn conversations(&self, page: usize, page_size: usize) -> ConversationPage {
        let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
        let conversations = self
            .conversations
            .iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        ConversationPage {
            conversations,
            total: self.conversations.len(),
        }
    }

    /// Dashboard aggregates as of `now`.
    pub fn analytics(&self, now: DateTime<Utc>) -> ChatAnalytics {
        let today = now.date_naive().and_time(NaiveTime::default()).and_utc();

        let daily_stats: Vec<DailyStats> = (0..DAILY_WINDOW_DAYS)
            .rev()
            .map(|days_ago| self.day_stats(today - Duration::days(days_ago)))
            .collect();

        let cutoff = now - Duration::days(FILTERED_WINDOW_DAYS);
        let filtered_daily_stats = daily_stats
            .iter()
            .filter(|s| s.date >= cutoff)
            .cloned()
            .collect();

        ChatAnalytics {
            total_conversations: self.conversations.len(),
            leads_generated: self.conversations.iter().filter(|c| c.lead_generated).count(),
            human_handoffs: self
                .conversations
                .iter()
                .filter(|c| c.handed_off_to_human)
                .count(),
            avg_response_time: round2(average_response_secs(
                self.conversations.iter().flat_map(|c| &c.messages),
            )),
            daily_stats,
            intent_stats: self.intent_stats(),
            filtered_daily_stats,
        }
    }

    fn day_stats(&self, day_start: DateTime<Utc>) -> DailyStats {
        let day_end = day_start + Duration::days(1);
        let of_day: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.start_time >= day_start && c.start_time < day_end)
            .collect();

        DailyStats {
            date: day_start,
            conversations: of_day.len(),
            leads: of_day.iter().filter(|c| c.lead_generated).count(),
            avg_response_time: round2(average_response_secs(
                of_day.iter().flat_map(|c| &c.messages),
            )),
            handoffs: of_day.iter().filter(|c| c.handed_off_to_human).count(),
        }
    }

    /// User-message intent counts, most frequent first (ties by name).
    fn intent_stats(&self) -> Vec<IntentStat> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for message in self.conversations.iter().flat_map(|c| &c.messages) {
            if message.message_type != MessageType::User {
                continue;
            }
            if let Some(intent) = message.intent.as_deref() {
                *counts.entry(intent).or_insert(0) += 1;
            }
        }

        let total: usize = counts.values().sum();
        let mut stats: Vec<IntentStat> = counts
            .into_iter()
            .map(|(intent, count)| IntentStat {
                intent: intent.to_string(),
                count,
                percentage: round2(count as f64 * 100.0 / total as f64),
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.intent.cmp(&b.intent)));
        stats
    }

    /// Pretty-printed export of aggregates and every conversation.
    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let export = AnalyticsExport {
            analytics: self.analytics(now),
            conversations: &self.conversations,
            export_date: now,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}
