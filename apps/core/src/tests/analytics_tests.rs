//! Analytics Tests
//!
//! Aggregates over a fixed "now" so day windows are deterministic.

use crate::analytics::{AnalyticsService, Conversation, MessageDetail, MessageType};
use crate::error::AppError;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
}

fn detail(
    kind: MessageType,
    at: DateTime<Utc>,
    intent: Option<&str>,
    ms: Option<u64>,
) -> MessageDetail {
    MessageDetail {
        id: format!("{}-{:?}", at.timestamp_millis(), kind),
        timestamp: at,
        content: "text".to_string(),
        message_type: kind,
        intent: intent.map(str::to_string),
        response_time_ms: ms,
    }
}

/// A user/bot exchange starting `days_ago` days before `now()`.
fn conversation(
    days_ago: i64,
    intent: &str,
    response_ms: u64,
    lead: bool,
    handoff: bool,
) -> Conversation {
    let start = now() - Duration::days(days_ago) - Duration::hours(1);
    Conversation {
        id: String::new(),
        start_time: start,
        end_time: start + Duration::minutes(5),
        messages: vec![
            detail(MessageType::User, start, Some(intent), None),
            detail(MessageType::Bot, start, Some(intent), Some(response_ms)),
        ],
        user_details: None,
        conversation_rating: None,
        handed_off_to_human: handoff,
        lead_generated: lead,
        tags: vec![],
    }
}

fn seeded() -> AnalyticsService {
    let mut service = AnalyticsService::new();
    service.add_conversation(conversation(0, "pricing", 1000, true, false));
    service.add_conversation(conversation(0, "pricing", 2000, false, true));
    service.add_conversation(conversation(3, "greeting", 3000, true, false));
    service.add_conversation(conversation(20, "support", 1500, false, false));
    service.add_conversation(conversation(45, "pricing", 500, false, false));
    service
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;

    #[test]
    fn test_totals() {
        let analytics = seeded().analytics(now());

        assert_eq!(analytics.total_conversations, 5);
        assert_eq!(analytics.leads_generated, 2);
        assert_eq!(analytics.human_handoffs, 1);
        // (1000 + 2000 + 3000 + 1500 + 500) / 5 ms
        assert_eq!(analytics.avg_response_time, 1.6);
    }

    #[test]
    fn test_daily_windows() {
        let analytics = seeded().analytics(now());

        assert_eq!(analytics.daily_stats.len(), 30);
        let today = &analytics.daily_stats[29];
        assert_eq!(today.date, Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap());
        assert_eq!(today.conversations, 2);
        assert_eq!(today.leads, 1);
        assert_eq!(today.handoffs, 1);
        assert_eq!(today.avg_response_time, 1.5);

        let counted: usize = analytics.daily_stats.iter().map(|d| d.conversations).sum();
        assert_eq!(counted, 4, "The 45-day-old conversation is outside the window");

        let filtered = &analytics.filtered_daily_stats;
        assert_eq!(filtered.len(), 7);
        assert_eq!(filtered[0].date, Utc.with_ymd_and_hms(2024, 5, 9, 0, 0, 0).unwrap());
        for pair in filtered.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(filtered.iter().map(|d| d.conversations).sum::<usize>(), 3);
    }

    #[test]
    fn test_intent_stats_count_user_messages_only() {
        let analytics = seeded().analytics(now());

        let stats: Vec<(&str, usize, f64)> = analytics
            .intent_stats
            .iter()
            .map(|s| (s.intent.as_str(), s.count, s.percentage))
            .collect();
        assert_eq!(
            stats,
            vec![("pricing", 3, 60.0), ("greeting", 1, 20.0), ("support", 1, 20.0)]
        );
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn test_add_conversation_assigns_id() {
        let mut service = AnalyticsService::new();
        let added = service.add_conversation(conversation(0, "greeting", 100, false, false));

        assert!(!added.id.is_empty());
        assert_eq!(service.conversation(&added.id).unwrap(), &added);
        assert!(matches!(
            service.conversation("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_pagination() {
        let service = seeded();

        let first = service.conversations(1, 2);
        assert_eq!(first.total, 5);
        assert_eq!(first.conversations.len(), 2);

        let last = service.conversations(3, 2);
        assert_eq!(last.conversations.len(), 1);
        assert_eq!(
            last.conversations[0].start_time,
            now() - Duration::days(45) - Duration::hours(1)
        );

        assert!(service.conversations(4, 2).conversations.is_empty());
        assert_eq!(service.conversations(0, 2).conversations, first.conversations);
    }

    #[test]
    fn test_export_contains_aggregates_and_conversations() {
        let json = seeded().export_json(now()).expect("Failed to export");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["analytics"]["totalConversations"], 5);
        assert_eq!(value["conversations"].as_array().map(Vec::len), Some(5));
        assert!(value["exportDate"].is_string());
        assert_eq!(value["conversations"][0]["messages"][0]["type"], "user");
    }
}
