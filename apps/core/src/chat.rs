//! Chat session service behind the embeddable widget.
//!
//! Wraps the NLP engine with what the widget needs around it: persisted
//! history, contact capture, human handoff and the artificial reply delay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::analytics::{Conversation, MessageDetail, MessageType, UserDetails};
use crate::config::{ChatbotConfig, LeadCaptureTrigger};
use crate::error::AppError;
use crate::nlp::intent::DEFAULT_INTENT;
use crate::nlp::NlpEngine;
use crate::settings::ChatSettings;
use crate::store::{load_json_or_warn, save_json, KeyValueStore};

/// Storage key of the persisted history.
pub const CHAT_HISTORY_KEY: &str = "connectai_chat_history";

/// Storage key of the captured contact details.
pub const USER_INFO_KEY: &str = "connectai_user_info";

/// Intent that triggers the contact form under [`LeadCaptureTrigger::Intent`].
const LEAD_INTENT: &str = "lead_generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Error,
}

/// A chat message as stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    /// Top intent, set on user messages once analyzed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Time to produce a bot reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            status: None,
            intent: None,
            response_time_ms: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            status: Some(MessageStatus::Sent),
            ..Self::new(Role::User, content)
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }
}

/// Contact details captured by the lead form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserInfo {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Per-visitor session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: String,
    pub user_info: Option<UserInfo>,
    pub show_contact_form: bool,
    pub contact_form_submitted: bool,
    pub handed_off_to_human: bool,
}

/// One visitor's conversation with the bot.
pub struct ChatService {
    engine: Arc<NlpEngine>,
    store: Arc<dyn KeyValueStore>,
    config: ChatbotConfig,
    settings: ChatSettings,
    session: ChatSession,
    messages: Vec<Message>,
}

impl ChatService {
    /// Opens a session: restores history and contact details, or greets
    /// with the configured welcome message when there is no history.
    pub fn start(
        engine: Arc<NlpEngine>,
        store: Arc<dyn KeyValueStore>,
        config: ChatbotConfig,
        settings: ChatSettings,
    ) -> Self {
        let history: Vec<Message> =
            load_json_or_warn(store.as_ref(), CHAT_HISTORY_KEY).unwrap_or_default();
        let user_info: Option<UserInfo> = load_json_or_warn(store.as_ref(), USER_INFO_KEY);

        let messages = if history.is_empty() {
            vec![Message::bot(config.responses.welcome_message.clone())]
        } else {
            history
        };

        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            contact_form_submitted: user_info.is_some(),
            user_info,
            show_contact_form: false,
            handed_off_to_human: false,
        };
        info!(session_id = %session.id, restored = messages.len(), "Chat session started");

        Self {
            engine,
            store,
            config,
            settings,
            session,
            messages,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn show_contact_form(&self) -> bool {
        self.session.show_contact_form
    }

    async fn simulate_latency(&self) {
        if !self.settings.response_delay.is_zero() {
            tokio::time::sleep(self.settings.response_delay).await;
        }
    }

    fn persist_history(&self, messages: &[Message]) -> Result<(), AppError> {
        let start = messages.len().saturating_sub(self.settings.history_limit);
        save_json(self.store.as_ref(), CHAT_HISTORY_KEY, &messages[start..])
    }

    /// Saves the next transcript and only then swaps it in with `session`,
    /// so a failed write leaves the in-memory session untouched.
    fn commit(&mut self, messages: Vec<Message>, session: ChatSession) -> Result<(), AppError> {
        self.persist_history(&messages)?;
        self.messages = messages;
        self.session = session;
        Ok(())
    }

    fn should_offer_contact_form(
        &self,
        messages: &[Message],
        session: &ChatSession,
        top_intent: &str,
    ) -> bool {
        let lead = &self.config.lead_generation;
        if !lead.enabled || session.contact_form_submitted {
            return false;
        }
        let user_messages = messages.iter().filter(|m| m.role == Role::User).count();
        let enough_messages = user_messages >= lead.capture_after_messages as usize;
        match lead.lead_capture_trigger {
            LeadCaptureTrigger::Auto => enough_messages,
            LeadCaptureTrigger::Intent => enough_messages || top_intent == LEAD_INTENT,
            LeadCaptureTrigger::Manual => false,
        }
    }

    /// Sends a user message and returns the bot's reply. Blank input is
    /// ignored and yields `None`.
    #[instrument(skip(self, content), fields(session_id = %self.session.id))]
    pub async fn send_message(&mut self, content: &str) -> Result<Option<Message>, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let started = Instant::now();
        let mut user_message = Message::user(content);

        self.simulate_latency().await;

        let processed = self.engine.process_and_respond(content);
        let top_intent = processed.nlp_result.top_intent_name().to_string();
        user_message.intent = Some(top_intent.clone());

        let mut reply = Message::bot(processed.response);
        reply.response_time_ms = Some(started.elapsed().as_millis() as u64);

        let mut messages = self.messages.clone();
        messages.push(user_message);
        messages.push(reply.clone());

        let mut session = self.session.clone();
        if self.should_offer_contact_form(&messages, &session, &top_intent) {
            session.show_contact_form = true;
        }
        self.commit(messages, session)?;

        info!(
            intent = %top_intent,
            sentiment = ?processed.nlp_result.sentiment.label,
            "Reply generated"
        );
        Ok(Some(reply))
    }

    /// Stores contact details and thanks the visitor.
    #[instrument(skip(self, info), fields(session_id = %self.session.id))]
    pub async fn submit_contact(&mut self, info: UserInfo) -> Result<Message, AppError> {
        info.validate()?;
        self.simulate_latency().await;

        let thanks = Message::bot(self.config.responses.thank_you_message.clone());
        let mut messages = self.messages.clone();
        messages.push(thanks.clone());

        save_json(self.store.as_ref(), USER_INFO_KEY, &info)?;
        let session = ChatSession {
            user_info: Some(info),
            show_contact_form: false,
            contact_form_submitted: true,
            ..self.session.clone()
        };
        self.commit(messages, session)?;

        info!("Contact details captured");
        Ok(thanks)
    }

    /// Flags the session for a human agent and tells the visitor.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub async fn request_human_assistance(&mut self) -> Result<Message, AppError> {
        self.simulate_latency().await;

        let notice = Message::bot(self.config.responses.human_handoff_message.clone());
        let mut messages = self.messages.clone();
        messages.push(notice.clone());
        let session = ChatSession {
            handed_off_to_human: true,
            ..self.session.clone()
        };
        self.commit(messages, session)?;

        info!("Human assistance requested");
        Ok(notice)
    }

    /// Forgets the stored history and the in-memory transcript.
    pub fn clear_history(&mut self) -> Result<(), AppError> {
        self.store.remove(CHAT_HISTORY_KEY)?;
        self.messages.clear();
        Ok(())
    }

    /// The session as an analytics record, or `None` before any message.
    pub fn conversation(&self) -> Option<Conversation> {
        let first = self.messages.first()?;
        let last = self.messages.last()?;

        let messages: Vec<MessageDetail> = self
            .messages
            .iter()
            .map(|m| MessageDetail {
                id: m.id.clone(),
                timestamp: m.timestamp,
                content: m.content.clone(),
                message_type: match m.role {
                    Role::User => MessageType::User,
                    Role::Bot => MessageType::Bot,
                    Role::System => MessageType::System,
                },
                intent: m.intent.clone(),
                response_time_ms: m.response_time_ms,
            })
            .collect();

        let lead_generated = self.session.contact_form_submitted;
        let mut tags = Vec::new();
        if lead_generated {
            tags.push("lead".to_string());
        }
        if self.session.handed_off_to_human {
            tags.push("handoff".to_string());
        }
        for intent in messages.iter().filter_map(|m| m.intent.as_deref()) {
            if intent != DEFAULT_INTENT && !tags.iter().any(|t| t == intent) {
                tags.push(intent.to_string());
            }
        }

        let user_details = self.session.user_info.as_ref().map(|u| UserDetails {
            name: Some(u.name.clone()),
            email: Some(u.email.clone()),
            company: u.company.clone(),
            phone: u.phone.clone(),
        });
        if user_details.is_none() && lead_generated {
            warn!("Lead flagged without stored contact details");
        }

        Some(Conversation {
            id: self.session.id.clone(),
            start_time: first.timestamp,
            end_time: last.timestamp,
            messages,
            user_details,
            conversation_rating: None,
            handed_off_to_human: self.session.handed_off_to_human,
            lead_generated,
            tags,
        })
    }
}
