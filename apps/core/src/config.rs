//! Chatbot configuration managed from the admin dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::store::{load_json_or_warn, save_json, KeyValueStore};

/// Storage key of the persisted configuration.
pub const CONFIG_STORAGE_KEY: &str = "connectai_config";

/// What an auto response reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Keyword,
    Intent,
    Entity,
}

/// A canned reply bound to a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoResponse {
    pub id: String,
    pub trigger_type: TriggerType,
    pub trigger: String,
    pub response: String,
    pub active: bool,
}

/// An auto response before it gets an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AutoResponseInput {
    pub trigger_type: TriggerType,
    #[validate(length(min = 1))]
    pub trigger: String,
    #[validate(length(min = 1))]
    pub response: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsesConfig {
    pub welcome_message: String,
    pub fallback_message: String,
    pub lead_capture_prompt: String,
    pub thank_you_message: String,
    pub human_handoff_message: String,
    pub auto_responses: Vec<AutoResponse>,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Hi there! 👋 Welcome to ConnectAI. How can I help you today?".to_string(),
            fallback_message: "I'm sorry, I couldn't understand that. Could you try rephrasing your question?".to_string(),
            lead_capture_prompt: "I'd be happy to help! Could you provide your name and email so we can continue the conversation?".to_string(),
            thank_you_message: "Thank you for your information! A member of our team will get back to you soon.".to_string(),
            human_handoff_message: "I'm connecting you with a human support agent. Please wait a moment.".to_string(),
            auto_responses: vec![
                AutoResponse {
                    id: Uuid::new_v4().to_string(),
                    trigger_type: TriggerType::Keyword,
                    trigger: "pricing".to_string(),
                    response: "We offer three plans: Basic ($49/mo), Pro ($99/mo), and Enterprise (custom pricing). Each plan includes different features and conversation limits. Would you like to know more about a specific plan?".to_string(),
                    active: true,
                },
                AutoResponse {
                    id: Uuid::new_v4().to_string(),
                    trigger_type: TriggerType::Intent,
                    trigger: "greeting".to_string(),
                    response: "Hello! Thanks for reaching out to ConnectAI. How can I assist you today?".to_string(),
                    active: true,
                },
                AutoResponse {
                    id: Uuid::new_v4().to_string(),
                    trigger_type: TriggerType::Keyword,
                    trigger: "features".to_string(),
                    response: "ConnectAI offers natural language processing, knowledge base integration, lead generation, analytics, and seamless human handoff. Which feature would you like to learn more about?".to_string(),
                    active: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeSourceType {
    Url,
    Document,
    Qa,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: KnowledgeSourceType,
    pub content: String,
    pub last_updated: DateTime<Utc>,
    pub enabled: bool,
}

/// A knowledge source before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSourceInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: KnowledgeSourceType,
    pub content: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseConfig {
    pub sources: Vec<KnowledgeSource>,
    pub enabled: bool,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        let faq = serde_json::json!([
            {
                "question": "What is ConnectAI?",
                "answer": "ConnectAI is an intelligent chatbot platform that helps businesses engage with website visitors, generate leads, and provide support 24/7."
            },
            {
                "question": "How do I install ConnectAI?",
                "answer": "Installing ConnectAI is simple! Just add our JavaScript snippet to your website, and you're ready to go. See our documentation for detailed instructions."
            },
            {
                "question": "What makes ConnectAI different?",
                "answer": "ConnectAI combines advanced NLP with a user-friendly interface, making it easy to create powerful chatbots without coding. Our solution also features seamless human handoff and detailed analytics."
            }
        ]);

        Self {
            sources: vec![
                KnowledgeSource {
                    id: Uuid::new_v4().to_string(),
                    name: "Product Documentation".to_string(),
                    source_type: KnowledgeSourceType::Url,
                    content: "https://docs.connectai.com".to_string(),
                    last_updated: Utc::now(),
                    enabled: true,
                },
                KnowledgeSource {
                    id: Uuid::new_v4().to_string(),
                    name: "FAQ".to_string(),
                    source_type: KnowledgeSourceType::Qa,
                    content: faq.to_string(),
                    last_updated: Utc::now(),
                    enabled: true,
                },
            ],
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadCaptureTrigger {
    Auto,
    Intent,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadGenerationConfig {
    pub enabled: bool,
    /// User messages sent before the contact form is offered.
    #[validate(range(min = 1))]
    pub capture_after_messages: u32,
    pub required_fields: Vec<String>,
    pub lead_capture_trigger: LeadCaptureTrigger,
}

impl Default for LeadGenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capture_after_messages: 2,
            required_fields: vec!["name".to_string(), "email".to_string()],
            lead_capture_trigger: LeadCaptureTrigger::Intent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceConfig {
    pub primary_color: String,
    pub font_family: String,
    pub chat_bubble_icon: String,
    pub chat_bubble_text: String,
    pub avatar_url: String,
    pub header_text: String,
    pub position: WidgetPosition,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            primary_color: "#4f46e5".to_string(),
            font_family: "Inter, sans-serif".to_string(),
            chat_bubble_icon: "message-circle".to_string(),
            chat_bubble_text: "Chat with us".to_string(),
            avatar_url: "/assets/avatar.png".to_string(),
            header_text: "ConnectAI Assistant".to_string(),
            position: WidgetPosition::BottomRight,
        }
    }
}

/// Settings for an upstream model API. Stored for the dashboard; the local
/// engine never calls it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub endpoint: String,
    #[validate(length(min = 1))]
    pub model: String,
    /// Value between 0.0 and 2.0.
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.connectai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            system_prompt: "You are an AI assistant for a company called ConnectAI. Your job is to assist customers with their questions about our product and services. Be friendly, helpful, and professional.".to_string(),
        }
    }
}

/// The whole widget configuration. Imports must carry `responses` and
/// `appearance`; the other sections fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotConfig {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    pub responses: ResponsesConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    #[validate(nested)]
    pub lead_generation: LeadGenerationConfig,
    pub appearance: AppearanceConfig,
    #[serde(default)]
    #[validate(nested)]
    pub api_settings: ApiSettings,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_name() -> String {
    "ConnectAI Chatbot".to_string()
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            id: new_id(),
            name: default_name(),
            responses: ResponsesConfig::default(),
            knowledge_base: KnowledgeBaseConfig::default(),
            lead_generation: LeadGenerationConfig::default(),
            appearance: AppearanceConfig::default(),
            api_settings: ApiSettings::default(),
            last_updated: Utc::now(),
        }
    }
}

/// Loads, edits and persists the [`ChatbotConfig`].
pub struct ConfigService {
    store: Arc<dyn KeyValueStore>,
    config: ChatbotConfig,
}

impl ConfigService {
    /// Loads the stored configuration, falling back to defaults when it is
    /// missing or unreadable.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let config = load_json_or_warn::<ChatbotConfig>(store.as_ref(), CONFIG_STORAGE_KEY)
            .unwrap_or_default();
        Self { store, config }
    }

    /// Snapshot of the configuration.
    pub fn config(&self) -> ChatbotConfig {
        self.config.clone()
    }

    fn commit(&mut self, mut next: ChatbotConfig) -> Result<(), AppError> {
        next.validate()?;
        next.last_updated = Utc::now();
        save_json(self.store.as_ref(), CONFIG_STORAGE_KEY, &next)?;
        self.config = next;
        Ok(())
    }

    /// Replaces the whole configuration.
    pub fn save_config(&mut self, config: ChatbotConfig) -> Result<(), AppError> {
        self.commit(config)?;
        info!("Chatbot configuration saved");
        Ok(())
    }

    /// Applies `edit` to a copy of the configuration and saves it.
    pub fn update<F>(&mut self, edit: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut ChatbotConfig),
    {
        let mut next = self.config.clone();
        edit(&mut next);
        self.commit(next)
    }

    pub fn update_responses(&mut self, responses: ResponsesConfig) -> Result<(), AppError> {
        self.update(|c| c.responses = responses)
    }

    pub fn update_knowledge_base(
        &mut self,
        knowledge_base: KnowledgeBaseConfig,
    ) -> Result<(), AppError> {
        self.update(|c| c.knowledge_base = knowledge_base)
    }

    pub fn update_lead_generation(
        &mut self,
        lead_generation: LeadGenerationConfig,
    ) -> Result<(), AppError> {
        self.update(|c| c.lead_generation = lead_generation)
    }

    pub fn update_appearance(&mut self, appearance: AppearanceConfig) -> Result<(), AppError> {
        self.update(|c| c.appearance = appearance)
    }

    /// Replaces the API settings; temperature must stay within 0..=2.
    pub fn update_api_settings(&mut self, api_settings: ApiSettings) -> Result<(), AppError> {
        self.update(|c| c.api_settings = api_settings)
    }

    /// Restores and persists the default configuration.
    pub fn reset_config(&mut self) -> Result<ChatbotConfig, AppError> {
        self.commit(ChatbotConfig::default())?;
        info!("Chatbot configuration reset to defaults");
        Ok(self.config())
    }

    pub fn add_auto_response(
        &mut self,
        input: AutoResponseInput,
    ) -> Result<AutoResponse, AppError> {
        input.validate()?;
        let auto_response = AutoResponse {
            id: new_id(),
            trigger_type: input.trigger_type,
            trigger: input.trigger,
            response: input.response,
            active: input.active,
        };
        let added = auto_response.clone();
        self.update(|c| c.responses.auto_responses.push(auto_response))?;
        Ok(added)
    }

    /// Removes the auto response with `id`. Returns whether anything was removed.
    pub fn remove_auto_response(&mut self, id: &str) -> Result<bool, AppError> {
        let before = self.config.responses.auto_responses.len();
        self.update(|c| c.responses.auto_responses.retain(|r| r.id != id))?;
        Ok(self.config.responses.auto_responses.len() != before)
    }

    pub fn add_knowledge_source(
        &mut self,
        input: KnowledgeSourceInput,
    ) -> Result<KnowledgeSource, AppError> {
        input.validate()?;
        let source = KnowledgeSource {
            id: new_id(),
            name: input.name,
            source_type: input.source_type,
            content: input.content,
            last_updated: Utc::now(),
            enabled: input.enabled,
        };
        let added = source.clone();
        self.update(|c| c.knowledge_base.sources.push(source))?;
        Ok(added)
    }

    /// Removes the knowledge source with `id`. Returns whether anything was removed.
    pub fn remove_knowledge_source(&mut self, id: &str) -> Result<bool, AppError> {
        let before = self.config.knowledge_base.sources.len();
        self.update(|c| c.knowledge_base.sources.retain(|s| s.id != id))?;
        Ok(self.config.knowledge_base.sources.len() != before)
    }

    /// Pretty-printed JSON of the configuration.
    pub fn export_config(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }

    /// Replaces the configuration from JSON. On failure the current
    /// configuration is kept and `false` is returned.
    pub fn import_config(&mut self, json: &str) -> bool {
        let parsed = serde_json::from_str::<ChatbotConfig>(json)
            .map_err(AppError::from)
            .and_then(|config| self.commit(config));

        match parsed {
            Ok(()) => {
                info!("Chatbot configuration imported");
                true
            }
            Err(e) => {
                warn!(error = %e, "Error importing config");
                false
            }
        }
    }
}
