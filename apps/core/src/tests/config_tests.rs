//! Config Service Tests
//!
//! Persistence, per-section updates, bookkeeping lists and import/export.

use crate::config::{
    AppearanceConfig, AutoResponseInput, ChatbotConfig, ConfigService, KnowledgeSourceInput,
    KnowledgeSourceType, LeadCaptureTrigger, LeadGenerationConfig, TriggerType, WidgetPosition,
    CONFIG_STORAGE_KEY,
};
use crate::error::AppError;
use crate::store::{KeyValueStore, MemoryStore};
use std::sync::Arc;

fn memory_service() -> (Arc<MemoryStore>, ConfigService) {
    let store = Arc::new(MemoryStore::new());
    let service = ConfigService::new(store.clone());
    (store, service)
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_missing_blob_yields_defaults() {
        let (store, service) = memory_service();
        let config = service.config();

        assert_eq!(
            config.responses.welcome_message,
            "Hi there! 👋 Welcome to ConnectAI. How can I help you today?"
        );
        assert!(store.get(CONFIG_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_yields_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.set(CONFIG_STORAGE_KEY, "{\"responses\":").unwrap();

        let service = ConfigService::new(store);
        assert_eq!(service.config().name, "ConnectAI Chatbot");
    }

    #[test]
    fn test_saved_config_survives_reload() {
        let (store, mut service) = memory_service();

        service
            .update(|c| c.name = "Support Bot".to_string())
            .expect("Failed to update config");

        let reloaded = ConfigService::new(store);
        assert_eq!(reloaded.config().name, "Support Bot");
        assert_eq!(reloaded.config(), service.config());
    }

    #[test]
    fn test_every_write_stamps_last_updated() {
        let (_store, mut service) = memory_service();
        let before = service.config().last_updated;

        let mut appearance = AppearanceConfig::default();
        appearance.position = WidgetPosition::TopLeft;
        service
            .update_appearance(appearance)
            .expect("Failed to update appearance");

        let config = service.config();
        assert_eq!(config.appearance.position, WidgetPosition::TopLeft);
        assert!(config.last_updated >= before);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_store, mut service) = memory_service();
        service
            .update(|c| c.responses.welcome_message = "Yo".to_string())
            .expect("Failed to update config");

        let config = service.reset_config().expect("Failed to reset config");
        assert_ne!(config.responses.welcome_message, "Yo");
        assert_eq!(config.responses.auto_responses.len(), 3);
    }
}

#[cfg(test)]
mod section_tests {
    use super::*;

    #[test]
    fn test_invalid_lead_generation_is_rejected() {
        let (_store, mut service) = memory_service();

        let result = service.update_lead_generation(LeadGenerationConfig {
            capture_after_messages: 0,
            ..LeadGenerationConfig::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.config().lead_generation.capture_after_messages, 2);

        service
            .update_lead_generation(LeadGenerationConfig {
                lead_capture_trigger: LeadCaptureTrigger::Manual,
                ..LeadGenerationConfig::default()
            })
            .expect("Failed to update lead generation");
        assert_eq!(
            service.config().lead_generation.lead_capture_trigger,
            LeadCaptureTrigger::Manual
        );
    }

    #[test]
    fn test_api_temperature_bounds() {
        let (_store, mut service) = memory_service();
        let mut api = service.config().api_settings;

        api.temperature = 2.0;
        assert!(service.update_api_settings(api.clone()).is_ok());

        api.temperature = -0.1;
        assert!(matches!(
            service.update_api_settings(api),
            Err(AppError::Validation(_))
        ));
        assert_eq!(service.config().api_settings.temperature, 2.0);
    }

    #[test]
    fn test_auto_responses_add_and_remove() {
        let (_store, mut service) = memory_service();

        let added = service
            .add_auto_response(AutoResponseInput {
                trigger_type: TriggerType::Keyword,
                trigger: "refund".to_string(),
                response: "Refunds are processed within 5 days.".to_string(),
                active: true,
            })
            .expect("Failed to add auto response");

        assert_eq!(service.config().responses.auto_responses.len(), 4);
        assert!(service.remove_auto_response(&added.id).unwrap());
        assert!(!service.remove_auto_response(&added.id).unwrap());
        assert_eq!(service.config().responses.auto_responses.len(), 3);

        let empty_trigger = AutoResponseInput {
            trigger_type: TriggerType::Intent,
            trigger: String::new(),
            response: "x".to_string(),
            active: false,
        };
        assert!(matches!(
            service.add_auto_response(empty_trigger),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_knowledge_sources_add_and_remove() {
        let (_store, mut service) = memory_service();

        let source = service
            .add_knowledge_source(KnowledgeSourceInput {
                name: "Docs".to_string(),
                source_type: KnowledgeSourceType::Url,
                content: "https://docs.connectai.com".to_string(),
                enabled: true,
            })
            .expect("Failed to add knowledge source");

        let sources = service.config().knowledge_base.sources;
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[2].id, source.id);

        assert!(service.remove_knowledge_source(&source.id).unwrap());
        assert_eq!(service.config().knowledge_base.sources.len(), 2);
    }
}

#[cfg(test)]
mod import_export_tests {
    use super::*;

    #[test]
    fn test_export_import_round_trip() {
        let (_store, mut source) = memory_service();
        source
            .update(|c| c.appearance.header_text = "Ask us anything".to_string())
            .expect("Failed to update config");
        let exported = source.export_config().expect("Failed to export");

        let (_other, mut target) = memory_service();
        assert!(target.import_config(&exported));

        let imported = target.config();
        let original = source.config();
        assert_eq!(imported.id, original.id);
        assert_eq!(imported.appearance, original.appearance);
        assert_eq!(imported.responses, original.responses);
    }

    #[test]
    fn test_import_fills_optional_sections() {
        let (_store, mut service) = memory_service();

        let mut document = serde_json::to_value(ChatbotConfig::default()).unwrap();
        let object = document.as_object_mut().unwrap();
        object.remove("apiSettings");
        object.remove("knowledgeBase");
        object.insert("name".to_string(), "Imported".into());

        assert!(service.import_config(&document.to_string()));
        let config = service.config();
        assert_eq!(config.name, "Imported");
        assert_eq!(config.api_settings.temperature, 0.7);
        assert_eq!(config.knowledge_base.sources.len(), 2);
    }

    #[test]
    fn test_import_requires_responses_and_appearance() {
        let (_store, mut service) = memory_service();
        let before = service.config();

        let mut document = serde_json::to_value(ChatbotConfig::default()).unwrap();
        document.as_object_mut().unwrap().remove("appearance");

        assert!(!service.import_config(&document.to_string()));
        assert!(!service.import_config("{\"name\":\"x\"}"));
        assert!(!service.import_config("garbage"));
        assert_eq!(service.config(), before);
    }
}
