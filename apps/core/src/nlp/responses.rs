//! Canned replies per intent.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use super::intent::DEFAULT_INTENT;

const PRODUCT_INFO: &[&str] = &[
    "ConnectAI offers advanced chatbot capabilities powered by natural language processing. Our solution can understand user intent, extract important information, and provide relevant answers based on your knowledge base.",
    "Our product includes features like intent recognition, entity extraction, knowledge base integration, and seamless human handoff when needed.",
    "ConnectAI helps businesses automate customer support, generate leads, and provide 24/7 assistance to website visitors.",
];

const PRICING: &[&str] = &[
    "We offer three pricing tiers: Basic ($49/month), Pro ($99/month), and Enterprise (custom pricing). Each plan offers different features and conversation volumes.",
    "Our pricing is based on the number of monthly conversations and features needed. The Pro plan at $99/month is our most popular option.",
    "You can start with a 14-day free trial to test all Pro features before making a decision.",
];

const IMPLEMENTATION: &[&str] = &[
    "Implementing ConnectAI on your website is easy! Just add our JavaScript snippet to your site, and you're ready to go. Our documentation provides step-by-step instructions.",
    "Setup takes just minutes. After signing up, you'll get a code snippet to add to your website. Then you can customize your chatbot through our admin dashboard.",
    "We offer a guided setup process to help you implement ConnectAI on your website, web app, or other platforms.",
];

const SUPPORT: &[&str] = &[
    "I'd be happy to help you with setup or troubleshooting. Could you tell me more about what specific issue you're encountering?",
    "Our support team is available to help you with any implementation challenges. Would you like me to connect you with a support agent?",
    "For technical support, you can also check our documentation at docs.connectai.com or email support@connectai.com.",
];

const GREETING: &[&str] = &[
    "Hello! Welcome to ConnectAI. How can I help you today?",
    "Hi there! I'm the ConnectAI assistant. What would you like to know about our services?",
    "Welcome! I'm here to answer questions about ConnectAI. What can I assist you with?",
];

const GOODBYE: &[&str] = &[
    "Thank you for chatting with ConnectAI. Have a great day!",
    "It was great helping you today. Feel free to come back if you have more questions!",
    "Thanks for your interest in ConnectAI. Don't hesitate to reach out if you need anything else!",
];

const LEAD_GENERATION: &[&str] = &[
    "I'd be happy to connect you with our team. Could you provide your name and email so we can reach out?",
    "To help you better, would you mind sharing your contact information? Our team can follow up with more details.",
    "Would you like to schedule a demo with our team? We just need your name and email to set that up.",
];

const DEFAULT: &[&str] = &[
    "I'm not sure I understood that correctly. Could you rephrase your question?",
    "I'm still learning! Could you ask that in a different way?",
    "I don't have information on that specific topic yet. Is there something else I can help you with?",
];

/// Maps intent names to candidate replies and picks one uniformly at random.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    responses: HashMap<&'static str, &'static [&'static str]>,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSelector {
    pub fn new() -> Self {
        let responses = HashMap::from([
            ("product_info", PRODUCT_INFO),
            ("pricing", PRICING),
            ("implementation", IMPLEMENTATION),
            ("support", SUPPORT),
            ("greeting", GREETING),
            ("goodbye", GOODBYE),
            ("lead_generation", LEAD_GENERATION),
            (DEFAULT_INTENT, DEFAULT),
        ]);
        Self { responses }
    }

    /// Candidate replies for `intent`; unknown names get the default list.
    pub fn candidates(&self, intent: &str) -> &'static [&'static str] {
        self.responses.get(intent).copied().unwrap_or(DEFAULT)
    }

    /// Picks a reply for `intent` using `rng`.
    pub fn select<R: Rng + ?Sized>(&self, intent: &str, rng: &mut R) -> String {
        self.candidates(intent)
            .choose(rng)
            .or_else(|| DEFAULT.first())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_list_is_non_empty() {
        let selector = ResponseSelector::new();
        for list in selector.responses.values() {
            assert!(!list.is_empty());
            assert!(list.iter().all(|s| !s.is_empty()));
        }
    }

    #[test]
    fn test_selection_comes_from_intent_list() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let reply = selector.select("pricing", &mut rng);
            assert!(PRICING.contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_unknown_intent_uses_default_list() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(1);

        let reply = selector.select("refund_request", &mut rng);
        assert!(DEFAULT.contains(&reply.as_str()));
        assert_eq!(selector.candidates("refund_request"), DEFAULT);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let selector = ResponseSelector::new();
        let a = selector.select("greeting", &mut StdRng::seed_from_u64(42));
        let b = selector.select("greeting", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
