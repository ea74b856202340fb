use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use kamba::catalog::{Catalog, Category, SlangEntry};
use kamba::core::speech::LogSpeaker;
use kamba::core::{Action, App, AppState, DisplayLanguage, UserProfile, View};
use kamba::integrations::assistant::messages;
use kamba::integrations::{
    GenerationRequest, ProviderError, SlangAssistant, TargetLanguage, TextGenerator,
};

/// Records when each prompt reached the provider
struct ClockedGenerator {
    start: Instant,
    calls: Mutex<Vec<(Duration, String)>>,
    reply: Result<String, ProviderError>,
}

impl ClockedGenerator {
    fn new(reply: Result<String, ProviderError>) -> Self {
        Self {
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn calls(&self) -> Vec<(Duration, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ClockedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((self.start.elapsed(), request.prompt));
        self.reply.clone()
    }
}

fn entry(id: &str, term: &str) -> SlangEntry {
    SlangEntry {
        id: id.to_string(),
        term: term.to_string(),
        definition: format!("Definição de {}.", term),
        example: String::new(),
        category: Category::Street,
        origin: None,
        synonyms: Vec::new(),
    }
}

fn five_card_catalog() -> Catalog {
    Catalog::new(vec![
        entry("a", "Alfa"),
        entry("b", "Bravo"),
        entry("c", "Charlie"),
        entry("d", "Delta"),
        entry("e", "Eco"),
    ])
    .unwrap()
}

fn app_with(catalog: Catalog, premium: bool, generator: Arc<ClockedGenerator>) -> App {
    let mut profile = UserProfile::new();
    profile.set_premium(premium);
    let state = AppState::new(Arc::new(catalog), profile)
        .with_stagger_interval(Duration::from_millis(600));
    App::new(state, SlangAssistant::new(generator), Arc::new(LogSpeaker))
}

#[tokio::test(start_paused = true)]
async fn test_five_cards_are_staggered() {
    let generator = Arc::new(ClockedGenerator::new(Ok("Term - Meaning".to_string())));
    let mut app = app_with(five_card_catalog(), true, generator.clone());

    app.dispatch(Action::Navigate(View::Dictionary));
    app.dispatch(Action::SetDisplayLanguage(DisplayLanguage::Foreign(
        TargetLanguage::English,
    )));
    assert_eq!(app.settle().await, 5);

    let calls = generator.calls();
    assert_eq!(calls.len(), 5);
    let terms = ["Alfa", "Bravo", "Charlie", "Delta", "Eco"];
    for (index, (at, prompt)) in calls.iter().enumerate() {
        let expected = Duration::from_millis(600 * index as u64);
        assert!(*at >= expected, "card {} fired early at {:?}", index, at);
        assert!(*at < expected + Duration::from_millis(50));
        assert!(prompt.contains(terms[index]));
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_before_delay_prevents_request() {
    let generator = Arc::new(ClockedGenerator::new(Ok("Term - Meaning".to_string())));
    let mut app = app_with(five_card_catalog(), true, generator.clone());

    app.dispatch(Action::Navigate(View::Dictionary));
    app.dispatch(Action::SetDisplayLanguage(DisplayLanguage::Foreign(
        TargetLanguage::French,
    )));

    // Cards 0..=2 fire at 0, 600 and 1200ms
    tokio::time::sleep(Duration::from_millis(1500)).await;
    app.dispatch(Action::SetDisplayLanguage(DisplayLanguage::Native));
    app.settle().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(generator.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_dictionary_cancels_pending_cards() {
    let generator = Arc::new(ClockedGenerator::new(Ok("Term - Meaning".to_string())));
    let mut app = app_with(five_card_catalog(), true, generator.clone());

    app.dispatch(Action::Navigate(View::Dictionary));
    app.dispatch(Action::SetDisplayLanguage(DisplayLanguage::Foreign(
        TargetLanguage::English,
    )));
    app.dispatch(Action::Navigate(View::Profile));
    app.settle().await;

    // Cancelled before the runtime polled even the zero-delay card
    assert_eq!(generator.calls().len(), 0);
    assert!(app.state().cards.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_quota_error_surfaces_rate_limit_message() {
    let generator = Arc::new(ClockedGenerator::new(Err(ProviderError::RateLimited(
        "429 RESOURCE_EXHAUSTED".to_string(),
    ))));
    let mut app = app_with(Catalog::builtin(), true, generator.clone());

    app.dispatch(Action::Navigate(View::Dictionary));
    app.dispatch(Action::RequestContext("1".to_string()));
    app.settle().await;

    let context = app.state().card("1").unwrap().context.clone().unwrap();
    assert_eq!(context, messages::RATE_LIMITED);
    assert_ne!(context, messages::CONTEXT_FAILED);
    assert_eq!(generator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_basic_member_is_sent_to_paywall() {
    let generator = Arc::new(ClockedGenerator::new(Ok("never".to_string())));

    for action in [
        Action::Speak("2".to_string()),
        Action::RequestContext("2".to_string()),
        Action::SetDisplayLanguage(DisplayLanguage::Foreign(TargetLanguage::English)),
    ] {
        let mut app = app_with(Catalog::builtin(), false, generator.clone());
        app.dispatch(Action::Navigate(View::Dictionary));
        app.dispatch(action);
        app.settle().await;
        assert!(app.state().paywall_visible);
        assert_eq!(app.state().display_language, DisplayLanguage::Native);
    }
    assert!(generator.calls().is_empty());

    // Dismissing the paywall grants premium and the same action goes through
    let mut app = app_with(Catalog::builtin(), false, generator.clone());
    app.dispatch(Action::Navigate(View::Dictionary));
    app.dispatch(Action::RequestContext("2".to_string()));
    app.dispatch(Action::ClosePaywall);
    app.dispatch(Action::RequestContext("2".to_string()));
    app.settle().await;
    assert_eq!(generator.calls().len(), 1);
    assert!(app.state().profile.is_premium());
    assert!(!app.state().paywall_visible);
}
