//! Application state and the reducer that drives it.
//!
//! `reduce` is deterministic: it mutates the state and returns the side effects the
//! caller must run (provider calls, speech, cancellations). Results of those effects
//! come back as further actions.

use chrono::{DateTime, TimeZone};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::paywall::{self, Gate};
use super::profile::UserProfile;
use super::schedule::{stagger_delay, DEFAULT_STAGGER_MS};
use super::selection::{self, CategorySelection};
use super::speech::Utterance;
use crate::catalog::{Catalog, Category, CategoryFilter, SlangEntry};
use crate::integrations::assistant::{RewriteDirection, TargetLanguage};

/// Screens of the app. Any screen is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Dictionary,
    Translator,
    Profile,
}

/// Language the dictionary cards are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLanguage {
    /// Portuguese, as authored
    #[default]
    Native,
    Foreign(TargetLanguage),
}

impl DisplayLanguage {
    pub fn foreign(&self) -> Option<TargetLanguage> {
        match self {
            DisplayLanguage::Native => None,
            DisplayLanguage::Foreign(language) => Some(*language),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let trimmed = code.trim();
        if trimmed.eq_ignore_ascii_case("pt") || trimmed.eq_ignore_ascii_case("português") {
            return Some(DisplayLanguage::Native);
        }
        TargetLanguage::from_code(trimmed).map(DisplayLanguage::Foreign)
    }
}

impl fmt::Display for DisplayLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayLanguage::Native => f.write_str("Português"),
            DisplayLanguage::Foreign(language) => write!(f, "{}", language),
        }
    }
}

/// Per-card UI state, alive while the card is shown in the dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    pub context: Option<String>,
    pub context_loading: bool,
    pub translation: Option<String>,
    /// Language of the pending or shown translation
    pub translation_language: Option<TargetLanguage>,
    pub translation_pending: bool,
}

impl CardState {
    fn clear_translation(&mut self) {
        self.translation = None;
        self.translation_language = None;
        self.translation_pending = false;
    }
}

/// State of the phrase translator screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatorState {
    pub input: String,
    pub direction: RewriteDirection,
    pub output: Option<String>,
    pub loading: bool,
}

/// Everything the UI renders from
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    pub profile: UserProfile,
    pub view: View,
    pub paywall_visible: bool,
    pub dark_mode: bool,
    pub search_query: String,
    pub categories: CategorySelection,
    pub display_language: DisplayLanguage,
    /// Cards currently shown in the dictionary, keyed by entry id
    pub cards: HashMap<String, CardState>,
    pub translator: TranslatorState,
    /// Spacing between staggered card translations
    pub stagger_interval: Duration,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, profile: UserProfile) -> Self {
        Self {
            catalog,
            profile,
            view: View::Home,
            paywall_visible: false,
            dark_mode: false,
            search_query: String::new(),
            categories: CategorySelection::all(),
            display_language: DisplayLanguage::Native,
            cards: HashMap::new(),
            translator: TranslatorState::default(),
            stagger_interval: Duration::from_millis(DEFAULT_STAGGER_MS),
        }
    }

    pub fn with_stagger_interval(mut self, interval: Duration) -> Self {
        self.stagger_interval = interval;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Featured entry for the day containing `now`. The catalog must not be empty.
    pub fn entry_of_the_day<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> &SlangEntry {
        selection::entry_of_the_day(self.catalog.list_all(), now)
    }

    /// Entries matching the current search and category filter
    pub fn filtered_entries(&self) -> Vec<&SlangEntry> {
        selection::search(self.catalog.list_all(), &self.search_query, &self.categories)
    }

    /// Cards on screen: the filtered entries while the dictionary is open
    pub fn visible_entries(&self) -> Vec<&SlangEntry> {
        if self.view == View::Dictionary {
            self.filtered_entries()
        } else {
            Vec::new()
        }
    }

    pub fn favorite_entries(&self) -> Vec<&SlangEntry> {
        selection::favorites_of(self.catalog.list_all(), self.profile.favorites())
    }

    pub fn card(&self, id: &str) -> Option<&CardState> {
        self.cards.get(id)
    }
}

/// User events and effect completions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(View),
    /// Open the dictionary filtered to one category
    ExploreCategory(Category),
    ToggleTheme,
    SetSearchQuery(String),
    ToggleCategory(CategoryFilter),
    ToggleFavorite(String),
    SetDisplayLanguage(DisplayLanguage),
    OpenPaywall,
    ClosePaywall,
    /// Pronounce an entry
    Speak(String),
    /// Load the cultural context of a dictionary card
    RequestContext(String),
    /// Translate one card on demand while the display language is native
    TranslateCard {
        entry_id: String,
        language: TargetLanguage,
    },
    SetTranslatorInput(String),
    SetTranslatorDirection(RewriteDirection),
    SubmitTranslator,
    ContextLoaded {
        entry_id: String,
        text: String,
    },
    CardTranslated {
        entry_id: String,
        language: TargetLanguage,
        text: String,
    },
    RewriteCompleted {
        input: String,
        text: String,
    },
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Speak(Utterance),
    FetchContext {
        entry_id: String,
        term: String,
    },
    TranslateEntry {
        entry_id: String,
        term: String,
        definition: String,
        language: TargetLanguage,
        delay: Duration,
    },
    /// Drop a pending card translation that has not fired yet
    CancelTranslation {
        entry_id: String,
    },
    Rewrite {
        text: String,
        direction: RewriteDirection,
    },
}

/// Apply an action to the state and return the effects to run
pub fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Navigate(view) => {
            navigate(state, view);
            sync_cards(state, false)
        }
        Action::ExploreCategory(category) => {
            state.categories = CategorySelection::only(category);
            navigate(state, View::Dictionary);
            sync_cards(state, false)
        }
        Action::ToggleTheme => {
            state.dark_mode = !state.dark_mode;
            Vec::new()
        }
        Action::SetSearchQuery(query) => {
            state.search_query = query;
            sync_cards(state, false)
        }
        Action::ToggleCategory(filter) => {
            state.categories = state.categories.toggled(filter);
            sync_cards(state, false)
        }
        Action::ToggleFavorite(id) => {
            state.profile.toggle_favorite(&id);
            Vec::new()
        }
        Action::SetDisplayLanguage(language) => set_display_language(state, language),
        Action::OpenPaywall => {
            state.paywall_visible = true;
            Vec::new()
        }
        Action::ClosePaywall => {
            paywall::close_paywall(&mut state.profile, &mut state.paywall_visible);
            Vec::new()
        }
        Action::Speak(id) => {
            if !allowed(state) {
                return Vec::new();
            }
            match state.catalog.get(&id) {
                Some(entry) => vec![Effect::Speak(Utterance::for_entry(entry))],
                None => {
                    debug!("Ignoring speech for unknown entry {}", id);
                    Vec::new()
                }
            }
        }
        Action::RequestContext(id) => request_context(state, id),
        Action::TranslateCard { entry_id, language } => translate_card(state, entry_id, language),
        Action::SetTranslatorInput(input) => {
            if input != state.translator.input {
                state.translator.input = input;
                state.translator.output = None;
            }
            Vec::new()
        }
        Action::SetTranslatorDirection(direction) => {
            state.translator.direction = direction;
            Vec::new()
        }
        Action::SubmitTranslator => submit_translator(state),
        Action::ContextLoaded { entry_id, text } => {
            match state.cards.get_mut(&entry_id) {
                Some(card) if card.context_loading => {
                    card.context = Some(text);
                    card.context_loading = false;
                }
                _ => debug!("Discarding context for card {} no longer waiting", entry_id),
            }
            Vec::new()
        }
        Action::CardTranslated {
            entry_id,
            language,
            text,
        } => {
            match state.cards.get_mut(&entry_id) {
                Some(card)
                    if card.translation_pending && card.translation_language == Some(language) =>
                {
                    card.translation = Some(text);
                    card.translation_pending = false;
                }
                _ => debug!("Discarding stale {} translation for card {}", language, entry_id),
            }
            Vec::new()
        }
        Action::RewriteCompleted { input, text } => {
            if state.translator.loading {
                state.translator.loading = false;
                if input == state.translator.input {
                    state.translator.output = Some(text);
                } else {
                    debug!("Discarding rewrite for outdated input");
                }
            }
            Vec::new()
        }
    }
}

/// Run the entitlement gate, opening the paywall on denial
fn allowed(state: &mut AppState) -> bool {
    match paywall::guard(&state.profile) {
        Gate::Allowed => true,
        Gate::Denied => {
            state.paywall_visible = true;
            false
        }
    }
}

fn navigate(state: &mut AppState, view: View) {
    if state.view == View::Translator && view != View::Translator {
        state.translator = TranslatorState::default();
    }
    state.view = view;
}

fn set_display_language(state: &mut AppState, language: DisplayLanguage) -> Vec<Effect> {
    if language.foreign().is_some() && !allowed(state) {
        return Vec::new();
    }
    if language == state.display_language {
        return Vec::new();
    }
    state.display_language = language;
    sync_cards(state, true)
}

fn request_context(state: &mut AppState, id: String) -> Vec<Effect> {
    if !allowed(state) {
        return Vec::new();
    }
    let Some(entry) = state.catalog.get(&id) else {
        return Vec::new();
    };
    let term = entry.term.clone();
    let Some(card) = state.cards.get_mut(&id) else {
        debug!("Context requested for card {} that is not shown", id);
        return Vec::new();
    };
    if card.context.is_some() || card.context_loading {
        return Vec::new();
    }
    card.context_loading = true;
    vec![Effect::FetchContext { entry_id: id, term }]
}

fn translate_card(state: &mut AppState, id: String, language: TargetLanguage) -> Vec<Effect> {
    if !allowed(state) {
        return Vec::new();
    }
    if state.display_language != DisplayLanguage::Native {
        return Vec::new();
    }
    let Some(entry) = state.catalog.get(&id) else {
        return Vec::new();
    };
    let (term, definition) = (entry.term.clone(), entry.definition.clone());
    let Some(card) = state.cards.get_mut(&id) else {
        return Vec::new();
    };
    if card.translation.is_some() || card.translation_pending {
        return Vec::new();
    }
    card.translation_language = Some(language);
    card.translation_pending = true;
    vec![Effect::TranslateEntry {
        entry_id: id,
        term,
        definition,
        language,
        delay: Duration::ZERO,
    }]
}

fn submit_translator(state: &mut AppState) -> Vec<Effect> {
    if !allowed(state) {
        return Vec::new();
    }
    if state.translator.input.trim().is_empty() || state.translator.loading {
        return Vec::new();
    }
    state.translator.loading = true;
    vec![Effect::Rewrite {
        text: state.translator.input.clone(),
        direction: state.translator.direction,
    }]
}

/// Reconcile card state with the cards on screen.
///
/// Cards that left the screen lose their state and pending requests. With a
/// foreign display language every shown card without a matching translation gets
/// one, delayed by its position times the stagger interval. When the language
/// just changed back to native, translations are dropped.
fn sync_cards(state: &mut AppState, language_changed: bool) -> Vec<Effect> {
    let mut effects = Vec::new();

    let visible: Vec<(String, String, String)> = state
        .visible_entries()
        .into_iter()
        .map(|e| (e.id.clone(), e.term.clone(), e.definition.clone()))
        .collect();
    let visible_ids: HashSet<&str> = visible.iter().map(|(id, _, _)| id.as_str()).collect();

    let mut gone: Vec<String> = state
        .cards
        .keys()
        .filter(|id| !visible_ids.contains(id.as_str()))
        .cloned()
        .collect();
    gone.sort();
    for id in gone {
        if let Some(card) = state.cards.remove(&id) {
            if card.translation_pending {
                effects.push(Effect::CancelTranslation { entry_id: id });
            }
        }
    }

    let target = state
        .display_language
        .foreign()
        .filter(|_| state.profile.is_premium());

    for (index, (id, term, definition)) in visible.into_iter().enumerate() {
        let card = state.cards.entry(id.clone()).or_default();
        match target {
            Some(language) => {
                let up_to_date = card.translation_language == Some(language)
                    && (card.translation.is_some() || card.translation_pending);
                if up_to_date {
                    continue;
                }
                if card.translation_pending {
                    effects.push(Effect::CancelTranslation {
                        entry_id: id.clone(),
                    });
                }
                card.translation = None;
                card.translation_language = Some(language);
                card.translation_pending = true;
                effects.push(Effect::TranslateEntry {
                    entry_id: id,
                    term,
                    definition,
                    language,
                    delay: stagger_delay(index, state.stagger_interval),
                });
            }
            None if language_changed => {
                if card.translation_pending {
                    effects.push(Effect::CancelTranslation { entry_id: id });
                }
                card.clear_translation();
            }
            None => {}
        }
    }

    effects
}
