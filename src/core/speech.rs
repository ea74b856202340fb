use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::SlangEntry;

pub const PRONUNCIATION_LOCALE: &str = "pt-PT";
pub const PRONUNCIATION_RATE: f32 = 0.85;

/// A speech request for the device audio output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 locale hint, e.g. `pt-PT`
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    /// Pronunciation of an entry: the term followed by its meaning
    pub fn for_entry(entry: &SlangEntry) -> Self {
        Self {
            text: entry.pronunciation_text(),
            locale: PRONUNCIATION_LOCALE.to_string(),
            rate: PRONUNCIATION_RATE,
            pitch: 1.0,
        }
    }
}

/// A voice installed on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// Pick a voice for `locale`: exact locale, then same language, else `None`
/// (the platform default).
pub fn select_voice<'a>(voices: &'a [Voice], locale: &str) -> Option<&'a Voice> {
    let wanted = locale.to_lowercase();
    let family = wanted.split(['-', '_']).next().unwrap_or_default();

    voices
        .iter()
        .find(|v| v.lang.to_lowercase().starts_with(&wanted))
        .or_else(|| {
            voices.iter().find(|v| {
                v.lang
                    .to_lowercase()
                    .split(['-', '_'])
                    .next()
                    .is_some_and(|lang| lang == family)
            })
        })
}

/// Device speech synthesis
pub trait Speaker: Send + Sync {
    /// Voices installed on the device
    fn voices(&self) -> Vec<Voice>;

    /// Stop whatever is being spoken
    fn cancel(&self);

    /// Speak with `voice`, or the platform default when `None`
    fn speak(&self, utterance: &Utterance, voice: Option<&Voice>);
}

/// Speaker that only logs; used where no audio device exists
#[derive(Debug, Default, Clone)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn cancel(&self) {}

    fn speak(&self, utterance: &Utterance, voice: Option<&Voice>) {
        let voice = voice.map_or("platform default", |v| v.name.as_str());
        info!(
            "Speaking ({}, {}, rate {}): {}",
            utterance.locale, voice, utterance.rate, utterance.text
        );
    }
}
