use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::schedule::{schedule, ScheduledTask};
use super::speech::{select_voice, Speaker};
use super::state::{reduce, Action, AppState, Effect};
use crate::integrations::assistant::SlangAssistant;

/// What a running job is working for
#[derive(Debug, Clone, PartialEq, Eq)]
enum JobKey {
    CardTranslation(String),
    CardContext(String),
    Rewrite,
}

#[derive(Debug)]
struct Job {
    key: JobKey,
    task: ScheduledTask<Action>,
}

/// Owns the application state and carries out the reducer's effects.
///
/// Provider calls run as spawned tasks; their results are fed back through
/// `reduce` when collected with [`App::settle`] or [`App::poll_completed`].
pub struct App {
    state: AppState,
    assistant: SlangAssistant,
    speaker: Arc<dyn Speaker>,
    jobs: Vec<Job>,
}

impl App {
    pub fn new(state: AppState, assistant: SlangAssistant, speaker: Arc<dyn Speaker>) -> Self {
        Self {
            state,
            assistant,
            speaker,
            jobs: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of jobs not yet collected
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Apply a user action and start whatever it asks for. Must run inside a tokio runtime.
    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {:?}", action);
        let effects = reduce(&mut self.state, action);
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Speak(utterance) => {
                let voices = self.speaker.voices();
                let voice = select_voice(&voices, &utterance.locale);
                self.speaker.cancel();
                self.speaker.speak(&utterance, voice);
            }
            Effect::FetchContext { entry_id, term } => {
                let assistant = self.assistant.clone();
                let id = entry_id.clone();
                let task = schedule(Duration::ZERO, async move {
                    let text = assistant.cultural_context(&term).await;
                    Action::ContextLoaded { entry_id: id, text }
                });
                self.jobs.push(Job {
                    key: JobKey::CardContext(entry_id),
                    task,
                });
            }
            Effect::TranslateEntry {
                entry_id,
                term,
                definition,
                language,
                delay,
            } => {
                self.cancel_translation(&entry_id);
                debug!("Scheduling {} translation of {} in {:?}", language, entry_id, delay);
                let assistant = self.assistant.clone();
                let id = entry_id.clone();
                let task = schedule(delay, async move {
                    let text = assistant.translate_entry(&term, &definition, language).await;
                    Action::CardTranslated {
                        entry_id: id,
                        language,
                        text,
                    }
                });
                self.jobs.push(Job {
                    key: JobKey::CardTranslation(entry_id),
                    task,
                });
            }
            Effect::CancelTranslation { entry_id } => self.cancel_translation(&entry_id),
            Effect::Rewrite { text, direction } => {
                let assistant = self.assistant.clone();
                let task = schedule(Duration::ZERO, async move {
                    let output = assistant.rewrite(&text, direction).await;
                    Action::RewriteCompleted {
                        input: text,
                        text: output,
                    }
                });
                self.jobs.push(Job {
                    key: JobKey::Rewrite,
                    task,
                });
            }
        }
    }

    fn cancel_translation(&mut self, entry_id: &str) {
        let key = JobKey::CardTranslation(entry_id.to_string());
        for job in self.jobs.iter().filter(|job| job.key == key) {
            job.task.cancel();
        }
    }

    /// Feed back results of jobs that already finished, without waiting
    pub async fn poll_completed(&mut self) -> usize {
        let (done, running): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs)
            .into_iter()
            .partition(|job| job.task.is_finished());
        self.jobs = running;

        let mut applied = 0;
        for job in done {
            if let Some(action) = job.task.join().await {
                self.dispatch(action);
                applied += 1;
            }
        }
        applied
    }

    /// Wait for every outstanding job and apply its result. Cancelled jobs are skipped.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while !self.jobs.is_empty() {
            let jobs = std::mem::take(&mut self.jobs);
            for job in jobs {
                if let Some(action) = job.task.join().await {
                    self.dispatch(action);
                    applied += 1;
                }
            }
        }
        info!("Settled {} provider results", applied);
        applied
    }
}
