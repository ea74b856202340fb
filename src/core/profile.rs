use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Default length of the advertised free trial in days
pub const TRIAL_DAYS: i64 = 7;

/// In-memory user profile. Lives for the process lifetime only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    is_premium: bool,
    trial_start_date: DateTime<Utc>,
    /// Favorite entry ids; not checked against the catalog
    favorites: BTreeSet<String>,
}

impl UserProfile {
    /// Create a basic (non-premium) profile whose trial starts now
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Create a basic profile with an explicit trial start
    pub fn started_at(trial_start_date: DateTime<Utc>) -> Self {
        Self {
            is_premium: false,
            trial_start_date,
            favorites: BTreeSet::new(),
        }
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Returns whether the id is a favorite after the toggle.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        };
        debug!("Favorite {} toggled (now favorite: {})", id, now_favorite);
        now_favorite
    }

    pub fn set_premium(&mut self, value: bool) {
        self.is_premium = value;
    }

    pub fn is_premium(&self) -> bool {
        self.is_premium
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn trial_start_date(&self) -> DateTime<Utc> {
        self.trial_start_date
    }

    /// When the advertised trial would end. Informational; nothing enforces it.
    pub fn trial_ends_at(&self, trial_days: i64) -> DateTime<Utc> {
        self.trial_start_date + Duration::days(trial_days)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_toggle_favorite_is_its_own_inverse() {
        let mut profile = UserProfile::new();
        profile.toggle_favorite("3");
        let before = profile.favorites().clone();

        assert!(profile.toggle_favorite("7"));
        assert!(profile.is_favorite("7"));
        assert!(!profile.toggle_favorite("7"));

        assert_eq!(profile.favorites(), &before);
    }

    #[test]
    fn test_toggle_accepts_unknown_ids() {
        let mut profile = UserProfile::new();
        assert!(profile.toggle_favorite("does-not-exist"));
        assert_eq!(profile.favorites().len(), 1);
    }

    #[test]
    fn test_set_premium_overwrites() {
        let mut profile = UserProfile::new();
        assert!(!profile.is_premium());
        profile.set_premium(true);
        assert!(profile.is_premium());
        profile.set_premium(false);
        assert!(!profile.is_premium());
    }

    #[test]
    fn test_trial_end() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let profile = UserProfile::started_at(start);
        assert_eq!(
            profile.trial_ends_at(TRIAL_DAYS),
            Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let profile = UserProfile::started_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["isPremium"], false);
        assert!(json.get("trialStartDate").is_some());
    }
}
