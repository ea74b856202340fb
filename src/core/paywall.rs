use serde::{Deserialize, Serialize};
use tracing::info;

use super::profile::{UserProfile, TRIAL_DAYS};

/// Outcome of an entitlement check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The premium action may proceed
    Allowed,
    /// The caller must show the paywall instead
    Denied,
}

/// Entitlement check run before every premium-only action
pub fn guard(profile: &UserProfile) -> Gate {
    if profile.is_premium() {
        Gate::Allowed
    } else {
        Gate::Denied
    }
}

/// Dismiss the paywall overlay.
///
/// No payment is verified: dismissing grants premium. This is a placeholder
/// entitlement grant and must be replaced by a real subscription check before
/// shipping. Returns whether premium was newly granted.
pub fn close_paywall(profile: &mut UserProfile, paywall_visible: &mut bool) -> bool {
    *paywall_visible = false;
    if profile.is_premium() {
        return false;
    }
    profile.set_premium(true);
    info!("Paywall dismissed, premium granted without payment verification");
    true
}

/// Pricing shown on the paywall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaywallConfig {
    pub subscription_price: String,
    pub trial_days: i64,
}

impl Default for PaywallConfig {
    fn default() -> Self {
        Self {
            subscription_price: "$3.00".to_string(),
            trial_days: TRIAL_DAYS,
        }
    }
}

/// Features advertised on the paywall
pub const PREMIUM_FEATURES: [&str; 5] = [
    "Tradução ilimitada (EN, FR)",
    "Tradutor de frases com IA",
    "Contexto cultural profundo",
    "Pronúncia por áudio",
    "Sem anúncios",
];

/// Content of the paywall overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaywallOffer {
    pub price: String,
    pub trial_days: i64,
    pub features: Vec<&'static str>,
}

impl PaywallOffer {
    pub fn from_config(config: &PaywallConfig) -> Self {
        Self {
            price: config.subscription_price.clone(),
            trial_days: config.trial_days,
            features: PREMIUM_FEATURES.to_vec(),
        }
    }

    /// Plain-text rendering used by the CLI
    pub fn render(&self) -> String {
        let mut out = format!(
            "Kamba Premium: {}/mês, {} dias grátis\n",
            self.price, self.trial_days
        );
        for feature in &self.features {
            out.push_str("  * ");
            out.push_str(feature);
            out.push('\n');
        }
        out
    }
}
