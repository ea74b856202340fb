// Core dictionary logic: profile, selection, entitlement gate, reducer and driver

pub mod app;
pub mod paywall;
pub mod profile;
pub mod schedule;
pub mod selection;
pub mod speech;
pub mod state;

pub use app::App;
pub use paywall::{guard, Gate, PaywallOffer};
pub use profile::UserProfile;
pub use selection::CategorySelection;
pub use state::{reduce, Action, AppState, DisplayLanguage, Effect, View};
