use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use kamba::catalog::{Catalog, CategoryFilter, SlangEntry, EXPLORE_SHORTCUTS, FILTER_CHIPS};
use kamba::config::{ConfigLoader, KambaConfig};
use kamba::core::selection::{self, CategorySelection};
use kamba::core::speech::LogSpeaker;
use kamba::core::{Action, App, AppState, PaywallOffer, UserProfile, View};
use kamba::integrations::{OpenAiGenerator, RewriteDirection, SlangAssistant, TargetLanguage};
use kamba::KambaError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Act as a premium member
    #[arg(short, long)]
    premium: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the slang of the day
    Daily,

    /// Search terms and definitions
    Search {
        /// Text to look for (empty matches everything)
        query: Option<String>,

        /// Restrict to a category; repeat to select several
        #[arg(short = 'g', long = "category")]
        categories: Vec<String>,
    },

    /// List the category filters and explore shortcuts
    Categories,

    /// Show one entry by id or term
    Show {
        entry: String,
    },

    /// Cultural context of a term (premium)
    Context {
        /// Entry id or term
        entry: String,
    },

    /// Rewrite a phrase into Angolan slang (premium)
    Rewrite {
        text: String,

        /// Rewrite slang into standard Portuguese instead
        #[arg(long)]
        to_standard: bool,
    },

    /// Translate an entry into English or French (premium)
    Translate {
        /// Entry id or term
        entry: String,

        /// Target language: en or fr
        #[arg(short, long, default_value = "en")]
        lang: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn find_entry<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a SlangEntry> {
    let wanted = key.trim().to_lowercase();
    catalog
        .get(key)
        .or_else(|| {
            catalog
                .list_all()
                .iter()
                .find(|e| e.term.to_lowercase() == wanted)
        })
        .ok_or_else(|| KambaError::unknown_entry(key).into())
}

fn print_entry(entry: &SlangEntry) {
    println!("{} [{}]", entry.term, entry.category);
    println!("  {}", entry.definition);
    if !entry.example.is_empty() {
        println!("  \"{}\"", entry.example);
    }
    if let Some(origin) = &entry.origin {
        println!("  Origem: {}", origin);
    }
    if !entry.synonyms.is_empty() {
        println!("  Sinónimos: {}", entry.synonyms.join(", "));
    }
}

fn build_app(config: &KambaConfig, catalog: Catalog, premium: bool) -> Result<App> {
    let generator =
        OpenAiGenerator::new(&config.provider).context("Failed to create provider client")?;
    let mut profile = UserProfile::new();
    profile.set_premium(premium);

    let state = AppState::new(Arc::new(catalog), profile)
        .with_stagger_interval(config.stagger.interval());

    Ok(App::new(
        state,
        SlangAssistant::new(Arc::new(generator)),
        Arc::new(LogSpeaker),
    ))
}

/// Print the paywall and report whether the gate stopped the action
fn blocked_by_paywall(app: &App, config: &KambaConfig) -> bool {
    if app.state().paywall_visible {
        print!("{}", PaywallOffer::from_config(&config.paywall).render());
        println!("(use --premium to unlock)");
        return true;
    }
    false
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    kamba::init_with_logger(true, cli.verbose)?;

    let loader = match cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    if let Commands::InitConfig { force } = cli.command {
        let path = loader.write_default(force)?;
        println!("Configuração escrita em {}", path.display());
        return Ok(());
    }

    let config = loader.load()?;
    let catalog = ConfigLoader::load_catalog(&config)?;
    debug!("Catalog has {} entries", catalog.len());

    match &cli.command {
        Commands::Daily => {
            if catalog.is_empty() {
                bail!("The catalog is empty");
            }
            let entry = selection::entry_of_the_day(catalog.list_all(), &Local::now());
            println!("Gíria do dia");
            print_entry(entry);
            println!();
            println!("Partilhar: {}", entry.share_text());
        }
        Commands::Search { query, categories } => {
            let mut filters = Vec::new();
            for label in categories {
                let filter = CategoryFilter::from_label(label)
                    .with_context(|| format!("Unknown category '{}'", label))?;
                filters.push(filter);
            }
            let selection = CategorySelection::from_filters(filters);
            let results = selection::search(
                catalog.list_all(),
                query.as_deref().unwrap_or_default(),
                &selection,
            );
            if results.is_empty() {
                println!("Nenhuma gíria encontrada.");
            }
            for entry in results {
                print_entry(entry);
            }
        }
        Commands::Categories => {
            for chip in FILTER_CHIPS {
                println!("{}", chip);
            }
            let shortcuts: Vec<String> =
                EXPLORE_SHORTCUTS.iter().map(|c| c.to_string()).collect();
            println!();
            println!("Explorar: {}", shortcuts.join(", "));
        }
        Commands::Show { entry } => {
            print_entry(find_entry(&catalog, entry)?);
        }
        Commands::Context { entry } => {
            let id = find_entry(&catalog, entry)?.id.clone();
            let mut app = build_app(&config, catalog, cli.premium)?;
            app.dispatch(Action::Navigate(View::Dictionary));
            app.dispatch(Action::RequestContext(id.clone()));
            if blocked_by_paywall(&app, &config) {
                return Ok(());
            }
            app.settle().await;
            if let Some(context) = app.state().card(&id).and_then(|c| c.context.as_ref()) {
                println!("{}", context);
            }
        }
        Commands::Rewrite { text, to_standard } => {
            let direction = if *to_standard {
                RewriteDirection::TowardStandard
            } else {
                RewriteDirection::TowardSlang
            };
            let mut app = build_app(&config, catalog, cli.premium)?;
            app.dispatch(Action::Navigate(View::Translator));
            app.dispatch(Action::SetTranslatorDirection(direction));
            app.dispatch(Action::SetTranslatorInput(text.clone()));
            app.dispatch(Action::SubmitTranslator);
            if blocked_by_paywall(&app, &config) {
                return Ok(());
            }
            app.settle().await;
            match &app.state().translator.output {
                Some(output) => println!("{}", output),
                None => println!("Nada para traduzir."),
            }
        }
        Commands::Translate { entry, lang } => {
            let language = TargetLanguage::from_code(lang)
                .with_context(|| format!("Unsupported language '{}' (use en or fr)", lang))?;
            let id = find_entry(&catalog, entry)?.id.clone();
            let mut app = build_app(&config, catalog, cli.premium)?;
            app.dispatch(Action::Navigate(View::Dictionary));
            app.dispatch(Action::TranslateCard {
                entry_id: id.clone(),
                language,
            });
            if blocked_by_paywall(&app, &config) {
                return Ok(());
            }
            app.settle().await;
            if let Some(translation) = app.state().card(&id).and_then(|c| c.translation.as_ref()) {
                println!("{} [{}]: {}", id, language.code(), translation);
            }
        }
        // Written before the config is loaded
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    run_cli().await
}
