mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{debug, info, warn};
use serde::Serialize;

use newsdesk::backends::news_api::NewsApiAdapter;
use newsdesk::backends::NewsBackend;
use newsdesk::category_catalog::{resolve_image_url, CategoryCatalog};
use newsdesk::category_lead::CategoryLeadResolver;
use newsdesk::config::Config;
use newsdesk::config_persistence::{default_config_path, load_config_file};
use newsdesk::content::{Category, ContentItem, ResolutionRequest};
use newsdesk::credentials::{clear_api_token, load_api_token_or_anonymous, set_api_token};
use newsdesk::degraded_fetch::DegradedFetchSynthesizer;
use newsdesk::language::{CurrentLanguage, LanguagePreference, LanguagePreferenceStore};
use newsdesk::related_resolver::{RelatedContentResolver, ResolverLimits};

use crate::cli::{Cli, Commands, LanguageCommands, TokenCommands};

#[derive(Serialize)]
struct RelatedOut {
    strategy: Option<&'static str>,
    items: Vec<ContentItem>,
}

#[derive(Serialize)]
struct ArticleOut {
    is_fallback: bool,
    thumbnail_url: Option<String>,
    item: ContentItem,
}

#[derive(Serialize)]
struct CategoryOut {
    #[serde(flatten)]
    category: Category,
    icon_url: Option<String>,
}

#[derive(Serialize)]
struct LanguageOut {
    selected: Option<SelectedOut>,
    current_language_id: String,
}

#[derive(Serialize)]
struct SelectedOut {
    id: String,
    code: String,
    name: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn language_report(store: &LanguagePreferenceStore) -> LanguageOut {
    LanguageOut {
        selected: store.selected().map(|selected| SelectedOut {
            id: selected.id,
            code: selected.code,
            name: selected.name,
        }),
        current_language_id: store.current_language_id(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    let config_path: Option<PathBuf> = cli.config.clone().or_else(default_config_path);
    let config = match &config_path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            load_config_file(path)
        }
        None => {
            warn!("No config directory available, using defaults");
            Config::default()
        }
    };
    let language_store = Arc::new(LanguagePreferenceStore::new(
        &config.language,
        config_path.clone(),
    ));

    match cli.command {
        Commands::Token { command } => match command {
            TokenCommands::Set { token } => {
                set_api_token(&config.api.token_profile, &token)?;
                info!("Stored API token for profile {}", config.api.token_profile);
            }
            TokenCommands::Clear => {
                clear_api_token(&config.api.token_profile)?;
                info!("Cleared API token for profile {}", config.api.token_profile);
            }
        },
        Commands::Language { command } => {
            match command {
                LanguageCommands::Show => {}
                LanguageCommands::Set { id, code, name } => {
                    language_store.select(LanguagePreference { id, code, name })?;
                }
                LanguageCommands::Clear => language_store.clear(),
            }
            print_json(&language_report(&language_store))?;
        }
        command => {
            let token = load_api_token_or_anonymous(&config.api.token_profile);
            let backend: Arc<dyn NewsBackend> = Arc::new(NewsApiAdapter::new(&config.api, token));
            run_api_command(command, backend, &config, language_store)?;
        }
    }
    Ok(())
}

fn run_api_command(
    command: Commands,
    backend: Arc<dyn NewsBackend>,
    config: &Config,
    language_store: Arc<LanguagePreferenceStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Related {
            category,
            language,
            state,
            district,
            exclude,
            max,
        } => {
            let mut request = ResolutionRequest::new(language, exclude);
            if let Some(category) = non_blank(category) {
                request = request.with_category(category);
            }
            if let (Some(state), Some(district)) = (non_blank(state), non_blank(district)) {
                request = request.with_region(state, district);
            }
            let resolver = RelatedContentResolver::new(
                backend,
                language_store,
                ResolverLimits::from(&config.related),
            );
            let resolution =
                resolver.resolve_detailed(&request, max.unwrap_or(config.related.max_results));
            print_json(&RelatedOut {
                strategy: resolution.strategy.map(|strategy| strategy.label()),
                items: resolution.items,
            })?;
        }
        Commands::Article { id } => {
            let lookup = DegradedFetchSynthesizer::new(backend).lookup_article(&id)?;
            if lookup.is_fallback {
                eprintln!(
                    "News service unavailable; showing placeholder for {}",
                    lookup.item.id
                );
            }
            let thumbnail_url = lookup.item.lead_media().and_then(|media| {
                resolve_image_url(Some(media.url.as_str()), &config.api.image_base_url)
            });
            print_json(&ArticleOut {
                is_fallback: lookup.is_fallback,
                thumbnail_url,
                item: lookup.item,
            })?;
        }
        Commands::Categories { language } => {
            let language_id =
                non_blank(language).unwrap_or_else(|| language_store.current_language_id());
            let catalog = CategoryCatalog::from_categories(backend.list_categories(&language_id)?);
            let image_base_url = &config.api.image_base_url;
            let categories: Vec<CategoryOut> = catalog
                .active()
                .map(|category| CategoryOut {
                    icon_url: resolve_image_url(category.icon.as_deref(), image_base_url),
                    category: category.clone(),
                })
                .collect();
            print_json(&categories)?;
        }
        Commands::Languages => {
            print_json(&backend.list_languages()?)?;
        }
        Commands::CategoryLead {
            category_id,
            language,
        } => {
            let language_id =
                non_blank(language).unwrap_or_else(|| language_store.current_language_id());
            let resolver = CategoryLeadResolver::new(backend, config.category_lead.clone());
            match resolver.find_lead(&category_id, &language_id) {
                Some(item) => print_json(&item)?,
                None => eprintln!("No news available for category {}", category_id),
            }
        }
        Commands::Language { .. } | Commands::Token { .. } => {}
    }
    Ok(())
}
