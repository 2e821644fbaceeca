//! Persistent client configuration model and defaults.

/// Root configuration persisted to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// News API connection settings.
    pub api: ApiConfig,
    #[serde(default)]
    /// Related-content lookup sizing.
    pub related: RelatedConfig,
    #[serde(default)]
    /// Category lead lookup sizing.
    pub category_lead: CategoryLeadConfig,
    #[serde(default)]
    /// Persisted language preference.
    pub language: LanguageConfig,
}

/// News API endpoint and transport preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_requests_per_second")]
    pub max_requests_per_second: u32,
    /// Base joined to relative category icon paths. Empty keeps them relative.
    #[serde(default)]
    pub image_base_url: String,
    #[serde(default = "default_client_type")]
    pub client_type: String,
    /// Keyring user the bearer token is stored under.
    #[serde(default = "default_token_profile")]
    pub token_profile: String,
}

/// Sizing of the related-content strategy chain.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RelatedConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// `limit` sent with every related search call.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// How many live catalog ids the dynamic strategy searches.
    #[serde(default = "default_dynamic_catalog_take")]
    pub dynamic_catalog_take: usize,
    /// Live catalog batches swept; 1 searches only the first `dynamic_catalog_take` ids.
    #[serde(default = "default_one_usize")]
    pub dynamic_catalog_max_batches: usize,
    #[serde(default = "default_one_u32")]
    pub dynamic_catalog_pages_per_batch: u32,
}

/// Sizing of the batched catalog sweep used to find a category's lead item.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CategoryLeadConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_pages_per_batch")]
    pub max_pages_per_batch: u32,
}

/// Selected content language, as last chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SelectedLanguageConfig {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// Language preference persisted between sessions.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LanguageConfig {
    #[serde(default)]
    pub selected: Option<SelectedLanguageConfig>,
    /// Interface locale code used when no language was selected.
    #[serde(default = "default_interface_code")]
    pub interface_code: String,
}

fn default_base_url() -> String {
    "https://api.newsdesk.local/api".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_requests_per_second() -> u32 {
    8
}

fn default_client_type() -> String {
    "desktop".to_string()
}

fn default_token_profile() -> String {
    "default".to_string()
}

fn default_max_results() -> usize {
    8
}

fn default_page_limit() -> u32 {
    8
}

fn default_dynamic_catalog_take() -> usize {
    10
}

fn default_one_usize() -> usize {
    1
}

fn default_one_u32() -> u32 {
    1
}

fn default_batch_size() -> usize {
    50
}

fn default_max_pages_per_batch() -> u32 {
    3
}

fn default_interface_code() -> String {
    "en".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_requests_per_second: default_max_requests_per_second(),
            image_base_url: String::new(),
            client_type: default_client_type(),
            token_profile: default_token_profile(),
        }
    }
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            page_limit: default_page_limit(),
            dynamic_catalog_take: default_dynamic_catalog_take(),
            dynamic_catalog_max_batches: default_one_usize(),
            dynamic_catalog_pages_per_batch: default_one_u32(),
        }
    }
}

impl Default for CategoryLeadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_pages_per_batch: default_max_pages_per_batch(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            selected: None,
            interface_code: default_interface_code(),
        }
    }
}

/// Clamps numeric settings into ranges the client can operate with.
pub fn sanitize_config(config: Config) -> Config {
    let client_type = match config.api.client_type.trim() {
        "mobile" => "mobile".to_string(),
        _ => "desktop".to_string(),
    };
    let interface_code = config.language.interface_code.trim().to_ascii_lowercase();
    Config {
        api: ApiConfig {
            connect_timeout_ms: config.api.connect_timeout_ms.clamp(100, 60_000),
            request_timeout_ms: config.api.request_timeout_ms.clamp(100, 120_000),
            max_requests_per_second: config.api.max_requests_per_second.clamp(1, 100),
            client_type,
            ..config.api
        },
        related: RelatedConfig {
            max_results: config.related.max_results.max(1),
            page_limit: config.related.page_limit.clamp(1, 100),
            dynamic_catalog_take: config.related.dynamic_catalog_take.max(1),
            dynamic_catalog_max_batches: config.related.dynamic_catalog_max_batches.max(1),
            dynamic_catalog_pages_per_batch: config
                .related
                .dynamic_catalog_pages_per_batch
                .clamp(1, 10),
        },
        category_lead: CategoryLeadConfig {
            batch_size: config.category_lead.batch_size.clamp(1, 200),
            max_pages_per_batch: config.category_lead.max_pages_per_batch.clamp(1, 10),
        },
        language: LanguageConfig {
            selected: config
                .language
                .selected
                .filter(|selected| !selected.id.trim().is_empty()),
            interface_code: if interface_code.is_empty() {
                default_interface_code()
            } else {
                interface_code
            },
        },
    }
}
