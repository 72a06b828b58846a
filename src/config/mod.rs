//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `ENDOMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `ENDOMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding the trial documents. Default: `endomatch_trials`.
    pub collection: String,

    /// Number of candidate trials retrieved per match request. Default: `4`.
    pub top_k: u64,

    /// Model name passed to the reasoning service. Default:
    /// `gemini-2.5-flash`.
    pub audit_model: String,

    /// OpenAI-compatible embeddings endpoint for query vectors.
    /// Default: `http://127.0.0.1:8081/v1/embeddings`.
    pub embeddings_url: String,

    /// Embedding model name. Default: `all-MiniLM-L6-v2`.
    pub embeddings_model: String,

    /// Bearer token for the embeddings endpoint, if it requires one.
    pub embeddings_api_key: Option<String>,

    /// Dimension of the query embedding vectors. Default: `384`.
    pub embedding_dim: usize,
}

/// Default Qdrant URL used when `ENDOMATCH_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection name for the trial corpus.
pub const DEFAULT_COLLECTION: &str = "endomatch_trials";

/// Default candidate count per match request.
pub const DEFAULT_TOP_K: u64 = 4;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            top_k: DEFAULT_TOP_K,
            audit_model: "gemini-2.5-flash".to_string(),
            embeddings_url: "http://127.0.0.1:8081/v1/embeddings".to_string(),
            embeddings_model: "all-MiniLM-L6-v2".to_string(),
            embeddings_api_key: None,
            embedding_dim: 384,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "ENDOMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "ENDOMATCH_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "ENDOMATCH_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "ENDOMATCH_COLLECTION";
    const ENV_TOP_K: &'static str = "ENDOMATCH_TOP_K";
    const ENV_AUDIT_MODEL: &'static str = "ENDOMATCH_AUDIT_MODEL";
    const ENV_EMBEDDINGS_URL: &'static str = "ENDOMATCH_EMBEDDINGS_URL";
    const ENV_EMBEDDINGS_MODEL: &'static str = "ENDOMATCH_EMBEDDINGS_MODEL";
    const ENV_EMBEDDINGS_API_KEY: &'static str = "ENDOMATCH_EMBEDDINGS_API_KEY";
    const ENV_EMBEDDING_DIM: &'static str = "ENDOMATCH_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let top_k = Self::parse_u64_from_env(Self::ENV_TOP_K, defaults.top_k);
        let audit_model = Self::parse_string_from_env(Self::ENV_AUDIT_MODEL, defaults.audit_model);
        let embeddings_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDINGS_URL, defaults.embeddings_url);
        let embeddings_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDINGS_MODEL, defaults.embeddings_model);
        let embeddings_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDINGS_API_KEY);
        let embedding_dim =
            Self::parse_u64_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim as u64)
                as usize;

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            top_k,
            audit_model,
            embeddings_url,
            embeddings_model,
            embeddings_api_key,
            embedding_dim,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK {
                value: self.top_k.to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidEmbeddingDim {
                value: self.embedding_dim.to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
