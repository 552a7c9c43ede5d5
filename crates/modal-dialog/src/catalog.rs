use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("adapter catalog unavailable: {0}")]
    Unavailable(String),
    #[error("invalid adapter catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

pub trait AdapterSource {
    fn fetch(&mut self) -> Result<Vec<Adapter>, CatalogError>;
}

pub struct JsonAdapterSource {
    text: String,
}

impl JsonAdapterSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AdapterSource for JsonAdapterSource {
    fn fetch(&mut self) -> Result<Vec<Adapter>, CatalogError> {
        Ok(serde_json::from_str(&self.text)?)
    }
}

#[derive(Debug, Default)]
pub struct AdapterCatalog {
    adapters: Vec<Adapter>,
    error: Option<String>,
    is_loading: bool,
    pub active_only: bool,
    pub search_term: String,
}

impl AdapterCatalog {
    pub fn adapters(&self) -> &[Adapter] {
        &self.adapters
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish_fetch(&mut self, result: Result<Vec<Adapter>, CatalogError>) {
        self.is_loading = false;
        match result {
            Ok(adapters) => {
                self.adapters = adapters;
                self.error = None;
            }
            Err(error) => {
                warn!(%error, "adapter catalog fetch failed");
                self.error = Some(error.to_string());
            }
        }
    }

    pub fn fetch_data(&mut self, source: &mut impl AdapterSource) {
        self.begin_fetch();
        let result = source.fetch();
        self.finish_fetch(result);
    }

    pub fn filtered_adapters(&self) -> Vec<&Adapter> {
        let query = self.search_term.trim().to_lowercase();
        self.adapters
            .iter()
            .filter(|adapter| !self.active_only || adapter.active)
            .filter(|adapter| {
                query.is_empty()
                    || adapter.name.to_lowercase().contains(&query)
                    || adapter.description.to_lowercase().contains(&query)
            })
            .collect()
    }
}
