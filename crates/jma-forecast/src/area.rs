//! Area catalog: the center -> child area hierarchy used to pick a forecast code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::instrument;

use crate::client::ForecastClient;
use crate::error::ForecastError;
use crate::types::Area;

/// Catalog compiled into the binary.
pub const BUNDLED_AREAS: &str = include_str!("../data/areas.json");

/// Where the area document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaSource {
    Bundled,
    File(PathBuf),
    Remote(String),
}

#[derive(Debug, Deserialize)]
struct AreaDocument {
    centers: BTreeMap<String, CenterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CenterEntry {
    name: String,
    en_name: Option<String>,
    office_name: Option<String>,
    #[serde(default)]
    children: Vec<String>,
}

/// A selectable child area together with the center it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaChoice {
    pub center_code: String,
    pub center_name: String,
    pub child_code: String,
}

/// Immutable mapping from center code to [`Area`], ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaCatalog {
    centers: BTreeMap<String, Area>,
}

impl AreaCatalog {
    /// Parse an area document. Only the `centers` key is read.
    pub fn from_json(json: &str) -> Result<Self, ForecastError> {
        let doc: AreaDocument = serde_json::from_str(json)
            .map_err(|e| ForecastError::SourceUnavailable(format!("invalid area document: {}", e)))?;

        let centers = doc
            .centers
            .into_iter()
            .map(|(code, entry)| {
                let area = Area {
                    code: code.clone(),
                    name: entry.name,
                    en_name: entry.en_name,
                    office_name: entry.office_name,
                    children: entry.children,
                };
                (code, area)
            })
            .collect();

        Ok(Self { centers })
    }

    pub fn bundled() -> Result<Self, ForecastError> {
        Self::from_json(BUNDLED_AREAS)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::SourceUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Download `area.json`. Any transport, status or parse failure is
    /// reported as [`ForecastError::SourceUnavailable`].
    #[instrument(skip(client), level = "info")]
    pub async fn fetch_remote(client: &ForecastClient, url: &str) -> Result<Self, ForecastError> {
        let json = client
            .get_text(url)
            .await
            .map_err(|e| ForecastError::SourceUnavailable(e.to_string()))?;
        Self::from_json(&json)
    }

    pub async fn load(source: &AreaSource, client: &ForecastClient) -> Result<Self, ForecastError> {
        match source {
            AreaSource::Bundled => Self::bundled(),
            AreaSource::File(path) => Self::from_path(path),
            AreaSource::Remote(url) => Self::fetch_remote(client, url).await,
        }
    }

    /// Load the catalog, falling back to an empty one.
    ///
    /// The failure is logged and handed back to the caller so it can be shown;
    /// an empty catalog means "no regions available".
    pub async fn load_or_empty(
        source: &AreaSource,
        client: &ForecastClient,
    ) -> (Self, Option<ForecastError>) {
        match Self::load(source, client).await {
            Ok(catalog) => {
                tracing::info!("Loaded {} area centers", catalog.len());
                (catalog, None)
            }
            Err(e) => {
                tracing::warn!("Failed to load areas: {}", e);
                (Self::default(), Some(e))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.centers.values()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Every child code flattened into a pick list, center by center.
    pub fn choices(&self) -> Vec<AreaChoice> {
        self.centers
            .values()
            .flat_map(|center| {
                center.children.iter().map(move |child| AreaChoice {
                    center_code: center.code.clone(),
                    center_name: center.name.clone(),
                    child_code: child.clone(),
                })
            })
            .collect()
    }
}
