//! External storage interfaces.
//!
//! The pipeline consumes object storage and a configuration store but does
//! not own them; these traits are the seams the surrounding application
//! implements. `JsonFileStore` is the crate's own file-backed store, enough
//! for single-host deployments and for tests.
//!
//! Configuration read/write failures are the one error class that halts the
//! current operation: extraction or composition without a valid
//! configuration cannot produce a meaningful result.

use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::template::ReportTemplateConfig;
use crate::zone::KpiZonesConfig;

/// Object storage for reference images, template pages, and finished
/// documents.
pub trait ObjectStorage {
    /// Uploads a binary object, returning its public URL.
    fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String>;

    /// Public URL of an already-stored object.
    fn public_url(&self, path: &str) -> String;
}

/// Everything persisted for one report template.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Reference screenshot address the KPI zones were drawn on.
    #[serde(default)]
    pub reference_image: Option<String>,
    #[serde(default)]
    pub kpi_zones: KpiZonesConfig,
    #[serde(default)]
    pub template: ReportTemplateConfig,
}

/// Persistence of template records, keyed by template id.
pub trait ConfigStore {
    fn load(&self, template_id: &str) -> Result<Option<TemplateRecord>>;
    fn save(&self, template_id: &str, record: &TemplateRecord) -> Result<()>;
}

/// Config store writing one JSON file per template under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, template_id: &str) -> Result<PathBuf> {
        if template_id.is_empty()
            || template_id.contains(['/', '\\', '.'])
        {
            return Err(anyhow!("Invalid template id: {template_id:?}"));
        }
        Ok(self.dir.join(format!("{template_id}.json")))
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self, template_id: &str) -> Result<Option<TemplateRecord>> {
        let path = self.record_path(template_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, template_id: &str, record: &TemplateRecord) -> Result<()> {
        let path = self.record_path(template_id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved template configuration to {}", path.display());
        Ok(())
    }
}
