//! Technique catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::Technique;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Technique list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TechniqueFile {
    techniques: Vec<Technique>,
}

/// Techniques indexed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechniqueCatalog {
    techniques: BTreeMap<String, Technique>,
}

impl TechniqueCatalog {
    /// Builds a catalog, rejecting duplicate names.
    pub fn from_techniques(techniques: impl IntoIterator<Item = Technique>) -> LoadResult<Self> {
        let mut catalog = BTreeMap::new();
        for technique in techniques {
            let name = technique.name().to_owned();
            if catalog.insert(name.clone(), technique).is_some() {
                return Err(anyhow::anyhow!("Duplicate technique '{}'", name));
            }
        }
        Ok(Self {
            techniques: catalog,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Technique> {
        self.techniques.get(name)
    }

    /// Looks up every name, failing on the first unknown one.
    pub fn resolve<'a>(
        &self,
        names: impl IntoIterator<Item = &'a String>,
    ) -> LoadResult<Vec<Technique>> {
        names
            .into_iter()
            .map(|name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Unknown technique '{}'", name))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.values()
    }
}

/// Loader for technique catalogs from RON files.
pub struct TechniqueLoader;

impl TechniqueLoader {
    /// Load a technique catalog from a RON file.
    ///
    /// RON format: `(techniques: [Damage(name: "Spark", ...), Heal(...)])`
    pub fn load(path: &Path) -> LoadResult<TechniqueCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TechniqueCatalog> {
        let file: TechniqueFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse technique catalog RON: {}", e))?;

        let catalog = TechniqueCatalog::from_techniques(file.techniques)?;
        tracing::debug!(count = catalog.len(), "technique catalog loaded");
        Ok(catalog)
    }
}
