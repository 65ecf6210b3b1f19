//! University catalog: static, read-only target records.
//!
//! Loaded once at startup from `CATALOG_PATH` or the embedded default and
//! shared through `AppState` behind an `Arc`.

pub mod comparison;
pub mod handlers;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::models::target::{TargetCategory, TargetRecord};

const EMBEDDED_CATALOG: &str = include_str!("../../data/targets.json");

/// Targets grouped for the dashboard, each group in catalog order.
#[derive(Debug, Clone)]
pub struct TargetsByCategory<'a> {
    pub safe: Vec<&'a TargetRecord>,
    pub moderate: Vec<&'a TargetRecord>,
    pub ambitious: Vec<&'a TargetRecord>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    targets: Vec<TargetRecord>,
}

impl Catalog {
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG).context("embedded catalog is invalid")
    }

    /// Reads the catalog from `path`, falling back to the embedded one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read catalog {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("failed to parse catalog {}", path.display()))?
            }
            None => Self::embedded()?,
        };
        info!("Catalog loaded with {} targets", catalog.targets.len());
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let targets: Vec<TargetRecord> = serde_json::from_str(raw)?;
        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.id) {
                bail!("duplicate target id {}", target.id);
            }
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[TargetRecord] {
        &self.targets
    }

    pub fn get(&self, id: u32) -> Option<&TargetRecord> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Looks up a target by a path-style id. The leading integer of `id` is
    /// used (`"3"` and `"3-warwick"` both find 3); anything else is not found.
    pub fn get_target_by_id(&self, id: &str) -> Option<&TargetRecord> {
        parse_target_id(id).and_then(|id| self.get(id))
    }

    pub fn list_targets_by_category(&self) -> TargetsByCategory<'_> {
        let of = |category: TargetCategory| {
            self.targets
                .iter()
                .filter(|t| t.category == category)
                .collect::<Vec<_>>()
        };
        TargetsByCategory {
            safe: of(TargetCategory::Safe),
            moderate: of(TargetCategory::Moderate),
            ambitious: of(TargetCategory::Ambitious),
        }
    }
}

pub fn parse_target_id(id: &str) -> Option<u32> {
    let digits: String = id
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
