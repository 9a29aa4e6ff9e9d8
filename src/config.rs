//! Sizing configuration: constants, module catalog and CPU tiers
//!
//! The built-in values reproduce the stock MES model. A TOML file can
//! override any section; sections left out keep their built-in values.
//!
//! ```toml
//! [storage]
//! tags_per_asset = 200
//!
//! [compute]
//! base_cores = 12
//!
//! [cpu]
//! fallback = "Dual-socket server"
//! [[cpu.tiers]]
//! max_cores = 16
//! label = "Workstation"
//!
//! [[modules]]
//! id = "core_mes"
//! name = "Core MES"
//! core_factor = 0
//! ram_factor = 0
//! added_storage_per_asset = 100
//! mandatory = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::ModuleCatalog;
use crate::compute::{FALLBACK_CPU, builtin_cpu_tiers};
use crate::error::{CatalogError, ConfigError};
use crate::models::{ComputeBase, CpuTier, Module, StorageDefaults};

/// Everything the estimators are parameterised by, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SizingConfig {
    pub storage: StorageDefaults,
    pub compute: ComputeBase,
    pub catalog: ModuleCatalog,
    pub cpu_tiers: Vec<CpuTier>,
    pub fallback_cpu: String,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            storage: StorageDefaults::default(),
            compute: ComputeBase::default(),
            catalog: ModuleCatalog::builtin(),
            cpu_tiers: builtin_cpu_tiers(),
            fallback_cpu: FALLBACK_CPU.to_string(),
        }
    }
}

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    storage: Option<StorageDefaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compute: Option<ComputeBase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu: Option<CpuSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<Vec<Module>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CpuSection {
    fallback: Option<String>,
    #[serde(default)]
    tiers: Vec<CpuTier>,
}

impl SizingConfig {
    /// Load from a file if one is given, otherwise use the built-ins
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let config = Self::from_toml(&text).map_err(|err| match err {
                    ConfigError::Parse { source, .. } => ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    },
                    other => other,
                })?;
                info!(
                    path = %path.display(),
                    modules = config.catalog.modules().len(),
                    "Loaded sizing configuration"
                );
                Ok(config)
            }
            None => {
                debug!("Using built-in sizing configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;

        let mut config = Self::default();

        if let Some(storage) = file.storage {
            config.storage = storage;
        }
        if let Some(compute) = file.compute {
            config.compute = compute;
        }
        if let Some(cpu) = file.cpu {
            if !cpu.tiers.is_empty() {
                validate_tiers(&cpu.tiers)?;
                config.cpu_tiers = cpu.tiers;
            }
            if let Some(fallback) = cpu.fallback {
                config.fallback_cpu = fallback;
            }
        }
        if let Some(modules) = file.modules {
            config.catalog = ModuleCatalog::new(modules)?;
        }

        Ok(config)
    }

    /// Render the effective configuration as a complete TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            storage: Some(self.storage.clone()),
            compute: Some(self.compute.clone()),
            cpu: Some(CpuSection {
                fallback: Some(self.fallback_cpu.clone()),
                tiers: self.cpu_tiers.clone(),
            }),
            modules: Some(self.catalog.modules().to_vec()),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

fn validate_tiers(tiers: &[CpuTier]) -> Result<(), CatalogError> {
    let mut previous = f64::NEG_INFINITY;
    for tier in tiers {
        if !tier.max_cores.is_finite() || tier.max_cores <= previous {
            return Err(CatalogError::TiersNotAscending(tier.label.clone()));
        }
        previous = tier.max_cores;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_builtin() {
        let config = SizingConfig::from_toml("").unwrap();
        assert_eq!(config, SizingConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = SizingConfig::from_toml(
            r#"
            [storage]
            tags_per_asset = 200

            [compute]
            base_cores = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.tags_per_asset, 200.0);
        assert_eq!(config.storage.assets, 4.0);
        assert_eq!(config.storage.days_per_month, 30.0);
        assert_eq!(config.compute.base_cores, 12.0);
        assert_eq!(config.compute.base_ram_gb, 16.0);
        assert_eq!(config.catalog, ModuleCatalog::builtin());
    }

    #[test]
    fn test_custom_modules() {
        let config = SizingConfig::from_toml(
            r#"
            [[modules]]
            id = "base"
            name = "Base"
            core_factor = 0
            ram_factor = 0
            mandatory = true

            [[modules]]
            id = "quality"
            name = "Quality"
            core_factor = 0.2
            ram_factor = 0.1
            added_storage_per_asset = 25
            "#,
        )
        .unwrap();

        let modules = config.catalog.modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].added_storage_per_asset, 0.0);
        assert_eq!(modules[0].description, "");
        assert!(!modules[1].mandatory);
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let err = SizingConfig::from_toml(
            r#"
            [[modules]]
            id = "quality"
            name = "Quality"
            core_factor = 0.2
            ram_factor = 0.1
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalog(CatalogError::MandatoryCount(0))
        ));
    }

    #[test]
    fn test_cpu_tiers_override_and_validation() {
        let config = SizingConfig::from_toml(
            r#"
            [cpu]
            fallback = "Big iron"
            [[cpu.tiers]]
            max_cores = 16
            label = "Small"
            "#,
        )
        .unwrap();
        assert_eq!(config.cpu_tiers.len(), 1);
        assert_eq!(config.fallback_cpu, "Big iron");

        let err = SizingConfig::from_toml(
            r#"
            [[cpu.tiers]]
            max_cores = 16
            label = "A"
            [[cpu.tiers]]
            max_cores = 8
            label = "B"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalog(CatalogError::TiersNotAscending(label)) if label == "B"
        ));
    }

    #[test]
    fn test_unknown_section_is_a_parse_error() {
        let err = SizingConfig::from_toml("[historian]\nrows = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_misspelled_key_is_a_parse_error() {
        let err = SizingConfig::from_toml("[compute]\nbase_core = 12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = SizingConfig::from_toml("[storage]\ntags_per_assets = 200\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = SizingConfig::from_toml("[cpu]\nfallbak = \"Big iron\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = SizingConfig::from_toml(
            r#"
            [[cpu.tiers]]
            max_core = 16
            label = "Small"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = SizingConfig::from_toml(
            r#"
            [[modules]]
            id = "core_mes"
            name = "Core MES"
            core_factor = 0
            ram_factor = 0
            added_storage_per_assets = 100
            mandatory = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_defaults_document_loads_back() {
        let text = SizingConfig::default().to_toml().unwrap();
        assert!(text.contains("[storage]"));
        assert!(text.contains("core_mes"));
        assert_eq!(SizingConfig::from_toml(&text).unwrap(), SizingConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SizingConfig::load(Some(Path::new("/nonexistent/mes-sizing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
