//! The ordered catalog of MES modules and their cost factors

use std::collections::HashSet;

use regex::Regex;

use crate::error::CatalogError;
use crate::models::Module;

/// Immutable, ordered list of modules. Declaration order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
}

impl ModuleCatalog {
    /// Build a catalog from externally supplied modules, rejecting anything
    /// the estimators cannot rely on.
    pub fn new(modules: Vec<Module>) -> Result<Self, CatalogError> {
        validate_modules(&modules)?;
        Ok(Self { modules })
    }

    /// The stock MES catalog
    pub fn builtin() -> Self {
        Self {
            modules: builtin_modules(),
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn mandatory_ids(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter(|m| m.mandatory)
            .map(|m| m.id.as_str())
    }

    /// Modules enabled by a selection, in catalog order. Mandatory modules are
    /// always included; ids not in the catalog are ignored.
    pub fn enabled<'a>(&'a self, selected: &'a [String]) -> impl Iterator<Item = &'a Module> + 'a {
        self.modules
            .iter()
            .filter(move |m| m.mandatory || selected.iter().any(|id| *id == m.id))
    }

    /// Check a user selection against the catalog
    pub fn check_selection(&self, selected: &[String]) -> Result<(), CatalogError> {
        match selected.iter().find(|id| self.get(id).is_none()) {
            Some(unknown) => Err(CatalogError::UnknownModule(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Ids of every optional module, for "enable everything"
    pub fn optional_ids(&self) -> Vec<String> {
        self.modules
            .iter()
            .filter(|m| !m.mandatory)
            .map(|m| m.id.clone())
            .collect()
    }
}

fn validate_modules(modules: &[Module]) -> Result<(), CatalogError> {
    let id_re = Regex::new(r"^[a-z][a-z0-9_]*$")?;
    let mut seen = HashSet::new();

    for module in modules {
        if !id_re.is_match(&module.id) {
            return Err(CatalogError::InvalidId(module.id.clone()));
        }
        if !seen.insert(module.id.as_str()) {
            return Err(CatalogError::DuplicateId(module.id.clone()));
        }

        let factors = [
            ("core_factor", module.core_factor),
            ("ram_factor", module.ram_factor),
            ("added_storage_per_asset", module.added_storage_per_asset),
        ];
        for (field, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidFactor {
                    id: module.id.clone(),
                    field,
                    value,
                });
            }
        }
    }

    let mandatory: Vec<_> = modules.iter().filter(|m| m.mandatory).collect();
    if mandatory.len() != 1 {
        return Err(CatalogError::MandatoryCount(mandatory.len()));
    }
    let baseline = mandatory[0];
    if baseline.core_factor != 0.0 || baseline.ram_factor != 0.0 {
        return Err(CatalogError::MandatoryHasFactors(baseline.id.clone()));
    }

    Ok(())
}

fn module(
    id: &str,
    name: &str,
    description: &str,
    core_factor: f64,
    ram_factor: f64,
    added_storage_per_asset: f64,
) -> Module {
    Module {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        core_factor,
        ram_factor,
        added_storage_per_asset,
        mandatory: false,
    }
}

fn builtin_modules() -> Vec<Module> {
    let core = Module {
        mandatory: true,
        ..module(
            "core_mes",
            "Core MES (mandatory)",
            "User Mgmt, Auth, Alerts, Scheduling, MDM, OEE",
            0.0,
            0.0,
            100.0,
        )
    };

    vec![
        core,
        module(
            "opcua_connector",
            "OPCUA Connector using Kepware",
            "Real-time data collection",
            0.1,
            0.05,
            10.0,
        ),
        module(
            "recipe_mgmt",
            "Recipe / Parameter Management",
            "Versioning, approvals",
            0.1,
            0.1,
            100.0,
        ),
        module(
            "digital_batchcard",
            "Digital Batchcard / Work Instructions",
            "Checklists, attachments",
            0.1,
            0.1,
            200.0,
        ),
        module(
            "traceability",
            "Traceability / Genealogy",
            "Where-used, serial tracking",
            0.15,
            0.15,
            100.0,
        ),
        module(
            "production_planning",
            "Production Planning",
            "Scheduling, dispatching",
            0.1,
            0.07,
            50.0,
        ),
        module(
            "downtime",
            "Downtime Tracking",
            "Loss models, analytics",
            0.12,
            0.1,
            50.0,
        ),
        module(
            "maintenance",
            "Maintenance / CMMS Lite",
            "Work orders, PM, asset registry",
            0.08,
            0.07,
            50.0,
        ),
        module(
            "capa_nc",
            "CAPA / Non-Conformance",
            "Issues, workflows, approvals",
            0.07,
            0.07,
            50.0,
        ),
        module(
            "data_connectors",
            "Data Connectors / APIs",
            "External systems integration",
            0.08,
            0.06,
            10.0,
        ),
        module(
            "external_connectors",
            "ERP Connectors",
            "SAP, Oracle, D365",
            0.08,
            0.06,
            100.0,
        ),
    ]
}
