//! MES Sizing Estimator
//!
//! Estimates historian storage and server compute for an MES deployment.

mod catalog;
mod coerce;
mod compute;
mod config;
mod error;
mod format;
mod logging;
mod models;
mod report;
mod storage;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::coerce::parse_lenient;
use crate::config::SizingConfig;
use crate::models::{ComputeInputs, StorageInputs};
use crate::report::EstimateReport;

#[derive(Debug, Parser)]
#[command(name = "mes-sizing")]
#[command(about = "Historian storage and compute sizing for MES deployments")]
struct Cli {
    /// TOML file overriding the built-in constants and module catalog
    #[arg(short, long, global = true, env = "MES_SIZING_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Estimate historian (time-series) storage
    Storage(StorageArgs),

    /// Estimate CPU cores, RAM and process-data storage
    Compute {
        /// Number of monitored assets (machines)
        #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
        assets: Option<f64>,

        /// Process-data retention in months
        #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
        retention_months: Option<f64>,

        #[command(flatten)]
        modules: ModuleArgs,
    },

    /// Run both estimates; compute shares the storage asset count
    Estimate {
        #[command(flatten)]
        storage: StorageArgs,

        /// Process-data retention in months (independent of historian retention)
        #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
        compute_retention_months: Option<f64>,

        #[command(flatten)]
        modules: ModuleArgs,
    },

    /// List catalog modules and their cost factors
    Modules,

    /// Show details for a single module
    Module {
        /// Module ID
        id: String,
    },

    /// Print the effective configuration as TOML
    Defaults,
}

#[derive(Debug, Args)]
struct StorageArgs {
    /// Number of monitored assets (machines)
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    assets: Option<f64>,

    /// Tags per asset
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    tags_per_asset: Option<f64>,

    /// Updates per minute per tag
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    updates_per_min_per_tag: Option<f64>,

    /// Historian retention in months
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    retention_months: Option<f64>,

    /// Bytes per stored row
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    row_size_bytes: Option<f64>,

    /// Compressed size as a fraction of raw size
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    compression_ratio: Option<f64>,
}

#[derive(Debug, Args)]
struct ModuleArgs {
    /// Deployment tier multiplier (1 = single server, 2 = redundant pair)
    #[arg(long, value_parser = parse_lenient, allow_hyphen_values = true)]
    env_factor: Option<f64>,

    /// Enable a module by ID (repeatable or comma separated)
    #[arg(short, long = "module", value_delimiter = ',')]
    modules: Vec<String>,

    /// Enable every module in the catalog
    #[arg(long, conflicts_with = "modules")]
    all_modules: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config =
        SizingConfig::load(cli.config.as_deref()).context("Failed to load sizing configuration")?;

    match cli.command {
        Commands::Storage(args) => {
            let report = EstimateReport {
                storage: Some(run_storage(&args, &config)),
                compute: None,
            };
            print_report(&report, cli.json)?;
        }

        Commands::Compute {
            assets,
            retention_months,
            modules,
        } => {
            let report = compute_report(assets, retention_months, &modules, &config)?;
            print_report(&report, cli.json)?;
        }

        Commands::Estimate {
            storage,
            compute_retention_months,
            modules,
        } => {
            let report = estimate_report(&storage, compute_retention_months, &modules, &config)?;
            print_report(&report, cli.json)?;
        }

        Commands::Modules => {
            let modules = config.catalog.modules();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(modules)?);
            } else {
                println!(
                    "{:<22} {:<40} {:>6} {:>6} {:>9}",
                    "ID", "Module", "Core", "RAM", "MB/asset"
                );
                println!("{}", "-".repeat(87));
                for m in modules {
                    let name = if m.mandatory {
                        format!("{} *", m.name)
                    } else {
                        m.name.clone()
                    };
                    println!(
                        "{:<22} {:<40} {:>6.2} {:>6.2} {:>9.0}",
                        m.id, name, m.core_factor, m.ram_factor, m.added_storage_per_asset
                    );
                }
                println!("\n* always enabled");
            }
        }

        Commands::Module { id } => {
            let Some(m) = config.catalog.get(&id) else {
                bail!("Module '{}' not found. Run 'modules' to list available IDs.", id);
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(m)?);
            } else {
                println!("Module: {}", m.name);
                println!("  ID: {}", m.id);
                if !m.description.is_empty() {
                    println!("  Description: {}", m.description);
                }
                println!("  Core factor: {}", m.core_factor);
                println!("  RAM factor: {}", m.ram_factor);
                println!("  Storage: {} MB per asset per month", m.added_storage_per_asset);
                if m.mandatory {
                    println!("  Mandatory: always enabled");
                }
            }
        }

        Commands::Defaults => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Compute on its own; the asset count falls back to the storage default
fn compute_report(
    assets: Option<f64>,
    retention_months: Option<f64>,
    modules: &ModuleArgs,
    config: &SizingConfig,
) -> Result<EstimateReport> {
    let assets = assets.unwrap_or(config.storage.assets);
    Ok(EstimateReport {
        storage: None,
        compute: Some(run_compute(assets, retention_months, modules, config)?),
    })
}

/// Both estimates, sharing the storage asset count
fn estimate_report(
    storage: &StorageArgs,
    compute_retention_months: Option<f64>,
    modules: &ModuleArgs,
    config: &SizingConfig,
) -> Result<EstimateReport> {
    let storage_result = run_storage(storage, config);
    let assets = storage.assets.unwrap_or(config.storage.assets);
    let compute_result = run_compute(assets, compute_retention_months, modules, config)?;

    Ok(EstimateReport {
        storage: Some(storage_result),
        compute: Some(compute_result),
    })
}

fn run_storage(args: &StorageArgs, config: &SizingConfig) -> models::StorageResult {
    let defaults = StorageInputs::from_defaults(&config.storage);
    let inputs = StorageInputs {
        assets: args.assets.unwrap_or(defaults.assets),
        tags_per_asset: args.tags_per_asset.unwrap_or(defaults.tags_per_asset),
        updates_per_min_per_tag: args
            .updates_per_min_per_tag
            .unwrap_or(defaults.updates_per_min_per_tag),
        retention_months: args.retention_months.unwrap_or(defaults.retention_months),
        row_size_bytes: args.row_size_bytes.unwrap_or(defaults.row_size_bytes),
        compression_ratio: args.compression_ratio.unwrap_or(defaults.compression_ratio),
    };

    warn_non_finite(&[
        ("assets", inputs.assets),
        ("tags-per-asset", inputs.tags_per_asset),
        ("updates-per-min-per-tag", inputs.updates_per_min_per_tag),
        ("retention-months", inputs.retention_months),
        ("row-size-bytes", inputs.row_size_bytes),
        ("compression-ratio", inputs.compression_ratio),
    ]);
    debug!(?inputs, "Estimating storage");

    storage::estimate_storage(&inputs, config.storage.days_per_month)
}

fn run_compute(
    assets: f64,
    retention_months: Option<f64>,
    args: &ModuleArgs,
    config: &SizingConfig,
) -> Result<models::ComputeResult> {
    let enabled_module_ids = if args.all_modules {
        config.catalog.optional_ids()
    } else {
        config.catalog.check_selection(&args.modules)?;
        for id in config.catalog.mandatory_ids() {
            if args.modules.iter().any(|m| m == id) {
                debug!(module = id, "Mandatory module is always enabled");
            }
        }
        args.modules.clone()
    };

    let inputs = ComputeInputs {
        assets,
        retention_months: retention_months.unwrap_or(config.compute.default_retention_months),
        environment_factor: args
            .env_factor
            .unwrap_or(config.compute.default_environment_factor),
        enabled_module_ids,
    };

    warn_non_finite(&[
        ("assets", inputs.assets),
        ("retention-months", inputs.retention_months),
        ("env-factor", inputs.environment_factor),
    ]);
    debug!(?inputs, "Estimating compute");

    Ok(compute::estimate_compute(
        &inputs,
        &config.catalog,
        &config.compute,
        &config.cpu_tiers,
        &config.fallback_cpu,
    ))
}

fn warn_non_finite(values: &[(&str, f64)]) {
    for (name, value) in values {
        if !value.is_finite() {
            warn!(input = *name, "Input is not a finite number; affected results will be blank");
        }
    }
}

fn print_report(report: &EstimateReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mes-sizing").chain(args.iter().copied()))
    }

    fn module_args(cli: Cli) -> ModuleArgs {
        match cli.command {
            Commands::Compute { modules, .. } | Commands::Estimate { modules, .. } => modules,
            other => panic!("expected compute or estimate, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_values_reach_the_estimator() {
        let cli = parse(&["storage", "--assets", "-4"]).unwrap();
        let Commands::Storage(args) = cli.command else {
            panic!("expected storage command");
        };
        assert_eq!(args.assets, Some(-4.0));

        let result = run_storage(&args, &SizingConfig::default());
        assert_eq!(result.total_tags, -600.0);

        let cli = parse(&["compute", "--env-factor", "-1", "--retention-months", "-Infinity"]).unwrap();
        let Commands::Compute { retention_months, modules, .. } = cli.command else {
            panic!("expected compute command");
        };
        assert_eq!(modules.env_factor, Some(-1.0));
        assert_eq!(retention_months, Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_garbage_values_become_nan() {
        let cli = parse(&["storage", "--tags-per-asset", "lots"]).unwrap();
        let Commands::Storage(args) = cli.command else {
            panic!("expected storage command");
        };
        assert!(args.tags_per_asset.unwrap().is_nan());
        assert!(run_storage(&args, &SizingConfig::default()).total_tags.is_nan());
    }

    #[test]
    fn test_compute_defaults_assets_from_storage_config() {
        let config = SizingConfig::from_toml("[storage]\nassets = 10\n").unwrap();
        let cli = parse(&["compute"]).unwrap();
        let Commands::Compute { assets, retention_months, modules } = cli.command else {
            panic!("expected compute command");
        };
        assert_eq!(assets, None);

        let report = compute_report(assets, retention_months, &modules, &config).unwrap();
        let compute = report.compute.unwrap();
        assert!(report.storage.is_none());
        // 8 + 10 * 0.05
        assert!((compute.base_cores - 8.5).abs() < 1e-9);
        // 100 MB * 6 months + 100 MB * 10 assets * 6 months
        assert_eq!(compute.process_storage_mb, 6600.0);
    }

    #[test]
    fn test_estimate_shares_asset_count() {
        let cli = parse(&[
            "estimate",
            "--assets",
            "10",
            "--retention-months",
            "24",
            "--compute-retention-months",
            "12",
        ])
        .unwrap();
        let Commands::Estimate { storage, compute_retention_months, modules } = cli.command else {
            panic!("expected estimate command");
        };

        let report =
            estimate_report(&storage, compute_retention_months, &modules, &SizingConfig::default())
                .unwrap();
        let storage_result = report.storage.unwrap();
        let compute_result = report.compute.unwrap();

        assert_eq!(storage_result.total_tags, 1500.0);
        assert_eq!(storage_result.total_days, 720.0);
        assert!((compute_result.base_cores - 8.5).abs() < 1e-9);
        // Compute retention is independent: 100 * 12 + 100 * 10 * 12
        assert_eq!(compute_result.process_storage_mb, 13_200.0);
    }

    #[test]
    fn test_module_list_is_comma_split() {
        let modules = module_args(parse(&["compute", "-m", "downtime,traceability"]).unwrap());
        assert_eq!(modules.modules, vec!["downtime", "traceability"]);

        let modules = module_args(
            parse(&["estimate", "--module", "downtime", "--module", "capa_nc"]).unwrap(),
        );
        assert_eq!(modules.modules, vec!["downtime", "capa_nc"]);
    }

    #[test]
    fn test_all_modules_conflicts_with_module() {
        let err = parse(&["compute", "--all-modules", "-m", "downtime"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let modules = module_args(parse(&["compute", "--all-modules"]).unwrap());
        let result = run_compute(4.0, None, &modules, &SizingConfig::default()).unwrap();
        assert_eq!(result.enabled_modules.len(), 11);
    }

    #[test]
    fn test_unknown_module_is_rejected() {
        let modules = module_args(parse(&["compute", "-m", "downtime,bogus"]).unwrap());
        let err = run_compute(4.0, None, &modules, &SizingConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::UnknownModule(id)) if id == "bogus"
        ));
    }

    #[test]
    fn test_compute_uses_form_defaults() {
        let modules = module_args(parse(&["compute"]).unwrap());
        let result = run_compute(4.0, None, &modules, &SizingConfig::default()).unwrap();
        assert_eq!(result.cores, 8.5);
        assert_eq!(result.ram_gb, 16.5);
        assert_eq!(result.process_storage_gb, 3.0);
    }
}
