use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqlentity_codegen::{EntityGenerator, GeneratorOptions};
use sqlentity_core::config::DEFAULT_CONFIG_FILE;
use sqlentity_core::{Config, PersistenceApi, Report, Severity};
use sqlentity_sql::SchemaParser;

/// sqlentity - Generate JPA entity classes from SQL CREATE TABLE statements
#[derive(Parser, Debug)]
#[command(name = "sqlentity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL file with CREATE TABLE statements
    sql_file: Option<PathBuf>,

    /// Java package of the generated classes (default: com.example.entities)
    package: Option<String>,

    /// Directory receiving the generated files (default: ./generated-entities)
    output_dir: Option<PathBuf>,

    /// Path to config file (default: sqlentity.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save a JSON report of diagnostics and generated files
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Worker threads used to parse table bodies
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Use jakarta.persistence instead of javax.persistence
    #[arg(long)]
    jakarta: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(sql_file) = cli.sql_file.clone() else {
        // Nothing to do: show usage, still a successful run
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    if let Err(err) = run(&cli, &sql_file) {
        tracing::error!("{:?}", err);
        eprintln!("{} {:#}", "Error generating entities:".red().bold(), err);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load config, parse the SQL file, write entities and report
fn run(cli: &Cli, sql_file: &Path) -> Result<Report> {
    let config = load_config(cli)?;

    if cli.verbose {
        eprintln!("{} {}", "Package:".cyan(), config.package);
        eprintln!("{} {}", "Output directory:".cyan(), config.output_dir.display());
        eprintln!("{} {}", "Persistence API:".cyan(), config.persistence.package());
    }

    let parser = SchemaParser::new()
        .with_mapper(config.type_mapper())
        .with_jobs(config.jobs);
    let outcome = parser
        .parse_file(sql_file)
        .with_context(|| format!("Failed to load schema from {}", sql_file.display()))?;

    for table in &outcome.schema.tables {
        println!("{} {} ({} columns)", "Table found:".cyan(), table.name, table.columns.len());
    }

    let generator = EntityGenerator::new(GeneratorOptions::from_config(&config))
        .context("Failed to prepare entity template")?;
    let written = generator
        .write_all(&outcome.schema, &config.output_dir)
        .with_context(|| format!("Failed to write entities to {}", config.output_dir.display()))?;

    for path in &written {
        println!("{} {}", "Entity generated:".green(), path.display());
    }

    let mut report = Report::from_diagnostics(outcome.diagnostics).with_input(sql_file.display().to_string());
    report.set_generated(
        outcome.schema.len(),
        written.iter().map(|p| p.display().to_string()).collect(),
    );

    if let Some(report_path) = &cli.report {
        report
            .save_to_file(report_path)
            .with_context(|| format!("Failed to save report to {}", report_path.display()))?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), report_path.display());
        }
    }

    print_report_summary(&report, &config.output_dir);

    Ok(report)
}

/// Config file (explicit, then sqlentity.toml, then defaults) with CLI overrides applied
fn load_config(cli: &Cli) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);

    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if default_path.exists() {
        Config::from_file(default_path)
            .with_context(|| format!("Failed to load config {}", default_path.display()))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if let Some(package) = &cli.package {
        config.package = package.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }
    if cli.jakarta {
        config.persistence = PersistenceApi::Jakarta;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_report_summary(report: &Report, output_dir: &Path) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Entity Generation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{}", "Summary:".bold());
    println!("  Tables parsed:      {}", report.summary.tables_parsed);
    println!("  Entities generated: {}", report.summary.entities_generated);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);
            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }
        }
    }

    println!();
    println!(
        "Generation complete! {} entities created in: {}",
        report.summary.entities_generated,
        output_dir.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "\
CREATE TABLE departments (id INT PRIMARY KEY AUTO_INCREMENT, name VARCHAR(80) NOT NULL);
CREATE TABLE employees (
    id INT PRIMARY KEY AUTO_INCREMENT,
    department_id INT,
    nickname,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);
";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sqlentity").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positionals_and_flags() {
        let cli = cli(&["schema.sql", "com.acme", "out", "--jobs", "4", "--jakarta", "-r", "report.json"]);

        assert_eq!(cli.sql_file, Some(PathBuf::from("schema.sql")));
        assert_eq!(cli.package.as_deref(), Some("com.acme"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.jobs, Some(4));
        assert!(cli.jakarta);
        assert_eq!(cli.report, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn sql_file_is_optional() {
        assert!(cli(&[]).sql_file.is_none());
    }

    #[test]
    fn cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "package = \"org.file\"\noutput_dir = \"from-file\"\njobs = 2\n").unwrap();

        let config = load_config(&cli(&[
            "schema.sql",
            "org.cli",
            "--config",
            config_path.to_str().unwrap(),
            "--jakarta",
        ]))
        .unwrap();

        assert_eq!(config.package, "org.cli");
        assert_eq!(config.output_dir, PathBuf::from("from-file"));
        assert_eq!(config.jobs, 2);
        assert_eq!(config.persistence, PersistenceApi::Jakarta);
    }

    #[test]
    fn invalid_package_is_rejected() {
        assert!(load_config(&cli(&["schema.sql", "com.1bad"])).is_err());
    }

    #[test]
    fn run_generates_entities_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let sql_path = dir.path().join("schema.sql");
        let out = dir.path().join("entities");
        let report_path = dir.path().join("report.json");
        std::fs::write(&sql_path, SCHEMA).unwrap();

        let cli = cli(&[
            sql_path.to_str().unwrap(),
            "com.acme.hr",
            out.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
            "--jobs",
            "2",
        ]);
        let report = run(&cli, &sql_path).unwrap();

        assert_eq!(report.summary.tables_parsed, 2);
        assert_eq!(report.summary.entities_generated, 2);
        assert_eq!(report.summary.warnings, 1);
        assert!(!report.has_errors());

        let employees = std::fs::read_to_string(out.join("Employees.java")).unwrap();
        assert!(employees.starts_with("package com.acme.hr;"));
        assert!(employees.contains("private Departments departments;"));
        assert!(!employees.contains("nickname"));

        let saved = std::fs::read_to_string(&report_path).unwrap();
        assert!(saved.contains("COLUMN_UNPARSEABLE"));
        assert!(saved.contains("Employees.java"));
    }

    #[test]
    fn missing_sql_file_is_an_error_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.sql");
        let cli = cli(&[missing.to_str().unwrap(), "com.acme", dir.path().to_str().unwrap()]);

        let err = run(&cli, &missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load schema"));
    }
}
