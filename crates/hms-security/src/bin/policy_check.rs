use anyhow::Context;
use clap::{Parser, Subcommand};
use hms_security::{
    AccessPolicy, EngineConfig, PolicyEngine, PolicyTables, RouteGuard, RouteMatchStrategy,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Query the hospital access-control policy from the command line.
#[derive(Parser)]
#[command(name = "policy_check", about = "Evaluate role-based access decisions")]
struct Args {
    /// JSON policy tables to use instead of HMS_POLICY_TABLES or the defaults
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Wildcard route resolution: longest-prefix or first-declared
    #[arg(long, global = true, value_parser = parse_route_match)]
    route_match: Option<RouteMatchStrategy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// May ROLE perform ACTION on RESOURCE?
    Permission {
        role: String,
        resource: String,
        action: String,
    },
    /// May ROLE navigate to PATH?
    Route { role: String, path: String },
    /// Is FEATURE enabled for ROLE?
    Feature { role: String, feature: String },
    /// Does ROLE_A rank above ROLE_B?
    Compare { role_a: String, role_b: String },
    /// List ROLE's resource grants
    Permissions { role: String },
    /// List the route patterns open to ROLE
    Routes { role: String },
    /// Run the navigation guard; omit --role for an anonymous visitor
    Guard {
        #[arg(long)]
        role: Option<String>,
        path: String,
    },
    /// Validate a JSON policy tables file
    Validate { file: PathBuf },
    /// Print the active tables as JSON
    Dump,
}

fn parse_route_match(value: &str) -> Result<RouteMatchStrategy, String> {
    value.parse().map_err(|e: hms_security::SecurityError| e.to_string())
}

fn engine_for(args: &Args) -> anyhow::Result<PolicyEngine> {
    let mut config = EngineConfig::from_env().context("reading engine configuration")?;
    if let Some(path) = &args.tables {
        config.tables_path = Some(path.clone());
    }
    if let Some(route_match) = args.route_match {
        config.route_match = route_match;
    }
    PolicyEngine::from_config(&config).context("loading policy tables")
}

fn run(args: &Args) -> anyhow::Result<Value> {
    let engine = || engine_for(args);
    let output = match &args.command {
        Command::Permission {
            role,
            resource,
            action,
        } => json!({ "allowed": engine()?.has_permission(role, resource, action) }),
        Command::Route { role, path } => {
            json!({ "allowed": engine()?.can_access_route(role, path) })
        }
        Command::Feature { role, feature } => {
            json!({ "allowed": engine()?.has_feature_access(role, feature) })
        }
        Command::Compare { role_a, role_b } => {
            json!({ "higher": engine()?.is_higher_role(role_a, role_b) })
        }
        Command::Permissions { role } => serde_json::to_value(engine()?.get_role_permissions(role))?,
        Command::Routes { role } => json!(engine()?.get_accessible_routes(role)),
        Command::Guard { role, path } => {
            let guard = RouteGuard::new(engine()?);
            serde_json::to_value(guard.check(role.as_deref(), path))?
        }
        Command::Validate { file } => {
            let tables = PolicyTables::from_path(file)
                .with_context(|| format!("validating {}", file.display()))?;
            json!({
                "valid": true,
                "roles": tables.hierarchy.len(),
                "routes": tables.routes.len(),
            })
        }
        Command::Dump => serde_json::to_value(engine()?.tables())?,
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let output = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
