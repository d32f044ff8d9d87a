use anyhow::Context;
use clap::{Parser, Subcommand};
use facade::DiagnosticDataFacade;
use policy::{DefaultPolicy, FilePolicy};
use resolver::{replay, select_process_kind, PlanExecutor, ReplayForm, Resolver};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "replay-diag")]
#[command(about = "Replay diagnostic data against a validation policy", long_about = None)]
struct Cli {
    /// Log filter directive (e.g. `warn`, `resolver=debug`).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Constraint document used as the default policy instead of the embedded one.
    #[arg(long, global = true, env = "REPLAY_DEFAULT_POLICY")]
    default_policy_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a diagnostic-data file into a validation request and print it as JSON.
    Resolve {
        /// Diagnostic-data XML file.
        diagnostic: PathBuf,
        /// Validation policy XML to use instead of the default policy.
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Use the default policy even if `--policy` is given.
        #[arg(long)]
        default_policy: bool,
        /// Validate at the current time instead of the recorded validation date.
        #[arg(long)]
        reset_date: bool,
    },
    /// Parse a diagnostic-data file and print its structure.
    Check {
        /// Diagnostic-data XML file.
        diagnostic: PathBuf,
    },
    /// Load the default validation policy and print its summary.
    DefaultPolicy,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: .env: {}", e);
        }
    }

    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let default_policy = Arc::new(load_default_policy(cli.default_policy_file.as_deref()));

    match &cli.command {
        Commands::Resolve {
            diagnostic,
            policy,
            default_policy: use_default,
            reset_date,
        } => cmd_resolve(
            default_policy,
            diagnostic,
            policy.as_deref(),
            *use_default,
            *reset_date,
        )?,
        Commands::Check { diagnostic } => cmd_check(diagnostic)?,
        Commands::DefaultPolicy => cmd_default_policy(&default_policy)?,
    }

    Ok(())
}

fn load_default_policy(path: Option<&Path>) -> DefaultPolicy {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "using file-based default policy");
            DefaultPolicy::new(FilePolicy::new(path))
        }
        None => DefaultPolicy::embedded(),
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

fn cmd_resolve(
    default_policy: Arc<DefaultPolicy>,
    diagnostic: &Path,
    policy: Option<&Path>,
    use_default: bool,
    reset_date: bool,
) -> anyhow::Result<()> {
    let diagnostic_bytes = fs::read(diagnostic)
        .with_context(|| format!("Failed to read diagnostic data: {}", diagnostic.display()))?;

    let mut form = ReplayForm::new(diagnostic_bytes).reset_date(reset_date);
    if let Some(policy_path) = policy {
        let policy_bytes = fs::read(policy_path)
            .with_context(|| format!("Failed to read policy: {}", policy_path.display()))?;
        form = form.with_policy(policy_bytes).use_default_policy(use_default);
        if use_default {
            warn!("--default-policy given: ignoring {}", policy_path.display());
        }
    }

    let resolver = Resolver::new(default_policy);
    let summary =
        replay(&resolver, &PlanExecutor, &form).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn cmd_check(diagnostic: &Path) -> anyhow::Result<()> {
    let file = File::open(diagnostic)
        .with_context(|| format!("Failed to open diagnostic data: {}", diagnostic.display()))?;
    let doc = DiagnosticDataFacade::unmarshall(file)
        .map_err(|e| {
            warn!(error = %e, "unable to parse the diagnostic data");
            e
        })
        .context("Error while creating diagnostic data from given file")?;

    let process = select_process_kind(&doc);

    println!("+------------------------------------------+");
    println!("| DIAGNOSTIC DATA                          |");
    println!("+------------------------------------------+");
    println!("| Process        : {:>22} |", process.label());
    println!("| Signatures     : {:>22} |", doc.signatures.len());
    println!("| Certificates   : {:>22} |", doc.used_certificates.len());
    println!(
        "| Validated at   : {:>22} |",
        doc.validation_date.format("%Y-%m-%dT%H:%M:%SZ")
    );
    println!("+------------------------------------------+");

    if let Some(name) = &doc.document_name {
        println!("Document: {name}");
    }
    if process.is_certificate() {
        match process
            .target_certificate_id()
            .and_then(|id| doc.certificate(id))
        {
            Some(target) => println!(
                "Target  : {} ({} chain entries)",
                target.id,
                target.chain_len()
            ),
            None => println!("Target  : none (no certificates recorded)"),
        }
    }

    if !doc.signatures.is_empty() {
        println!("\nSIGNATURES:");
        for signature in &doc.signatures {
            match &signature.signature_filename {
                Some(file) => println!("  {} ({})", signature.id, file),
                None => println!("  {}", signature.id),
            }
        }
    }

    if !doc.used_certificates.is_empty() {
        println!("\nCERTIFICATES:");
        let target = process.target_certificate_id();
        for cert in &doc.used_certificates {
            let marker = if target == Some(cert.id.as_str()) { "*" } else { " " };
            println!(
                " {marker} {} - chain {} [{}]",
                cert.id,
                cert.chain_len(),
                cert.common_name.as_deref().unwrap_or("?")
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// default-policy
// ---------------------------------------------------------------------------

fn cmd_default_policy(default_policy: &DefaultPolicy) -> anyhow::Result<()> {
    let policy = default_policy
        .get()
        .map_err(|_| anyhow::anyhow!("Error while loading the default validation policy"))?;

    println!("Source  : {}", default_policy.describe_source());
    println!("Name    : {}", policy.name);
    if let Some(description) = &policy.description {
        println!("About   : {description}");
    }
    println!("Sections:");
    for section in &policy.constraint_sections {
        println!("  {section}");
    }

    Ok(())
}
