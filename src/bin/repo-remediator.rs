//! repo-remediator CLI
//!
//! Authenticates against the project-management API with TOTP multi-factor
//! credentials, lets the operator pick active projects, and runs the
//! dependency-vulnerability remediation for each one.

use anyhow::Result;
use clap::Parser;
use repo_remediator::core::config::DEFAULT_PAGE_LIMIT;
use repo_remediator::{
    AutoSelector, Credentials, InteractiveSelector, OtpGenerator, ProjectLister, ProjectSelector,
    RemediateError, RemediationRunner, SafeCommandExecutor, TokenAcquirer, mask_token,
};
use secrecy::ExposeSecret;
use std::process;
use std::sync::Arc;

/// Automated dependency-vulnerability remediation for managed project repositories
#[derive(Parser)]
#[command(name = "repo-remediator")]
#[command(version = "0.1.0")]
#[command(
    about = "Automated dependency-vulnerability remediation for managed project repositories",
    long_about = None
)]
struct Cli {
    /// Non-interactive mode (CI): remediate only the first active project
    #[arg(long)]
    non_interactive: bool,

    /// Maximum number of projects to fetch (single page)
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: usize,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            if let Some(error) = e.downcast_ref::<RemediateError>() {
                for action in error.suggested_actions() {
                    eprintln!("  💡 {}", action);
                }
            }
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    println!("\n🛠  repo-remediator\n");

    let credentials = Credentials::from_env()?;
    // Fail fast on a malformed shared secret, before any network call
    let otp_generator = OtpGenerator::new(&credentials.totp_secret)?;

    println!("🔐 Acquiring access token...");
    // The passcode is derived at the moment of use so it cannot expire
    // between process start and the exchange
    let passcode = otp_generator.generate()?;
    let token = TokenAcquirer::new().acquire(&credentials, &passcode).await?;
    println!(
        "  ✅ Token acquired: {} (expires in {}s)\n",
        mask_token(token.access_token.expose_secret()),
        token.expires_in
    );

    println!("📡 Fetching active projects...");
    let projects = ProjectLister::new().list_active(&token, cli.limit).await?;

    if projects.is_empty() {
        println!("  ⚠️  No active projects found");
        return Ok(0);
    }
    println!("  ✅ {} project(s) found\n", projects.len());

    let selector: Box<dyn ProjectSelector> = if cli.non_interactive {
        Box::new(AutoSelector)
    } else {
        Box::new(InteractiveSelector::new())
    };

    let selected = selector.select(&projects).await?;
    if selected.is_empty() {
        println!("\nNo projects selected");
        return Ok(0);
    }

    let workdir = std::env::current_dir()?;
    let executor = Arc::new(SafeCommandExecutor::new());
    let runner = RemediationRunner::new(&workdir, executor);

    let mut reports = Vec::new();
    for project in &selected {
        println!("\n📦 Remediating {}", project.display_label());
        reports.push(runner.remediate(project).await);
    }

    println!("\n📋 Summary:");
    let mut failed = 0;
    for report in &reports {
        if report.success {
            println!(
                "  ✅ {} ({} manifest dir(s), {})",
                report.project_id,
                report.manifest_dirs,
                if report.pushed { "pushed" } else { "no changes" }
            );
        } else {
            failed += 1;
            println!("  ❌ {}", report.project_id);
            for error in &report.errors {
                println!("    - {}", error);
            }
        }
        for failure in &report.fix_failures {
            println!("    ⚠️  {}", failure);
        }
    }

    Ok(if failed == 0 { 0 } else { 1 })
}
