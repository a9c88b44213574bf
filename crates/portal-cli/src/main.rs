//! # portal CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Connection settings come from `PORTAL_BASE_URL`, `PORTAL_SESSION_COOKIE`
//! and `PORTAL_TIMEOUT_SECS`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use portal_cli::accounts::{run_accounts, AccountsArgs};
use portal_cli::emi::{run_emi, EmiArgs};
use portal_cli::transfer::{run_transfer, TransferArgs};
use portal_cli::{load_config, EXIT_CONFIG};
use portal_client::PortalClient;
use portal_transfer::TransferFlow;

/// Banking portal CLI
///
/// Transfer funds to SBI, HDFC or ICICI accounts, list funding accounts,
/// and work out loan EMIs.
#[derive(Parser, Debug)]
#[command(name = "portal", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Portal base URL.
    #[arg(long, global = true, env = "PORTAL_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive three-step fund transfer.
    Transfer(TransferArgs),

    /// List funding accounts and balances.
    Accounts(AccountsArgs),

    /// Loan EMI with the first-year amortization schedule.
    Emi(EmiArgs),
}

fn connect(base_url: Option<&str>) -> Result<PortalClient, u8> {
    let client = load_config(base_url)
        .map_err(portal_client::PortalApiError::from)
        .and_then(PortalClient::new);
    client.map_err(|e| {
        tracing::error!("{e}");
        eprintln!("{e}");
        EXIT_CONFIG
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("portal CLI starting");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let base_url = cli.base_url.as_deref();

    let result = match cli.command {
        Commands::Emi(args) => run_emi(&args, &mut stdout.lock()),
        Commands::Accounts(args) => match connect(base_url) {
            Ok(client) => run_accounts(&client, &args, &mut stdout.lock()).await,
            Err(code) => Ok(code),
        },
        Commands::Transfer(args) => match connect(base_url) {
            Ok(client) => {
                let mut flow = TransferFlow::new(client);
                run_transfer(&mut flow, &args, &mut stdin.lock(), &mut stdout.lock()).await
            }
            Err(code) => Ok(code),
        },
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_transfer_with_flags() {
        let cli = Cli::try_parse_from([
            "portal",
            "transfer",
            "--account",
            "1234567890",
            "--ifsc",
            "HDFC0000123",
            "--amount",
            "500",
        ])
        .unwrap();
        if let Commands::Transfer(args) = cli.command {
            assert_eq!(args.account.as_deref(), Some("1234567890"));
            assert_eq!(args.ifsc.as_deref(), Some("HDFC0000123"));
            assert_eq!(args.amount.as_deref(), Some("500"));
        } else {
            panic!("expected transfer");
        }
    }

    #[test]
    fn cli_parse_transfer_without_flags() {
        let cli = Cli::try_parse_from(["portal", "transfer"]).unwrap();
        if let Commands::Transfer(args) = cli.command {
            assert!(args.account.is_none());
            assert!(args.ifsc.is_none());
            assert!(args.amount.is_none());
        }
    }

    #[test]
    fn cli_parse_accounts_json() {
        let cli = Cli::try_parse_from(["portal", "accounts", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Accounts(AccountsArgs { json: true })));
    }

    #[test]
    fn cli_parse_emi() {
        let cli = Cli::try_parse_from([
            "portal",
            "emi",
            "--principal",
            "1000000",
            "--rate",
            "8.5",
            "--tenure",
            "240",
        ])
        .unwrap();
        if let Commands::Emi(args) = cli.command {
            assert_eq!(args.principal, 1_000_000.0);
            assert_eq!(args.rate, 8.5);
            assert_eq!(args.tenure, 240);
            assert!(!args.json);
        }
    }

    #[test]
    fn cli_parse_emi_requires_tenure() {
        assert!(Cli::try_parse_from(["portal", "emi", "--principal", "1", "--rate", "1"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "portal",
            "accounts",
            "-vv",
            "--base-url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn cli_base_url_reads_portal_base_url() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "base_url")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("PORTAL_BASE_URL")));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["portal"]).is_err());
    }
}
