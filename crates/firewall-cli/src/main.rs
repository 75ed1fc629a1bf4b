//! Action Firewall CLI - console for the authorization engine
//!
//! Drives the full workflow locally: create an AdminCap, create and fund a
//! vault, issue a scoped permission to an agent, propose a transfer, and
//! execute it through the firewall. Engine state round-trips through a JSON
//! file between invocations.
//!
//! # Quick Start
//!
//! ```bash
//! firewall admin create
//! firewall vault create --admin <admin-id>
//! firewall vault deposit --vault <vault-id> --amount 10
//! firewall permission issue --admin <admin-id> --vault <vault-id> \
//!     --agent <address> --max-per-transfer 5 --total-quota 10
//! firewall proposal create --permission <perm-id> --caller <address> \
//!     --recipient <address> --amount 3
//! firewall proposal execute --vault <vault-id> --permission <perm-id> \
//!     --proposal <prop-id>
//! ```
//!
//! Amounts are decimal coin strings (9 decimal places); quota and expiry
//! accept 0 for unlimited / no expiry.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod display;
mod store;

use store::StateStore;

/// Action Firewall - scoped, revocable transfer permissions for agents
#[derive(Parser)]
#[command(name = "firewall")]
#[command(version)]
#[command(about = "Capability firewall console: vaults, permissions, two-phase transfers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine state file (default: ~/.firewall/state.json, or $FIREWALL_STATE)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage administrator credentials
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Create, fund, and inspect vaults
    Vault {
        #[command(subcommand)]
        action: VaultCommands,
    },

    /// Issue, revoke, and inspect permissions
    Permission {
        #[command(subcommand)]
        action: PermissionCommands,
    },

    /// Propose and execute transfers
    Proposal {
        #[command(subcommand)]
        action: ProposalCommands,
    },

    /// Show the execution audit trail
    Transfers {
        /// Number of entries to show (newest first)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Run a scripted walk-through of the full workflow and every denial
    Demo,

    /// Show object counts and the state file location
    Status,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Mint a new AdminCap
    Create,
}

#[derive(Subcommand)]
enum VaultCommands {
    /// Create an empty vault (requires an AdminCap)
    Create {
        /// AdminCap ID
        #[arg(long)]
        admin: String,
    },

    /// Deposit into a vault (no authorization required)
    Deposit {
        /// Vault ID
        #[arg(long)]
        vault: String,

        /// Amount in coins, e.g. 0.5
        #[arg(long)]
        amount: String,
    },

    /// Show a vault's balance and its permissions
    Info {
        /// Vault ID
        #[arg(long)]
        vault: String,
    },
}

#[derive(Subcommand)]
enum PermissionCommands {
    /// Issue a scoped spending permission to an agent
    Issue {
        /// AdminCap ID
        #[arg(long)]
        admin: String,

        /// Vault ID to issue against
        #[arg(long)]
        vault: String,

        /// Agent address (0x + 64 hex chars)
        #[arg(long)]
        agent: String,

        /// Per-transfer cap in coins (must be > 0)
        #[arg(long)]
        max_per_transfer: String,

        /// Cumulative quota in coins (0 = unlimited)
        #[arg(long, default_value = "0")]
        total_quota: String,

        /// Expiry in minutes from now (0 = never)
        #[arg(long, default_value = "0")]
        expires_in_mins: u64,
    },

    /// Revoke a permission (irreversible)
    Revoke {
        /// AdminCap ID
        #[arg(long)]
        admin: String,

        /// Permission ID
        #[arg(long)]
        permission: String,
    },

    /// Show a permission's limits, usage, and proposals
    Info {
        /// Permission ID
        #[arg(long)]
        permission: String,
    },
}

#[derive(Subcommand)]
enum ProposalCommands {
    /// Propose a transfer under a permission (agent only)
    Create {
        /// Permission ID
        #[arg(long)]
        permission: String,

        /// Calling agent address
        #[arg(long)]
        caller: String,

        /// Recipient address
        #[arg(long)]
        recipient: String,

        /// Amount in coins
        #[arg(long)]
        amount: String,
    },

    /// Execute a pending proposal
    Execute {
        /// Vault ID
        #[arg(long)]
        vault: String,

        /// Permission ID
        #[arg(long)]
        permission: String,

        /// Proposal ID
        #[arg(long)]
        proposal: String,
    },

    /// Show a proposal
    Info {
        /// Proposal ID
        #[arg(long)]
        proposal: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = StateStore::resolve(cli.state_file);

    match cli.command {
        Commands::Admin { action } => match action {
            AdminCommands::Create => commands::admin::create(&store).await?,
        },

        Commands::Vault { action } => match action {
            VaultCommands::Create { admin } => commands::vault::create(&store, &admin).await?,
            VaultCommands::Deposit { vault, amount } => {
                commands::vault::deposit(&store, &vault, &amount).await?
            }
            VaultCommands::Info { vault } => commands::vault::info(&store, &vault).await?,
        },

        Commands::Permission { action } => match action {
            PermissionCommands::Issue {
                admin,
                vault,
                agent,
                max_per_transfer,
                total_quota,
                expires_in_mins,
            } => {
                commands::permission::issue(
                    &store,
                    &admin,
                    &vault,
                    &agent,
                    &max_per_transfer,
                    &total_quota,
                    expires_in_mins,
                )
                .await?
            }
            PermissionCommands::Revoke { admin, permission } => {
                commands::permission::revoke(&store, &admin, &permission).await?
            }
            PermissionCommands::Info { permission } => {
                commands::permission::info(&store, &permission).await?
            }
        },

        Commands::Proposal { action } => match action {
            ProposalCommands::Create {
                permission,
                caller,
                recipient,
                amount,
            } => commands::proposal::create(&store, &permission, &caller, &recipient, &amount).await?,
            ProposalCommands::Execute {
                vault,
                permission,
                proposal,
            } => commands::proposal::execute(&store, &vault, &permission, &proposal).await?,
            ProposalCommands::Info { proposal } => {
                commands::proposal::info(&store, &proposal).await?
            }
        },

        Commands::Transfers { limit } => commands::status::transfers(&store, limit).await?,

        Commands::Demo => commands::demo::run().await?,

        Commands::Status => commands::status::show(&store).await?,
    }

    Ok(())
}
