//! Command-line tool for deploying and inspecting the LandRegistry contract.

use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::Address;
use clap::{Parser, Subcommand};

use land_registry::blockchain::contract::configured_address;
use land_registry::blockchain::deploy::{deploy, ContractArtifact};
use land_registry::blockchain::transaction::TxSender;
use land_registry::blockchain::types::LOCAL_CHAIN_ID;
use land_registry::blockchain::wallet::DEV_ACCOUNT_KEYS;
use land_registry::blockchain::{BlockchainClient, BlockchainResult, LandLedger, LandRegistryContract, Wallet};
use land_registry::config::{load_or_default, RegistryConfig};
use land_registry::observability::logging;
use land_registry::registry::{all_lands, owned_lands};

/// Address funded by `fund` and expected as admin by `verify-setup`.
const DEFAULT_ADMIN: &str = "0xcd3B766CCDd6AE721141F452C550Ca635964ce71";
/// Deployment checked by `verify-setup` when none is configured.
const DEFAULT_CONTRACT: &str = "0x162459Bb429a63D2e31Fe2d1cdb5b058f2D31AdF";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "registry-cli")]
#[command(about = "Deploy and inspect the LandRegistry contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the RPC endpoint.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Sign with development account N instead of the environment key.
    #[arg(long, global = true)]
    account: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the contract and record its address in the artifact
    Deploy {
        /// Compiled artifact to deploy
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Where to write the artifact with its address (defaults to --artifact)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Deploy from the development account with this address
        #[arg(long)]
        admin: Option<Address>,
    },
    /// Send ETH to an address
    Fund {
        #[arg(long, default_value = DEFAULT_ADMIN)]
        to: Address,
        /// Amount in ETH
        #[arg(long, default_value = "1000")]
        amount: String,
    },
    /// List the development accounts and their balances
    Accounts {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Check that a deployment exists, is funded and has the expected admin
    VerifySetup {
        #[arg(long)]
        contract: Option<Address>,
        #[arg(long, default_value = DEFAULT_ADMIN)]
        admin: Address,
    },
    /// Read lands from the contract
    Land {
        #[command(subcommand)]
        query: LandQuery,
    },
}

#[derive(Subcommand)]
enum LandQuery {
    /// Show one land
    Get { id: u64 },
    /// Lands owned by an address
    Owned { owner: Address },
    /// Every land in the scan range
    All,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<bool> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.rpc_url {
        config.blockchain.rpc_url = url;
    }
    logging::init_logging(&config.observability);
    let client = BlockchainClient::connect_lazy(config.blockchain.clone())?;

    match cli.command {
        Commands::Deploy { artifact, out, admin } => {
            run_deploy(&config, &client, cli.account, artifact, out, admin).await
        }
        Commands::Fund { to, amount } => run_fund(&client, cli.account, to, &amount).await,
        Commands::Accounts { count } => run_accounts(&client, count).await,
        Commands::VerifySetup { contract, admin } => run_verify(&config, &client, contract, admin).await,
        Commands::Land { query } => run_land(&config, &client, cli.account, query).await,
    }
}

/// The explicit development account, else the environment key, else account 0 on a local chain.
fn signer(chain_id: u64, account: Option<usize>) -> BlockchainResult<Wallet> {
    match account {
        Some(index) => Wallet::dev_account(index, chain_id),
        None => Wallet::from_env(chain_id).or_else(|e| {
            if chain_id == LOCAL_CHAIN_ID {
                Wallet::dev_account(0, chain_id)
            } else {
                Err(e)
            }
        }),
    }
}

fn dev_account_with_address(address: Address, chain_id: u64) -> Option<Wallet> {
    (0..DEV_ACCOUNT_KEYS.len())
        .filter_map(|i| Wallet::dev_account(i, chain_id).ok())
        .find(|w| w.address() == address)
}

async fn run_deploy(
    config: &RegistryConfig,
    client: &BlockchainClient,
    account: Option<usize>,
    artifact: Option<PathBuf>,
    out: Option<PathBuf>,
    admin: Option<Address>,
) -> CliResult<bool> {
    let chain_id = config.blockchain.chain_id;
    let artifact_path = artifact.unwrap_or_else(|| PathBuf::from(&config.blockchain.artifact_path));
    let out_path = out.unwrap_or_else(|| artifact_path.clone());

    println!("Deploying LandRegistry contract...");
    let wallet = match admin {
        Some(target) => {
            println!("Target admin: {}", target);
            match dev_account_with_address(target, chain_id) {
                Some(wallet) => wallet,
                None => {
                    println!("Target admin is not a development account, using the default signer");
                    signer(chain_id, account)?
                }
            }
        }
        None => signer(chain_id, account)?,
    };
    println!("Deployer: {}", wallet.address());

    let contract = ContractArtifact::load(&artifact_path)?;
    let deployment = deploy(client, &wallet, &contract).await?;
    contract.save_with_address(&out_path, deployment.address)?;

    println!("LandRegistry deployed to: {}", deployment.address);
    println!("Artifact written to: {}", out_path.display());
    println!();
    println!("Summary:");
    println!("  Contract Address: {}", deployment.address);
    println!("  Admin Address:    {}", deployment.admin);
    println!("  Transaction:      {}", deployment.tx_hash);
    println!("  Chain ID:         {}", chain_id);
    Ok(true)
}

async fn run_fund(client: &BlockchainClient, account: Option<usize>, to: Address, amount: &str) -> CliResult<bool> {
    let value = parse_ether(amount)?;
    println!("Funding account {} with {} ETH...", to, amount);

    let wallet = signer(client.config().chain_id, account)?;
    let sender = TxSender::new(client.clone(), wallet)?;
    let outcome = sender.send_value(to, value).await?;
    let balance = client.get_balance(to).await?;

    println!("Successfully funded!");
    println!("Address:     {}", to);
    println!("Balance:     {} ETH", format_ether(balance));
    println!("Transaction: {}", outcome.tx_hash);
    Ok(true)
}

async fn run_accounts(client: &BlockchainClient, count: usize) -> CliResult<bool> {
    let chain_id = client.config().chain_id;
    let show_keys = chain_id == LOCAL_CHAIN_ID;
    println!("Development accounts:");
    println!("{}", "=".repeat(80));

    for (i, key) in DEV_ACCOUNT_KEYS.iter().take(count).enumerate() {
        let wallet = Wallet::from_private_key(key, chain_id)?;
        let balance = match client.get_balance(wallet.address()).await {
            Ok(balance) => format!("{} ETH", format_ether(balance)),
            Err(_) => "unavailable".to_string(),
        };
        println!("Account #{}:", i);
        println!("  Address: {}", wallet.address());
        println!("  Balance: {}", balance);
        if show_keys {
            println!("  Private Key: {}", key);
        }
        println!();
    }
    Ok(true)
}

async fn run_verify(
    config: &RegistryConfig,
    client: &BlockchainClient,
    contract: Option<Address>,
    admin: Address,
) -> CliResult<bool> {
    let contract = match contract {
        Some(address) => address,
        None => configured_address(&config.blockchain.contract_address)
            .or_else(|_| DEFAULT_CONTRACT.parse())?,
    };
    let mut ok = true;

    println!("Verifying setup...");
    println!();
    println!("Contract Information:");
    println!("  Contract Address: {}", contract);
    println!("  Expected Admin:   {}", admin);

    match client.get_code(contract).await {
        Ok(code) if code.is_empty() => {
            println!("Contract not found! Need to redeploy.");
            return Ok(false);
        }
        Ok(_) => println!("Contract exists on network"),
        Err(e) => {
            println!("Error checking contract: {}", e);
            return Ok(false);
        }
    }

    match client.get_balance(admin).await {
        Ok(balance) => {
            println!("Admin Balance: {} ETH", format_ether(balance));
            if balance.is_zero() {
                println!("Admin needs funds");
                ok = false;
            } else {
                println!("Admin has sufficient funds");
            }
        }
        Err(e) => {
            println!("Error checking balance: {}", e);
            ok = false;
        }
    }

    let wallet = signer(client.config().chain_id, None)?;
    let registry = LandRegistryContract::new(client.clone(), &wallet, contract)?;
    match registry.admin().await {
        Ok(actual) => {
            println!("Actual Contract Admin: {}", actual);
            if actual == admin {
                println!("Admin address matches!");
            } else {
                println!("Admin address mismatch!");
                ok = false;
            }
        }
        Err(e) => {
            println!("Error connecting to contract: {}", e);
            ok = false;
        }
    }

    println!();
    println!("Network Details:");
    println!("  RPC URL:  {}", client.config().rpc_url);
    println!("  Chain ID: {}", client.config().chain_id);
    Ok(ok)
}

async fn run_land(
    config: &RegistryConfig,
    client: &BlockchainClient,
    account: Option<usize>,
    query: LandQuery,
) -> CliResult<bool> {
    let wallet = signer(config.blockchain.chain_id, account)?;
    let registry = LandRegistryContract::from_config(client.clone(), &wallet)?;
    let limit = config.blockchain.land_scan_limit;

    let lands = match query {
        LandQuery::Get { id } => {
            let land = registry.get_land(id).await?;
            if !land.exists() {
                eprintln!("Land {} not found", id);
                return Ok(false);
            }
            vec![land]
        }
        LandQuery::Owned { owner } => owned_lands(&registry, owner, limit).await,
        LandQuery::All => all_lands(&registry, limit).await,
    };
    println!("{}", serde_json::to_string_pretty(&lands)?);
    Ok(true)
}
