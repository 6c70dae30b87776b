// src/bin/pool_manager.rs

use anyhow::{Context, Result, anyhow, bail};
use solana_sdk::signer::Signer;
use std::env;
use swap_pool::{
    config::{Config, PoolConfig},
    keys::{KeyStore, parse_address},
    orchestrator::{
        PoolAccounts, PoolProvisioner, ProvisionedPool, SlippageGuard, SwapDirection, SwapOrchestrator,
        SwapRequest, fetch_pool_state,
    },
};

const USAGE: &str = "\
Usage :
  pool_manager provision <mint_a> <mint_b>
  pool_manager finalize <authority> <mint_a> <mint_b> <token_a_account> <token_b_account> [fee_owner]
  pool_manager swap <pool> <token_a_account> <token_b_account> <authority> <source> <destination> <pool_mint> <fee_account> <amount_in> <minimum_out> [a-to-b|b-to-a]
  pool_manager inspect <pool>";

fn load_named_keypair(store: &KeyStore, identifier: Option<&String>, variable: &str) -> Result<solana_sdk::signature::Keypair> {
    let identifier = identifier.ok_or_else(|| anyhow!("{} n'est pas défini", variable))?;
    store
        .load_keypair(identifier)
        .with_context(|| format!("Impossible de charger {}", variable))
}

fn load_payer(store: &KeyStore, config: &Config) -> Result<solana_sdk::signature::Keypair> {
    let payer = load_named_keypair(store, config.payer_keypair.as_ref(), "PAYER_KEYPAIR")?;
    println!("Portefeuille Payeur: {}", payer.pubkey());
    Ok(payer)
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Argument manquant : <{}>\n{}", name, USAGE))
}

#[tokio::main]
async fn main() -> Result<()> {
    swap_pool::monitoring::logging::setup_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };

    let config = Config::load()?;
    let rpc_client = config.rpc_client();
    let store = config.key_store();
    let program_id = config.swap_program_id()?;
    println!("Programme de swap : {}", program_id);

    match command.as_str() {
        "provision" => {
            let mint_a = parse_address(arg(&args, 1, "mint_a")?)?;
            let mint_b = parse_address(arg(&args, 2, "mint_b")?)?;
            let payer = load_payer(&store, &config)?;
            let pool_state = load_named_keypair(&store, config.pool_state_keypair.as_ref(), "POOL_STATE_KEYPAIR")?;

            let provisioner = PoolProvisioner::new(&rpc_client, program_id, &payer, &pool_state);
            let (pool, signature) = provisioner.provision(&mint_a, &mint_b).await?;

            println!("\n✅ Phase 1 terminée : {}", signature);
            println!("Compte d'état du pool : {}", pool.pool_state);
            println!("Autorité du pool      : {} (bump {})", pool.authority.address(), pool.authority.bump());
            println!("Vault token A         : {}", pool.token_a_account);
            println!("Vault token B         : {}", pool.token_b_account);
            println!("\nFinancez les deux vaults, puis lancez `finalize`.");
        }
        "finalize" => {
            let authority = parse_address(arg(&args, 1, "authority")?)?;
            let token_a_mint = parse_address(arg(&args, 2, "mint_a")?)?;
            let token_b_mint = parse_address(arg(&args, 3, "mint_b")?)?;
            let token_a_account = parse_address(arg(&args, 4, "token_a_account")?)?;
            let token_b_account = parse_address(arg(&args, 5, "token_b_account")?)?;
            let fee_owner = match args.get(6) {
                Some(literal) => store.static_address(literal)?,
                None => config.fee_owner()?,
            };
            let payer = load_payer(&store, &config)?;
            let pool_state = load_named_keypair(&store, config.pool_state_keypair.as_ref(), "POOL_STATE_KEYPAIR")?;
            let pool_token_account = load_named_keypair(
                &store,
                config.pool_token_account_keypair.as_ref(),
                "POOL_TOKEN_ACCOUNT_KEYPAIR",
            )?;
            let pool_config = PoolConfig::load()?;

            let pool = ProvisionedPool::restore(
                &program_id,
                pool_state.pubkey(),
                &authority,
                token_a_mint,
                token_b_mint,
                token_a_account,
                token_b_account,
            )?;
            let provisioner = PoolProvisioner::new(&rpc_client, program_id, &payer, &pool_state);
            let active = provisioner.finalize(&pool, &fee_owner, &pool_token_account, &pool_config).await?;

            println!("\n✅ Pool actif : {}", active.pool_state);
            println!("Mint LP              : {} (tx {})", active.pool_mint, active.mint_signature);
            println!("Compte de frais      : {}", active.fee_account);
            println!("Compte LP du pool    : {}", active.pool_token_account);
            println!("Signature            : {}", active.signature);
        }
        "swap" => {
            let pool = PoolAccounts::restore(
                &program_id,
                parse_address(arg(&args, 1, "pool")?)?,
                &parse_address(arg(&args, 4, "authority")?)?,
                parse_address(arg(&args, 2, "token_a_account")?)?,
                parse_address(arg(&args, 3, "token_b_account")?)?,
                parse_address(arg(&args, 7, "pool_mint")?)?,
                parse_address(arg(&args, 8, "fee_account")?)?,
            )?;
            let amount_in: u64 = arg(&args, 9, "amount_in")?.parse().context("amount_in invalide")?;
            let minimum_out: u64 = arg(&args, 10, "minimum_out")?.parse().context("minimum_out invalide")?;
            let direction = match args.get(11).map(String::as_str) {
                None | Some("a-to-b") => SwapDirection::AToB,
                Some("b-to-a") => SwapDirection::BToA,
                Some(other) => bail!("Sens de swap inconnu : {}", other),
            };

            let trader = match config.trader_keypair.as_ref() {
                Some(identifier) => store.load_keypair(identifier).context("Impossible de charger TRADER_KEYPAIR")?,
                None => load_payer(&store, &config)?,
            };

            let request = SwapRequest {
                source: parse_address(arg(&args, 5, "source")?)?,
                destination: parse_address(arg(&args, 6, "destination")?)?,
                amount_in,
                guard: SlippageGuard::from_minimum(minimum_out),
                direction,
                host_fee_account: None,
            };
            if request.guard == SlippageGuard::Unprotected {
                println!("⚠️  minimum_out = 0 : aucune protection contre le slippage.");
            }

            let swapper = SwapOrchestrator::new(&rpc_client, program_id);
            let signature = swapper.swap(&pool, &trader, &request).await?;
            println!("\n✅ Swap confirmé : {}", signature);
        }
        "inspect" => {
            let pool = parse_address(arg(&args, 1, "pool")?)?;
            let state = fetch_pool_state(&rpc_client, &pool).await?;
            println!("{:#?}", state);
        }
        other => bail!("Commande inconnue : {}\n{}", other, USAGE),
    }

    Ok(())
}
