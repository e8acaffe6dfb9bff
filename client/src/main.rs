use anyhow::{format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use staking_sdk::transaction::staking::RegisterRewardParams;
use staking_sdk::{Network, RewardAssetConfig, StakingConfig};
use tracing_subscriber::EnvFilter;

mod instructions;
use instructions::admin_instructions::*;
use instructions::staking_instructions::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    network: Network,
    wallet: String,
    snapshot_path: String,
    reward_assets: Option<Vec<RewardAssetConfig>>,
}

impl ClientConfig {
    pub fn staking_config(&self) -> StakingConfig {
        let config = StakingConfig::new(self.network);
        match &self.reward_assets {
            Some(reward_assets) => config.with_reward_assets(reward_assets.clone()),
            None => config,
        }
    }
}

fn required(config: &Ini, section: &str, key: &str) -> Result<String> {
    match config.get(section, key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(format_err!("{section}.{key} must not be empty")),
    }
}

fn load_reward_asset(config: &Ini, symbol: &str) -> Result<RewardAssetConfig> {
    let section = format!("reward_{symbol}");
    let asset_type = required(config, &section, "asset_type")?;
    let symbol = config
        .get(&section, "symbol")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| symbol.to_uppercase());
    let decimals: u8 = required(config, &section, "decimals")?
        .parse()
        .map_err(|e| format_err!("{section}.decimals: {e}"))?;
    let monthly_reward: u64 = match config.get(&section, "monthly_reward") {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| format_err!("{section}.monthly_reward: {e}"))?,
        _ => 0,
    };
    Ok(RewardAssetConfig::new(
        &asset_type,
        &symbol,
        decimals,
        monthly_reward,
    ))
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {client_config}: {e}"))?;

    let network: Network = required(&config, "Global", "network")?.parse()?;
    let wallet = config.get("Global", "wallet").unwrap_or_default();
    let snapshot_path = required(&config, "Global", "snapshot_path")?;

    let reward_assets = match config.get("Global", "reward_assets") {
        Some(list) if !list.trim().is_empty() => Some(
            list.split(',')
                .map(str::trim)
                .filter(|symbol| !symbol.is_empty())
                .map(|symbol| load_reward_asset(&config, &symbol.to_lowercase()))
                .collect::<Result<Vec<_>>>()?,
        ),
        _ => None,
    };

    Ok(ClientConfig {
        network,
        wallet: wallet.trim().to_string(),
        snapshot_path,
        reward_assets,
    })
}

#[derive(Debug, Parser)]
pub struct Opts {
    /// Path of the client configuration.
    #[arg(long, default_value = "client_config.ini")]
    pub config: String,
    #[clap(subcommand)]
    pub command: StakingCommands,
}

#[derive(Debug, Parser)]
pub enum StakingCommands {
    /// Circulating and total supply of the stake asset.
    Supply,
    Coins {
        #[arg(long)]
        asset_type: String,
        #[arg(long)]
        refresh: bool,
    },
    /// Show how `amount` would be assembled from the wallet's records.
    Select {
        #[arg(long)]
        asset_type: String,
        #[arg(long)]
        amount: u128,
    },
    Summary {
        #[arg(long)]
        wallet: Option<String>,
    },
    PendingReward {
        #[arg(long)]
        position: String,
        #[arg(long)]
        asset_type: String,
    },
    Stake {
        #[arg(long)]
        amount: u128,
        #[arg(long)]
        asset_type: Option<String>,
        #[arg(long)]
        position: Option<String>,
    },
    Unstake {
        #[arg(long)]
        position: String,
        #[arg(long)]
        amount: u128,
    },
    Claim {
        #[arg(long)]
        position: String,
        #[arg(long)]
        asset_type: String,
    },
    Close {
        #[arg(long)]
        position: String,
    },
    StartStaking,
    StopStaking,
    UpdateVersion {
        #[arg(long)]
        version: u64,
    },
    RegisterReward {
        #[arg(long)]
        asset_type: String,
        /// Reward units emitted per millisecond.
        #[arg(long)]
        emission_rate: u64,
        #[arg(long)]
        start_time: u64,
        #[arg(long)]
        end_time: u64,
    },
    DepositReward {
        #[arg(long)]
        asset_type: String,
        #[arg(long)]
        amount: u128,
    },
    /// Withdraw reward reserve to `recipient`, the wallet by default.
    WithdrawReward {
        #[arg(long)]
        asset_type: String,
        #[arg(long)]
        amount: u128,
        #[arg(long)]
        recipient: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let client_config = load_cfg(&opts.config)?;

    match opts.command {
        StakingCommands::Supply => {
            print_json(&supply_report())?;
        }
        StakingCommands::Coins {
            asset_type,
            refresh,
        } => {
            let coins = coins_instr(&client_config, &asset_type, refresh).await?;
            print_json(&coins)?;
        }
        StakingCommands::Select { asset_type, amount } => {
            let selection = select_instr(&client_config, &asset_type, amount).await?;
            print_json(&selection)?;
        }
        StakingCommands::Summary { wallet } => {
            let summary = summary_instr(&client_config, wallet.as_deref()).await?;
            print_json(&summary)?;
        }
        StakingCommands::PendingReward {
            position,
            asset_type,
        } => {
            let rewards = pending_reward_instr(&client_config, &position, &asset_type).await?;
            print_json(&rewards)?;
        }
        StakingCommands::Stake {
            amount,
            asset_type,
            position,
        } => {
            let plan = stake_instr(
                &client_config,
                amount,
                asset_type.as_deref(),
                position.as_deref(),
            )
            .await?;
            print_json(&plan)?;
        }
        StakingCommands::Unstake { position, amount } => {
            let plan = unstake_instr(&client_config, &position, amount)?;
            print_json(&plan)?;
        }
        StakingCommands::Claim {
            position,
            asset_type,
        } => {
            let plan = claim_instr(&client_config, &position, &asset_type)?;
            print_json(&plan)?;
        }
        StakingCommands::Close { position } => {
            let plan = close_instr(&client_config, &position)?;
            print_json(&plan)?;
        }
        StakingCommands::StartStaking => {
            print_json(&start_staking_instr(&client_config)?)?;
        }
        StakingCommands::StopStaking => {
            print_json(&stop_staking_instr(&client_config)?)?;
        }
        StakingCommands::UpdateVersion { version } => {
            print_json(&update_version_instr(&client_config, version)?)?;
        }
        StakingCommands::RegisterReward {
            asset_type,
            emission_rate,
            start_time,
            end_time,
        } => {
            let params = RegisterRewardParams {
                asset_type,
                emission_rate,
                start_time,
                end_time,
            };
            let plan = register_reward_instr(&client_config, &params)?;
            print_json(&plan)?;
        }
        StakingCommands::DepositReward { asset_type, amount } => {
            let plan = deposit_reward_instr(&client_config, &asset_type, amount).await?;
            print_json(&plan)?;
        }
        StakingCommands::WithdrawReward {
            asset_type,
            amount,
            recipient,
        } => {
            let plan =
                withdraw_reward_instr(&client_config, &asset_type, amount, recipient.as_deref())?;
            print_json(&plan)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("staking-client-{}-{name}.ini", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_reward_assets_in_listed_order() {
        let path = write_config(
            "rewards",
            "[Global]\nnetwork = testnet\nwallet = 0xa11ce\nsnapshot_path = snapshot.json\nreward_assets = wal, blub\n\n\
             [reward_blub]\nasset_type = 0xb::blub::BLUB\ndecimals = 2\nmonthly_reward = 200\n\n\
             [reward_wal]\nasset_type = 0xc::wal::WAL\nsymbol = WAL\ndecimals = 9\n",
        );
        let config = load_cfg(&path).unwrap();
        assert_eq!(config.network, Network::Testnet);
        let staking = config.staking_config();
        let symbols: Vec<&str> = staking
            .reward_assets
            .iter()
            .map(|asset| asset.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["WAL", "BLUB"]);
        assert_eq!(staking.reward_assets[1].monthly_reward, 200);
    }

    #[test]
    fn defaults_reward_assets_and_rejects_empty_keys() {
        let path = write_config(
            "defaults",
            "[Global]\nnetwork = mainnet\nwallet =\nsnapshot_path = snapshot.json\n",
        );
        let config = load_cfg(&path).unwrap();
        assert!(config.wallet.is_empty());
        assert_eq!(config.staking_config().reward_assets.len(), 3);

        let path = write_config(
            "missing",
            "[Global]\nnetwork = mainnet\nsnapshot_path =\n",
        );
        assert!(load_cfg(&path).is_err());
    }
}
