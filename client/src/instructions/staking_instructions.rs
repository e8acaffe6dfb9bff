use anyhow::Result;
use staking_sdk::transaction::TransactionPlan;
use staking_sdk::{AssetRecord, PendingReward, StakingSummary};
use tracing::info;

use super::super::ClientConfig;
use super::utils::{staking_client, SelectionReport};

pub async fn coins_instr(
    config: &ClientConfig,
    asset_type: &str,
    refresh: bool,
) -> Result<Vec<AssetRecord>> {
    let mut client = staking_client(config)?;
    Ok(client.get_coins(asset_type, refresh).await?)
}

pub async fn select_instr(
    config: &ClientConfig,
    asset_type: &str,
    amount: u128,
) -> Result<SelectionReport> {
    let mut client = staking_client(config)?;
    let mut plan = TransactionPlan::new();
    let selection = client.build_input_coin(&mut plan, asset_type, amount, true).await?;
    info!(
        records = selection.source_records.len(),
        synthetic = selection.is_synthetic_zero,
        "selected input records"
    );
    Ok(SelectionReport { selection, plan })
}

pub async fn summary_instr(config: &ClientConfig, wallet: Option<&str>) -> Result<StakingSummary> {
    let client = staking_client(config)?;
    Ok(client.summarize(wallet).await?)
}

pub async fn pending_reward_instr(
    config: &ClientConfig,
    position: &str,
    asset_type: &str,
) -> Result<Vec<PendingReward>> {
    let client = staking_client(config)?;
    Ok(client.calculate_pending_rewards(position, asset_type).await?)
}

pub async fn stake_instr(
    config: &ClientConfig,
    amount: u128,
    asset_type: Option<&str>,
    position: Option<&str>,
) -> Result<TransactionPlan> {
    let mut client = staking_client(config)?;
    Ok(client.stake(asset_type, amount, position).await?)
}

pub fn unstake_instr(config: &ClientConfig, position: &str, amount: u128) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.unstake(position, amount)?)
}

pub fn claim_instr(config: &ClientConfig, position: &str, asset_type: &str) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.claim_reward(position, asset_type)?)
}

pub fn close_instr(config: &ClientConfig, position: &str) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.close_stake_position(position)?)
}
