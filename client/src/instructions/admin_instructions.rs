use anyhow::Result;
use staking_sdk::transaction::staking::RegisterRewardParams;
use staking_sdk::transaction::TransactionPlan;

use super::super::ClientConfig;
use super::utils::staking_client;

pub fn start_staking_instr(config: &ClientConfig) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.start_staking())
}

pub fn stop_staking_instr(config: &ClientConfig) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.stop_staking())
}

pub fn update_version_instr(config: &ClientConfig, version: u64) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.update_package_version(version))
}

pub fn register_reward_instr(
    config: &ClientConfig,
    params: &RegisterRewardParams,
) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.register_reward(params))
}

pub async fn deposit_reward_instr(
    config: &ClientConfig,
    asset_type: &str,
    amount: u128,
) -> Result<TransactionPlan> {
    let mut client = staking_client(config)?;
    Ok(client.deposit_reward_coin(asset_type, amount).await?)
}

pub fn withdraw_reward_instr(
    config: &ClientConfig,
    asset_type: &str,
    amount: u128,
    recipient: Option<&str>,
) -> Result<TransactionPlan> {
    let client = staking_client(config)?;
    Ok(client.withdraw_reward_coin(asset_type, amount, recipient)?)
}
