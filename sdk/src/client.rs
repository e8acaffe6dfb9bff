//! High-level entry point tying the ledger, the deployment configuration
//! and the caller's asset records together.

use std::sync::Arc;

use tracing::{debug, info};

use crate::coin::{build_input_coin, AssetRecordStore, ConsumptionPlan};
use crate::error::{Result, StakingError};
use crate::ledger::Ledger;
use crate::query;
use crate::states::{
    self, AssetRecord, PendingReward, Position, ProtocolConfig, RewardManager, StakingConfig,
    StakingSummary,
};
use crate::transaction::config::ConfigCalls;
use crate::transaction::staking::{RegisterRewardParams, StakingCalls};
use crate::transaction::vault::VaultCalls;
use crate::transaction::TransactionPlan;
use crate::utils::parse_address;

pub struct StakingClient<L> {
    ledger: Arc<L>,
    config: StakingConfig,
    address: String,
    store: AssetRecordStore,
}

impl<L: Ledger> StakingClient<L> {
    /// `address` is the owner whose records are spent and who receives
    /// produced objects. It may be empty for read-only use.
    pub fn new(ledger: L, config: StakingConfig, address: &str) -> Result<Self> {
        Self::with_shared_ledger(Arc::new(ledger), config, address)
    }

    pub fn with_shared_ledger(
        ledger: Arc<L>,
        config: StakingConfig,
        address: &str,
    ) -> Result<Self> {
        let address = if address.trim().is_empty() {
            String::new()
        } else {
            parse_address(address)?
        };
        Ok(Self {
            ledger,
            config,
            address,
            store: AssetRecordStore::new(),
        })
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn store(&self) -> &AssetRecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AssetRecordStore {
        &mut self.store
    }

    fn owner(&self) -> Result<&str> {
        if self.address.is_empty() {
            Err(StakingError::MissingOwner)
        } else {
            Ok(&self.address)
        }
    }

    fn calls(&self) -> StakingCalls<'_> {
        StakingCalls::new(&self.config.object_ids)
    }

    fn config_calls(&self) -> ConfigCalls<'_> {
        ConfigCalls::new(&self.config.object_ids)
    }

    fn vault_calls(&self) -> VaultCalls<'_> {
        VaultCalls::new(&self.config.object_ids)
    }

    /// The owner's records of `asset_type`, from cache unless `refresh`.
    pub async fn get_coins(&mut self, asset_type: &str, refresh: bool) -> Result<Vec<AssetRecord>> {
        let owner = self.owner()?.to_string();
        self.store
            .get(self.ledger.as_ref(), &owner, asset_type, refresh)
            .await
    }

    /// Adds the commands producing exactly `amount` of `asset_type` to `tx`.
    ///
    /// With `refresh` unset the cached records are spent, which may include
    /// records an earlier plan already consumed.
    pub async fn build_input_coin(
        &mut self,
        tx: &mut TransactionPlan,
        asset_type: &str,
        amount: u128,
        refresh: bool,
    ) -> Result<ConsumptionPlan> {
        let records = self.get_coins(asset_type, refresh).await?;
        build_input_coin(tx, &records, amount, asset_type)
    }

    /// Stakes `amount` of `asset_type` (the stake asset when `None`).
    ///
    /// Records are re-listed before selection. Goes into `position` when given, else into the owner's first position,
    /// else into a new position.
    pub async fn stake(
        &mut self,
        asset_type: Option<&str>,
        amount: u128,
        position: Option<&str>,
    ) -> Result<TransactionPlan> {
        let owner = self.owner()?.to_string();
        let asset_type = asset_type
            .map(str::to_string)
            .unwrap_or_else(|| self.config.stake_asset_type.clone());

        let position = match position {
            Some(position) => Some(position.to_string()),
            None => self.query_user_position_ids(&owner).await?.into_iter().next(),
        };
        let Some(position) = position else {
            return self.create_stake_position_and_stake(&asset_type, amount).await;
        };

        let mut tx = TransactionPlan::new();
        let input = self.build_input_coin(&mut tx, &asset_type, amount, true).await?;
        self.calls().stake(&mut tx, &position, input.target_coin);
        tx.check()?;
        debug!(position = %position, amount = %amount, "planned stake");
        Ok(tx)
    }

    pub async fn create_stake_position_and_stake(
        &mut self,
        asset_type: &str,
        amount: u128,
    ) -> Result<TransactionPlan> {
        let owner = self.owner()?.to_string();
        let mut tx = TransactionPlan::new();
        let input = self.build_input_coin(&mut tx, asset_type, amount, true).await?;
        let position = self
            .calls()
            .create_stake_position_and_stake(&mut tx, input.target_coin);
        tx.transfer_objects(vec![position], &owner);
        tx.check()?;
        debug!(amount = %amount, "planned stake into a new position");
        Ok(tx)
    }

    pub fn create_stake_position(&self) -> Result<TransactionPlan> {
        let owner = self.owner()?;
        let mut tx = TransactionPlan::new();
        let position = self.calls().create_stake_position(&mut tx);
        tx.transfer_objects(vec![position], owner);
        Ok(tx)
    }

    pub fn unstake(&self, position: &str, amount: u128) -> Result<TransactionPlan> {
        let owner = self.owner()?;
        let amount = u64::try_from(amount).map_err(|_| StakingError::AmountOutOfRange(amount))?;
        let mut tx = TransactionPlan::new();
        let coin = self.calls().unstake(&mut tx, position, amount);
        tx.transfer_objects(vec![coin], owner);
        Ok(tx)
    }

    pub fn claim_reward(&self, position: &str, asset_type: &str) -> Result<TransactionPlan> {
        let owner = self.owner()?;
        let mut tx = TransactionPlan::new();
        let coin = self.calls().claim_reward(&mut tx, position, asset_type);
        tx.transfer_objects(vec![coin], owner);
        Ok(tx)
    }

    pub fn close_stake_position(&self, position: &str) -> Result<TransactionPlan> {
        self.owner()?;
        let mut tx = TransactionPlan::new();
        self.calls().close_stake_position(&mut tx, position);
        Ok(tx)
    }

    pub fn start_staking(&self) -> TransactionPlan {
        let mut tx = TransactionPlan::new();
        self.config_calls().start_staking(&mut tx);
        tx
    }

    pub fn stop_staking(&self) -> TransactionPlan {
        let mut tx = TransactionPlan::new();
        self.config_calls().stop_staking(&mut tx);
        tx
    }

    pub fn update_package_version(&self, version: u64) -> TransactionPlan {
        let mut tx = TransactionPlan::new();
        self.config_calls().update_package_version(&mut tx, version);
        tx
    }

    pub fn register_reward(&self, params: &RegisterRewardParams) -> TransactionPlan {
        let mut tx = TransactionPlan::new();
        self.calls().register_reward(&mut tx, params);
        tx
    }

    /// Funds the reward reserve with `amount` of the owner's `asset_type`.
    pub async fn deposit_reward_coin(
        &mut self,
        asset_type: &str,
        amount: u128,
    ) -> Result<TransactionPlan> {
        let mut tx = TransactionPlan::new();
        let input = self.build_input_coin(&mut tx, asset_type, amount, true).await?;
        self.vault_calls()
            .deposit_reward_coin(&mut tx, asset_type, input.target_coin);
        tx.check()?;
        debug!(asset_type, amount = %amount, "planned reward deposit");
        Ok(tx)
    }

    /// Withdraws reward reserve to `recipient`, the owner when `None`.
    pub fn withdraw_reward_coin(
        &self,
        asset_type: &str,
        amount: u128,
        recipient: Option<&str>,
    ) -> Result<TransactionPlan> {
        let recipient = match recipient {
            Some(recipient) => parse_address(recipient)?,
            None => self.owner()?.to_string(),
        };
        let amount = u64::try_from(amount).map_err(|_| StakingError::AmountOutOfRange(amount))?;
        let mut tx = TransactionPlan::new();
        let coin = self
            .vault_calls()
            .withdraw_reward_coin(&mut tx, asset_type, amount);
        tx.transfer_objects(vec![coin], &recipient);
        Ok(tx)
    }

    pub async fn calculate_pending_rewards(
        &self,
        position: &str,
        asset_type: &str,
    ) -> Result<Vec<PendingReward>> {
        query::calculate_pending_rewards(
            self.ledger.as_ref(),
            &self.config,
            self.owner()?,
            position,
            asset_type,
        )
        .await
    }

    pub async fn query_reward_manager(&self) -> Result<RewardManager> {
        query::query_reward_manager(self.ledger.as_ref(), &self.config).await
    }

    pub async fn query_protocol_config(&self) -> Result<ProtocolConfig> {
        query::query_protocol_config(self.ledger.as_ref(), &self.config).await
    }

    pub async fn query_user_position_ids(&self, wallet: &str) -> Result<Vec<String>> {
        let manager = self.query_reward_manager().await?;
        query::query_user_position_ids(
            self.ledger.as_ref(),
            &manager.user_positions_record_id,
            wallet,
        )
        .await
    }

    pub async fn query_user_positions(&self, wallet: &str) -> Result<Vec<Position>> {
        let ids = self.query_user_position_ids(wallet).await?;
        query::query_user_positions(Arc::clone(&self.ledger), &ids).await
    }

    /// Sum of the wallet's positive stakes.
    pub async fn total_staked(&self, wallet: &str) -> Result<u128> {
        let positions = self.query_user_positions(wallet).await?;
        Ok(states::total_staked(&positions))
    }

    /// Staking summary of `wallet`, or of the owner when `None`.
    pub async fn summarize(&self, wallet: Option<&str>) -> Result<StakingSummary> {
        let wallet = match wallet {
            Some(wallet) => wallet,
            None => self.owner()?,
        };
        info!(wallet, network = %self.config.network, "building staking summary");
        query::summarize(Arc::clone(&self.ledger), &self.config, wallet).await
    }
}
