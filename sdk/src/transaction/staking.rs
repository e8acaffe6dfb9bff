//! Entry points of the `staking` module.

use crate::states::ObjectIds;
use crate::transaction::{Argument, MoveCall, TransactionPlan};
use crate::CLOCK_OBJECT_ID;

pub const STAKING_MODULE: &str = "staking";
pub const CALCULATE_PENDING_REWARD: &str = "calculate_pending_reward";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterRewardParams {
    pub asset_type: String,
    /// Reward units emitted per millisecond.
    pub emission_rate: u64,
    pub start_time: u64,
    pub end_time: u64,
}

/// Builds staking move calls against one deployment.
#[derive(Clone, Copy, Debug)]
pub struct StakingCalls<'a> {
    object_ids: &'a ObjectIds,
}

impl<'a> StakingCalls<'a> {
    pub fn new(object_ids: &'a ObjectIds) -> Self {
        Self { object_ids }
    }

    fn call(&self, function: &str) -> MoveCall {
        MoveCall::new(&self.object_ids.package_id, STAKING_MODULE, function)
    }

    pub fn register_reward(&self, tx: &mut TransactionPlan, params: &RegisterRewardParams) {
        let arguments = vec![
            tx.object(&self.object_ids.admin_cap_id),
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.pure_u64(params.emission_rate),
            tx.pure_u64(params.start_time),
            tx.pure_u64(params.end_time),
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(
            self.call("register_reward")
                .type_argument(&params.asset_type)
                .arguments(arguments),
        );
    }

    /// Creates an empty position and returns it.
    pub fn create_stake_position(&self, tx: &mut TransactionPlan) -> Argument {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.reward_manager_id),
        ];
        tx.move_call(self.call("create_stake_position").arguments(arguments))
    }

    pub fn stake(&self, tx: &mut TransactionPlan, position: &str, coin: Argument) {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.vault_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(position),
            coin,
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(self.call("stake").arguments(arguments));
    }

    /// Creates a position funded with `coin` and returns it.
    pub fn create_stake_position_and_stake(
        &self,
        tx: &mut TransactionPlan,
        coin: Argument,
    ) -> Argument {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(&self.object_ids.vault_id),
            coin,
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(
            self.call("create_stake_position_and_stake")
                .arguments(arguments),
        )
    }

    /// Withdraws `amount` from a position and returns the withdrawn coin.
    pub fn unstake(&self, tx: &mut TransactionPlan, position: &str, amount: u64) -> Argument {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.vault_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(position),
            tx.pure_u64(amount),
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(self.call("unstake").arguments(arguments))
    }

    /// Claims the pending reward of `asset_type` and returns the reward coin.
    pub fn claim_reward(
        &self,
        tx: &mut TransactionPlan,
        position: &str,
        asset_type: &str,
    ) -> Argument {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.vault_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(position),
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(
            self.call("claim_reward")
                .type_argument(asset_type)
                .arguments(arguments),
        )
    }

    pub fn close_stake_position(&self, tx: &mut TransactionPlan, position: &str) {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(position),
        ];
        tx.move_call(self.call("close_stake_position").arguments(arguments));
    }

    /// Read-only: emits a `CalculatePendingRewardEvent` for `asset_type`.
    ///
    /// Arguments: protocol config, reward manager, position, clock.
    pub fn calculate_pending_reward(
        &self,
        tx: &mut TransactionPlan,
        position: &str,
        asset_type: &str,
    ) {
        let arguments = vec![
            tx.object(&self.object_ids.protocol_config_id),
            tx.object(&self.object_ids.reward_manager_id),
            tx.object(position),
            tx.object(CLOCK_OBJECT_ID),
        ];
        tx.move_call(
            self.call(CALCULATE_PENDING_REWARD)
                .type_argument(asset_type)
                .arguments(arguments),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::CallArg;

    #[test]
    fn pending_reward_call_targets_position() {
        let ids = ObjectIds::mainnet();
        let mut tx = TransactionPlan::new();
        StakingCalls::new(&ids).calculate_pending_reward(&mut tx, "0xbeef", "0x2::sui::SUI");

        let call = tx.move_calls().next().unwrap();
        assert_eq!(
            call.target(),
            format!("{}::staking::calculate_pending_reward", ids.package_id)
        );
        assert_eq!(
            tx.input(call.arguments[2]),
            Some(&CallArg::Object("0xbeef".to_string()))
        );
        assert_eq!(
            tx.input(call.arguments[3]),
            Some(&CallArg::Object(CLOCK_OBJECT_ID.to_string()))
        );
    }

    #[test]
    fn shared_objects_are_reused_across_calls() {
        let ids = ObjectIds::testnet();
        let calls = StakingCalls::new(&ids);
        let mut tx = TransactionPlan::new();
        let position = calls.create_stake_position(&mut tx);
        let coin = tx.object("0xc01");
        calls.create_stake_position_and_stake(&mut tx, coin);

        assert_eq!(position, Argument::Result(0));
        // protocol config, reward manager, coin, vault, clock
        assert_eq!(tx.inputs().len(), 5);
        assert_eq!(tx.commands().len(), 2);
    }

    #[test]
    fn register_reward_passes_schedule_and_clock() {
        let ids = ObjectIds::mainnet();
        let mut tx = TransactionPlan::new();
        let params = RegisterRewardParams {
            asset_type: "0x2::sui::SUI".to_string(),
            emission_rate: 7,
            start_time: 100,
            end_time: 200,
        };
        StakingCalls::new(&ids).register_reward(&mut tx, &params);

        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.function, "register_reward");
        assert_eq!(call.arguments.len(), 7);
        assert_eq!(
            tx.input(call.arguments[0]),
            Some(&CallArg::Object(ids.admin_cap_id.clone()))
        );
        assert_eq!(
            tx.input(call.arguments[3]),
            Some(&CallArg::Pure(crate::transaction::PureArg::U64(7)))
        );
    }
}
