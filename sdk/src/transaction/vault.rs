//! Entry points of the `vault` module, which holds the reward reserves.

use crate::states::ObjectIds;
use crate::transaction::{Argument, MoveCall, TransactionPlan};

pub const VAULT_MODULE: &str = "vault";

#[derive(Clone, Copy, Debug)]
pub struct VaultCalls<'a> {
    object_ids: &'a ObjectIds,
}

impl<'a> VaultCalls<'a> {
    pub fn new(object_ids: &'a ObjectIds) -> Self {
        Self { object_ids }
    }

    fn call(&self, function: &str) -> MoveCall {
        MoveCall::new(&self.object_ids.package_id, VAULT_MODULE, function)
    }

    /// Adds `coin` of `asset_type` to the vault's reward reserve.
    pub fn deposit_reward_coin(&self, tx: &mut TransactionPlan, asset_type: &str, coin: Argument) {
        let arguments = vec![tx.object(&self.object_ids.vault_id), coin];
        tx.move_call(
            self.call("deposit_reward_coin")
                .type_argument(asset_type)
                .arguments(arguments),
        );
    }

    /// Admin only: takes `amount` of `asset_type` out of the reserve and
    /// returns the coin.
    pub fn withdraw_reward_coin(
        &self,
        tx: &mut TransactionPlan,
        asset_type: &str,
        amount: u64,
    ) -> Argument {
        let arguments = vec![
            tx.object(&self.object_ids.vault_id),
            tx.object(&self.object_ids.admin_cap_id),
            tx.pure_u64(amount),
        ];
        tx.move_call(
            self.call("withdraw_reward_coin")
                .type_argument(asset_type)
                .arguments(arguments),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{CallArg, PureArg};

    const BLUB: &str = "0xb::blub::BLUB";

    #[test]
    fn deposit_passes_vault_then_coin() {
        let ids = ObjectIds::mainnet();
        let mut tx = TransactionPlan::new();
        let coin = tx.object("0xc01");
        VaultCalls::new(&ids).deposit_reward_coin(&mut tx, BLUB, coin);

        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.target(), format!("{}::vault::deposit_reward_coin", ids.package_id));
        assert_eq!(call.type_arguments, vec![BLUB.to_string()]);
        assert_eq!(
            tx.input(call.arguments[0]),
            Some(&CallArg::Object(ids.vault_id.clone()))
        );
        assert_eq!(call.arguments[1], coin);
    }

    #[test]
    fn withdraw_passes_vault_cap_and_amount() {
        let ids = ObjectIds::testnet();
        let mut tx = TransactionPlan::new();
        let coin = VaultCalls::new(&ids).withdraw_reward_coin(&mut tx, BLUB, 500);

        assert_eq!(coin, Argument::Result(0));
        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.function, "withdraw_reward_coin");
        let inputs: Vec<_> = call.arguments.iter().map(|arg| tx.input(*arg)).collect();
        assert_eq!(
            inputs,
            vec![
                Some(&CallArg::Object(ids.vault_id.clone())),
                Some(&CallArg::Object(ids.admin_cap_id.clone())),
                Some(&CallArg::Pure(PureArg::U64(500))),
            ]
        );
    }
}
