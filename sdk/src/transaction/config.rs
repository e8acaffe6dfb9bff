//! Entry points of the `config` module. All of them need the admin cap.

use crate::states::ObjectIds;
use crate::transaction::{MoveCall, TransactionPlan};

pub const CONFIG_MODULE: &str = "config";

#[derive(Clone, Copy, Debug)]
pub struct ConfigCalls<'a> {
    object_ids: &'a ObjectIds,
}

impl<'a> ConfigCalls<'a> {
    pub fn new(object_ids: &'a ObjectIds) -> Self {
        Self { object_ids }
    }

    fn admin_call(&self, tx: &mut TransactionPlan, function: &str) -> MoveCall {
        let arguments = vec![
            tx.object(&self.object_ids.admin_cap_id),
            tx.object(&self.object_ids.protocol_config_id),
        ];
        MoveCall::new(&self.object_ids.package_id, CONFIG_MODULE, function).arguments(arguments)
    }

    pub fn start_staking(&self, tx: &mut TransactionPlan) {
        let call = self.admin_call(tx, "start_staking");
        tx.move_call(call);
    }

    pub fn stop_staking(&self, tx: &mut TransactionPlan) {
        let call = self.admin_call(tx, "stop_staking");
        tx.move_call(call);
    }

    /// Moves the protocol config to package `version`.
    pub fn update_package_version(&self, tx: &mut TransactionPlan, version: u64) {
        let mut call = self.admin_call(tx, "update_package_version");
        call.arguments.push(tx.pure_u64(version));
        tx.move_call(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{CallArg, PureArg};

    #[test]
    fn start_and_stop_pass_admin_cap_then_config() {
        let ids = ObjectIds::mainnet();
        let calls = ConfigCalls::new(&ids);
        let mut tx = TransactionPlan::new();
        calls.start_staking(&mut tx);
        calls.stop_staking(&mut tx);

        let targets: Vec<String> = tx.move_calls().map(MoveCall::target).collect();
        assert_eq!(
            targets,
            vec![
                format!("{}::config::start_staking", ids.package_id),
                format!("{}::config::stop_staking", ids.package_id),
            ]
        );
        for call in tx.move_calls() {
            assert_eq!(
                tx.input(call.arguments[0]),
                Some(&CallArg::Object(ids.admin_cap_id.clone()))
            );
            assert_eq!(
                tx.input(call.arguments[1]),
                Some(&CallArg::Object(ids.protocol_config_id.clone()))
            );
        }
        // admin cap and protocol config, shared by both calls
        assert_eq!(tx.inputs().len(), 2);
    }

    #[test]
    fn package_version_is_the_last_argument() {
        let ids = ObjectIds::testnet();
        let mut tx = TransactionPlan::new();
        ConfigCalls::new(&ids).update_package_version(&mut tx, 3);

        let call = tx.move_calls().next().unwrap();
        assert_eq!(call.function, "update_package_version");
        assert_eq!(call.arguments.len(), 3);
        assert_eq!(
            tx.input(call.arguments[2]),
            Some(&CallArg::Pure(PureArg::U64(3)))
        );
    }
}
