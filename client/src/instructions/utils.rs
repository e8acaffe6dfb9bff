use anyhow::{Context, Result};
use serde::Serialize;
use staking_sdk::coin::ConsumptionPlan;
use staking_sdk::ledger::MemoryLedger;
use staking_sdk::supply::{circulating_supply, total_supply};
use staking_sdk::transaction::TransactionPlan;
use staking_sdk::StakingClient;

use super::super::ClientConfig;

pub fn staking_client(config: &ClientConfig) -> Result<StakingClient<MemoryLedger>> {
    let ledger = MemoryLedger::from_file(&config.snapshot_path)
        .with_context(|| format!("loading ledger snapshot {}", config.snapshot_path))?;
    let client = StakingClient::new(ledger, config.staking_config(), &config.wallet)?;
    Ok(client)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SupplyReport {
    pub circulating_supply: String,
    pub total_supply: String,
}

pub fn supply_report() -> SupplyReport {
    SupplyReport {
        circulating_supply: circulating_supply().to_string(),
        total_supply: total_supply().to_string(),
    }
}

/// A selection together with the commands it emitted.
#[derive(Debug, Serialize)]
pub struct SelectionReport {
    pub selection: ConsumptionPlan,
    pub plan: TransactionPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_report_is_bounded() {
        let report = supply_report();
        let circulating: u128 = report.circulating_supply.parse().unwrap();
        let total: u128 = report.total_supply.parse().unwrap();
        assert!(circulating <= total);
    }
}
