//! Programmable transaction plans.
//!
//! A plan is an ordered list of inputs and commands; commands refer to
//! inputs and to earlier results through [`Argument`] handles. Plans are
//! plain data: signing, serialization to the ledger's wire format and
//! submission belong to the wallet collaborator.

pub mod config;
pub mod staking;
pub mod vault;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StakingError};
use crate::utils::normalize_address;

/// Inputs, and separately commands, a plan can address with `u16` indices.
pub const MAX_PLAN_ENTRIES: usize = u16::MAX as usize + 1;

/// Handle to a transaction value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The sender's base-currency gas coin.
    GasCoin,
    /// An input of the plan.
    Input(u16),
    /// The result of a command.
    Result(u16),
    /// One element of a command's tuple result.
    NestedResult(u16, u16),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PureArg {
    U64(u64),
    Address(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    Object(String),
    Pure(PureArg),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

impl MoveCall {
    pub fn new(package: &str, module: &str, function: &str) -> Self {
        Self {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn type_argument(mut self, type_tag: &str) -> Self {
        self.type_arguments.push(type_tag.to_string());
        self
    }

    pub fn arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// `package::module::function`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(MoveCall),
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
}

/// An unsigned programmable transaction.
///
/// Indices are `u16`, as on the ledger. Entries past [`MAX_PLAN_ENTRIES`]
/// are dropped and the plan is marked overflowed; [`TransactionPlan::check`]
/// reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPlan {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    #[serde(skip)]
    overflowed: bool,
}

impl TransactionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn remaining_inputs(&self) -> usize {
        MAX_PLAN_ENTRIES.saturating_sub(self.inputs.len())
    }

    pub fn remaining_commands(&self) -> usize {
        MAX_PLAN_ENTRIES.saturating_sub(self.commands.len())
    }

    /// Fails when an input or command did not fit in the plan.
    pub fn check(&self) -> Result<()> {
        if self.overflowed {
            return Err(StakingError::PlanTooLarge {
                limit: MAX_PLAN_ENTRIES,
            });
        }
        Ok(())
    }

    /// Object input; the same object is only ever added once.
    pub fn object(&mut self, object_id: &str) -> Argument {
        let wanted = normalize_address(object_id);
        let existing = self.inputs.iter().position(|input| {
            matches!(input, CallArg::Object(id) if normalize_address(id) == wanted)
        });
        match existing.and_then(|index| u16::try_from(index).ok()) {
            Some(index) => Argument::Input(index),
            None => self.push_input(CallArg::Object(object_id.to_string())),
        }
    }

    pub fn pure(&mut self, value: PureArg) -> Argument {
        self.push_input(CallArg::Pure(value))
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        self.pure(PureArg::U64(value))
    }

    pub fn pure_address(&mut self, address: &str) -> Argument {
        self.pure(PureArg::Address(normalize_address(address)))
    }

    pub fn move_call(&mut self, call: MoveCall) -> Argument {
        self.push_command(Command::MoveCall(call))
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.push_command(Command::MergeCoins {
            destination,
            sources,
        });
    }

    /// Splits `amount` out of `coin` and returns the new coin.
    pub fn split_coin(&mut self, coin: Argument, amount: u64) -> Argument {
        let amount = self.pure_u64(amount);
        match self.push_command(Command::SplitCoins {
            coin,
            amounts: vec![amount],
        }) {
            Argument::Result(index) => Argument::NestedResult(index, 0),
            other => other,
        }
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: &str) {
        let address = self.pure_address(recipient);
        self.push_command(Command::TransferObjects { objects, address });
    }

    /// A zero-valued record of `asset_type` (`0x2::coin::zero<T>()`).
    pub fn zero_coin(&mut self, asset_type: &str) -> Argument {
        self.move_call(MoveCall::new("0x2", "coin", "zero").type_argument(asset_type))
    }

    /// The input an argument refers to, if it refers to one.
    pub fn input(&self, argument: Argument) -> Option<&CallArg> {
        match argument {
            Argument::Input(index) => self.inputs.get(usize::from(index)),
            _ => None,
        }
    }

    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|command| match command {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    fn push_input(&mut self, input: CallArg) -> Argument {
        match u16::try_from(self.inputs.len()) {
            Ok(index) => {
                self.inputs.push(input);
                Argument::Input(index)
            }
            Err(_) => {
                self.overflowed = true;
                Argument::Input(u16::MAX)
            }
        }
    }

    fn push_command(&mut self, command: Command) -> Argument {
        match u16::try_from(self.commands.len()) {
            Ok(index) => {
                self.commands.push(command);
                Argument::Result(index)
            }
            Err(_) => {
                self.overflowed = true;
                Argument::Result(u16::MAX)
            }
        }
    }
}
