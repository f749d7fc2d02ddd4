use ink::primitives::Hash;

use super::{
    env::{AAAccountId, AABalance},
    error::Result,
    exec::Execute,
    ledger::Ledger,
    policy::ensure_authority_or_coordinator,
    sequencer::Sequencer,
    user_operation::UserOperation,
    validation::{self, ValidationContext, ValidationOutcome},
};

/// 一个简单账户:单一 owner,固定的 entry point,以及防重放序号。
///
/// 余额不在这里,由 [`Ledger`] 持有。
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Account {
    owner: AAAccountId,
    entry_point: AAAccountId,
    sequencer: Sequencer,
}

impl Account {
    pub fn new(owner: AAAccountId, entry_point: AAAccountId) -> Self {
        Self {
            owner,
            entry_point,
            sequencer: Sequencer::new(),
        }
    }

    pub fn owner(&self) -> &AAAccountId {
        &self.owner
    }

    pub fn entry_point(&self) -> &AAAccountId {
        &self.entry_point
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequencer.current()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub(crate) fn set_sequencer(&mut self, sequencer: Sequencer) {
        self.sequencer = sequencer;
    }

    /// 更换 owner,返回之前的 owner。
    pub fn change_owner(
        &mut self,
        caller: &AAAccountId,
        new_owner: AAAccountId,
    ) -> Result<AAAccountId> {
        ensure_authority_or_coordinator(caller, &self.owner, &self.entry_point)?;
        Ok(::core::mem::replace(&mut self.owner, new_owner))
    }

    pub fn authorize_execute(&self, caller: &AAAccountId) -> Result<()> {
        ensure_authority_or_coordinator(caller, &self.owner, &self.entry_point)
    }

    /// 执行一次调用的转账部分,调用数据由外部执行者处理。
    pub fn execute<L: Ledger>(
        &self,
        ledger: &mut L,
        caller: &AAAccountId,
        account_id: &AAAccountId,
        call: &Execute,
    ) -> Result<()> {
        self.authorize_execute(caller)?;
        if call.value != 0 {
            ledger.transfer(account_id, &call.target, call.value)?;
        }
        Ok(())
    }

    pub fn validate_user_op<L: Ledger>(
        &mut self,
        ledger: &mut L,
        context: &ValidationContext,
        user_op: &UserOperation,
        user_op_hash: &Hash,
        required_prefund_hint: Option<AABalance>,
    ) -> Result<ValidationOutcome> {
        validation::validate_user_op(
            self,
            ledger,
            context,
            user_op,
            user_op_hash,
            required_prefund_hint,
        )
    }
}
