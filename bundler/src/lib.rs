//! 链下的 entry point 模拟:部署账户、验证 UserOperation、收取预付款并执行 payload。

use ink::primitives::Hash;
use ink_wallet::core::{
    account::Account,
    env::{AAAccountId, AABalance, NetworkId},
    error::{Error, Result},
    exec::Execute,
    fee::{required_prefund, PriceContext},
    helpers::SignatureValidation,
    ledger::{Ledger, MemoryLedger},
    provision::{Initializer, Provisioner, Salt},
    user_operation::UserOperation,
    validation::{ValidationContext, ValidationOutcome},
};
use tracing::{debug, info, warn};

mod signer;

pub use signer::LocalSigner;

/// 一个 UserOperation 在 handle_ops 中的处理结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpReceipt {
    pub sender: AAAccountId,
    pub user_op_hash: Hash,
    pub sequence_number: u64,
    pub prefund: AABalance,
    pub signature: SignatureValidation,
    /// payload 是否被执行;签名失败或执行出错时为 false。
    pub executed: bool,
}

#[derive(Debug, Clone)]
struct State {
    ledger: MemoryLedger,
    provisioner: Provisioner,
}

pub struct Bundler {
    id: AAAccountId,
    network_id: NetworkId,
    state: State,
}

impl Bundler {
    /// `id` 同时是 entry point 与预付款的收款方。
    pub fn new(id: AAAccountId, factory: AAAccountId, network_id: NetworkId) -> Self {
        Self {
            id,
            network_id,
            state: State {
                ledger: MemoryLedger::new(),
                provisioner: Provisioner::new(factory, id),
            },
        }
    }

    pub fn id(&self) -> &AAAccountId {
        &self.id
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub fn factory(&self) -> &AAAccountId {
        self.state.provisioner.factory()
    }

    pub fn deposit(&mut self, account: AAAccountId, amount: AABalance) -> Result<()> {
        self.state.ledger.deposit(account, amount)
    }

    pub fn balance_of(&self, account: &AAAccountId) -> AABalance {
        self.state.ledger.balance_of(account)
    }

    pub fn account(&self, address: &AAAccountId) -> Option<&Account> {
        self.state.provisioner.account(address)
    }

    /// 账户的反事实地址。
    pub fn get_address(&self, initializer: &Initializer, salt: &Salt) -> AAAccountId {
        self.state
            .provisioner
            .get_address(&initializer.to_bytes(), salt)
    }

    /// 直接部署账户,地址上已有账户时原样返回。
    pub fn provision_account(&mut self, initializer: &Initializer, salt: Salt) -> Result<AAAccountId> {
        self.state
            .provisioner
            .provision(&initializer.to_bytes(), salt)
    }

    /// 本 entry point 在本网络上对 `user_op` 的 commitment,也就是 owner 要签名的内容。
    pub fn user_op_hash(&self, user_op: &UserOperation) -> Hash {
        user_op.commitment(&self.id, self.network_id)
    }

    /// 在状态副本上执行验证流程,不产生任何副作用。
    pub fn simulate_validation(
        &self,
        user_op: &UserOperation,
        price: &PriceContext,
    ) -> Result<ValidationOutcome> {
        let mut scratch = self.state.clone();
        self.validate_op(&mut scratch, 0, user_op, price)
    }

    /// 处理一批 UserOperation。
    ///
    /// 先逐个验证,任何一个硬失败都会以 `FailedOp` 拒绝整批,状态不变;
    /// 全部通过后再依次执行签名有效的 payload。
    pub fn handle_ops(
        &mut self,
        ops: &[UserOperation],
        price: &PriceContext,
    ) -> Result<Vec<OpReceipt>> {
        let mut scratch = self.state.clone();

        let mut outcomes = Vec::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            match self.validate_op(&mut scratch, i as u64, op, price) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(op_index = i, error = %e, "batch rejected");
                    return Err(e);
                }
            }
        }

        let mut receipts = Vec::with_capacity(ops.len());
        for (op, outcome) in ops.iter().zip(outcomes) {
            receipts.push(self.dispatch(&mut scratch, op, outcome));
        }

        self.state = scratch;
        info!(ops = receipts.len(), "batch handled");
        Ok(receipts)
    }

    fn validate_op(
        &self,
        state: &mut State,
        op_index: u64,
        op: &UserOperation,
        price: &PriceContext,
    ) -> Result<ValidationOutcome> {
        let failed = |reason: String| Error::FailedOp { op_index, reason };

        if !op.initializer.is_empty() {
            if state.provisioner.is_provisioned(&op.sender) {
                return Err(failed("AA10 sender already constructed".into()));
            }
            let created = state
                .provisioner
                .create_sender(&op.initializer)
                .map_err(|e| failed(format!("AA13 initCode failed: {e}")))?;
            if created != op.sender {
                return Err(failed("AA14 initCode must return sender".into()));
            }
            debug!(sender = ?op.sender, "account created");
        }

        let prefund =
            required_prefund(op, price).map_err(|_| failed("AA94 gas values overflow".into()))?;
        let user_op_hash = self.user_op_hash(op);
        let context = ValidationContext {
            caller: self.id,
            account_id: op.sender,
            price: *price,
        };

        let account = state
            .provisioner
            .account_mut(&op.sender)
            .ok_or_else(|| failed("AA20 account not deployed".into()))?;
        let outcome = account
            .validate_user_op(&mut state.ledger, &context, op, &user_op_hash, Some(prefund))
            .map_err(|e| failed(account_failure(&e)))?;

        debug!(
            sender = ?op.sender,
            nonce = outcome.sequence_number,
            prefund = outcome.prefund,
            code = outcome.code(),
            "user operation validated"
        );
        Ok(outcome)
    }

    fn dispatch(&self, state: &mut State, op: &UserOperation, outcome: ValidationOutcome) -> OpReceipt {
        let executed = if !outcome.signature.is_authorized() {
            warn!(sender = ?op.sender, "signature rejected, payload skipped");
            false
        } else {
            match self.execute_payload(state, op) {
                Ok(()) => true,
                Err(e) => {
                    warn!(sender = ?op.sender, error = %e, "payload execution failed");
                    false
                }
            }
        };

        OpReceipt {
            sender: op.sender,
            user_op_hash: self.user_op_hash(op),
            sequence_number: outcome.sequence_number,
            prefund: outcome.prefund,
            signature: outcome.signature,
            executed,
        }
    }

    fn execute_payload(&self, state: &mut State, op: &UserOperation) -> Result<()> {
        let Some(call) = Execute::decode_payload(&op.payload)? else {
            return Ok(());
        };
        let account = state
            .provisioner
            .account(&op.sender)
            .ok_or(Error::NotProvisioned)?;
        if !call.is_transfer() {
            debug!(callee = ?call.target, "call data is not interpreted off-chain, value only");
        }
        account.execute(&mut state.ledger, &self.id, &op.sender, &call)
    }
}

fn account_failure(error: &Error) -> String {
    match error {
        Error::InvalidSequence => "AA25 invalid account nonce".into(),
        Error::InsufficientFunds => "AA21 didn't pay prefund".into(),
        other => format!("AA23 reverted: {other}"),
    }
}
