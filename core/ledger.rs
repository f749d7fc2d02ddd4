use ink::prelude::collections::BTreeMap;

use super::{
    env::{AAAccountId, AABalance},
    error::{Error, Result},
};

/// 余额存储的出站接口,fee 结算与 payload 转账都经由它完成。
///
/// `transfer` 必须是原子的:要么双方余额同时变化,要么都不变。
pub trait Ledger {
    fn balance_of(&self, account: &AAAccountId) -> AABalance;

    fn transfer(&mut self, from: &AAAccountId, to: &AAAccountId, amount: AABalance) -> Result<()>;
}

/// 内存中的余额表,用于链下模拟。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    balances: BTreeMap<AAAccountId, AABalance>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 向账户存入资金。
    pub fn deposit(&mut self, account: AAAccountId, amount: AABalance) -> Result<()> {
        let balance = self.balances.entry(account).or_default();
        *balance = balance.checked_add(amount).ok_or(Error::TransferFailed)?;
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, account: &AAAccountId) -> AABalance {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: &AAAccountId, to: &AAAccountId, amount: AABalance) -> Result<()> {
        let from_balance = self.balance_of(from);
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientFunds)?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(Error::TransferFailed)?;
        self.balances.insert(*from, remaining);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink::primitives::AccountId;

    #[test]
    fn transfer_moves_exact_amount() {
        let alice = AccountId::from([1; 32]);
        let bob = AccountId::from([2; 32]);
        let mut ledger = MemoryLedger::new();
        ledger.deposit(alice, 100).unwrap();
        ledger.transfer(&alice, &bob, 40).unwrap();
        assert_eq!(ledger.balance_of(&alice), 60);
        assert_eq!(ledger.balance_of(&bob), 40);
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let alice = AccountId::from([1; 32]);
        let bob = AccountId::from([2; 32]);
        let mut ledger = MemoryLedger::new();
        ledger.deposit(alice, 10).unwrap();
        let before = ledger.clone();
        assert_eq!(ledger.transfer(&alice, &bob, 11), Err(Error::InsufficientFunds));
        assert_eq!(ledger, before);
    }

    #[test]
    fn unknown_account_has_zero_balance() {
        assert_eq!(MemoryLedger::new().balance_of(&AccountId::from([9; 32])), 0);
    }
}
