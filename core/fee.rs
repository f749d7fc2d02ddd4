use num_traits::Zero;

use super::{
    env::{AAAccountId, AABalance},
    error::{Error, Result},
    ledger::Ledger,
    user_operation::UserOperation,
};

/// 执行环境提供的价格信息。
///
/// `resource_price` 是最终的单位燃料价格,如何由 `max_fee_rate` 与
/// `max_priority_fee_rate` 折算得到由执行环境决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct PriceContext {
    pub resource_price: AABalance,
}

impl PriceContext {
    pub fn new(resource_price: AABalance) -> Self {
        Self { resource_price }
    }
}

/// 计算 UserOperation 所需的预付款。
///
/// `resource_price * (call_resource_limit + verification_resource_limit)`
pub fn required_prefund(user_op: &UserOperation, price: &PriceContext) -> Result<AABalance> {
    let resource_limit = AABalance::from(user_op.call_resource_limit)
        .checked_add(AABalance::from(user_op.verification_resource_limit))
        .ok_or(Error::FeeOverflow)?;
    price
        .resource_price
        .checked_mul(resource_limit)
        .ok_or(Error::FeeOverflow)
}

/// 将预付款从账户转给 entry point。
pub fn settle<L: Ledger>(
    ledger: &mut L,
    account: &AAAccountId,
    coordinator: &AAAccountId,
    prefund: AABalance,
) -> Result<()> {
    if prefund.is_zero() {
        return Ok(());
    }
    if ledger.balance_of(account) < prefund {
        return Err(Error::InsufficientFunds);
    }
    ledger.transfer(account, coordinator, prefund)
}
