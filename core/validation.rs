use ink::primitives::Hash;

use super::{
    account::Account,
    env::{AAAccountId, AABalance},
    error::{Error, Result},
    fee::{required_prefund, settle, PriceContext},
    helpers::SignatureValidation,
    ledger::Ledger,
    policy::check_signature,
    user_operation::UserOperation,
};

/// 一次验证调用的执行环境。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// 发起验证的调用者,必须是账户的 entry point。
    pub caller: AAAccountId,
    /// 被验证账户自身的地址,prefund 从这里扣除。
    pub account_id: AAAccountId,
    pub price: PriceContext,
}

/// 验证结果,签名失败同样会走到这里。
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct ValidationOutcome {
    pub signature: SignatureValidation,
    /// 已经转给 entry point 的预付款。
    pub prefund: AABalance,
    /// 本次消耗的序号。
    pub sequence_number: u64,
}

impl ValidationOutcome {
    /// 返回给 entry point 的哨兵值:0 表示通过,1 表示签名失败。
    pub fn code(&self) -> u8 {
        self.signature.code()
    }
}

/// 账户侧的 validateUserOp。
///
/// 顺序固定为:entry point 检查 → 序号检查 → 签名检查 → 支付 prefund → 推进序号。
/// 签名失败不会中断流程,prefund 照常收取,序号照常推进。
pub fn validate_user_op<L: Ledger>(
    account: &mut Account,
    ledger: &mut L,
    context: &ValidationContext,
    user_op: &UserOperation,
    user_op_hash: &Hash,
    required_prefund_hint: Option<AABalance>,
) -> Result<ValidationOutcome> {
    if context.caller != *account.entry_point() {
        return Err(Error::NotFromCoordinator);
    }

    account.sequencer().check(user_op.sequence_number)?;
    let mut sequencer = *account.sequencer();
    sequencer.advance()?;

    let prefund = required_prefund(user_op, &context.price)?;
    if let Some(hint) = required_prefund_hint {
        if hint != prefund {
            return Err(Error::PrefundMismatch);
        }
    }

    let signature = check_signature(account.owner(), &user_op.authorization, user_op_hash);

    settle(ledger, &context.account_id, &context.caller, prefund)?;
    account.set_sequencer(sequencer);

    Ok(ValidationOutcome {
        signature,
        prefund,
        sequence_number: user_op.sequence_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        helpers::SIG_VALIDATION_FAILED,
        ledger::MemoryLedger,
        testing::{account_of, secret, sign_user_op},
        user_operation::{fill_user_op_defaults, PartialUserOperation},
    };
    use ink::primitives::AccountId;

    const NETWORK_ID: u64 = 1337;
    const ACTUAL_PRICE: AABalance = 1_000_000_000;
    const ENTRY_POINT: [u8; 32] = [0x22; 32];
    const WALLET: [u8; 32] = [0x33; 32];
    const INITIAL_BALANCE: AABalance = 200_000_000_000_000_000;

    struct Fixture {
        account: Account,
        ledger: MemoryLedger,
        context: ValidationContext,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ledger = MemoryLedger::new();
            ledger.deposit(AccountId::from(WALLET), INITIAL_BALANCE).unwrap();
            Self {
                account: Account::new(account_of(&secret(1)), AccountId::from(ENTRY_POINT)),
                ledger,
                context: ValidationContext {
                    caller: AccountId::from(ENTRY_POINT),
                    account_id: AccountId::from(WALLET),
                    price: PriceContext::new(ACTUAL_PRICE),
                },
            }
        }

        fn user_op(&self, sequence_number: u64, signer: u8) -> UserOperation {
            let op = fill_user_op_defaults(PartialUserOperation {
                sender: Some(AccountId::from(WALLET)),
                sequence_number: Some(sequence_number),
                call_resource_limit: Some(200_000),
                verification_resource_limit: Some(100_000),
                max_fee_rate: Some(3_000_000_000),
                ..Default::default()
            });
            sign_user_op(op, &secret(signer), &AccountId::from(ENTRY_POINT), NETWORK_ID)
        }

        fn validate(&mut self, op: &UserOperation, hint: Option<AABalance>) -> Result<ValidationOutcome> {
            let hash = op.commitment(&AccountId::from(ENTRY_POINT), NETWORK_ID);
            validate_user_op(
                &mut self.account,
                &mut self.ledger,
                &self.context,
                op,
                &hash,
                hint,
            )
        }

        fn wallet_balance(&self) -> AABalance {
            self.ledger.balance_of(&AccountId::from(WALLET))
        }
    }

    #[test]
    fn should_pay_and_increment_nonce() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 1);
        let expected_pay = ACTUAL_PRICE * (200_000 + 100_000);

        let outcome = fixture.validate(&op, Some(expected_pay)).unwrap();

        assert_eq!(outcome.code(), 0);
        assert_eq!(outcome.prefund, expected_pay);
        assert_eq!(outcome.prefund, 300_000_000_000_000);
        assert_eq!(fixture.wallet_balance(), INITIAL_BALANCE - expected_pay);
        assert_eq!(
            fixture.ledger.balance_of(&AccountId::from(ENTRY_POINT)),
            expected_pay
        );
        assert_eq!(fixture.account.sequence_number(), 1);
    }

    #[test]
    fn should_reject_same_op_on_nonce_error() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 1);
        fixture.validate(&op, None).unwrap();
        let balance = fixture.wallet_balance();

        assert_eq!(fixture.validate(&op, None), Err(Error::InvalidSequence));
        assert_eq!(fixture.wallet_balance(), balance);
        assert_eq!(fixture.account.sequence_number(), 1);
    }

    #[test]
    fn wrong_signer_returns_sentinel_but_still_pays() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 2);

        let outcome = fixture.validate(&op, None).unwrap();

        assert_eq!(outcome.code(), SIG_VALIDATION_FAILED);
        assert_eq!(fixture.wallet_balance(), INITIAL_BALANCE - outcome.prefund);
        assert_eq!(fixture.account.sequence_number(), 1);
    }

    #[test]
    fn zero_commitment_returns_sentinel() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 1);
        let outcome = validate_user_op(
            &mut fixture.account,
            &mut fixture.ledger,
            &fixture.context,
            &op,
            &Hash::from([0; 32]),
            None,
        )
        .unwrap();
        assert_eq!(outcome.code(), 1);
    }

    #[test]
    fn sequence_counts_successful_validations() {
        let mut fixture = Fixture::new();
        for n in 0..5 {
            let op = fixture.user_op(n, 1);
            fixture.validate(&op, None).unwrap();
            assert_eq!(fixture.account.sequence_number(), n + 1);
        }
        let skipped = fixture.user_op(7, 1);
        assert_eq!(fixture.validate(&skipped, None), Err(Error::InvalidSequence));
        assert_eq!(fixture.account.sequence_number(), 5);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.ledger = MemoryLedger::new();
        fixture.ledger.deposit(AccountId::from(WALLET), 1).unwrap();
        let op = fixture.user_op(0, 1);

        assert_eq!(fixture.validate(&op, None), Err(Error::InsufficientFunds));
        assert_eq!(fixture.wallet_balance(), 1);
        assert_eq!(fixture.account.sequence_number(), 0);
    }

    #[test]
    fn only_entry_point_may_validate() {
        let mut fixture = Fixture::new();
        fixture.context.caller = AccountId::from([0x44; 32]);
        let op = fixture.user_op(0, 1);

        assert_eq!(fixture.validate(&op, None), Err(Error::NotFromCoordinator));
        assert_eq!(fixture.wallet_balance(), INITIAL_BALANCE);
        assert_eq!(fixture.account.sequence_number(), 0);
    }

    #[test]
    fn mismatched_prefund_hint_is_rejected() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 1);

        assert_eq!(fixture.validate(&op, Some(1)), Err(Error::PrefundMismatch));
        assert_eq!(fixture.wallet_balance(), INITIAL_BALANCE);
        assert_eq!(fixture.account.sequence_number(), 0);
    }

    #[test]
    fn signature_from_another_network_is_unauthorized() {
        let mut fixture = Fixture::new();
        let op = fixture.user_op(0, 1);
        let foreign = op.commitment(&AccountId::from(ENTRY_POINT), NETWORK_ID + 1);
        let outcome = validate_user_op(
            &mut fixture.account,
            &mut fixture.ledger,
            &fixture.context,
            &op,
            &foreign,
            None,
        )
        .unwrap();
        assert_eq!(outcome.signature, SignatureValidation::Unauthorized);
    }
}
