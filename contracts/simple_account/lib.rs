#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub use self::simple_account::{SimpleAccount, SimpleAccountRef};

#[ink::contract(env = ink_wallet::core::env::AAEnvironment)]
mod simple_account {
    use ink::prelude::vec::Vec;
    use ink_wallet::{
        core::{
            account::Account,
            env::AAEnvironment,
            error::{Error, Result},
            exec::Execute,
            fee::PriceContext,
            ledger::Ledger,
            user_operation::UserOperation,
            validation::ValidationContext,
        },
        traits::account::IAccount,
    };

    /// 单一 owner 的简单账户。
    ///
    /// owner 或 entry point 可以直接调用 `execute` 与 `change_owner`;
    /// entry point 通过 `validate_user_op` 验证 owner 签名的 UserOperation 并收取预付款。
    #[ink(storage)]
    pub struct SimpleAccount {
        account: Account,
    }

    /// owner 被更换。
    #[ink(event)]
    pub struct OwnerChanged {
        #[ink(topic)]
        pub previous: AccountId,
        #[ink(topic)]
        pub new_owner: AccountId,
    }

    /// 每次 validate_user_op 成功返回后发出的事件,包括签名失败的情况。
    #[ink(event)]
    pub struct UserOperationValidated {
        /// entry point 传入的 commitment。
        #[ink(topic)]
        pub user_op_hash: Hash,
        /// 本次消耗的序号。
        pub nonce: u64,
        /// 签名检查失败时为 true。
        pub sig_failed: bool,
        /// 支付给 entry point 的预付款。
        pub prefund: Balance,
    }

    /// `execute` 完成。
    #[ink(event)]
    pub struct Executed {
        #[ink(topic)]
        pub target: AccountId,
        pub value: Balance,
    }

    /// 合约自身余额作为账本,只能从本合约转出。
    struct ContractLedger;

    impl Ledger for ContractLedger {
        fn balance_of(&self, account: &AccountId) -> Balance {
            if *account == ink::env::account_id::<AAEnvironment>() {
                ink::env::balance::<AAEnvironment>()
            } else {
                0
            }
        }

        fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Balance) -> Result<()> {
            if *from != ink::env::account_id::<AAEnvironment>() {
                return Err(Error::TransferFailed);
            }
            ink::env::transfer::<AAEnvironment>(*to, amount).map_err(|_| Error::TransferFailed)
        }
    }

    impl SimpleAccount {
        #[ink(constructor)]
        pub fn new(owner: AccountId, entry_point: AccountId) -> Self {
            Self {
                account: Account::new(owner, entry_point),
            }
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            *self.account.owner()
        }

        #[ink(message)]
        pub fn entry_point(&self) -> AccountId {
            *self.account.entry_point()
        }

        /// 下一个 UserOperation 必须使用的序号。
        #[ink(message)]
        pub fn nonce(&self) -> u64 {
            self.account.sequence_number()
        }

        /// 接收转入的资金,用于支付预付款。
        #[ink(message, payable)]
        pub fn deposit(&mut self) {}

        #[ink(message)]
        pub fn balance(&self) -> Balance {
            self.env().balance()
        }

        /// 由 owner 或 entry point 直接执行一次调用。
        ///
        /// `data` 为空时是普通转账,否则前 4 个字节为 selector。
        #[ink(message)]
        pub fn execute(&mut self, target: AccountId, value: Balance, data: Vec<u8>) -> Result<()> {
            self.account.authorize_execute(&self.env().caller())?;
            let call = Execute::new(target, value, data);

            if call.is_transfer() {
                self.env()
                    .transfer(call.target, call.value)
                    .map_err(|_| Error::TransferFailed)?;
            } else {
                match call.call_params(self.env().gas_left(), false)?.try_invoke() {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => {
                        ink::env::debug_println!("call error: {:?}", e);
                        return Err(Error::ExecutionFailed);
                    }
                    Err(e) => {
                        ink::env::debug_println!("call error: {:?}", e);
                        return Err(Error::ExecutionFailed);
                    }
                }
            }

            self.env().emit_event(Executed {
                target: call.target,
                value: call.value,
            });
            Ok(())
        }

        #[ink(message)]
        pub fn change_owner(&mut self, new_owner: AccountId) -> Result<()> {
            let previous = self
                .account
                .change_owner(&self.env().caller(), new_owner)?;
            self.env().emit_event(OwnerChanged {
                previous,
                new_owner,
            });
            Ok(())
        }
    }

    impl IAccount for SimpleAccount {
        #[ink(message)]
        fn validate_user_op(
            &mut self,
            user_op: UserOperation,
            user_op_hash: Hash,
            required_prefund_hint: Option<Balance>,
            resource_price: Balance,
        ) -> Result<u8> {
            let context = ValidationContext {
                caller: self.env().caller(),
                account_id: self.env().account_id(),
                price: PriceContext::new(resource_price),
            };
            let outcome = self.account.validate_user_op(
                &mut ContractLedger,
                &context,
                &user_op,
                &user_op_hash,
                required_prefund_hint,
            )?;

            self.env().emit_event(UserOperationValidated {
                user_op_hash,
                nonce: outcome.sequence_number,
                sig_failed: !outcome.signature.is_authorized(),
                prefund: outcome.prefund,
            });
            Ok(outcome.code())
        }
    }


    /// This is how you'd write end-to-end (E2E) or integration tests for ink! contracts.
    ///
    /// When running these you need to make sure that you:
    /// - Compile the tests with the `e2e-tests` feature flag enabled (`--features e2e-tests`)
    /// - Are running a Substrate node which contains `pallet-contracts` in the background
    #[cfg(all(test, feature = "e2e-tests"))]
    mod e2e_tests {
        use super::*;
        use ink_e2e::build_message;

        type E2EResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

        #[ink_e2e::test(environment = ink_wallet::core::env::AAEnvironment)]
        async fn stranger_cannot_change_owner(mut client: ink_e2e::Client<C, E>) -> E2EResult<()> {
            let alice = ink_e2e::account_id(ink_e2e::AccountKeyring::Alice);
            let constructor = SimpleAccountRef::new(alice, alice);
            let contract_account_id = client
                .instantiate("simple_account", &ink_e2e::alice(), constructor, 0, None)
                .await
                .expect("instantiate failed")
                .account_id;

            let bob = ink_e2e::account_id(ink_e2e::AccountKeyring::Bob);
            let change_owner = build_message::<SimpleAccountRef>(contract_account_id.clone())
                .call(|account| account.change_owner(bob));
            let result = client
                .call_dry_run(&ink_e2e::bob(), &change_owner, 0, None)
                .await;
            assert_eq!(result.return_value(), Err(Error::CallerNotAuthorized));

            let owner = build_message::<SimpleAccountRef>(contract_account_id.clone())
                .call(|account| account.owner());
            let owner = client.call_dry_run(&ink_e2e::alice(), &owner, 0, None).await;
            assert_eq!(owner.return_value(), alice);

            Ok(())
        }
    }
}
