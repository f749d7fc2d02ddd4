use crate::core::{
    env::{AABalance, AAHash},
    error::Result,
    user_operation::UserOperation,
};

#[ink::trait_definition]
pub trait IAccount {
    /// 验证用户的签名与序号,并向 entry point 支付预付款。
    ///
    /// 只能由 entry point 调用。签名无效时不会失败,而是返回
    /// `SIG_VALIDATION_FAILED`;此时预付款照常支付,序号照常推进。
    ///
    /// - `user_op` 要验证的用户操作
    /// - `user_op_hash` entry point 计算的 commitment,签名针对它产生
    /// - `required_prefund_hint` entry point 计算的预付款,给出时必须与账户计算的一致
    /// - `resource_price` 执行环境给出的单位燃料价格
    #[ink(message)]
    fn validate_user_op(
        &mut self,
        user_op: UserOperation,
        user_op_hash: AAHash,
        required_prefund_hint: Option<AABalance>,
        resource_price: AABalance,
    ) -> Result<u8>;
}
