use ink::prelude::vec::Vec;
use ink::primitives::{AccountId, Hash};
use scale::Encode;

use super::{env::AAAccountId, helpers::keccak256_hash};

/// `fill_user_op_defaults` 使用的系统默认值。
pub const DEFAULT_CALL_RESOURCE_LIMIT: u64 = 0;
pub const DEFAULT_VERIFICATION_RESOURCE_LIMIT: u64 = 150_000;
pub const DEFAULT_MAX_FEE_RATE: u64 = 0;
pub const DEFAULT_MAX_PRIORITY_FEE_RATE: u64 = 1_000_000_000;

/// `UserOperation::pack` 输出的固定长度。
pub const PACKED_USER_OPERATION_LEN: usize = 136;

/// `UserOperation` 结构体定义了一个用户操作。
#[derive(scale::Encode, scale::Decode, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct UserOperation {
    /// 发送人的账户 ID。
    pub sender: AAAccountId,
    /// 必须等于账户当前的序号。
    pub sequence_number: u64,
    /// 账户尚未部署时的 init code,否则为空。
    pub initializer: Vec<u8>,
    /// 验证通过后由 entry point 执行的调用数据。
    pub payload: Vec<u8>,
    /// 执行 payload 时可用的燃料量。
    pub call_resource_limit: u64,
    /// 用于验证此用户操作的燃料量。
    pub verification_resource_limit: u64,
    /// 最高可支付的燃料价格。
    pub max_fee_rate: u64,
    /// 最高优先级燃料价格。
    pub max_priority_fee_rate: u64,
    /// owner 对 commitment 的签名,不参与打包。
    pub authorization: Vec<u8>,
}

/// 部分指定的用户操作,未设置的字段由 [`fill_user_op_defaults`] 补齐。
#[derive(Clone, Debug, Default)]
pub struct PartialUserOperation {
    pub sender: Option<AAAccountId>,
    pub sequence_number: Option<u64>,
    pub initializer: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
    pub call_resource_limit: Option<u64>,
    pub verification_resource_limit: Option<u64>,
    pub max_fee_rate: Option<u64>,
    pub max_priority_fee_rate: Option<u64>,
    pub authorization: Option<Vec<u8>>,
}

pub fn fill_user_op_defaults(op: PartialUserOperation) -> UserOperation {
    UserOperation {
        sender: op.sender.unwrap_or(AccountId::from([0; 32])),
        sequence_number: op.sequence_number.unwrap_or(0),
        initializer: op.initializer.unwrap_or_default(),
        payload: op.payload.unwrap_or_default(),
        call_resource_limit: op
            .call_resource_limit
            .unwrap_or(DEFAULT_CALL_RESOURCE_LIMIT),
        verification_resource_limit: op
            .verification_resource_limit
            .unwrap_or(DEFAULT_VERIFICATION_RESOURCE_LIMIT),
        max_fee_rate: op.max_fee_rate.unwrap_or(DEFAULT_MAX_FEE_RATE),
        max_priority_fee_rate: op
            .max_priority_fee_rate
            .unwrap_or(DEFAULT_MAX_PRIORITY_FEE_RATE),
        authorization: op.authorization.unwrap_or_default(),
    }
}

impl Default for UserOperation {
    fn default() -> Self {
        fill_user_op_defaults(PartialUserOperation::default())
    }
}

impl UserOperation {
    /// 返回一个替换了签名的新用户操作。
    pub fn with_authorization(self, authorization: Vec<u8>) -> Self {
        Self {
            authorization,
            ..self
        }
    }

    /// 打包一个 `UserOperation` 为定长字节数组。
    ///
    /// `initializer` 与 `payload` 以哈希形式参与打包,签名不参与。
    pub fn pack(&self) -> Vec<u8> {
        UserOperationPack {
            sender: self.sender,
            sequence_number: self.sequence_number,
            initializer: keccak256_hash(&self.initializer),
            payload: keccak256_hash(&self.payload),
            call_resource_limit: self.call_resource_limit,
            verification_resource_limit: self.verification_resource_limit,
            max_fee_rate: self.max_fee_rate,
            max_priority_fee_rate: self.max_priority_fee_rate,
        }
        .encode()
    }

    /// 计算打包后的 Keccak256 哈希值。
    pub fn hash(&self) -> Hash {
        keccak256_hash(&self.pack())
    }
}

/// `UserOperationPack` 结构体定义了一个打包了用户操作的结构体。
#[derive(scale::Encode)]
struct UserOperationPack {
    sender: AAAccountId,
    sequence_number: u64,
    initializer: Hash,
    payload: Hash,
    call_resource_limit: u64,
    verification_resource_limit: u64,
    max_fee_rate: u64,
    max_priority_fee_rate: u64,
}
