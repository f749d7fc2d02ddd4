use ink::prelude::string::String;

/// 账户验证过程中的硬失败。
///
/// 签名不匹配不属于此类,它通过 [`SignatureValidation`](super::helpers::SignatureValidation)
/// 以哨兵值的形式返回,不会中断验证流程。
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// 调用者既不是账户的当前 owner,也不是 entry point。
    CallerNotAuthorized,
    /// `validate_user_op` 只能由 entry point 调用。
    NotFromCoordinator,
    /// UserOperation 的序号与账户当前序号不一致。
    InvalidSequence,
    /// Returned if not enough balance to fulfill the prefund is available.
    InsufficientFunds,
    /// 计算 prefund 时溢出。
    FeeOverflow,
    /// entry point 给出的 prefund 与账户计算的结果不一致。
    PrefundMismatch,
    /// init code 无法解析,或者 factory 不匹配。
    InvalidInitializer,
    /// 账户已经部署,但 UserOperation 仍携带 init code。
    AlreadyProvisioned,
    /// 账户尚未部署,且 UserOperation 没有携带 init code。
    NotProvisioned,
    /// `execute` 的 payload 无法解析。
    InvalidPayload,
    TransferFailed,
    /// `execute` 发起的跨合约调用失败。
    ExecutionFailed,
    /// handleOps 调用失败产生的错误,用于识别失败的操作。
    ///
    /// - `op_index` - 失败操作在数组中的索引(在 simulate_validation 中总是为 0)
    /// - `reason` - 失败原因,以 "AAmn" 开头:
    ///      1 - factory 失败
    ///      2 - account 失败
    FailedOp { op_index: u64, reason: String },
}

impl Error {
    /// 稳定的、便于排查的失败原因。
    pub fn reason(&self) -> &str {
        match self {
            Error::CallerNotAuthorized => "account: not Owner or EntryPoint",
            Error::NotFromCoordinator => "account: not from EntryPoint",
            Error::InvalidSequence => "account: invalid nonce",
            Error::InsufficientFunds => "account: insufficient funds for prefund",
            Error::FeeOverflow => "account: gas values overflow",
            Error::PrefundMismatch => "account: prefund mismatch",
            Error::InvalidInitializer => "factory: invalid init code",
            Error::AlreadyProvisioned => "factory: sender already constructed",
            Error::NotProvisioned => "factory: account not deployed",
            Error::InvalidPayload => "account: invalid call payload",
            Error::TransferFailed => "ledger: transfer failed",
            Error::ExecutionFailed => "account: call execution failed",
            Error::FailedOp { reason, .. } => reason,
        }
    }
}

impl ::core::fmt::Display for Error {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            Error::FailedOp { op_index, reason } => write!(f, "FailedOp({op_index}, {reason})"),
            other => f.write_str(other.reason()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = ::core::result::Result<T, Error>;
