use ink::env::hash::{Blake2x256, CryptoHash, Keccak256};
use ink::primitives::Hash;
use scale::{Decode, Encode};

/// 签名验证成功时 validate_user_op 返回的哨兵值。
pub const SIG_VALIDATION_SUCCEEDED: u8 = 0;
/// 签名验证失败时 validate_user_op 返回的哨兵值。
pub const SIG_VALIDATION_FAILED: u8 = 1;

/// 账户对 UserOperation 签名的判定结果。
///
/// 签名失败是软失败:验证流程照常收取 prefund 并推进序号,
/// 只是把结果通过哨兵值告知 entry point。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum SignatureValidation {
    Authorized,
    Unauthorized,
}

impl SignatureValidation {
    pub fn code(self) -> u8 {
        match self {
            SignatureValidation::Authorized => SIG_VALIDATION_SUCCEEDED,
            SignatureValidation::Unauthorized => SIG_VALIDATION_FAILED,
        }
    }

    pub fn is_authorized(self) -> bool {
        matches!(self, SignatureValidation::Authorized)
    }
}

impl From<bool> for SignatureValidation {
    fn from(authorized: bool) -> Self {
        if authorized {
            SignatureValidation::Authorized
        } else {
            SignatureValidation::Unauthorized
        }
    }
}

/// 计算一个字节数组的 Keccak256 哈希值。
#[inline]
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    Keccak256::hash(input, &mut hash);
    hash
}

/// 计算一个字节数组的 Keccak256 哈希值。
pub fn keccak256_hash(input: &[u8]) -> Hash {
    Hash::from(keccak256(input))
}

/// 计算一个字节数组的 Blake2x256 哈希值。
#[inline]
pub fn blake2x256(input: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    Blake2x256::hash(input, &mut hash);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn sentinel_codes() {
        assert_eq!(SignatureValidation::Authorized.code(), 0);
        assert_eq!(SignatureValidation::Unauthorized.code(), 1);
        assert!(SignatureValidation::from(true).is_authorized());
        assert!(!SignatureValidation::from(false).is_authorized());
    }
}
