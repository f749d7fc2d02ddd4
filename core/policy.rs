//! 账户的授权策略。
//!
//! 两个相互独立的检查:
//! - 调用者门禁:`execute` 与 `change_owner` 只允许 owner 或 entry point 调用,否则硬失败。
//! - 签名检查:恢复 `authorization` 的签名者并与 owner 比较,不匹配时返回哨兵值而不是错误。

use ink::primitives::{AccountId, Hash};

use super::{
    commitment::signed_message_hash,
    env::AAAccountId,
    error::{Error, Result},
    helpers::{blake2x256, SignatureValidation},
};

/// secp256k1 曲线阶 n
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

pub const SIGNATURE_LEN: usize = 65;

/// 调用者必须是 owner 或 entry point。
pub fn ensure_authority_or_coordinator(
    caller: &AAAccountId,
    authority: &AAAccountId,
    coordinator: &AAAccountId,
) -> Result<()> {
    if caller == authority || caller == coordinator {
        Ok(())
    } else {
        Err(Error::CallerNotAuthorized)
    }
}

/// ECDSA 压缩公钥对应的账户 ID(`blake2_256(pubkey)`)。
pub fn ecdsa_account_id(public_key: &[u8; 33]) -> AAAccountId {
    AccountId::from(blake2x256(public_key))
}

/// 恢复对 `commitment` 签名的账户。
///
/// 签名格式为 `r ‖ s ‖ v`,`v` 可以是 0/1 或 27/28。格式错误时返回 `None`。
pub fn recover_signer(signature: &[u8], commitment: &Hash) -> Option<AAAccountId> {
    let signature: &[u8; SIGNATURE_LEN] = signature.try_into().ok()?;
    if !is_valid_scalar(&signature[..32]) || !is_valid_scalar(&signature[32..64]) {
        return None;
    }

    let mut signature = *signature;
    if signature[64] >= 27 {
        signature[64] -= 27;
    }
    if signature[64] > 3 {
        return None;
    }

    let message_hash = signed_message_hash(commitment);
    let mut public_key = [0u8; 33];
    ink::env::ecdsa_recover(&signature, &message_hash, &mut public_key).ok()?;
    Some(ecdsa_account_id(&public_key))
}

/// 检查签名是否由 `authority` 产生。
pub fn check_signature(
    authority: &AAAccountId,
    signature: &[u8],
    commitment: &Hash,
) -> SignatureValidation {
    let signer = recover_signer(signature, commitment);
    SignatureValidation::from(signer.as_ref() == Some(authority))
}

// r 与 s 必须位于 [1, n-1]
fn is_valid_scalar(scalar: &[u8]) -> bool {
    scalar.iter().any(|b| *b != 0) && scalar < &SECP256K1_ORDER[..]
}
