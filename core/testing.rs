//! 单元测试共用的签名工具。

use ink::primitives::Hash;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use super::{
    commitment::signed_message_hash, env::AAAccountId, policy::ecdsa_account_id,
    user_operation::UserOperation,
};

pub fn secret(seed: u8) -> SecretKey {
    SecretKey::from_slice(&[seed; 32]).expect("seed is a valid secret key")
}

pub fn account_of(key: &SecretKey) -> AAAccountId {
    let secp = Secp256k1::new();
    ecdsa_account_id(&PublicKey::from_secret_key(&secp, key).serialize())
}

/// `r ‖ s ‖ v` 格式的签名,`v` 为 27/28。
pub fn sign(key: &SecretKey, commitment: &Hash) -> Vec<u8> {
    let secp = Secp256k1::new();
    let message = Message::from_slice(&signed_message_hash(commitment)).expect("32 byte digest");
    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, key)
        .serialize_compact();
    let mut signature = compact.to_vec();
    signature.push(recovery_id.to_i32() as u8 + 27);
    signature
}

pub fn sign_user_op(
    op: UserOperation,
    key: &SecretKey,
    coordinator: &AAAccountId,
    network_id: u64,
) -> UserOperation {
    let commitment = op.commitment(coordinator, network_id);
    op.with_authorization(sign(key, &commitment))
}
