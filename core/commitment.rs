use ink::primitives::Hash;
use scale::Encode;

use super::{
    env::{AAAccountId, NetworkId},
    helpers::{keccak256, keccak256_hash},
    user_operation::UserOperation,
};

/// 个人消息签名前缀,owner 对 commitment 签名时使用。
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

impl UserOperation {
    /// 生成请求 ID - 该请求的唯一标识符。
    ///
    /// 请求 ID 是 userOp 的内容(除签名外)、entry point 以及网络 ID 的哈希。
    pub fn commitment(&self, coordinator: &AAAccountId, network_id: NetworkId) -> Hash {
        commitment_of(&self.hash(), coordinator, network_id)
    }
}

/// 将已打包的用户操作哈希绑定到 entry point 与网络上。
pub fn commitment_of(packed_hash: &Hash, coordinator: &AAAccountId, network_id: NetworkId) -> Hash {
    keccak256_hash(&(packed_hash, coordinator, network_id).encode())
}

/// owner 实际签名的摘要。
pub fn signed_message_hash(commitment: &Hash) -> [u8; 32] {
    let mut message = [0u8; 28 + 32];
    message[..28].copy_from_slice(SIGNED_MESSAGE_PREFIX);
    let commitment: &[u8] = commitment.as_ref();
    message[28..].copy_from_slice(commitment);
    keccak256(&message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::user_operation::{fill_user_op_defaults, PartialUserOperation};
    use ink::primitives::AccountId;
    use std::collections::BTreeSet;

    fn op() -> UserOperation {
        fill_user_op_defaults(PartialUserOperation {
            sender: Some(AccountId::from([1; 32])),
            call_resource_limit: Some(200_000),
            verification_resource_limit: Some(100_000),
            max_fee_rate: Some(3_000_000_000),
            ..Default::default()
        })
    }

    #[test]
    fn commitment_preimage_is_fixed_width() {
        let coordinator = AccountId::from([2; 32]);
        let preimage = (op().hash(), &coordinator, 5u64).encode();
        assert_eq!(preimage.len(), 72);
        assert_eq!(&preimage[32..64], &[2u8; 32]);
        assert_eq!(&preimage[64..], &5u64.to_le_bytes());
        assert_eq!(op().commitment(&coordinator, 5), keccak256_hash(&preimage));
    }

    #[test]
    fn commitment_is_deterministic() {
        let coordinator = AccountId::from([2; 32]);
        assert_eq!(op().commitment(&coordinator, 1), op().commitment(&coordinator, 1));
    }

    #[test]
    fn commitment_is_domain_separated() {
        let op = op();
        let mut seen = BTreeSet::new();
        for coordinator in 0u8..16 {
            for network_id in 0u64..16 {
                let commitment = op.commitment(&AccountId::from([coordinator; 32]), network_id);
                assert!(seen.insert(commitment), "collision at {coordinator}/{network_id}");
            }
        }
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn signature_does_not_affect_commitment() {
        let coordinator = AccountId::from([2; 32]);
        let signed = op().with_authorization(vec![0xee; 65]);
        assert_eq!(signed.commitment(&coordinator, 1), op().commitment(&coordinator, 1));
    }

    #[test]
    fn signed_message_hash_uses_prefix() {
        let commitment = Hash::from([0x11; 32]);
        let mut expected = SIGNED_MESSAGE_PREFIX.to_vec();
        expected.extend_from_slice(&[0x11; 32]);
        assert_eq!(signed_message_hash(&commitment), keccak256(&expected));
        assert_eq!(SIGNED_MESSAGE_PREFIX.len(), 28);
    }
}
