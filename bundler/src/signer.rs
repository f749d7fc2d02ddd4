use anyhow::{ensure, Context, Result};
use ink::primitives::Hash;
use ink_wallet::core::{
    commitment::signed_message_hash, env::AAAccountId, env::NetworkId, policy::ecdsa_account_id,
    user_operation::UserOperation,
};
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

/// 持有 owner 私钥的本地签名器。
pub struct LocalSigner {
    secp: Secp256k1<All>,
    secret: SecretKey,
}

impl LocalSigner {
    pub fn from_bytes(secret: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(secret).context("invalid secp256k1 secret key")?;
        Ok(Self {
            secp: Secp256k1::new(),
            secret,
        })
    }

    /// 解析 64 个十六进制字符的私钥,可以带 `0x` 前缀。
    pub fn from_hex(secret: &str) -> Result<Self> {
        let bytes = hex::decode(secret.trim_start_matches("0x")).context("secret is not hex")?;
        ensure!(bytes.len() == 32, "secret must be 32 bytes, got {}", bytes.len());
        Self::from_bytes(&bytes)
    }

    /// 签名器在链上的身份,`blake2_256(compressed public key)`。
    pub fn account_id(&self) -> AAAccountId {
        let public_key = PublicKey::from_secret_key(&self.secp, &self.secret);
        ecdsa_account_id(&public_key.serialize())
    }

    /// 对 commitment 的以太坊个人消息摘要签名,输出 `r ‖ s ‖ v`,`v` 为 27/28。
    pub fn sign(&self, commitment: &Hash) -> Result<Vec<u8>> {
        let message = Message::from_slice(&signed_message_hash(commitment))?;
        let (recovery_id, compact) = self
            .secp
            .sign_ecdsa_recoverable(&message, &self.secret)
            .serialize_compact();
        let mut signature = compact.to_vec();
        signature.push(recovery_id.to_i32() as u8 + 27);
        Ok(signature)
    }

    pub fn sign_user_op(
        &self,
        user_op: UserOperation,
        coordinator: &AAAccountId,
        network_id: NetworkId,
    ) -> Result<UserOperation> {
        let commitment = user_op.commitment(coordinator, network_id);
        Ok(user_op.with_authorization(self.sign(&commitment)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink_wallet::core::policy::recover_signer;

    #[test]
    fn signature_recovers_to_account_id() {
        let signer = LocalSigner::from_bytes(&[7; 32]).unwrap();
        let commitment = Hash::from([9; 32]);
        let signature = signer.sign(&commitment).unwrap();

        assert_eq!(signature.len(), 65);
        assert!(signature[64] == 27 || signature[64] == 28);
        assert_eq!(recover_signer(&signature, &commitment), Some(signer.account_id()));
    }

    #[test]
    fn hex_secrets() {
        let plain = LocalSigner::from_hex(&"07".repeat(32)).unwrap();
        let prefixed = LocalSigner::from_hex(&format!("0x{}", "07".repeat(32))).unwrap();
        assert_eq!(plain.account_id(), prefixed.account_id());

        assert!(LocalSigner::from_hex("0x0707").is_err());
        assert!(LocalSigner::from_hex("zz").is_err());
        assert!(LocalSigner::from_bytes(&[0; 32]).is_err());
    }
}
