use ink::prelude::{collections::BTreeMap, vec::Vec};
use ink::primitives::{AccountId, Hash};
use scale::{Decode, DecodeAll, Encode};

use super::{
    account::Account,
    env::AAAccountId,
    error::{Error, Result},
    helpers::{keccak256, keccak256_hash},
};

pub type Salt = [u8; 32];

/// 地址派生的域分离前缀,与 CREATE2 相同。
pub const CREATE2_PREFIX: u8 = 0xff;

/// 账户的初始化参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct Initializer {
    /// 负责部署账户的 factory。
    pub factory: AAAccountId,
    /// 新账户的 owner。
    pub owner: AAAccountId,
}

impl Initializer {
    pub fn new(factory: AAAccountId, owner: AAAccountId) -> Self {
        Self { factory, owner }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    /// UserOperation 中携带的 init code:`factory ‖ owner ‖ salt`。
    pub fn init_code(&self, salt: &Salt) -> Vec<u8> {
        (self, salt).encode()
    }
}

/// 计算账户的反事实地址:`keccak256(0xff ‖ deployer ‖ salt ‖ initializer_hash)`。
pub fn derive_address(deployer: &AAAccountId, initializer_hash: &Hash, salt: &Salt) -> AAAccountId {
    let mut preimage = [0u8; 1 + 32 + 32 + 32];
    preimage[0] = CREATE2_PREFIX;
    let deployer: &[u8] = deployer.as_ref();
    preimage[1..33].copy_from_slice(deployer);
    preimage[33..65].copy_from_slice(salt);
    let initializer_hash: &[u8] = initializer_hash.as_ref();
    preimage[65..].copy_from_slice(initializer_hash);
    AccountId::from(keccak256(&preimage))
}

/// 账户 factory,同时也是"某个地址是否已部署"的唯一来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioner {
    factory: AAAccountId,
    entry_point: AAAccountId,
    accounts: BTreeMap<AAAccountId, Account>,
}

impl Provisioner {
    pub fn new(factory: AAAccountId, entry_point: AAAccountId) -> Self {
        Self {
            factory,
            entry_point,
            accounts: BTreeMap::new(),
        }
    }

    pub fn factory(&self) -> &AAAccountId {
        &self.factory
    }

    pub fn entry_point(&self) -> &AAAccountId {
        &self.entry_point
    }

    /// 账户的反事实地址,与是否已部署无关。
    pub fn get_address(&self, initializer: &[u8], salt: &Salt) -> AAAccountId {
        derive_address(&self.factory, &keccak256_hash(initializer), salt)
    }

    pub fn is_provisioned(&self, address: &AAAccountId) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn account(&self, address: &AAAccountId) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn account_mut(&mut self, address: &AAAccountId) -> Option<&mut Account> {
        self.accounts.get_mut(address)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AAAccountId, &Account)> {
        self.accounts.iter()
    }

    /// 部署账户;如果地址上已有账户,直接返回该地址,不做任何修改。
    pub fn provision(&mut self, initializer: &[u8], salt: Salt) -> Result<AAAccountId> {
        let address = self.get_address(initializer, &salt);
        if self.accounts.contains_key(&address) {
            return Ok(address);
        }

        let init = Initializer::decode_all(&mut &initializer[..])
            .map_err(|_| Error::InvalidInitializer)?;
        if init.factory != self.factory {
            return Err(Error::InvalidInitializer);
        }

        self.accounts
            .insert(address, Account::new(init.owner, self.entry_point));
        ink::env::debug_println!("account provisioned: {:?}", address);
        Ok(address)
    }

    /// 使用 init code 创建账户,返回创建的账户 ID。
    pub fn create_sender(&mut self, init_code: &[u8]) -> Result<AAAccountId> {
        let (initializer, salt) = decode_init_code(init_code)?;
        self.provision(&initializer.to_bytes(), salt)
    }

    /// init code 对应的账户地址,不会部署账户。
    pub fn sender_address(&self, init_code: &[u8]) -> Result<AAAccountId> {
        let (initializer, salt) = decode_init_code(init_code)?;
        Ok(self.get_address(&initializer.to_bytes(), &salt))
    }
}

fn decode_init_code(init_code: &[u8]) -> Result<(Initializer, Salt)> {
    <(Initializer, Salt)>::decode_all(&mut &init_code[..]).map_err(|_| Error::InvalidInitializer)
}
