use ink::env::{DefaultEnvironment, Environment};

/// AccountAbstractionEnvironment
pub type AAEnvironment = DefaultEnvironment;

pub type AABalance = <AAEnvironment as Environment>::Balance;
pub type AAAccountId = <AAEnvironment as Environment>::AccountId;
pub type AAHash = <AAEnvironment as Environment>::Hash;

/// 网络标识,参与 commitment 的域分离。
pub type NetworkId = u64;
