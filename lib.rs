#![cfg_attr(not(feature = "std"), no_std)]

pub mod core {
    pub mod account;
    pub mod commitment;
    pub mod env;
    pub mod error;
    pub mod exec;
    pub mod fee;
    pub mod helpers;
    pub mod ledger;
    pub mod policy;
    pub mod provision;
    pub mod sequencer;
    #[cfg(test)]
    pub mod testing;
    pub mod user_operation;
    pub mod validation;
}

pub mod traits {
    pub mod account;
}
