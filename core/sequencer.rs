use super::error::{Error, Result};

/// 账户的防重放序号,从 0 开始,每次验证成功后加 1。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Sequencer {
    current: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn check(&self, sequence_number: u64) -> Result<()> {
        if sequence_number != self.current {
            return Err(Error::InvalidSequence);
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Result<()> {
        self.current = self.current.checked_add(1).ok_or(Error::InvalidSequence)?;
        Ok(())
    }
}
