use super::{
    env::{AAAccountId, AABalance, AAEnvironment},
    error::{Error, Result},
};
use ink::env::{
    call::{
        build_call,
        utils::{Argument, ArgumentList, EmptyArgumentList},
        Call, CallParams, ExecutionInput, Selector,
    },
    CallFlags,
};
use ink::prelude::vec;
use ink::prelude::vec::Vec;
use scale::{DecodeAll, Encode};

/// 账户 `execute` 的调用内容,也是 UserOperation `payload` 的编码格式。
#[derive(scale::Decode, scale::Encode, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct Execute {
    /// 被调用的账户或合约。
    pub target: AAAccountId,
    /// 随调用转出的金额。
    pub value: AABalance,
    /// `selector ‖ SCALE 编码的参数`,为空时表示普通转账。
    pub data: Vec<u8>,
}

type Args = ArgumentList<Argument<OpaqueTypes>, EmptyArgumentList>;

impl Execute {
    pub fn new(target: AAAccountId, value: AABalance, data: Vec<u8>) -> Self {
        Self {
            target,
            value,
            data,
        }
    }

    pub fn transfer(target: AAAccountId, value: AABalance) -> Self {
        Self::new(target, value, Vec::new())
    }

    pub fn is_transfer(&self) -> bool {
        self.data.is_empty()
    }

    /// 从 UserOperation 的 payload 中解析调用,空 payload 表示没有调用。
    pub fn decode_payload(payload: &[u8]) -> Result<Option<Self>> {
        if payload.is_empty() {
            return Ok(None);
        }
        Self::decode_all(&mut &payload[..])
            .map(Some)
            .map_err(|_| Error::InvalidPayload)
    }

    pub fn to_payload(&self) -> Vec<u8> {
        self.encode()
    }

    /// 构造跨合约调用参数,`data` 的前 4 个字节是 selector。
    pub fn call_params(
        &self,
        gas_limit: u64,
        allow_reentry: bool,
    ) -> Result<CallParams<AAEnvironment, Call<AAEnvironment>, Args, OpaqueTypes>> {
        if self.data.len() < 4 {
            return Err(Error::InvalidPayload);
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&self.data[..4]);
        let input = self.data[4..].to_vec();

        Ok(build_call::<AAEnvironment>()
            .call(self.target)
            .gas_limit(gas_limit)
            .transferred_value(self.value)
            .call_flags(CallFlags::default().set_allow_reentry(allow_reentry))
            .exec_input(ExecutionInput::new(Selector::new(selector)).push_arg(OpaqueTypes(input)))
            .returns::<OpaqueTypes>()
            .params())
    }
}

/// 原样写出/读入的字节,用于转发已经编码好的参数与返回值。
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueTypes(pub Vec<u8>);

impl scale::Encode for OpaqueTypes {
    #[inline]
    fn size_hint(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn encode_to<O: scale::Output + ?Sized>(&self, output: &mut O) {
        output.write(&self.0);
    }
}

impl scale::Decode for OpaqueTypes {
    #[inline]
    fn decode<I: scale::Input>(input: &mut I) -> ::core::result::Result<Self, scale::Error> {
        let len = input.remaining_len()?;

        let mut bytes;

        if let Some(len) = len {
            bytes = vec![0; len];
            input.read(&mut bytes[..len])?;
        } else {
            bytes = Vec::new();
            while let Ok(b) = input.read_byte() {
                bytes.push(b);
            }
        };

        Ok(OpaqueTypes(bytes))
    }
}
