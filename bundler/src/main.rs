use anyhow::{ensure, Context, Result};
use bundler::{Bundler, LocalSigner};
use ink::primitives::AccountId;
use ink_wallet::core::{
    env::AABalance,
    exec::Execute,
    fee::PriceContext,
    provision::{Initializer, Salt},
    user_operation::{fill_user_op_defaults, PartialUserOperation},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod flags {
    xflags::xflags! {
        /// 在内存账本上模拟一次完整的 UserOperation 流程:
        /// 反事实地址、存款、部署、验证、收取预付款与转账。
        cmd simulate {
            /// 混入 commitment 的网络 ID。
            optional --network-id network_id: u64
            /// 单位燃料价格。
            optional --price price: u128
            /// 预先存入反事实地址的金额。
            optional --deposit deposit: u128
            /// payload 转给收款方的金额。
            optional --value value: u128
            /// 部署账户使用的 salt,32 字节十六进制。
            optional --salt salt: String
            /// owner 私钥,32 字节十六进制。
            optional --secret secret: String
            optional --call-limit call_limit: u64
            optional --verification-limit verification_limit: u64
            optional --max-fee max_fee: u64
        }
    }
}

const COORDINATOR: [u8; 32] = [0xee; 32];
const FACTORY: [u8; 32] = [0xfa; 32];
const RECIPIENT: [u8; 32] = [0x77; 32];

const DEFAULT_NETWORK_ID: u64 = 1337;
const DEFAULT_PRICE: AABalance = 1_000_000_000;
const DEFAULT_DEPOSIT: AABalance = 200_000_000_000_000_000;
const DEFAULT_VALUE: AABalance = 1_000_000_000_000;
const DEFAULT_SECRET: [u8; 32] = [0x11; 32];

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match flags::Simulate::from_env() {
        Ok(flags) => {
            if let Err(e) = handle_simulate(flags) {
                xflags::Error::new(format!("{e:#}")).exit();
            }
        }
        Err(err) => err.exit(),
    }
}

fn handle_simulate(flags: flags::Simulate) -> Result<()> {
    let network_id = flags.network_id.unwrap_or(DEFAULT_NETWORK_ID);
    let price = PriceContext::new(flags.price.unwrap_or(DEFAULT_PRICE));
    let signer = match flags.secret.as_deref() {
        Some(secret) => LocalSigner::from_hex(secret)?,
        None => LocalSigner::from_bytes(&DEFAULT_SECRET)?,
    };
    let salt = parse_salt(flags.salt.as_deref())?;

    let mut bundler = Bundler::new(
        AccountId::from(COORDINATOR),
        AccountId::from(FACTORY),
        network_id,
    );
    let initializer = Initializer::new(*bundler.factory(), signer.account_id());
    let sender = bundler.get_address(&initializer, &salt);
    info!(?sender, owner = ?signer.account_id(), "counterfactual account");

    bundler
        .deposit(sender, flags.deposit.unwrap_or(DEFAULT_DEPOSIT))
        .context("deposit")?;

    let recipient = AccountId::from(RECIPIENT);
    let value = flags.value.unwrap_or(DEFAULT_VALUE);
    let op = fill_user_op_defaults(PartialUserOperation {
        sender: Some(sender),
        sequence_number: Some(0),
        initializer: Some(initializer.init_code(&salt)),
        payload: Some(Execute::transfer(recipient, value).to_payload()),
        call_resource_limit: flags.call_limit,
        verification_resource_limit: flags.verification_limit,
        max_fee_rate: flags.max_fee,
        ..Default::default()
    });
    let op = signer.sign_user_op(op, bundler.id(), network_id)?;
    info!(user_op_hash = ?bundler.user_op_hash(&op), "user operation signed");

    let simulated = bundler
        .simulate_validation(&op, &price)
        .context("simulate_validation")?;
    info!(code = simulated.code(), prefund = simulated.prefund, "simulated");

    let receipts = bundler.handle_ops(&[op], &price).context("handle_ops")?;
    for receipt in &receipts {
        info!(
            sender = ?receipt.sender,
            nonce = receipt.sequence_number,
            prefund = receipt.prefund,
            code = receipt.signature.code(),
            executed = receipt.executed,
            "receipt"
        );
    }

    info!(
        coordinator = bundler.balance_of(bundler.id()),
        account = bundler.balance_of(&sender),
        recipient = bundler.balance_of(&recipient),
        "balances"
    );
    Ok(())
}

fn parse_salt(salt: Option<&str>) -> Result<Salt> {
    let Some(salt) = salt else {
        return Ok([0; 32]);
    };
    let bytes = hex::decode(salt.trim_start_matches("0x")).context("salt is not hex")?;
    ensure!(bytes.len() == 32, "salt must be 32 bytes, got {}", bytes.len());
    let mut out = [0; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}
