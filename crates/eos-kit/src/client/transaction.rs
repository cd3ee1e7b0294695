//! Transaction assembly: TAPOS, expiration, signing, submission.
//!
//! The chain requires every transaction to reference a recent block (TAPOS:
//! transaction-as-proof-of-stake). Referencing a block a few steps behind
//! the head keeps the reference valid even if the head micro-forks before
//! the transaction propagates.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::Error;
use crate::types::{Action, SignedTransaction, Transaction, TransactionReceipt};

use super::rpc::RpcClient;
use super::signer::Signer;
use super::transport::Transport;

/// How far behind the head block the TAPOS reference sits.
pub const BLOCKS_BEHIND: u32 = 3;

/// Transaction lifetime in seconds from assembly.
pub const EXPIRE_SECONDS: u32 = 300;

/// Assemble an unsigned transaction around `actions`.
///
/// Two chain reads: `get_info` for the head block and chain id, then
/// `get_block` on the reference block for its TAPOS prefix. Returns the
/// transaction together with the chain id its signature must commit to.
pub async fn assemble<T: Transport>(
    rpc: &RpcClient<T>,
    actions: Vec<Action>,
) -> Result<(Transaction, [u8; 32]), Error> {
    let info = rpc.get_info().await?;
    let chain_id = info.chain_id_bytes()?;

    let ref_block = rpc
        .get_block(info.head_block_num.saturating_sub(BLOCKS_BEHIND))
        .await?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::Config("system clock is before the unix epoch".into()))?;
    let expiration = now.as_secs() as u32 + EXPIRE_SECONDS;

    let tx = Transaction::new(
        expiration,
        (ref_block.block_num & 0xffff) as u16,
        ref_block.ref_block_prefix,
        actions,
    );
    Ok((tx, chain_id))
}

/// Assemble, sign, and submit a transaction in one go.
pub async fn sign_and_push<T: Transport>(
    rpc: &RpcClient<T>,
    signer: &dyn Signer,
    actions: Vec<Action>,
) -> Result<TransactionReceipt, Error> {
    let (tx, chain_id) = assemble(rpc, actions).await?;
    let digest = tx.signing_digest(&chain_id);
    let signature = signer.sign_digest(&digest)?;
    debug!(
        ref_block_num = tx.ref_block_num,
        expiration = tx.expiration,
        actions = tx.actions.len(),
        "signed transaction"
    );

    let signed = SignedTransaction {
        signatures: vec![signature],
        packed_trx: tx.pack(),
    };
    Ok(rpc.push_transaction(&signed).await?)
}
