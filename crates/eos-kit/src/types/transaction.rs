//! Transaction model and binary packing.
//!
//! Nodes accept transactions in the chain's packed binary form: little-endian
//! integers, LEB128 `varuint32` length prefixes, and names/assets in their
//! canonical 64-bit encodings. The signing digest is
//! `sha256(chain_id || packed_trx || 32 zero bytes)` — the zero suffix is the
//! hash of the (empty) context-free data.

use sha2::{Digest, Sha256};

use super::asset::Asset;
use super::key::Signature;
use super::name::AccountName;

/// Little-endian byte writer for the chain's packed forms.
#[derive(Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn push_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn push_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn push_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn push_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn push_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// LEB128 unsigned varint, the chain's length-prefix encoding.
    pub fn push_varuint32(&mut self, mut v: u32) {
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if v == 0 {
                break;
            }
        }
    }

    pub fn push_name(&mut self, name: AccountName) {
        self.push_u64(name.value());
    }

    pub fn push_asset(&mut self, asset: Asset) {
        self.push_i64(asset.amount());
        self.push_u64(asset.symbol().raw());
    }

    /// Length-prefixed UTF-8 string.
    pub fn push_string(&mut self, s: &str) {
        self.push_varuint32(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Length-prefixed byte blob.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.push_varuint32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }
}

/// An authorization entry: which account signs, under which permission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionLevel {
    pub actor: AccountName,
    pub permission: AccountName,
}

impl PermissionLevel {
    /// The `active` permission for an account, the default for transfers.
    pub fn active(actor: AccountName) -> Self {
        Self {
            actor,
            // "active" is a valid name
            permission: AccountName::from_value(3617214756542218240),
        }
    }
}

/// A single intended state change: one contract action with its
/// authorizations and packed argument data.
#[derive(Clone, Debug)]
pub struct Action {
    /// The contract account the action executes on.
    pub account: AccountName,
    /// The action name (e.g. `transfer`).
    pub name: AccountName,
    /// Who authorizes this action.
    pub authorization: Vec<PermissionLevel>,
    /// Packed action arguments.
    pub data: Vec<u8>,
}

impl Action {
    /// Build a token `transfer` action on the given contract.
    ///
    /// Arguments are packed as the token contract's ABI expects:
    /// `from`, `to`, the asset quantity, then the memo.
    pub fn transfer(
        contract: AccountName,
        from: AccountName,
        to: AccountName,
        quantity: Asset,
        memo: &str,
    ) -> Self {
        let mut data = ByteWriter::new();
        data.push_name(from);
        data.push_name(to);
        data.push_asset(quantity);
        data.push_string(memo);

        Self {
            account: contract,
            // "transfer" is a valid name
            name: AccountName::from_value(14829575313431724032),
            authorization: vec![PermissionLevel::active(from)],
            data: data.into_bytes(),
        }
    }

    fn pack_into(&self, w: &mut ByteWriter) {
        w.push_name(self.account);
        w.push_name(self.name);
        w.push_varuint32(self.authorization.len() as u32);
        for auth in &self.authorization {
            w.push_name(auth.actor);
            w.push_name(auth.permission);
        }
        w.push_bytes(&self.data);
    }
}

/// An unsigned transaction: TAPOS header plus actions.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Expiration as seconds since the Unix epoch.
    pub expiration: u32,
    /// Low 16 bits of the referenced block number.
    pub ref_block_num: u16,
    /// Prefix taken from the referenced block's id.
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
    pub actions: Vec<Action>,
}

impl Transaction {
    /// Create a transaction with default resource limits.
    pub fn new(
        expiration: u32,
        ref_block_num: u16,
        ref_block_prefix: u32,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            expiration,
            ref_block_num,
            ref_block_prefix,
            max_net_usage_words: 0,
            max_cpu_usage_ms: 0,
            delay_sec: 0,
            actions,
        }
    }

    /// Serialize to the chain's packed binary form.
    pub fn pack(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.push_u32(self.expiration);
        w.push_u16(self.ref_block_num);
        w.push_u32(self.ref_block_prefix);
        w.push_varuint32(self.max_net_usage_words);
        w.push_u8(self.max_cpu_usage_ms);
        w.push_varuint32(self.delay_sec);
        // context-free actions (none)
        w.push_varuint32(0);
        w.push_varuint32(self.actions.len() as u32);
        for action in &self.actions {
            action.pack_into(&mut w);
        }
        // transaction extensions (none)
        w.push_varuint32(0);
        w.into_bytes()
    }

    /// The digest a signer commits to for this transaction on `chain_id`.
    pub fn signing_digest(&self, chain_id: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(chain_id);
        hasher.update(self.pack());
        // hash slot for context-free data; empty here
        hasher.update([0u8; 32]);
        hasher.finalize().into()
    }
}

/// A packed transaction with its signatures, ready for submission.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    pub signatures: Vec<Signature>,
    pub packed_trx: Vec<u8>,
}

impl SignedTransaction {
    /// The JSON body `/v1/chain/push_transaction` expects.
    pub fn to_push_params(&self) -> serde_json::Value {
        serde_json::json!({
            "signatures": self.signatures.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            "compression": 0,
            "packed_context_free_data": "",
            "packed_trx": hex::encode(&self.packed_trx),
        })
    }
}
