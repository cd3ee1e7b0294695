//! Client module: the resilient RPC layer and the high-level [`Eos`] client.
//!
//! - [`Eos`] — The main client, the single entry point for all operations
//! - [`EosBuilder`] — Fluent builder for configuring the client
//! - [`RpcClient`] — Low-level RPC client with endpoint rotation and retry
//! - [`EndpointPool`] — Immutable set of candidate RPC nodes
//! - [`Transport`] — One-shot HTTP seam, swappable for tests
//! - [`Signer`] — Transaction signing seam; [`InMemorySigner`] is the
//!   in-process implementation

mod endpoints;
mod eos;
mod rpc;
mod signer;
mod transaction;
mod transport;

pub use endpoints::{EndpointPool, KNOWN_BAD_ENDPOINTS, MAINNET_ENDPOINTS};
pub use eos::{Eos, EosBuilder};
pub use rpc::{RpcClient, MAX_ATTEMPTS};
pub use signer::{InMemorySigner, Signer};
pub use transaction::{assemble, sign_and_push, BLOCKS_BEHIND, EXPIRE_SECONDS};
pub use transport::{HttpTransport, Transport};
