use async_trait::async_trait;
use grid_types::{Address, OfferId, OutageId};
use rust_decimal::Decimal;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::authority::{SettlementAuthority, SettlementReceipt};
use crate::error::AuthorityError;
use crate::protocol::{AuthorityCodec, AuthorityMessage, MAX_MESSAGE_SIZE};

/// Network client for a remote settlement authority.
///
/// Speaks the framed protocol from [`crate::protocol`] over TCP, one
/// connection per request. Connectivity and framing problems map to
/// [`AuthorityError::Unavailable`] so the bridge retries them; an
/// explicit `Error` frame maps to [`AuthorityError::Rejected`].
#[derive(Clone, Debug)]
pub struct RpcAuthority {
    addr: String,
}

impl RpcAuthority {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn call(&self, request: &AuthorityMessage) -> Result<AuthorityMessage, AuthorityError> {
        let frame = AuthorityCodec::encode(request)
            .map_err(|e| AuthorityError::Unavailable(e.to_string()))?;

        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| AuthorityError::Unavailable(format!("connect {}: {}", self.addr, e)))?;

        stream
            .write_all(&frame)
            .await
            .map_err(|e| AuthorityError::Unavailable(format!("write: {}", e)))?;

        let mut header = [0u8; 4];
        stream
            .read_exact(&mut header)
            .await
            .map_err(|e| AuthorityError::Unavailable(format!("read header: {}", e)))?;
        let len = u32::from_be_bytes(header) as usize;
        if len < 1 || len - 1 > MAX_MESSAGE_SIZE {
            return Err(AuthorityError::Unavailable(format!(
                "invalid frame length {}",
                len
            )));
        }

        let mut body = vec![0u8; len];
        stream
            .read_exact(&mut body)
            .await
            .map_err(|e| AuthorityError::Unavailable(format!("read body: {}", e)))?;

        let mut full = Vec::with_capacity(4 + len);
        full.extend_from_slice(&header);
        full.extend_from_slice(&body);
        let response = AuthorityCodec::decode(&full)
            .map_err(|e| AuthorityError::Unavailable(e.to_string()))?;

        debug!(
            request = request.type_name(),
            response = response.type_name(),
            "authority call"
        );

        match response {
            AuthorityMessage::Error { message } => Err(AuthorityError::Rejected(message)),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl SettlementAuthority for RpcAuthority {
    async fn balance_of(&self, address: &Address) -> Result<Decimal, AuthorityError> {
        let request = AuthorityMessage::BalanceRequest {
            address: address.clone(),
        };
        match self.call(&request).await? {
            AuthorityMessage::BalanceResponse { balance } => Ok(balance),
            other => Err(AuthorityError::Unavailable(format!(
                "unexpected response: {}",
                other.type_name()
            ))),
        }
    }

    async fn execute_trade(
        &self,
        offer_id: OfferId,
        amount: Decimal,
    ) -> Result<SettlementReceipt, AuthorityError> {
        let request = AuthorityMessage::TradeRequest { offer_id, amount };
        match self.call(&request).await? {
            AuthorityMessage::ReceiptResponse {
                hash,
                block_reference,
            } => Ok(SettlementReceipt {
                hash,
                block_reference,
            }),
            other => Err(AuthorityError::Unavailable(format!(
                "unexpected response: {}",
                other.type_name()
            ))),
        }
    }

    async fn claim_compensation(
        &self,
        outage_id: OutageId,
    ) -> Result<SettlementReceipt, AuthorityError> {
        let request = AuthorityMessage::ClaimRequest { outage_id };
        match self.call(&request).await? {
            AuthorityMessage::ReceiptResponse {
                hash,
                block_reference,
            } => Ok(SettlementReceipt {
                hash,
                block_reference,
            }),
            other => Err(AuthorityError::Unavailable(format!(
                "unexpected response: {}",
                other.type_name()
            ))),
        }
    }
}
