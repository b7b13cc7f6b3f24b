//! Wire format between the bridge and a remote settlement authority.
//!
//! A frame is a 4-byte big-endian length, one tag byte naming the
//! variant, and a bincode body; the length covers the tag plus the
//! body. Decimal amounts travel as strings because bincode cannot
//! drive `Decimal`'s self-describing deserializer.

use grid_types::{Address, OfferId, OutageId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Upper bound on the body of a single frame. Authority messages are
/// tiny; anything near this size is a corrupt or hostile peer.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

const HEADER_LEN: usize = 5;

/// Request and response messages exchanged with a settlement authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AuthorityMessage {
    BalanceRequest {
        address: Address,
    },
    BalanceResponse {
        #[serde(with = "rust_decimal::serde::str")]
        balance: Decimal,
    },
    TradeRequest {
        offer_id: OfferId,
        #[serde(with = "rust_decimal::serde::str")]
        amount: Decimal,
    },
    ClaimRequest {
        outage_id: OutageId,
    },
    ReceiptResponse {
        hash: String,
        block_reference: String,
    },
    Error {
        message: String,
    },
}

impl AuthorityMessage {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::BalanceRequest { .. } => 1,
            Self::BalanceResponse { .. } => 2,
            Self::TradeRequest { .. } => 3,
            Self::ClaimRequest { .. } => 4,
            Self::ReceiptResponse { .. } => 5,
            Self::Error { .. } => 255,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BalanceRequest { .. } => "BalanceRequest",
            Self::BalanceResponse { .. } => "BalanceResponse",
            Self::TradeRequest { .. } => "TradeRequest",
            Self::ClaimRequest { .. } => "ClaimRequest",
            Self::ReceiptResponse { .. } => "ReceiptResponse",
            Self::Error { .. } => "Error",
        }
    }
}

/// Frames [`AuthorityMessage`]s for the wire.
pub struct AuthorityCodec;

impl AuthorityCodec {
    /// Frame a message.
    pub fn encode(msg: &AuthorityMessage) -> Result<Vec<u8>, ProtocolError> {
        let body =
            bincode::serialize(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if body.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: body.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }

        let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
        frame.extend_from_slice(&((body.len() + 1) as u32).to_be_bytes());
        frame.push(msg.type_tag());
        frame.extend_from_slice(&body);
        Ok(frame)
    }

    /// Parse one frame. The input must hold exactly one complete frame;
    /// a tag byte that disagrees with the decoded variant is treated as
    /// corruption.
    pub fn decode(frame: &[u8]) -> Result<AuthorityMessage, ProtocolError> {
        if frame.len() < HEADER_LEN {
            return Err(ProtocolError::FramingError(format!(
                "frame shorter than the {HEADER_LEN}-byte header"
            )));
        }
        let mut declared = [0u8; 4];
        declared.copy_from_slice(&frame[0..4]);
        let len = u32::from_be_bytes(declared) as usize;
        if len < 1 {
            return Err(ProtocolError::FramingError(
                "frame declares an empty body".into(),
            ));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len - 1,
                max: MAX_MESSAGE_SIZE,
            });
        }
        if frame.len() != 4 + len {
            return Err(ProtocolError::FramingError(format!(
                "expected a {}-byte frame, got {}",
                4 + len,
                frame.len()
            )));
        }

        let msg: AuthorityMessage = bincode::deserialize(&frame[HEADER_LEN..])
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        if msg.type_tag() != frame[4] {
            return Err(ProtocolError::FramingError(format!(
                "tag byte {} does not match decoded {}",
                frame[4],
                msg.type_name()
            )));
        }
        Ok(msg)
    }
}
