//! WebSocket protocol messages for board generation requests.

use gaia_core::Board;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Generate a balanced board
    Generate {
        /// Attempt budget, server default when absent
        #[serde(default)]
        max_iterations: Option<u32>,
        /// Seed for a reproducible board, random when absent
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned connection ID
    Welcome { connection_id: Uuid },

    /// A balanced board was found
    BoardGenerated {
        iterations: u32,
        elapsed_ms: u64,
        board: Board,
    },

    /// The attempt budget ran out
    NoBoardFound { attempts: u32, elapsed_ms: u64 },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaia_core::tiles::STANDARD_SLOTS;
    use gaia_core::{BoardLayout, Placement};

    #[test]
    fn test_generate_request_parses_with_defaults() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Generate","payload":{}}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Generate {
                max_iterations: None,
                seed: None
            }
        ));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"Generate","payload":{"max_iterations":50,"seed":7}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Generate {
                max_iterations: Some(50),
                seed: Some(7)
            }
        ));
    }

    #[test]
    fn test_ping_has_no_payload() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_no_board_found_shape() {
        let value = serde_json::to_value(ServerMessage::NoBoardFound {
            attempts: 1000,
            elapsed_ms: 12,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "NoBoardFound",
                "payload": { "attempts": 1000, "elapsed_ms": 12 }
            })
        );
    }

    #[test]
    fn test_board_payload_is_hex_list() {
        let placements: Vec<Placement> = STANDARD_SLOTS
            .iter()
            .enumerate()
            .map(|(i, slot)| Placement::new(i as u8 + 1, *slot, 0))
            .collect();
        let board = Board::assemble(BoardLayout::standard(), &placements).unwrap();

        let value = serde_json::to_value(ServerMessage::BoardGenerated {
            iterations: 3,
            elapsed_ms: 1,
            board,
        })
        .unwrap();
        let hexes = value["payload"]["board"].as_array().unwrap();
        assert_eq!(hexes.len(), 190);
        assert_eq!(hexes[0]["tilePositionX"], 0);
        assert_eq!(hexes[0]["tilePositionY"], 1);
    }
}
