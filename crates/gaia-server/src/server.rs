//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use gaia_core::{BoardGenerator, BoardLayout, GenerationResult, GeneratorConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Mapping from connection ID to its message sender
    pub connections: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    /// Tile layout every board is drawn from
    pub layout: Arc<BoardLayout>,
    /// Defaults for requests that do not override them
    pub config: GeneratorConfig,
}

impl ServerState {
    pub fn new(layout: BoardLayout, config: GeneratorConfig) -> Self {
        Self {
            connections: DashMap::new(),
            layout: Arc::new(layout),
            config,
        }
    }

    /// Send a message to a specific connection.
    pub fn send_to_connection(&self, connection_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.connections.get(&connection_id) {
            let _ = sender.send(msg);
        }
    }

    /// Generator settings for a request, applying its budget override.
    fn request_config(&self, max_iterations: Option<u32>) -> GeneratorConfig {
        GeneratorConfig {
            max_iterations: max_iterations.unwrap_or(self.config.max_iterations),
            ..self.config
        }
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Gaia map server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.connections.insert(connection_id, tx);

    let welcome = ServerMessage::Welcome { connection_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(connection_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", connection_id, text);
                    state.send_to_connection(
                        connection_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", connection_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    state.connections.remove(&connection_id);
    send_task.abort();

    info!("Connection closed for {}", connection_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(connection_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::Generate {
            max_iterations,
            seed,
        } => {
            let config = state.request_config(max_iterations);
            if let Err(e) = config.validate() {
                state.send_to_connection(
                    connection_id,
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                );
                return;
            }

            // Generation is CPU-bound; keep it off the async workers.
            let state = Arc::clone(state);
            tokio::spawn(async move {
                let layout = Arc::clone(&state.layout);
                let outcome =
                    tokio::task::spawn_blocking(move || run_generation(&layout, config, seed))
                        .await;
                let reply = match outcome {
                    Ok(reply) => reply,
                    Err(e) => {
                        error!("Generation task for {} failed: {}", connection_id, e);
                        ServerMessage::Error {
                            message: "Board generation failed".to_string(),
                        }
                    }
                };
                state.send_to_connection(connection_id, reply);
            });
        }

        ClientMessage::Ping => {
            state.send_to_connection(connection_id, ServerMessage::Pong);
        }
    }
}

/// Run one generation and turn its outcome into a reply, logging the timing.
fn run_generation(layout: &BoardLayout, config: GeneratorConfig, seed: Option<u64>) -> ServerMessage {
    let generator = match BoardGenerator::new(layout, config) {
        Ok(generator) => generator,
        Err(e) => {
            return ServerMessage::Error {
                message: e.to_string(),
            }
        }
    };

    let start = Instant::now();
    let result = match seed {
        Some(seed) => generator.generate_seeded(seed),
        None => generator.generate(),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        GenerationResult::Found { board, iterations } => {
            info!(elapsed_ms, "Board generated in {} iterations", iterations);
            ServerMessage::BoardGenerated {
                iterations,
                elapsed_ms,
                board,
            }
        }
        GenerationResult::Exhausted { attempts } => {
            warn!(elapsed_ms, "No balanced board after {} attempts", attempts);
            ServerMessage::NoBoardFound {
                attempts,
                elapsed_ms,
            }
        }
    }
}
