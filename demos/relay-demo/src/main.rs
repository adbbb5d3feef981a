use std::sync::Arc;

use proxylink::prelude::*;
use proxylink_protocol::ClickAction;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const CHANNEL: &str = "proxylink:main";

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl NamedEnum for GameMode {
    const ENUMERATION: &'static str = "GameMode";

    fn name(&self) -> &'static str {
        match self {
            GameMode::Survival => "SURVIVAL",
            GameMode::Creative => "CREATIVE",
            GameMode::Adventure => "ADVENTURE",
            GameMode::Spectator => "SPECTATOR",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "SURVIVAL" => Some(GameMode::Survival),
            "CREATIVE" => Some(GameMode::Creative),
            "ADVENTURE" => Some(GameMode::Adventure),
            "SPECTATOR" => Some(GameMode::Spectator),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Proxy side
// ---------------------------------------------------------------------------

/// Prints what the "proxy" receives on the main channel.
fn on_main_channel(message: &IncomingMessage) {
    let (kind, fields) = match message.decode_fields::<ProxyMessage>() {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable message");
            return;
        }
    };

    match kind {
        ProxyMessage::GameMode => match fields[1].as_enum::<GameMode>() {
            Ok(mode) => tracing::info!(player = ?fields[0].as_uuid(), ?mode, "game mode change"),
            Err(e) => tracing::warn!(error = %e, "bad game mode"),
        },
        _ => {
            let rendered: Vec<String> = fields.iter().map(ToString::to_string).collect();
            tracing::info!(
                origin = %message.header.origin,
                %kind,
                fields = %rendered.join(", "),
                "received"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), ProxyLinkError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (transport, deliveries) = LoopbackTransport::new();
    transport.register_both(DEFAULT_CHANNEL);

    let mut dispatcher = Dispatcher::new(DEFAULT_CHANNEL);
    dispatcher.register(CHANNEL, on_main_channel);
    let proxy = tokio::spawn(dispatcher.run(deliveries));

    let messenger = Arc::new(
        Messenger::builder()
            .origin_name("survival-1")
            .debug(true)
            .build(transport.clone(), transport.clone()),
    );

    // Nobody online yet: logged and dropped.
    let outcome = messenger.send(None, CHANNEL, ProxyMessage::Broadcast, &[Value::from("hello?")])?;
    tracing::info!(?outcome, "before anyone joined");

    let steve = transport.connect("Steve");
    let player = Uuid::new_v4();

    messenger.send(None, CHANNEL, ProxyMessage::Broadcast, &[Value::from("Server restarting in 5 minutes")])?;
    messenger.send(
        Some(&steve),
        CHANNEL,
        ProxyMessage::TellPlayer,
        &[
            Value::Identifier(player),
            Value::RichText(
                RichText::plain("Click to vote")
                    .color("gold")
                    .bold()
                    .on_click(ClickAction::RunCommand, "/vote"),
            ),
        ],
    )?;
    messenger.send(
        None,
        CHANNEL,
        ProxyMessage::PlayerTeleport,
        &[
            Value::Identifier(player),
            Value::from("world_nether"),
            Value::Int32(100),
            Value::Int32(64),
            Value::Int32(-200),
        ],
    )?;
    messenger.send(
        None,
        CHANNEL,
        ProxyMessage::GameMode,
        &[Value::Identifier(player), Value::enum_name(&GameMode::Creative)],
    )?;

    let mut stats = StructuredMap::new();
    stats.insert("kills".into(), 12.into());
    stats.insert("rank".into(), "gold".into());
    messenger.send(
        None,
        CHANNEL,
        ProxyMessage::PlayerData,
        &[Value::Identifier(player), Value::StructuredMap(stats)],
    )?;

    // Sends from several threads share one messenger.
    let workers: Vec<_> = (0..3)
        .map(|i| {
            let messenger = Arc::clone(&messenger);
            std::thread::spawn(move || {
                messenger.send(
                    None,
                    CHANNEL,
                    ProxyMessage::Announcement,
                    &[Value::from(format!("worker {i}")), Value::compressed("§aGreen §rtext")],
                )
            })
        })
        .collect();
    for worker in workers {
        match worker.join() {
            Ok(result) => {
                result?;
            }
            Err(_) => tracing::error!("worker thread panicked"),
        }
    }

    // Too large: dropped by the size guard.
    let outcome = messenger.send(
        None,
        CHANNEL,
        ProxyMessage::Broadcast,
        &[Value::from("x".repeat(40_000))],
    )?;
    tracing::info!(?outcome, "oversized broadcast");

    // Wrong field count: a programming error, surfaced to the caller.
    if let Err(e) = messenger.send(
        None,
        CHANNEL,
        ProxyMessage::ServerAlias,
        &[Value::from("a"), Value::from("b"), Value::from("c")],
    ) {
        tracing::warn!(error = %e, "rejected");
    }

    messenger.send_legacy(None, &[Value::from("Connect"), Value::from("lobby")])?;

    drop(messenger);
    drop(transport);

    match proxy.await {
        Ok(dispatched) => tracing::info!(dispatched, "proxy finished"),
        Err(e) => tracing::error!(error = %e, "proxy task failed"),
    }
    Ok(())
}
