//! Registry events reach WebSocket subscribers.

use std::time::Duration;

use alloy::primitives::Address;
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;

use land_registry::blockchain::LandEvent;
use land_registry::lifecycle::Shutdown;
use land_registry::HttpServer;

mod common;

#[tokio::test]
async fn test_events_are_streamed_as_json() {
    let app = common::test_app("User");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(app.state.clone());
    let handle = tokio::spawn(server.run(listener, shutdown.signalled()));

    let (mut socket, _) = connect_async(format!("ws://{}/ws/events", addr)).await.unwrap();

    let event = LandEvent::LandTransferred {
        land_id: 7,
        from: Address::repeat_byte(1),
        to: Address::repeat_byte(2),
        block_number: Some(40),
    };
    app.state.events.send(event).unwrap();

    let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("no event within 5s")
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(message.to_text().unwrap()).unwrap();
    assert_eq!(json["event"], "LandTransferred");
    assert_eq!(json["landId"], 7);
    assert_eq!(json["blockNumber"], 40);

    shutdown.trigger();
    drop(socket);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
