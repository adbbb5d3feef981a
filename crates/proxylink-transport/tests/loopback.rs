//! Integration tests for the loopback transport.
//!
//! The loopback transport is what the messenger talks to in every other
//! test, so it has to enforce the same rules as the real platform:
//! registration, connected endpoints, and the hard size cap.

#[cfg(feature = "loopback")]
mod loopback {
    use proxylink_transport::{
        ChannelTransport, DEFAULT_CHANNEL, Direction, EndpointDirectory,
        EndpointId, LoopbackTransport, MAX_PAYLOAD_SIZE, TransportError,
    };

    #[tokio::test]
    async fn test_send_registered_channel_delivers_bytes() {
        let (transport, mut rx) = LoopbackTransport::new();
        transport.register_both(DEFAULT_CHANNEL);
        let steve = transport.connect("Steve");

        transport
            .send(&steve, DEFAULT_CHANNEL, b"hello")
            .expect("send should succeed");

        let delivery = rx.recv().await.expect("delivery should arrive");
        assert_eq!(delivery.endpoint, steve.id);
        assert_eq!(delivery.channel, DEFAULT_CHANNEL);
        assert_eq!(delivery.data, b"hello");
        assert_eq!(transport.handed_off(), 1);
    }

    #[test]
    fn test_send_unregistered_channel_returns_error() {
        let (transport, _rx) = LoopbackTransport::new();
        transport.register(DEFAULT_CHANNEL, Direction::Incoming);
        let steve = transport.connect("Steve");

        let err = transport.send(&steve, DEFAULT_CHANNEL, b"x").unwrap_err();
        assert!(matches!(err, TransportError::ChannelNotRegistered { .. }));
        assert_eq!(transport.handed_off(), 0);
    }

    #[test]
    fn test_send_above_hard_cap_returns_payload_too_large() {
        let (transport, _rx) = LoopbackTransport::new();
        transport.register_both(DEFAULT_CHANNEL);
        let steve = transport.connect("Steve");

        let data = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        match transport.send(&steve, DEFAULT_CHANNEL, &data) {
            Err(TransportError::PayloadTooLarge { size, max }) => {
                assert_eq!(size, MAX_PAYLOAD_SIZE + 1);
                assert_eq!(max, MAX_PAYLOAD_SIZE);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_send_at_hard_cap_succeeds() {
        let (transport, _rx) = LoopbackTransport::new();
        transport.register_both(DEFAULT_CHANNEL);
        let steve = transport.connect("Steve");

        let data = vec![0u8; MAX_PAYLOAD_SIZE];
        assert!(transport.send(&steve, DEFAULT_CHANNEL, &data).is_ok());
    }

    #[test]
    fn test_send_through_disconnected_endpoint_returns_gone() {
        let (transport, _rx) = LoopbackTransport::new();
        transport.register_both(DEFAULT_CHANNEL);
        let steve = transport.connect("Steve");
        assert!(transport.disconnect(steve.id));

        let err = transport.send(&steve, DEFAULT_CHANNEL, b"x").unwrap_err();
        assert!(matches!(err, TransportError::EndpointGone(id) if id == steve.id));
    }

    #[test]
    fn test_send_after_receiver_dropped_returns_send_failed() {
        let (transport, rx) = LoopbackTransport::new();
        transport.register_both(DEFAULT_CHANNEL);
        let steve = transport.connect("Steve");
        drop(rx);

        let err = transport.send(&steve, DEFAULT_CHANNEL, b"x").unwrap_err();
        assert!(matches!(err, TransportError::SendFailed(_)));
    }

    #[test]
    fn test_directory_tracks_connects_and_disconnects() {
        let (transport, _rx) = LoopbackTransport::new();
        assert!(transport.any_connected().is_none());

        let alex = transport.connect("Alex");
        let steve = transport.connect("Steve");
        assert_eq!(transport.connected().len(), 2);
        assert_eq!(transport.any_connected(), Some(alex.clone()));

        transport.disconnect(alex.id);
        assert_eq!(transport.connected(), vec![steve]);
        assert!(!transport.disconnect(EndpointId::random()));
    }

    #[test]
    fn test_unregister_removes_registration() {
        let (transport, _rx) = LoopbackTransport::new();
        transport.register_both("proxylink:main");
        assert!(transport.is_registered("proxylink:main", Direction::Outgoing));

        assert!(transport.unregister("proxylink:main", Direction::Outgoing));
        assert!(!transport.is_registered("proxylink:main", Direction::Outgoing));
        assert!(transport.is_registered("proxylink:main", Direction::Incoming));
    }

    #[test]
    fn test_clones_share_state() {
        let (transport, _rx) = LoopbackTransport::new();
        let clone = transport.clone();
        clone.register_both(DEFAULT_CHANNEL);
        clone.connect("Steve");

        assert!(transport.is_registered(DEFAULT_CHANNEL, Direction::Outgoing));
        assert_eq!(transport.connected().len(), 1);
    }
}
