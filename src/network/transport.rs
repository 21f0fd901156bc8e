//! UDP/TCP peer transport (spec.md §4.6): UDP is the primary traffic channel between
//! peers, TCP (optionally TLS) carries control traffic. This module owns socket setup;
//! frame parsing/validation lives in [`super::rtp`].

use std::net::{SocketAddr, TcpStream, UdpSocket};

use crate::error::{Error, Result};

use super::rtp::Frame;

/// A bound UDP socket used for one peer's traffic plane.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        Ok(UdpTransport { socket })
    }

    pub fn send_frame(&self, frame: &Frame, to: SocketAddr) -> Result<()> {
        self.socket.send_to(&frame.to_bytes(), to)?;
        Ok(())
    }

    /// Receives and validates one datagram. Returns `Ok(None)` on `WouldBlock`
    /// (spec.md §7 `NetworkTransient`), propagates a decode error on a malformed or
    /// CRC-failed frame.
    pub fn recv_frame(&self, buf: &mut [u8]) -> Result<Option<(Frame, SocketAddr)>> {
        match self.socket.recv_from(buf) {
            Ok((len, from)) => Frame::from_bytes(&buf[..len]).map(|f| Some((f, from))),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::NetworkTransient {
                peer: "udp".into(),
                detail: e.to_string(),
            }),
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

/// A plain (non-TLS) TCP control connection to one peer.
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|e| Error::NetworkFatal {
            peer: addr.to_string(),
            detail: e.to_string(),
        })?;
        stream.set_nodelay(true)?;
        Ok(TcpTransport { stream })
    }

    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }
}

#[cfg(feature = "tls")]
pub mod tls {
    //! Secure TCP transport using `rustls`: hostname verification against a
    //! process-wide configured DNS name, with key/cert material loaded from PEM files
    //! (spec.md §4.6).

    use std::fs::File;
    use std::io::BufReader;
    use std::net::{SocketAddr, TcpStream};
    use std::sync::Arc;

    use rustls::{ClientConfig, ClientConnection, RootCertStore, ServerName, StreamOwned};

    use crate::error::{Error, Result};

    /// Paths to the PEM-encoded certificate and private key used for a secure peer
    /// connection.
    pub struct TlsConfig {
        pub ca_cert_path: String,
        pub client_cert_path: Option<String>,
        pub client_key_path: Option<String>,
        pub server_name: String,
    }

    fn load_root_store(ca_cert_path: &str) -> Result<RootCertStore> {
        let file = File::open(ca_cert_path)?;
        let mut reader = BufReader::new(file);
        let certs = rustls_pemfile::certs(&mut reader)
            .map_err(|e| Error::ConfigInvalid(format!("failed to read CA cert: {e}")))?;

        let mut store = RootCertStore::empty();
        for cert in certs {
            store
                .add(&rustls::Certificate(cert))
                .map_err(|e| Error::ConfigInvalid(format!("invalid CA certificate: {e}")))?;
        }
        Ok(store)
    }

    /// Connects to `addr` over TCP and completes a TLS handshake, verifying the peer's
    /// certificate against `config.server_name` (spec.md §4.6's "hostname against a
    /// process-wide configured DNS name").
    pub fn connect(addr: SocketAddr, config: &TlsConfig) -> Result<StreamOwned<ClientConnection, TcpStream>> {
        let root_store = load_root_store(&config.ca_cert_path)?;

        let client_config = ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name = ServerName::try_from(config.server_name.as_str())
            .map_err(|_| Error::ConfigInvalid(format!("invalid TLS server name: {}", config.server_name)))?;

        let conn = ClientConnection::new(Arc::new(client_config), server_name)
            .map_err(|e| Error::NetworkFatal {
                peer: addr.to_string(),
                detail: e.to_string(),
            })?;

        let sock = TcpStream::connect(addr).map_err(|e| Error::NetworkFatal {
            peer: addr.to_string(),
            detail: e.to_string(),
        })?;

        Ok(StreamOwned::new(conn, sock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn udp_roundtrip_on_loopback() {
        let a = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let b = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let b_addr = b.local_addr().unwrap();

        let frame = Frame::new(
            super::super::rtp::RtpHeader::default(),
            super::super::rtp::FneExtensionHeader::default(),
            b"ping",
        );
        a.send_frame(&frame, b_addr).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        let mut buf = [0u8; 512];
        let result = b.recv_frame(&mut buf).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn udp_recv_nonblocking_returns_none_when_idle() {
        let sock = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let mut buf = [0u8; 64];
        assert!(sock.recv_frame(&mut buf).unwrap().is_none());
    }
}
