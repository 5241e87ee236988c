//! Connection establishment: TCP/TLS setup and greeting validation

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, BufReader, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::response::code_matches;

use super::Connection;

/// TCP connection timeout in seconds
const TCP_CONNECT_TIMEOUT_SECS: u64 = 120;

/// TLS handshake timeout in seconds
const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 60;

/// BufReader capacity for article downloads (64KB)
const BUFREADER_CAPACITY: usize = 64 * 1024;

/// Transport for [`Connection::connect`]: plain TCP or TLS over TCP
pub enum MaybeTlsStream {
    /// Unencrypted TCP
    Plain(TcpStream),
    /// TLS over TCP
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_flush(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Self::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Dangerous certificate verifier that accepts all certificates
///
/// **Security Warning:** This verifier disables all certificate validation,
/// making connections vulnerable to man-in-the-middle attacks. Only use this
/// for testing or with servers you trust on a secure network.
#[derive(Debug)]
struct DangerousAcceptAnyCertificate;

impl ServerCertVerifier for DangerousAcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

impl Connection<MaybeTlsStream> {
    /// Connect to the NNTP server named in the config.
    ///
    /// Establishes TCP, wraps it in TLS when `config.tls` is set, then
    /// reads and validates the server greeting. Does not authenticate;
    /// call [`authenticate`](Connection::authenticate) after connecting.
    ///
    /// # Errors
    ///
    /// - [`NntpError::Io`] - TCP connection fails
    /// - [`NntpError::Tls`] - TLS handshake fails
    /// - [`NntpError::Timeout`] - connection or handshake times out
    /// - [`NntpError::UnexpectedReply`] - greeting is not a 2xx code
    pub async fn connect(config: &ServerConfig) -> Result<Self> {
        debug!("connecting to NNTP server {}:{}", config.host, config.port);

        let addr = format!("{}:{}", config.host, config.port);
        let tcp_stream = timeout(
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            TcpStream::connect(&addr),
        )
        .await
        .map_err(|_| NntpError::Timeout)??;

        // Low latency matters more than packet coalescing for the
        // request/response pattern
        tcp_stream.set_nodelay(true)?;

        let stream = if config.tls {
            let tls_stream = tls_handshake(config, tcp_stream).await?;
            MaybeTlsStream::Tls(Box::new(tls_stream))
        } else {
            MaybeTlsStream::Plain(tcp_stream)
        };

        Self::handshake(stream).await
    }
}

async fn tls_handshake(config: &ServerConfig, tcp_stream: TcpStream) -> Result<TlsStream<TcpStream>> {
    use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
    let _ = CryptoProvider::install_default(ring::default_provider());

    let tls_config = if config.allow_insecure_tls {
        warn!("TLS certificate validation disabled - connection vulnerable to MITM attacks");
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousAcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    };

    let connector = TlsConnector::from(Arc::new(tls_config));
    let server_name = ServerName::try_from(config.host.as_str())
        .map_err(|e| NntpError::Tls(format!("invalid domain: {}", e)))?
        .to_owned();

    timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, tcp_stream),
    )
    .await
    .map_err(|_| NntpError::Timeout)?
    .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {}", e)))
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Start a session on an already-established transport: read the
    /// greeting and require a 2xx code.
    pub async fn handshake(stream: S) -> Result<Self> {
        let mut conn = Self {
            stream: BufReader::with_capacity(BUFREADER_CAPACITY, stream),
            body_pending: false,
            closed: false,
        };

        let greeting = conn.read_status_line().await?;
        if !code_matches(greeting.code, 2) {
            return Err(NntpError::UnexpectedReply {
                code: greeting.code,
                message: greeting.message,
            });
        }
        debug!("server greeting: {} {}", greeting.code, greeting.message);

        Ok(conn)
    }
}
