// TLS configuration with a pinned root and an identity override.
//
// The box presents a certificate whose common name is its unique id, chained
// to a vendor root. We dial whatever address we were given (usually an IP)
// and validate the certificate against the unique id instead of that address.
// The chain is always checked by webpki against the pinned root only.

use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::{CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use tracing::{debug, trace};

use crate::error::Error;

/// Root certificate bundled with the crate, used unless a custom CA is configured.
pub const BUNDLED_ROOT_CA: &str = include_str!("../certs/root_ca.pem");

/// Parse every certificate in `pem` into a trust store. System roots are never added.
pub fn root_store(pem: &[u8]) -> Result<RootCertStore, Error> {
    let mut roots = RootCertStore::empty();
    for cert in CertificateDer::pem_slice_iter(pem) {
        let cert = cert.map_err(|e| Error::Tls(format!("invalid root certificate PEM: {e:?}")))?;
        roots
            .add(cert)
            .map_err(|e| Error::Tls(format!("unusable root certificate: {e}")))?;
    }
    if roots.is_empty() {
        return Err(Error::Tls("no certificate found in root PEM".into()));
    }
    Ok(roots)
}

/// Placeholder name used when the identity cannot be checked as a DNS name.
/// `.invalid` is a reserved top-level domain.
const CHAIN_ONLY_NAME: &str = "identity.invalid";

/// Server certificate verifier that ignores the dialed name.
///
/// The chain is verified against the pinned roots and the certificate must
/// name `identity`, either as a SAN DNS entry or, when no SAN matches, as the
/// subject common name. Identities that are not valid DNS names (an all-digit
/// unique id, for one) can only match the common name.
#[derive(Debug)]
pub struct IdentityVerifier {
    inner: Arc<WebPkiServerVerifier>,
    identity: String,
    /// Name handed to webpki. Equal to `identity` when `san_matches` is set.
    name: ServerName<'static>,
    san_matches: bool,
}

impl IdentityVerifier {
    pub fn new(
        roots: RootCertStore,
        identity: &str,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, Error> {
        if identity.is_empty() {
            return Err(Error::Tls("device identity is empty".into()));
        }
        let (name, san_matches) = match ServerName::try_from(identity.to_owned()) {
            Ok(name @ ServerName::DnsName(_)) => (name, true),
            _ => {
                debug!(identity, "identity is not a DNS name, matching the common name only");
                let placeholder = ServerName::try_from(CHAIN_ONLY_NAME)
                    .map_err(|e| Error::Tls(format!("invalid placeholder name: {e}")))?;
                (placeholder, false)
            }
        };
        let inner = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build certificate verifier: {e}")))?;

        Ok(Self {
            inner,
            identity: identity.to_owned(),
            name,
            san_matches,
        })
    }

    /// The identity every server certificate is checked against.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl ServerCertVerifier for IdentityVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        trace!(dialed = ?server_name, identity = %self.identity, "verifying server certificate");

        // webpki checks the chain before the name, so a name error means the
        // chain itself is trusted. A pass on the placeholder name proves the
        // chain and nothing else.
        match self
            .inner
            .verify_server_cert(end_entity, intermediates, &self.name, ocsp_response, now)
        {
            Ok(verified) if self.san_matches => Ok(verified),
            Ok(_)
            | Err(rustls::Error::InvalidCertificate(
                CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
            )) => {
                if common_name_matches(end_entity, &self.identity) {
                    Ok(ServerCertVerified::assertion())
                } else {
                    Err(rustls::Error::InvalidCertificate(
                        CertificateError::NotValidForName,
                    ))
                }
            }
            Err(e) => Err(e),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

fn common_name_matches(end_entity: &CertificateDer<'_>, expected: &str) -> bool {
    let Ok((_, cert)) = x509_parser::parse_x509_certificate(end_entity.as_ref()) else {
        return false;
    };
    cert.subject()
        .iter_common_name()
        .filter_map(|cn| cn.as_str().ok())
        .any(|cn| cn.eq_ignore_ascii_case(expected))
}

/// Build a rustls client config that trusts only `root_pem` and validates
/// server certificates against `identity`.
pub fn client_config(root_pem: &[u8], identity: &str) -> Result<ClientConfig, Error> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = IdentityVerifier::new(root_store(root_pem)?, identity, Arc::clone(&provider))?;

    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(format!("unsupported protocol versions: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();

    Ok(config)
}
