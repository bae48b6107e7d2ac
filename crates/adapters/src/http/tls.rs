//! TLS setup for the HTTP client.

use super::error::init_error;
use esbridge_config::{TlsDescriptor, TlsMaterial};
use esbridge_shared::ErrorEnvelope;
use reqwest::{Certificate, ClientBuilder, Identity};

/// Apply a TLS descriptor to a client builder.
///
/// A client certificate and key must be supplied together. A key passphrase
/// and a revocation list are not supported by the TLS backend and are
/// ignored with a warning.
pub fn apply_tls(
    mut builder: ClientBuilder,
    tls: &TlsDescriptor,
) -> Result<ClientBuilder, ErrorEnvelope> {
    if !tls.ssl_validate {
        tracing::warn!("server certificate validation is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    for (index, material) in tls.ssl_ca.iter().flatten().enumerate() {
        for certificate in parse_certificates(material).map_err(|error| {
            error.with_metadata("sslCA", index.to_string())
        })? {
            builder = builder.add_root_certificate(certificate);
        }
    }

    match (&tls.ssl_cert, &tls.ssl_key) {
        (Some(cert), Some(key)) => {
            builder = builder.identity(parse_identity(cert, key)?);
        },
        (Some(_), None) => {
            return Err(init_error("sslCert was supplied without sslKey"));
        },
        (None, Some(_)) => {
            return Err(init_error("sslKey was supplied without sslCert"));
        },
        (None, None) => {},
    }

    if tls.ssl_pass.is_some() {
        tracing::warn!("sslPass is not supported by this client and is ignored");
    }
    if tls.ssl_crl.is_some() {
        tracing::warn!("sslCRL is not supported by this client and is ignored");
    }

    Ok(builder)
}

/// Parse a CA entry as a PEM bundle, falling back to DER for binary input.
fn parse_certificates(material: &TlsMaterial) -> Result<Vec<Certificate>, ErrorEnvelope> {
    let invalid = |error: reqwest::Error| init_error(format!("invalid sslCA certificate: {error}"));
    let bundle = Certificate::from_pem_bundle(material.as_bytes()).map_err(invalid)?;
    if !bundle.is_empty() {
        return Ok(bundle);
    }
    match material {
        TlsMaterial::Bytes(bytes) => Ok(vec![Certificate::from_der(bytes).map_err(invalid)?]),
        TlsMaterial::Text(_) => Err(init_error("sslCA holds no PEM certificate")),
    }
}

fn parse_identity(cert: &TlsMaterial, key: &TlsMaterial) -> Result<Identity, ErrorEnvelope> {
    let mut pem = Vec::with_capacity(cert.len() + key.len() + 1);
    pem.extend_from_slice(cert.as_bytes());
    pem.push(b'\n');
    pem.extend_from_slice(key.as_bytes());
    Identity::from_pem(&pem)
        .map_err(|error| init_error(format!("invalid sslCert/sslKey pair: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbridge_shared::ErrorCode;

    fn descriptor() -> TlsDescriptor {
        TlsDescriptor {
            ssl_validate: true,
            ssl_ca: None,
            ssl_cert: None,
            ssl_key: None,
            ssl_pass: None,
            ssl_crl: None,
        }
    }

    #[test]
    fn plain_descriptor_is_accepted() {
        assert!(apply_tls(reqwest::Client::builder(), &descriptor()).is_ok());
    }

    #[test]
    fn empty_ca_list_is_accepted() {
        let tls = TlsDescriptor {
            ssl_ca: Some(Vec::new()),
            ..descriptor()
        };
        assert!(apply_tls(reqwest::Client::builder(), &tls).is_ok());
    }

    #[test]
    fn cert_without_key_is_rejected() {
        let tls = TlsDescriptor {
            ssl_cert: Some(TlsMaterial::from("-----BEGIN CERTIFICATE-----")),
            ..descriptor()
        };
        let error = apply_tls(reqwest::Client::builder(), &tls).err();
        assert!(matches!(
            error,
            Some(envelope) if envelope.code == ErrorCode::new("client", "init_failed")
        ));
    }

    #[test]
    fn text_without_pem_blocks_is_rejected() {
        let tls = TlsDescriptor {
            ssl_ca: Some(vec![TlsMaterial::from("not a certificate")]),
            ..descriptor()
        };
        let error = apply_tls(reqwest::Client::builder(), &tls).err();
        assert!(matches!(
            error,
            Some(envelope) if envelope.metadata.get("sslCA").map(String::as_str) == Some("0")
        ));
    }
}
