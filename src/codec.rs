// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Signed token encode/decode.
//!
//! The codec is the unit of trust transfer: claims go in, an opaque
//! HMAC-signed string comes out, and nothing that fails signature or expiry
//! checks ever comes back out as a claim set. Expiry is enforced here, with
//! zero leeway, so every caller gets the check automatically.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::Claims;
use crate::config::AuthSettings;
use crate::error::AuthError;

/// Token decode failure.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Signature does not match the payload
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Embedded expiry has passed
    #[error("token has expired")]
    Expired,
    /// Not a parseable token at all
    #[error("token is malformed")]
    Malformed,
}

/// Encodes and decodes signed, expiring claim sets.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Derive the signing keys once from the configured secret.
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(settings.algorithm);
        // Exact expiry semantics: a token one second past exp is expired.
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            header: Header::new(settings.algorithm),
            encoding_key: EncodingKey::from_secret(settings.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret_key.as_bytes()),
            validation,
        }
    }

    /// Sign a claim set into an opaque token string.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))
    }

    /// Decode a token, checking signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => DecodeError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
                _ => DecodeError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenPurpose;
    use chrono::Utc;

    fn codec() -> TokenCodec {
        TokenCodec::new(&AuthSettings::new("unit-test-signing-key-0123456789ab"))
    }

    fn claims(purpose: TokenPurpose, exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "admin@example.com".to_string(),
            name: "System Administrator".to_string(),
            role: crate::roles::Role::Admin,
            region: "peru".to_string(),
            purpose,
            iat: now,
            exp: now + exp_offset_secs,
            jti: match purpose {
                TokenPurpose::Access => None,
                TokenPurpose::Refresh => Some("jti-1".to_string()),
            },
        }
    }

    #[test]
    fn encode_decode_round_trips() {
        let codec = codec();
        let original = claims(TokenPurpose::Refresh, 3600);
        let token = codec.encode(&original).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn any_single_byte_alteration_invalidates_the_signature() {
        let codec = codec();
        let token = codec.encode(&claims(TokenPurpose::Access, 3600)).unwrap();

        // Flip one character in the payload segment and one in the signature.
        let payload_start = token.find('.').unwrap() + 1;
        for index in [payload_start + 4, token.len() - 2] {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert!(matches!(
                codec.decode(&tampered),
                Err(DecodeError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn expired_claims_are_rejected_even_with_valid_signature() {
        let codec = codec();
        // Expired one second ago.
        let token = codec.encode(&claims(TokenPurpose::Access, -1)).unwrap();
        assert!(matches!(codec.decode(&token), Err(DecodeError::Expired)));
    }

    #[test]
    fn token_from_a_different_key_is_rejected() {
        let codec = codec();
        let other = TokenCodec::new(&AuthSettings::new("a-completely-different-signing-key"));
        let token = other.encode(&claims(TokenPurpose::Access, 3600)).unwrap();
        assert!(matches!(
            codec.decode(&token),
            Err(DecodeError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_input_is_malformed() {
        let codec = codec();
        assert!(matches!(
            codec.decode("not-a-token"),
            Err(DecodeError::Malformed)
        ));
        assert!(matches!(codec.decode(""), Err(DecodeError::Malformed)));
    }

    #[test]
    fn foreign_payload_is_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        // A structurally valid JWT whose payload is not our claim set.
        let codec = codec();
        let good = codec.encode(&claims(TokenPurpose::Access, 3600)).unwrap();
        let mut parts = good.split('.');
        let header = parts.next().unwrap();
        let foreign_payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"x","exp":9999999999}"#);
        let forged = format!("{header}.{foreign_payload}.aaaa");

        // Signature no longer matches, and even a re-signed foreign payload
        // would fail claim deserialization.
        assert!(codec.decode(&forged).is_err());
    }
}
