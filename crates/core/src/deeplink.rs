//! HMAC-signed deep links authorizing the "protect this position" action.
//!
//! A deep link binds a `(position_id, user_id)` pair to an HMAC-SHA256
//! signature so the stateless protection front-end can trust that the
//! pairing was produced by this backend, without any server-side session
//! store. Links never expire and there is no revocation list -- a link
//! is a long-lived credential whose security rests entirely on the
//! secrecy of the signing key.
//!
//! The signed payload is the UTF-8 bytes of `"{position_id}:{user_id}"`.
//! If an identifier can itself contain a colon, two distinct pairs can
//! map to the same payload (`"A:B" / "C"` vs `"A" / "B:C"`). Callers must
//! use identifiers that cannot contain the delimiter; this module keeps
//! the encoding as-is for compatibility with links already in the wild.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Path under the front-end base URL where the protection app lives.
const PROTECT_PATH: &str = "/protect/";

// ---------------------------------------------------------------------------
// SignedLink
// ---------------------------------------------------------------------------

/// A protection deep link, signed when a secret was available at issue
/// time.
///
/// The `signature` is `None` on the degraded (unsigned) path; consumers
/// that require a signed link must check [`SignedLink::is_signed`] rather
/// than assume one.
#[derive(Debug, Clone)]
pub struct SignedLink {
    /// Position identifier, verbatim from the request.
    pub position_id: String,
    /// User (chat) identifier, verbatim from the request.
    pub user_id: String,
    /// Lowercase hex HMAC-SHA256 signature, absent on the fallback path.
    pub signature: Option<String>,
    url: Url,
}

impl SignedLink {
    /// Whether the link carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The full deep-link URL:
    /// `<base>/protect/?pos=<p>&user=<u>&sig=<hex>` (no `sig` parameter
    /// when unsigned).
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

// ---------------------------------------------------------------------------
// DeeplinkService
// ---------------------------------------------------------------------------

/// Issues and verifies protection deep links.
///
/// The signing secret is injected at construction and read-only for the
/// process lifetime; both operations are pure functions of their inputs
/// and the secret, so the service is freely shareable across tasks.
#[derive(Debug, Clone)]
pub struct DeeplinkService {
    base_url: Url,
    secret: Option<String>,
}

impl DeeplinkService {
    /// Create a service for the given front-end base URL.
    ///
    /// An absent or empty `secret` puts the service in degraded mode:
    /// every issued link is unsigned and every verification fails.
    pub fn new(base_url: Url, secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::warn!("Deep-link service created without a signing secret; links will be UNSIGNED");
        }
        Self { base_url, secret }
    }

    /// Issue a deep link for `user_id` acting on `position_id`.
    ///
    /// Identifiers are treated as opaque non-empty strings; the caller is
    /// responsible for using stable, colon-free values. Never fails: when
    /// signing is unavailable the link is issued without a `sig`
    /// parameter and the degradation is logged at error level.
    pub fn issue(&self, position_id: &str, user_id: &str) -> SignedLink {
        let signature = self.sign(position_id, user_id);

        if signature.is_none() {
            tracing::error!(
                position_id,
                user_id,
                "Signing unavailable, issuing UNSIGNED protection link"
            );
        }

        let mut url = self.base_url.clone();
        url.set_path(PROTECT_PATH);
        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("pos", position_id);
            pairs.append_pair("user", user_id);
            if let Some(sig) = &signature {
                pairs.append_pair("sig", sig);
            }
        }

        SignedLink {
            position_id: position_id.to_string(),
            user_id: user_id.to_string(),
            signature,
            url,
        }
    }

    /// Verify a presented signature for `(position_id, user_id)`.
    ///
    /// Recomputes the expected signature and compares in constant time
    /// (via [`Mac::verify_slice`]). Returns `false` on any failure
    /// (missing secret, malformed hex, wrong length, mismatch) so a
    /// broken deployment fails closed rather than leaking why.
    pub fn verify(&self, position_id: &str, user_id: &str, signature: &str) -> bool {
        let Some(secret) = &self.secret else {
            return false;
        };
        let Ok(presented) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(canonical_payload(position_id, user_id).as_bytes());
        mac.verify_slice(&presented).is_ok()
    }

    /// Compute the lowercase hex HMAC-SHA256 signature, or `None` when no
    /// secret is configured.
    fn sign(&self, position_id: &str, user_id: &str) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(canonical_payload(position_id, user_id).as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Canonical signed payload: `"{position_id}:{user_id}"`.
fn canonical_payload(position_id: &str, user_id: &str) -> String {
    format!("{position_id}:{user_id}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
