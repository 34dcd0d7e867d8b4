//! The client list response shape.
//!
//! Internal rows map to the external shape through a fixed rename table:
//!
//! | Internal | External |
//! |----------|----------|
//! | `id` (bytes) | `id` (lowercase hex) |
//! | `name` | `name` |
//! | `image_uri` | `image_uri` |
//! | `redirect_uri` | `redirect_uri` |
//! | `terms_uri` | `terms_uri` (empty when unset) |
//! | `privacy_uri` | `privacy_uri` (empty when unset) |
//! | `can_grant` | `can_grant` |
//! | `trusted` | `whitelisted` and `trusted` |
//!
//! `whitelisted` is a legacy alias of `trusted` and is kept until clients
//! stop reading it.

use clientele_registry::canonicalize::canonical_hex;
use clientele_registry::StoredClient;
use serde::{Deserialize, Serialize};

/// One client in the list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientView {
    /// Client identifier, lowercase hex.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Logo URI, may be empty.
    pub image_uri: String,

    /// OAuth redirect target.
    pub redirect_uri: String,

    /// Terms of service URI, empty when unset.
    pub terms_uri: String,

    /// Privacy policy URI, empty when unset.
    pub privacy_uri: String,

    /// Whether the client may use the assertion grant.
    pub can_grant: bool,

    /// Legacy alias of `trusted`. Remove once no consumer reads it.
    pub whitelisted: bool,

    /// Whether the client skips the consent screen.
    pub trusted: bool,
}

/// Body of `GET /v1/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListResponse {
    /// The caller's clients, in store order.
    pub clients: Vec<ClientView>,
}

/// Maps a stored client to its response shape.
pub fn serialize_client(client: &StoredClient) -> ClientView {
    let trusted = client.trusted != 0;
    ClientView {
        id: canonical_hex(&client.id),
        name: client.name.clone(),
        image_uri: client.image_uri.clone(),
        redirect_uri: client.redirect_uri.clone(),
        terms_uri: client.terms_uri.clone(),
        privacy_uri: client.privacy_uri.clone(),
        can_grant: client.can_grant != 0,
        whitelisted: trusted,
        trusted,
    }
}

impl From<Vec<StoredClient>> for ClientListResponse {
    fn from(clients: Vec<StoredClient>) -> Self {
        ClientListResponse {
            clients: clients.iter().map(serialize_client).collect(),
        }
    }
}
