//! Renderer selection

use log::{debug, warn};

use crate::tree::ConfigTree;

pub use netcfg_core::{NETWORK_MANAGER_BACKEND, SYSTEMD_NETWORKD_BACKEND};

/// Set the renderer token on the tree.
///
/// Unknown tokens are stored verbatim; netplan itself rejects them later.
pub fn set_backend(tree: &mut ConfigTree, token: impl Into<String>) {
    let token = token.into();
    if !is_known_backend(&token) {
        warn!("Unknown network backend '{}', using it as is", token);
    }
    debug!("Setting renderer to {}", token);
    tree.renderer = token;
}

/// Whether `token` is one of the exported backend constants
pub fn is_known_backend(token: &str) -> bool {
    token == NETWORK_MANAGER_BACKEND || token == SYSTEMD_NETWORKD_BACKEND
}
