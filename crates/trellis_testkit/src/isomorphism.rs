//! Structural comparison between server and mirror graphs.

use crate::builders::attached_ids;
use trellis_mirror::{DomBinder, Mirror};
use trellis_protocol::Value;
use trellis_tree::StateTree;

/// Checks that the mirror graph is isomorphic to the server tree: same
/// ids, same features, same structure.
pub fn check_isomorphic<B: DomBinder>(tree: &StateTree, mirror: &Mirror<B>) -> Result<(), String> {
    let ids = attached_ids(tree);
    if mirror.node_count() != ids.len() {
        return Err(format!(
            "node count differs: server {}, mirror {}",
            ids.len(),
            mirror.node_count()
        ));
    }

    for id in ids {
        let server = tree.node(id).map_err(|e| e.to_string())?;
        let client = mirror.node(id).map_err(|e| e.to_string())?;

        let server_features: Vec<(String, Value)> = server
            .features()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let client_features: Vec<(String, Value)> = client
            .features()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        if server_features != client_features {
            return Err(format!(
                "features differ on {id}: server {server_features:?}, mirror {client_features:?}"
            ));
        }

        if server.children() != client.children() {
            return Err(format!(
                "children differ on {id}: server {:?}, mirror {:?}",
                server.children(),
                client.children()
            ));
        }
    }
    Ok(())
}

/// Panics with a description when the graphs are not isomorphic.
pub fn assert_isomorphic<B: DomBinder>(tree: &StateTree, mirror: &Mirror<B>) {
    if let Err(difference) = check_isomorphic(tree, mirror) {
        panic!("graphs are not isomorphic: {difference}");
    }
}
