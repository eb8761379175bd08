use crate::node::DocumentNode;
use std::collections::HashMap;

/// Field name -> replacement value for one request.
pub type SubstitutionSet = HashMap<String, DocumentNode>;

/// Build a [`SubstitutionSet`] from `(field, value)` pairs.
pub fn substitutions<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> SubstitutionSet
where
    K: Into<String>,
    V: Into<DocumentNode>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Copy of `tree` with named object fields replaced.
///
/// Arrays are searched element by element. In an object, a key found in
/// `subs` gets the replacement and its subtree is not searched further, so
/// along any root-to-leaf path only the shallowest match is replaced. Keys
/// that occur nowhere are ignored.
pub fn substitute(tree: &DocumentNode, subs: &SubstitutionSet) -> DocumentNode {
    if subs.is_empty() {
        return tree.clone();
    }
    match tree {
        DocumentNode::Array(items) => {
            DocumentNode::Array(items.iter().map(|item| substitute(item, subs)).collect())
        }
        DocumentNode::Object(map) => DocumentNode::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match subs.get(key) {
                        Some(replacement) => replacement.clone(),
                        None => substitute(value, subs),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        DocumentNode::Null
        | DocumentNode::Bool(_)
        | DocumentNode::Number(_)
        | DocumentNode::String(_) => tree.clone(),
    }
}
