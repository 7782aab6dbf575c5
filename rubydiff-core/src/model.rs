//! Structure model: object arena plus signature and root registries.
//!
//! A `StructureModel` owns every Code Object produced by one build and
//! indexes them by signature. Registration is first-writer-wins: the first
//! declaration for a signature is canonical, and later duplicates are
//! silently absorbed into it. The model cannot distinguish genuine
//! redefinition from an accidental duplicate declaration; this is a known
//! limitation of structural extraction in the presence of metaprogramming.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CodeKind, CodeObject, ObjectId};

/// Insertion-ordered map from signature string to canonical object id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SignatureIndex {
    map: HashMap<String, ObjectId>,
    order: Vec<String>,
}

impl SignatureIndex {
    pub fn get(&self, signature: &str) -> Option<ObjectId> {
        self.map.get(signature).copied()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.map.contains_key(signature)
    }

    /// Insert only if the signature is absent; the stored id stays
    /// canonical either way.
    fn insert_first(&mut self, signature: String, id: ObjectId) -> ObjectId {
        match self.map.get(&signature) {
            Some(existing) => *existing,
            None => {
                self.map.insert(signature.clone(), id);
                self.order.push(signature);
                id
            }
        }
    }

    /// Signatures in insertion (declaration) order.
    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// (signature, id) pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, ObjectId)> {
        self.order
            .iter()
            .map(|s| (s.clone(), self.map[s]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A completed structural model of one source version.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StructureModel {
    /// Label of the source this model was built from.
    pub name: String,
    objects: Vec<CodeObject>,
    signatures: SignatureIndex,
    roots: SignatureIndex,
}

impl StructureModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, id: ObjectId) -> &CodeObject {
        &self.objects[id.index()]
    }

    /// Derive the signature for an object already in the arena.
    ///
    /// Pure with respect to model state: repeated calls yield identical
    /// strings.
    pub fn signature(&self, id: ObjectId) -> String {
        let object = self.get(id);
        self.signature_for(&object.kind, &object.name, object.parent)
    }

    /// Derive the signature a (possibly not yet registered) object would
    /// have under the given parent.
    pub fn signature_for(&self, kind: &CodeKind, name: &str, parent: Option<ObjectId>) -> String {
        let parent_signature = parent.map(|p| self.signature(p));
        kind.compose_signature(parent_signature.as_deref(), name)
    }

    /// Register a constructed object, first-writer-wins.
    ///
    /// If the signature is new, the object enters the arena, is appended
    /// to its parent's children, and is indexed (in the root registry too
    /// when parentless). If the signature already exists, the new object
    /// is discarded and the canonical id is returned, so callers always
    /// nest against the registry entry.
    pub fn register(&mut self, object: CodeObject) -> ObjectId {
        let signature = self.signature_for(&object.kind, &object.name, object.parent);
        if let Some(existing) = self.signatures.get(&signature) {
            return existing;
        }

        let id = ObjectId::new(self.objects.len());
        let parent = object.parent;
        self.objects.push(object);
        if let Some(parent) = parent {
            self.objects[parent.index()].children.push(id);
        }
        self.signatures.insert_first(signature.clone(), id);
        if parent.is_none() {
            self.roots.insert_first(signature, id);
        }
        id
    }

    /// All registered signatures.
    pub fn signatures(&self) -> &SignatureIndex {
        &self.signatures
    }

    /// The parentless subset, in declaration order.
    pub fn roots(&self) -> &SignatureIndex {
        &self.roots
    }

    /// (signature, id) pairs for an object's children, declaration order.
    pub fn child_entries(&self, id: ObjectId) -> Vec<(String, ObjectId)> {
        self.get(id)
            .children
            .iter()
            .map(|&child| (self.signature(child), child))
            .collect()
    }

    /// Structural equality across two independently built models: variant,
    /// signature, and body snapshot must all match.
    pub fn object_eq(&self, id: ObjectId, other: &StructureModel, other_id: ObjectId) -> bool {
        let a = self.get(id);
        let b = other.get(other_id);
        a.kind == b.kind
            && a.body == b.body
            && self.signature(id) == other.signature(other_id)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
