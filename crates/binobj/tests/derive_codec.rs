// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! `#[derive(Codec)]` on user types, including polymorphic fields.

use binobj::prelude::*;
use binobj::{from_bytes, model, to_bytes};

/// Holds a value of any registered type.
#[derive(Codec, Debug)]
#[codec(id = "8e28b1b6bdb30c4a3400dc3f70522f17696886c4", name = "test.Envelope")]
struct Envelope {
    label: String,
    payload: Box<dyn BinaryObject>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            label: String::new(),
            payload: Box::new(Range::default()),
        }
    }
}

#[derive(Codec, Debug, Default, PartialEq)]
#[codec(id = "4d6a34f3305e7991284d21461d6a7597012efb8e", name = "test.Annotated")]
struct Annotated {
    tag: u16,
    #[codec(skip)]
    cache: Vec<u64>,
    node: Node,
}

/// Plain body codec, never registered.
#[derive(Codec, Debug, PartialEq)]
struct Pair(u8, i64);

#[derive(Codec, Debug, PartialEq)]
struct Marker;

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    model::register_model(&registry).expect("register model");
    registry.register_class::<Envelope>().expect("register Envelope");
    registry.register_class::<Annotated>().expect("register Annotated");
    registry
}

#[test]
fn test_polymorphic_field_roundtrip() {
    let registry = registry();
    let tree = Node::new("root", Range::new(0, 8)).with_child(Node::new("leaf", Range::new(2, 2)));
    let envelope = Envelope {
        label: "tree".into(),
        payload: Box::new(tree.clone()),
    };

    let bytes = registry.to_bytes(&envelope).expect("encode");
    // [Envelope id][label][Node id][node body]
    assert_eq!(&bytes[..20], &Envelope::ID.as_bytes()[..]);
    assert_eq!(&bytes[28..48], &Node::ID.as_bytes()[..]);

    let back: Envelope = registry
        .from_bytes_as(&bytes, CodecConfig::default())
        .expect("decode");
    assert_eq!(back.label, "tree");
    assert_eq!(back.payload.downcast_ref::<Node>(), Some(&tree));
}

#[test]
fn test_nested_envelopes_respect_depth() {
    let registry = registry();
    let mut value: Box<dyn BinaryObject> = Box::new(Range::new(1, 1));
    for i in 0..8 {
        value = Box::new(Envelope {
            label: format!("level{}", i),
            payload: value,
        });
    }
    let bytes = registry.to_bytes(value.as_ref()).expect("encode");

    let back = registry
        .from_bytes_as::<Envelope>(&bytes, CodecConfig::default())
        .expect("default depth");
    assert_eq!(back.label, "level7");

    let err = registry
        .from_bytes_as::<Envelope>(&bytes, CodecConfig::default().with_max_depth(4))
        .unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { max: 4 }));
}

#[test]
fn test_polymorphic_field_unknown_id() {
    let registry = registry();
    let envelope = Envelope {
        label: String::new(),
        payload: Box::new(Annotated::default()),
    };
    let bytes = registry.to_bytes(&envelope).expect("encode");

    let partial = TypeRegistry::new();
    partial.register_class::<Envelope>().expect("register Envelope");
    let err = partial
        .from_bytes_as::<Envelope>(&bytes, CodecConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownType(id) if id == Annotated::ID));
}

#[test]
fn test_polymorphic_field_needs_registry() {
    let registry = registry();
    let envelope = Envelope::default();
    let bytes = registry.to_bytes(&envelope).expect("encode");

    // Body only, decoded without a registry attached.
    let err = from_bytes::<Envelope>(&bytes[20..]).unwrap_err();
    assert!(matches!(err, Error::RegistryRequired));
}

#[test]
fn test_skipped_field_decodes_as_default() {
    let registry = registry();
    let value = Annotated {
        tag: 0xBEEF,
        cache: vec![1, 2, 3],
        node: Node::new("n", Range::new(0, 1)),
    };
    let bytes = registry.to_bytes(&value).expect("encode");
    // id + tag + node("n")
    assert_eq!(bytes.len(), 20 + 2 + 4 + 1 + 8 + 4);

    let back: Annotated = registry
        .from_bytes_as(&bytes, CodecConfig::default())
        .expect("decode");
    assert_eq!(back.tag, 0xBEEF);
    assert!(back.cache.is_empty());
    assert_eq!(back.node, value.node);
}

#[test]
fn test_tuple_and_unit_structs() {
    let bytes = to_bytes(&Pair(7, -2)).expect("encode");
    assert_eq!(bytes, [7, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(from_bytes::<Pair>(&bytes).expect("decode"), Pair(7, -2));

    assert!(to_bytes(&Marker).expect("encode").is_empty());
    assert_eq!(from_bytes::<Marker>(&[]).expect("decode"), Marker);
}

#[test]
fn test_derived_ids() {
    assert_eq!(
        Envelope::ID,
        TypeId::derive("test.Envelope{label:string,payload:object}")
    );
    assert_eq!(Annotated::NAME, "test.Annotated");
}

/// Claims the identifier already bound to `Envelope`.
#[derive(Codec, Debug, Default)]
#[codec(id = "8e28b1b6bdb30c4a3400dc3f70522f17696886c4", name = "test.Clash")]
struct Clash {
    value: u32,
}

#[test]
fn test_identifier_clash_is_rejected() {
    let registry = registry();
    let err = registry.register_class::<Clash>().unwrap_err();
    match err {
        Error::DuplicateType {
            id,
            existing,
            attempted,
        } => {
            assert_eq!(id, Envelope::ID);
            assert_eq!(existing, "test.Envelope");
            assert_eq!(attempted, "test.Clash");
        }
        other => panic!("expected DuplicateType, got {:?}", other),
    }

    // Envelope keeps its binding.
    let bytes = registry.to_bytes(&Envelope::default()).expect("encode");
    assert!(registry
        .from_bytes_as::<Envelope>(&bytes, CodecConfig::default())
        .is_ok());
    assert_eq!(Clash { value: 1 }.value, 1);
}
