//! Shared model cache behaviour through the conversion context

use std::sync::Arc;

use eqwow_model::{ConversionContext, ConversionError, ModelCache, ObjectProperties};
use rstest::{fixture, rstest};

use crate::common::{init_logging, material, quad_mesh, static_object, unit_config};

#[fixture]
fn cached_context() -> ConversionContext {
    init_logging();
    ConversionContext::new(unit_config()).with_cache(Arc::new(ModelCache::new()))
}

fn barrel() -> eqwow_model::SourceObject {
    static_object("barrel", quad_mesh(), vec![material(0, "wood", &["wood"], 0)])
}

#[rstest]
fn test_second_conversion_is_served_from_cache(cached_context: ConversionContext) {
    let first = cached_context
        .convert("barrel", ObjectProperties::default(), barrel())
        .unwrap();
    let second = cached_context
        .convert("barrel", ObjectProperties::default(), barrel())
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.is_loaded);
}

#[rstest]
fn test_failed_conversion_releases_name(cached_context: ConversionContext) {
    let mut broken = barrel();
    broken.mesh.texture_coordinates.clear();

    let result = cached_context.convert("barrel", ObjectProperties::default(), broken);
    assert!(matches!(result, Err(ConversionError::GeometryMismatch { .. })));

    let cache = cached_context.cache.as_ref().unwrap();
    assert!(!cache.contains("barrel"));
    assert!(
        cached_context
            .convert("barrel", ObjectProperties::default(), barrel())
            .is_ok()
    );
    assert_eq!(cache.len(), 1);
}

#[rstest]
fn test_claimed_name_is_rejected(cached_context: ConversionContext) {
    let cache = Arc::clone(cached_context.cache.as_ref().unwrap());
    let claim = cache.claim("barrel").unwrap();

    let result = cached_context.convert("barrel", ObjectProperties::default(), barrel());
    assert!(matches!(result, Err(ConversionError::AlreadyClaimed(name)) if name == "barrel"));
    drop(claim);
}

#[test]
fn test_without_cache_every_call_converts() {
    let context = ConversionContext::new(unit_config());
    let first = context
        .convert("barrel", ObjectProperties::default(), barrel())
        .unwrap();
    let second = context
        .convert("barrel", ObjectProperties::default(), barrel())
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
}
