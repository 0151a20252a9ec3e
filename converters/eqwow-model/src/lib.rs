//! # eqwow_model - EverQuest to World of Warcraft object model conversion
//!
//! Takes the mesh, materials, skeleton and animation clips of one ingested
//! EverQuest object and produces a fully populated WoW model: skinned
//! vertices, a bone hierarchy with keyframed tracks, per-submesh bone
//! lookups, expanded animated materials, collision geometry and a portrait
//! camera.
//!
//! Reading the source assets and writing the M2 binary are handled
//! elsewhere; this crate only performs the conversion.
//!
//! ## Examples
//!
//! ```no_run
//! use eqwow_model::{ConversionContext, ConversionConfig, ObjectClass, ObjectProperties};
//! use eqwow_model::source::SourceObject;
//!
//! # fn main() -> Result<(), eqwow_model::ConversionError> {
//! let context = ConversionContext::new(ConversionConfig::default());
//! let source = SourceObject::default();
//!
//! let model = context.convert(
//!     "barrel",
//!     ObjectProperties::new(ObjectClass::StaticDoodad),
//!     source,
//! )?;
//! assert!(model.is_loaded);
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod bone_lookup;
pub mod collision;
pub mod common;
pub mod config;
pub mod context;
pub mod error;
pub mod materials;
pub mod model;
pub mod pipeline;
pub mod portrait;
pub mod procedural;
pub mod skeleton;
pub mod source;
pub mod track;
pub mod transform;

// Re-export common types
pub use common::{BoundingBox, CompQuat, TriangleFace};
pub use config::{
    ActiveDoodadSettings, ConversionConfig, CustomCollisionType, ObjectClass, ObjectProperties,
    PortraitCameraOffsets, SpinDirection, SpriteListSettings, TintOverride,
};
pub use context::{CacheClaim, ConversionContext, ModelCache};
pub use error::{ConversionError, Result};
pub use model::ObjectModel;
pub use source::SourceObject;
pub use transform::CoordinateTransformer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
