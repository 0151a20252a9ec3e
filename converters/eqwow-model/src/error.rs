use thiserror::Error;

/// Error types for object model conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Ingested geometry lists disagree in length
    #[error(
        "Geometry mismatch in '{name}': {positions} positions, {normals} normals, {texture_coordinates} texture coordinates"
    )]
    GeometryMismatch {
        name: String,
        positions: usize,
        normals: usize,
        texture_coordinates: usize,
    },

    /// An animated material needs at least two textures to cycle through
    #[error("Material '{material}' is animated but only has {texture_count} texture(s)")]
    AnimatedMaterialTooFewTextures {
        material: String,
        texture_count: usize,
    },

    /// The configured active doodad motion is not one we know how to build
    #[error("Unsupported active doodad archetype: {0}")]
    UnsupportedActiveDoodad(String),

    /// Loading was requested on a model that already went through the pipeline
    #[error("Object model '{0}' is already loaded")]
    AlreadyLoaded(String),

    /// Another caller holds the cache claim for this name
    #[error("Object model '{0}' is already being converted")]
    AlreadyClaimed(String),

    /// Skeleton could not be built from the ingested bone structures
    #[error("Skeleton error: {0}")]
    Skeleton(String),

    /// Animation tracks could not be created
    #[error("Animation error: {0}")]
    Animation(String),

    /// Reference error: an index or name points at nothing
    #[error("Reference error: {0}")]
    ReferenceError(String),
}

/// Result type using ConversionError
pub type Result<T> = std::result::Result<T, ConversionError>;
