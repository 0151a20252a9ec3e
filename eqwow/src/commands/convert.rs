//! Batch conversion of source objects

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use console::style;
use eqwow_model::{
    ConversionConfig, ConversionContext, ModelCache, ObjectModel, ObjectProperties, SourceObject,
};
use log::{error, info};

use crate::cli::{ConvertArgs, SourceArgs};
use crate::utils::{read_document, write_document};

/// A source object ready to be handed to the converter
pub struct LoadedObject {
    pub name: String,
    pub properties: ObjectProperties,
    pub source: SourceObject,
}

/// Build the conversion context from an optional configuration file
pub fn load_context(args: &SourceArgs) -> Result<ConversionContext> {
    let config = match &args.config {
        Some(path) => read_document::<ConversionConfig>(path)?,
        None => ConversionConfig::default(),
    };
    Ok(ConversionContext::new(config))
}

/// Read the properties shared by every input, applying the class override
pub fn load_properties(args: &SourceArgs) -> Result<ObjectProperties> {
    let mut properties = match &args.properties {
        Some(path) => read_document::<ObjectProperties>(path)?,
        None => ObjectProperties::default(),
    };
    if let Some(class) = args.class {
        properties.class = class.into();
    }
    Ok(properties)
}

/// Read one source object, naming it after the file when it has no name
pub fn load_object(path: &Path, properties: &ObjectProperties) -> Result<LoadedObject> {
    let source: SourceObject = read_document(path)?;
    let name = if source.name.is_empty() {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("object")
            .to_string()
    } else {
        source.name.clone()
    };
    Ok(LoadedObject {
        name,
        properties: properties.clone(),
        source,
    })
}

pub fn execute(args: ConvertArgs) -> Result<()> {
    let context = load_context(&args.source)?.with_cache(Arc::new(ModelCache::new()));
    let properties = load_properties(&args.source)?;

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut failures = 0usize;
    for input in &args.inputs {
        match convert_one(input, &properties, &context, args.output.as_deref()) {
            Ok(model) => print_summary(&model),
            Err(e) => {
                failures += 1;
                error!("Conversion of {} failed: {e:#}", input.display());
                eprintln!("{} {}: {e:#}", style("✗").red(), input.display());
            }
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} objects failed to convert",
            args.inputs.len()
        );
    }
    Ok(())
}

fn convert_one(
    input: &Path,
    properties: &ObjectProperties,
    context: &ConversionContext,
    output: Option<&Path>,
) -> Result<Arc<ObjectModel>> {
    let object = load_object(input, properties)?;
    info!("Converting '{}' from {}", object.name, input.display());
    let model = context
        .convert(&object.name, object.properties, object.source)
        .with_context(|| format!("Failed to convert '{}'", object.name))?;

    if let Some(dir) = output {
        let path: PathBuf = dir.join(format!("{}.json", model.name));
        write_document(&path, model.as_ref())?;
        info!("Wrote {}", path.display());
    }
    Ok(model)
}

fn print_summary(model: &ObjectModel) {
    println!(
        "{} {} ({:?}): {} vertices, {} triangles, {} materials, {} bones, {} animations, {} collision triangles",
        style("✓").green(),
        style(&model.name).bold(),
        model.class(),
        model.vertices.len(),
        model.triangles.len(),
        model.materials.len(),
        model.bones.len(),
        model.animations.len(),
        model.collision.triangles.len(),
    );
}
