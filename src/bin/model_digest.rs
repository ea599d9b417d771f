//! Model digest utility for DiagAI artifacts.
//!
//! Prints the SHA-256 pin for `[bundle].sha256` and a layer summary, and
//! optionally checks the artifact against a built-in bundle.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin model_digest -- <model.json> [--bundle <name>]
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use diagai::adapters::model::{sha256_hex, DenseClassifier};
use diagai::domain::ModelBundle;
use diagai::ports::Classifier;

fn parse_args() -> Result<(PathBuf, Option<String>)> {
    let mut args = env::args().skip(1);
    let mut path = None;
    let mut bundle = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bundle" => {
                bundle = Some(args.next().ok_or_else(|| anyhow!("--bundle needs a value"))?);
            }
            "-h" | "--help" => {
                println!("Usage: model_digest <model.json> [--bundle <name>]");
                std::process::exit(0);
            }
            other if path.is_none() => path = Some(PathBuf::from(other)),
            other => bail!("Unexpected argument: {other}"),
        }
    }

    let path = path.ok_or_else(|| anyhow!("Usage: model_digest <model.json> [--bundle <name>]"))?;
    Ok((path, bundle))
}

fn main() -> Result<()> {
    let (path, bundle) = parse_args()?;

    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let digest = sha256_hex(&bytes);

    let classifier =
        DenseClassifier::load(&path, Some(&digest)).map_err(|e| anyhow!("Invalid artifact: {e}"))?;
    let artifact = classifier.artifact();

    println!("file:          {}", path.display());
    println!("sha256:        {digest}");
    println!("format:        v{}", artifact.format_version);
    println!("input_width:   {}", artifact.input_width);
    if let Some(description) = &artifact.description {
        println!("description:   {description}");
    }
    for (i, layer) in artifact.layers.iter().enumerate() {
        let inputs = layer.weights.first().map_or(0, Vec::len);
        println!(
            "layer {i}:       {inputs} -> {} ({:?})",
            layer.weights.len(),
            layer.activation
        );
    }

    if let Some(name) = bundle {
        let bundle = ModelBundle::builtin(&name)?;
        bundle
            .check_model_width(classifier.input_width())
            .context("Artifact does not fit the bundle")?;
        if let Some(names) = classifier.feature_names() {
            if names != bundle.catalog().canonical() {
                bail!("Feature order differs from the '{name}' catalog");
            }
        }
        println!("bundle:        {name} OK (threshold {:.2})", bundle.policy().threshold());
    }

    println!();
    println!("[bundle]");
    println!("sha256 = \"{digest}\"");
    Ok(())
}
