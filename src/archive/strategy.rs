//! Ordered extraction strategies.
//!
//! Each strategy either produces output in the scratch area or declines, so
//! the extractor can try the next one.

use crate::archive::format::{self, Compression, Container};
use crate::core::{SwitchyError, SwitchyResult};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of one strategy attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// An archive was unpacked into the scratch tree.
    Unpacked,
    /// The artifact decoded to a single plain file at this path.
    Standalone(PathBuf),
    NotApplicable,
}

/// Working state shared by the strategies of one extraction.
pub struct ExtractContext<'a> {
    pub artifact: &'a Path,
    /// Where archives are unpacked.
    pub tree: PathBuf,
    /// Where a bare compressed stream is decoded.
    pub decoded_dir: PathBuf,
    /// Set by a decompression step whose output is not an archive.
    pub decoded: Option<PathBuf>,
}

pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut ExtractContext<'_>) -> SwitchyResult<Outcome>;
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![
        Box::new(ArchiveStrategy),
        Box::new(DecompressStrategy),
        Box::new(StandaloneFileStrategy),
    ]
}

/// zip, plain tar, or tar inside gzip/xz/bzip2.
pub struct ArchiveStrategy;

impl ExtractStrategy for ArchiveStrategy {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn apply(&self, ctx: &mut ExtractContext<'_>) -> SwitchyResult<Outcome> {
        let header = format::read_header(ctx.artifact)?;

        if let Some(container) = format::sniff_container(&header) {
            unpack(container, ctx.artifact, &ctx.tree)?;
            return Ok(Outcome::Unpacked);
        }

        if let Some(compression) = format::sniff_compression(&header) {
            let decoded = format::read_decoded_header(ctx.artifact, compression)?;
            if format::sniff_container(&decoded) == Some(Container::Tar) {
                let file = File::open(ctx.artifact).map_err(|e| SwitchyError::fs(ctx.artifact, e))?;
                unpack_tar(format::decoder(compression, file), &ctx.tree)?;
                return Ok(Outcome::Unpacked);
            }
        }

        Ok(Outcome::NotApplicable)
    }
}

/// A bare compressed stream. Decodes it to one file; if that file turns out to
/// be an archive it is unpacked, otherwise it is left for the next strategy.
pub struct DecompressStrategy;

impl ExtractStrategy for DecompressStrategy {
    fn name(&self) -> &'static str {
        "decompress"
    }

    fn apply(&self, ctx: &mut ExtractContext<'_>) -> SwitchyResult<Outcome> {
        let header = format::read_header(ctx.artifact)?;
        let Some(compression) = format::sniff_compression(&header) else {
            return Ok(Outcome::NotApplicable);
        };

        let file_name = ctx
            .artifact
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact");
        let output = ctx
            .decoded_dir
            .join(format::decoded_file_name(file_name, compression));
        decompress_to(ctx.artifact, compression, &output)?;

        let decoded_header = format::read_header(&output)?;
        if let Some(container) = format::sniff_container(&decoded_header) {
            unpack(container, &output, &ctx.tree)?;
            return Ok(Outcome::Unpacked);
        }

        debug!(output = %output.display(), "Decoded stream is not an archive");
        ctx.decoded = Some(output);
        Ok(Outcome::NotApplicable)
    }
}

/// The decoded single file is the SDK itself.
pub struct StandaloneFileStrategy;

impl ExtractStrategy for StandaloneFileStrategy {
    fn name(&self) -> &'static str {
        "standalone-file"
    }

    fn apply(&self, ctx: &mut ExtractContext<'_>) -> SwitchyResult<Outcome> {
        Ok(match ctx.decoded.take() {
            Some(path) => Outcome::Standalone(path),
            None => Outcome::NotApplicable,
        })
    }
}

fn unpack(container: Container, archive: &Path, tree: &Path) -> SwitchyResult<()> {
    match container {
        Container::Zip => unpack_zip(archive, tree),
        Container::Tar => {
            let file = File::open(archive).map_err(|e| SwitchyError::fs(archive, e))?;
            unpack_tar(file, tree)
        }
    }
}

fn unpack_tar(reader: impl Read, tree: &Path) -> SwitchyResult<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive
        .unpack(tree)
        .map_err(|e| SwitchyError::Extraction(format!("Invalid tar archive: {}", e)))
}

fn unpack_zip(path: &Path, tree: &Path) -> SwitchyResult<()> {
    let file = File::open(path).map_err(|e| SwitchyError::fs(path, e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| SwitchyError::Extraction(format!("Invalid zip: {}", e)))?;
    archive
        .extract(tree)
        .map_err(|e| SwitchyError::Extraction(format!("Extract failed: {}", e)))
}

fn decompress_to(artifact: &Path, compression: Compression, output: &Path) -> SwitchyResult<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| SwitchyError::fs(parent, e))?;
    }
    let input = File::open(artifact).map_err(|e| SwitchyError::fs(artifact, e))?;
    let mut reader = format::decoder(compression, input);
    let mut out = File::create(output).map_err(|e| SwitchyError::fs(output, e))?;
    io::copy(&mut reader, &mut out).map_err(|e| {
        SwitchyError::Extraction(format!(
            "Failed to decompress {}: {}",
            artifact.display(),
            e
        ))
    })?;
    Ok(())
}
