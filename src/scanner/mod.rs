use crate::error::{GenError, Result};
use serde_yaml::Value as Yaml;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Upper bound on concurrently scanned source files.
const MAX_IN_FLIGHT: usize = 8;

/// One raw operator-variant fragment extracted from a source file's header
/// region, before normalization.
#[derive(Debug, Clone)]
pub struct RawFragment {
    pub origin: PathBuf,
    /// The fragment body as parsed YAML (expected to be a mapping).
    pub body: Yaml,
    /// Filename-stem fallback for the discriminator. Only set for fragments
    /// coming from the singular header key; plural entries must be explicit.
    pub fallback_discriminator: Option<String>,
    pub multi_variant_source: bool,
}

/// Result of scanning a batch of sources: fragments in input order plus the
/// recoverable per-file errors that were turned into skips.
#[derive(Debug)]
pub struct ScanOutcome {
    pub fragments: Vec<RawFragment>,
    pub warnings: Vec<GenError>,
}

/// Scan all sources with bounded parallelism.
///
/// Every file either contributes its fragments or one warning; the join
/// below is the barrier the aggregator depends on. Results are reordered by
/// input index so the operator union order is deterministic.
pub async fn scan_sources(paths: &[PathBuf]) -> ScanOutcome {
    let semaphore = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    let mut join_set = JoinSet::new();

    for (idx, path) in paths.iter().cloned().enumerate() {
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("scanner semaphore closed");
            (idx, scan_file(&path).await)
        });
    }

    let mut slots: Vec<Option<Result<Vec<RawFragment>>>> = Vec::new();
    slots.resize_with(paths.len(), || None);
    while let Some(joined) = join_set.join_next().await {
        let (idx, result) = joined.expect("scan task panicked");
        slots[idx] = Some(result);
    }

    let mut fragments = Vec::new();
    let mut warnings = Vec::new();
    for slot in slots {
        match slot.expect("scan slot not filled") {
            Ok(found) => fragments.extend(found),
            Err(warning) => warnings.push(warning),
        }
    }

    ScanOutcome {
        fragments,
        warnings,
    }
}

/// Scan a single file. `Err` here is always a recoverable per-file skip;
/// a file without a header region or without schema keys yields `Ok(vec![])`.
pub async fn scan_file(path: &Path) -> Result<Vec<RawFragment>> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GenError::SourceRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

    let Some(header) = extract_header_region(&content) else {
        debug!("no header region in {}, skipping", path.display());
        return Ok(Vec::new());
    };

    parse_header(path, header)
}

/// Isolate the `---`-delimited header region at the top of the file.
///
/// The region starts with a `---` line at the very beginning (a BOM is
/// tolerated) and runs to the next `---` line. Prose after the closing
/// delimiter is never inspected.
pub fn extract_header_region(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

/// Parse the header region and pull out raw schema fragments.
///
/// Two supported shapes: a single fragment under `jsonschema`, or a list of
/// fragments under `jsonschemas`. A plural entry without an explicit
/// discriminator drops the whole file as a recoverable skip.
fn parse_header(path: &Path, header: &str) -> Result<Vec<RawFragment>> {
    let doc: Yaml = serde_yaml::from_str(header).map_err(|e| GenError::HeaderParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if doc.as_mapping().is_none() {
        return Err(GenError::HeaderParse {
            path: path.to_path_buf(),
            reason: "header region is not a mapping".to_string(),
        });
    }

    if let Some(body) = doc.get("jsonschema") {
        return Ok(vec![RawFragment {
            origin: path.to_path_buf(),
            body: body.clone(),
            fallback_discriminator: file_stem(path),
            multi_variant_source: false,
        }]);
    }

    if let Some(list) = doc.get("jsonschemas") {
        let Some(entries) = list.as_sequence() else {
            return Err(GenError::HeaderParse {
                path: path.to_path_buf(),
                reason: "`jsonschemas` is not a list".to_string(),
            });
        };
        let mut fragments = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if explicit_discriminator(entry).is_none() {
                return Err(GenError::HeaderParse {
                    path: path.to_path_buf(),
                    reason: format!("`jsonschemas[{i}]` has no explicit discriminator"),
                });
            }
            fragments.push(RawFragment {
                origin: path.to_path_buf(),
                body: entry.clone(),
                fallback_discriminator: None,
                multi_variant_source: true,
            });
        }
        return Ok(fragments);
    }

    // Header present but no schema keys: a plain documentation page.
    debug!("no schema keys in {}, skipping", path.display());
    Ok(Vec::new())
}

/// The discriminator a fragment carries itself: `properties.type.enum[0]`.
pub fn explicit_discriminator(body: &Yaml) -> Option<String> {
    let values = body
        .get("properties")?
        .get("type")?
        .get("enum")?
        .as_sequence()?;
    if values.len() != 1 {
        return None;
    }
    values[0].as_str().map(String::from)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
}
