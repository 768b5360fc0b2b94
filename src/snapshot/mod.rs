//! Directory snapshots as nested JSON.
//!
//! Directories become objects keyed by entry name, files become their UTF-8
//! contents. Files that are not valid UTF-8 get a fixed placeholder string.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};
use walkdir::WalkDir;

/// Default output file name, relative to the invocation directory.
pub const DEFAULT_OUTPUT: &str = "directory_structure.json";

/// Stored instead of the contents of a file that is not UTF-8.
pub const UNDECODABLE: &str = "Unable to decode file with utf-8 encoding.";

/// Names skipped at every depth unless the caller adds more.
pub const DEFAULT_IGNORE: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "__pycache__",
    ".DS_Store",
    "cordova",
    "README.md",
    "package-lock.json",
    ".gitignore",
    "public",
    DEFAULT_OUTPUT,
];

/// Entry names a snapshot skips.
#[derive(Debug, Clone)]
pub struct IgnoreList(Vec<String>);

impl Default for IgnoreList {
    fn default() -> Self {
        Self(DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect())
    }
}

impl IgnoreList {
    /// The default list plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in extra {
            let name = name.into();
            if !list.0.contains(&name) {
                list.0.push(name);
            }
        }
        list
    }

    /// Whether `name` is skipped.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

/// Maps `root` into a nested JSON object.
pub fn snapshot(root: &Path, ignore: &IgnoreList) -> Result<Value> {
    if !root.is_dir() {
        bail!("directory does not exist: {}", root.display());
    }

    let mut tree = Map::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !ignore.contains(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?;

        let value = if entry.file_type().is_dir() {
            Value::Object(Map::new())
        } else if entry.file_type().is_file() {
            Value::String(read_text(entry.path())?)
        } else {
            continue;
        };
        insert(&mut tree, relative, value);
    }

    Ok(Value::Object(tree))
}

/// Snapshots `root` and writes it to `output` with 4-space indentation.
pub async fn write_snapshot(root: PathBuf, output: &Path, ignore: IgnoreList) -> Result<()> {
    let tree = tokio::task::spawn_blocking(move || snapshot(&root, &ignore))
        .await
        .context("snapshot task panicked")??;

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    tree.serialize(&mut serializer)
        .context("serializing snapshot")?;

    tokio::fs::write(output, buffer)
        .await
        .with_context(|| format!("writing {}", output.display()))
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8(bytes).unwrap_or_else(|_| UNDECODABLE.to_string()))
}

/// Places `value` at `relative` inside `tree`, creating parent objects.
fn insert(tree: &mut Map<String, Value>, relative: &Path, value: Value) {
    let mut names: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let Some(leaf) = names.pop() else {
        return;
    };

    let mut node = tree;
    for name in names {
        let child = node
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        node = match child {
            Value::Object(map) => map,
            // walkdir yields parents first, so a parent is always an object
            _ => return,
        };
    }
    node.insert(leaf, value);
}
