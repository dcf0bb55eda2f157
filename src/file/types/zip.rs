use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use crate::utils::{get_extension, relative_label};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// ZIP archives: unpack into a temporary workspace and run every member
/// through the registry, labelling each block with the member path.
///
/// Members that are archives themselves recurse through the same registry, up
/// to `max_depth` levels below the outermost archive.
pub struct ArchiveExtractor {
    max_depth: usize,
}

impl ArchiveExtractor {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl SourceExtractor for ArchiveExtractor {
    fn extract(&self, path: &Path, cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        if cx.depth > self.max_depth {
            return Err(Failure::read(
                label,
                format!("nested archive depth limit of {} exceeded", self.max_depth),
            ));
        }

        // Dropped (and deleted) on every return path below
        let workspace = tempfile::Builder::new()
            .prefix("gaia-zip-")
            .tempdir()
            .map_err(|e| Failure::read(label, e))?;

        let file = File::open(path).map_err(|e| Failure::read(label, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| Failure::read(label, e))?;
        archive
            .extract(workspace.path())
            .map_err(|e| Failure::read(label, e))?;
        debug!(
            "Unpacked {} members of {} at depth {}",
            archive.len(),
            path.display(),
            cx.depth
        );

        Ok(render_members(workspace.path(), members(workspace.path()), cx))
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Zip
    }
}

/// An unpacked member file, or a path the walk could not visit and why
type Member = Result<PathBuf, (PathBuf, String)>;

fn members(root: &Path) -> impl Iterator<Item = Member> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err((e.path().unwrap_or(root).to_path_buf(), e.to_string()))),
        })
}

/// One labelled block per member. A member that cannot be visited or read
/// gets its failure as content; the rest of the archive is still rendered.
fn render_members<I>(root: &Path, members: I, cx: &ExtractContext<'_>) -> String
where
    I: IntoIterator<Item = Member>,
{
    let label = SupportedFormat::Zip.label();
    let mut text = String::new();

    for member in members {
        let (path, content) = match member {
            Ok(path) => {
                if cx.registry.resolve(&get_extension(&path)).is_none() {
                    let name = relative_label(root, &path);
                    text.push_str(&format!("\n\nUnsupported file in zip: {}", name));
                    continue;
                }
                let content = cx
                    .registry
                    .extract_at_depth(&path, cx.depth + 1)
                    .unwrap_or_else(|failure| failure.to_string());
                (path, content)
            }
            Err((path, reason)) => {
                warn!("Skipping unreadable archive member {}: {}", path.display(), reason);
                (path, Failure::read(label, reason).to_string())
            }
        };
        let name = relative_label(root, &path);
        text.push_str(&format!("\n\nExtracted from {}:\n\n{}", name, content));
    }

    text
}
