use std::path::Path;
use std::process::Command;

/// Normalize an extension for registry lookup: lower case, no leading dot
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Get file extension from path (without the dot), lower-cased.
/// A file without an extension yields an empty string.
pub fn get_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// File name component as a displayable string
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `/`-separated path of `path` relative to `root`
pub fn relative_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Base name of a `/`-separated object key
pub fn object_base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Check if a command is available in PATH
pub fn command_available(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_get_extension_with_txt() {
        let path = Path::new("/path/to/file.txt");
        assert_eq!(get_extension(path), "txt");
    }

    #[test]
    fn test_get_extension_lowercase() {
        let path = Path::new("/path/to/scan.PNG");
        assert_eq!(get_extension(path), "png");
    }

    #[test]
    fn test_get_extension_no_extension() {
        let path = Path::new("/path/to/Makefile");
        assert_eq!(get_extension(path), "");
    }

    #[test]
    fn test_get_extension_multiple_dots() {
        let path = Path::new("/path/to/data.tar.zip");
        assert_eq!(get_extension(path), "zip");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".JSONL"), "jsonl");
        assert_eq!(normalize_extension("Pdf"), "pdf");
    }

    #[test]
    fn test_relative_label() {
        let root = PathBuf::from("/tmp/work");
        let nested = root.join("docs").join("a.txt");
        assert_eq!(relative_label(&root, &nested), "docs/a.txt");
        assert_eq!(relative_label(&root, &root.join("b.csv")), "b.csv");
    }

    #[test]
    fn test_object_base_name() {
        assert_eq!(object_base_name("2023/validation/a.pdf"), "a.pdf");
        assert_eq!(object_base_name("a.pdf"), "a.pdf");
    }
}
