use std::path::{Path, PathBuf};

use serde::Serialize;

/// Base name of a parameter file, used to name the output directory.
/// Falls back to "params" if the path has no usable file stem.
pub fn extract_base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or("params")
}

/// Builds (and creates) `out/<project>/<base_name>/[datetime]`.
pub fn build_output_path_with_date_time(
    project: &str,
    base_name: &str,
    datetime: &Option<String>,
) -> std::io::Result<PathBuf> {
    let mut dirs = vec!["out", project, base_name];
    if let Some(inner_datetime_str) = datetime {
        dirs.push(inner_datetime_str);
    }

    let directory_path: PathBuf = dirs.iter().collect();
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/**
 * Store a path and prefix together, making it easy to generate a
 * collection of files with the same prefix, but separate suffixes.
 */
#[derive(Clone, Debug)]
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn full_path_with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path.join(self.file_base.clone() + suffix)
    }

    /// Returns a new prefix that writes into `<directory>/<sub_directory>`,
    /// creating that directory on disk.
    pub fn with_sub_directory(&self, sub_directory: &str) -> std::io::Result<FilePrefix> {
        let directory_path = self.directory_path.join(sub_directory);
        std::fs::create_dir_all(&directory_path)?;
        Ok(FilePrefix {
            directory_path,
            file_base: self.file_base.clone(),
        })
    }

    pub fn create_file_with_suffix(&self, suffix: &str) -> std::io::BufWriter<std::fs::File> {
        let path = self.full_path_with_suffix(suffix);
        let file = std::fs::File::create(&path)
            .unwrap_or_else(|_| panic!("failed to create file: {:?}", path));
        std::io::BufWriter::new(file)
    }
}

pub fn serialize_to_json_or_panic<T: Serialize>(path: PathBuf, data: &T) {
    let text = serde_json::to_string_pretty(data)
        .unwrap_or_else(|err| panic!("ERROR:  Unable to serialize {}: {}", path.display(), err));
    std::fs::write(&path, text)
        .unwrap_or_else(|err| panic!("ERROR:  Unable to write {}: {}", path.display(), err));
    println!("INFO:  Wrote parameter file to: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_base_name() {
        assert_eq!(extract_base_name("demos/square_roots.json"), "square_roots");
        assert_eq!(extract_base_name("square_roots"), "square_roots");
    }

    #[test]
    fn test_full_path_with_suffix() {
        let prefix = FilePrefix {
            directory_path: ["out", "render"].iter().collect(),
            file_base: "sqrt_3".to_owned(),
        };
        let expected: PathBuf = ["out", "render", "sqrt_3_iterations.json"].iter().collect();
        assert_eq!(prefix.full_path_with_suffix("_iterations.json"), expected);
    }

    #[test]
    fn test_maybe_date_time_string() {
        assert!(maybe_date_time_string(false).is_none());
        let stamp = maybe_date_time_string(true).unwrap();
        assert_eq!(stamp.len(), "20240101_120000".len());
        assert_eq!(&stamp[8..9], "_");
    }
}
