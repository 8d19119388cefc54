use crate::errors::PathError;
use std::path::Path;

pub fn create_dir(path: &Path) -> Result<(), PathError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(PathError::Inaccessible(path.to_string_lossy().to_string()))
            }
        }
        Err(_e) => Ok(std::fs::create_dir_all(path)?),
    }
}

/// Make sure the parent directory of an output file exists
pub fn prepare_output_file(file: &Path) -> Result<(), PathError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prepare_output_file() {
        let root = std::env::temp_dir().join(format!("reel-report-fs-{}", std::process::id()));
        let file = root.join("reports").join("latest.csv");

        prepare_output_file(&file).unwrap();
        assert!(root.join("reports").is_dir());

        // A file where a directory is expected
        std::fs::write(root.join("blocked"), b"").unwrap();
        assert!(matches!(
            prepare_output_file(&root.join("blocked").join("out.csv")),
            Err(PathError::Inaccessible(_))
        ));

        assert!(prepare_output_file(Path::new("latest.csv")).is_ok());
        std::fs::remove_dir_all(root).unwrap();
    }
}
