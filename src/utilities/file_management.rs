use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

use serde::Serialize;

pub fn save_to_file<T: Serialize>(path: &str, content: &T) -> Result<(), Box<dyn std::error::Error>> {
    // Create all parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, content)?;
    log::debug!("Saved json to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn test_save_to_file_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/cards.json");
        let path = path.to_str().unwrap();

        save_to_file(path, &vec!["Pikachu", "Charizard"]).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!(["Pikachu", "Charizard"]));
    }
}
