//! Content factory for building a match setup from data files.

use std::path::{Path, PathBuf};

use squeak_core::{GameConfig, Map};

use crate::catalog::{Catalog, default_registry};
use crate::loaders::{ConfigLoader, LoadResult, MapLoader, RodentLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── rodents.ron
/// └── maps/
///     ├── meadow.ron
///     └── sewer.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or the defaults when the
    /// file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Built-in content plus every entry of `rodents.ron`, when present.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::builtin()?;
        let path = self.data_dir.join("rodents.ron");
        if path.exists() {
            RodentLoader::load(&path, &mut catalog)?;
        }
        Ok(catalog)
    }

    /// Only the entries of `rodents.ron`, over the built-in resolvers.
    pub fn load_custom_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new(default_registry()?);
        RodentLoader::load(&self.data_dir.join("rodents.ron"), &mut catalog)?;
        Ok(catalog)
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str, catalog: &Catalog) -> LoadResult<Map> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path, catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_optional_files_fall_back_to_builtins() {
        let dir = TempDir::new().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
        let catalog = factory.load_catalog().unwrap();
        assert!(catalog.template("Cracker").is_ok());
        assert!(factory.load_custom_catalog().is_err());
        assert!(factory.load_map("nowhere", &catalog).is_err());
    }

    #[test]
    fn loads_maps_from_the_maps_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("maps")).unwrap();
        fs::write(
            dir.path().join("maps").join("tiny.ron"),
            r#"(size: (3, 3), entities: [(template: "Cracker", pos: (1, 1), side: Some(Mouse))])"#,
        )
        .unwrap();
        fs::write(dir.path().join("config.toml"), "hand_length = 3\n").unwrap();

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().unwrap();
        let map = factory.load_map("tiny", &catalog).unwrap();
        assert_eq!(map.entities()[0].template.name(), "Cracker");
        assert_eq!(factory.load_config().unwrap().hand_length, 3);
    }
}
