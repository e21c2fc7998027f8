use crate::adapter::gateway::yaml::{load_yaml_file, yaml_to_unit, yaml_to_unit_id};
use crate::application::interface::UnitRepositoryTrait;
use crate::entity::error::{AgendaError, AgendaResult};
use crate::entity::unit::Unit;
use std::path::PathBuf;
use walkdir::WalkDir;
use yaml_rust::Yaml;

#[cfg(test)]
use std::fs;
#[cfg(test)]
use std::path::Path;

// every unit lives in its own directory as <unit_storage_dir>/**/unit.yaml
pub struct UnitRepository {
    unit_storage_dir: PathBuf,
}

impl UnitRepository {
    pub fn new(unit_storage_dir: PathBuf) -> Self {
        Self { unit_storage_dir }
    }

    // (path, "unit" section) of every unit.yaml, in file name order
    fn load_unit_documents(&self) -> AgendaResult<(Vec<(PathBuf, Yaml)>, Vec<String>)> {
        if !self.unit_storage_dir.is_dir() {
            return Err(AgendaError::StoreUnavailable(format!(
                "{} is not a directory",
                self.unit_storage_dir.display()
            )));
        }

        let mut documents = vec![];
        let mut unreadable = vec![];

        for entry in WalkDir::new(&self.unit_storage_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_name() != "unit.yaml" {
                continue;
            }

            let doc = match load_yaml_file(entry.path()) {
                Ok(doc) => doc,
                Err(e) => {
                    log::warn!("skipping unreadable unit file {}", e);
                    unreadable.push(e);
                    continue;
                }
            };
            let unit_yaml = &doc["unit"];
            if unit_yaml.is_badvalue() {
                log::warn!("{} has no unit key", entry.path().display());
                continue;
            }

            documents.push((entry.path().to_path_buf(), unit_yaml.clone()));
        }

        Ok((documents, unreadable))
    }
}

impl UnitRepositoryTrait for UnitRepository {
    // Only the entries carrying `unit_id` are fully parsed, so a broken
    // draft of another unit does not hide this one.
    fn get_active_unit(&self, unit_id: &str) -> AgendaResult<Unit> {
        let (documents, unreadable) = self.load_unit_documents()?;

        for (path, unit_yaml) in documents.iter() {
            if yaml_to_unit_id(unit_yaml).as_deref() != Some(unit_id) {
                continue;
            }

            let unit = yaml_to_unit(unit_yaml).map_err(|e| {
                log::warn!("unit {} in {} is malformed", unit_id, path.display());
                e
            })?;
            if unit.is_bookable() {
                return Ok(unit);
            }
        }

        // the unit may be the one we could not read
        if !unreadable.is_empty() {
            return Err(AgendaError::StoreUnavailable(unreadable.join("; ")));
        }

        Err(AgendaError::UnitNotFound(unit_id.to_string()))
    }
}

#[cfg(test)]
fn write_unit(root: &Path, dir: &str, body: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("unit.yaml"), body).unwrap();
}

#[cfg(test)]
const CENTRO: &str = "
unit:
  id: '1'
  name: 'Unidade Centro'
  active: true
  services: ['Clínica geral']
  starttime: '08:00'
  endtime: '12:00'
  servicetime: '30 minutes'
";

#[cfg(test)]
const NORTE_INACTIVE: &str = "
unit:
  id: '2'
  name: 'Unidade Norte'
  active: false
  services: ['Pediatria']
  starttime: '08:00'
  endtime: '12:00'
  servicetime: '30 minutes'
";

#[test]
fn test_get_active_unit_found_in_nested_directory() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    write_unit(tmp.path(), "regiao/norte", NORTE_INACTIVE);
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("1").unwrap();
    assert_eq!(actual.get_name(), "Unidade Centro");
}

#[test]
fn test_get_active_unit_inactive_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "norte", NORTE_INACTIVE);
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("2");
    assert_eq!(actual, Err(AgendaError::UnitNotFound("2".to_string())));
}

#[test]
fn test_get_active_unit_unknown_id_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("42");
    assert_eq!(actual, Err(AgendaError::UnitNotFound("42".to_string())));
}

#[test]
fn test_get_active_unit_ignores_other_files() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    fs::write(tmp.path().join("centro/notes.yaml"), "unit: [broken").unwrap();
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    assert!(repository.get_active_unit("1").is_ok());
}

#[test]
fn test_get_active_unit_incomplete_other_unit_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    write_unit(
        tmp.path(),
        "rascunho",
        "unit:\n  id: '9'\n  active: false\n  name: 'draft'\n",
    );
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("1").unwrap();
    assert_eq!(actual.get_name(), "Unidade Centro");
}

#[test]
fn test_get_active_unit_unparsable_other_file_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    write_unit(tmp.path(), "quebrado", "unit: [broken");
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    assert!(repository.get_active_unit("1").is_ok());
}

#[test]
fn test_get_active_unit_incomplete_requested_unit_is_invalid_window() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", CENTRO);
    write_unit(
        tmp.path(),
        "rascunho",
        "unit:\n  id: '9'\n  active: true\n  services: ['Pediatria']\n",
    );
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("9");
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_get_active_unit_duplicate_ids_resolve_in_directory_order() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "b_copia", &CENTRO.replace("Unidade Centro", "Copia"));
    write_unit(tmp.path(), "a_centro", CENTRO);
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    for _ in 0..3 {
        let actual = repository.get_active_unit("1").unwrap();
        assert_eq!(actual.get_name(), "Unidade Centro");
    }
}

#[test]
fn test_get_active_unit_broken_yaml_is_store_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(tmp.path(), "centro", "unit: [broken");
    let repository = UnitRepository::new(tmp.path().to_path_buf());

    let actual = repository.get_active_unit("1");
    assert!(matches!(actual, Err(AgendaError::StoreUnavailable(_))));
}

#[test]
fn test_get_active_unit_missing_directory_is_store_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let repository = UnitRepository::new(tmp.path().join("nowhere"));

    let actual = repository.get_active_unit("1");
    assert!(matches!(actual, Err(AgendaError::StoreUnavailable(_))));
}
