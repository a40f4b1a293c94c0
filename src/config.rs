//! The persisted target list.
//!
//! A flat JSON file naming the plugs to resolve, by address or alias. Nothing
//! else is persisted; devices themselves are rediscovered on every run.

use std::{fs::File, path::Path};

use crate::error::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    targets: Vec<String>,
}

impl Config {
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Load the target list, or write an empty template on first run.
    ///
    /// `None` means the template was just written; the caller should tell the
    /// user to fill it in and exit without treating this as an error.
    pub fn load(path: &Path) -> Result<Option<Config>> {
        if path.is_file() {
            let file = File::open(path)?;
            Ok(Some(serde_json::from_reader(file)?))
        } else {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(&file, &Config::default())?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn parses_a_target_list() {
        let config: Config =
            serde_json::from_str(r#"{"targets": ["192.168.1.40", "Lamp"]}"#).unwrap();

        assert_eq!(config.targets().to_vec(), vec!["192.168.1.40", "Lamp"]);
    }

    #[test]
    fn first_run_writes_an_empty_template() {
        let path = env::temp_dir().join(format!("ecoplug-config-{}.json", process::id()));
        let _ = fs::remove_file(&path);

        assert!(Config::load(&path).unwrap().is_none());

        // the template parses back as an empty target list
        let reloaded = Config::load(&path).unwrap().unwrap();
        assert!(reloaded.targets().is_empty());

        let _ = fs::remove_file(&path);
    }
}
