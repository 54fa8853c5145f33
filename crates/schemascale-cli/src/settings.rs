use std::path::Path;

use schemascale_enlarge::ScaleConfig;

use crate::CliError;

/// Resolve the run config: defaults, then the optional TOML file, then flags.
///
/// `--level2` only ever switches the level 2 features on; without it the file
/// decides.
pub fn resolve_scale_config(
    config_path: Option<&Path>,
    target_size: usize,
    level2: bool,
) -> Result<ScaleConfig, CliError> {
    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<ScaleConfig>(&content)?
        }
        None => ScaleConfig::default(),
    };

    config.target_total_tables = target_size;
    if level2 {
        config.apply_family_generation = true;
        config.apply_join_competition = true;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let dir = std::env::temp_dir().join(format!("schemascale_settings_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scale.toml");
        std::fs::write(
            &path,
            "target_total_tables = 500\nseed = 7\norig_prob = 0.9\napply_join_competition = true\n",
        )
        .unwrap();

        let config = resolve_scale_config(Some(&path), 60, false).unwrap();
        assert_eq!(config.target_total_tables, 60);
        assert_eq!(config.seed, 7);
        assert_eq!(config.orig_prob, 0.9);
        assert!(config.apply_join_competition);
        assert!(!config.apply_family_generation);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn level2_flag_turns_on_both_features() {
        let config = resolve_scale_config(None, 30, true).unwrap();
        assert!(config.apply_family_generation);
        assert!(config.apply_join_competition);
        assert_eq!(config.entity_max_cols, 12);
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let dir = std::env::temp_dir().join(format!("schemascale_settings_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scale.toml");
        std::fs::write(&path, "entity_min_cols = 20\n").unwrap();

        assert!(matches!(
            resolve_scale_config(Some(&path), 30, false),
            Err(CliError::Enlarge(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
