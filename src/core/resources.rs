use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::inventory::components::SheetRole;

/// 默认配置文件位置（相对工作目录）
pub const CONFIG_PATH: &str = "assets/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 启动配置：自制物品表的位置 + 开局要生成的角色卡
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// assets 目录下的 RON 路径
    pub homebrew: String,
    pub roster: Vec<RosterEntry>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            homebrew: "data/homebrew.ron".to_string(),
            roster: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub role: SheetRole,
    /// 物品名，交给 Catalog::resolve 解析
    #[serde(default)]
    pub loadout: Vec<String>,
}

impl SheetConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// 文件不存在时退回默认配置，其余错误照常返回
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roster_with_roles_and_loadouts() {
        let cfg = SheetConfig::from_toml(
            r#"
homebrew = "data/extra.ron"

[[roster]]
name = "Ada Thistle"
loadout = ["Sword", "Spell: Heal"]

[[roster]]
name = "Pip"
role = "hireling"
"#,
        )
        .unwrap();

        assert_eq!(cfg.homebrew, "data/extra.ron");
        assert_eq!(cfg.roster.len(), 2);
        assert_eq!(cfg.roster[0].role, SheetRole::Character);
        assert_eq!(cfg.roster[0].loadout, vec!["Sword", "Spell: Heal"]);
        assert_eq!(cfg.roster[1].role, SheetRole::Hireling);
        assert!(cfg.roster[1].loadout.is_empty());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = SheetConfig::from_toml("").unwrap();
        assert_eq!(cfg.homebrew, "data/homebrew.ron");
        assert!(cfg.roster.is_empty());
    }

    #[test]
    fn rejects_unknown_role() {
        let err = SheetConfig::from_toml("[[roster]]\nname = \"X\"\nrole = \"dragon\"\n");
        assert!(matches!(err, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = SheetConfig::load("does/not/exist.toml").unwrap();
        assert!(cfg.roster.is_empty());
    }
}
