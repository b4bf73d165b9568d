use bevy::asset::{AssetLoader, LoadContext, io::Reader, ron};
use thiserror::Error;

use super::schema::HomebrewList;

/// 读取 assets 下的自制物品 / 法术表（RON）
#[derive(Default)]
pub struct HomebrewLoader;

#[derive(Debug, Error)]
pub enum RonItemLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl AssetLoader for HomebrewLoader {
    type Asset = HomebrewList;
    type Settings = ();
    type Error = RonItemLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let text = std::str::from_utf8(&bytes)?;
        Ok(parse(text)?)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

/// 与加载器同一套解析，测试和 CLI 直接调用
pub fn parse(text: &str) -> Result<HomebrewList, ron::error::SpannedError> {
    ron::de::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::HomebrewKind;

    #[test]
    fn parses_sparse_entries_with_defaults() {
        let list = parse(
            r#"(
                items: [
                    (name: "Thimble helm", kind: Armour, defence: 1, uses: 3),
                    (name: "Cheese wheel", width: 2, height: 2, slots: 4),
                ],
                spells: [
                    (name: "Ghost Sight", description: "See ghosts for [DICE] Turns."),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].kind, HomebrewKind::Armour);
        assert_eq!((list.items[0].width, list.items[0].height), (1, 1));
        assert_eq!(list.items[1].kind, HomebrewKind::Gear);
        assert_eq!(list.items[1].slots, 4);
        assert!(list.spells[0].recharge.is_empty());
    }

    #[test]
    fn empty_document_is_an_empty_list() {
        let list = parse("()").unwrap();
        assert!(list.items.is_empty());
        assert!(list.spells.is_empty());
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(parse(r#"(items: [(name: "X", kind: Potion)])"#).is_err());
    }
}
