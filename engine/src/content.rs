use indexmap::IndexMap;

use crate::combatant::Enemy;
use crate::equipment::Item;
use crate::error::ContentError;

const ENEMIES_JSON: &str = include_str!("../content/enemies.json");
const ITEMS_JSON: &str = include_str!("../content/items.json");

/// Built-in enemy templates keyed by id, in file order.
pub fn builtin_enemies() -> Result<IndexMap<String, Enemy>, ContentError> {
    let list: Vec<Enemy> = serde_json::from_str(ENEMIES_JSON)
        .map_err(|source| ContentError::Parse { what: "enemies", source })?;
    Ok(list.into_iter().map(|e| (e.id.clone(), e)).collect())
}

/// Built-in item catalogue keyed by id, in file order.
pub fn builtin_items() -> Result<IndexMap<String, Item>, ContentError> {
    let list: Vec<Item> = serde_json::from_str(ITEMS_JSON)
        .map_err(|source| ContentError::Parse { what: "items", source })?;
    Ok(list.into_iter().map(|i| (i.id.clone(), i)).collect())
}

pub fn find_enemy(id: &str) -> Result<Enemy, ContentError> {
    builtin_enemies()?
        .shift_remove(id)
        .ok_or_else(|| ContentError::UnknownEnemy(id.to_string()))
}

pub fn find_item(id: &str) -> Result<Item, ContentError> {
    builtin_items()?
        .shift_remove(id)
        .ok_or_else(|| ContentError::UnknownItem(id.to_string()))
}
