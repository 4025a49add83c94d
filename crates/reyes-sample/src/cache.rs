use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::wangtile::{TileKey, TileSet};

/// Cache of built tile sets keyed by `(tile_width, time_strat_quality,
/// shutter_open, shutter_close)`, shared across renders with matching
/// parameters so the same tile set isn't rebuilt per bucket.
#[derive(Default)]
pub struct TileCache {
    tiles: Mutex<HashMap<TileKey, Arc<TileSet>>>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &self,
        tile_width: u32,
        time_strat_quality: f32,
        shutter_open: f32,
        shutter_close: f32,
    ) -> Arc<TileSet> {
        let key = TileKey::new(tile_width, time_strat_quality, shutter_open, shutter_close);
        let mut tiles = self.tiles.lock().expect("tile cache poisoned");
        tiles
            .entry(key)
            .or_insert_with(|| Arc::new(TileSet::build(key)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.tiles.lock().expect("tile cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_with_the_same_key_reuse_the_tile_set() {
        let cache = TileCache::new();
        let a = cache.get_or_build(8, 0.5, 0.0, 1.0);
        let b = cache.get_or_build(8, 0.5, 0.0, 1.0);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_keys_build_distinct_tile_sets() {
        let cache = TileCache::new();
        cache.get_or_build(8, 0.5, 0.0, 1.0);
        cache.get_or_build(8, 0.5, 0.0, 2.0);
        assert_eq!(cache.len(), 2);
    }
}
