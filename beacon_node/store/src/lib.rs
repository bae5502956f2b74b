//! Content-addressed block/state storage: `root -> (block, state_after_block)`.

mod errors;
mod memory_store;
mod store;

pub use errors::Error;
pub use memory_store::{KeyValueStore, MemoryStore};
pub use store::{memory_store, BeaconStore, MemoryBeaconStore};

#[cfg(test)]
mod tests {
    use super::*;
    use types::BeaconBlock;

    fn test_logger() -> slog::Logger {
        logging::test_logger()
    }

    fn dummy_block(parent_root: types::Hash256, slot: types::Slot) -> BeaconBlock {
        BeaconBlock::empty(slot, parent_root)
    }

    #[test]
    fn put_then_get_block_round_trips() {
        let store = memory_store(test_logger());
        let block = dummy_block(types::Hash256::zero(), types::Slot::new(3));
        let root = types::Hash256::repeat_byte(7);

        store.put_block(root, block.clone());
        assert!(store.has_block(&root));
        assert_eq!(store.get_block(&root).unwrap(), block);
    }

    #[test]
    fn get_unknown_block_errors() {
        let store = memory_store(test_logger());
        let root = types::Hash256::repeat_byte(9);
        assert_eq!(store.get_block(&root), Err(Error::BlockNotFound(root)));
    }

    #[test]
    fn commit_survives_without_losing_data() {
        let store = memory_store(test_logger());
        let block = dummy_block(types::Hash256::zero(), types::Slot::new(1));
        let root = types::Hash256::repeat_byte(1);
        store.put_block(root, block.clone());
        store.commit();
        assert_eq!(store.get_block(&root).unwrap(), block);
    }

    #[test]
    fn delete_below_protects_keep_root_ancestry() {
        let store = memory_store(test_logger());
        let genesis_root = types::Hash256::repeat_byte(0);
        let child_root = types::Hash256::repeat_byte(1);
        let grandchild_root = types::Hash256::repeat_byte(2);
        let stale_root = types::Hash256::repeat_byte(9);

        store.put_block(genesis_root, dummy_block(genesis_root, types::Slot::new(0)));
        store.put_block(child_root, dummy_block(genesis_root, types::Slot::new(1)));
        store.put_block(grandchild_root, dummy_block(child_root, types::Slot::new(2)));
        store.put_block(stale_root, dummy_block(genesis_root, types::Slot::new(1)));

        let known = vec![genesis_root, child_root, grandchild_root, stale_root];
        store
            .delete_below(types::Slot::new(2), grandchild_root, &known)
            .unwrap();

        assert!(store.get_block(&genesis_root).is_ok());
        assert!(store.get_block(&child_root).is_ok());
        assert!(store.get_block(&grandchild_root).is_ok());
        assert!(store.get_block(&stale_root).is_err());
    }
}
