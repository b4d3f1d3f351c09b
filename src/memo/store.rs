use glam::Vec3;

/// Stable handle for a memo. Never reused within a session, so a handle held
/// across deletions either resolves to the same memo or to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Memo {
    pub id: MemoId,
    pub position: Vec3,
    pub text: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemoError {
    #[error("memo text is empty")]
    EmptyText,
    #[error("no such memo")]
    NotFound,
}

/// Ordered memo list. Order is insertion order and doubles as display order.
#[derive(Clone, Debug, Default)]
pub struct MemoStore {
    memos: Vec<Memo>,
    next_id: u64,
}

impl MemoStore {
    pub fn create(&mut self, position: Vec3, text: &str) -> Result<MemoId, MemoError> {
        if text.trim().is_empty() {
            return Err(MemoError::EmptyText);
        }

        let id = MemoId(self.next_id);
        self.next_id += 1;
        self.memos.push(Memo {
            id,
            position,
            text: text.to_string(),
        });
        Ok(id)
    }

    pub fn read(&self, index: usize) -> Option<&Memo> {
        self.memos.get(index)
    }

    pub fn get(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    pub fn index_of(&self, id: MemoId) -> Option<usize> {
        self.memos.iter().position(|m| m.id == id)
    }

    pub fn update_at(&mut self, index: usize, text: &str) -> Result<(), MemoError> {
        let memo = self.memos.get_mut(index).ok_or(MemoError::NotFound)?;
        memo.text = text.to_string();
        Ok(())
    }

    pub fn update(&mut self, id: MemoId, text: &str) -> Result<(), MemoError> {
        let index = self.index_of(id).ok_or(MemoError::NotFound)?;
        self.update_at(index, text)
    }

    pub fn delete_at(&mut self, index: usize) -> Result<Memo, MemoError> {
        if index >= self.memos.len() {
            return Err(MemoError::NotFound);
        }
        Ok(self.memos.remove(index))
    }

    pub fn delete(&mut self, id: MemoId) -> Result<Memo, MemoError> {
        let index = self.index_of(id).ok_or(MemoError::NotFound)?;
        self.delete_at(index)
    }

    /// Drops every memo. The id counter keeps running.
    pub fn clear(&mut self) {
        self.memos.clear();
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Memo> {
        self.memos.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> MemoStore {
        let mut store = MemoStore::default();
        for i in 0..n {
            store
                .create(Vec3::new(i as f32, 0.0, 0.0), &format!("memo {i}"))
                .unwrap();
        }
        store
    }

    #[test]
    fn create_then_read_last() {
        let mut store = store_with(2);
        let p = Vec3::new(0.3, 0.1, 0.2);
        let id = store.create(p, "crack here").unwrap();

        let last = store.read(store.len() - 1).unwrap();
        assert_eq!(last.position, p);
        assert_eq!(last.text, "crack here");
        assert_eq!(last.id, id);
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut store = store_with(1);
        assert_eq!(store.create(Vec3::ZERO, ""), Err(MemoError::EmptyText));
        assert_eq!(store.create(Vec3::ZERO, "   "), Err(MemoError::EmptyText));
        assert_eq!(store.create(Vec3::ZERO, "\n\t"), Err(MemoError::EmptyText));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_shifts_later_indices_down() {
        let mut store = store_with(4);
        let before: Vec<Memo> = store.iter().cloned().collect();

        for i in 0..3 {
            let mut s = store.clone();
            s.delete_at(i).unwrap();
            assert_eq!(s.read(i), Some(&before[i + 1]));
            assert_eq!(s.len(), 3);
        }

        assert_eq!(store.delete_at(4), Err(MemoError::NotFound));
    }

    #[test]
    fn update_touches_only_one_text() {
        let mut store = store_with(3);
        let before: Vec<Memo> = store.iter().cloned().collect();

        store.update_at(1, "changed").unwrap();

        assert_eq!(store.read(0), Some(&before[0]));
        assert_eq!(store.read(2), Some(&before[2]));
        let edited = store.read(1).unwrap();
        assert_eq!(edited.text, "changed");
        assert_eq!(edited.position, before[1].position);
        assert_eq!(edited.id, before[1].id);
    }

    #[test]
    fn ids_survive_deletion_of_neighbours() {
        let mut store = store_with(3);
        let third = store.read(2).unwrap().id;
        let first = store.read(0).unwrap().id;

        store.delete(first).unwrap();

        assert_eq!(store.index_of(third), Some(1));
        store.update(third, "still me").unwrap();
        assert_eq!(store.get(third).unwrap().text, "still me");
        assert_eq!(store.delete(first), Err(MemoError::NotFound));
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut store = store_with(2);
        let old = store.read(1).unwrap().id;
        store.clear();
        assert!(store.is_empty());

        let fresh = store.create(Vec3::ZERO, "new").unwrap();
        assert_ne!(fresh, old);
        assert!(store.get(old).is_none());
    }
}
