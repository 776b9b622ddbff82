//! Chunk-bucketed index of creature ids
//!
//! Each creature id lives in exactly one bucket, the chunk of its current
//! tile. Buckets keep insertion order so iteration is stable across runs.

use ahash::AHashMap;

use crate::core::types::{ChunkCoord, CreatureId};

#[derive(Debug, Default, Clone)]
pub struct ChunkIndex {
    buckets: AHashMap<ChunkCoord, Vec<CreatureId>>,
    locations: AHashMap<CreatureId, ChunkCoord>,
}

impl ChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.locations.clear();
    }

    /// Insert or move `id` into `chunk`
    pub fn insert(&mut self, id: CreatureId, chunk: ChunkCoord) {
        if let Some(previous) = self.locations.get(&id).copied() {
            if previous == chunk {
                return;
            }
            self.detach(id, previous);
        }
        self.buckets.entry(chunk).or_default().push(id);
        self.locations.insert(id, chunk);
    }

    /// Returns the chunk the id was removed from
    pub fn remove(&mut self, id: CreatureId) -> Option<ChunkCoord> {
        let chunk = self.locations.remove(&id)?;
        self.detach(id, chunk);
        Some(chunk)
    }

    /// Re-bucket `id` if its chunk changed. Returns true on a move.
    pub fn relocate(&mut self, id: CreatureId, chunk: ChunkCoord) -> bool {
        match self.locations.get(&id) {
            Some(&current) if current == chunk => false,
            Some(_) => {
                self.insert(id, chunk);
                true
            }
            None => false,
        }
    }

    fn detach(&mut self, id: CreatureId, chunk: ChunkCoord) {
        if let Some(bucket) = self.buckets.get_mut(&chunk) {
            bucket.retain(|&e| e != id);
            if bucket.is_empty() {
                self.buckets.remove(&chunk);
            }
        }
    }

    #[inline]
    pub fn count(&self, chunk: ChunkCoord) -> usize {
        self.buckets.get(&chunk).map_or(0, Vec::len)
    }

    pub fn ids_in(&self, chunk: ChunkCoord) -> &[CreatureId] {
        self.buckets.get(&chunk).map_or(&[], Vec::as_slice)
    }

    pub fn chunk_of(&self, id: CreatureId) -> Option<ChunkCoord> {
        self.locations.get(&id).copied()
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Occupied chunks and their populations
    pub fn occupied(&self) -> impl Iterator<Item = (ChunkCoord, usize)> + '_ {
        self.buckets.iter().map(|(chunk, ids)| (*chunk, ids.len()))
    }
}
