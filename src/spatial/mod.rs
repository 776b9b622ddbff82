pub mod chunk_index;

pub use chunk_index::ChunkIndex;
