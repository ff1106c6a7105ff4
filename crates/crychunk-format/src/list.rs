//! Storage abstraction for parsed chunk tables.
//!
//! The parser and the header stripper are written once against [`ChunkList`]
//! and work the same whether descriptors are stored by value
//! (`Vec<ChunkDescriptor>`) or behind individual heap handles
//! (`Vec<Box<ChunkDescriptor>>`).

use crate::ChunkDescriptor;

/// An indexable, resizable collection of chunk descriptors.
pub trait ChunkList {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panics if `index >= self.len()`.
    fn chunk(&self, index: usize) -> &ChunkDescriptor;

    /// Panics if `index >= self.len()`.
    fn chunk_mut(&mut self, index: usize) -> &mut ChunkDescriptor;

    /// Remove every descriptor, dropping any loaded payloads.
    fn clear(&mut self);

    /// Replace the contents with `count` default descriptors.
    fn create(&mut self, count: usize);

    /// Stable sort by ascending `file_offset`.
    fn sort_by_offset(&mut self);
}

impl ChunkList for Vec<ChunkDescriptor> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn chunk(&self, index: usize) -> &ChunkDescriptor {
        &self[index]
    }

    #[inline]
    fn chunk_mut(&mut self, index: usize) -> &mut ChunkDescriptor {
        &mut self[index]
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn create(&mut self, count: usize) {
        Vec::clear(self);
        self.resize_with(count, ChunkDescriptor::default);
    }

    fn sort_by_offset(&mut self) {
        self.sort_by_key(|chunk| chunk.file_offset);
    }
}

impl ChunkList for Vec<Box<ChunkDescriptor>> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn chunk(&self, index: usize) -> &ChunkDescriptor {
        &self[index]
    }

    #[inline]
    fn chunk_mut(&mut self, index: usize) -> &mut ChunkDescriptor {
        &mut self[index]
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn create(&mut self, count: usize) {
        Vec::clear(self);
        self.resize_with(count, Box::default);
    }

    fn sort_by_offset(&mut self) {
        self.sort_by_key(|chunk| chunk.file_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset: u32, id: u32) -> ChunkDescriptor {
        ChunkDescriptor {
            chunk_id: id,
            file_offset: offset,
            ..Default::default()
        }
    }

    fn exercise<L: ChunkList>(list: &mut L) {
        list.create(3);
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());

        *list.chunk_mut(0) = at(300, 0);
        *list.chunk_mut(1) = at(100, 1);
        *list.chunk_mut(2) = at(100, 2);
        list.chunk_mut(0).data = Some(vec![1, 2, 3]);

        list.sort_by_offset();
        let ids: Vec<u32> = (0..list.len()).map(|i| list.chunk(i).chunk_id).collect();
        assert_eq!(ids, [1, 2, 0]);
        assert_eq!(list.chunk(2).data(), Some(&[1u8, 2, 3][..]));

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_value_list() {
        exercise(&mut Vec::<ChunkDescriptor>::new());
    }

    #[test]
    fn test_boxed_list() {
        exercise(&mut Vec::<Box<ChunkDescriptor>>::new());
    }

    #[test]
    fn test_create_discards_previous_contents() {
        let mut list = vec![at(5, 9)];
        ChunkList::create(&mut list, 2);
        assert_eq!(list, vec![ChunkDescriptor::default(); 2]);
    }
}
