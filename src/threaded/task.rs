//! The task body shared by both executors, and the buffer splitting that
//! gives each task sole ownership of its part of the output.

use crate::kernels::compute_element;
use crate::matrix::{Element, Matrix};
use crate::partition::Chunk;

/// Fill `out` with the output cells of `chunk`.
///
/// `out[i]` receives the cell at flattened index `chunk.start + i`, so
/// `out` must be exactly `chunk.len()` long. Nothing outside `out` is
/// written; an empty chunk does nothing.
pub fn run_chunk(a: &Matrix, b: &Matrix, chunk: Chunk, out: &mut [Element]) {
    debug_assert_eq!(out.len(), chunk.len());

    for (cell, (row, col)) in out.iter_mut().zip(chunk.cells(b.cols())) {
        *cell = compute_element(a, b, row, col);
    }
}

/// Split `buf` into one mutable slice per chunk.
///
/// `chunks` must be contiguous and in order starting at 0, as
/// [`crate::partition::partition`] produces them, and must cover `buf`.
/// The returned slices are disjoint, so they can be handed to different
/// threads at the same time.
pub fn split_chunks_mut<'a>(buf: &'a mut [Element], chunks: &[Chunk]) -> Vec<&'a mut [Element]> {
    let mut rest = buf;
    let mut offset = 0;
    let mut parts = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        debug_assert!(chunk.is_empty() || chunk.start == offset);
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(chunk.len());
        parts.push(head);
        rest = tail;
        offset += chunk.len();
    }

    debug_assert!(rest.is_empty(), "chunks do not cover the buffer");
    parts
}

/// Split an owned buffer into one owned `Vec` per chunk.
///
/// Same contract as [`split_chunks_mut`]. Splits from the back so every
/// cell is moved once.
pub fn split_chunks_owned(mut buf: Vec<Element>, chunks: &[Chunk]) -> Vec<Vec<Element>> {
    let mut parts = Vec::with_capacity(chunks.len());

    for chunk in chunks.iter().rev() {
        let at = buf.len() - chunk.len();
        parts.push(buf.split_off(at));
    }

    debug_assert!(buf.is_empty(), "chunks do not cover the buffer");
    parts.reverse();
    parts
}
