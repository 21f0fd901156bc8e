//! Fixed-capacity circular buffer of a generic element type (spec.md §4.7).
//!
//! Overflow and underflow are not fatal: `add_data` clears the buffer and returns
//! `false` on overflow, `get`/`peek` return `false` on underflow and leave the buffer
//! untouched. Not internally synchronized — per spec.md §5, each instance belongs to
//! exactly one producer/consumer pair.

/// A ring buffer over `T`, sized at construction and resizable (destructively)
/// thereafter.
pub struct RingBuffer<T: Copy + Default> {
    name: &'static str,
    length: usize,
    buffer: Vec<T>,
    i_ptr: usize,
    o_ptr: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates a new ring buffer with the given capacity. `name` tags log lines on
    /// overflow/underflow.
    pub fn new(length: usize, name: &'static str) -> Self {
        assert!(length > 0, "ring buffer length must be nonzero");

        RingBuffer {
            name,
            length,
            buffer: vec![T::default(); length],
            i_ptr: 0,
            o_ptr: 0,
        }
    }

    /// Appends `data` to the buffer. Returns `false` and clears the buffer if `data`
    /// doesn't fit in the currently free space.
    pub fn add_data(&mut self, data: &[T]) -> bool {
        if data.len() > self.free_space() {
            tracing::error!(
                subsystem = "ring_buffer",
                name = self.name,
                requested = data.len(),
                free = self.free_space(),
                "overflow in ring buffer, clearing"
            );
            self.clear();
            return false;
        }

        for &b in data {
            self.buffer[self.i_ptr] = b;
            self.i_ptr += 1;
            if self.i_ptr == self.length {
                self.i_ptr = 0;
            }
        }

        true
    }

    /// Reads `out.len()` elements from the buffer in FIFO order, advancing the output
    /// pointer. Returns `false` without modifying state if fewer than `out.len()`
    /// elements are available.
    pub fn get(&mut self, out: &mut [T]) -> bool {
        if self.data_size() < out.len() {
            tracing::error!(
                subsystem = "ring_buffer",
                name = self.name,
                requested = out.len(),
                available = self.data_size(),
                "underflow in ring buffer get"
            );
            return false;
        }

        for slot in out.iter_mut() {
            *slot = self.buffer[self.o_ptr];
            self.o_ptr += 1;
            if self.o_ptr == self.length {
                self.o_ptr = 0;
            }
        }

        true
    }

    /// Like `get`, but does not advance the output pointer.
    pub fn peek(&self, out: &mut [T]) -> bool {
        if self.data_size() < out.len() {
            tracing::error!(
                subsystem = "ring_buffer",
                name = self.name,
                requested = out.len(),
                available = self.data_size(),
                "underflow in ring buffer peek"
            );
            return false;
        }

        let mut ptr = self.o_ptr;
        for slot in out.iter_mut() {
            *slot = self.buffer[ptr];
            ptr += 1;
            if ptr == self.length {
                ptr = 0;
            }
        }

        true
    }

    /// Resets both pointers and zeroes the backing storage.
    pub fn clear(&mut self) {
        self.i_ptr = 0;
        self.o_ptr = 0;
        for slot in self.buffer.iter_mut() {
            *slot = T::default();
        }
    }

    /// Destructively resizes the buffer to `length`, discarding all data.
    pub fn resize(&mut self, length: usize) {
        assert!(length > 0, "ring buffer length must be nonzero");
        self.length = length;
        self.buffer = vec![T::default(); length];
        self.i_ptr = 0;
        self.o_ptr = 0;
    }

    /// Space currently available for writing.
    pub fn free_space(&self) -> usize {
        let len = if self.o_ptr > self.i_ptr {
            self.o_ptr - self.i_ptr
        } else if self.i_ptr > self.o_ptr {
            self.length - (self.i_ptr - self.o_ptr)
        } else {
            self.length
        };

        if len > self.length {
            0
        } else {
            len
        }
    }

    /// Bytes/elements currently stored and awaiting read.
    pub fn data_size(&self) -> usize {
        self.length - self.free_space()
    }

    /// Total capacity of the buffer.
    pub fn length(&self) -> usize {
        self.length
    }

    /// True if `length` elements would fit in the buffer's free space.
    ///
    /// Preserves a surprising strict inequality from the source implementation: a
    /// request for exactly `free_space()` elements is rejected (Design Notes, Open
    /// Question (c)).
    pub fn has_space(&self, length: usize) -> bool {
        self.free_space() > length
    }

    /// True if the buffer holds at least one unread element.
    pub fn has_data(&self) -> bool {
        self.o_ptr != self.i_ptr
    }

    /// True if the buffer holds no unread elements.
    pub fn is_empty(&self) -> bool {
        self.o_ptr == self.i_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_free_plus_data_equals_length() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(16, "test");
        for n in 0..20 {
            let push = (n % 5) as usize;
            let data: Vec<u8> = (0..push as u8).collect();
            rb.add_data(&data);
            assert_eq!(rb.free_space() + rb.data_size(), rb.length());
        }
    }

    #[test]
    fn fifo_roundtrip() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(8, "test");
        assert!(rb.add_data(&[1, 2, 3]));
        let mut out = [0u8; 3];
        assert!(rb.get(&mut out));
        assert_eq!(out, [1, 2, 3]);
        assert!(rb.is_empty());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(4, "test");
        rb.add_data(&[1, 2]);
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.free_space(), rb.length());
    }

    #[test]
    fn overflow_clears_and_reports_false() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(4, "test");
        assert!(!rb.add_data(&[1, 2, 3, 4, 5]));
        assert!(rb.is_empty());
    }

    #[test]
    fn underflow_leaves_buffer_untouched() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(4, "test");
        rb.add_data(&[1]);
        let mut out = [0u8; 2];
        assert!(!rb.get(&mut out));
        assert_eq!(rb.data_size(), 1);
    }

    #[test]
    fn has_space_rejects_exact_free_space() {
        let rb: RingBuffer<u8> = RingBuffer::new(4, "test");
        assert_eq!(rb.free_space(), 4);
        assert!(!rb.has_space(4));
        assert!(rb.has_space(3));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut rb: RingBuffer<u8> = RingBuffer::new(4, "test");
        rb.add_data(&[9, 8]);
        let mut out = [0u8; 2];
        assert!(rb.peek(&mut out));
        assert_eq!(out, [9, 8]);
        assert_eq!(rb.data_size(), 2);
    }
}
