//! Reusable render buffers.
//!
//! Renders write into a `String` borrowed from a [`BufferPool`]. The
//! [`PooledBuffer`] guard clears the buffer and hands it back when dropped, on
//! success and error paths alike.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Buffer pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Maximum number of idle buffers kept for reuse.
    pub max_retained: usize,
    /// Buffers that grew beyond this capacity are dropped instead of retained.
    pub max_buffer_capacity: usize,
    /// Capacity of freshly allocated buffers.
    pub initial_capacity: usize,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self {
            max_retained: 16,
            max_buffer_capacity: 64 * 1024,
            initial_capacity: 1024,
        }
    }
}

impl BufferPoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retained(mut self, n: usize) -> Self {
        self.max_retained = n;
        self
    }

    pub fn with_max_buffer_capacity(mut self, bytes: usize) -> Self {
        self.max_buffer_capacity = bytes;
        self
    }

    pub fn with_initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes;
        self
    }
}

/// A pool of render buffers.
#[derive(Debug)]
pub struct BufferPool {
    config: BufferPoolConfig,
    idle: Mutex<Vec<String>>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(BufferPoolConfig::default())
    }
}

impl BufferPool {
    pub fn new(config: BufferPoolConfig) -> Self {
        Self {
            config,
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Take an empty buffer. It returns to the pool when the guard drops.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(|| String::with_capacity(self.config.initial_capacity));
        PooledBuffer {
            pool: self,
            buf: Some(buf),
        }
    }

    /// Number of idle buffers.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn release(&self, mut buf: String) {
        if buf.capacity() > self.config.max_buffer_capacity {
            return;
        }
        buf.clear();
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.config.max_retained {
            idle.push(buf);
        }
    }
}

/// A buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Option<String>,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        // `buf` is only taken in `drop`.
        self.buf.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        self.buf.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_reused_and_cleared() {
        let pool = BufferPool::default();
        {
            let mut b = pool.acquire();
            b.push_str("CREATE TABLE");
        }
        assert_eq!(pool.idle_count(), 1);

        let b = pool.acquire();
        assert!(b.is_empty());
        assert!(b.capacity() >= "CREATE TABLE".len());
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let pool = BufferPool::new(
            BufferPoolConfig::new()
                .with_initial_capacity(8)
                .with_max_buffer_capacity(16),
        );
        {
            let mut b = pool.acquire();
            b.push_str(&"x".repeat(100));
        }
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn retained_count_is_bounded() {
        let pool = BufferPool::new(BufferPoolConfig::new().with_max_retained(1));
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn released_on_error_path() {
        let pool = BufferPool::default();
        let result: Result<(), &str> = (|| {
            let mut b = pool.acquire();
            b.push_str("partial");
            Err("render failed")
        })();
        assert!(result.is_err());
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.acquire().is_empty());
    }
}
