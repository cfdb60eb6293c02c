use crate::AbstractChannel;
use std::{
    io::{Error, ErrorKind, Read, Result, Write},
    sync::{Arc, Mutex, MutexGuard},
};

/// A channel that implements `AbstractChannel` as well as `Send` and `Sync`.
///
/// Useful when one side of a protocol runs on a spawned thread.
pub struct SyncChannel<R, W> {
    reader: Arc<Mutex<R>>,
    writer: Arc<Mutex<W>>,
}

impl<R: Read, W: Write> SyncChannel<R, W> {
    /// Make a new `SyncChannel` from a `reader` and a `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        let reader = Arc::new(Mutex::new(reader));
        let writer = Arc::new(Mutex::new(writer));
        Self { reader, writer }
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| Error::new(ErrorKind::Other, "channel lock poisoned"))
}

impl<R: Read, W: Write> AbstractChannel for SyncChannel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        lock(&self.writer)?.write_all(bytes)
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        lock(&self.reader)?.read_exact(bytes)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        lock(&self.writer)?.flush()
    }

    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
        }
    }
}
