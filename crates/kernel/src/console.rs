/// Character console the syscalls and the logger write to.
pub trait Console {
    /// Emit one byte. Never fails.
    fn put(&mut self, byte: u8);

    /// Non-blocking read; `None` when no input is pending.
    fn get(&mut self) -> Option<u8>;

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put(b);
        }
    }
}

impl<T: Console + ?Sized> Console for &mut T {
    fn put(&mut self, byte: u8) {
        (**self).put(byte)
    }

    fn get(&mut self) -> Option<u8> {
        (**self).get()
    }
}
