use core::mem::size_of;

/// Callee-saved registers as `switch_context` leaves them on a stack:
/// `ra` at the lowest address, then `s0..s11`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwitchFrame {
    pub ra: usize,
    pub s: [usize; 12],
}

impl SwitchFrame {
    /// Words pushed by one switch.
    pub const WORDS: usize = 13;
    pub const SIZE: usize = Self::WORDS * size_of::<usize>();

    /// Frame for a process that has never run: returning from the switch
    /// lands in `entry` with every s-register zero.
    pub const fn first_entry(entry: usize) -> Self {
        Self { ra: entry, s: [0; 12] }
    }

    pub fn words(&self) -> [usize; Self::WORDS] {
        let mut out = [0; Self::WORDS];
        out[0] = self.ra;
        out[1..].copy_from_slice(&self.s);
        out
    }

    pub fn from_words(words: &[usize; Self::WORDS]) -> Self {
        let mut s = [0; 12];
        s.copy_from_slice(&words[1..]);
        Self { ra: words[0], s }
    }

    /// Serialize in stack order into the first `SIZE` bytes of `dst`.
    pub fn write_to(&self, dst: &mut [u8]) {
        let word = size_of::<usize>();
        for (chunk, value) in dst[..Self::SIZE].chunks_exact_mut(word).zip(self.words()) {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }
    }
}

const _: () = assert!(size_of::<SwitchFrame>() == SwitchFrame::SIZE);
