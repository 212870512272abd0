use core::fmt;

/// General-purpose registers captured on trap entry.
///
/// The field order is the store order of the entry stub; the stub and this
/// struct must change together.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    pub ra: u32,
    pub gp: u32,
    pub tp: u32,
    pub t0: u32,
    pub t1: u32,
    pub t2: u32,
    pub t3: u32,
    pub t4: u32,
    pub t5: u32,
    pub t6: u32,
    pub a0: u32,
    pub a1: u32,
    pub a2: u32,
    pub a3: u32,
    pub a4: u32,
    pub a5: u32,
    pub a6: u32,
    pub a7: u32,
    pub s0: u32,
    pub s1: u32,
    pub s2: u32,
    pub s3: u32,
    pub s4: u32,
    pub s5: u32,
    pub s6: u32,
    pub s7: u32,
    pub s8: u32,
    pub s9: u32,
    pub s10: u32,
    pub s11: u32,
    /// User stack pointer, copied out of `sscratch` by the entry stub.
    pub sp: u32,
}

const NAMES: [&str; TrapFrame::WORDS] = [
    "ra", "gp", "tp", "t0", "t1", "t2", "t3", "t4", "t5", "t6", "a0", "a1", "a2", "a3", "a4", "a5", "a6",
    "a7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "sp",
];

impl TrapFrame {
    pub const WORDS: usize = 31;
    pub const SIZE: usize = Self::WORDS * 4;

    /// Frame contents in stack order.
    pub fn to_words(&self) -> [u32; Self::WORDS] {
        let r = self;
        [
            r.ra, r.gp, r.tp, r.t0, r.t1, r.t2, r.t3, r.t4, r.t5, r.t6, r.a0, r.a1, r.a2, r.a3, r.a4,
            r.a5, r.a6, r.a7, r.s0, r.s1, r.s2, r.s3, r.s4, r.s5, r.s6, r.s7, r.s8, r.s9, r.s10, r.s11,
            r.sp,
        ]
    }

    pub fn from_words(w: &[u32; Self::WORDS]) -> Self {
        Self {
            ra: w[0],
            gp: w[1],
            tp: w[2],
            t0: w[3],
            t1: w[4],
            t2: w[5],
            t3: w[6],
            t4: w[7],
            t5: w[8],
            t6: w[9],
            a0: w[10],
            a1: w[11],
            a2: w[12],
            a3: w[13],
            a4: w[14],
            a5: w[15],
            a6: w[16],
            a7: w[17],
            s0: w[18],
            s1: w[19],
            s2: w[20],
            s3: w[21],
            s4: w[22],
            s5: w[23],
            s6: w[24],
            s7: w[25],
            s8: w[26],
            s9: w[27],
            s10: w[28],
            s11: w[29],
            sp: w[30],
        }
    }
}

impl fmt::Debug for TrapFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in NAMES.iter().zip(self.to_words()) {
            map.entry(name, &format_args!("{:#010x}", value));
        }
        map.finish()
    }
}

const _: () = assert!(core::mem::size_of::<TrapFrame>() == TrapFrame::SIZE);
