//! virtio-blk over the legacy (version 1) MMIO transport.
//!
//! One request is in flight at a time: a three-descriptor chain (header,
//! data sector, status byte) is published, the queue is kicked, and the
//! driver spins until the device bumps the used index.

use core::ptr::NonNull;
use core::sync::atomic::{Ordering, fence};

use storage::{BlockDevice, SECTOR_SIZE};

use crate::{Config, logf};

pub const VIRTIO_REG_MAGIC: usize = 0x00;
pub const VIRTIO_REG_VERSION: usize = 0x04;
pub const VIRTIO_REG_DEVICE_ID: usize = 0x08;
pub const VIRTIO_REG_QUEUE_SEL: usize = 0x30;
pub const VIRTIO_REG_QUEUE_NUM: usize = 0x38;
pub const VIRTIO_REG_QUEUE_ALIGN: usize = 0x3c;
pub const VIRTIO_REG_QUEUE_PFN: usize = 0x40;
pub const VIRTIO_REG_QUEUE_NOTIFY: usize = 0x50;
pub const VIRTIO_REG_DEVICE_STATUS: usize = 0x70;
pub const VIRTIO_REG_DEVICE_CONFIG: usize = 0x100;

pub const VIRTIO_MAGIC: u32 = 0x7472_6976;
pub const VIRTIO_DEVICE_BLK: u32 = 2;

pub const VIRTIO_STATUS_ACK: u32 = 1;
pub const VIRTIO_STATUS_DRIVER: u32 = 2;
pub const VIRTIO_STATUS_DRIVER_OK: u32 = 4;
pub const VIRTIO_STATUS_FEAT_OK: u32 = 8;

pub const VIRTQ_DESC_F_NEXT: u16 = 1;
pub const VIRTQ_DESC_F_WRITE: u16 = 2;

pub const VIRTIO_BLK_T_IN: u32 = 0;
pub const VIRTIO_BLK_T_OUT: u32 = 1;

const VIRTQ_ENTRY_NUM: usize = Config::VIRTQ_ENTRY_NUM;
const REQUEST_QUEUE: u32 = 0;

/// 32-bit register window of a memory-mapped device.
pub trait Mmio {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, val: u32);

    fn read64(&self, offset: usize) -> u64 {
        let lo = self.read32(offset) as u64;
        let hi = self.read32(offset + 4) as u64;
        lo | (hi << 32)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtqDesc {
    pub addr: u64,
    pub len: u32,
    pub flags: u16,
    pub next: u16,
}

#[repr(C)]
#[derive(Debug)]
pub struct VirtqAvail {
    pub flags: u16,
    pub index: u16,
    pub ring: [u16; VIRTQ_ENTRY_NUM],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtqUsedElem {
    pub id: u32,
    pub len: u32,
}

#[repr(C)]
#[derive(Debug)]
pub struct VirtqUsed {
    pub flags: u16,
    pub index: u16,
    pub ring: [VirtqUsedElem; VIRTQ_ENTRY_NUM],
}

const VIRTQ_PAD: usize = 4096
    - core::mem::size_of::<[VirtqDesc; VIRTQ_ENTRY_NUM]>()
    - core::mem::size_of::<VirtqAvail>();

/// Legacy split virtqueue; the used ring starts on the page after the
/// descriptors and available ring.
#[repr(C, align(4096))]
pub struct VirtQueue {
    pub descs: [VirtqDesc; VIRTQ_ENTRY_NUM],
    pub avail: VirtqAvail,
    _pad: [u8; VIRTQ_PAD],
    pub used: VirtqUsed,
}

/// A block request as the device sees it.
#[repr(C, packed)]
pub struct BlkRequest {
    pub kind: u32,
    pub reserved: u32,
    pub sector: u64,
    pub data: [u8; SECTOR_SIZE],
    pub status: u8,
}

/// Bytes of the request header the device reads (kind, reserved, sector).
pub const BLK_REQ_HEADER_LEN: u32 = 16;
pub const BLK_REQ_DATA_OFFSET: u64 = 16;
pub const BLK_REQ_STATUS_OFFSET: u64 = 16 + SECTOR_SIZE as u64;

pub struct VirtioBlk<R> {
    regs: R,
    queue: NonNull<VirtQueue>,
    req: NonNull<BlkRequest>,
    last_used_index: u16,
    capacity: u64,
}

impl<R: Mmio> VirtioBlk<R> {
    /// Bring up the device and its request queue.
    ///
    /// Panics if the window does not hold a version 1 virtio block device.
    ///
    /// # Safety
    /// `queue` and `req` must point to zeroed memory whose addresses are the
    /// physical addresses the device will DMA to, and must outlive the driver.
    pub unsafe fn init(mut regs: R, queue: NonNull<VirtQueue>, req: NonNull<BlkRequest>) -> Self {
        if regs.read32(VIRTIO_REG_MAGIC) != VIRTIO_MAGIC {
            panic!("virtio: invalid magic value");
        }
        if regs.read32(VIRTIO_REG_VERSION) != 1 {
            panic!("virtio: invalid version");
        }
        if regs.read32(VIRTIO_REG_DEVICE_ID) != VIRTIO_DEVICE_BLK {
            panic!("virtio: invalid device id");
        }

        regs.write32(VIRTIO_REG_DEVICE_STATUS, 0);
        set_status(&mut regs, VIRTIO_STATUS_ACK);
        set_status(&mut regs, VIRTIO_STATUS_DRIVER);
        set_status(&mut regs, VIRTIO_STATUS_FEAT_OK);

        regs.write32(VIRTIO_REG_QUEUE_SEL, REQUEST_QUEUE);
        regs.write32(VIRTIO_REG_QUEUE_NUM, VIRTQ_ENTRY_NUM as u32);
        regs.write32(VIRTIO_REG_QUEUE_ALIGN, 0);
        // The device expects the queue's physical address here.
        regs.write32(VIRTIO_REG_QUEUE_PFN, queue.as_ptr() as usize as u32);

        regs.write32(VIRTIO_REG_DEVICE_STATUS, VIRTIO_STATUS_DRIVER_OK);

        let capacity = regs.read64(VIRTIO_REG_DEVICE_CONFIG) * SECTOR_SIZE as u64;
        logf!("virtio-blk: capacity is {} bytes", capacity);

        Self {
            regs,
            queue,
            req,
            last_used_index: 0,
            capacity,
        }
    }

    /// Device size in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    fn read_write(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE], is_write: bool) {
        let sectors = self.capacity / SECTOR_SIZE as u64;
        if sector as u64 >= sectors {
            panic!(
                "virtio: tried to read/write sector={}, but capacity is {}",
                sector, sectors
            );
        }

        let req = self.req.as_ptr();
        let req_paddr = req as usize as u64;
        let q = self.queue.as_ptr();

        // Both regions are owned by this driver and only shared with the
        // device, which does not touch them until the kick below.
        unsafe {
            (&raw mut (*req).kind).write_unaligned(if is_write { VIRTIO_BLK_T_OUT } else { VIRTIO_BLK_T_IN });
            (&raw mut (*req).reserved).write_unaligned(0);
            (&raw mut (*req).sector).write_unaligned(sector as u64);
            (&raw mut (*req).status).write_volatile(0);
            if is_write {
                (&raw mut (*req).data).write_unaligned(*buf);
            }

            let descs = &raw mut (*q).descs;
            (*descs)[0] = VirtqDesc {
                addr: req_paddr,
                len: BLK_REQ_HEADER_LEN,
                flags: VIRTQ_DESC_F_NEXT,
                next: 1,
            };
            (*descs)[1] = VirtqDesc {
                addr: req_paddr + BLK_REQ_DATA_OFFSET,
                len: SECTOR_SIZE as u32,
                flags: VIRTQ_DESC_F_NEXT | if is_write { 0 } else { VIRTQ_DESC_F_WRITE },
                next: 2,
            };
            (*descs)[2] = VirtqDesc {
                addr: req_paddr + BLK_REQ_STATUS_OFFSET,
                len: 1,
                flags: VIRTQ_DESC_F_WRITE,
                next: 0,
            };

            let avail_index = (&raw const (*q).avail.index).read_volatile();
            (&raw mut (*q).avail.ring[avail_index as usize % VIRTQ_ENTRY_NUM]).write_volatile(0);
            fence(Ordering::SeqCst);
            (&raw mut (*q).avail.index).write_volatile(avail_index.wrapping_add(1));
            fence(Ordering::SeqCst);
        }

        self.regs.write32(VIRTIO_REG_QUEUE_NOTIFY, REQUEST_QUEUE);
        self.last_used_index = self.last_used_index.wrapping_add(1);

        while unsafe { (&raw const (*q).used.index).read_volatile() } != self.last_used_index {
            core::hint::spin_loop();
        }
        fence(Ordering::SeqCst);

        let status = unsafe { (&raw const (*req).status).read_volatile() };
        if status != 0 {
            logf!("virtio: warn: failed to read/write sector={} status={}", sector, status);
            return;
        }
        if !is_write {
            *buf = unsafe { (&raw const (*req).data).read_unaligned() };
        }
    }
}

fn set_status<R: Mmio>(regs: &mut R, bit: u32) {
    let status = regs.read32(VIRTIO_REG_DEVICE_STATUS);
    regs.write32(VIRTIO_REG_DEVICE_STATUS, status | bit);
}

impl<R: Mmio> BlockDevice for VirtioBlk<R> {
    fn read_sector(&mut self, sector: u32, buf: &mut [u8; SECTOR_SIZE]) {
        self.read_write(sector, buf, false);
    }

    fn write_sector(&mut self, sector: u32, buf: &[u8; SECTOR_SIZE]) {
        let mut data = *buf;
        self.read_write(sector, &mut data, true);
    }

    fn capacity_sectors(&self) -> u64 {
        self.capacity / SECTOR_SIZE as u64
    }
}
