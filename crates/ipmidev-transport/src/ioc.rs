//! ioctl request-code arithmetic.
//!
//! Codes use the generic Linux layout:
//!
//! ```text
//! ┌───────────┬──────────────┬──────────┬──────────┐
//! │ dir (2b)  │ size (14b)   │ type (8b)│ nr (8b)  │
//! │ bits 30-31│ bits 16-29   │ bits 8-15│ bits 0-7 │
//! └───────────┴──────────────┴──────────┴──────────┘
//! ```

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;
const DIR_BITS: u32 = 2;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

const NR_MASK: u32 = (1 << NR_BITS) - 1;
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;
const DIR_MASK: u32 = (1 << DIR_BITS) - 1;

/// Largest argument size representable in a request code.
pub const MAX_SIZE: u16 = SIZE_MASK as u16;

/// Data-transfer direction of an ioctl, seen from user space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// No argument is transferred.
    None = 0,
    /// User space writes the argument for the kernel to read (`_IOW`).
    Write = 1,
    /// The kernel writes the argument for user space to read (`_IOR`).
    Read = 2,
    /// Both (`_IOWR`).
    ReadWrite = 3,
}

impl Direction {
    const fn from_bits(bits: u32) -> Self {
        match bits & DIR_MASK {
            0 => Direction::None,
            1 => Direction::Write,
            2 => Direction::Read,
            _ => Direction::ReadWrite,
        }
    }
}

/// The four fields packed into a request code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoctlParts {
    pub direction: Direction,
    pub kind: u8,
    pub number: u8,
    pub size: u16,
}

/// Pack a request code.
///
/// `size` is truncated to 14 bits; every argument struct this crate passes
/// is far below [`MAX_SIZE`].
pub const fn encode(direction: Direction, kind: u8, number: u8, size: usize) -> u32 {
    ((direction as u32) << DIR_SHIFT)
        | ((size as u32 & SIZE_MASK) << SIZE_SHIFT)
        | ((kind as u32) << TYPE_SHIFT)
        | ((number as u32) << NR_SHIFT)
}

/// Unpack a request code into its fields.
pub const fn decode(code: u32) -> IoctlParts {
    IoctlParts {
        direction: Direction::from_bits(code >> DIR_SHIFT),
        kind: ((code >> TYPE_SHIFT) & TYPE_MASK) as u8,
        number: ((code >> NR_SHIFT) & NR_MASK) as u8,
        size: ((code >> SIZE_SHIFT) & SIZE_MASK) as u16,
    }
}
