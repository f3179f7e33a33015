//! OpCode definitions for the tern VM
//!
//! Every instruction is one 64-bit word:
//!
//! ```text
//! [8-bit opcode][16-bit A][16-bit B][16-bit C][8-bit T]
//!  63        56  55    40  39    24  23     8  7     0
//! ```
//!
//! A, B and C hold register indices, constant indices, global or captured
//! variable slots, counts, or absolute jump targets. T is a tag byte whose
//! meaning is per-opcode: an operator code, a mode, a polarity flag, or two
//! 4-bit provenance nibbles saying where an operand comes from.

use std::fmt;

/// Virtual machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // ===== Loads & Stores =====
    /// Load constant: R[A] = K[B]
    LoadK = 0,
    /// Move register: R[A] = R[B]
    Move = 1,
    /// Load global: R[A] = G[B]
    LoadGlobal = 2,
    /// Store global: G[A] = src(T.lo, B)
    StoreGlobal = 3,
    /// Load captured variable: R[A] = F[B]
    LoadFree = 4,
    /// Store captured variable: F[A] = src(T.lo, B)
    StoreFree = 5,

    // ===== Jumps =====
    /// Conditional jump: if truth(R[A]) == T then IP = B
    Check = 6,
    /// Unconditional jump: IP = A
    Jump = 7,

    // ===== Operators =====
    /// R[A] = R[B] op R[C], op = T
    BinRR = 8,
    /// R[A] = R[B] op K[C]
    BinRK = 9,
    /// R[A] = K[B] op R[C]
    BinKR = 10,
    /// R[A] = G[B] op G[C]
    BinGG = 11,
    /// R[A] = src(T bits 4-5, B) == src(T bits 0-1, C), negated when T bit 7 is set
    Eq = 12,
    /// R[A] = op R[B], op = T
    Prefix = 13,

    // ===== Collections =====
    /// R[A] = R[B][src(T.lo, C)]
    GetIndex = 14,
    /// R[A][src(T.hi, B)] = src(T.lo, C)
    SetIndex = 15,
    /// R[A] = R[B][R[C] : R[C+1]], T bit 0 = lower present, bit 1 = upper present
    Slice = 16,
    /// R[A] = [R[B], ..., R[B+C-1]]
    List = 17,
    /// R[A] = {}
    Object = 18,

    // ===== Loops =====
    /// Numeric loop step over R[A..A+3]; jump to B while in range
    For = 19,
    /// R[A] = iterator(R[B])
    Iter = 20,
    /// If R[A] advances: R[A+1] = key, R[A+2] = value, IP = B
    IFor = 21,

    // ===== Functions =====
    /// R[A] = closure(K[B])
    Fun = 22,
    /// R[A] = the executing closure
    LoadSelf = 23,
    /// R[A] = R[B](R[B+1], ..., R[B+C]), T bit 0 = spread last argument
    Call = 24,
    /// Return R[A], or nil when T = 1
    Return = 25,

    // ===== Threads =====
    /// R[A] = thread(R[B]) with stack tier C (0xFF = configured default)
    Spawn = 26,
    /// R[A] = resume R[B] with R[B+1], ..., R[B+C]
    Resume = 27,
    /// Yield R[B]; R[A] = first argument of the next resume
    Yield = 28,

    /// Terminate execution successfully
    End = 29,
}

impl OpCode {
    /// Convert u8 to OpCode
    pub fn from_u8(byte: u8) -> Option<Self> {
        use OpCode::*;
        Some(match byte {
            0 => LoadK,
            1 => Move,
            2 => LoadGlobal,
            3 => StoreGlobal,
            4 => LoadFree,
            5 => StoreFree,
            6 => Check,
            7 => Jump,
            8 => BinRR,
            9 => BinRK,
            10 => BinKR,
            11 => BinGG,
            12 => Eq,
            13 => Prefix,
            14 => GetIndex,
            15 => SetIndex,
            16 => Slice,
            17 => List,
            18 => Object,
            19 => For,
            20 => Iter,
            21 => IFor,
            22 => Fun,
            23 => LoadSelf,
            24 => Call,
            25 => Return,
            26 => Spawn,
            27 => Resume,
            28 => Yield,
            29 => End,
            _ => return None,
        })
    }

    /// Convert OpCode to u8
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get opcode name for debugging
    pub fn name(self) -> &'static str {
        match self {
            OpCode::LoadK => "LOADK",
            OpCode::Move => "MOVE",
            OpCode::LoadGlobal => "LOADGLOBAL",
            OpCode::StoreGlobal => "STOREGLOBAL",
            OpCode::LoadFree => "LOADFREE",
            OpCode::StoreFree => "STOREFREE",
            OpCode::Check => "CHECK",
            OpCode::Jump => "JUMP",
            OpCode::BinRR => "BINRR",
            OpCode::BinRK => "BINRK",
            OpCode::BinKR => "BINKR",
            OpCode::BinGG => "BINGG",
            OpCode::Eq => "EQ",
            OpCode::Prefix => "PREFIX",
            OpCode::GetIndex => "GETINDEX",
            OpCode::SetIndex => "SETINDEX",
            OpCode::Slice => "SLICE",
            OpCode::List => "LIST",
            OpCode::Object => "OBJECT",
            OpCode::For => "FOR",
            OpCode::Iter => "ITER",
            OpCode::IFor => "IFOR",
            OpCode::Fun => "FUN",
            OpCode::LoadSelf => "LOADSELF",
            OpCode::Call => "CALL",
            OpCode::Return => "RETURN",
            OpCode::Spawn => "SPAWN",
            OpCode::Resume => "RESUME",
            OpCode::Yield => "YIELD",
            OpCode::End => "END",
        }
    }

    /// Which operand field holds the jump target, if this is a jump
    pub fn jump_field(self) -> Option<Field> {
        match self {
            OpCode::Jump => Some(Field::A),
            OpCode::Check | OpCode::For | OpCode::IFor => Some(Field::B),
            _ => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 16-bit operand fields of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    A,
    B,
    C,
}

/// Where an operand is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Src {
    Local = 0,
    Const = 1,
    Global = 2,
    Free = 3,
}

impl Src {
    /// Decode the low two bits of a provenance field
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Src::Local,
            1 => Src::Const,
            2 => Src::Global,
            _ => Src::Free,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Instruction encoding/decoding helpers
pub mod instruction {
    use super::{Field, Src};

    pub const OPCODE_SHIFT: u32 = 56;
    pub const A_SHIFT: u32 = 40;
    pub const B_SHIFT: u32 = 24;
    pub const C_SHIFT: u32 = 8;

    const FIELD_MASK: u64 = 0xFFFF;
    const BYTE_MASK: u64 = 0xFF;

    /// Tag bit marking a negated equality
    pub const NEQ_FLAG: u8 = 0x80;
    /// Tag bit marking a spread call
    pub const SPREAD_FLAG: u8 = 0x01;
    /// Tag value of a nil return
    pub const RETURN_NIL: u8 = 0x01;
    /// Spawn tier operand meaning "use the configured default"
    pub const DEFAULT_TIER: u16 = 0xFF;
    /// Slice: lower bound present
    pub const SLICE_LOWER: u8 = 0x01;
    /// Slice: upper bound present
    pub const SLICE_UPPER: u8 = 0x02;

    /// Encode a full instruction word
    #[inline]
    pub fn encode(opcode: u8, a: u16, b: u16, c: u16, t: u8) -> u64 {
        ((opcode as u64) << OPCODE_SHIFT)
            | ((a as u64) << A_SHIFT)
            | ((b as u64) << B_SHIFT)
            | ((c as u64) << C_SHIFT)
            | (t as u64)
    }

    /// Decode instruction opcode
    #[inline]
    pub fn decode_opcode(word: u64) -> u8 {
        (word >> OPCODE_SHIFT) as u8
    }

    /// Decode A operand
    #[inline]
    pub fn decode_a(word: u64) -> u16 {
        ((word >> A_SHIFT) & FIELD_MASK) as u16
    }

    /// Decode B operand
    #[inline]
    pub fn decode_b(word: u64) -> u16 {
        ((word >> B_SHIFT) & FIELD_MASK) as u16
    }

    /// Decode C operand
    #[inline]
    pub fn decode_c(word: u64) -> u16 {
        ((word >> C_SHIFT) & FIELD_MASK) as u16
    }

    /// Decode the tag byte
    #[inline]
    pub fn decode_t(word: u64) -> u8 {
        (word & BYTE_MASK) as u8
    }

    /// Replace one 16-bit field, leaving the rest of the word intact
    #[inline]
    pub fn with_field(word: u64, field: Field, value: u16) -> u64 {
        let shift = match field {
            Field::A => A_SHIFT,
            Field::B => B_SHIFT,
            Field::C => C_SHIFT,
        };
        (word & !(FIELD_MASK << shift)) | ((value as u64) << shift)
    }

    /// Pack two provenance nibbles into a tag byte
    #[inline]
    pub fn pack_tag(hi: Src, lo: Src) -> u8 {
        (hi.as_u8() << 4) | lo.as_u8()
    }

    /// Provenance in the high nibble
    #[inline]
    pub fn tag_hi(t: u8) -> Src {
        Src::from_bits(t >> 4)
    }

    /// Provenance in the low nibble
    #[inline]
    pub fn tag_lo(t: u8) -> Src {
        Src::from_bits(t)
    }
}
