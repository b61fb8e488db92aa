//! Primitive type sizes.
//!
//! Reports the storage size of the C/C++ primitive kinds on the host, in a
//! stable enumerated order, plus the byte size of fixed-size array
//! declarations built from them.
//!
//! Sizes come from the `core::ffi` C aliases where one exists and from
//! `libc` for `wchar_t`. Rust has no `long double`, so its size is taken
//! from the target ABI table in [`long_double_size`].

use core::ffi::{
    c_char, c_double, c_float, c_int, c_long, c_longlong, c_short, c_uint, c_ulong, c_ulonglong,
    c_ushort,
};
use core::mem::size_of;
use std::io::{self, Write};

/// Primitive kinds, declared in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Char16,
    Char32,
    WChar,
    Short,
    Int,
    Long,
    LongLong,
    UShort,
    UInt,
    ULong,
    ULongLong,
    Float,
    Double,
    LongDouble,
}

impl PrimitiveKind {
    /// Every kind in report order.
    pub const ALL: [PrimitiveKind; 16] = [
        Self::Bool,
        Self::Char,
        Self::Char16,
        Self::Char32,
        Self::WChar,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::LongLong,
        Self::UShort,
        Self::UInt,
        Self::ULong,
        Self::ULongLong,
        Self::Float,
        Self::Double,
        Self::LongDouble,
    ];

    /// C++ spelling of the kind.
    #[must_use]
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Char16 => "char16_t",
            Self::Char32 => "char32_t",
            Self::WChar => "wchar_t",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::LongLong => "long long",
            Self::UShort => "unsigned short",
            Self::UInt => "unsigned int",
            Self::ULong => "unsigned long",
            Self::ULongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
        }
    }

    /// Storage size in bytes on the host platform.
    #[must_use]
    pub const fn size_bytes(self) -> usize {
        match self {
            Self::Bool => size_of::<bool>(),
            Self::Char => size_of::<c_char>(),
            // char16_t / char32_t are fixed-width by definition.
            Self::Char16 => size_of::<u16>(),
            Self::Char32 => size_of::<u32>(),
            Self::WChar => size_of::<libc::wchar_t>(),
            Self::Short => size_of::<c_short>(),
            Self::Int => size_of::<c_int>(),
            Self::Long => size_of::<c_long>(),
            Self::LongLong => size_of::<c_longlong>(),
            Self::UShort => size_of::<c_ushort>(),
            Self::UInt => size_of::<c_uint>(),
            Self::ULong => size_of::<c_ulong>(),
            Self::ULongLong => size_of::<c_ulonglong>(),
            Self::Float => size_of::<c_float>(),
            Self::Double => size_of::<c_double>(),
            Self::LongDouble => long_double_size(),
        }
    }
}

/// `sizeof(long double)` for the compilation target.
///
/// x87 extended precision is padded to 16 bytes on x86_64 SysV and 12 on
/// i386 SysV; AArch64/RISC-V/PowerPC Linux use IEEE binary128. MSVC and
/// Apple AArch64 alias it to `double`.
#[must_use]
pub const fn long_double_size() -> usize {
    if cfg!(target_env = "msvc") || cfg!(all(target_arch = "aarch64", target_vendor = "apple")) {
        8
    } else if cfg!(target_arch = "x86_64")
        || cfg!(target_arch = "aarch64")
        || cfg!(target_arch = "riscv64")
        || cfg!(target_arch = "powerpc64")
        || cfg!(target_arch = "s390x")
    {
        16
    } else if cfg!(target_arch = "x86") {
        12
    } else {
        size_of::<c_double>()
    }
}

/// One line of the size report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSize {
    pub kind: PrimitiveKind,
    pub bytes: usize,
}

/// Sizes of every kind in report order.
#[must_use]
pub fn size_report() -> Vec<TypeSize> {
    PrimitiveKind::ALL
        .iter()
        .map(|&kind| TypeSize {
            kind,
            bytes: kind.size_bytes(),
        })
        .collect()
}

/// Write `size of <name> = <n> bytes`, one line per kind.
pub fn write_size_report<W: Write>(out: &mut W) -> io::Result<()> {
    for entry in size_report() {
        writeln!(
            out,
            "size of {} = {} bytes",
            entry.kind.c_name(),
            entry.bytes
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Fixed-size arrays
// ---------------------------------------------------------------------------

/// A fixed-size array declaration: `element name[len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayLayout {
    pub name: &'static str,
    pub element: PrimitiveKind,
    pub len: usize,
}

impl ArrayLayout {
    #[must_use]
    pub const fn new(name: &'static str, element: PrimitiveKind, len: usize) -> Self {
        Self { name, element, len }
    }

    /// Total storage; arrays are contiguous with no padding between elements.
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        self.element.size_bytes() * self.len
    }
}

const DAYS_IN_YEAR: usize = 365;

/// The array declarations used by the report.
#[must_use]
pub fn demo_array_layouts() -> [ArrayLayout; 3] {
    [
        ArrayLayout::new("test_scores", PrimitiveKind::Int, 5),
        ArrayLayout::new("high_score_per_level", PrimitiveKind::Int, 10),
        ArrayLayout::new("hi_temp", PrimitiveKind::Double, DAYS_IN_YEAR),
    ]
}

/// Write `<name>: <len> x <type> = <bytes> bytes` for each layout.
pub fn write_array_report<W: Write>(out: &mut W, layouts: &[ArrayLayout]) -> io::Result<()> {
    for layout in layouts {
        writeln!(
            out,
            "{}: {} x {} = {} bytes",
            layout.name,
            layout.len,
            layout.element.c_name(),
            layout.size_bytes()
        )?;
    }
    Ok(())
}
