//! Stream formatting engine.
//!
//! [`FormatState`] is the explicit form of an output stream's formatting
//! flags. It is passed by reference to every render call. Each field has a
//! fixed reset rule, queryable through [`FormatField::persistence`]:
//!
//! | Field | Rule |
//! |---|---|
//! | width | single use: consumed by the next rendered value |
//! | everything else | persistent until changed or reset |
//!
//! Numbers are rendered as `sign + base prefix + digits`, then padded to the
//! field width. Internal alignment places the fill between the prefix and
//! the digits.
//!
//! Rounding is round-to-nearest on the exact binary value with ties to even,
//! which is what `core::fmt` does for `{:.N}` and `{:.Ne}`.

/// Widest field honored; larger widths are clamped.
pub const MAX_WIDTH: usize = 4096;

/// Largest precision honored. 1100 digits covers every exact `f64` expansion.
pub const MAX_PRECISION: usize = 1100;

/// Precision of a fresh state.
pub const DEFAULT_PRECISION: usize = 6;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Radix for integer output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base {
    #[default]
    Dec,
    Hex,
    Oct,
}

impl Base {
    /// Radix for reading and writing digits.
    #[must_use]
    pub const fn radix(self) -> u32 {
        match self {
            Self::Dec => 10,
            Self::Hex => 16,
            Self::Oct => 8,
        }
    }
}

/// Floating-point notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatNotation {
    /// Shortest form; precision counts significant digits.
    #[default]
    Default,
    /// Precision counts digits after the point.
    Fixed,
    /// `d.ddde+XX`; precision counts mantissa digits after the point.
    Scientific,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    Left,
    #[default]
    Right,
    /// Sign and base prefix flush left, digits flush right.
    Internal,
}

/// How long a setting lasts once made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Stays until explicitly changed or reset.
    Persistent,
    /// Applies to the next rendered value, then reverts to the default.
    SingleUse,
}

/// Addressable fields of a [`FormatState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatField {
    Base,
    ShowBase,
    Uppercase,
    ShowPos,
    BoolAlpha,
    Notation,
    Precision,
    ShowPoint,
    Width,
    Alignment,
    Fill,
}

impl FormatField {
    pub const ALL: [FormatField; 11] = [
        Self::Base,
        Self::ShowBase,
        Self::Uppercase,
        Self::ShowPos,
        Self::BoolAlpha,
        Self::Notation,
        Self::Precision,
        Self::ShowPoint,
        Self::Width,
        Self::Alignment,
        Self::Fill,
    ];

    #[must_use]
    pub const fn persistence(self) -> Persistence {
        match self {
            Self::Width => Persistence::SingleUse,
            _ => Persistence::Persistent,
        }
    }
}

/// Stream manipulators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Manip {
    Dec,
    Hex,
    Oct,
    ShowBase,
    NoShowBase,
    Uppercase,
    NoUppercase,
    ShowPos,
    NoShowPos,
    BoolAlpha,
    NoBoolAlpha,
    Fixed,
    Scientific,
    DefaultFloat,
    ShowPoint,
    NoShowPoint,
    Left,
    Right,
    Internal,
    SetW(usize),
    SetFill(char),
    SetPrecision(usize),
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A value ready to be rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    /// Signed integer with its bit width, needed for hex/octal of negatives.
    Signed { value: i64, bits: u32 },
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
    Char(char),
}

macro_rules! signed_arg {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::Signed { value: v as i64, bits: <$t>::BITS }
            }
        }
    )*};
}

macro_rules! unsigned_arg {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::Unsigned(v as u64)
            }
        }
    )*};
}

signed_arg!(i8, i16, i32, i64, isize);
unsigned_arg!(u8, u16, u32, u64, usize);

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        FormatArg::Float(v)
    }
}

impl From<f32> for FormatArg<'_> {
    fn from(v: f32) -> Self {
        FormatArg::Float(f64::from(v))
    }
}

impl From<bool> for FormatArg<'_> {
    fn from(v: bool) -> Self {
        FormatArg::Bool(v)
    }
}

impl From<char> for FormatArg<'_> {
    fn from(v: char) -> Self {
        FormatArg::Char(v)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(v: &'a str) -> Self {
        FormatArg::Str(v)
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(v: &'a String) -> Self {
        FormatArg::Str(v.as_str())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Formatting configuration of one output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatState {
    base: Base,
    show_base: bool,
    uppercase: bool,
    show_pos: bool,
    bool_alpha: bool,
    notation: FloatNotation,
    precision: usize,
    show_point: bool,
    width: usize,
    alignment: Alignment,
    fill: char,
}

impl Default for FormatState {
    fn default() -> Self {
        Self {
            base: Base::Dec,
            show_base: false,
            uppercase: false,
            show_pos: false,
            bool_alpha: false,
            notation: FloatNotation::Default,
            precision: DEFAULT_PRECISION,
            show_point: false,
            width: 0,
            alignment: Alignment::Right,
            fill: ' ',
        }
    }
}

impl FormatState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a manipulator. Returns `self` so calls chain like `<<`.
    pub fn apply(&mut self, manip: Manip) -> &mut Self {
        match manip {
            Manip::Dec => self.base = Base::Dec,
            Manip::Hex => self.base = Base::Hex,
            Manip::Oct => self.base = Base::Oct,
            Manip::ShowBase => self.show_base = true,
            Manip::NoShowBase => self.show_base = false,
            Manip::Uppercase => self.uppercase = true,
            Manip::NoUppercase => self.uppercase = false,
            Manip::ShowPos => self.show_pos = true,
            Manip::NoShowPos => self.show_pos = false,
            Manip::BoolAlpha => self.bool_alpha = true,
            Manip::NoBoolAlpha => self.bool_alpha = false,
            Manip::Fixed => self.notation = FloatNotation::Fixed,
            Manip::Scientific => self.notation = FloatNotation::Scientific,
            Manip::DefaultFloat => self.notation = FloatNotation::Default,
            Manip::ShowPoint => self.show_point = true,
            Manip::NoShowPoint => self.show_point = false,
            Manip::Left => self.alignment = Alignment::Left,
            Manip::Right => self.alignment = Alignment::Right,
            Manip::Internal => self.alignment = Alignment::Internal,
            Manip::SetW(w) => self.set_width(w),
            Manip::SetFill(c) => self.fill = c,
            Manip::SetPrecision(p) => self.set_precision(p),
        }
        self
    }

    /// Restore one field to its default.
    pub fn reset(&mut self, field: FormatField) -> &mut Self {
        let d = Self::default();
        match field {
            FormatField::Base => self.base = d.base,
            FormatField::ShowBase => self.show_base = d.show_base,
            FormatField::Uppercase => self.uppercase = d.uppercase,
            FormatField::ShowPos => self.show_pos = d.show_pos,
            FormatField::BoolAlpha => self.bool_alpha = d.bool_alpha,
            FormatField::Notation => self.notation = d.notation,
            FormatField::Precision => self.precision = d.precision,
            FormatField::ShowPoint => self.show_point = d.show_point,
            FormatField::Width => self.width = d.width,
            FormatField::Alignment => self.alignment = d.alignment,
            FormatField::Fill => self.fill = d.fill,
        }
        self
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width.min(MAX_WIDTH);
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.min(MAX_PRECISION);
    }

    pub fn set_fill(&mut self, fill: char) {
        self.fill = fill;
    }

    #[must_use]
    pub fn base(&self) -> Base {
        self.base
    }

    #[must_use]
    pub fn notation(&self) -> FloatNotation {
        self.notation
    }

    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Width pending for the next value (0 = none).
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[must_use]
    pub fn fill(&self) -> char {
        self.fill
    }

    /// Render `arg` into `out`, consuming the pending width.
    pub fn render<'a>(&mut self, arg: impl Into<FormatArg<'a>>, out: &mut String) {
        let width = std::mem::take(&mut self.width);
        let piece = self.pieces(arg.into());
        self.pad(&piece, width, out);
    }

    /// Render `arg` to a fresh string, consuming the pending width.
    pub fn format<'a>(&mut self, arg: impl Into<FormatArg<'a>>) -> String {
        let mut out = String::new();
        self.render(arg, &mut out);
        out
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn pieces(&self, arg: FormatArg<'_>) -> Piece {
        match arg {
            FormatArg::Signed { value, bits } => {
                if self.base == Base::Dec {
                    self.integer(value < 0, value.unsigned_abs())
                } else {
                    self.integer(false, two_complement(value, bits))
                }
            }
            FormatArg::Unsigned(v) => self.integer(false, v),
            FormatArg::Float(v) => self.float(v),
            FormatArg::Bool(b) if self.bool_alpha => {
                Piece::text(if b { "true" } else { "false" }.to_string())
            }
            FormatArg::Bool(b) => self.integer(false, u64::from(b)),
            FormatArg::Str(s) => Piece::text(s.to_string()),
            FormatArg::Char(c) => Piece::text(c.to_string()),
        }
    }

    fn integer(&self, negative: bool, magnitude: u64) -> Piece {
        let mut prefix = String::new();
        let digits = match self.base {
            Base::Dec => {
                if negative {
                    prefix.push('-');
                } else if self.show_pos {
                    prefix.push('+');
                }
                magnitude.to_string()
            }
            Base::Hex => {
                if self.show_base && magnitude != 0 {
                    prefix.push_str(if self.uppercase { "0X" } else { "0x" });
                }
                if self.uppercase {
                    format!("{magnitude:X}")
                } else {
                    format!("{magnitude:x}")
                }
            }
            Base::Oct => {
                if self.show_base && magnitude != 0 {
                    prefix.push('0');
                }
                format!("{magnitude:o}")
            }
        };
        Piece {
            prefix,
            body: digits,
            numeric: true,
        }
    }

    fn float(&self, value: f64) -> Piece {
        let mut prefix = String::new();
        if value.is_sign_negative() && !value.is_nan() {
            prefix.push('-');
        } else if self.show_pos {
            prefix.push('+');
        }

        let abs = value.abs();
        let body = if value.is_nan() {
            self.cased("nan")
        } else if value.is_infinite() {
            self.cased("inf")
        } else {
            match self.notation {
                FloatNotation::Fixed => format_fixed(abs, self.precision, self.show_point),
                FloatNotation::Scientific => {
                    format_scientific(abs, self.precision, self.uppercase, self.show_point)
                }
                FloatNotation::Default => {
                    format_general(abs, self.precision, self.uppercase, self.show_point)
                }
            }
        };
        Piece {
            prefix,
            body,
            numeric: true,
        }
    }

    fn cased(&self, s: &str) -> String {
        if self.uppercase {
            s.to_ascii_uppercase()
        } else {
            s.to_string()
        }
    }

    fn pad(&self, piece: &Piece, width: usize, out: &mut String) {
        let len = piece.prefix.chars().count() + piece.body.chars().count();
        let fill_count = width.saturating_sub(len);
        let fill = self.fill;
        let push_fill = |out: &mut String| out.extend(std::iter::repeat_n(fill, fill_count));

        match self.alignment {
            Alignment::Left => {
                out.push_str(&piece.prefix);
                out.push_str(&piece.body);
                push_fill(out);
            }
            Alignment::Internal if piece.numeric => {
                out.push_str(&piece.prefix);
                push_fill(out);
                out.push_str(&piece.body);
            }
            Alignment::Right | Alignment::Internal => {
                push_fill(out);
                out.push_str(&piece.prefix);
                out.push_str(&piece.body);
            }
        }
    }
}

/// A value split into its sign/prefix part and its digits.
#[derive(Debug)]
struct Piece {
    prefix: String,
    body: String,
    numeric: bool,
}

impl Piece {
    fn text(body: String) -> Self {
        Self {
            prefix: String::new(),
            body,
            numeric: false,
        }
    }
}

/// Bit pattern of `value` at its own width.
fn two_complement(value: i64, bits: u32) -> u64 {
    let raw = value as u64;
    if bits >= 64 {
        raw
    } else {
        raw & ((1u64 << bits) - 1)
    }
}

// ---------------------------------------------------------------------------
// Float notations
// ---------------------------------------------------------------------------

fn format_fixed(value: f64, precision: usize, show_point: bool) -> String {
    let mut s = format!("{value:.precision$}");
    if show_point && precision == 0 {
        s.push('.');
    }
    s
}

fn format_scientific(value: f64, precision: usize, uppercase: bool, show_point: bool) -> String {
    let (mut mantissa, exp) = split_exp(value, precision);
    if show_point && precision == 0 {
        mantissa.push('.');
    }
    join_exp(&mantissa, exp, uppercase)
}

/// Shortest-form rule: `P` significant digits (0 counts as 1); scientific
/// when the decimal exponent after rounding is below -4 or at least `P`.
fn format_general(value: f64, precision: usize, uppercase: bool, show_point: bool) -> String {
    let p = precision.max(1);
    let (sci_mantissa, exp) = split_exp(value, p - 1);

    if exp >= -4 && exp < p as i32 {
        let frac = (p as i32 - 1 - exp) as usize;
        let mut s = format!("{value:.frac$}");
        if show_point {
            if !s.contains('.') {
                s.push('.');
            }
        } else {
            strip_trailing_zeros(&mut s);
        }
        s
    } else {
        let mut mantissa = sci_mantissa;
        if show_point {
            if !mantissa.contains('.') {
                mantissa.push('.');
            }
        } else {
            strip_trailing_zeros(&mut mantissa);
        }
        join_exp(&mantissa, exp, uppercase)
    }
}

/// Round to `precision` mantissa digits; returns the mantissa text and the
/// decimal exponent after rounding.
fn split_exp(value: f64, precision: usize) -> (String, i32) {
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn join_exp(mantissa: &str, exp: i32, uppercase: bool) -> String {
    let e = if uppercase { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

/// Remove trailing zeros after the decimal point, and the point itself.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(manips: &[Manip]) -> FormatState {
        let mut st = FormatState::new();
        for &m in manips {
            st.apply(m);
        }
        st
    }

    #[test]
    fn bool_numeric_and_alpha() {
        let mut st = FormatState::new();
        assert_eq!(st.format(10 == 10), "1");
        assert_eq!(st.format(10 == 20), "0");
        st.apply(Manip::BoolAlpha);
        assert_eq!(st.format(true), "true");
        assert_eq!(st.format(false), "false");
        st.reset(FormatField::BoolAlpha);
        assert_eq!(st.format(true), "1");
    }

    #[test]
    fn integer_bases() {
        let mut st = FormatState::new();
        assert_eq!(st.format(255), "255");
        st.apply(Manip::Hex);
        assert_eq!(st.format(255), "ff");
        st.apply(Manip::Oct);
        assert_eq!(st.format(255), "377");
    }

    #[test]
    fn integer_show_base() {
        let mut st = state(&[Manip::ShowBase]);
        assert_eq!(st.format(255), "255");
        st.apply(Manip::Hex);
        assert_eq!(st.format(255), "0xff");
        st.apply(Manip::Oct);
        assert_eq!(st.format(255), "0377");
        st.apply(Manip::Hex).apply(Manip::Uppercase);
        assert_eq!(st.format(255), "0XFF");
    }

    #[test]
    fn zero_has_no_base_prefix() {
        let mut st = state(&[Manip::ShowBase, Manip::Hex]);
        assert_eq!(st.format(0), "0");
        st.apply(Manip::Oct);
        assert_eq!(st.format(0u32), "0");
    }

    #[test]
    fn negative_hex_uses_own_width() {
        let mut st = state(&[Manip::Hex]);
        assert_eq!(st.format(-1i8), "ff");
        assert_eq!(st.format(-255i32), "ffffff01");
        assert_eq!(st.format(-1i64), "ffffffffffffffff");
    }

    #[test]
    fn show_pos_decimal_only() {
        let mut st = state(&[Manip::ShowPos]);
        assert_eq!(st.format(255), "+255");
        assert_eq!(st.format(-255), "-255");
        assert_eq!(st.format(0), "+0");
        st.apply(Manip::Hex);
        assert_eq!(st.format(255), "ff");
        st.reset(FormatField::Base).reset(FormatField::ShowPos);
        assert_eq!(st.format(255), "255");
    }

    #[test]
    fn i64_min_decimal() {
        let mut st = FormatState::new();
        assert_eq!(st.format(i64::MIN), "-9223372036854775808");
    }

    #[test]
    fn default_notation_precision_six() {
        let mut st = FormatState::new();
        assert_eq!(st.format(1234.5678), "1234.57");
        assert_eq!(st.format(123456789.987654321), "1.23457e+08");
        assert_eq!(st.format(0.0001234), "0.0001234");
        assert_eq!(st.format(0.00001234), "1.234e-05");
        assert_eq!(st.format(0.0), "0");
    }

    #[test]
    fn precision_rounds_significant_digits() {
        let mut st = state(&[Manip::SetPrecision(9)]);
        assert_eq!(st.format(123456789.987654321), "123456790");
    }

    #[test]
    fn fixed_precision() {
        let mut st = state(&[Manip::Fixed]);
        assert_eq!(st.format(123456789.987654321), "123456789.987654");
        st.apply(Manip::SetPrecision(3));
        assert_eq!(st.format(123456789.987654321), "123456789.988");
        st.apply(Manip::ShowPos);
        assert_eq!(st.format(123456789.987654321), "+123456789.988");
    }

    #[test]
    fn scientific_precision() {
        let mut st = state(&[Manip::Scientific, Manip::SetPrecision(3)]);
        assert_eq!(st.format(123456789.987654321), "1.235e+08");
        st.apply(Manip::Uppercase);
        assert_eq!(st.format(0.000123), "1.230E-04");
    }

    #[test]
    fn show_point_keeps_trailing_zeros() {
        let mut st = FormatState::new();
        assert_eq!(st.format(12.34), "12.34");
        st.apply(Manip::ShowPoint);
        assert_eq!(st.format(12.34), "12.3400");
        st.apply(Manip::SetPrecision(2));
        assert_eq!(st.format(12.0), "12.");
    }

    #[test]
    fn fixed_precision_zero_with_show_point() {
        let mut st = state(&[Manip::Fixed, Manip::SetPrecision(0)]);
        assert_eq!(st.format(2.25), "2");
        st.apply(Manip::ShowPoint);
        assert_eq!(st.format(7.0), "7.");
    }

    #[test]
    fn general_rounding_carries_into_exponent() {
        let mut st = FormatState::new();
        assert_eq!(st.format(9.9999996), "10");
        assert_eq!(st.format(999999.7), "1e+06");
    }

    #[test]
    fn non_finite_values() {
        let mut st = FormatState::new();
        assert_eq!(st.format(f64::NAN), "nan");
        assert_eq!(st.format(f64::NEG_INFINITY), "-inf");
        st.apply(Manip::Uppercase).apply(Manip::ShowPos);
        assert_eq!(st.format(f64::INFINITY), "+INF");
    }

    #[test]
    fn width_is_single_use() {
        let mut st = FormatState::new();
        st.apply(Manip::SetW(10));
        let mut out = String::new();
        st.render(1234.5678, &mut out);
        st.render("Hello", &mut out);
        assert_eq!(out, "   1234.57Hello");
        assert_eq!(st.width(), 0);
    }

    #[test]
    fn width_per_value() {
        let mut st = FormatState::new();
        let mut out = String::new();
        st.apply(Manip::SetW(10));
        st.render(1234.5678, &mut out);
        st.apply(Manip::SetW(10));
        st.render("Hello", &mut out);
        st.apply(Manip::SetW(10));
        st.render("Hello", &mut out);
        assert_eq!(out, "   1234.57     Hello     Hello");
    }

    #[test]
    fn left_alignment_persists() {
        let mut st = state(&[Manip::SetW(10), Manip::Left]);
        let mut out = String::new();
        st.render(1234.5678, &mut out);
        st.render("Hello", &mut out);
        assert_eq!(out, "1234.57   Hello");
        st.apply(Manip::SetW(7));
        assert_eq!(st.format("ab"), "ab     ");
        assert_eq!(st.alignment(), Alignment::Left);
    }

    #[test]
    fn fill_persists_across_writes() {
        let mut st = state(&[Manip::SetFill('*'), Manip::SetW(10)]);
        let mut out = String::new();
        st.render(1234.5678, &mut out);
        st.apply(Manip::SetFill('-')).apply(Manip::SetW(10));
        st.render("Hello", &mut out);
        st.apply(Manip::SetW(15));
        st.render("Hello", &mut out);
        assert_eq!(out, "***1234.57-----Hello----------Hello");
        assert_eq!(st.fill(), '-');
    }

    #[test]
    fn internal_alignment_pads_after_prefix() {
        let mut st = state(&[Manip::Internal, Manip::SetFill('0'), Manip::SetW(8)]);
        assert_eq!(st.format(-42), "-0000042");
        st.apply(Manip::Hex).apply(Manip::ShowBase).apply(Manip::SetW(8));
        assert_eq!(st.format(255), "0x0000ff");
        st.apply(Manip::SetW(6));
        assert_eq!(st.format("ab"), "0000ab");
    }

    #[test]
    fn content_wider_than_field_is_not_truncated() {
        let mut st = state(&[Manip::SetW(3)]);
        assert_eq!(st.format("Hello"), "Hello");
    }

    #[test]
    fn rendering_is_idempotent_under_same_state() {
        let mut st = state(&[Manip::Scientific, Manip::SetPrecision(4), Manip::ShowPos]);
        let a = st.format(3.14159);
        let b = st.format(3.14159);
        assert_eq!(a, b);
        assert_eq!(a, "+3.1416e+00");
    }

    #[test]
    fn width_and_precision_are_clamped() {
        let mut st = FormatState::new();
        st.set_width(usize::MAX);
        assert_eq!(st.width(), MAX_WIDTH);
        st.set_precision(usize::MAX);
        assert_eq!(st.precision(), MAX_PRECISION);
    }

    #[test]
    fn only_width_is_single_use() {
        for field in FormatField::ALL {
            let expected = if field == FormatField::Width {
                Persistence::SingleUse
            } else {
                Persistence::Persistent
            };
            assert_eq!(field.persistence(), expected, "{field:?}");
        }
    }

    #[test]
    fn reset_restores_defaults() {
        let mut st = state(&[
            Manip::Hex,
            Manip::ShowBase,
            Manip::Uppercase,
            Manip::ShowPos,
            Manip::Scientific,
            Manip::Left,
            Manip::SetFill('#'),
            Manip::SetPrecision(2),
        ]);
        for field in FormatField::ALL {
            st.reset(field);
        }
        assert_eq!(st, FormatState::default());
    }

    #[test]
    fn chars_and_strings_take_width() {
        let mut st = state(&[Manip::SetW(3)]);
        assert_eq!(st.format('x'), "  x");
        let owned = String::from("yz");
        st.apply(Manip::SetW(4));
        assert_eq!(st.format(&owned), "  yz");
    }
}
