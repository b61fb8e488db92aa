//! The formatting walkthrough printed by `streamfmt tour`.
//!
//! Everything goes through one stream's formatting state, so settings made
//! in one section stay in effect until a later section changes or resets
//! them.

use streamfmt_core::StreamError;
use streamfmt_core::stdio::{FormatField, Manip, TextStream};

const NUM: i32 = 255;
const BIG: f64 = 123_456_789.987_654_321;
const SMALL: f64 = 1234.5678;
const TRAILING: f64 = 12.34;
const HELLO: &str = "Hello";

/// Render the walkthrough into a string.
pub fn tour_text() -> Result<String, StreamError> {
    let mut out = TextStream::memory();
    write_tour(&mut out)?;
    Ok(out.contents().unwrap_or_default())
}

/// Write the walkthrough to `out`.
pub fn write_tour(out: &mut TextStream) -> Result<(), StreamError> {
    booleans(out)?;
    integers(out)?;
    floats(out)?;
    fields(out)
}

fn heading(out: &mut TextStream, title: &str) -> Result<(), StreamError> {
    out.write_str("== ")?.write_str(title)?.write_str(" ==")?.end_line()?;
    Ok(())
}

fn booleans(out: &mut TextStream) -> Result<(), StreamError> {
    heading(out, "booleans")?;
    out.manip(Manip::NoBoolAlpha);
    out.write(10 == 10)?.end_line()?;
    out.write(10 == 20)?.end_line()?;
    out.manip(Manip::BoolAlpha);
    out.write(10 == 10)?.end_line()?;
    out.write(10 == 20)?.end_line()?;
    out.format_state_mut().reset(FormatField::BoolAlpha);
    Ok(())
}

fn integers(out: &mut TextStream) -> Result<(), StreamError> {
    heading(out, "integers")?;
    for base in [Manip::Dec, Manip::Hex, Manip::Oct] {
        out.manip(base).write(NUM)?.end_line()?;
    }

    out.manip(Manip::ShowBase);
    for base in [Manip::Dec, Manip::Hex, Manip::Oct] {
        out.manip(base).write(NUM)?.end_line()?;
    }
    out.manip(Manip::Uppercase).manip(Manip::Hex);
    out.write(NUM)?.end_line()?;
    out.manip(Manip::NoShowBase).manip(Manip::NoUppercase).manip(Manip::Dec);

    out.manip(Manip::ShowPos);
    out.write(NUM)?.end_line()?;
    out.write(-NUM)?.end_line()?;

    let fmt = out.format_state_mut();
    fmt.reset(FormatField::Base)
        .reset(FormatField::ShowBase)
        .reset(FormatField::ShowPos)
        .reset(FormatField::Uppercase);
    Ok(())
}

fn floats(out: &mut TextStream) -> Result<(), StreamError> {
    heading(out, "floating point")?;
    out.write(SMALL)?.end_line()?;
    out.write(BIG)?.end_line()?;

    out.manip(Manip::SetPrecision(9));
    out.write(BIG)?.end_line()?;
    out.manip(Manip::Fixed).manip(Manip::SetPrecision(6));
    out.write(BIG)?.end_line()?;
    out.manip(Manip::SetPrecision(3));
    out.write(BIG)?.end_line()?;
    out.manip(Manip::Scientific);
    out.write(BIG)?.end_line()?;
    out.manip(Manip::Fixed).manip(Manip::ShowPos);
    out.write(BIG)?.end_line()?;
    out.format_state_mut()
        .reset(FormatField::Notation)
        .reset(FormatField::ShowPos);

    out.manip(Manip::SetPrecision(6));
    out.write(TRAILING)?.end_line()?;
    out.manip(Manip::ShowPoint);
    out.write(TRAILING)?.end_line()?;
    out.format_state_mut().reset(FormatField::ShowPoint);
    Ok(())
}

fn fields(out: &mut TextStream) -> Result<(), StreamError> {
    heading(out, "width, alignment and fill")?;
    out.write(SMALL)?.end_line()?;
    out.write(HELLO)?.end_line()?;

    out.manip(Manip::SetW(10));
    out.write(SMALL)?.write(HELLO)?.end_line()?;

    out.manip(Manip::SetW(10)).write(SMALL)?;
    out.manip(Manip::SetW(10)).write(HELLO)?;
    out.manip(Manip::SetW(10)).write(HELLO)?.end_line()?;

    out.manip(Manip::SetW(10)).manip(Manip::Left);
    out.write(SMALL)?.write(HELLO)?.end_line()?;

    out.manip(Manip::SetW(10)).write(SMALL)?;
    out.manip(Manip::SetW(10)).manip(Manip::Right).write(HELLO)?;
    out.manip(Manip::SetW(15)).write(HELLO)?.end_line()?;

    out.manip(Manip::SetFill('-'));
    out.manip(Manip::SetW(10)).write(SMALL)?.write(HELLO)?.end_line()?;

    out.manip(Manip::SetFill('*')).manip(Manip::SetW(10)).write(SMALL)?;
    out.manip(Manip::SetFill('-')).manip(Manip::SetW(10)).write(HELLO)?;
    out.manip(Manip::SetW(15)).write(HELLO)?.end_line()?;

    out.manip(Manip::Internal).manip(Manip::SetFill('0'));
    out.manip(Manip::ShowPos).manip(Manip::SetW(10)).write(NUM)?.end_line()?;
    out.format_state_mut()
        .reset(FormatField::Alignment)
        .reset(FormatField::Fill)
        .reset(FormatField::ShowPos);
    Ok(())
}
