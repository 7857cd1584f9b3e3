//! The `General` format: magnitude-driven notation and width fitting.

use cellfmt::{Align, Formatter, RenderOptions, Value};

fn gen(v: f64) -> String {
    Formatter::default().format("General", v)
}

#[test]
fn integers_pass_through() {
    assert_eq!(gen(0.0), "0");
    assert_eq!(gen(1.0), "1");
    assert_eq!(gen(-42.0), "-42");
    assert_eq!(gen(2147483647.0), "2147483647");
}

#[test]
fn short_decimals_keep_their_digits() {
    assert_eq!(gen(1.5), "1.5");
    assert_eq!(gen(1234.56), "1234.56");
    assert_eq!(gen(-0.5), "-0.5");
    assert_eq!(gen(0.1), "0.1");
}

#[test]
fn tiny_values_keep_eleven_characters() {
    assert_eq!(gen(0.000012345), "0.000012345");
}

#[test]
fn huge_values_go_exponential() {
    assert_eq!(gen(123456789012.0), "1.23457E+11");
    assert_eq!(gen(12345678901.0), "12345678901");
}

#[test]
fn width_narrows_the_precision() {
    let f = Formatter::default();
    let w = RenderOptions::width(5);
    assert_eq!(f.format_with("General", 0.5, &w), "  0.5");
    assert_eq!(f.format_with("General", 123.0, &w), "  123");
}

#[test]
fn text_aligns_left_numbers_right() {
    let f = Formatter::default();
    let w = RenderOptions::width(6);
    assert_eq!(f.format_with("General", "ab", &w), "ab    ");
    assert_eq!(f.format_with("General", 12.0, &w), "    12");
}

#[test]
fn booleans_center() {
    let f = Formatter::default();
    assert_eq!(f.format("General", true), "TRUE");
    assert_eq!(f.format("General", false), "FALSE");
    let w = RenderOptions::width(8);
    assert_eq!(f.format_with("General", true, &w), "  TRUE  ");
}

#[test]
fn narrow_booleans_pound_out() {
    let f = Formatter::default();
    let w = RenderOptions::width(3);
    assert_eq!(f.format_with("General", true, &w), "###");
}

#[test]
fn empty_values_render_blank() {
    let f = Formatter::default();
    assert_eq!(f.format("General", ()), "");
    assert_eq!(
        f.format_with("General", Value::Empty, &RenderOptions::width(4)),
        "    "
    );
}

#[test]
fn explicit_alignment_overrides_the_default() {
    let f = Formatter::default();
    let opts = RenderOptions {
        width: Some(6),
        align: Some(Align::Left),
        ..RenderOptions::default()
    };
    assert_eq!(f.format_with("General", 12.0, &opts), "12    ");
}

#[test]
fn general_mixes_with_literals() {
    let f = Formatter::default();
    assert_eq!(f.format("\"= \"General", 7.0), "= 7");
    // A section that merely starts with General is still General.
    assert_eq!(f.format("General\" units\"", 7.0), "7");
}
