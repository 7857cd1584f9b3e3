//! Numeric format codes: placeholders, grouping, percent, scientific,
//! fractions and the special digit-grid formats.

use cellfmt::Formatter;

fn fmt(code: &str, v: f64) -> String {
    Formatter::default().format(code, v)
}

#[test]
fn zero_placeholders_round_and_pad() {
    assert_eq!(fmt("0", 0.0), "0");
    assert_eq!(fmt("0", 1234.5), "1235");
    assert_eq!(fmt("0", -42.0), "-42");
    assert_eq!(fmt("00000", 1234.0), "01234");
    assert_eq!(fmt("0.00", 1.0), "1.00");
    assert_eq!(fmt("0.00", 1234.567), "1234.57");
}

#[test]
fn hash_placeholders_print_nothing_for_zero() {
    assert_eq!(fmt("#", 0.0), "");
    assert_eq!(fmt("#", 42.0), "42");
    // The zeros behind the hashes fix the minimum width.
    assert_eq!(fmt("#0", 5.0), "5");
    assert_eq!(fmt("##00", 5.0), "05");
}

#[test]
fn question_marks_pad_with_spaces() {
    assert_eq!(fmt("??", 5.0), " 5");
    assert_eq!(fmt("???", 123.0), "123");
}

#[test]
fn thousands_grouping() {
    assert_eq!(fmt("#,##0", 999.0), "999");
    assert_eq!(fmt("#,##0", 1000.0), "1,000");
    assert_eq!(fmt("#,##0", 1234567.0), "1,234,567");
    assert_eq!(fmt("#,##0.00", -1234.5), "-1,234.50");
}

#[test]
fn trailing_commas_scale_by_thousands() {
    assert_eq!(fmt("#,##0,", 12000.0), "12");
    assert_eq!(fmt("#,##0,,", 12345678.0), "12");
    assert_eq!(fmt("0.0,", 12345.0), "12.3");
}

#[test]
fn percent_multiplies_by_hundred() {
    assert_eq!(fmt("0%", 0.5), "50%");
    assert_eq!(fmt("0.0%", -0.05), "-5.0%");
    assert_eq!(fmt("0.00%", 1.0), "100.00%");
}

#[test]
fn scientific_widens_the_exponent() {
    assert_eq!(fmt("0.00E+00", 12345.0), "1.23E+04");
    assert_eq!(fmt("0.00E+00", 0.00123), "1.23E-03");
}

#[test]
fn bare_fractions() {
    assert_eq!(fmt("?/?", 0.25), "1/4");
    assert_eq!(fmt("# ?/?", 5.25), "5 1/4");
    assert_eq!(fmt("# ?/12", 0.25), " 3/12");
}

#[test]
fn whole_values_blank_the_fraction() {
    assert_eq!(fmt("# ?/?", 3.0), "3    ");
}

#[test]
fn no_leading_zero_without_one_in_the_code() {
    assert_eq!(fmt("#.##", 0.5), ".5");
    assert_eq!(fmt("0.##", 0.5), "0.5");
}

#[test]
fn phone_and_zip_grids() {
    assert_eq!(fmt("(###) ###-####", 8005551212.0), "(800) 555-1212");
    assert_eq!(fmt("00000-0000", 941041234.0), "94104-1234");
}

#[test]
fn negative_sections_eat_the_sign() {
    assert_eq!(fmt("0.0;(0.0)", -2.0), "(2.0)");
    assert_eq!(fmt("#,##0_);[Red](#,##0)", -1234.0), "(1,234)");
    assert_eq!(fmt("0;-0;\"zero\"", 0.0), "zero");
    // Bare words survive as text even without quoting.
    assert_eq!(fmt("0;-0;ZERO", 0.0), "ZERO");
}

#[test]
fn currency_symbol_ahead_of_the_sign() {
    assert_eq!(fmt("\"$\"#,##0.00", 1234.5), "$1,234.50");
    assert_eq!(fmt("\"$\"#,##0.00", -1234.5), "-$1,234.50");
}

#[test]
fn conditional_sections_route_by_value() {
    let code = "[>=100]0.0;[<100]0.00";
    assert_eq!(fmt(code, 150.0), "150.0");
    assert_eq!(fmt(code, 50.0), "50.00");
    assert_eq!(fmt(code, -5.0), "-5.00");
}

#[test]
fn builtin_ids() {
    let f = Formatter::default();
    assert_eq!(f.format(1u32, 1234.5), "1235");
    assert_eq!(f.format(2u32, 1234.567), "1234.57");
    assert_eq!(f.format(3u32, 1234567.0), "1,234,567");
    assert_eq!(f.format(4u32, -1000.5), "-1,000.50");
    assert_eq!(f.format(9u32, 0.5), "50%");
    assert_eq!(f.format(11u32, 12345.0), "1.23E+04");
    assert_eq!(f.format(12u32, 5.25), "5 1/4");
}
