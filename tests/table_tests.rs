//! The numbered format table and the category-to-code builder.

use std::collections::HashMap;

use cellfmt::{CategorySpec, FormatError, Formatter};

#[test]
fn builtin_ids_resolve() {
    let f = Formatter::default();
    assert_eq!(f.format_code(0), "General");
    assert_eq!(f.format_code(14), "m/d/yyyy");
    assert_eq!(f.format_code(49), "@");
    assert_eq!(f.format_code(44), "_(\"$\"* #,##0.00_);_(\"$\"* (#,##0.00);_(\"$\"* \"-\"??_);_(@_)");
}

#[test]
fn unknown_ids_render_as_general() {
    let f = Formatter::default();
    assert_eq!(f.format(250u32, 1234.0), "1234");
}

#[test]
fn load_reuses_and_allocates() {
    let mut f = Formatter::default();
    assert_eq!(f.load_format("General"), 0);
    assert_eq!(f.load_format("0.00"), 2);
    let id = f.load_format("0.000");
    assert_eq!(f.load_format("0.000"), id);
    assert_eq!(f.format_code(id), "0.000");
    assert_eq!(f.format(id, 1.5), "1.500");
}

#[test]
fn load_table_overlays_the_builtins() {
    let mut f = Formatter::default();
    let mut table = HashMap::new();
    table.insert(164u32, "yyyy".to_string());
    table.insert(14u32, "dd.mm.yyyy".to_string());
    f.load_table(&table);
    assert_eq!(f.format(164u32, 43_880.0), "2020");
    assert_eq!(f.format(14u32, 43_880.0), "19.02.2020");
    let entries = f.get_table();
    assert_eq!(entries.get(&164).map(String::as_str), Some("yyyy"));
    assert_eq!(entries.get(&49).map(String::as_str), Some("@"));
}

#[test]
fn insert_shadows_a_builtin() {
    let mut f = Formatter::default();
    f.insert_format(2, "0.0");
    assert_eq!(f.format(2u32, 1.25), "1.3");
}

#[test]
fn number_category_variants() {
    let f = Formatter::default();
    let mut spec = CategorySpec::default();
    assert_eq!(f.get_format("Number", &spec).unwrap(), "0.00");
    spec.places = Some(0);
    spec.thousands = true;
    assert_eq!(f.get_format("Number", &spec).unwrap(), "#,##0");
    spec.red_negative = true;
    assert_eq!(f.get_format("Number", &spec).unwrap(), "#,##0;[Red]#,##0");
    spec.paren_negative = true;
    assert_eq!(
        f.get_format("Number", &spec).unwrap(),
        "#,##0_);[Red](#,##0)"
    );
}

#[test]
fn currency_and_accounting_match_the_builtin_table() {
    let f = Formatter::default();
    let spec = CategorySpec::default();
    assert_eq!(
        f.get_format("Currency", &spec).unwrap(),
        "\"$\"#,##0.00_);(\"$\"#,##0.00)"
    );
    assert_eq!(
        f.get_format("Accounting", &spec).unwrap(),
        "_(\"$\"* #,##0.00_);_(\"$\"* (#,##0.00);_(\"$\"* \"-\"??_);_(@_)"
    );
}

#[test]
fn date_time_and_text_categories() {
    let f = Formatter::default();
    let spec = CategorySpec::default();
    assert_eq!(f.get_format("Short Date", &spec).unwrap(), "m/dd/yyyy");
    assert_eq!(
        f.get_format("Long Date", &spec).unwrap(),
        "[$-F800]dddd, mmmm dd, yyyy"
    );
    assert_eq!(f.get_format("Time", &spec).unwrap(), "[$-F400]h:mm:ss AM/PM");
    assert_eq!(f.get_format("Text", &spec).unwrap(), "@");
    assert_eq!(f.get_format("anything else", &spec).unwrap(), "General");
}

#[test]
fn fraction_and_scientific_categories() {
    let f = Formatter::default();
    let mut spec = CategorySpec::default();
    assert_eq!(f.get_format("Fraction", &spec).unwrap(), "# ?/?");
    spec.denominator = Some(-2);
    assert_eq!(f.get_format("Fraction", &spec).unwrap(), "# ??/??");
    spec.denominator = Some(16);
    assert_eq!(f.get_format("Fraction", &spec).unwrap(), "# ??/16");
    spec.denominator = Some(0);
    assert!(matches!(
        f.get_format("Fraction", &spec),
        Err(FormatError::ZeroDenominator)
    ));
    spec = CategorySpec::default();
    assert_eq!(f.get_format("Scientific", &spec).unwrap(), "0.00E+00");
    spec.negative_exponent = true;
    spec.places = Some(3);
    assert_eq!(f.get_format("Scientific", &spec).unwrap(), "0.000E-00");
}

#[test]
fn category_titles_format_directly() {
    let f = Formatter::default();
    assert_eq!(f.format("Percentage", 0.5), "50.00%");
    assert_eq!(f.format("Short Date", 43_880.0), "2/19/2020");
    assert_eq!(f.format("Text", 42.0), "42");
}
