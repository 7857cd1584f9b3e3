//! The numbered format table.
//!
//! Workbooks refer to formats by id: ids below 164 are implied by the file
//! format, the rest travel in the file. The builtin entries here include the
//! long-standing fixups (ids 14, 22, 37-40 and 47 differ from the literal
//! ECMA-376 text to match what spreadsheet applications actually display).

use std::collections::HashMap;

/// Ids at or above this are custom formats in most producers.
const LOAD_SCAN_MAX: u32 = 0x188;

pub(crate) fn builtin(id: u32) -> Option<&'static str> {
    Some(match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "m/d/yyyy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yyyy h:mm",
        37 => "#,##0_);(#,##0)",
        38 => "#,##0_);[Red](#,##0)",
        39 => "#,##0.00_);(#,##0.00)",
        40 => "#,##0.00_);[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mm:ss.0",
        48 => "##0.0E+0",
        49 => "@",
        56 => "\"上午/下午 \"hh\"時\"mm\"分\"ss\"秒 \"",
        _ => return None,
    })
}

/// Ids that alias another table entry.
fn default_map(id: u32) -> Option<u32> {
    Some(match id {
        5..=8 => id + 32,
        23..=26 => 0,
        27..=31 => 14,
        50..=58 => 14,
        59..=62 => id - 58,
        67..=68 => id - 57,
        72..=75 => id - 58,
        76..=78 => id - 56,
        79..=81 => id - 34,
        _ => return None,
    })
}

/// Ids with a fixed format string that is not part of the main table.
fn default_str(id: u32) -> Option<&'static str> {
    Some(match id {
        5 | 63 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 | 64 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 | 65 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 | 66 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        41 => "_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)",
        42 => "_(\"$\"* #,##0_);_(\"$\"* (#,##0);_(\"$\"* \"-\"_);_(@_)",
        43 => "_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)",
        44 => "_(\"$\"* #,##0.00_);_(\"$\"* (#,##0.00);_(\"$\"* \"-\"??_);_(@_)",
        _ => return None,
    })
}

/// A format table: the builtins plus whatever the workbook defined.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    custom: HashMap<u32, String>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, id: u32) -> Option<&str> {
        self.custom
            .get(&id)
            .map(String::as_str)
            .or_else(|| builtin(id))
    }

    /// The format string a given id renders with, following alias chains.
    pub fn resolve(&self, id: u32) -> &str {
        if let Some(f) = self.lookup(id) {
            return f;
        }
        if let Some(f) = default_map(id).and_then(|d| self.lookup(d)) {
            return f;
        }
        if let Some(f) = default_str(id) {
            return f;
        }
        "General"
    }

    /// Store a format at an explicit id.
    pub fn insert(&mut self, id: u32, fmt: impl Into<String>) {
        self.custom.insert(id, fmt.into());
    }

    /// Store a format, reusing an existing id with the same text when there
    /// is one, otherwise taking the first free slot.
    pub fn load(&mut self, fmt: &str) -> u32 {
        for id in 0..LOAD_SCAN_MAX {
            match self.lookup(id) {
                Some(existing) if existing == fmt => return id,
                Some(_) => continue,
                None => {
                    self.custom.insert(id, fmt.to_string());
                    return id;
                }
            }
        }
        let id = LOAD_SCAN_MAX - 1;
        self.custom.insert(id, fmt.to_string());
        id
    }

    /// Bulk-load a workbook's format table.
    pub fn load_table(&mut self, table: &HashMap<u32, String>) {
        for (&id, fmt) in table {
            self.custom.insert(id, fmt.clone());
        }
    }

    /// The effective table: builtins overlaid with custom entries.
    pub fn entries(&self) -> HashMap<u32, String> {
        let mut out = HashMap::new();
        for id in 0..LOAD_SCAN_MAX {
            if let Some(f) = builtin(id) {
                out.insert(id, f.to_string());
            }
        }
        for (&id, fmt) in &self.custom {
            out.insert(id, fmt.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve() {
        let t = FormatTable::new();
        assert_eq!(t.resolve(0), "General");
        assert_eq!(t.resolve(14), "m/d/yyyy");
        assert_eq!(t.resolve(49), "@");
    }

    #[test]
    fn alias_chains() {
        let t = FormatTable::new();
        assert_eq!(t.resolve(5), t.resolve(37));
        assert_eq!(t.resolve(30), "m/d/yyyy");
        assert_eq!(t.resolve(59), "0");
        assert_eq!(t.resolve(67), "0.00%");
        assert_eq!(t.resolve(81), "mm:ss.0");
    }

    #[test]
    fn accounting_defaults() {
        let t = FormatTable::new();
        assert!(t.resolve(44).contains("\"$\"*"));
    }

    #[test]
    fn custom_entries_shadow_aliases() {
        let mut t = FormatTable::new();
        t.insert(5, "0.0");
        assert_eq!(t.resolve(5), "0.0");
    }

    #[test]
    fn load_reuses_equal_formats() {
        let mut t = FormatTable::new();
        assert_eq!(t.load("General"), 0);
        assert_eq!(t.load("0.00"), 2);
        let id = t.load("0.000");
        assert!(!(0..5).contains(&id));
        assert_eq!(t.load("0.000"), id);
        assert_eq!(t.resolve(id), "0.000");
    }

    #[test]
    fn unknown_ids_fall_back_to_general() {
        let t = FormatTable::new();
        assert_eq!(t.resolve(200), "General");
    }
}
