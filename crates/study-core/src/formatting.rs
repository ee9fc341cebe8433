/// Capitalise a category name for display: first character upper-case, the
/// rest lower-case.
///
/// # Examples
///
/// ```
/// use study_core::formatting::capitalize;
///
/// assert_eq!(capitalize("BOOK FICTION P/BACK TOP 10"), "Book fiction p/back top 10");
/// assert_eq!(capitalize("CPI"), "Cpi");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Format a ratio as a whole-number percentage.
///
/// # Examples
///
/// ```
/// use study_core::formatting::format_percent;
///
/// assert_eq!(format_percent(1.0, 0), "100%");
/// assert_eq!(format_percent(0.854, 1), "85.4%");
/// assert_eq!(format_percent(-0.05, 0), "-5%");
/// ```
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    let value = ratio * 100.0;
    // Avoid printing "-0%" for tiny negatives that round to zero.
    let value = if value.abs() < 0.5 * 10_f64.powi(-(decimals as i32)) {
        0.0
    } else {
        value
    };
    format!("{:.prec$}%", value, prec = decimals)
}

/// Format a ratio as a percentage with an explicit sign.
///
/// # Examples
///
/// ```
/// use study_core::formatting::format_signed_percent;
///
/// assert_eq!(format_signed_percent(0.0512, 1), "+5.1%");
/// assert_eq!(format_signed_percent(-0.2, 1), "-20.0%");
/// assert_eq!(format_signed_percent(0.0, 1), "0.0%");
/// ```
pub fn format_signed_percent(ratio: f64, decimals: usize) -> String {
    let formatted = format_percent(ratio, decimals);
    if ratio > 0.0 && !formatted.starts_with('-') && formatted.trim_start_matches(['0', '.']) != "%" {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

/// Turn a category name into a spreadsheet-friendly row label: commas are
/// removed and spaces become underscores.
///
/// # Examples
///
/// ```
/// use study_core::formatting::export_label;
///
/// assert_eq!(export_label("BOOK FICTION P/BACK TOP 10"), "BOOK_FICTION_P/BACK_TOP_10");
/// assert_eq!(export_label("BOOKS, NEW"), "BOOKS_NEW");
/// ```
pub fn export_label(label: &str) -> String {
    label.replace(',', "").replace(' ', "_")
}

/// Format a p-value compactly, switching to scientific notation for very
/// small values.
///
/// # Examples
///
/// ```
/// use study_core::formatting::format_p_value;
///
/// assert_eq!(format_p_value(0.0421), "0.0421");
/// assert_eq!(format_p_value(0.00001234), "1.234e-5");
/// ```
pub fn format_p_value(p: f64) -> String {
    if p != 0.0 && p.abs() < 1e-4 {
        format!("{:.3e}", p)
    } else {
        format!("{:.4}", p)
    }
}
