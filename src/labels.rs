//! Display formatting for league/club codes and money. Presentation-only:
//! nothing in the aggregation engine depends on this module.

/// "premier-league" -> "Premier League", "fc_barcelona" -> "Fc Barcelona".
pub fn title_label(code: &str) -> String {
    code.split(|c| c == '-' || c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Millions of euros with a sign and thousands separators, e.g. "-1,020 M€".
pub fn format_mil(value: f64) -> String {
    let rounded = value.round() as i64;
    format!("{} M€", group_thousands(rounded))
}

/// Raw euro amounts shown in billions, e.g. "10.54 Bil€".
pub fn format_bil(value: f64) -> String {
    format!("{:.2} Bil€", value / 1_000_000_000.0)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}
