//! String similarity and font-name normalization.

/// Levenshtein edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `(longerLen - editDistance) / longerLen`, 1.0 for two empty strings.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    (longer - levenshtein(a, b)) as f64 / longer as f64
}

/// First family of a font stack, unquoted and lower-cased.
///
/// `"'Inter', Helvetica, sans-serif"` becomes `"inter"`.
pub fn normalize_font_family(family: &str) -> String {
    family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

/// Map named weights to their numeric value (`"Bold"` becomes `"700"`).
///
/// Numeric strings are returned trimmed; unknown names pass through unchanged.
pub fn normalize_font_weight(weight: &str) -> String {
    let trimmed = weight.trim();
    if trimmed.parse::<f64>().is_ok() {
        return trimmed.to_string();
    }
    let key: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let numeric = match key.as_str() {
        "thin" | "hairline" => "100",
        "extralight" | "ultralight" => "200",
        "light" => "300",
        "normal" | "regular" | "book" => "400",
        "medium" => "500",
        "semibold" | "demibold" => "600",
        "bold" => "700",
        "extrabold" | "ultrabold" => "800",
        "black" | "heavy" => "900",
        _ => return weight.to_string(),
    };
    numeric.to_string()
}

/// Numeric font weight, if the input is numeric or a known name.
pub fn font_weight_value(weight: &str) -> Option<f64> {
    normalize_font_weight(weight).trim().parse().ok()
}

/// CSS generic font family buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

const SERIF: &[&str] = &[
    "times", "georgia", "garamond", "merriweather", "playfair", "baskerville", "cambria",
];
const SANS_SERIF: &[&str] = &[
    "arial", "helvetica", "inter", "roboto", "open sans", "lato", "verdana", "segoe ui",
    "sf pro", "system-ui", "-apple-system", "montserrat", "nunito", "poppins",
];
const MONOSPACE: &[&str] = &[
    "courier", "consolas", "menlo", "monaco", "fira code", "jetbrains mono", "sf mono",
    "source code pro",
];
const CURSIVE: &[&str] = &["comic sans", "brush script", "pacifico"];
const FANTASY: &[&str] = &["impact", "papyrus"];

/// Generic bucket of a font stack: an explicit generic keyword anywhere in the
/// stack wins, otherwise the first family is looked up by name.
pub fn generic_family(stack: &str) -> Option<GenericFamily> {
    let families: Vec<String> = stack
        .split(',')
        .map(|f| {
            f.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_lowercase()
        })
        .filter(|f| !f.is_empty())
        .collect();

    for family in &families {
        let generic = match family.as_str() {
            "serif" => Some(GenericFamily::Serif),
            "sans-serif" => Some(GenericFamily::SansSerif),
            "monospace" => Some(GenericFamily::Monospace),
            "cursive" => Some(GenericFamily::Cursive),
            "fantasy" => Some(GenericFamily::Fantasy),
            _ => None,
        };
        if generic.is_some() {
            return generic;
        }
    }

    let first = families.first()?;
    let table: [(&[&str], GenericFamily); 5] = [
        (MONOSPACE, GenericFamily::Monospace),
        (SANS_SERIF, GenericFamily::SansSerif),
        (SERIF, GenericFamily::Serif),
        (CURSIVE, GenericFamily::Cursive),
        (FANTASY, GenericFamily::Fantasy),
    ];
    table
        .iter()
        .find(|(names, _)| names.iter().any(|n| first.contains(n)))
        .map(|(_, bucket)| *bucket)
}
