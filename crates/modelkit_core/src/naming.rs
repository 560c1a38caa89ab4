//! Collection naming.

/// Words that keep their form in the plural.
const UNCOUNTABLE: &[&str] = &[
    "advice",
    "energy",
    "excretion",
    "digestion",
    "cooperation",
    "health",
    "justice",
    "labour",
    "machinery",
    "equipment",
    "information",
    "pollution",
    "sewage",
    "paper",
    "money",
    "species",
    "series",
    "rain",
    "rice",
    "fish",
    "sheep",
    "moose",
    "deer",
    "news",
    "expertise",
    "status",
    "media",
];

/// Irregular endings, tried in order: `(suffix, letters dropped, tail)`.
const IRREGULAR: &[(&str, usize, &str)] = &[
    ("man", 2, "en"),
    ("person", 4, "ople"),
    ("child", 0, "ren"),
    ("axis", 2, "es"),
    ("testis", 2, "es"),
    ("octopus", 2, "i"),
    ("virus", 2, "i"),
    ("alias", 0, "es"),
    ("bus", 0, "es"),
    ("buffalo", 0, "es"),
    ("tomato", 0, "es"),
    ("potato", 0, "es"),
    ("tum", 2, "a"),
    ("ium", 2, "a"),
    ("sis", 2, "es"),
];

/// Derives a collection name from a model name: lower-cased and pluralised
/// with the same English rules as mongoose.
///
/// Uncountable words (`news`, `status`, `sheep`, ...) and words that already
/// end in `s` or a non-letter are kept as they are.
///
/// ```
/// use modelkit_core::collection_name;
///
/// assert_eq!(collection_name("User"), "users");
/// assert_eq!(collection_name("Category"), "categories");
/// assert_eq!(collection_name("Bus"), "buses");
/// ```
pub fn collection_name(model: &str) -> String {
    let lower = model.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return lower;
    }
    if lower == "ox" {
        return "oxen".to_string();
    }

    let irregular = IRREGULAR.iter().find_map(|(suffix, cut, tail)| {
        lower
            .ends_with(suffix)
            .then(|| format!("{}{tail}", &lower[..lower.len() - cut]))
    });
    irregular.unwrap_or_else(|| regular_plural(&lower))
}

fn regular_plural(word: &str) -> String {
    let last_is = |stem: &str, pred: fn(char) -> bool| stem.chars().last().is_some_and(pred);

    if let Some(stem) = word.strip_suffix("fe") {
        if last_is(stem, |c| c != 'f') {
            return format!("{stem}ves");
        }
    }
    if let Some(stem) = word.strip_suffix('f') {
        if last_is(stem, |c| matches!(c, 'l' | 'r')) {
            return format!("{stem}ves");
        }
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.ends_with("qu") || last_is(stem, |c| !"aeiouy".contains(c)) {
            return format!("{stem}ies");
        }
    }
    if ["x", "ch", "ss", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix("ouse") {
        if last_is(stem, |c| matches!(c, 'm' | 'l')) {
            return format!("{stem}ice");
        }
    }
    if word.ends_with("quiz") {
        return format!("{word}zes");
    }
    if word.ends_with('s') || last_is(word, |c| !c.is_ascii_lowercase()) {
        return word.to_string();
    }
    format!("{word}s")
}
