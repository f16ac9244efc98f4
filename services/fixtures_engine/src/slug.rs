use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const PAIR_SEPARATOR: &str = "-vs-";
pub const MIN_SLUG_LEN: usize = 2;
pub const MAX_SLUG_LEN: usize = 100;

static SLUG_GRAMMAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug grammar is a valid regex"));

/// Abbreviations, legal-suffix variants and historical slugs mapped to the
/// slug the site publishes pages under.
static SLUG_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("arsenal-fc", "arsenal"),
        ("the-arsenal", "arsenal"),
        ("villa", "aston-villa"),
        ("aston-villa-fc", "aston-villa"),
        ("afc-bournemouth", "bournemouth"),
        ("bournemouth-fc", "bournemouth"),
        ("brentford-fc", "brentford"),
        ("brighton", "brighton-hove-albion"),
        ("brighton-and-hove-albion", "brighton-hove-albion"),
        ("brighton-hove-albion-fc", "brighton-hove-albion"),
        ("chelsea-fc", "chelsea"),
        ("palace", "crystal-palace"),
        ("crystal-palace-fc", "crystal-palace"),
        ("everton-fc", "everton"),
        ("fulham-fc", "fulham"),
        ("ipswich", "ipswich-town"),
        ("leeds", "leeds-united"),
        ("leeds-utd", "leeds-united"),
        ("leicester", "leicester-city"),
        ("liverpool-fc", "liverpool"),
        ("man-city", "manchester-city"),
        ("mancity", "manchester-city"),
        ("manchester-city-fc", "manchester-city"),
        ("man-utd", "manchester-united"),
        ("man-united", "manchester-united"),
        ("manutd", "manchester-united"),
        ("manchester-utd", "manchester-united"),
        ("manchester-united-fc", "manchester-united"),
        ("newcastle", "newcastle-united"),
        ("newcastle-utd", "newcastle-united"),
        ("nottingham", "nottingham-forest"),
        ("nottm-forest", "nottingham-forest"),
        ("notts-forest", "nottingham-forest"),
        ("sheff-utd", "sheffield-united"),
        ("sheffield-utd", "sheffield-united"),
        ("sheff-wed", "sheffield-wednesday"),
        ("southampton-fc", "southampton"),
        ("spurs", "tottenham-hotspur"),
        ("tottenham", "tottenham-hotspur"),
        ("west-ham", "west-ham-united"),
        ("west-ham-utd", "west-ham-united"),
        ("wolves", "wolverhampton-wanderers"),
        ("wolverhampton", "wolverhampton-wanderers"),
        ("celtic-fc", "celtic"),
        ("rangers-fc", "rangers"),
        ("bayern", "bayern-munich"),
        ("bayern-munchen", "bayern-munich"),
        ("fc-bayern-munchen", "bayern-munich"),
        ("barca", "barcelona"),
        ("fc-barcelona", "barcelona"),
        ("real-madrid-cf", "real-madrid"),
        ("atletico", "atletico-madrid"),
        ("club-atletico-de-madrid", "atletico-madrid"),
        ("psg", "paris-saint-germain"),
        ("paris-sg", "paris-saint-germain"),
        ("inter", "inter-milan"),
        ("internazionale", "inter-milan"),
        ("fc-internazionale-milano", "inter-milan"),
        ("ac-milan", "milan"),
        ("juve", "juventus"),
        ("bvb", "borussia-dortmund"),
        ("dortmund", "borussia-dortmund"),
    ])
});

/// ASCII replacement for the accented letters that turn up in European club names.
fn fold_diacritic(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' | 'ă' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Lower-case, fold accents, drop punctuation and join words with single hyphens.
///
/// Whitespace, hyphens and underscores all act as word separators. Anything
/// else that is not an ASCII letter or digit is removed, so `"Brighton & Hove"`
/// becomes `"brighton-hove"`.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let piece: Option<&str> = if c.is_ascii_alphanumeric() {
            None
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
            continue;
        } else if let Some(folded) = fold_diacritic(c) {
            Some(folded)
        } else {
            continue;
        };

        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;

        match piece {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }

    out
}

/// Normalize a team identifier and resolve it through the alias table.
///
/// Unknown identifiers come back normalized but otherwise unchanged. Empty or
/// whitespace-only input yields an empty string, which callers must reject
/// before building a URL from it.
pub fn canonicalize(input: &str) -> String {
    let normalized = normalize(input);
    match SLUG_ALIASES.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}

/// Order-independent key for a pair of teams, e.g. `arsenal-vs-chelsea`.
pub fn canonical_pair_key(slug_a: &str, slug_b: &str) -> String {
    let mut pair = [canonicalize(slug_a), canonicalize(slug_b)];
    pair.sort();
    format!("{}{}{}", pair[0], PAIR_SEPARATOR, pair[1])
}

/// Whether a slug may be used verbatim in a published URL.
pub fn is_valid_slug(slug: &str) -> bool {
    (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug.len()) && SLUG_GRAMMAR.is_match(slug)
}
