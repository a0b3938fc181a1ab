//! Filename-safe tokens for region keys.
//!
//! Region names in the dump are Russian; output file names must stay within
//! the portable ASCII range. The default token function transliterates
//! Cyrillic to Latin, strips periods and replaces spaces with underscores.
//! The splitter accepts any `fn(&str) -> String`, so other scripts can plug
//! in their own token function.

/// Builds a filename-safe token from a region key.
///
/// Cyrillic characters are transliterated to Latin, periods are stripped and
/// spaces become underscores. Every other character passes through unchanged,
/// so keys that are already Latin keep their exact spelling.
pub fn region_token(region: &str) -> String {
    let mut token = String::with_capacity(region.len());
    for ch in region.chars() {
        match ch {
            '.' => {}
            ' ' => token.push('_'),
            _ => match latin(ch) {
                Some(s) => token.push_str(s),
                None => token.push(ch),
            },
        }
    }
    token
}

/// Latin rendering of a Cyrillic character, `None` for anything else.
///
/// The table follows the reversed-Russian scheme of the transliteration
/// library the legacy tool shipped with (zh/ts/ch/sh/sch/ju/ja digraphs),
/// with one deviation: the soft and hard signs are dropped instead of being
/// rendered as apostrophes, which are unwelcome in file names.
fn latin(ch: char) -> Option<&'static str> {
    let s = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ы' => "y",
        'ю' => "ju",
        'я' => "ja",
        'ь' | 'ъ' => "",
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' | 'Ё' | 'Э' => "E",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "Y",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "H",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Sch",
        'Ы' => "Y",
        'Ю' => "Ju",
        'Я' => "Ja",
        'Ь' | 'Ъ' => "",
        _ => return None,
    };
    Some(s)
}
