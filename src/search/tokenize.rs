//! Text tokenization, stemming and accent folding for field value lookups.

use rust_stemmers::Stemmer;
use std::borrow::Cow;

/// Minimum token length for indexing. Set to 1 so single-letter values still match.
const MIN_TOKEN_LENGTH: usize = 1;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to matching.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Walks `text` and hands every word and sub-word to `emit`.
///
/// The state machine maintains two pointers:
/// - `word_start`: Start of the complete word (e.g., "DataBase")
/// - `subword_start`: Start of the current sub-component (e.g., "Base")
///
/// This allows extracting both individual components and the full compound term.
/// Letters and digits are word characters; `-` and `_` split sub-words only.
fn split_words(text: &str, emit: &mut impl FnMut(&str)) {
    let mut last_case = None;
    let mut word_start = 0;
    let mut subword_start = 0;
    let mut word_start_next_char = true;
    let mut subword_start_next_char = true;

    for (i, c) in text.char_indices() {
        if word_start_next_char {
            word_start = i;
            subword_start = i;
            word_start_next_char = false;
            subword_start_next_char = false;
        }

        if subword_start_next_char {
            subword_start = i;
            subword_start_next_char = false;
        }

        // lowercase → uppercase is a CamelCase boundary
        let current_case = c.is_alphabetic().then(|| c.is_uppercase());
        let case_change = last_case == Some(false) && current_case == Some(true);
        last_case = current_case;

        if c == '-' || c == '_' {
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                emit(&text[subword_start..i]);
            }
            subword_start_next_char = true;
        } else if !c.is_alphanumeric() {
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH && subword_start != word_start {
                emit(&text[subword_start..i]);
            }
            if i.saturating_sub(word_start) >= MIN_TOKEN_LENGTH {
                emit(&text[word_start..i]);
            }
            word_start_next_char = true;
        } else if case_change {
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                emit(&text[subword_start..i]);
            }
            subword_start = i;
        }
    }

    if !word_start_next_char {
        let last_subword = &text[subword_start..];
        if word_start != subword_start && last_subword.len() >= MIN_TOKEN_LENGTH {
            emit(last_subword);
        }
        let last_word = &text[word_start..];
        if last_word.len() >= MIN_TOKEN_LENGTH {
            emit(last_word);
        }
    }
}

/// Lowercase a token and drop it if it is a stop word or left empty by delimiters.
fn normalize_token(token: &str) -> Option<String> {
    let lowercase = token
        .trim_matches(|c| c == '-' || c == '_')
        .to_lowercase();

    if lowercase.is_empty() || STOP_WORDS.contains(&lowercase.as_str()) {
        return None;
    }
    Some(lowercase)
}

/// Tokenizes text and stems every token (English).
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];
    split_words(text, &mut |token| {
        if let Some(lowercase) = normalize_token(token) {
            tokens.push(stemmer.stem(&lowercase).into_owned());
        }
    });
    tokens
}

/// Tokenizes text without stemming. Used for prefix matching of partially typed words.
pub(crate) fn tokenize_words(text: &str) -> Vec<String> {
    let mut tokens = vec![];
    split_words(text, &mut |token| {
        if let Some(lowercase) = normalize_token(token) {
            tokens.push(lowercase);
        }
    });
    tokens
}

/// The last word of `text`, lowercased, kept even when it is a stop word.
///
/// A word still being typed may be the start of a longer one ("in" for "Interstellar").
pub(crate) fn last_word(text: &str) -> Option<String> {
    let mut last = None;
    split_words(text, &mut |token| {
        let lowercase = token
            .trim_matches(|c| c == '-' || c == '_')
            .to_lowercase();
        if !lowercase.is_empty() {
            last = Some(lowercase);
        }
    });
    last
}

pub(crate) fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Replaces accented Latin letters with their unaccented base letter.
///
/// Returns `Cow::Borrowed` when the text has nothing to fold.
pub(crate) fn fold_accents(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_char(c) {
            Some(base) => folded.push_str(base),
            None => folded.push(c),
        }
    }
    Cow::Owned(folded)
}

fn fold_char(c: char) -> Option<&'static str> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ď' | 'đ' => "d",
        'Ď' | 'Đ' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ß' => "ss",
        'ţ' | 'ť' => "t",
        'Ţ' | 'Ť' => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        _ => return None,
    };
    Some(base)
}
