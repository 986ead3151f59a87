//! Deterministic latin-to-hiragana approximation used when the LLM is
//! unavailable. Sounds the table cannot express pass through unchanged.

const KANA: &[(&str, &str)] = &[
    ("shi", "し"),
    ("chi", "ち"),
    ("tsu", "つ"),
    ("ka", "か"),
    ("ki", "き"),
    ("ku", "く"),
    ("ke", "け"),
    ("ko", "こ"),
    ("sa", "さ"),
    ("su", "す"),
    ("se", "せ"),
    ("so", "そ"),
    ("ta", "た"),
    ("te", "て"),
    ("to", "と"),
    ("na", "な"),
    ("ni", "に"),
    ("nu", "ぬ"),
    ("ne", "ね"),
    ("no", "の"),
    ("ha", "は"),
    ("hi", "ひ"),
    ("fu", "ふ"),
    ("he", "へ"),
    ("ho", "ほ"),
    ("ma", "ま"),
    ("mi", "み"),
    ("mu", "む"),
    ("me", "め"),
    ("mo", "も"),
    ("ya", "や"),
    ("yu", "ゆ"),
    ("yo", "よ"),
    ("ra", "ら"),
    ("ri", "り"),
    ("ru", "る"),
    ("re", "れ"),
    ("ro", "ろ"),
    ("wa", "わ"),
    ("wo", "を"),
    ("ga", "が"),
    ("gi", "ぎ"),
    ("gu", "ぐ"),
    ("ge", "げ"),
    ("go", "ご"),
    ("za", "ざ"),
    ("ji", "じ"),
    ("zu", "ず"),
    ("ze", "ぜ"),
    ("zo", "ぞ"),
    ("da", "だ"),
    ("di", "ぢ"),
    ("du", "づ"),
    ("de", "で"),
    ("do", "ど"),
    ("ba", "ば"),
    ("bi", "び"),
    ("bu", "ぶ"),
    ("be", "べ"),
    ("bo", "ぼ"),
    ("pa", "ぱ"),
    ("pi", "ぴ"),
    ("pu", "ぷ"),
    ("pe", "ぺ"),
    ("po", "ぽ"),
    ("a", "あ"),
    ("i", "い"),
    ("u", "う"),
    ("e", "え"),
    ("o", "お"),
    ("n", "ん"),
];

const LONGEST_KEY: usize = 3;

/// Render `text` as hiragana by greedy longest match against the kana table.
pub fn romanize_to_kana(text: &str) -> String {
    let chars = approximate_sounds(text);
    let mut out = String::with_capacity(chars.len() * 3);
    let mut index = 0;

    'outer: while index < chars.len() {
        for width in (1..=LONGEST_KEY.min(chars.len() - index)).rev() {
            let candidate = chars[index..index + width].iter().collect::<String>();
            if let Some((_, kana)) = KANA.iter().find(|(key, _)| *key == candidate) {
                out.push_str(kana);
                index += width;
                continue 'outer;
            }
        }

        out.push(chars[index]);
        index += 1;
    }

    out
}

/// Lowercase and fold latin letters Japanese lacks onto their nearest sound.
fn approximate_sounds(text: &str) -> Vec<char> {
    let lower = text.to_lowercase().chars().collect::<Vec<_>>();
    lower
        .iter()
        .enumerate()
        .map(|(index, ch)| {
            let next = lower.get(index + 1).copied();
            match ch {
                'l' => 'r',
                'v' => 'b',
                'q' => 'k',
                'c' => match next {
                    Some('e' | 'i' | 'y') => 's',
                    Some('h') => 'c',
                    _ => 'k',
                },
                other => *other,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::romanize_to_kana;

    #[test]
    fn common_names() {
        assert_eq!(romanize_to_kana("Mika"), "みか");
        assert_eq!(romanize_to_kana("ken"), "けん");
        assert_eq!(romanize_to_kana("Nami"), "なみ");
        assert_eq!(romanize_to_kana("Shin"), "しん");
        assert_eq!(romanize_to_kana("Alice"), "ありせ");
    }

    #[test]
    fn three_letter_syllables_win() {
        assert_eq!(romanize_to_kana("tsuchi"), "つち");
    }

    #[test]
    fn unmatched_letters_pass_through() {
        assert_eq!(romanize_to_kana("sam"), "さm");
        assert_eq!(romanize_to_kana("x_1"), "x_1");
    }

    #[test]
    fn output_is_deterministic() {
        let first = romanize_to_kana("Victoria");
        assert_eq!(first, romanize_to_kana("victoria"));
        assert_eq!(first, "びkとりあ");
    }
}
