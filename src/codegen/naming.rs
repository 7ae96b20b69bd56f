//! Identifier case conversions.

use serde::{Deserialize, Serialize};

/// The casings an identifier commonly appears in inside generated sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariants {
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
    pub upper_snake: String,
}

impl NameVariants {
    /// Returns `None` if `name` contains no alphanumeric characters.
    pub fn new(name: &str) -> Option<Self> {
        let words = split_words(name);
        if words.is_empty() {
            return None;
        }

        let pascal: String = words.iter().map(|w| capitalize(w)).collect();
        let camel = words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
            .collect();
        let snake = words.join("_");

        Some(Self {
            pascal,
            camel,
            kebab: words.join("-"),
            upper_snake: snake.to_uppercase(),
            snake,
        })
    }

    /// Pairs each variant of `self` with the same variant of `other`.
    pub fn pairs<'a>(&'a self, other: &'a NameVariants) -> [(&'a str, &'a str); 5] {
        [
            (self.pascal.as_str(), other.pascal.as_str()),
            (self.camel.as_str(), other.camel.as_str()),
            (self.snake.as_str(), other.snake.as_str()),
            (self.kebab.as_str(), other.kebab.as_str()),
            (self.upper_snake.as_str(), other.upper_snake.as_str()),
        ]
    }
}

/// A PascalCase type name for a free-form title such as a user story's.
///
/// Names that would start with a digit are prefixed with `Story`.
pub fn type_name_for(title: &str) -> Option<String> {
    let variants = NameVariants::new(title)?;
    if variants.pascal.starts_with(|c: char| c.is_ascii_digit()) {
        Some(format!("Story{}", variants.pascal))
    } else {
        Some(variants.pascal)
    }
}

/// Lowercased words of an identifier or phrase.
///
/// Splits on non-alphanumerics and on case changes: `HTTPServerConfig`
/// becomes `http`, `server`, `config`.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();

    for chunk in name.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            let boundary = i > 0 && c.is_uppercase() && {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
