//! Stop-word dictionary and the word-frequency helper built on it.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Word list loaded from a directory of plain-text files, one word per
/// line. Entries written with umlaut digraphs (`a"`, `o"`, `u"`) are
/// normalized, and trailing slash-comments or backslash artifacts are
/// stripped.
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    pub fn load(dir: &Path) -> Result<Self> {
        let mut words = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let content = fs::read_to_string(entry.path())?;
            for line in content.lines() {
                let word = normalize_entry(line);
                if !word.is_empty() {
                    words.push(word);
                }
            }
        }

        Ok(Dictionary { words })
    }

    /// Membership by substring containment against every entry, not
    /// equality. Short words match inside longer entries, a known source
    /// of false positives that downstream counts rely on.
    pub fn is_known(&self, word: &str) -> bool {
        self.words.iter().any(|entry| entry.contains(word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn normalize_entry(line: &str) -> String {
    let mut word = line
        .trim()
        .replace("a\"", "ä")
        .replace("o\"", "ö")
        .replace("u\"", "ü");
    if let Some(idx) = word.find('/') {
        word.truncate(idx);
    }
    if let Some(idx) = word.find('\\') {
        word.truncate(idx);
    }
    word
}

/// Counts the words of an extracted text that the dictionary does not
/// know. Punctuation and control artifacts left over from extraction are
/// stripped first.
pub fn word_frequencies(text: &str, dictionary: &Dictionary) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for raw in text.split(' ') {
        let word = clean_word(raw);
        if word.is_empty() || dictionary.is_known(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    counts
}

fn clean_word(raw: &str) -> String {
    let mut word: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '\n' | '\r' | '\u{a0}'))
        .collect();
    if let Some(idx) = word.find('/') {
        word.truncate(idx);
    }
    if let Some(idx) = word.find('\\') {
        word.truncate(idx);
    }
    word
}
