use crate::models::{CanonicalRecord, Fingerprint};

/// Case-fold, strip diacritics by NFD decomposition, and collapse runs of
/// whitespace to a single space.
pub fn normalize_text(input: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    let folded: String = input
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    let mut out = String::with_capacity(folded.len());
    for ch in folded.trim().chars() {
        if ch.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Identity fingerprint: normalized name + jurisdiction + office, pipe-joined
/// so field boundaries survive normalization.
pub fn fingerprint(name: &str, jurisdiction: &str, office: &str) -> Fingerprint {
    Fingerprint::new(format!(
        "{}|{}|{}",
        normalize_text(name),
        normalize_text(jurisdiction),
        normalize_text(office)
    ))
}

pub fn fingerprint_record(r: &CanonicalRecord) -> Fingerprint {
    fingerprint(
        r.name.as_deref().unwrap_or(""),
        r.jurisdiction.as_deref().unwrap_or(""),
        r.office.as_deref().unwrap_or(""),
    )
}
