//! Small text helpers shared by the node model and the writer.

/// Uppercase the first letter (schema field name -> exported Go identifier).
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// CamelCase -> snake_case for generated JSON tags.
pub fn to_snake(s: &str) -> String {
    let runes: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in runes.iter().enumerate() {
        if i > 0
            && c.is_uppercase()
            && ((i + 1 < runes.len() && runes[i + 1].is_lowercase()) || runes[i - 1].is_lowercase())
        {
            out.push('_');
        }
        for lc in c.to_lowercase() {
            out.push(lc);
        }
    }
    out
}

/// FNV-1a over the validation path. Loop variables are derived from this so
/// nested loops never collide without tracking a counter.
pub fn fnv1a(s: &str) -> u32 {
    let mut h: u32 = 0x811c_9dc5;
    for b in s.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}
