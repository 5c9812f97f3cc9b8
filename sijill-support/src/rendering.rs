//! Text rendering utilities for human-friendly diagnostics.
//!
//! Formats resolution chains and "did you mean?" hints for service
//! names that failed to resolve.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use sijill_support::rendering::render_chain;
///
/// let chain = vec!["Mailer", "Smtp", "Config", "Mailer"];
/// assert_eq!(render_chain(&chain), "Mailer → Smtp → Config → Mailer");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Returns the last segment of a service name.
///
/// Service names derived from types look like `my_app::db.Pool`;
/// hand-written names are usually a single word. Both `::` and `.`
/// count as separators, but only outside of generic arguments.
///
/// ```
/// use sijill_support::rendering::short_name;
///
/// assert_eq!(short_name("my_app::db.Pool"), "Pool");
/// assert_eq!(short_name("alloc::vec.Vec<alloc::string::String>"), "Vec<alloc::string::String>");
/// assert_eq!(short_name("Mailer"), "Mailer");
/// ```
pub fn short_name(name: &str) -> &str {
    let head_end = name.find('<').unwrap_or(name.len());
    let head = &name[..head_end];

    let cut = match (head.rfind("::"), head.rfind('.')) {
        (Some(colons), Some(dot)) if dot > colons => dot + 1,
        (Some(colons), _) => colons + 2,
        (None, Some(dot)) => dot + 1,
        (None, None) => 0,
    };
    &name[cut..]
}

/// Picks registered names close to `requested`, best match first.
///
/// Substring matches (on the full or short name) rank first, then
/// names within a small edit distance of the short name.
///
/// ```
/// use sijill_support::rendering::suggest_similar;
///
/// let available = ["Mailer", "Database", "app::cache.Redis"];
/// assert_eq!(suggest_similar("Mailr", &available, 3), vec!["Mailer"]);
/// ```
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = short_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = short_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 0));
            }
            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 1));
            }

            let budget = (requested_short.chars().count().max(name_short.chars().count()) / 3).max(1);
            let distance = edit_distance(&requested_short, &name_short);
            (distance <= budget).then_some((name, distance + 1))
        })
        .collect();

    // stable: ties keep registration-sorted order
    scored.sort_by_key(|&(_, score)| score);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}
