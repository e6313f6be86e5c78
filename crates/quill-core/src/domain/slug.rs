/// Derive a URL-safe slug from a post title.
///
/// The title is lowercased, every character outside `[a-z0-9]` and whitespace
/// is dropped, and each remaining whitespace run becomes a single `-`.
/// Leading and trailing whitespace never produce a hyphen.
///
/// ```
/// use quill_core::domain::slugify;
///
/// assert_eq!(slugify("Next.js routing"), "nextjs-routing");
/// ```
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Next.js routing"), "nextjs-routing");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("Server-side rendering"), "serverside-rendering");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("  Rust \t\n  async   traits "), "rust-async-traits");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let title = "Understanding JavaScript Promises: An In-depth Guide";
        assert_eq!(slugify(title), slugify(title));
        assert_eq!(slugify(title), "understanding-javascript-promises-an-indepth-guide");
    }

    #[test]
    fn test_case_and_punctuation_variants_collide() {
        assert_eq!(slugify("Next.js Routing"), slugify("nextjs routing!"));
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café crème 2024"), "caf-crme-2024");
        assert_eq!(slugify("!!!"), "");
    }
}
