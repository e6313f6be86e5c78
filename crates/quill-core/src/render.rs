//! Article rendering - turns stored post markup into a styled HTML page.
//!
//! Stored content is HTML produced by the generator or the editor. Rendering
//! applies a fixed component table: every known tag gets its presentation
//! classes, headings get anchor ids, external links open in a new tab and
//! code blocks get a language label. Markup is not sanitised.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::domain::{Post, slugify};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(h[1-6])\b([^>]*)>(.*?)</h[1-6]\s*>").expect("heading pattern is valid")
});

static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<([a-z][a-z0-9]*)\b([^>]*?)(\s*/?)>").expect("tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*"([^"]*)""#).expect("attr pattern is valid")
});

static TABLE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</table\s*>").expect("table close pattern is valid"));

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("strip pattern is valid"));

/// Presentation classes per tag.
const COMPONENT_CLASSES: &[(&str, &str)] = &[
    ("h1", "font-medium pt-12 mb-4 text-3xl"),
    (
        "h2",
        "text-gray-800 dark:text-zinc-200 font-medium mt-8 mb-3 text-2xl scroll-mt-24",
    ),
    (
        "h3",
        "text-gray-800 dark:text-zinc-200 font-medium mt-8 mb-3 text-xl scroll-mt-24",
    ),
    ("h4", "font-medium text-lg mt-6 mb-2 scroll-mt-24"),
    ("h5", "font-medium text-base mt-6 mb-2"),
    (
        "h6",
        "font-medium text-base mt-6 mb-2 text-gray-600 dark:text-zinc-400",
    ),
    ("p", "text-gray-800 dark:text-zinc-300 leading-relaxed my-4"),
    (
        "ol",
        "text-gray-800 dark:text-zinc-300 list-decimal pl-5 space-y-2 my-4",
    ),
    (
        "ul",
        "text-gray-800 dark:text-zinc-300 list-disc pl-5 space-y-1 my-4",
    ),
    ("li", "pl-1 mb-1"),
    ("em", "font-medium italic"),
    ("strong", "font-semibold"),
    (
        "a",
        "text-blue-500 hover:text-blue-700 dark:text-blue-400 hover:dark:text-blue-300 underline underline-offset-2 decoration-gray-300 dark:decoration-gray-700",
    ),
    (
        "blockquote",
        "ml-[0.075em] border-l-4 border-gray-300 pl-4 text-gray-700 italic dark:border-zinc-600 dark:text-zinc-300 my-6",
    ),
    (
        "pre",
        "relative overflow-x-auto rounded-lg my-4 p-4 text-sm bg-gray-100 dark:bg-gray-800 border border-gray-200 dark:border-gray-700",
    ),
    ("hr", "my-8 border-t border-gray-200 dark:border-gray-800"),
    ("table", "min-w-full border-collapse"),
    ("thead", "bg-gray-100 dark:bg-gray-800"),
    ("tbody", "divide-y divide-gray-200 dark:divide-gray-700"),
    ("tr", "hover:bg-gray-50 dark:hover:bg-gray-800/60"),
    (
        "th",
        "px-4 py-3 text-left text-sm font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider",
    ),
    ("td", "px-4 py-3 text-sm text-gray-800 dark:text-gray-300"),
];

const INLINE_CODE_CLASS: &str = "font-mono text-sm px-1.5 py-0.5 rounded bg-gray-100 dark:bg-gray-800 border border-gray-200 dark:border-gray-700";
const CODE_LABEL_CLASS: &str =
    "absolute right-0 top-0 px-2 py-1 rounded-bl bg-gray-200 dark:bg-gray-700 text-xs font-mono opacity-70";
const TABLE_WRAPPER_CLASS: &str = "overflow-x-auto my-6";
const IMAGE_CLASS: &str = "w-full h-auto rounded-lg";
const FIGCAPTION_CLASS: &str = "mt-2 text-center text-sm text-gray-500 dark:text-gray-400";

/// Words per minute used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Class list the component table assigns to `tag`, if any.
pub fn component_class(tag: &str) -> Option<&'static str> {
    let tag = tag.to_ascii_lowercase();
    COMPONENT_CLASSES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, class)| *class)
}

/// Apply the component table to a fragment of post markup.
///
/// Heading ids are unique within the fragment: a repeated heading gets
/// `-1`, `-2`, ... appended to its slug.
pub fn render_content(html: &str) -> String {
    let mut used: HashSet<String> = HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| find_attr(&caps[2], "id").map(str::to_string))
        .collect();

    let anchored = HEADING_RE.replace_all(html, |caps: &Captures| {
        let tag = &caps[1];
        let attrs = &caps[2];
        let inner = &caps[3];
        let base = slugify(&strip_tags(inner));

        if base.is_empty() || find_attr(attrs, "id").is_some() {
            return format!("<{tag}{attrs}>{inner}</{tag}>");
        }

        let mut id = base.clone();
        let mut n = 0;
        while used.contains(&id) {
            n += 1;
            id = format!("{base}-{n}");
        }
        used.insert(id.clone());

        format!(r#"<{tag}{attrs} id="{id}">{inner}</{tag}>"#)
    });

    let styled = OPEN_TAG_RE.replace_all(&anchored, |caps: &Captures| rewrite_tag(caps));

    TABLE_CLOSE_RE
        .replace_all(&styled, "$0</div>")
        .into_owned()
}

/// One entry of an article's table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub depth: u8,
    pub id: String,
    pub text: String,
}

/// The `h2` and `h3` headings of rendered content that carry an id, in
/// document order.
pub fn table_of_contents(rendered: &str) -> Vec<TocEntry> {
    HEADING_RE
        .captures_iter(rendered)
        .filter_map(|caps| {
            let depth = match caps[1].to_ascii_lowercase().as_str() {
                "h2" => 2,
                "h3" => 3,
                _ => return None,
            };
            let id = find_attr(&caps[2], "id")?.to_string();
            let text = strip_tags(&caps[3]).trim().to_string();
            Some(TocEntry { depth, id, text })
        })
        .collect()
}

fn render_toc(entries: &[TocEntry]) -> String {
    // A single section does not need a table of contents
    if entries.len() < 2 {
        return String::new();
    }

    let mut items = String::new();
    for entry in entries {
        let indent = if entry.depth > 2 { r#" class="ml-4""# } else { "" };
        items.push_str(&format!(
            r##"<li{indent}><a href="#{}" class="text-gray-700 hover:text-gray-900 dark:text-gray-300 dark:hover:text-gray-100">{}</a></li>
"##,
            entry.id, entry.text
        ));
    }

    format!(
        r#"<details class="my-4 border border-gray-200 dark:border-gray-700 rounded-lg p-4 bg-gray-50 dark:bg-gray-800">
<summary class="font-medium cursor-pointer">Table of Contents</summary>
<ul class="mt-4 space-y-2 text-sm">
{items}</ul>
</details>
"#
    )
}

/// The posts published just before and just after an article.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbours<'a> {
    /// The next older post.
    pub previous: Option<&'a Post>,
    /// The next newer post.
    pub next: Option<&'a Post>,
}

impl<'a> Neighbours<'a> {
    /// Locate `slug` in a newest-first listing and take the posts around it.
    pub fn within(latest_first: &'a [Post], slug: &str) -> Self {
        let Some(pos) = latest_first.iter().position(|p| p.slug == slug) else {
            return Self::default();
        };

        Self {
            previous: latest_first.get(pos + 1),
            next: pos.checked_sub(1).and_then(|i| latest_first.get(i)),
        }
    }
}

fn render_neighbours(neighbours: &Neighbours<'_>) -> String {
    let link = |post: &Post, label: &str, align: &str| {
        format!(
            r#"<a href="/posts/{}" class="p-4 border border-gray-200 dark:border-gray-800 rounded-lg hover:bg-gray-50 dark:hover:bg-gray-800/60{align}">
<div class="text-sm text-gray-500 dark:text-gray-400 mb-1">{label}</div>
<div class="font-medium">{}</div>
</a>
"#,
            post.slug,
            escape_html(&post.title)
        )
    };

    let mut links = String::new();
    if let Some(post) = neighbours.previous {
        links.push_str(&link(post, "Previous Article", ""));
    }
    if let Some(post) = neighbours.next {
        links.push_str(&link(post, "Next Article", " text-right md:ml-auto"));
    }
    if links.is_empty() {
        return links;
    }

    format!(
        r#"<nav class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-8">
{links}</nav>
"#
    )
}

fn rewrite_tag(caps: &Captures) -> String {
    let tag = &caps[1];
    let attrs = &caps[2];
    let close = &caps[3];
    let lower = tag.to_ascii_lowercase();

    match lower.as_str() {
        "code" => match find_attr(attrs, "class") {
            Some(class) if class.starts_with("language-") => {
                let language = class.trim_start_matches("language-");
                format!(
                    r#"<span class="{CODE_LABEL_CLASS}">{}</span><{tag}{attrs}{close}>"#,
                    escape_html(language)
                )
            }
            Some(_) => caps[0].to_string(),
            None => format!(r#"<{tag}{attrs} class="{INLINE_CODE_CLASS}"{close}>"#),
        },
        "a" => {
            let mut extra = class_attr(&lower, attrs);
            let href = find_attr(attrs, "href").unwrap_or_default();
            let internal = href.starts_with('/') || href.starts_with('#');
            if !internal && find_attr(attrs, "target").is_none() {
                extra.push_str(r#" target="_blank" rel="noopener noreferrer""#);
            }
            format!("<{tag}{attrs}{extra}{close}>")
        }
        "img" => rewrite_image(attrs),
        "table" => format!(
            r#"<div class="{TABLE_WRAPPER_CLASS}"><{tag}{attrs}{}{close}>"#,
            class_attr(&lower, attrs)
        ),
        _ => match component_class(&lower) {
            Some(_) => format!("<{tag}{attrs}{}{close}>", class_attr(&lower, attrs)),
            None => caps[0].to_string(),
        },
    }
}

fn rewrite_image(attrs: &str) -> String {
    let Some(src) = find_attr(attrs, "src") else {
        return String::new();
    };
    let alt = find_attr(attrs, "alt").unwrap_or_default();
    let class = find_attr(attrs, "class").unwrap_or(IMAGE_CLASS);

    // width, title, loading and the like are carried over as written
    let mut rest = String::new();
    for caps in ATTR_RE.captures_iter(attrs) {
        let name = &caps[1];
        if !["src", "alt", "class"].iter().any(|n| name.eq_ignore_ascii_case(n)) {
            rest.push_str(&format!(r#" {name}="{}""#, &caps[2]));
        }
    }

    let mut figure = format!(
        r#"<figure class="my-6"><div class="overflow-hidden rounded-lg"><img src="{src}" alt="{alt}"{rest} class="{class}" /></div>"#
    );
    if !alt.is_empty() {
        figure.push_str(&format!(
            r#"<figcaption class="{FIGCAPTION_CLASS}">{alt}</figcaption>"#
        ));
    }
    figure.push_str("</figure>");
    figure
}

/// ` class="..."` for `tag`, unless the element already carries its own class.
fn class_attr(tag: &str, attrs: &str) -> String {
    match (component_class(tag), find_attr(attrs, "class")) {
        (Some(class), None) => format!(r#" class="{class}""#),
        _ => String::new(),
    }
}

fn find_attr<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Remove every tag from a fragment, leaving its text.
pub fn strip_tags(html: &str) -> String {
    ANY_TAG_RE.replace_all(html, "").into_owned()
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time_minutes(html: &str) -> usize {
    let words = strip_tags(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{}</title>
</head>
<body>
<main class="container mx-auto p-4 max-w-4xl">
{body}
</main>
</body>
</html>
"#,
        escape_html(title)
    )
}

/// Render a full article page for a stored post.
///
/// The page carries a table of contents when the post has two or more
/// `h2`/`h3` sections, and links to the neighbouring posts when known.
pub fn render_article(post: &Post, neighbours: Neighbours<'_>) -> String {
    let title = escape_html(&post.title);
    let content = render_content(&post.content);
    let body = format!(
        r#"<article class="prose max-w-none">
<header class="mb-8">
<h1 class="text-3xl font-bold mb-2">{title}</h1>
<div class="flex items-center text-gray-500 dark:text-gray-400 text-sm space-x-4 mb-4">
<time datetime="{}">{}</time>
<span>· {} min read</span>
</div>
<hr class="mt-6 border-t border-gray-200 dark:border-gray-800" />
</header>
{}{}
<footer class="mt-12 pt-6 border-t border-gray-200 dark:border-gray-800">
{}<div class="text-center">
<a href="/posts" class="inline-flex items-center px-4 py-2 border border-gray-200 dark:border-gray-800 rounded-lg">Back to all articles</a>
</div>
</footer>
</article>"#,
        post.created_at.to_rfc3339(),
        format_date(&post.created_at),
        reading_time_minutes(&post.content),
        render_toc(&table_of_contents(&content)),
        content,
        render_neighbours(&neighbours),
    );

    page(&post.title, &body)
}

/// Render the list of published posts, in the order given.
pub fn render_index(posts: &[Post]) -> String {
    let mut items = String::new();
    for post in posts {
        items.push_str(&format!(
            r#"<li class="py-4"><a href="/posts/{}" class="text-xl font-medium">{}</a> <time datetime="{}" class="text-sm text-gray-500">{}</time></li>
"#,
            post.slug,
            escape_html(&post.title),
            post.created_at.to_rfc3339(),
            format_date(&post.created_at),
        ));
    }

    let body = if posts.is_empty() {
        r#"<h1 class="text-2xl font-bold mb-4">Blog</h1>
<p>No posts published yet.</p>"#
            .to_string()
    } else {
        format!(
            r#"<h1 class="text-2xl font-bold mb-4">Blog</h1>
<ul class="divide-y divide-gray-200">
{items}</ul>"#
        )
    };

    page("Blog", &body)
}
