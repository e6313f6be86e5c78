//! Subcommand implementations on top of an [`EditorSession`].

use anyhow::{Context, Result, bail};

use quill_core::editor::{EditorSession, EditorState};
use quill_core::ports::{ContentGenerator, PostStore};

use crate::cli::ComposeArgs;

/// Generate a draft for `topic` and return its HTML.
pub async fn generate(generator: &dyn ContentGenerator, topic: &str) -> Result<String> {
    let mut session = EditorSession::new();
    session.set_topic(topic);
    draft(&mut session, generator).await?;
    Ok(session.document().to_string())
}

/// Publish `html` under `title` and return a one-line report.
pub async fn publish(store: &dyn PostStore, title: &str, html: String) -> Result<String> {
    let mut session = EditorSession::new();
    session.set_title(title);
    session.set_document(html);
    finish(&mut session, store).await
}

/// Generate a draft, append the requested media, and publish when asked.
///
/// Returns the final document, followed by the publish report if any.
pub async fn compose(
    client: &(impl ContentGenerator + PostStore),
    args: &ComposeArgs,
) -> Result<(String, Option<String>)> {
    let mut session = EditorSession::new();
    session.set_topic(&args.topic);
    if let Some(title) = &args.title {
        session.set_title(title);
    }

    draft(&mut session, client).await?;

    for url in &args.link {
        session.toggle_link_input();
        session.inputs.link_url = url.clone();
        if !session.insert_link() {
            tracing::warn!(%url, "Skipping link: only http and https URLs are accepted");
        }
    }
    for image in &args.image {
        let (url, alt) = image.split_once('|').unwrap_or((image.as_str(), ""));
        session.toggle_image_input();
        session.inputs.image_url = url.to_string();
        session.inputs.image_alt = alt.to_string();
        if !session.insert_image() {
            tracing::warn!(%url, "Skipping empty image URL");
        }
    }
    for url in &args.video {
        session.toggle_video_input();
        session.inputs.video_url = url.clone();
        if !session.insert_video() {
            tracing::warn!(%url, "Skipping video: not a YouTube link");
        }
    }

    let document = session.document().to_string();
    if !args.publish {
        return Ok((document, None));
    }

    let report = finish(&mut session, client).await?;
    Ok((document, Some(report)))
}

async fn draft(session: &mut EditorSession, generator: &dyn ContentGenerator) -> Result<()> {
    if !session.can_generate() {
        bail!("Topic is required");
    }

    match session.generate(generator).await {
        EditorState::Editable => {
            tracing::info!(title = session.title(), "Draft ready");
            Ok(())
        }
        _ => bail!(
            "{}",
            session.last_error().unwrap_or("Failed to generate content")
        ),
    }
}

async fn finish(session: &mut EditorSession, store: &dyn PostStore) -> Result<String> {
    if session.title().trim().is_empty() {
        bail!("Title is required");
    }
    if session.text().is_empty() {
        bail!("Document is empty");
    }

    match session.publish(store).await {
        EditorState::Published => {
            let post = session
                .published()
                .context("publish reported success without a post")?;
            Ok(format!("Published \"{}\" at /posts/{}", post.title, post.slug))
        }
        _ => bail!("{}", session.last_error().unwrap_or("Failed to publish post")),
    }
}
