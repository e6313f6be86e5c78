//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Draft blog posts with a language model and publish them to a Quill server.
#[derive(Parser, Debug)]
#[command(name = "quill-editor", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the Quill API server.
    #[arg(long, env = "QUILL_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a draft for a topic and print it.
    Generate {
        /// Topic to write about.
        topic: String,

        /// Write the draft to a file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Publish an existing HTML document.
    Publish {
        /// Post title.
        #[arg(short, long)]
        title: String,

        /// HTML file to publish. Reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Generate a draft, append media, and optionally publish it.
    Compose(ComposeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ComposeArgs {
    /// Topic to write about.
    pub topic: String,

    /// Post title. Derived from the draft when omitted.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Append a link (http or https only).
    #[arg(long)]
    pub link: Vec<String>,

    /// Append an image, optionally captioned as `URL|caption`.
    #[arg(long)]
    pub image: Vec<String>,

    /// Append a YouTube video.
    #[arg(long)]
    pub video: Vec<String>,

    /// Publish the draft once composed.
    #[arg(short, long)]
    pub publish: bool,

    /// Write the final document to a file.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_compose_collects_repeated_media() {
        let args = CliArgs::try_parse_from([
            "quill-editor",
            "--server",
            "http://blog.local",
            "compose",
            "Next.js routing",
            "--link",
            "https://nextjs.org/docs",
            "--video",
            "https://youtu.be/dQw4w9WgXcQ",
            "--image",
            "https://example.com/a.png",
            "--image",
            "https://example.com/b.png",
            "--publish",
        ])
        .unwrap();

        assert_eq!(args.server, "http://blog.local");
        let Command::Compose(compose) = args.command else {
            panic!("expected compose");
        };
        assert_eq!(compose.topic, "Next.js routing");
        assert_eq!(compose.image.len(), 2);
        assert_eq!(compose.link, vec!["https://nextjs.org/docs"]);
        assert!(compose.publish);
        assert!(compose.title.is_none());
    }
}
