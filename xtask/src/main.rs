//! Release tasks run by CI: `cargo xtask version` and `cargo xtask image-tags`.

mod release;

use clap::{Args, Parser, Subcommand};

/// graphedexcel release tasks.
#[derive(Parser, Debug)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the image version for a git ref.
    Version(RefArgs),
    /// Print the image references to push, one per line.
    ImageTags {
        #[command(flatten)]
        source: RefArgs,

        /// Image name without tag, e.g. `ghcr.io/owner/graphedexcel`.
        #[arg(long)]
        image: String,
    },
}

#[derive(Args, Debug)]
struct RefArgs {
    /// Git ref that triggered the build, e.g. `refs/tags/v1.2.3`.
    #[arg(long = "ref", env = "GITHUB_REF")]
    git_ref: String,

    /// Release tag name, when the build runs for a release.
    #[arg(long)]
    tag: Option<String>,
}

impl RefArgs {
    fn version(&self) -> String {
        release::derive_version(&self.git_ref, self.tag.as_deref())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version(source) => println!("{}", source.version()),
        Commands::ImageTags { source, image } => {
            anyhow::ensure!(!image.trim().is_empty(), "--image must not be empty");
            for tag in release::image_tags(&image, &source.version()) {
                println!("{tag}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn image_tags_arguments() {
        let cli = Cli::try_parse_from([
            "xtask",
            "image-tags",
            "--ref",
            "refs/tags/v0.3.1",
            "--tag",
            "v0.3.1",
            "--image",
            "ghcr.io/o/graphedexcel",
        ])
        .expect("should parse");
        let Commands::ImageTags { source, image } = cli.command else {
            panic!("expected image-tags");
        };
        assert_eq!(image, "ghcr.io/o/graphedexcel");
        assert_eq!(source.version(), "0.3.1");
    }

    #[test]
    fn version_for_main() {
        let cli = Cli::try_parse_from(["xtask", "version", "--ref", "refs/heads/main"])
            .expect("should parse");
        let Commands::Version(source) = cli.command else {
            panic!("expected version");
        };
        assert_eq!(source.version(), "latest");
    }
}
