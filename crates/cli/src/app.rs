use crate::command;
use crate::logging;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub enum RunCmd {
    /// List the `<img>` sources found in the input.
    #[clap(name = "srcs")]
    Srcs(command::srcs::Srcs),
    /// Rewrite relative image paths to raw-content URLs.
    #[clap(name = "to-raw")]
    ToRaw(command::rewrite::ToRaw),
    /// Rewrite raw-content URLs back to relative image paths.
    #[clap(name = "to-relative")]
    ToRelative(command::rewrite::ToRelative),
    /// Prepend a prefix to every relative image path.
    #[clap(name = "add-prefix")]
    AddPrefix(command::prefix::AddPrefix),
    /// Strip a leading prefix from image sources.
    #[clap(name = "remove-prefix")]
    RemovePrefix(command::prefix::RemovePrefix),
    /// Replace a leading prefix of image sources with another one.
    #[clap(name = "swap-prefix")]
    SwapPrefix(command::prefix::SwapPrefix),
}

/// Arguments shared by all the subcommands.
#[derive(Parser, Debug)]
pub struct Args {
    /// Enable the logging system.
    #[clap(long, global = true)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Read the HTML from this file instead of stdin.
    #[clap(long, short, global = true)]
    pub input: Option<PathBuf>,
}

impl RunCmd {
    pub async fn run(self, args: Args) -> Result<()> {
        let (config, config_err) =
            repo_images_config::load_config_on_startup(args.config_file.clone());

        let _guard = logging::init(args.log.clone(), &config.log)?;

        if let Some(path) = repo_images_config::config_file() {
            tracing::debug!(path = %path.display(), "Loaded config");
        }

        if let Some(err) = config_err {
            tracing::warn!(?err, "Invalid config file, using the default config");
        }

        let html = command::read_input(args.input.as_deref()).await?;

        let output = match self {
            Self::Srcs(srcs) => srcs.run(&html),
            Self::ToRaw(to_raw) => to_raw.run(&html, config).await?,
            Self::ToRelative(to_relative) => to_relative.run(&html, config).await?,
            Self::AddPrefix(add_prefix) => add_prefix.run(&html),
            Self::RemovePrefix(remove_prefix) => remove_prefix.run(&html),
            Self::SwapPrefix(swap_prefix) => swap_prefix.run(&html),
        };

        command::write_output(&output).await
    }
}
