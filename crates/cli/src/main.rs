mod app;
mod command;
mod logging;

use app::{Args, RunCmd};
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "repo-images", version)]
pub struct RepoImages {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: RunCmd,
}

#[tokio::main]
async fn main() {
    let RepoImages { args, cmd } = RepoImages::parse();

    if let Err(e) = cmd.run(args).await {
        eprintln!("error: {e:?}");
        std::process::exit(1);
    }
}
