use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct AddPrefix {
    /// Prefix prepended as is, include the trailing `/` if one is wanted.
    prefix: String,
}

impl AddPrefix {
    pub fn run(&self, html: &str) -> String {
        repo_images::add_prefix(html, Some(&self.prefix))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RemovePrefix {
    prefix: String,
}

impl RemovePrefix {
    pub fn run(&self, html: &str) -> String {
        repo_images::remove_prefix(html, Some(&self.prefix))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SwapPrefix {
    from: String,
    to: String,
}

impl SwapPrefix {
    pub fn run(&self, html: &str) -> String {
        repo_images::html_swap_prefix(html, Some(&self.from), Some(&self.to))
    }
}
