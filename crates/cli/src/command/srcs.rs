use clap::Parser;
use repo_images::{img_srcs, Quote};

#[derive(Parser, Debug, Clone)]
pub struct Srcs {
    /// Only list the sources that are relative paths.
    #[clap(long)]
    relative_only: bool,
}

impl Srcs {
    pub fn run(&self, html: &str) -> String {
        img_srcs(html)
            .filter(|m| !self.relative_only || repo_images::is_relative(m.src))
            .map(|m| {
                let quote = match m.quote {
                    Quote::Double => "double",
                    Quote::Single => "single",
                };
                format!("{quote}\t{}\n", m.src)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_srcs() {
        let html = r#"<p>x</p><img src="a.png"><img src='/b.png'>"#;
        let srcs = Srcs {
            relative_only: false,
        };
        assert_eq!(srcs.run(html), "double\ta.png\nsingle\t/b.png\n");

        let srcs = Srcs {
            relative_only: true,
        };
        assert_eq!(srcs.run(html), "double\ta.png\n");
    }
}
