use std::io::Write;
use std::path::PathBuf;

use clap::CommandFactory;

use crate::Cli;

const BIN_NAME: &str = "odoo-mirror";

fn completion_script(shell: clap_complete::Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut out = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut out);
    out
}

fn main_man_page() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut out = Vec::new();
    man.render(&mut out)?;
    Ok(out)
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    std::io::stdout().write_all(&completion_script(shell))?;
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(dir) => {
            // One page per subcommand.
            std::fs::create_dir_all(&dir)?;
            clap_mangen::generate_to(Cli::command(), &dir)?;
            println!("Generated man pages in: {}", dir.display());
        }
        None => std::io::stdout().write_all(&main_man_page()?)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn completion_script_mentions_subcommands() {
        let script = completion_script(clap_complete::Shell::Zsh);
        let script = String::from_utf8(script).expect("completion output should be UTF-8");
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("daemon"));
    }

    #[test]
    fn main_man_page_has_title() {
        let page = main_man_page().expect("man rendering should succeed");
        let page = String::from_utf8(page).expect("man output should be UTF-8");
        assert!(page.to_lowercase().contains(".th odoo-mirror"));
    }

    #[test]
    fn handle_man_writes_subcommand_pages() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("odoo-mirror-man-{nonce}"));

        handle_man(Some(dir.clone())).expect("man page generation should succeed");

        let pages = std::fs::read_dir(&dir)
            .expect("output directory should exist")
            .count();
        assert!(pages > 1, "expected the main page plus subcommand pages");
        std::fs::remove_dir_all(&dir).expect("test output directory should be removable");
    }
}
