use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

// cli.rs is shared with the main crate via #[path]; it deliberately imports
// nothing beyond clap and clap_complete so the build script can compile it
// standalone.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    write_manpages(cli::Cli::command(), &out_subdir("man"));
    write_completions(&out_subdir("completions"));
}

fn out_subdir(name: &str) -> PathBuf {
    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let dir = PathBuf::from(out_dir).join(name);
    fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("failed to create {}: {e}", dir.display()));
    dir
}

/// Write a man page per command, walking the whole subcommand tree.
/// Nested pages use the `name-subcommand.1` convention.
fn write_manpages(root: clap::Command, dir: &Path) {
    let mut pending = vec![root];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone())
            .render(&mut page)
            .unwrap_or_else(|e| panic!("man page for `{name}`: {e}"));
        let path = dir.join(format!("{name}.1"));
        fs::write(&path, page).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));

        for sub in cmd.get_subcommands() {
            if !sub.is_hide_set() {
                pending.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
            }
        }
    }
}

/// Pre-rendered completion scripts for packagers; `dealdesk completions`
/// regenerates them at runtime for everyone else.
fn write_completions(dir: &Path) {
    let mut cmd = cli::Cli::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        clap_complete::generate_to(shell, &mut cmd, "dealdesk", dir)
            .unwrap_or_else(|e| panic!("{shell} completions: {e}"));
    }
}
