//! CLI argument merging with config

use super::Config;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub repo_url: Option<String>,
    pub output: Option<PathBuf>,
    pub workdir: Option<PathBuf>,
    pub include_git_dir: Option<bool>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(repo_url) = cli.repo_url {
        base_config.repo_url = Some(repo_url);
    }
    if let Some(output) = cli.output {
        base_config.output = output;
    }
    if let Some(workdir) = cli.workdir {
        base_config.workdir = Some(workdir);
    }
    if let Some(include_git_dir) = cli.include_git_dir {
        base_config.include_git_dir = include_git_dir;
    }

    base_config
}
