//! CLI argument parsing and repository context resolution.
use clap::{Parser, Subcommand};
use color_eyre::eyre::{ContextCompat, eyre};
use git_url_parse::GitUrl;
use std::{env, path::PathBuf};

use crate::{
    config::Config,
    forge::github::DEFAULT_API_URL,
    result::Result,
    session::{Credential, RepoContext, RepositoryRef},
};

/// Environment variable consulted when no token is passed on the command line.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Global CLI arguments for repository access and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub repository as owner/repo or https://github.com/owner/repo.
    pub repo: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, global = true)]
    /// Login the token belongs to (informational).
    pub username: Option<String>,

    #[arg(long, global = true)]
    /// API root, e.g. https://ghe.example.com/api/v3. Overrides the
    /// configuration file.
    pub api_url: Option<String>,

    #[arg(long, global = true)]
    /// Path to configuration file (default: ./multicommit.toml).
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commit local files to a branch as a single commit.
    Commit(CommitArgs),

    /// Print a file, or list a directory, from the repository.
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct CommitArgs {
    #[arg(short, long)]
    /// Commit message.
    pub message: String,

    #[arg(short, long)]
    /// Target branch. Defaults to the repository's default branch.
    pub branch: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Move the branch even if it changed since it was read, discarding
    /// those changes.
    pub force: bool,

    #[arg(long)]
    /// Number of concurrent blob uploads.
    pub concurrency: Option<usize>,

    #[arg(long)]
    /// Reruns allowed when the branch moves while committing.
    pub retries: Option<u32>,

    #[arg(long, value_name = "REMOTE_PATH")]
    /// Read one text file from stdin and commit it at REMOTE_PATH.
    pub stdin: Option<String>,

    /// Files to commit, as LOCAL or LOCAL=REMOTE.
    pub files: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[arg(short, long)]
    /// Branch, tag or sha to read from. Defaults to the default branch.
    pub branch: Option<String>,

    /// Path inside the repository. Empty for the root directory.
    #[arg(default_value = "")]
    pub path: String,
}

impl Args {
    /// Build the explicit context every operation receives.
    pub fn repo_context(&self, config: &Config) -> Result<RepoContext> {
        if self.repo.is_empty() {
            return Err(eyre!("must configure a repository with --repo"));
        }

        let target = parse_repo(&self.repo)?;

        let mut token = self.token.clone();

        if token.is_empty()
            && let Some(url_token) = target.token
        {
            token = url_token;
        }

        if token.is_empty()
            && let Ok(env_var_token) = env::var(TOKEN_ENV_VAR)
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(eyre!("must set github token"));
        }

        let api_url = match &self.api_url {
            Some(api_url) => api_url.clone(),
            None => match target.enterprise_api_url {
                Some(api_url) if config.api_url == DEFAULT_API_URL => api_url,
                _ => config.api_url.clone(),
            },
        };

        Ok(RepoContext {
            credential: Credential::new(token, self.username.clone()),
            repository: target.repository,
            api_url,
        })
    }
}

#[derive(Debug)]
struct RepoTarget {
    repository: RepositoryRef,
    token: Option<String>,
    /// API root derived from a non github.com host.
    enterprise_api_url: Option<String>,
}

/// Accept either `owner/repo` or an http(s) repository URL.
fn parse_repo(repo: &str) -> Result<RepoTarget> {
    if !repo.contains("://") {
        let repository = repo.parse::<RepositoryRef>().map_err(|e| eyre!(e))?;
        return Ok(RepoTarget {
            repository,
            token: None,
            enterprise_api_url: None,
        });
    }

    let parsed = GitUrl::parse(repo)?;

    validate_scheme(parsed.scheme)?;

    let host = parsed
        .host
        .wrap_err("unable to parse host from github repo")?;

    let owner = parsed
        .owner
        .wrap_err("unable to parse owner from github repo")?;

    let enterprise_api_url = if host == "github.com" {
        None
    } else {
        Some(format!("{}://{}/api/v3", parsed.scheme, host))
    };

    Ok(RepoTarget {
        repository: RepositoryRef::new(owner, parsed.name),
        token: parsed.token,
        enterprise_api_url,
    })
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http => Ok(()),
        git_url_parse::Scheme::Https => Ok(()),
        _ => Err(eyre!(
            "only http and https schemes are supported for repo urls"
        )),
    }
}

/// Split a `LOCAL[=REMOTE]` file argument.
pub fn parse_file_arg(arg: &str) -> Result<(PathBuf, String)> {
    let (local, remote) = match arg.split_once('=') {
        Some((local, remote)) => (local, remote),
        None => (arg, arg),
    };

    if local.is_empty() || remote.is_empty() {
        return Err(eyre!(
            "invalid file argument {arg:?}: expected LOCAL or LOCAL=REMOTE"
        ));
    }

    Ok((PathBuf::from(local), remote.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(repo: &str, token: &str) -> Args {
        Args::parse_from([
            "multicommit",
            "--repo",
            repo,
            "--token",
            token,
            "show",
            "README.md",
        ])
    }

    #[test]
    fn parses_commit_subcommand() {
        let args = Args::parse_from([
            "multicommit",
            "--repo",
            "octo/app",
            "commit",
            "-m",
            "Add two files",
            "-b",
            "main",
            "--force",
            "a.txt",
            "build/out.bin=assets/out.bin",
        ]);

        match args.command {
            Command::Commit(commit) => {
                assert_eq!(commit.message, "Add two files");
                assert_eq!(commit.branch.as_deref(), Some("main"));
                assert!(commit.force);
                assert_eq!(commit.files.len(), 2);
            }
            other => panic!("expected commit command, got {other:?}"),
        }
    }

    #[test]
    fn resolves_owner_repo_context() {
        let ctx = args("octo/app", "tok")
            .repo_context(&Config::default())
            .unwrap();

        assert_eq!(ctx.repository, RepositoryRef::new("octo", "app"));
        assert_eq!(ctx.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn resolves_github_url() {
        let ctx = args("https://github.com/octo/app", "tok")
            .repo_context(&Config::default())
            .unwrap();

        assert_eq!(ctx.repository.full_name(), "octo/app");
        assert_eq!(ctx.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn derives_enterprise_api_url() {
        let ctx = args("https://ghe.example.com/octo/app", "tok")
            .repo_context(&Config::default())
            .unwrap();

        assert_eq!(ctx.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn explicit_api_url_wins() {
        let mut args = args("https://ghe.example.com/octo/app", "tok");
        args.api_url = Some("https://proxy.example.com".into());

        let ctx = args.repo_context(&Config::default()).unwrap();
        assert_eq!(ctx.api_url, "https://proxy.example.com");
    }

    #[test]
    fn falls_back_to_env_token() {
        temp_env::with_var(TOKEN_ENV_VAR, Some("env-token"), || {
            let ctx = args("octo/app", "")
                .repo_context(&Config::default())
                .unwrap();
            assert_eq!(ctx.credential.token(), "env-token");
        });
    }

    #[test]
    fn errors_without_token() {
        temp_env::with_var_unset(TOKEN_ENV_VAR, || {
            let result = args("octo/app", "").repo_context(&Config::default());
            assert!(result.is_err());
        });
    }

    #[test]
    fn rejects_ssh_urls() {
        let result = args("ssh://git@github.com/octo/app.git", "tok")
            .repo_context(&Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn splits_file_arguments() {
        let (local, remote) = parse_file_arg("dist/app.js=static/app.js").unwrap();
        assert_eq!(local, PathBuf::from("dist/app.js"));
        assert_eq!(remote, "static/app.js");

        let (local, remote) = parse_file_arg("./README.md").unwrap();
        assert_eq!(local, PathBuf::from("./README.md"));
        assert_eq!(remote, "./README.md");

        assert!(parse_file_arg("=remote").is_err());
        assert!(parse_file_arg("local=").is_err());
    }
}
