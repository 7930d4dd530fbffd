//! Commit command implementation.
use color_eyre::eyre::Context;
use log::*;
use tokio::io::{self, AsyncReadExt};

use crate::{
    cli::{CommitArgs, parse_file_arg},
    commit::{CommitBuilder, CommitOptions, MultiFileCommit},
    config::Config,
    encoding::FileSource,
    forge::{
        request::{CommitResult, FileChange},
        traits::GitDataApi,
    },
    result::Result,
    session::RepositoryRef,
};

/// Execute the commit command and print the new commit and tree shas.
pub async fn execute(
    api: &dyn GitDataApi,
    repo: &RepositoryRef,
    args: CommitArgs,
    config: &Config,
) -> Result<()> {
    let stdin = match args.stdin {
        Some(_) => Some(read_stdin().await?),
        None => None,
    };

    let result = commit_files(api, repo, &args, config, stdin).await?;

    println!("commit {}", result.commit_sha);
    println!("tree {}", result.tree_sha);

    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .await
        .wrap_err("failed to read file content from stdin")?;
    Ok(content)
}

/// Build the commit described by `args`, rerunning the whole sequence when
/// the branch moved underneath it and retries remain.
pub async fn commit_files(
    api: &dyn GitDataApi,
    repo: &RepositoryRef,
    args: &CommitArgs,
    config: &Config,
    stdin: Option<String>,
) -> Result<CommitResult> {
    let files = collect_changes(args, stdin)?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => resolve_default_branch(api, repo).await?,
    };

    let request = MultiFileCommit::builder()
        .repo(repo.clone())
        .branch(branch.clone())
        .message(args.message.clone())
        .files(files)
        .build()?;

    let retries = args.retries.unwrap_or(config.conflict_retries);
    let builder = CommitBuilder::new(api, commit_options(args, config)?);

    info!(
        "committing {} file(s) to {repo}@{branch}",
        request.files.len()
    );

    let mut attempt = 0;

    loop {
        match builder.build_multi_file_commit(&request).await {
            Ok(result) => return Ok(result),
            Err(err) if err.is_conflict() && attempt < retries => {
                attempt += 1;
                warn!("{err}: rerunning commit ({attempt}/{retries})");
            }
            Err(err) => {
                let step = err.step();
                return Err(err).wrap_err_with(|| {
                    format!("commit to {repo}@{branch} failed at {step}")
                });
            }
        }
    }
}

/// Command line flags take precedence over the configuration file.
fn commit_options(args: &CommitArgs, config: &Config) -> Result<CommitOptions> {
    let defaults = config.commit_options();

    let options = CommitOptions::builder()
        .force(args.force || defaults.force)
        .blob_concurrency(
            args.concurrency.unwrap_or(defaults.blob_concurrency).max(1),
        )
        .build()?;

    Ok(options)
}

fn collect_changes(
    args: &CommitArgs,
    stdin: Option<String>,
) -> Result<Vec<FileChange>> {
    let mut changes = Vec::with_capacity(args.files.len() + 1);

    for arg in &args.files {
        let (local, remote) = parse_file_arg(arg)?;
        debug!("staging {} as {remote}", local.display());
        changes.push(FileChange::new(remote, FileSource::Path(local)));
    }

    if let (Some(remote), Some(content)) = (&args.stdin, stdin) {
        debug!("staging stdin as {remote}");
        changes.push(FileChange::new(remote.clone(), FileSource::Text(content)));
    }

    Ok(changes)
}

async fn resolve_default_branch(
    api: &dyn GitDataApi,
    repo: &RepositoryRef,
) -> Result<String> {
    if let Some(branch) = &repo.default_branch {
        return Ok(branch.clone());
    }

    let branch = api
        .get_default_branch(repo)
        .await
        .wrap_err_with(|| format!("failed to read default branch of {repo}"))?;

    info!("using default branch {branch}");

    Ok(branch)
}
