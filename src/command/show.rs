//! Show command implementation.
use color_eyre::eyre::Context;
use log::*;

use crate::{
    cli::ShowArgs,
    forge::{content::RepoContent, traits::GitDataApi},
    result::Result,
    session::RepositoryRef,
};

/// Print a file, or list a directory, at `args.path`.
pub async fn execute(
    api: &dyn GitDataApi,
    repo: &RepositoryRef,
    args: ShowArgs,
) -> Result<()> {
    info!("retrieving {repo}/{}", args.path);

    let content = api
        .get_content(repo, &args.path, args.branch.clone())
        .await
        .wrap_err_with(|| format!("failed to read {} from {repo}", args.path))?;

    println!("{}", render(&content)?);

    Ok(())
}

/// Text files print as-is, binary files as their size, directories one
/// entry per line.
fn render(content: &RepoContent) -> Result<String> {
    if let RepoContent::Directory(entries) = content {
        let lines = entries
            .iter()
            .map(|entry| format!("{}\t{}", entry.kind, entry.path))
            .collect::<Vec<_>>();
        return Ok(lines.join("\n"));
    }

    let bytes = content
        .bytes()
        .wrap_err("failed to decode file content")?
        .unwrap_or_default();

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => Ok(format!("binary file, {} bytes", err.as_bytes().len())),
    }
}
