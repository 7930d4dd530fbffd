use clap::Parser;

use multicommit::{
    Result,
    cli::{self, Command},
    command,
    config::Config,
    forge::github::Github,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("multicommit")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = Config::load(cli_args.config.as_deref())?;
    let ctx = cli_args.repo_context(&config)?;
    let github = Github::new(&ctx.credential, &ctx.api_url)?;

    match cli_args.command {
        Command::Commit(args) => {
            command::commit::execute(&github, &ctx.repository, args, &config)
                .await
        }
        Command::Show(args) => {
            command::show::execute(&github, &ctx.repository, args).await
        }
    }
}
