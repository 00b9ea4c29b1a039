use anyhow::{Context, Result, bail};
use blockgrammar_config::Config;
use blockgrammar_engine::{
    Block, BlockRegistry, PasteResult, RawMode, core_registry, paste_handler, parse, serialize,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Parse, validate and re-serialize block-delimited post content.
#[derive(Parser, Debug)]
#[command(name = "blockgrammar")]
#[command(about = "Parse, validate and re-serialize block-delimited post content")]
struct Args {
    /// Config file to use instead of ~/.config/blockgrammar/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the raw grammar tree as JSON
    Grammar { file: PathBuf },
    /// Print the hydrated block tree as JSON
    Parse { file: PathBuf },
    /// Parse and write the content back out
    Serialize { file: PathBuf },
    /// Report blocks whose markup does not match their type
    Validate { file: PathBuf },
    /// Convert an HTML file as if it were pasted
    Paste {
        file: PathBuf,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Keep scripts, styles and other filtered elements
        #[arg(long)]
        unfiltered: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Auto,
    Blocks,
    Inline,
}

impl From<ModeArg> for RawMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => RawMode::Auto,
            ModeArg::Blocks => RawMode::Blocks,
            ModeArg::Inline => RawMode::Inline,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let mut registry = core_registry()?;
    config.apply_to(&mut registry)?;

    match args.command {
        Command::Grammar { file } => {
            let nodes = blockgrammar_syntax::parse(&read(&file)?);
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        Command::Parse { file } => {
            let blocks = parse(&read(&file)?, &registry);
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        Command::Serialize { file } => {
            let blocks = parse(&read(&file)?, &registry);
            println!("{}", serialize(&blocks, &registry));
        }
        Command::Validate { file } => validate(&read(&file)?, &registry)?,
        Command::Paste {
            file,
            mode,
            unfiltered,
        } => {
            let html = read(&file)?;
            let mut options = config.raw_options(&html);
            if let Some(mode) = mode {
                options.mode = mode.into();
            }
            options.can_user_use_unfiltered_html |= unfiltered;

            match paste_handler(&options, &registry) {
                PasteResult::Inline(html) => println!("{html}"),
                PasteResult::Blocks(blocks) => println!("{}", serialize(&blocks, &registry)),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file {} does not exist", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    log::debug!("Using config: {config:?}");
    Ok(config)
}

fn read(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn validate(content: &str, registry: &BlockRegistry) -> Result<()> {
    let blocks = parse(content, registry);
    let mut invalid = Vec::new();
    collect_invalid(&blocks, &mut invalid);

    for block in &invalid {
        println!("{} is invalid", block.name);
        for issue in &block.validation_issues {
            println!("  {:?}: {}", issue.level, issue.message);
        }
    }

    if !invalid.is_empty() {
        bail!("{} invalid block(s)", invalid.len());
    }
    println!("All blocks are valid");
    Ok(())
}

fn collect_invalid<'a>(blocks: &'a [Block], out: &mut Vec<&'a Block>) {
    for block in blocks {
        if !block.is_valid {
            out.push(block);
        }
        collect_invalid(&block.inner_blocks, out);
    }
}
