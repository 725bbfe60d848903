//! Readoku 命令行工具
//!
//! ```bash
//! # 解析一个单词
//! readoku lookup 猫
//!
//! # 翻译短语，并指定本地词典
//! readoku lookup "How are you" --mode phrase --dictionary ~/readoku/dictionary.json
//!
//! # 把 word<TAB>definition 词表转换为词典JSON
//! readoku convert-dict edict.tsv dictionary/dictionary.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use readoku::translation::error::{TranslationError, TranslationResult};
use readoku::translation::storage::convert_tab_separated;
use readoku::translation::{ConfigManager, TranslationMode, TranslationRequest, TranslationService, WordStrategy};

#[derive(Parser)]
#[command(name = "readoku")]
#[command(version)]
#[command(about = "Resolve words and phrases through a local lexicon, a dictionary API and a generative proxy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(long, short, global = true)]
    config: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Word,
    Phrase,
}

impl From<ModeArg> for TranslationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Word => TranslationMode::Word,
            ModeArg::Phrase => TranslationMode::Phrase,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    GenerativeFirst,
    LocalFirst,
}

impl From<StrategyArg> for WordStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::GenerativeFirst => WordStrategy::GenerativeFirst,
            StrategyArg::LocalFirst => WordStrategy::LocalFirst,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a word or phrase and print the JSON response
    Lookup {
        /// Text to resolve
        text: String,

        #[arg(long, short, default_value = "word", value_enum)]
        mode: ModeArg,

        /// Local lexicon JSON file
        #[arg(long, short)]
        dictionary: Option<PathBuf>,

        /// Word-mode provider ordering
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Convert a tab-separated word list into a lexicon JSON file
    ConvertDict {
        input: PathBuf,
        output: PathBuf,
    },

    /// Write an example configuration file
    InitConfig {
        #[arg(default_value = "readoku.toml")]
        path: String,
    },

    /// Print the supported environment variables
    EnvDocs,
}

#[tokio::main]
async fn main() -> ExitCode {
    readoku::logging::init_tracing();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Lookup {
            text,
            mode,
            dictionary,
            strategy,
        } => lookup(cli.config.as_deref(), text, mode.into(), dictionary, strategy).await,
        Commands::ConvertDict { input, output } => convert_dict(&input, &output),
        Commands::InitConfig { path } => ConfigManager::generate_example_config(&path).map(|_| {
            println!("Wrote example configuration to {}", path);
            ExitCode::SUCCESS
        }),
        Commands::EnvDocs => {
            print!("{}", readoku::env::generate_env_docs());
            Ok(ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn lookup(
    config_path: Option<&str>,
    text: String,
    mode: TranslationMode,
    dictionary: Option<PathBuf>,
    strategy: Option<StrategyArg>,
) -> TranslationResult<ExitCode> {
    let manager = match config_path {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = manager.into_config();

    if let Some(path) = dictionary {
        config.dictionary_path = path.to_string_lossy().into_owned();
    }
    if let Some(strategy) = strategy {
        config.word_strategy = strategy.into();
    }

    let service = TranslationService::from_config(&config)?;
    let response = service.respond(&TranslationRequest::new(text, mode)).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn convert_dict(input: &Path, output: &Path) -> TranslationResult<ExitCode> {
    let text = std::fs::read_to_string(input).map_err(|e| {
        TranslationError::ConfigError(format!("Failed to read {}: {}", input.display(), e))
    })?;

    let dictionary = convert_tab_separated(&text);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&dictionary)?)?;

    println!(
        "Converted {} entries from {} to {}",
        dictionary.len(),
        input.display(),
        output.display()
    );
    Ok(ExitCode::SUCCESS)
}
