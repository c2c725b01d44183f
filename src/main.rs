mod debug_report;

use flexi_logger::{Logger, LoggerHandle};
use linkform::{DEFAULT_LOCALE, Grammar, LexicalStore, MemoryLexicon, Options, RuleSet, parse_verbose_with};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEBUG_ENV: &str = "LINKFORM_DEBUG_ROUNDS";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let _logger = match init_logging(config.log_level.as_deref()) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> linkform::Result<()> {
    let loaded_lexicon;
    let store: &dyn LexicalStore = match &config.lexicon {
        Some(path) => {
            loaded_lexicon = MemoryLexicon::from_path(path)?;
            &loaded_lexicon
        }
        None => linkform::default_lexicon(),
    };
    let loaded_grammar;
    let grammar: &dyn Grammar = match &config.grammar {
        Some(path) => {
            loaded_grammar = RuleSet::from_path(path)?;
            &loaded_grammar
        }
        None => linkform::default_grammar(),
    };

    let ids: Vec<&str> = config.ids.iter().map(String::as_str).collect();
    let res = parse_verbose_with(&ids, &config.locale, store, grammar, &config.options)?;
    debug_report::print_run(&res, config.color);
    Ok(())
}

struct CliConfig {
    ids: Vec<String>,
    locale: String,
    lexicon: Option<PathBuf>,
    grammar: Option<PathBuf>,
    options: Options,
    log_level: Option<String>,
    color: bool,
}

fn init_logging(level: Option<&str>) -> Result<LoggerHandle, String> {
    let logger = if std::env::var_os(DEBUG_ENV).is_some() {
        Logger::try_with_str("debug")
    } else if let Some(level) = level {
        Logger::try_with_str(level)
    } else {
        Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
    };

    logger
        .map_err(|err| format!("error: invalid log level: {err}"))?
        .log_to_stderr()
        .start()
        .map_err(|err| format!("error: failed to start logger: {err}"))
}

fn parse_args() -> Result<CliConfig, String> {
    let mut ids: Option<Vec<String>> = None;
    let mut locale = DEFAULT_LOCALE.to_string();
    let mut lexicon = None;
    let mut grammar = None;
    let mut options = Options::default();
    let mut log_level = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("linkform {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-expand" => options.expand_senses = false,
            "-l" | "--locale" => {
                locale = args.next().ok_or_else(|| "error: --locale expects a value".to_string())?;
            }
            "--lexicon" => {
                let value = args.next().ok_or_else(|| "error: --lexicon expects a path".to_string())?;
                lexicon = Some(PathBuf::from(value));
            }
            "--grammar" => {
                let value = args.next().ok_or_else(|| "error: --grammar expects a path".to_string())?;
                grammar = Some(PathBuf::from(value));
            }
            "--max-rounds" => {
                let value = args.next().ok_or_else(|| "error: --max-rounds expects a value".to_string())?;
                options.max_rounds = Some(parse_count("--max-rounds", &value)?);
            }
            "--max-variants" => {
                let value = args.next().ok_or_else(|| "error: --max-variants expects a value".to_string())?;
                options.max_variants = parse_count("--max-variants", &value)?;
            }
            "--log-level" => {
                log_level = Some(args.next().ok_or_else(|| "error: --log-level expects a value".to_string())?);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>();
                if !rest.is_empty() {
                    if ids.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    ids = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--locale=") => {
                locale = arg.trim_start_matches("--locale=").to_string();
            }
            _ if arg.starts_with("--max-rounds=") => {
                options.max_rounds = Some(parse_count("--max-rounds", arg.trim_start_matches("--max-rounds="))?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>();
                if ids.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                ids = Some(rest);
                break;
            }
        }
    }

    let ids = match ids {
        Some(value) => value,
        None => read_stdin_ids()?,
    };

    if ids.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { ids, locale, lexicon, grammar, options, log_level, color })
}

/// Stdin carries already-resolved lexical ids, one or more per line.
fn read_stdin_ids() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.split_whitespace().map(str::to_string).collect())
}

fn parse_count(flag: &str, value: &str) -> Result<usize, String> {
    value.parse::<usize>().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "linkform {version}

Syntactic linker CLI: reduces a sequence of lexical ids to a meaning.

Usage:
  linkform [OPTIONS] [--] <id...>

Options:
  -l, --locale <locale>      Locale of the ids. Default: {default_locale}
  --lexicon <path>           JSON lexicon to load instead of the built-in one.
  --grammar <path>           JSON grammar to load instead of the built-in one.
  --max-rounds <n>           Round limit per reduction. Default: number of ids
  --max-variants <n>         Sense combinations tried per input. Default: {max_variants}
  --no-expand                Do not split multi-sense words.
  --log-level <level>        Log level (overrides RUST_LOG). Default: {default_level}
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {debug_env}=1     Log every round and pair decision.

Exit codes:
  0  Success.
  1  Load or reduction error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_locale = DEFAULT_LOCALE,
        max_variants = Options::default().max_variants,
        default_level = DEFAULT_LOG_LEVEL,
        debug_env = DEBUG_ENV,
    )
}
