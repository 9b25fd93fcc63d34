use boots_asm::{bytecode, DecodeConfig, ToDiagnostic};
use clap::Parser;
use codespan_reporting::{
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Decode a serialized compilation unit and print it.
#[derive(Parser)]
struct Cli {
    #[clap(value_parser)]
    file_path: String,
    /// Deepest allowed nesting of type arguments.
    #[clap(long, default_value_t = DecodeConfig::DEFAULT_MAX_TYPE_DEPTH)]
    max_depth: usize,
    /// Reject bytes after the architecture tag.
    #[clap(long)]
    strict: bool,
    /// Print only the opcode stream, in hex.
    #[clap(long)]
    hex: bool,
}

/// The `RUST_LOG` directives when they parse, otherwise warnings only.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = DecodeConfig {
        max_type_depth: args.max_depth,
        strict: args.strict,
        ..DecodeConfig::default()
    };

    let bytes = std::fs::read(&args.file_path)?;
    match bytecode::decode_compilation_info_with(&bytes, &config) {
        Ok(info) if args.hex => println!("{}", bytecode::dump_code(info.function().code())),
        Ok(info) => println!("{}", bytecode::dump_compilation_info(&info)),
        Err(err) => {
            let mut files = SimpleFiles::new();
            files.add(args.file_path.as_str(), "");
            let writer = StandardStream::stderr(ColorChoice::Auto);
            let config = term::Config::default();
            term::emit(&mut writer.lock(), &config, &files, &err.to_diagnostic())?;
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_overrides_the_default_level() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
