//! Sprig CLI entry point.

use std::error::Error;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use rhizome_sprig_ir::{Formatter, RawFormatter};
use rhizome_sprig_syntax_javascript::{Config, GlobalSet, parse, to_lisp_ast, transform_with};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprig")]
#[command(about = "Translate JavaScript and JSX to ClojureScript")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate JavaScript files
    Translate {
        /// Input file(s), or - for stdin
        #[arg(required = true)]
        files: Vec<String>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write to stdout instead of files
        #[arg(long)]
        stdout: bool,

        /// What to write
        #[arg(long, value_enum, default_value_t = Emit::Cljs)]
        emit: Emit,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Skip layout and write the generator output as is
        #[arg(long)]
        raw: bool,
    },

    /// Translate files without writing anything, reporting failures
    Check {
        /// Input file(s)
        #[arg(required = true)]
        files: Vec<String>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(clap::Args)]
struct SettingsArgs {
    /// Configuration file (defaults to ./sprig.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat NAME as a host global
    #[arg(long = "global", value_name = "NAME")]
    globals: Vec<String>,

    /// Treat NAME as a user binding
    #[arg(long = "no-global", value_name = "NAME")]
    no_globals: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// ClojureScript source
    Cljs,
    /// Intermediate form tree as JSON
    Forms,
    /// Parsed source tree as JSON
    Ast,
}

impl Emit {
    fn extension(self) -> &'static str {
        match self {
            Emit::Cljs => "cljs",
            Emit::Forms => "forms.json",
            Emit::Ast => "ast.json",
        }
    }
}

struct Settings {
    globals: GlobalSet,
    formatter: Box<dyn Formatter>,
}

impl SettingsArgs {
    fn load(&self, raw: bool) -> Result<Settings, Box<dyn Error>> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::discover(&std::env::current_dir()?)?,
        };

        let mut globals = config.global_set();
        for name in &self.globals {
            globals.include(name.as_str());
        }
        for name in &self.no_globals {
            globals.exclude(name);
        }
        debug!(globals = globals.len(), "loaded settings");

        let formatter: Box<dyn Formatter> = if raw {
            Box::new(RawFormatter)
        } else {
            config.formatter()
        };
        Ok(Settings { globals, formatter })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sprig=info".parse()?)
                .add_directive("rhizome_sprig=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            files,
            out,
            stdout,
            emit,
            settings,
            raw,
        } => {
            let settings = settings.load(raw)?;
            if let Some(ref dir) = out {
                std::fs::create_dir_all(dir)?;
            }

            for file in files {
                let source = read_source(&file)?;
                let text = render(&source, emit, &settings)?;

                if stdout || file == "-" {
                    std::io::stdout().write_all(text.as_bytes())?;
                    continue;
                }

                let out_path = output_path(Path::new(&file), out.as_deref(), emit);
                std::fs::write(&out_path, &text)?;
                println!("{} -> {}", file, out_path.display());
            }
        }

        Commands::Check { files, settings } => {
            let settings = settings.load(false)?;
            let mut failures = 0;

            for file in &files {
                let result = read_source(file)
                    .map_err(Box::<dyn Error>::from)
                    .and_then(|source| render(&source, Emit::Cljs, &settings));
                match result {
                    Ok(_) => println!("ok: {}", file),
                    Err(err) => {
                        failures += 1;
                        eprintln!("{}: {}", file, err);
                    }
                }
            }

            info!(files = files.len(), failures, "check finished");
            if failures > 0 {
                return Err(format!("{} of {} files failed", failures, files.len()).into());
            }
        }
    }

    Ok(())
}

fn read_source(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

fn render(source: &str, emit: Emit, settings: &Settings) -> Result<String, Box<dyn Error>> {
    let text = match emit {
        Emit::Cljs => transform_with(source, &settings.globals, settings.formatter.as_ref())?,
        Emit::Forms => {
            let form = to_lisp_ast(source, &settings.globals)?;
            serde_json::to_string_pretty(&form)? + "\n"
        }
        Emit::Ast => serde_json::to_string_pretty(&parse(source)?)? + "\n",
    };
    Ok(text)
}

/// `src/app.jsx` becomes `src/app.cljs`, or `<out>/app.cljs` with `--out`.
fn output_path(file: &Path, out: Option<&Path>, emit: Emit) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}.{}", stem, emit.extension());
    match out {
        Some(dir) => dir.join(name),
        None => file.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("src/app.jsx"), None, Emit::Cljs),
            PathBuf::from("src/app.cljs")
        );
        assert_eq!(
            output_path(Path::new("src/app.js"), Some(Path::new("out")), Emit::Forms),
            PathBuf::from("out/app.forms.json")
        );
        assert_eq!(
            output_path(Path::new("main.js"), None, Emit::Ast),
            PathBuf::from("main.ast.json")
        );
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "sprig",
            "translate",
            "a.js",
            "--emit",
            "forms",
            "--global",
            "React",
            "--no-global",
            "name",
        ])
        .unwrap();
        let Commands::Translate {
            files,
            emit,
            settings,
            raw,
            ..
        } = cli.command
        else {
            panic!("expected translate");
        };
        assert_eq!(files, vec!["a.js".to_string()]);
        assert!(emit == Emit::Forms);
        assert_eq!(settings.globals, vec!["React".to_string()]);
        assert_eq!(settings.no_globals, vec!["name".to_string()]);
        assert!(!raw);
    }
}
