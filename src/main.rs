use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use proseweave::document;
use proseweave::line_editor::{LineEditor, ReadResult};
use proseweave::nl::{default_grammar, lexicon, GrammarDeriver, Lexicon, LexiconTagger, ProseGrammar};
use proseweave::report;
use proseweave::types::Result;
use proseweave::ui;
use proseweave::weave::Session;

/// Fuse per-line fragments into connective prose.
#[derive(Parser, Debug)]
#[command(name = "proseweave")]
#[command(about = "Classify comment fragments and weave them into prose")]
#[command(version)]
struct Cli {
    /// Grammar YAML to use instead of the built-in grammar
    #[arg(long, global = true, value_name = "PATH")]
    grammar: Option<PathBuf>,

    /// Lexicon YAML to use instead of the built-in lexicon
    #[arg(long, global = true, value_name = "PATH")]
    lexicon: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Weave the lines of FILE (or stdin) into a passage
    Weave {
        file: Option<PathBuf>,

        /// Also print the fragments after each pass
        #[arg(long)]
        stages: bool,

        /// Use lines as written instead of stripping comment markers
        #[arg(long)]
        raw: bool,
    },
    /// Tag and parse a single fragment
    Parse {
        text: String,

        /// List every derivation, not just the chosen one
        #[arg(long)]
        all: bool,
    },
    /// Parse fragments interactively; an empty line weaves them
    Repl,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ui::error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let loaded_grammar;
    let grammar: &ProseGrammar = match &cli.grammar {
        Some(path) => {
            loaded_grammar = ProseGrammar::load(path)?;
            tracing::info!(path = %path.display(), rules = loaded_grammar.cfg.rules.len(), "grammar loaded");
            &loaded_grammar
        }
        None => default_grammar(),
    };

    let loaded_lexicon;
    let words: &Lexicon = match &cli.lexicon {
        Some(path) => {
            loaded_lexicon = Lexicon::load(path)?;
            tracing::info!(path = %path.display(), "lexicon loaded");
            &loaded_lexicon
        }
        None => lexicon(),
    };

    let tagger = LexiconTagger::new(words);

    match cli.command {
        Command::Weave { file, stages, raw } => {
            let source = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let fragments = if raw {
                document::raw_fragments(&source)
            } else {
                document::fragments(&source)
            };
            weave_and_print(&fragments, grammar, &tagger, stages);
        }
        Command::Parse { text, all } => {
            print!("{}", report::describe_parse(&text, grammar, &tagger, all));
        }
        Command::Repl => repl(grammar, &tagger)?,
    }
    Ok(())
}

fn weave_and_print(fragments: &[String], grammar: &ProseGrammar, tagger: &LexiconTagger<'_>, stages: bool) {
    let deriver = GrammarDeriver::new(grammar, tagger);
    let mut session = Session::new(grammar, &deriver);
    let woven = session.weave(fragments);
    tracing::info!(stats = ?woven.stats, "woven");

    if stages {
        let listed: [(&str, &[String]); 3] = [
            ("fragments", fragments),
            ("after phrase merging", &woven.phrases),
            ("after clause merging", &woven.clauses),
        ];
        for (title, list) in listed {
            println!("{}", ui::section(title));
            for (i, fragment) in list.iter().filter(|f| !f.trim().is_empty()).enumerate() {
                let class = session.classify(fragment);
                println!("{}", ui::fragment_line(i + 1, class, fragment));
            }
            println!();
        }
        println!("{}", ui::section("passage"));
    }
    println!("{}", woven.text);
}

fn repl(grammar: &ProseGrammar, tagger: &LexiconTagger<'_>) -> Result<()> {
    let mut editor = LineEditor::new()?;
    let mut pending: Vec<String> = Vec::new();

    println!("{}", ui::banner("proseweave", env!("CARGO_PKG_VERSION")));
    println!("{}", ui::dim("Enter fragments one per line; an empty line weaves them. Ctrl-D to quit."));

    loop {
        match editor.read_line(&ui::prompt()) {
            ReadResult::Line(line) if line.trim().is_empty() => {
                if pending.is_empty() {
                    continue;
                }
                println!();
                weave_and_print(&pending, grammar, tagger, false);
                println!();
                pending.clear();
            }
            ReadResult::Line(line) => {
                editor.add_history(&line);
                print!("{}", report::describe_parse(line.trim(), grammar, tagger, false));
                println!("{}", ui::dim(&format!("({} fragment(s) pending)", pending.len() + 1)));
                pending.push(line.trim().to_string());
            }
            ReadResult::Interrupted => {
                if !pending.is_empty() {
                    println!("{}", ui::dim("pending fragments discarded"));
                }
                pending.clear();
            }
            ReadResult::Eof => break,
        }
    }
    Ok(())
}
