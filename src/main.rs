//! Command-line entry point.
//!
//! ```sh
//! deckgen                               # built-in deck, written next to the binary
//! deckgen build -o talk.pptx --deck talk.yaml -v
//! deckgen inspect talk.pptx
//! ```

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use deckgen::deck::{self, DEFAULT_OUTPUT_FILE, Deck, DeckBuilder};
use deckgen::ooxml::pptx::DeckSummary;
use deckgen::{BuildError, logging};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate the BlazorGameEngine architecture presentation
#[derive(Parser, Debug)]
#[command(name = "deckgen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    build: BuildArgs,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the deck (the default when no command is given)
    Build(BuildArgs),
    /// Print the slides of a .pptx file
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default, PartialEq)]
struct BuildArgs {
    /// Output file [default: BlazorGameEngine_Presentation.pptx next to the executable]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// YAML deck file to build instead of the built-in deck
    #[arg(long, value_name = "FILE")]
    deck: Option<PathBuf>,
}

impl BuildArgs {
    fn is_empty(&self) -> bool {
        self.output.is_none() && self.deck.is_none()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(_) if !cli.build.is_empty() => {
            bail!("--output and --deck must follow the `build` command when one is given")
        },
        Some(Command::Build(args)) => run_build(args),
        Some(Command::Inspect { file }) => run_inspect(&file),
        None => run_build(cli.build),
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    let deck = match &args.deck {
        Some(path) => Deck::load(path).context("Deck loading failed")?,
        None => deck::default_deck(),
    };

    let output = match args.output {
        Some(path) => path,
        None => default_output_path()?,
    };

    DeckBuilder::new(deck.options)
        .build(&deck.slides, &output)
        .map_err(|e| {
            let step = match &e {
                BuildError::EmptyInput => "Deck is empty",
                BuildError::Create(_) => "Document creation failed",
                BuildError::LayoutLookup { .. } => "Layout lookup failed",
                BuildError::Slide { .. } => "Slide generation failed",
                BuildError::Serialize(_) => "Serialization failed",
                BuildError::IoFailure { .. } => "File write failed",
            };
            anyhow!(e).context(step)
        })?;

    println!("Presentation generated: {}", output.display());
    Ok(())
}

/// `BlazorGameEngine_Presentation.pptx` in the executable's directory.
fn default_output_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the executable")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(DEFAULT_OUTPUT_FILE))
}

fn run_inspect(file: &Path) -> Result<()> {
    let summary = DeckSummary::open(file)
        .with_context(|| format!("Cannot read presentation {}", file.display()))?;

    if let Some(title) = &summary.title {
        println!("{}", title);
    }
    println!("{} slides", summary.slide_count());

    for (number, slide) in summary.slides.iter().enumerate() {
        println!();
        println!(
            "{:>2}. [{}] {}",
            number + 1,
            slide.layout_name,
            slide.title.as_deref().unwrap_or("(no title)")
        );
        for paragraph in &slide.body {
            let indent = "  ".repeat(usize::from(paragraph.level));
            match paragraph.font_size_pt {
                Some(pt) => println!("    {}- {} ({} pt)", indent, paragraph.text, pt),
                None => println!("    {}- {}", indent, paragraph.text),
            }
        }
        if !slide.notes.is_empty() {
            println!("    notes: {}", slide.notes);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("deckgen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_before_build() {
        let cli = parse(&["-v", "build", "-o", "x.pptx"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Command::Build(args)) => assert_eq!(args.output, Some(PathBuf::from("x.pptx"))),
            other => panic!("expected build, got {:?}", other),
        }
        assert!(cli.build.is_empty());
    }

    #[test]
    fn test_verbose_after_build() {
        let cli = parse(&["build", "-vv", "--deck", "talk.yaml"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Build(args)) => assert_eq!(args.deck, Some(PathBuf::from("talk.yaml"))),
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_output_builds() {
        let cli = parse(&["-o", "talk.pptx", "-v"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.build.output, Some(PathBuf::from("talk.pptx")));

        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.build, BuildArgs::default());
    }

    #[test]
    fn test_inspect_takes_file() {
        let cli = parse(&["inspect", "talk.pptx", "--verbose"]);
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Some(Command::Inspect { file }) if file == Path::new("talk.pptx")));
        assert!(Cli::try_parse_from(["deckgen", "inspect"]).is_err());
    }

    #[test]
    fn test_build_args_on_both_sides_rejected() {
        let cli = parse(&["-o", "a.pptx", "build", "-o", "b.pptx"]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("must follow the `build` command"));

        let cli = parse(&["--deck", "talk.yaml", "inspect", "talk.pptx"]);
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_write_failure_names_step() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("deck.pptx");
        let output = output.to_str().unwrap();

        let err = run(parse(&["-v", "build", "-o", output])).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("File write failed: Cannot write "), "{}", message);
        assert!(!Path::new(output).exists());

        let err = run(parse(&["-o", output])).unwrap_err();
        assert_eq!(err.to_string(), "File write failed");
    }

    #[test]
    fn test_deck_load_failure_names_step() {
        let dir = tempfile::tempdir().unwrap();
        let deck = dir.path().join("deck.yaml");
        std::fs::write(&deck, "slides: [").unwrap();
        let output = dir.path().join("deck.pptx");

        let err = run(parse(&[
            "build",
            "--deck",
            deck.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]))
        .unwrap_err();
        assert!(format!("{:#}", err).starts_with("Deck loading failed: Invalid deck file: "));
        assert!(!output.exists());
    }
}
